use std::{
    fmt::{self, Debug, Display, Formatter},
    io,
};

pub type Result<T> = std::result::Result<T, Exception>;

/// The error taxonomy.  Each kind carries a one byte code which doubles
/// as the process exit code when the error is fatal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[repr(u8)]
pub enum ErrKind {
    /// A push beyond a stack's ceiling.
    StackOverflow = 1,

    /// An operation required more items than a stack held.
    StackUnderflow = 2,

    /// Division or modulus with a zero divisor.
    DivZero = 3,

    /// The input stack is empty and there is no interactive source.
    NoInput = 4,

    /// The radix is outside 2..36.
    BadBase = 5,

    /// A digit outside the current radix.
    BadLiteral = 6,

    /// Number-to-string output would exceed its buffer.
    BufOverflow = 7,

    /// Fetch or store through the null address.
    NullPtr = 8,

    /// Compilation into a full flash arena.
    NoSpace = 9,

    /// A defining word used in the wrong state.
    BadState = 10,

    /// A branch left unresolved at the end of a definition.
    Unresolved = 11,

    /// An operating system signal was delivered.
    CaughtSignal = 12,

    /// Attempt to uncache a string that is not the most recent.
    Unsave = 13,

    /// Tick of a name not present in the dictionary.
    NoWord = 14,

    /// A host call failed.
    SysCall = 15,

    /// A literal failed to parse while compiling.
    BadString = 16,

    /// An include file could not be opened.
    NoFile = 17,

    /// The input stack is full.
    InStack = 18,

    /// An argument outside its legal interval.
    Range = 19,
}

impl ErrKind {
    /// The one byte error code, also used as the process exit code for
    /// fatal errors.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// The diagnostic text for the kind.
    pub fn message(self) -> &'static str {
        match self {
            ErrKind::StackOverflow => "Stack overflow",
            ErrKind::StackUnderflow => "Stack underflow",
            ErrKind::DivZero => "Division by zero",
            ErrKind::NoInput => "No input available",
            ErrKind::BadBase => "Base out of range",
            ErrKind::BadLiteral => "Digit outside current base",
            ErrKind::BufOverflow => "Formatting buffer overflow",
            ErrKind::NullPtr => "Null pointer",
            ErrKind::NoSpace => "Flash arena full",
            ErrKind::BadState => "Wrong state",
            ErrKind::Unresolved => "Unresolved branch in definition",
            ErrKind::CaughtSignal => "Caught a signal",
            ErrKind::Unsave => "Not the most recently cached string",
            ErrKind::NoWord => "Word not found",
            ErrKind::SysCall => "Host call failed",
            ErrKind::BadString => "Bad string",
            ErrKind::NoFile => "Cannot open file",
            ErrKind::InStack => "Input stack overflow",
            ErrKind::Range => "Argument out of range",
        }
    }
}

impl Display for ErrKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Why the interpreter is being reset.  Distinguishes soft restarts
/// from hard ones in the reset path and in tracing output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ResetWhy {
    Unexpected,
    SignalHandler,
    CatchHandler,
    Application,
    CheckStack,
    ColdStart,
    User,
}

impl Display for ResetWhy {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let text = match self {
            ResetWhy::Unexpected => "unexpected",
            ResetWhy::SignalHandler => "signal-handler",
            ResetWhy::CatchHandler => "catch-handler",
            ResetWhy::Application => "application",
            ResetWhy::CheckStack => "checkstack",
            ResetWhy::ColdStart => "cold-start",
            ResetWhy::User => "user",
        };

        write!(f, "{}", text)
    }
}

/// Any error raised during the execution of a word.  Carries the kind
/// and the name of the primitive or subsystem that threw it.
#[derive(Clone, PartialEq, Eq)]
pub struct ForthError {
    /// What went wrong.
    pub kind: ErrKind,

    /// The "thrown by" location: the word or subsystem reporting the
    /// failure.
    pub thrown_by: String,
}

impl ForthError {
    pub fn new(kind: ErrKind, thrown_by: &str) -> ForthError {
        ForthError {
            kind,
            thrown_by: thrown_by.to_string(),
        }
    }
}

/// Pretty print the error the way the catch handler reports it.
impl Display for ForthError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}, thrown by {}", self.kind, self.thrown_by)
    }
}

impl Debug for ForthError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

/// The unwinding type returned by every primitive.  Abandoning the
/// current call stack and resuming the outer interpreter is modelled
/// as an error value the outer loop catches: plain errors produce a
/// diagnostic and a warm reset, resets skip the diagnostic, and Bye
/// leaves the interpreter with an exit code.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Exception {
    Error(ForthError),
    Reset(ResetWhy),
    Bye(i32),
}

impl Display for Exception {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Exception::Error(error) => write!(f, "{}", error),
            Exception::Reset(why) => write!(f, "reset ({})", why),
            Exception::Bye(code) => write!(f, "bye ({})", code),
        }
    }
}

impl From<ForthError> for Exception {
    fn from(error: ForthError) -> Exception {
        Exception::Error(error)
    }
}

/// Allow for the conversion of a std::io::Error into the host-call
/// error kind.
impl From<io::Error> for Exception {
    fn from(error: io::Error) -> Exception {
        Exception::Error(ForthError::new(ErrKind::SysCall, &error.to_string()))
    }
}

/// A convenience function for raising an error as a Result::Err.
pub fn throw<T>(kind: ErrKind, thrown_by: &str) -> Result<T> {
    Err(Exception::Error(ForthError::new(kind, thrown_by)))
}
