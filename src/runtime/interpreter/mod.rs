use crate::{
    lang::{
        numbers::{format_cell, parse_literal, DIGITS},
        source::EOF_TOKEN,
    },
    runtime::{
        data_structures::{
            Cell, UCell,
            dictionary::{Dictionary, Entry, Flag, Primitive, WordCode},
            flash::{Flash, TMP_BUFFER_SIZE},
            stacks::{CellStack, DATA_DEPTH, RETURN_DEPTH, USER_DEPTH},
        },
        error::{self, ErrKind, ForthError, Exception, ResetWhy, throw},
        signals,
    },
};

/// The interpreter's output channel.
pub mod console;

/// The stack of nested input sources.
pub mod input;

use console::Console;
use input::InputStack;

/// The placeholder written into a branch cell by `fwd_mark` until the
/// matching resolver patches it.
pub const UNRESOLVED: Cell = Cell::MIN;

/// The interpreter's global state machine.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum State {
    /// At the outer interpreter, executing as tokens arrive.
    Interactive,

    /// Building a colon definition.
    Compiling,

    /// Inside the inner interpreter, running threaded code.
    Interpret,

    /// Between `[` and `]`: executing even while a definition is open.
    Immediate,
}

/// What kind of definition the open compile frame belongs to.
enum FrameKind {
    /// A named colon definition at the given colon-table index.
    Named(usize),

    /// An anonymous body built for a control structure typed at the
    /// keyboard; executed and discarded when the structure closes.
    Transient,
}

/// Rollback bookkeeping for the definition currently being compiled.
/// A failed compile restores `here` and the string cache to the values
/// they had at the matching `:`.
struct ColonFrame {
    kind: FrameKind,
    body: usize,
    here0: usize,
    strings0: usize,
    depth0: usize,
}

/// The state of the pictured numeric formatter between `<#` and `#>`.
struct Pictured {
    active: bool,
    value: UCell,
    original: Cell,
    negative: bool,
    base_addr: usize,
    pos: usize,
}

impl Pictured {
    fn idle() -> Pictured {
        Pictured {
            active: false,
            value: 0,
            original: 0,
            negative: false,
            base_addr: 0,
            pos: 0,
        }
    }
}

/// The Forth machine.  All process-wide state of the original lives
/// here as a single value owned by `main`; primitives are functions
/// taking a mutable reference, which keeps the semantics and lets the
/// tests instantiate as many machines as they like.
pub struct Machine {
    /// The flash arena: compiled code, data, and the string cache.
    pub flash: Flash,

    /// The data stack.
    pub data: CellStack,

    /// The return stack; also carries the threaded instruction pointer
    /// and the loop control slots.
    pub ret: CellStack,

    /// The user stack.
    pub user: CellStack,

    /// The word dictionary.
    pub dictionary: Dictionary,

    /// The stack of nested input sources.
    pub input: InputStack,

    /// Where words and diagnostics print.
    pub console: Console,

    /// The global state machine.
    pub state: State,

    /// The current radix for literal parsing and numeric output.
    pub base: u32,

    /// When set, every dispatch prints the data stack and word name
    /// before the word runs.
    pub trace: bool,

    /// The last error code, kept across warm resets.
    pub error_code: Cell,

    saved_state: State,
    frame: Option<ColonFrame>,
    ctl_depth: usize,
    pictured: Pictured,
    deferred: Option<String>,

    xt_literal: Cell,
    xt_branch: Cell,
    xt_qbranch: Cell,
    xt_do: Cell,
    xt_loop: Cell,
    xt_plus_loop: Cell,
    xt_type: Cell,
    xt_does: Cell,
}

impl Machine {
    pub fn new() -> Machine {
        Machine {
            flash: Flash::new(),
            data: CellStack::new("data", DATA_DEPTH),
            ret: CellStack::new("return", RETURN_DEPTH),
            user: CellStack::new("user", USER_DEPTH),
            dictionary: Dictionary::new(),
            input: InputStack::new(),
            console: Console::new(),
            state: State::Interactive,
            base: 10,
            trace: false,
            error_code: 0,
            saved_state: State::Interactive,
            frame: None,
            ctl_depth: 0,
            pictured: Pictured::idle(),
            deferred: None,
            xt_literal: 0,
            xt_branch: 0,
            xt_qbranch: 0,
            xt_do: 0,
            xt_loop: 0,
            xt_plus_loop: 0,
            xt_type: 0,
            xt_does: 0,
        }
    }

    /// Build a fully registered machine.
    pub fn boot() -> Machine {
        let mut machine = Machine::new();

        crate::runtime::built_ins::register_all(&mut machine);
        machine.seal_boot().expect("boot words must fit the arena");
        machine
    }

    /// Build a fully registered machine whose console captures output,
    /// for tests.
    pub fn boot_capturing() -> Machine {
        let mut machine = Machine::new();

        machine.console = Console::capturing();
        crate::runtime::built_ins::register_all(&mut machine);
        machine.seal_boot().expect("boot words must fit the arena");
        machine
    }

    /// Register a primitive word, interning its name in the string
    /// cache.  Called during boot, before the cache is sealed.
    pub fn add_primitive(
        &mut self,
        name: &str,
        flag: Flag,
        handler: Primitive,
        help: &str,
        stack: &str,
    ) -> Cell {
        let addr = self
            .flash
            .str_cache(name)
            .expect("boot strings must fit the arena");

        let mut entry = Entry::new(addr, WordCode::Native(handler), flag, 0);

        entry.help = help.to_string();
        entry.stack = stack.to_string();
        self.dictionary.add_primitive(entry)
    }

    /// Finish booting: bind the execution tokens the compiler needs,
    /// seat the keyboard, seal the boot strings as the FORGET low-water
    /// mark, carve the scratch queue, and install the signal handlers.
    pub fn seal_boot(&mut self) -> error::Result<()> {
        self.xt_literal = self.must_xt("(literal)");
        self.xt_branch = self.must_xt("branch");
        self.xt_qbranch = self.must_xt("?branch");
        self.xt_do = self.must_xt("(do)");
        self.xt_loop = self.must_xt("(loop)");
        self.xt_plus_loop = self.must_xt("(+loop)");
        self.xt_type = self.must_xt("type");
        self.xt_does = self.must_xt("does>");

        self.input.push_keyboard(&mut self.flash)?;
        self.flash.str_seal();
        self.flash.alloc_tmp_buffers()?;
        signals::install();
        Ok(())
    }

    fn must_xt(&self, name: &str) -> Cell {
        self.dictionary
            .lookup(&self.flash, name)
            .expect("core word missing from the primitives table")
    }

    pub fn xt_literal(&self) -> Cell {
        self.xt_literal
    }

    pub fn xt_branch(&self) -> Cell {
        self.xt_branch
    }

    pub fn xt_qbranch(&self) -> Cell {
        self.xt_qbranch
    }

    pub fn xt_do(&self) -> Cell {
        self.xt_do
    }

    pub fn xt_loop(&self) -> Cell {
        self.xt_loop
    }

    pub fn xt_plus_loop(&self) -> Cell {
        self.xt_plus_loop
    }

    pub fn xt_type(&self) -> Cell {
        self.xt_type
    }

    pub fn xt_does(&self) -> Cell {
        self.xt_does
    }

    /// Schedule a word to run once after the primary input drains; the
    /// `-x` command line flag.
    pub fn set_deferred(&mut self, word: Option<String>) {
        self.deferred = word;
    }

    pub fn take_deferred(&mut self) -> Option<String> {
        self.deferred.take()
    }

    //////////////////////////////////////////////
    // Inner interpreter

    /// Execute one word by its execution token.  An entry with a body
    /// gets that body pushed onto the return stack before its code
    /// field runs; the inner interpreter threads from there.
    pub fn execute(&mut self, xt: Cell) -> error::Result<()> {
        if let Some(signal) = signals::take_pending() {
            return throw(ErrKind::CaughtSignal, signals::name(signal));
        }

        let (code, body, name) = {
            let entry = self.dictionary.entry(xt)?;
            (entry.code, entry.body, entry.name)
        };

        if self.trace {
            self.trace_line(name);
        }

        if body != 0 {
            self.ret.push(body as Cell)?;
        }

        match code {
            WordCode::Native(handler) => handler(self),

            WordCode::Colon => {
                let saved = self.state;

                self.state = State::Interpret;
                let result = self.do_colon();
                self.state = saved;
                result
            }

            WordCode::PushBody => {
                let body = self.ret.pop()?;
                self.data.push(body)
            }

            WordCode::Constant => {
                let body = self.ret.pop()?;
                let value = self.flash.get(body as usize)?;
                self.data.push(value)
            }
        }
    }

    /// The threading loop.  The next-word pointer lives on the return
    /// stack, so nested colon calls simply push their body and recurse
    /// through `execute`.
    fn do_colon(&mut self) -> error::Result<()> {
        loop {
            let ip = self.ret.pop()? as usize;
            let word = self.flash.get(ip)?;

            if word == 0 {
                return Ok(());
            }

            self.ret.push((ip + 1) as Cell)?;
            self.execute(word)?;
        }
    }

    fn trace_line(&mut self, name: usize) {
        let mut line = String::from("( ");

        for value in self.data.slice() {
            line.push_str(&format_cell(*value, self.base));
            line.push(' ');
        }

        line.push_str(") ");
        line.push_str(&self.flash.str_get(name));
        line.push('\n');
        self.console.print(&line);
    }

    //////////////////////////////////////////////
    // Outer interpreter

    /// Read the next token from the current input source.
    pub fn token(&mut self) -> error::Result<String> {
        self.input.next_token(&mut self.console)
    }

    /// Read the next token as a definition name; end of input is not an
    /// acceptable name.
    pub fn name_token(&mut self, who: &str) -> error::Result<String> {
        let token = self.token()?;

        if token == EOF_TOKEN {
            throw(ErrKind::NoWord, who)?;
        }

        Ok(token)
    }

    /// Dispatch one token according to the current state.
    pub fn interpret_token(&mut self, token: &str) -> error::Result<()> {
        match self.state {
            State::Compiling => self.compile_token(token),
            _ => self.run_token(token),
        }
    }

    fn run_token(&mut self, token: &str) -> error::Result<()> {
        if let Some(xt) = self.dictionary.lookup(&self.flash, token) {
            return self.execute(xt);
        }

        match parse_literal(token, self.base) {
            Ok(value) => self.data.push(value),
            Err(kind) => throw(kind, token),
        }
    }

    fn compile_token(&mut self, token: &str) -> error::Result<()> {
        if token == ";" {
            return self.end_colon();
        }

        if let Some(xt) = self.dictionary.lookup(&self.flash, token) {
            let flag = self.dictionary.entry(xt)?.flag;

            if flag == Flag::Immediate {
                return self.execute(xt);
            }

            return self.comma(xt);
        }

        match parse_literal(token, self.base) {
            Ok(value) => {
                let literal = self.xt_literal;

                self.comma(literal)?;
                self.comma(value)
            }

            Err(_) => {
                // The partially built word is abandoned.
                self.rollback_definition();
                self.state = State::Interpret;
                throw(ErrKind::BadString, token)
            }
        }
    }

    /// The outer loop: read a token, dispatch it, catch whatever is
    /// thrown.  Returns the process exit code.
    pub fn quit(&mut self) -> i32 {
        self.error_code = 0;
        self.warm(ResetWhy::ColdStart);

        loop {
            let result = self
                .token()
                .and_then(|token| self.interpret_token(&token));

            match result {
                Ok(()) => {}

                Err(Exception::Error(error)) => {
                    if let Some(code) = self.catch(error) {
                        return code;
                    }
                }

                Err(Exception::Reset(why)) => match why {
                    ResetWhy::ColdStart => {
                        let _ = self.forget();
                        self.warm(why);
                    }

                    _ => self.warm(why),
                },

                Err(Exception::Bye(code)) => return code,
            }
        }
    }

    /// Handle a thrown error: report it, dump the return stack as a
    /// backtrace, and warm-reset so the interpreter stays responsive.
    /// Returns an exit code when the error is not recoverable.
    pub fn catch(&mut self, error: ForthError) -> Option<i32> {
        self.error_code = error.kind.code() as Cell;

        if error.kind == ErrKind::NoInput {
            // End of input with no caller: leave quietly.
            return Some(0);
        }

        if error.kind == ErrKind::CaughtSignal && error.thrown_by == "SIGINT" {
            self.console.print("\n-- interrupt\n");
            self.warm(ResetWhy::SignalHandler);
            return None;
        }

        let mut report = format!("? {}\n", error);

        for value in self.ret.slice().iter().rev() {
            if *value > 0 {
                if let Some((_, entry)) = self.dictionary.colon_containing(*value as usize) {
                    report.push_str(&format!(
                        "  at {} +{}\n",
                        self.flash.str_get(entry.name),
                        *value as usize - entry.body
                    ));
                }
            }
        }

        match self.input.current_location() {
            Some((name, line)) => report.push_str(&format!(
                "input: {} line {}: {}\n",
                self.flash.str_get(name),
                line,
                self.input.current_line()
            )),

            None => report.push_str(&format!("input: {}\n", self.input.current_line())),
        }

        self.console.print(&report);
        self.warm(ResetWhy::CatchHandler);
        None
    }

    /// Warm reset: clear the stacks, return to Interactive with the
    /// default radix, abandon any partial definition, and re-install
    /// the signal handlers.  Tracing is preserved.
    pub fn warm(&mut self, why: ResetWhy) {
        self.rollback_definition();
        self.data.clear();
        self.ret.clear();
        self.user.clear();
        self.state = State::Interactive;
        self.saved_state = State::Interactive;
        self.base = 10;
        self.pictured.active = false;
        signals::install();

        if self.trace {
            self.console.print(&format!("-- reset ({})\n", why));
        }
    }

    /// FORGET: wipe the colon definitions, restore the string cache to
    /// the boot seal, reset the radix and tracing, and carve a fresh
    /// scratch queue.
    pub fn forget(&mut self) -> error::Result<()> {
        self.frame = None;
        self.ctl_depth = 0;
        self.dictionary.forget();
        self.flash.forget()?;
        self.base = 10;
        self.trace = false;
        self.state = State::Interactive;
        self.pictured.active = false;
        Ok(())
    }

    /// Evaluate in-memory source text: push it as an input source and
    /// run tokens until it drains.  Used by the tests and collaborators.
    pub fn eval(&mut self, name: &str, text: &str) -> error::Result<()> {
        let depth_before = self.input.depth();

        self.input.push_text(&mut self.flash, name, text)?;

        while self.input.depth() > depth_before {
            let token = self.input.next_token(&mut self.console)?;

            if let Err(exception) = self.interpret_token(&token) {
                while self.input.depth() > depth_before {
                    let _ = self.input.pop(&mut self.flash);
                }

                return Err(exception);
            }
        }

        Ok(())
    }

    //////////////////////////////////////////////
    // Compiler

    pub fn comma(&mut self, value: Cell) -> error::Result<()> {
        self.flash.comma(value)
    }

    /// `:` — read a name, append a smudged entry whose body is the
    /// current `here`, and switch to Compiling.
    pub fn start_colon(&mut self) -> error::Result<()> {
        if self.frame.is_some() {
            return throw(ErrKind::BadState, ":");
        }

        let name = self.name_token(":")?;

        let here0 = self.flash.here();
        let strings0 = self.flash.string_data();
        let depth0 = self.data.depth();

        let name_addr = self.flash.str_cache(&name)?;
        let index = self.dictionary.colon_count();

        self.dictionary
            .add_colon(Entry::new(name_addr, WordCode::Colon, Flag::Undefined, here0));

        self.frame = Some(ColonFrame {
            kind: FrameKind::Named(index),
            body: here0,
            here0,
            strings0,
            depth0,
        });

        self.state = State::Compiling;
        Ok(())
    }

    /// `;` — null-terminate, unsmudge, and return to Interactive.  An
    /// unbalanced control-flow mark stack makes the definition
    /// unresolved and rolls it back.
    fn end_colon(&mut self) -> error::Result<()> {
        let (depth0, named) = match &self.frame {
            Some(frame) => (frame.depth0, matches!(frame.kind, FrameKind::Named(_))),
            None => return throw(ErrKind::BadState, ";"),
        };

        if !named || self.data.depth() != depth0 || self.ctl_depth != 0 {
            self.rollback_definition();
            self.state = State::Interactive;
            return throw(ErrKind::Unresolved, ";");
        }

        self.comma(0)?;

        self.frame = None;
        self.ctl_depth = 0;

        if let Some(entry) = self.dictionary.latest_colon_mut() {
            entry.flag = Flag::Normal;
        }

        self.state = State::Interactive;
        Ok(())
    }

    /// Abandon the open definition, restoring `here`, the string cache,
    /// and the colon table to their values at the matching `:`.
    pub fn rollback_definition(&mut self) {
        if let Some(frame) = self.frame.take() {
            self.flash.set_here(frame.here0);
            self.flash.set_string_data(frame.strings0);

            if let FrameKind::Named(index) = frame.kind {
                self.dictionary.truncate_colons(index);
            }
        }

        self.ctl_depth = 0;
    }

    /// `[` — save the state and execute following tokens immediately.
    pub fn begin_immediate(&mut self) {
        self.saved_state = self.state;
        self.state = State::Immediate;
    }

    /// `]` — restore the state saved by `[`.
    pub fn end_immediate(&mut self) {
        self.state = self.saved_state;
    }

    //////////////////////////////////////////////
    // Control-flow resolver

    /// A control structure is opening.  Typed at the keyboard this
    /// starts an anonymous transient definition so the structure can be
    /// compiled, run, and discarded.
    pub fn ctl_open(&mut self) -> error::Result<()> {
        if self.frame.is_none() {
            let here0 = self.flash.here();

            self.frame = Some(ColonFrame {
                kind: FrameKind::Transient,
                body: here0,
                here0,
                strings0: self.flash.string_data(),
                depth0: self.data.depth(),
            });

            self.state = State::Compiling;
        }

        self.ctl_depth += 1;
        Ok(())
    }

    /// A control structure closed.  When the last one in a transient
    /// definition resolves, the anonymous body runs and is discarded.
    pub fn ctl_close(&mut self) -> error::Result<()> {
        self.ctl_depth = self.ctl_depth.saturating_sub(1);

        if self.ctl_depth == 0 {
            let transient = matches!(
                &self.frame,
                Some(frame) if matches!(frame.kind, FrameKind::Transient)
            );

            if transient {
                return self.finish_transient();
            }
        }

        Ok(())
    }

    fn finish_transient(&mut self) -> error::Result<()> {
        self.comma(0)?;

        let frame = match self.frame.take() {
            Some(frame) => frame,
            None => return Ok(()),
        };

        self.ret.push(frame.body as Cell)?;

        self.state = State::Interpret;
        let result = self.do_colon();
        self.state = State::Interactive;

        // The anonymous body is scratch; discard it either way.
        self.flash.set_here(frame.here0);
        self.flash.set_string_data(frame.strings0);
        result
    }

    /// Append a placeholder branch cell and push its address.
    pub fn fwd_mark(&mut self) -> error::Result<()> {
        let addr = self.flash.here();

        self.comma(UNRESOLVED)?;
        self.data.push(addr as Cell)
    }

    /// Pop a mark and patch its cell to point at `here`.
    pub fn fwd_resolve(&mut self) -> error::Result<()> {
        let addr = self.data.pop()? as usize;
        let here = self.flash.here();

        self.flash.set(addr, here as Cell)
    }

    /// Push `here` as a backward branch target.
    pub fn bkw_mark(&mut self) -> error::Result<()> {
        let here = self.flash.here();

        self.data.push(here as Cell)
    }

    /// Pop a backward target and append it as the next branch cell.
    pub fn bkw_resolve(&mut self) -> error::Result<()> {
        let addr = self.data.pop()?;

        self.comma(addr)
    }

    //////////////////////////////////////////////
    // Pictured numeric output

    /// `<#` — seed the formatter from a cell, drawing the next scratch
    /// slot from the circular queue.  The buffer pointer starts at the
    /// end of the slot minus one, with the trailing null already
    /// placed.
    pub fn pict_begin(&mut self, value: Cell, signed: bool) -> error::Result<()> {
        let slot = self.flash.next_tmp();
        let end = slot + TMP_BUFFER_SIZE - 1;

        self.flash.set(end, 0)?;

        self.pictured = Pictured {
            active: true,
            value: if signed {
                value.unsigned_abs() as UCell
            } else {
                value as UCell
            },
            original: if signed { value } else { 0 },
            negative: false,
            base_addr: slot,
            pos: end,
        };

        Ok(())
    }

    /// `#` — emit one digit of the running value in the current base.
    pub fn pict_digit(&mut self) -> error::Result<()> {
        self.ensure_pictured("#")?;

        let base = self.base as UCell;
        let digit = (self.pictured.value % base) as usize;

        self.pictured.value /= base;
        self.pict_hold(DIGITS[digit] as char)
    }

    /// `#s` — emit digits until the running value is zero, at least
    /// one.
    pub fn pict_digits(&mut self) -> error::Result<()> {
        loop {
            self.pict_digit()?;

            if self.pictured.value == 0 {
                return Ok(());
            }
        }
    }

    /// `hold` — insert a literal character.
    pub fn pict_hold(&mut self, character: char) -> error::Result<()> {
        self.ensure_pictured("hold")?;

        if self.pictured.pos <= self.pictured.base_addr {
            return throw(ErrKind::BufOverflow, "hold");
        }

        self.pictured.pos -= 1;
        self.flash.set(self.pictured.pos, character as Cell)
    }

    /// `sign` — record whether the seeded value was negative.
    pub fn pict_sign(&mut self) -> error::Result<()> {
        self.ensure_pictured("sign")?;
        self.pictured.negative = self.pictured.original < 0;
        Ok(())
    }

    /// `#>` — finish: prefix the recorded sign, drop the running
    /// value, and return the pointer to the first character.
    pub fn pict_end(&mut self) -> error::Result<usize> {
        self.ensure_pictured("#>")?;

        if self.pictured.negative {
            self.pict_hold('-')?;
        }

        self.pictured.active = false;
        Ok(self.pictured.pos)
    }

    fn ensure_pictured(&self, who: &str) -> error::Result<()> {
        if !self.pictured.active {
            throw(ErrKind::BadState, who)?;
        }

        Ok(())
    }

    //////////////////////////////////////////////
    // Output helpers

    /// Print the nul-terminated string at a flash address.
    pub fn type_str(&mut self, addr: usize) -> error::Result<()> {
        let text = self.flash.str_get(addr);

        self.console.print(&text);
        Ok(())
    }

    /// Print a cell through the pictured formatter, followed by a
    /// space.  `.` and `u.` are this with and without the sign.
    pub fn print_cell(&mut self, value: Cell, signed: bool) -> error::Result<()> {
        self.pict_begin(value, signed)?;
        self.pict_digits()?;

        if signed {
            self.pict_sign()?;
        }

        let addr = self.pict_end()?;

        self.type_str(addr)?;
        self.console.print(" ");
        Ok(())
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Register a normal native word with the machine.
#[macro_export]
macro_rules! add_word {
    ($machine:expr, $name:expr, $function:expr, $description:expr, $signature:expr) => {
        $machine.add_primitive(
            $name,
            $crate::runtime::data_structures::dictionary::Flag::Normal,
            $function,
            $description,
            $signature,
        )
    };
}

/// Register an immediate native word with the machine: one that runs at
/// compile time.
#[macro_export]
macro_rules! add_immediate_word {
    ($machine:expr, $name:expr, $function:expr, $description:expr, $signature:expr) => {
        $machine.add_primitive(
            $name,
            $crate::runtime::data_structures::dictionary::Flag::Immediate,
            $function,
            $description,
            $signature,
        )
    };
}

//////////////////////////////////////////////
/// TESTS
///
#[cfg(test)]
mod tests {
    use super::*;

    fn eval_ok(machine: &mut Machine, source: &str) {
        machine
            .eval("<test>", source)
            .unwrap_or_else(|error| panic!("eval failed on {:?}: {}", source, error));
    }

    #[test]
    fn literals_land_on_the_data_stack() {
        let mut machine = Machine::boot_capturing();

        eval_ok(&mut machine, "1 2 3");
        assert_eq!(machine.data.slice(), &[1, 2, 3]);
    }

    #[test]
    fn colon_definitions_execute_threaded() {
        let mut machine = Machine::boot_capturing();

        eval_ok(&mut machine, ": sq dup * ; 7 sq");
        assert_eq!(machine.data.slice(), &[49]);
    }

    #[test]
    fn a_failed_compile_rolls_the_arena_back() {
        let mut machine = Machine::boot_capturing();

        let here = machine.flash.here();
        let strings = machine.flash.string_data();
        let result = machine.eval("<test>", ": broken dup nonsense-word ;");

        match result {
            Err(Exception::Error(error)) => assert_eq!(error.kind, ErrKind::BadString),
            other => panic!("unexpected result: {:?}", other),
        }

        assert_eq!(machine.flash.here(), here);
        assert_eq!(machine.flash.string_data(), strings);
        assert_eq!(machine.dictionary.colon_count(), 0);
    }

    #[test]
    fn unresolved_definitions_are_rejected() {
        let mut machine = Machine::boot_capturing();

        let result = machine.eval("<test>", ": broken 1 if 2 ;");

        match result {
            Err(Exception::Error(error)) => assert_eq!(error.kind, ErrKind::Unresolved),
            other => panic!("unexpected result: {:?}", other),
        }

        assert_eq!(machine.dictionary.colon_count(), 0);
    }

    #[test]
    fn warm_reset_leaves_a_usable_machine() {
        let mut machine = Machine::boot_capturing();

        eval_ok(&mut machine, "16 base! 1 2 3");
        machine.warm(ResetWhy::CatchHandler);

        assert_eq!(machine.data.depth(), 0);
        assert_eq!(machine.base, 10);
        assert_eq!(machine.state, State::Interactive);

        eval_ok(&mut machine, "4 5");
        assert_eq!(machine.data.slice(), &[4, 5]);
    }

    #[test]
    fn forget_twice_is_forget_once() {
        let mut machine = Machine::boot_capturing();

        eval_ok(&mut machine, ": one 1 ; : two 2 ;");
        machine.forget().unwrap();

        let here = machine.flash.here();
        let strings = machine.flash.string_data();

        machine.forget().unwrap();
        assert_eq!(machine.flash.here(), here);
        assert_eq!(machine.flash.string_data(), strings);
        assert_eq!(machine.dictionary.colon_count(), 0);
    }
}
