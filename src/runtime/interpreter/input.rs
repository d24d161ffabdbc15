use crate::{
    lang::source::{EOF_TOKEN, InputSource},
    runtime::{
        data_structures::flash::Flash,
        error::{self, ErrKind, throw},
        interpreter::console::Console,
    },
};
use std::{
    env::var,
    fs::File,
    path::{Path, PathBuf},
};

/// Maximum number of nested input sources: the keyboard plus included
/// files including files.
pub const INPUT_STACK_DEPTH: usize = 4;

/// Environment variable naming the fallback directory for include
/// files.
pub const PATH_VAR: &str = "OFF_PATH";

/// The stack of nested input sources.  Source 0 is the keyboard; `-i`
/// and `include` push files above it, and string evaluation pushes
/// in-memory text sources.
pub struct InputStack {
    sources: Vec<InputSource>,
}

impl InputStack {
    pub fn new() -> InputStack {
        InputStack {
            sources: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.sources.len()
    }

    fn check_room(&self) -> error::Result<()> {
        if self.sources.len() >= INPUT_STACK_DEPTH {
            throw(ErrKind::InStack, "input")?;
        }

        Ok(())
    }

    /// Seat the keyboard at the bottom of the stack.  Called once at
    /// boot.
    pub fn push_keyboard(&mut self, flash: &mut Flash) -> error::Result<()> {
        self.check_room()?;

        let name = flash.str_cache("console")?;

        self.sources.push(InputSource::keyboard(name));
        Ok(())
    }

    /// Push a file source, resolving the bare name against the current
    /// directory and then the `OFF_PATH` fallback.
    pub fn push_file(&mut self, flash: &mut Flash, path: &str) -> error::Result<()> {
        self.check_room()?;

        let resolved = resolve_path(path)?;

        let file = match File::open(&resolved) {
            Ok(file) => file,
            Err(_) => return throw(ErrKind::NoFile, path),
        };

        let name = flash.str_cache(&resolved.to_string_lossy())?;

        self.sources.push(InputSource::file(file, name));
        Ok(())
    }

    /// Push an in-memory text source.
    pub fn push_text(&mut self, flash: &mut Flash, name: &str, text: &str) -> error::Result<()> {
        self.check_room()?;

        let name = flash.str_cache(name)?;

        self.sources.push(InputSource::text(text, name));
        Ok(())
    }

    /// Pop the current source, returning it so the caller can decide
    /// what its removal means.  The source's interned name is released
    /// when it is still the top of the string cache; names buried under
    /// newer strings (definition names, cached literals) stay put.
    pub fn pop(&mut self, flash: &mut Flash) -> error::Result<InputSource> {
        match self.sources.pop() {
            Some(source) => {
                let _ = flash.str_uncache(source.name);
                Ok(source)
            }

            None => throw(ErrKind::NoInput, "input"),
        }
    }

    pub fn current(&mut self) -> error::Result<&mut InputSource> {
        match self.sources.last_mut() {
            Some(source) => Ok(source),
            None => throw(ErrKind::NoInput, "input"),
        }
    }

    /// The current source's line buffer, reported in diagnostics.
    pub fn current_line(&self) -> &str {
        match self.sources.last() {
            Some(source) => source.buf.trim_end_matches(['\r', '\n']),
            None => "",
        }
    }

    /// The current source's interned name address and line counter,
    /// reported in diagnostics.
    pub fn current_location(&self) -> Option<(usize, u32)> {
        self.sources.last().map(|source| (source.name, source.line))
    }

    /// Return the next whitespace-delimited token from the current
    /// source, refilling its buffer as needed.  The keyboard prompts
    /// before each refill.  A zero-length read produces the `<eof>`
    /// sentinel, which the dictionary binds to the source-popping
    /// primitive.
    pub fn next_token(&mut self, console: &mut Console) -> error::Result<String> {
        loop {
            let source = self.current()?;

            if let Some(token) = source.scan_token() {
                return Ok(token);
            }

            if source.is_keyboard() {
                console.print("ok ");
                console.flush();
            }

            let count = source.refill()?;

            if count == 0 {
                return Ok(EOF_TOKEN.to_string());
            }
        }
    }

    /// Collect raw bytes from the current source up to the delimiter,
    /// spanning refills.  Reports whether the delimiter was found
    /// before the source ran dry.
    pub fn scan_until(&mut self, delimiter: u8) -> error::Result<(String, bool)> {
        let mut collected = String::new();

        loop {
            let source = self.current()?;
            let (piece, found) = source.scan_until(delimiter);

            collected.push_str(&piece);

            if found {
                return Ok((collected, true));
            }

            if source.refill()? == 0 {
                return Ok((collected, false));
            }
        }
    }
}

impl Default for InputStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve an include-file name: the bare name first, then
/// `$OFF_PATH/<name>`.
fn resolve_path(name: &str) -> error::Result<PathBuf> {
    let direct = Path::new(name);

    if direct.exists() {
        return Ok(direct.to_path_buf());
    }

    if let Ok(prefix) = var(PATH_VAR) {
        let fallback = Path::new(&prefix).join(name);

        if fallback.exists() {
            return Ok(fallback);
        }
    }

    throw(ErrKind::NoFile, name)
}

//////////////////////////////////////////////
/// TESTS
///
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_flow_from_a_text_source() {
        let mut flash = Flash::new();
        let mut console = Console::capturing();
        let mut input = InputStack::new();

        input.push_text(&mut flash, "<test>", "1 2 +\n").unwrap();

        assert_eq!(input.next_token(&mut console).unwrap(), "1");
        assert_eq!(input.next_token(&mut console).unwrap(), "2");
        assert_eq!(input.next_token(&mut console).unwrap(), "+");
        assert_eq!(input.next_token(&mut console).unwrap(), EOF_TOKEN);
    }

    #[test]
    fn the_stack_has_a_ceiling() {
        let mut flash = Flash::new();
        let mut input = InputStack::new();

        for index in 0..INPUT_STACK_DEPTH {
            input
                .push_text(&mut flash, "<test>", &format!("{}", index))
                .unwrap();
        }

        assert!(input.push_text(&mut flash, "<test>", "over").is_err());
    }

    #[test]
    fn popping_an_empty_stack_is_no_input() {
        let mut flash = Flash::new();
        let mut input = InputStack::new();

        assert!(input.pop(&mut flash).is_err());
    }

    #[test]
    fn popping_releases_the_interned_name() {
        let mut flash = Flash::new();
        let mut input = InputStack::new();
        let before = flash.string_data();

        input.push_text(&mut flash, "<test>", "1 2").unwrap();
        assert!(flash.string_data() < before);

        input.pop(&mut flash).unwrap();
        assert_eq!(flash.string_data(), before);
    }

    #[test]
    fn missing_files_raise_no_file() {
        let mut flash = Flash::new();
        let mut input = InputStack::new();

        assert!(
            input
                .push_file(&mut flash, "definitely-not-present.fs")
                .is_err()
        );
    }
}
