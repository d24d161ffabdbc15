use std::{
    fs::File,
    io::{self, BufRead, BufReader},
};

/// Nominal capacity reserved for a source's line buffer.
pub const SOURCE_BUF_SIZE: usize = 132;

/// The sentinel token the scanner produces when a source's read returns
/// zero bytes.  The dictionary binds it to the primitive that pops the
/// current input source.
pub const EOF_TOKEN: &str = "<eof>";

/// Where an input source's bytes come from.  Handle 0 is the keyboard;
/// files are pushed above it by `-i` and `include`.  Text sources hold
/// in-memory source code, used for string evaluation and by the tests.
pub enum SourceHandle {
    Keyboard,
    File(BufReader<File>),
    Text { text: String, offset: usize },
}

/// One nested input source: its handle, a refillable line buffer, and
/// the scanner state that walks it.
pub struct InputSource {
    /// Where refills come from.
    pub handle: SourceHandle,

    /// The line buffer most recently read from the handle.
    pub buf: String,

    /// The count of bytes last read into the buffer.
    pub len: usize,

    /// The byte cursor within the buffer.
    pub cursor: usize,

    /// The 1 based line counter, bumped when the scanner consumes a
    /// line feed.
    pub line: u32,

    /// One-shot end-of-line flag, armed by the scanner and consumed by
    /// the line comment word.
    pub eol: bool,

    /// Flash address of the source's interned name.
    pub name: usize,
}

impl InputSource {
    pub fn new(handle: SourceHandle, name: usize) -> InputSource {
        InputSource {
            handle,
            buf: String::with_capacity(SOURCE_BUF_SIZE),
            len: 0,
            cursor: 0,
            line: 1,
            eol: false,
            name,
        }
    }

    pub fn keyboard(name: usize) -> InputSource {
        InputSource::new(SourceHandle::Keyboard, name)
    }

    pub fn file(file: File, name: usize) -> InputSource {
        InputSource::new(SourceHandle::File(BufReader::new(file)), name)
    }

    pub fn text(text: &str, name: usize) -> InputSource {
        InputSource::new(
            SourceHandle::Text {
                text: text.to_string(),
                offset: 0,
            },
            name,
        )
    }

    pub fn is_keyboard(&self) -> bool {
        matches!(self.handle, SourceHandle::Keyboard)
    }

    /// Read the next line from the handle into the buffer, resetting the
    /// cursor.  Returns the count of bytes read; zero means the handle
    /// is exhausted.
    pub fn refill(&mut self) -> io::Result<usize> {
        self.buf.clear();
        self.cursor = 0;

        let count = match &mut self.handle {
            SourceHandle::Keyboard => io::stdin().lock().read_line(&mut self.buf)?,

            SourceHandle::File(reader) => reader.read_line(&mut self.buf)?,

            SourceHandle::Text { text, offset } => {
                if *offset >= text.len() {
                    0
                } else {
                    let rest = &text[*offset..];
                    let end = rest.find('\n').map(|index| index + 1).unwrap_or(rest.len());

                    self.buf.push_str(&rest[..end]);
                    *offset += end;
                    end
                }
            }
        };

        self.len = count;
        Ok(count)
    }

    /// Peek at the next byte in the buffer without consuming it.
    pub fn peek_byte(&self) -> Option<u8> {
        self.buf.as_bytes().get(self.cursor).copied()
    }

    /// Consume and return the next byte in the buffer, maintaining the
    /// line counter and the one-shot end-of-line flag.
    pub fn next_byte(&mut self) -> Option<u8> {
        let next = self.peek_byte()?;

        self.cursor += 1;

        match next {
            b'\n' => {
                self.line += 1;
                self.eol = true;
            }

            b'\r' => self.eol = true,

            _ => {}
        }

        Some(next)
    }

    /// Extract the next whitespace-delimited token from the buffer, or
    /// None if the buffer drains before one is found.  The caller is
    /// expected to refill and retry.
    pub fn scan_token(&mut self) -> Option<String> {
        while let Some(next) = self.peek_byte() {
            if is_whitespace(next) {
                let _ = self.next_byte();
            } else {
                break;
            }
        }

        let start = self.cursor;

        while let Some(next) = self.peek_byte() {
            if is_whitespace(next) {
                break;
            }

            let _ = self.next_byte();
        }

        if self.cursor == start {
            None
        } else {
            Some(self.buf[start..self.cursor].to_string())
        }
    }

    /// Collect bytes up to (and consuming) the delimiter.  Returns the
    /// collected text and whether the delimiter was actually found
    /// before the buffer drained.
    pub fn scan_until(&mut self, delimiter: u8) -> (String, bool) {
        let mut collected = Vec::new();

        while let Some(next) = self.next_byte() {
            if next == delimiter {
                return (String::from_utf8_lossy(&collected).into_owned(), true);
            }

            collected.push(next);
        }

        (String::from_utf8_lossy(&collected).into_owned(), false)
    }

    /// Skip the remainder of the current line.  If the scanner already
    /// crossed onto a new line while finding the previous token, the
    /// armed end-of-line flag is consumed instead and nothing is
    /// skipped.
    pub fn skip_line(&mut self) {
        if self.eol {
            self.eol = false;
            return;
        }

        self.cursor = self.len;
    }
}

/// The token delimiters: space, tab, carriage return, line feed.
pub fn is_whitespace(byte: u8) -> bool {
    byte == b' ' || byte == b'\t' || byte == b'\r' || byte == b'\n'
}

//////////////////////////////////////////////
/// TESTS
///
#[cfg(test)]
mod tests {
    use super::*;

    fn text_source(source: &str) -> InputSource {
        InputSource::text(source, 0)
    }

    fn all_tokens(source: &mut InputSource) -> Vec<String> {
        let mut tokens = Vec::new();

        loop {
            if let Some(token) = source.scan_token() {
                tokens.push(token);
            } else if source.refill().unwrap() == 0 {
                break;
            }
        }

        tokens
    }

    #[test]
    fn tokenizes_across_lines() {
        let mut source = text_source("1 2 +\n  dup .\n");
        assert_eq!(all_tokens(&mut source), ["1", "2", "+", "dup", "."]);
        assert_eq!(source.line, 3);
    }

    #[test]
    fn eol_flag_is_one_shot() {
        let mut source = text_source("a\nb");
        source.refill().unwrap();

        assert_eq!(source.scan_token().as_deref(), Some("a"));
        assert!(!source.eol);

        // Looking for `b` consumes the newline, which arms the flag.
        assert!(source.scan_token().is_none());
        assert!(source.eol);

        source.skip_line();
        assert!(!source.eol);
    }

    #[test]
    fn skip_line_discards_the_rest_of_the_buffer() {
        let mut source = text_source("\\ a comment line\nnext\n");
        source.refill().unwrap();

        assert_eq!(source.scan_token().as_deref(), Some("\\"));
        source.skip_line();
        assert!(source.scan_token().is_none());

        source.refill().unwrap();
        assert_eq!(source.scan_token().as_deref(), Some("next"));
    }

    #[test]
    fn scan_until_reports_missing_delimiter() {
        let mut source = text_source("hello world) tail\n");
        source.refill().unwrap();

        let (text, found) = source.scan_until(b')');
        assert!(found);
        assert_eq!(text, "hello world");

        let (rest, found) = source.scan_until(b')');
        assert!(!found);
        assert_eq!(rest, " tail\n");
    }

    #[test]
    fn text_source_refills_line_by_line() {
        let mut source = text_source("one\ntwo");

        assert_eq!(source.refill().unwrap(), 4);
        assert_eq!(source.buf, "one\n");
        assert_eq!(source.refill().unwrap(), 3);
        assert_eq!(source.buf, "two");
        assert_eq!(source.refill().unwrap(), 0);
    }
}
