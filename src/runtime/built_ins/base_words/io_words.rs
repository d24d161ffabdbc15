use crate::{
    add_immediate_word, add_word,
    runtime::{
        data_structures::Cell,
        error::{self, ErrKind, Exception, throw},
        interpreter::{Machine, State},
    },
};

/// Drop the single blank that separates a capturing word from its
/// text.
fn skip_one_blank(machine: &mut Machine) -> error::Result<()> {
    let source = machine.input.current()?;

    if source.peek_byte() == Some(b' ') {
        let _ = source.next_byte();
    }

    Ok(())
}

/// Capture text from the input up to the next `"`.
fn capture_string(machine: &mut Machine, who: &str) -> error::Result<String> {
    skip_one_blank(machine)?;

    let (text, found) = machine.input.scan_until(b'"')?;

    if !found {
        return throw(ErrKind::BadString, who);
    }

    Ok(text)
}

/// `emit` — print the top cell as a character.
fn word_emit(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.pop()?;

    match u32::try_from(value).ok().and_then(char::from_u32) {
        Some(character) => {
            machine.console.print_char(character);
            Ok(())
        }

        None => throw(ErrKind::Range, "emit"),
    }
}

/// `cr` — print a newline.
fn word_cr(machine: &mut Machine) -> error::Result<()> {
    machine.console.print("\n");
    Ok(())
}

/// `space` — print one blank.
fn word_space(machine: &mut Machine) -> error::Result<()> {
    machine.console.print(" ");
    Ok(())
}

/// `spaces` — print the given number of blanks.
fn word_spaces(machine: &mut Machine) -> error::Result<()> {
    let count = machine.data.pop()?;

    if count < 0 {
        return throw(ErrKind::Range, "spaces");
    }

    for _ in 0..count {
        machine.console.print(" ");
    }

    Ok(())
}

/// `type` — print the nul-terminated string at the popped address.
fn word_type(machine: &mut Machine) -> error::Result<()> {
    let addr = machine.data.pop()?;

    machine.type_str(addr as usize)
}

/// `"` — capture a string literal.  Compiling caches it and compiles a
/// literal of its address; otherwise the address is pushed.
fn word_quote(machine: &mut Machine) -> error::Result<()> {
    let text = capture_string(machine, "\"")?;
    let addr = machine.flash.str_cache(&text)?;

    if machine.state == State::Compiling {
        let literal = machine.xt_literal();

        machine.comma(literal)?;
        machine.comma(addr as Cell)
    } else {
        machine.data.push(addr as Cell)
    }
}

/// `."` — capture a string literal and print it; compiling defers the
/// printing to run time.
fn word_dot_quote(machine: &mut Machine) -> error::Result<()> {
    let text = capture_string(machine, ".\"")?;

    if machine.state == State::Compiling {
        let addr = machine.flash.str_cache(&text)?;
        let literal = machine.xt_literal();
        let type_xt = machine.xt_type();

        machine.comma(literal)?;
        machine.comma(addr as Cell)?;
        machine.comma(type_xt)
    } else {
        machine.console.print(&text);
        Ok(())
    }
}

/// `.(` — print the remainder up to `)` immediately, in any state.
fn word_dot_paren(machine: &mut Machine) -> error::Result<()> {
    skip_one_blank(machine)?;

    let (text, found) = machine.input.scan_until(b')')?;

    if !found {
        return throw(ErrKind::BadString, ".(");
    }

    machine.console.print(&text);
    Ok(())
}

/// `(` — inline comment, discarded up to `)`.
fn word_paren(machine: &mut Machine) -> error::Result<()> {
    let (_, found) = machine.input.scan_until(b')')?;

    if !found {
        return throw(ErrKind::BadString, "(");
    }

    Ok(())
}

/// `\` — comment to end of line.
fn word_backslash(machine: &mut Machine) -> error::Result<()> {
    machine.input.current()?.skip_line();
    Ok(())
}

/// `include <file>` — push a file onto the input stack.
fn word_include(machine: &mut Machine) -> error::Result<()> {
    let name = machine.name_token("include")?;

    machine.input.push_file(&mut machine.flash, &name)
}

/// The `<eof>` sentinel: pop the drained source.  Draining the source
/// above the keyboard triggers the one-shot deferred word scheduled by
/// `-x`; draining the keyboard itself means there is no input left.
fn word_eof(machine: &mut Machine) -> error::Result<()> {
    let _ = machine.input.pop(&mut machine.flash)?;

    if machine.input.depth() <= 1 {
        if let Some(word) = machine.take_deferred() {
            match machine.dictionary.lookup(&machine.flash, &word) {
                Some(xt) => machine.execute(xt)?,
                None => throw(ErrKind::NoWord, &word)?,
            }
        }
    }

    if machine.input.depth() == 0 {
        throw(ErrKind::NoInput, "<eof>")?;
    }

    Ok(())
}

/// `bye` — leave the interpreter.
fn word_bye(_machine: &mut Machine) -> error::Result<()> {
    Err(Exception::Bye(0))
}

/// Register the character output, string, comment, and input-source
/// words.
pub fn register_io_words(machine: &mut Machine) {
    add_word!(machine, "emit", word_emit, "Print the top cell as a character.", "char -- ");
    add_word!(machine, "cr", word_cr, "Print a newline.", " -- ");
    add_word!(machine, "space", word_space, "Print one blank.", " -- ");
    add_word!(machine, "spaces", word_spaces, "Print counted blanks.", "count -- ");
    add_word!(machine, "type", word_type, "Print the string at an address.", "addr -- ");

    add_immediate_word!(machine, "\"", word_quote,
        "Capture a string literal.", " -- addr");
    add_immediate_word!(machine, ".\"", word_dot_quote,
        "Capture and print a string literal.", " -- ");
    add_immediate_word!(machine, ".(", word_dot_paren,
        "Print up to the closing paren.", " -- ");
    add_immediate_word!(machine, "(", word_paren,
        "Inline comment.", " -- ");
    add_immediate_word!(machine, "\\", word_backslash,
        "Comment to end of line.", " -- ");

    add_word!(machine, "include", word_include,
        "Read a source file on the input stack.", " -- ");
    add_immediate_word!(machine, "<eof>", word_eof,
        "Pop the drained input source.", " -- ");
    add_word!(machine, "bye", word_bye, "Leave the interpreter.", " -- ");
}
