use crate::{
    add_word,
    lang::numbers::format_cell,
    runtime::{
        data_structures::dictionary::{Flag, WordCode},
        error::{self, ErrKind, Exception, ResetWhy, throw},
        interpreter::Machine,
    },
};

/// `.s` — dump the data stack without disturbing it.
fn word_dot_s(machine: &mut Machine) -> error::Result<()> {
    let mut line = String::from("( ");

    for value in machine.data.slice() {
        line.push_str(&format_cell(*value, machine.base));
        line.push(' ');
    }

    line.push_str(")\n");
    machine.console.print(&line);
    Ok(())
}

/// `words` — list the dictionary, colon definitions newest first.
fn word_words(machine: &mut Machine) -> error::Result<()> {
    let mut listing = String::new();
    let mut count = 0;

    let mut width = 0;

    for (_, entry) in machine.dictionary.iter_listing() {
        width = width.max(machine.flash.str_len(entry.name));
    }

    for (_, entry) in machine.dictionary.iter_listing() {
        let name = machine.flash.str_get(entry.name);
        let marker = match entry.flag {
            Flag::Immediate => "  immediate",
            _ => "           ",
        };

        listing.push_str(&format!("{:width$}{}", name, marker, width = width));

        if !entry.help.is_empty() {
            listing.push_str(&format!("  --  {}", entry.help));
        }

        listing.push('\n');
        count += 1;
    }

    listing.push_str(&format!("{} words defined.\n", count));
    machine.console.print(&listing);
    Ok(())
}

/// `see <name>` — the simple decompiler view.
fn word_see(machine: &mut Machine) -> error::Result<()> {
    let name = machine.name_token("see")?;

    let xt = match machine.dictionary.lookup(&machine.flash, &name) {
        Some(xt) => xt,
        None => return throw(ErrKind::NoWord, &name),
    };

    let (code, body) = {
        let entry = machine.dictionary.entry(xt)?;
        (entry.code, entry.body)
    };

    let listing = match code {
        WordCode::Native(_) => format!("{} is a primitive\n", name),

        WordCode::Constant => {
            let value = machine.flash.get(body)?;

            format!(
                "{} is a constant: {}\n",
                name,
                format_cell(value, machine.base)
            )
        }

        WordCode::PushBody => format!("{} pushes its body at {}\n", name, body),

        WordCode::Colon => decompile(machine, &name, body)?,
    };

    machine.console.print(&listing);
    Ok(())
}

/// Walk a colon body, naming each cell and annotating literal values
/// and branch targets.
fn decompile(machine: &Machine, name: &str, body: usize) -> error::Result<String> {
    let literal = machine.xt_literal();
    let branch = machine.xt_branch();
    let qbranch = machine.xt_qbranch();

    let mut listing = format!(": {}\n", name);
    let mut cursor = body;

    loop {
        let cell = machine.flash.get(cursor)?;

        if cell == 0 {
            listing.push_str(&format!("{:5}  ;\n", cursor));
            return Ok(listing);
        }

        let word_name = match machine.dictionary.entry(cell) {
            Ok(entry) => machine.flash.str_get(entry.name),
            Err(_) => format!("?{}", cell),
        };

        if cell == literal {
            let value = machine.flash.get(cursor + 1)?;

            listing.push_str(&format!(
                "{:5}  (literal) {}\n",
                cursor,
                format_cell(value, machine.base)
            ));
            cursor += 2;
        } else if cell == branch || cell == qbranch {
            let target = machine.flash.get(cursor + 1)?;

            listing.push_str(&format!("{:5}  {} -> {}\n", cursor, word_name, target));
            cursor += 2;
        } else {
            listing.push_str(&format!("{:5}  {}\n", cursor, word_name));
            cursor += 1;
        }
    }
}

/// `trace` — pop a flag to turn dispatch tracing on or off.
fn word_trace(machine: &mut Machine) -> error::Result<()> {
    let flag = machine.data.pop()?;

    machine.trace = flag != 0;
    Ok(())
}

/// `warm` — soft restart: stacks cleared, state Interactive.
fn word_warm(_machine: &mut Machine) -> error::Result<()> {
    Err(Exception::Reset(ResetWhy::User))
}

/// `cold` — hard restart: FORGET plus a warm reset.
fn word_cold(_machine: &mut Machine) -> error::Result<()> {
    Err(Exception::Reset(ResetWhy::ColdStart))
}

/// Register the introspection and reset words.
pub fn register_tool_words(machine: &mut Machine) {
    add_word!(machine, ".s", word_dot_s, "Dump the data stack.", " -- ");
    add_word!(machine, "words", word_words, "List the dictionary.", " -- ");
    add_word!(machine, "see", word_see, "Decompile a word.", " -- ");
    add_word!(machine, "trace", word_trace, "Set dispatch tracing.", "flag -- ");
    add_word!(machine, "warm", word_warm, "Soft restart.", " -- ");
    add_word!(machine, "cold", word_cold, "Hard restart.", " -- ");
}
