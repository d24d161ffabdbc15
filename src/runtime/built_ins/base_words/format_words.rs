use crate::{
    add_word,
    lang::numbers::base_in_range,
    runtime::{
        data_structures::Cell,
        error::{self, ErrKind, throw},
        interpreter::Machine,
    },
};

/// `<#` — start pictured output from the top cell.
fn word_pict_begin(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.pop()?;

    machine.pict_begin(value, true)
}

/// `#` — emit one digit in the current base.
fn word_pict_digit(machine: &mut Machine) -> error::Result<()> {
    machine.pict_digit()
}

/// `#s` — emit digits until the running value is zero.
fn word_pict_digits(machine: &mut Machine) -> error::Result<()> {
    machine.pict_digits()
}

/// `hold` — insert a literal character.
fn word_hold(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.pop()?;

    match char::from_u32(value as u32) {
        Some(character) => machine.pict_hold(character),
        None => throw(ErrKind::Range, "hold"),
    }
}

/// `sign` — record the seeded value's sign for `#>`.
fn word_sign(machine: &mut Machine) -> error::Result<()> {
    machine.pict_sign()
}

/// `#>` — finish pictured output, leaving the string pointer.
fn word_pict_end(machine: &mut Machine) -> error::Result<()> {
    let addr = machine.pict_end()?;

    machine.data.push(addr as Cell)
}

/// `.` — print the top cell, signed, in the current base.
fn word_dot(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.pop()?;

    machine.print_cell(value, true)
}

/// `u.` — print the top cell as unsigned.
fn word_u_dot(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.pop()?;

    machine.print_cell(value, false)
}

/// `base@` — push the current radix.
fn word_base_fetch(machine: &mut Machine) -> error::Result<()> {
    machine.data.push(machine.base as Cell)
}

/// `base!` — set the radix, checked against 2..36.
fn word_base_store(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.pop()?;

    if value < 0 || !base_in_range(value as u32) {
        return throw(ErrKind::BadBase, "base!");
    }

    machine.base = value as u32;
    Ok(())
}

fn word_hex(machine: &mut Machine) -> error::Result<()> {
    machine.base = 16;
    Ok(())
}

fn word_decimal(machine: &mut Machine) -> error::Result<()> {
    machine.base = 10;
    Ok(())
}

/// Register the pictured numeric output and radix words.
pub fn register_format_words(machine: &mut Machine) {
    add_word!(machine, "<#", word_pict_begin, "Start pictured output.", "n -- ");
    add_word!(machine, "#", word_pict_digit, "Emit one digit.", " -- ");
    add_word!(machine, "#s", word_pict_digits, "Emit digits until zero.", " -- ");
    add_word!(machine, "hold", word_hold, "Insert a literal character.", "char -- ");
    add_word!(machine, "sign", word_sign, "Record the seeded value's sign.", " -- ");
    add_word!(machine, "#>", word_pict_end, "Finish pictured output.", " -- addr");

    add_word!(machine, ".", word_dot, "Print the top cell, signed.", "n -- ");
    add_word!(machine, "u.", word_u_dot, "Print the top cell, unsigned.", "n -- ");

    add_word!(machine, "base@", word_base_fetch, "Push the current radix.", " -- base");
    add_word!(machine, "base!", word_base_store, "Set the radix, 2..36.", "base -- ");
    add_word!(machine, "hex", word_hex, "Set the radix to sixteen.", " -- ");
    add_word!(machine, "decimal", word_decimal, "Set the radix to ten.", " -- ");
}
