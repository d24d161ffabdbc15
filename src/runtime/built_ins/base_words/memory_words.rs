use crate::{
    add_word,
    runtime::{
        data_structures::{CELL_BYTES, Cell},
        error::{self, ErrKind, throw},
        interpreter::Machine,
    },
};

/// Fetch the cell at an address.
///
/// Signature: `addr -- n`
fn word_fetch(machine: &mut Machine) -> error::Result<()> {
    let addr = machine.data.pop()?;
    let value = machine.flash.get(addr as usize)?;

    machine.data.push(value)
}

/// Store a cell at an address.
///
/// Signature: `n addr -- `
fn word_store(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "!")?;

    let addr = machine.data.pop()?;
    let value = machine.data.pop()?;

    machine.flash.set(addr as usize, value)
}

/// Add to the cell at an address.
///
/// Signature: `n addr -- `
fn word_plus_store(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "+!")?;

    let addr = machine.data.pop()? as usize;
    let value = machine.data.pop()?;
    let current = machine.flash.get(addr)?;

    machine.flash.set(addr, current.wrapping_add(value))
}

/// Push the dictionary allocation pointer.
///
/// Signature: ` -- addr`
fn word_here(machine: &mut Machine) -> error::Result<()> {
    let here = machine.flash.here();

    machine.data.push(here as Cell)
}

/// Append the top cell to the dictionary.
///
/// Signature: `n -- `
fn word_comma(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.pop()?;

    machine.comma(value)
}

/// Reserve cells in the dictionary, zero filled.
///
/// Signature: `count -- `
fn word_allot(machine: &mut Machine) -> error::Result<()> {
    let count = machine.data.pop()?;

    if count < 0 {
        return throw(ErrKind::Range, "allot");
    }

    let _ = machine.flash.allot(count as usize)?;
    Ok(())
}

/// Push the cell width in bytes.
///
/// Signature: ` -- bytes`
fn word_cellsize(machine: &mut Machine) -> error::Result<()> {
    machine.data.push(CELL_BYTES as Cell)
}

/// Register the fetch, store, and dictionary-space words.
pub fn register_memory_words(machine: &mut Machine) {
    add_word!(machine, "@", word_fetch, "Fetch the cell at an address.", "addr -- n");
    add_word!(machine, "!", word_store, "Store a cell at an address.", "n addr -- ");
    add_word!(machine, "+!", word_plus_store, "Add to the cell at an address.", "n addr -- ");
    add_word!(machine, "here", word_here, "Push the allocation pointer.", " -- addr");
    add_word!(machine, ",", word_comma, "Append the top cell to the dictionary.", "n -- ");
    add_word!(machine, "allot", word_allot, "Reserve zeroed cells.", "count -- ");
    add_word!(machine, "cellsize", word_cellsize, "Push the cell width in bytes.", " -- bytes");
}
