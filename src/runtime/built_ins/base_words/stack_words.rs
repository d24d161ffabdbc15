use crate::{
    add_word,
    runtime::{
        data_structures::Cell,
        error::{self},
        interpreter::{Machine, State},
    },
};

/// Duplicate the top cell.
///
/// Signature: `n -- n n`
fn word_dup(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(1, "dup")?;

    let value = machine.data.pop()?;

    machine.data.push(value)?;
    machine.data.push(value)
}

/// Discard the top cell.
///
/// Signature: `n -- `
fn word_drop(machine: &mut Machine) -> error::Result<()> {
    let _ = machine.data.pop()?;

    Ok(())
}

/// Swap the top two cells.
///
/// Signature: `a b -- b a`
fn word_swap(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "swap")?;

    let b = machine.data.pop()?;
    let a = machine.data.pop()?;

    machine.data.push(b)?;
    machine.data.push(a)
}

/// Copy the second cell over the top.
///
/// Signature: `a b -- a b a`
fn word_over(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "over")?;

    let a = machine.data.peek(1)?;

    machine.data.push(a)
}

/// Rotate the third cell to the top.
///
/// Signature: `a b c -- b c a`
fn word_rot(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(3, "rot")?;

    let c = machine.data.pop()?;
    let b = machine.data.pop()?;
    let a = machine.data.pop()?;

    machine.data.push(b)?;
    machine.data.push(c)?;
    machine.data.push(a)
}

/// Drop the cell under the top.
///
/// Signature: `a b -- b`
fn word_nip(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "nip")?;

    let b = machine.data.pop()?;
    let _ = machine.data.pop()?;

    machine.data.push(b)
}

/// Copy the top cell under the second.
///
/// Signature: `a b -- b a b`
fn word_tuck(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "tuck")?;

    let b = machine.data.pop()?;
    let a = machine.data.pop()?;

    machine.data.push(b)?;
    machine.data.push(a)?;
    machine.data.push(b)
}

/// Duplicate the top cell only when it is non-zero.
///
/// Signature: `n -- n n | 0`
fn word_question_dup(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.peek(0)?;

    if value != 0 {
        machine.data.push(value)?;
    }

    Ok(())
}

/// Signature: `a b -- a b a b`
fn word_two_dup(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "2dup")?;

    let b = machine.data.peek(0)?;
    let a = machine.data.peek(1)?;

    machine.data.push(a)?;
    machine.data.push(b)
}

/// Signature: `a b -- `
fn word_two_drop(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "2drop")?;

    let _ = machine.data.pop()?;
    let _ = machine.data.pop()?;

    Ok(())
}

/// Push the data stack depth, counted before this word ran.
///
/// Signature: ` -- depth`
fn word_depth(machine: &mut Machine) -> error::Result<()> {
    let depth = machine.data.depth();

    machine.data.push(depth as Cell)
}

/// Move the top data cell to the return stack.  Inside a colon
/// definition the threaded pointer stays above the moved cell.
///
/// Signature: `n -- ` (R: ` -- n`)
fn word_to_r(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.pop()?;

    if machine.state == State::Interpret {
        let ip = machine.ret.pop()?;

        machine.ret.push(value)?;
        machine.ret.push(ip)
    } else {
        machine.ret.push(value)
    }
}

/// Move the top return cell back to the data stack.
///
/// Signature: ` -- n` (R: `n -- `)
fn word_r_from(machine: &mut Machine) -> error::Result<()> {
    if machine.state == State::Interpret {
        let ip = machine.ret.pop()?;
        let value = machine.ret.pop()?;

        machine.data.push(value)?;
        machine.ret.push(ip)
    } else {
        let value = machine.ret.pop()?;

        machine.data.push(value)
    }
}

/// Copy the top return cell without consuming it.
///
/// Signature: ` -- n` (R: `n -- n`)
fn word_r_fetch(machine: &mut Machine) -> error::Result<()> {
    let offset = if machine.state == State::Interpret { 1 } else { 0 };
    let value = machine.ret.peek(offset)?;

    machine.data.push(value)
}

/// Move the top data cell to the user stack.
///
/// Signature: `n -- ` (U: ` -- n`)
fn word_to_u(machine: &mut Machine) -> error::Result<()> {
    let value = machine.data.pop()?;

    machine.user.push(value)
}

/// Move the top user cell back to the data stack.
///
/// Signature: ` -- n` (U: `n -- `)
fn word_u_from(machine: &mut Machine) -> error::Result<()> {
    let value = machine.user.pop()?;

    machine.data.push(value)
}

/// Copy the top user cell without consuming it.
///
/// Signature: ` -- n` (U: `n -- n`)
fn word_u_fetch(machine: &mut Machine) -> error::Result<()> {
    let value = machine.user.peek(0)?;

    machine.data.push(value)
}

/// Register the stack manipulation words.
pub fn register_stack_words(machine: &mut Machine) {
    add_word!(machine, "dup", word_dup, "Duplicate the top cell.", "n -- n n");
    add_word!(machine, "drop", word_drop, "Discard the top cell.", "n -- ");
    add_word!(machine, "swap", word_swap, "Swap the top two cells.", "a b -- b a");
    add_word!(machine, "over", word_over, "Copy the second cell over the top.", "a b -- a b a");
    add_word!(machine, "rot", word_rot, "Rotate the third cell to the top.", "a b c -- b c a");
    add_word!(machine, "nip", word_nip, "Drop the cell under the top.", "a b -- b");
    add_word!(machine, "tuck", word_tuck, "Copy the top cell under the second.", "a b -- b a b");
    add_word!(machine, "?dup", word_question_dup, "Duplicate the top cell if non-zero.", "n -- n n | 0");
    add_word!(machine, "2dup", word_two_dup, "Duplicate the top pair.", "a b -- a b a b");
    add_word!(machine, "2drop", word_two_drop, "Discard the top pair.", "a b -- ");
    add_word!(machine, "depth", word_depth, "Push the data stack depth.", " -- depth");

    add_word!(machine, ">r", word_to_r, "Move the top cell to the return stack.", "n -- ");
    add_word!(machine, "r>", word_r_from, "Move the top return cell back.", " -- n");
    add_word!(machine, "r@", word_r_fetch, "Copy the top return cell.", " -- n");

    add_word!(machine, ">u", word_to_u, "Move the top cell to the user stack.", "n -- ");
    add_word!(machine, "u>", word_u_from, "Move the top user cell back.", " -- n");
    add_word!(machine, "u@", word_u_fetch, "Copy the top user cell.", " -- n");
}
