use crate::{
    add_immediate_word, add_word,
    runtime::{
        data_structures::Cell,
        error::{self},
        interpreter::Machine,
    },
};

//////////////////////////////////////////////
// Run-time branch primitives.  Each runs with the threaded pointer on
// top of the return stack, placed there by the inner interpreter.

/// `(literal)` — push the cell following this primitive in the body.
fn word_runtime_literal(machine: &mut Machine) -> error::Result<()> {
    let ip = machine.ret.pop()? as usize;
    let value = machine.flash.get(ip)?;

    machine.data.push(value)?;
    machine.ret.push((ip + 1) as Cell)
}

/// `branch` — load the branch target into the threaded pointer.
fn word_branch(machine: &mut Machine) -> error::Result<()> {
    let ip = machine.ret.pop()? as usize;
    let target = machine.flash.get(ip)?;

    machine.ret.push(target)
}

/// `?branch` — pop a flag; true steps past the branch cell, false
/// loads it.
fn word_question_branch(machine: &mut Machine) -> error::Result<()> {
    let taken = machine.data.pop()?;
    let ip = machine.ret.pop()? as usize;

    if taken != 0 {
        machine.ret.push((ip + 1) as Cell)
    } else {
        let target = machine.flash.get(ip)?;

        machine.ret.push(target)
    }
}

/// `(do)` — move limit and index onto the return stack, index on top,
/// keeping the threaded pointer above them.
fn word_runtime_do(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "(do)")?;

    let ip = machine.ret.pop()?;
    let index = machine.data.pop()?;
    let limit = machine.data.pop()?;

    machine.ret.push(limit)?;
    machine.ret.push(index)?;
    machine.ret.push(ip)
}

/// `(loop)` — bump the index; push 0 to continue or 1 to exit, popping
/// the control slots on exit.
fn word_runtime_loop(machine: &mut Machine) -> error::Result<()> {
    let ip = machine.ret.pop()?;
    let index = machine.ret.pop()?.wrapping_add(1);
    let limit = machine.ret.pop()?;

    if index < limit {
        machine.ret.push(limit)?;
        machine.ret.push(index)?;
        machine.data.push(0)?;
    } else {
        machine.data.push(1)?;
    }

    machine.ret.push(ip)
}

/// `(+loop)` — like `(loop)` with a signed increment: strict less-than
/// for positive steps, strict greater-than for negative ones.
fn word_runtime_plus_loop(machine: &mut Machine) -> error::Result<()> {
    let step = machine.data.pop()?;
    let ip = machine.ret.pop()?;
    let index = machine.ret.pop()?.wrapping_add(step);
    let limit = machine.ret.pop()?;

    let continuing = if step < 0 { index > limit } else { index < limit };

    if continuing {
        machine.ret.push(limit)?;
        machine.ret.push(index)?;
        machine.data.push(0)?;
    } else {
        machine.data.push(1)?;
    }

    machine.ret.push(ip)
}

/// `leave` — zero the loop limit so the next loop primitive exits.
fn word_leave(machine: &mut Machine) -> error::Result<()> {
    machine.ret.poke(2, 0)
}

/// `i` — the current loop index, read from under the threaded pointer.
fn word_index(machine: &mut Machine) -> error::Result<()> {
    let index = machine.ret.peek(1)?;

    machine.data.push(index)
}

/// `j` — the enclosing loop's index.
fn word_outer_index(machine: &mut Machine) -> error::Result<()> {
    let index = machine.ret.peek(3)?;

    machine.data.push(index)
}

//////////////////////////////////////////////
// Compile-time words.  These are immediate; they compile branch
// primitives and keep their unresolved marks on the data stack.

fn word_if(machine: &mut Machine) -> error::Result<()> {
    machine.ctl_open()?;

    let qbranch = machine.xt_qbranch();

    machine.comma(qbranch)?;
    machine.fwd_mark()
}

fn word_else(machine: &mut Machine) -> error::Result<()> {
    let branch = machine.xt_branch();

    machine.comma(branch)?;
    machine.fwd_mark()?;

    // The new mark sits above the IF mark; swap and patch the latter.
    machine.data.need(2, "else")?;

    let else_mark = machine.data.pop()?;
    let if_mark = machine.data.pop()?;

    machine.data.push(else_mark)?;
    machine.data.push(if_mark)?;
    machine.fwd_resolve()
}

fn word_then(machine: &mut Machine) -> error::Result<()> {
    machine.fwd_resolve()?;
    machine.ctl_close()
}

fn word_begin(machine: &mut Machine) -> error::Result<()> {
    machine.ctl_open()?;
    machine.bkw_mark()
}

fn word_until(machine: &mut Machine) -> error::Result<()> {
    let qbranch = machine.xt_qbranch();

    machine.comma(qbranch)?;
    machine.bkw_resolve()?;
    machine.ctl_close()
}

fn word_again(machine: &mut Machine) -> error::Result<()> {
    let branch = machine.xt_branch();

    machine.comma(branch)?;
    machine.bkw_resolve()?;
    machine.ctl_close()
}

fn word_while(machine: &mut Machine) -> error::Result<()> {
    let qbranch = machine.xt_qbranch();

    machine.comma(qbranch)?;
    machine.fwd_mark()?;

    // Leave the BEGIN target on top for REPEAT.
    machine.data.need(2, "while")?;

    let while_mark = machine.data.pop()?;
    let begin_mark = machine.data.pop()?;

    machine.data.push(while_mark)?;
    machine.data.push(begin_mark)
}

fn word_repeat(machine: &mut Machine) -> error::Result<()> {
    let branch = machine.xt_branch();

    machine.comma(branch)?;
    machine.bkw_resolve()?;
    machine.fwd_resolve()?;
    machine.ctl_close()
}

fn word_do(machine: &mut Machine) -> error::Result<()> {
    machine.ctl_open()?;

    let runtime_do = machine.xt_do();

    machine.comma(runtime_do)?;
    machine.bkw_mark()
}

fn word_loop(machine: &mut Machine) -> error::Result<()> {
    let runtime_loop = machine.xt_loop();
    let qbranch = machine.xt_qbranch();

    machine.comma(runtime_loop)?;
    machine.comma(qbranch)?;
    machine.bkw_resolve()?;
    machine.ctl_close()
}

fn word_plus_loop(machine: &mut Machine) -> error::Result<()> {
    let runtime_plus_loop = machine.xt_plus_loop();
    let qbranch = machine.xt_qbranch();

    machine.comma(runtime_plus_loop)?;
    machine.comma(qbranch)?;
    machine.bkw_resolve()?;
    machine.ctl_close()
}

/// Register the branch primitives and the control-flow words.
pub fn register_control_words(machine: &mut Machine) {
    add_word!(machine, "(literal)", word_runtime_literal,
        "Push the cell following this primitive.", " -- n");
    add_word!(machine, "branch", word_branch,
        "Load the branch target into the threaded pointer.", " -- ");
    add_word!(machine, "?branch", word_question_branch,
        "Branch when the popped flag is false.", "flag -- ");
    add_word!(machine, "(do)", word_runtime_do,
        "Move limit and index to the return stack.", "limit index -- ");
    add_word!(machine, "(loop)", word_runtime_loop,
        "Bump the index; flag whether the loop exits.", " -- flag");
    add_word!(machine, "(+loop)", word_runtime_plus_loop,
        "Bump the index by a signed step; flag the exit.", "step -- flag");
    add_word!(machine, "leave", word_leave,
        "Force the enclosing loop to exit next turn.", " -- ");
    add_word!(machine, "i", word_index, "The current loop index.", " -- index");
    add_word!(machine, "j", word_outer_index, "The enclosing loop's index.", " -- index");

    add_immediate_word!(machine, "if", word_if,
        "Branch forward unless the flag is true.", "flag -- ");
    add_immediate_word!(machine, "else", word_else,
        "The false arm of an IF.", " -- ");
    add_immediate_word!(machine, "then", word_then,
        "Resolve an IF or ELSE.", " -- ");
    add_immediate_word!(machine, "begin", word_begin,
        "Mark the top of a loop.", " -- ");
    add_immediate_word!(machine, "until", word_until,
        "Loop back while the flag is false.", "flag -- ");
    add_immediate_word!(machine, "again", word_again,
        "Loop back unconditionally.", " -- ");
    add_immediate_word!(machine, "while", word_while,
        "Exit the loop unless the flag is true.", "flag -- ");
    add_immediate_word!(machine, "repeat", word_repeat,
        "Close a BEGIN WHILE loop.", " -- ");
    add_immediate_word!(machine, "do", word_do,
        "Start a counted loop.", "limit index -- ");
    add_immediate_word!(machine, "loop", word_loop,
        "Close a counted loop, stepping by one.", " -- ");
    add_immediate_word!(machine, "+loop", word_plus_loop,
        "Close a counted loop with a signed step.", "step -- ");
}
