use crate::{
    add_immediate_word, add_word,
    runtime::{
        data_structures::{
            Cell,
            dictionary::{Entry, Flag, WordCode},
        },
        error::{self, ErrKind, throw},
        interpreter::{Machine, State},
    },
};

/// `:` — read a name and open a colon definition.
fn word_colon(machine: &mut Machine) -> error::Result<()> {
    machine.start_colon()
}

/// `;` outside a definition.  While compiling, the outer interpreter
/// intercepts the token before lookup, so reaching this handler means
/// there is no definition to close.
fn word_semicolon(_machine: &mut Machine) -> error::Result<()> {
    throw(ErrKind::BadState, ";")
}

/// `create <name>` — add a dictionary entry whose execution pushes its
/// body address; the body is whatever gets compiled next.
fn word_create(machine: &mut Machine) -> error::Result<()> {
    let name = machine.name_token("create")?;
    let addr = machine.flash.str_cache(&name)?;
    let body = machine.flash.here();

    machine
        .dictionary
        .add_colon(Entry::new(addr, WordCode::PushBody, Flag::Normal, body));
    Ok(())
}

/// `lambda` — the anonymous half of CREATE, for builders that already
/// hold an interned name address on the stack.
fn word_lambda(machine: &mut Machine) -> error::Result<()> {
    let addr = machine.data.pop()? as usize;
    let body = machine.flash.here();

    machine
        .dictionary
        .add_colon(Entry::new(addr, WordCode::PushBody, Flag::Normal, body));
    Ok(())
}

/// `constant <name>` — create a word that pushes the value compiled
/// into its body.
fn word_constant(machine: &mut Machine) -> error::Result<()> {
    let name = machine.name_token("constant")?;
    let value = machine.data.pop()?;
    let addr = machine.flash.str_cache(&name)?;
    let body = machine.flash.here();

    machine.comma(value)?;
    machine
        .dictionary
        .add_colon(Entry::new(addr, WordCode::Constant, Flag::Normal, body));
    Ok(())
}

/// `variable <name>` — create a word that pushes the address of its
/// one zero-initialised cell.
fn word_variable(machine: &mut Machine) -> error::Result<()> {
    let name = machine.name_token("variable")?;
    let addr = machine.flash.str_cache(&name)?;
    let body = machine.flash.here();

    machine.comma(0)?;
    machine
        .dictionary
        .add_colon(Entry::new(addr, WordCode::PushBody, Flag::Normal, body));
    Ok(())
}

/// `does>` — the two-phase defining-word rewrite.
///
/// While compiling the defining word this appends its own execution
/// token, so the rewrite runs when the defining word does.  At that
/// point (Interpret state) the newest definition's body is rebuilt as a
/// literal of its original body followed by a copy of the cells after
/// `does>`, its code field becomes the colon behaviour, and the
/// defining word's frame ends at its terminator.
fn word_does(machine: &mut Machine) -> error::Result<()> {
    match machine.state {
        State::Compiling => {
            let this = machine.xt_does();

            machine.comma(this)
        }

        State::Interpret => {
            let ip = machine.ret.pop()? as usize;

            let child_xt = match machine.dictionary.latest_colon_xt() {
                Some(xt) => xt,
                None => return throw(ErrKind::BadState, "does>"),
            };

            let old_body = machine.dictionary.entry(child_xt)?.body;
            let new_body = machine.flash.here();

            let literal = machine.xt_literal();
            let branch = machine.xt_branch();
            let qbranch = machine.xt_qbranch();

            machine.comma(literal)?;
            machine.comma(old_body as Cell)?;

            // Copy the tail, carrying operand cells along with their
            // primitives so a zero literal is not mistaken for the
            // terminator.
            let mut cursor = ip;

            loop {
                let cell = machine.flash.get(cursor)?;

                machine.comma(cell)?;
                cursor += 1;

                if cell == 0 {
                    break;
                }

                if cell == literal || cell == branch || cell == qbranch {
                    let operand = machine.flash.get(cursor)?;

                    machine.comma(operand)?;
                    cursor += 1;
                }
            }

            {
                let entry = machine.dictionary.entry_mut(child_xt)?;

                entry.body = new_body;
                entry.code = WordCode::Colon;
            }

            // Resume the defining word at its terminator.
            machine.ret.push((cursor - 1) as Cell)
        }

        _ => throw(ErrKind::BadState, "does>"),
    }
}

/// `' <name>` — push the execution token of a word.
fn word_tick(machine: &mut Machine) -> error::Result<()> {
    let name = machine.name_token("'")?;

    match machine.dictionary.lookup(&machine.flash, &name) {
        Some(xt) => machine.data.push(xt),
        None => throw(ErrKind::NoWord, &name),
    }
}

/// `execute` — pop an execution token and run it.
fn word_execute(machine: &mut Machine) -> error::Result<()> {
    let xt = machine.data.pop()?;

    machine.execute(xt)
}

/// `immediate` — flag the most recent definition to run at compile
/// time.
fn word_immediate(machine: &mut Machine) -> error::Result<()> {
    match machine.dictionary.latest_colon_mut() {
        Some(entry) => {
            entry.flag = Flag::Immediate;
            Ok(())
        }

        None => throw(ErrKind::BadState, "immediate"),
    }
}

/// `[` — save the state and execute following tokens immediately.
fn word_left_bracket(machine: &mut Machine) -> error::Result<()> {
    machine.begin_immediate();
    Ok(())
}

/// `]` — restore the state saved by `[`.
fn word_right_bracket(machine: &mut Machine) -> error::Result<()> {
    machine.end_immediate();
    Ok(())
}

/// `forget` — wipe the user dictionary back to the boot image.
fn word_forget(machine: &mut Machine) -> error::Result<()> {
    machine.forget()
}

/// Register the defining words.
pub fn register_compiler_words(machine: &mut Machine) {
    add_word!(machine, ":", word_colon, "Open a colon definition.", " -- ");
    add_word!(machine, ";", word_semicolon, "Close a colon definition.", " -- ");
    add_word!(machine, "create", word_create,
        "Create a word that pushes its body address.", " -- ");
    add_word!(machine, "lambda", word_lambda,
        "Create an unnamed-entry word from a cached name address.", "name-addr -- ");
    add_word!(machine, "constant", word_constant,
        "Create a word that pushes a fixed value.", "n -- ");
    add_word!(machine, "variable", word_variable,
        "Create a word that pushes the address of its cell.", " -- ");
    add_immediate_word!(machine, "does>", word_does,
        "Give the latest created word a threaded behaviour.", " -- ");
    add_word!(machine, "'", word_tick, "Push a word's execution token.", " -- xt");
    add_word!(machine, "execute", word_execute, "Run an execution token.", "xt -- ");
    add_word!(machine, "immediate", word_immediate,
        "Flag the latest definition immediate.", " -- ");
    add_immediate_word!(machine, "[", word_left_bracket,
        "Switch to immediate execution.", " -- ");
    add_word!(machine, "]", word_right_bracket,
        "Return from immediate execution.", " -- ");
    add_word!(machine, "forget", word_forget,
        "Wipe the user dictionary back to the boot image.", " -- ");
}
