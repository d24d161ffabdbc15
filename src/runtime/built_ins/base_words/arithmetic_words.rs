use crate::{
    add_word,
    runtime::{
        data_structures::Cell,
        error::{self, ErrKind, throw},
        interpreter::Machine,
    },
};

/// The canonical truth values left by the comparison words.
const TRUE: Cell = -1;
const FALSE: Cell = 0;

fn binary(machine: &mut Machine, word: &str, apply: fn(Cell, Cell) -> Cell) -> error::Result<()> {
    machine.data.need(2, word)?;

    let b = machine.data.pop()?;
    let a = machine.data.pop()?;

    machine.data.push(apply(a, b))
}

fn unary(machine: &mut Machine, word: &str, apply: fn(Cell) -> Cell) -> error::Result<()> {
    machine.data.need(1, word)?;

    let a = machine.data.pop()?;

    machine.data.push(apply(a))
}

fn word_add(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "+", |a, b| a.wrapping_add(b))
}

fn word_subtract(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "-", |a, b| a.wrapping_sub(b))
}

fn word_multiply(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "*", |a, b| a.wrapping_mul(b))
}

/// Signature: `a b -- a/b`
fn word_divide(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "/")?;

    let b = machine.data.pop()?;
    let a = machine.data.pop()?;

    if b == 0 {
        return throw(ErrKind::DivZero, "/");
    }

    machine.data.push(a.wrapping_div(b))
}

/// Signature: `a b -- a%b`
fn word_modulus(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "%")?;

    let b = machine.data.pop()?;
    let a = machine.data.pop()?;

    if b == 0 {
        return throw(ErrKind::DivZero, "%");
    }

    machine.data.push(a.wrapping_rem(b))
}

/// Signature: `a b -- remainder quotient`
fn word_divide_modulus(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(2, "/mod")?;

    let b = machine.data.pop()?;
    let a = machine.data.pop()?;

    if b == 0 {
        return throw(ErrKind::DivZero, "/mod");
    }

    machine.data.push(a.wrapping_rem(b))?;
    machine.data.push(a.wrapping_div(b))
}

/// Scaled arithmetic with a double-width intermediate product.
///
/// Signature: `a b c -- a*b/c`
fn word_star_slash(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(3, "*/")?;

    let c = machine.data.pop()?;
    let b = machine.data.pop()?;
    let a = machine.data.pop()?;

    if c == 0 {
        return throw(ErrKind::DivZero, "*/");
    }

    let product = a as i128 * b as i128;

    machine.data.push((product / c as i128) as Cell)
}

/// Scaled arithmetic leaving the remainder as well.
///
/// Signature: `a b c -- rem a*b/c`
fn word_star_slash_mod(machine: &mut Machine) -> error::Result<()> {
    machine.data.need(3, "*/mod")?;

    let c = machine.data.pop()?;
    let b = machine.data.pop()?;
    let a = machine.data.pop()?;

    if c == 0 {
        return throw(ErrKind::DivZero, "*/mod");
    }

    let product = a as i128 * b as i128;

    machine.data.push((product % c as i128) as Cell)?;
    machine.data.push((product / c as i128) as Cell)
}

fn word_one_plus(machine: &mut Machine) -> error::Result<()> {
    unary(machine, "1+", |a| a.wrapping_add(1))
}

fn word_one_minus(machine: &mut Machine) -> error::Result<()> {
    unary(machine, "1-", |a| a.wrapping_sub(1))
}

fn word_two_star(machine: &mut Machine) -> error::Result<()> {
    unary(machine, "2*", |a| a.wrapping_shl(1))
}

fn word_two_slash(machine: &mut Machine) -> error::Result<()> {
    unary(machine, "2/", |a| a >> 1)
}

fn word_abs(machine: &mut Machine) -> error::Result<()> {
    unary(machine, "abs", |a| a.wrapping_abs())
}

fn word_negate(machine: &mut Machine) -> error::Result<()> {
    unary(machine, "negate", |a| a.wrapping_neg())
}

fn word_min(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "min", |a, b| a.min(b))
}

fn word_max(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "max", |a, b| a.max(b))
}

fn word_and(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "and", |a, b| a & b)
}

fn word_or(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "or", |a, b| a | b)
}

fn word_xor(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "xor", |a, b| a ^ b)
}

fn word_invert(machine: &mut Machine) -> error::Result<()> {
    unary(machine, "invert", |a| !a)
}

fn flag(condition: bool) -> Cell {
    if condition { TRUE } else { FALSE }
}

fn word_equal(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "=", |a, b| flag(a == b))
}

fn word_not_equal(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "<>", |a, b| flag(a != b))
}

fn word_less(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "<", |a, b| flag(a < b))
}

fn word_greater(machine: &mut Machine) -> error::Result<()> {
    binary(machine, ">", |a, b| flag(a > b))
}

fn word_less_equal(machine: &mut Machine) -> error::Result<()> {
    binary(machine, "<=", |a, b| flag(a <= b))
}

fn word_greater_equal(machine: &mut Machine) -> error::Result<()> {
    binary(machine, ">=", |a, b| flag(a >= b))
}

fn word_zero_equal(machine: &mut Machine) -> error::Result<()> {
    unary(machine, "0=", |a| flag(a == 0))
}

fn word_zero_less(machine: &mut Machine) -> error::Result<()> {
    unary(machine, "0<", |a| flag(a < 0))
}

/// Register the arithmetic, comparison, and bitwise words.
pub fn register_arithmetic_words(machine: &mut Machine) {
    add_word!(machine, "+", word_add, "Add the top two cells.", "a b -- a+b");
    add_word!(machine, "-", word_subtract, "Subtract the top cell from the second.", "a b -- a-b");
    add_word!(machine, "*", word_multiply, "Multiply the top two cells.", "a b -- a*b");
    add_word!(machine, "/", word_divide, "Divide the second cell by the top.", "a b -- a/b");
    add_word!(machine, "%", word_modulus, "Remainder of the second cell by the top.", "a b -- a%b");
    add_word!(machine, "mod", word_modulus, "Remainder of the second cell by the top.", "a b -- a%b");
    add_word!(machine, "/mod", word_divide_modulus, "Remainder and quotient.", "a b -- r q");
    add_word!(machine, "*/", word_star_slash, "Scaled multiply-divide.", "a b c -- a*b/c");
    add_word!(machine, "*/mod", word_star_slash_mod, "Scaled multiply-divide with remainder.", "a b c -- r q");

    add_word!(machine, "1+", word_one_plus, "Add one.", "n -- n+1");
    add_word!(machine, "1-", word_one_minus, "Subtract one.", "n -- n-1");
    add_word!(machine, "2*", word_two_star, "Double.", "n -- n*2");
    add_word!(machine, "2/", word_two_slash, "Halve, arithmetic shift.", "n -- n/2");
    add_word!(machine, "abs", word_abs, "Absolute value.", "n -- |n|");
    add_word!(machine, "negate", word_negate, "Negate.", "n -- -n");
    add_word!(machine, "min", word_min, "The smaller of the top two cells.", "a b -- min");
    add_word!(machine, "max", word_max, "The larger of the top two cells.", "a b -- max");

    add_word!(machine, "and", word_and, "Bitwise and.", "a b -- a&b");
    add_word!(machine, "or", word_or, "Bitwise or.", "a b -- a|b");
    add_word!(machine, "xor", word_xor, "Bitwise exclusive or.", "a b -- a^b");
    add_word!(machine, "invert", word_invert, "Bitwise complement.", "n -- ~n");

    add_word!(machine, "=", word_equal, "True when the top two cells are equal.", "a b -- flag");
    add_word!(machine, "<>", word_not_equal, "True when the top two cells differ.", "a b -- flag");
    add_word!(machine, "<", word_less, "True when the second cell is less.", "a b -- flag");
    add_word!(machine, ">", word_greater, "True when the second cell is greater.", "a b -- flag");
    add_word!(machine, "<=", word_less_equal, "True when less or equal.", "a b -- flag");
    add_word!(machine, ">=", word_greater_equal, "True when greater or equal.", "a b -- flag");
    add_word!(machine, "0=", word_zero_equal, "True when the top cell is zero.", "n -- flag");
    add_word!(machine, "0<", word_zero_less, "True when the top cell is negative.", "n -- flag");
}
