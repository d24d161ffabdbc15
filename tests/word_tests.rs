// Parameterized word tests over an eval helper.

use oxforth::runtime::{
    data_structures::Cell,
    error::{ErrKind, Exception, Result},
    interpreter::Machine,
};
use test_case::test_case;

fn eval_and_stack(source: &str, init_stack: &[Cell]) -> Result<Vec<Cell>> {
    let mut machine = Machine::boot_capturing();

    for &value in init_stack {
        machine.data.push(value)?;
    }

    machine.eval("<test>", source)?;
    Ok(machine.data.slice().to_vec())
}

fn error_kind(source: &str, init_stack: &[Cell]) -> ErrKind {
    match eval_and_stack(source, init_stack) {
        Err(Exception::Error(error)) => error.kind,
        other => panic!("expected an error from {:?}, got {:?}", source, other),
    }
}

#[test_case("0", &[], &[0]; "zero")]
#[test_case("42", &[], &[42]; "number")]
#[test_case("-17", &[], &[-17]; "negative number")]
#[test_case("$ff", &[], &[255]; "dollar hex literal")]
#[test_case("0x10", &[], &[16]; "prefixed hex literal")]
#[test_case("017", &[], &[15]; "octal literal")]
#[test_case("+", &[2, 2], &[4]; "simple add")]
#[test_case("-", &[5, 2], &[3]; "simple sub")]
#[test_case("*", &[3, 4], &[12]; "simple mul")]
#[test_case("/", &[12, 3], &[4]; "simple div")]
#[test_case("mod", &[13, 5], &[3]; "simple mod")]
#[test_case("/mod", &[13, 5], &[3, 2]; "div mod")]
#[test_case("*/", &[912345678, 34, 100], &[310197530]; "scaled multiply divide")]
#[test_case("*/mod", &[912345678, 34, 100], &[52, 310197530]; "scaled multiply divide with remainder")]
#[test_case("nip", &[1, 2], &[2]; "nip")]
#[test_case("tuck", &[1, 2], &[2, 1, 2]; "tuck")]
#[test_case("?dup", &[5], &[5, 5]; "question dup of non-zero")]
#[test_case("?dup", &[0], &[0]; "question dup of zero")]
#[test_case("2dup", &[1, 2], &[1, 2, 1, 2]; "two dup")]
#[test_case("2drop", &[1, 2, 3], &[1]; "two drop")]
#[test_case("1+", &[41], &[42]; "add one")]
#[test_case("1-", &[43], &[42]; "sub one")]
#[test_case("2*", &[7], &[14]; "times two")]
#[test_case("2/", &[8], &[4]; "divide by two")]
#[test_case("abs", &[-9], &[9]; "abs of negative")]
#[test_case("abs", &[9], &[9]; "abs of positive")]
#[test_case("negate", &[42], &[-42]; "negate")]
#[test_case("min", &[3, 7], &[3]; "min")]
#[test_case("max", &[3, 7], &[7]; "max")]
#[test_case("and", &[6, 3], &[2]; "bitwise and")]
#[test_case("or", &[6, 3], &[7]; "bitwise or")]
#[test_case("xor", &[6, 3], &[5]; "bitwise xor")]
#[test_case("invert", &[0], &[-1]; "invert false")]
#[test_case("invert", &[-1], &[0]; "invert true")]
#[test_case("=", &[4, 4], &[-1]; "equal is true")]
#[test_case("=", &[4, 5], &[0]; "equal is false")]
#[test_case("<>", &[4, 5], &[-1]; "not equal")]
#[test_case("<", &[1, 2], &[-1]; "less is true")]
#[test_case("<", &[2, 1], &[0]; "less is false")]
#[test_case(">", &[2, 1], &[-1]; "greater is true")]
#[test_case("<=", &[1, 1], &[-1]; "less or equal")]
#[test_case(">=", &[0, 1], &[0]; "greater or equal is false")]
#[test_case("0=", &[0], &[-1]; "zero equal")]
#[test_case("0=", &[5], &[0]; "zero equal of non-zero")]
#[test_case("0<", &[-5], &[-1]; "zero less")]
#[test_case("dup", &[42], &[42, 42]; "dup")]
#[test_case("drop", &[1, 2], &[1]; "drop")]
#[test_case("swap", &[1, 2], &[2, 1]; "swap")]
#[test_case("over", &[1, 2], &[1, 2, 1]; "over")]
#[test_case("rot", &[1, 2, 3], &[2, 3, 1]; "rot")]
#[test_case("depth", &[1, 2, 3], &[1, 2, 3, 3]; "depth")]
#[test_case("depth", &[], &[0]; "depth of empty stack")]
#[test_case(">u u@ u>", &[7], &[7, 7]; "user stack round trip")]
#[test_case("cellsize", &[], &[std::mem::size_of::<Cell>() as Cell]; "cellsize")]
#[test_case("base@", &[], &[10]; "default base")]
#[test_case("hex base@ decimal base@", &[], &[16, 10]; "hex and decimal set the base")]
#[test_case(": f 42 ; f", &[], &[42]; "trivial definition")]
#[test_case(": f if 10 else 20 then ; f", &[-1], &[10]; "if else then true branch")]
#[test_case(": f if 10 else 20 then ; f", &[0], &[20]; "if else then false branch")]
#[test_case(": f if 10 then ; f", &[0], &[]; "if without else false branch")]
#[test_case("1 if 42 then", &[], &[42]; "interactive if then")]
#[test_case("0 if 1 else 2 then", &[], &[2]; "interactive if else then")]
#[test_case("begin 1 + dup 10 >= until", &[0], &[10]; "begin until loop")]
#[test_case("begin dup 10 < while 1 + repeat", &[0], &[10]; "begin while repeat loop")]
#[test_case("do i loop", &[5, 0], &[0, 1, 2, 3, 4]; "do loop pushes indices")]
#[test_case("10 0 do i 2 +loop", &[], &[0, 2, 4, 6, 8]; "plus loop with step two")]
#[test_case("0 10 do i -1 +loop", &[], &[10, 9, 8, 7, 6, 5, 4, 3, 2, 1]; "plus loop counting down")]
#[test_case("3 0 do 2 0 do j i loop loop", &[], &[0, 0, 0, 1, 1, 0, 1, 1, 2, 0, 2, 1]; "nested do loop with j")]
#[test_case("10 0 do i i 4 = if leave then loop", &[], &[0, 1, 2, 3, 4]; "leave exits early")]
#[test_case(": mk 5 constant ; mk five-c five-c", &[], &[5]; "constant reads its name at run time")]
#[test_case("7 constant lucky lucky lucky", &[], &[7, 7]; "constant pushes its value")]
#[test_case("variable spot 9 spot ! spot @", &[], &[9]; "variable stores and fetches")]
#[test_case("variable spot 4 spot ! 3 spot +! spot @", &[], &[7]; "plus store accumulates")]
#[test_case("' dup execute", &[3], &[3, 3]; "tick and execute")]
#[test_case(": avg + 2/ ; 4 8 avg", &[], &[6]; "averaging definition")]
#[test_case(": sq dup * ; : cube dup sq * ; 3 cube", &[], &[27]; "nested colon calls")]
#[test_case(": tens 10 * ; : hundreds tens tens ; 5 hundreds", &[], &[500]; "twice nested call")]
#[test_case(">r r@ r>", &[9], &[9, 9]; "return stack round trip")]
fn eval_cases(source: &str, init_stack: &[Cell], expected: &[Cell]) {
    match eval_and_stack(source, init_stack) {
        Ok(stack) => assert_eq!(stack, expected, "source: {:?}", source),
        Err(error) => panic!("eval of {:?} failed: {}", source, error),
    }
}

#[test_case(".", &[], ErrKind::StackUnderflow; "dot underflows")]
#[test_case("+", &[1], ErrKind::StackUnderflow; "add underflows")]
#[test_case("/", &[1, 0], ErrKind::DivZero; "divide by zero")]
#[test_case("mod", &[1, 0], ErrKind::DivZero; "mod by zero")]
#[test_case("0 @", &[], ErrKind::NullPtr; "fetch through null")]
#[test_case("1 0 !", &[], ErrKind::NullPtr; "store through null")]
#[test_case("99999 @", &[], ErrKind::Range; "fetch out of range")]
#[test_case("1 base!", &[], ErrKind::BadBase; "base too small")]
#[test_case("37 base!", &[], ErrKind::BadBase; "base too large")]
#[test_case("zzzz-not-a-word", &[], ErrKind::BadLiteral; "unknown token interactively")]
#[test_case(": broken zzzz-not-a-word ;", &[], ErrKind::BadString; "unknown token while compiling")]
#[test_case("' zzzz-not-a-word", &[], ErrKind::NoWord; "tick of a missing word")]
#[test_case(";", &[], ErrKind::BadState; "semicolon outside a definition")]
#[test_case("does>", &[], ErrKind::BadState; "does outside a definition")]
#[test_case("#", &[], ErrKind::BadState; "digit without a formatter")]
#[test_case("include definitely-not-present.fs", &[], ErrKind::NoFile; "missing include")]
#[test_case("-1 allot", &[], ErrKind::Range; "negative allot")]
#[test_case("-1 spaces", &[], ErrKind::Range; "negative spaces")]
fn error_cases(source: &str, init_stack: &[Cell], expected: ErrKind) {
    assert_eq!(error_kind(source, init_stack), expected, "source: {:?}", source);
}

#[test]
fn definitions_shadow_older_ones() {
    let stack = eval_and_stack(": f 1 ; : f 2 ; f", &[]).unwrap();
    assert_eq!(stack, &[2]);
}

#[test]
fn smudged_definitions_cannot_call_themselves() {
    // The word under construction is invisible, so the inner reference
    // fails to resolve and the definition rolls back.
    assert_eq!(error_kind(": loop-back loop-back ;", &[]), ErrKind::BadString);
}

#[test]
fn create_does_children_share_behaviour() {
    let source = "
        : constant' create , does> @ ;
        42 constant' life
        7 constant' week
        life week
    ";

    let stack = eval_and_stack(source, &[]).unwrap();
    assert_eq!(stack, &[42, 7]);
}

#[test]
fn does_tail_with_literals_survives_the_copy() {
    // The zero in the tail must not be mistaken for the terminator.
    let source = "
        : adder create , does> @ 0 + + ;
        10 adder add-ten
        5 add-ten
    ";

    let stack = eval_and_stack(source, &[]).unwrap();
    assert_eq!(stack, &[15]);
}

#[test]
fn forget_wipes_user_definitions() {
    let mut machine = Machine::boot_capturing();

    machine.eval("<test>", ": gone 1 ;").unwrap();
    machine.eval("<test>", "forget").unwrap();

    assert_eq!(machine.dictionary.colon_count(), 0);

    match machine.eval("<test>", "gone") {
        Err(Exception::Error(error)) => assert_eq!(error.kind, ErrKind::BadLiteral),
        other => panic!("expected the name to be gone, got {:?}", other),
    }
}

#[test]
fn stack_effects_survive_an_error() {
    let mut machine = Machine::boot_capturing();

    machine.eval("<test>", "1 2 3").unwrap();

    let result = machine.eval("<test>", "zzzz-not-a-word");
    assert!(result.is_err());

    // The failed token cost nothing; the stack is intact.
    assert_eq!(machine.data.slice(), &[1, 2, 3]);
}
