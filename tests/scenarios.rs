// End-to-end scenarios asserting the machine's captured output.

use oxforth::runtime::{
    error::{ErrKind, Exception},
    interpreter::Machine,
};
use std::{env::temp_dir, fs, process};

fn eval_output(source: &str) -> String {
    let mut machine = Machine::boot_capturing();

    machine
        .eval("<test>", source)
        .unwrap_or_else(|error| panic!("eval failed on {:?}: {}", source, error));
    machine.console.take()
}

#[test]
fn addition_prints_its_sum() {
    assert_eq!(eval_output("2 3 + ."), "5 ");
}

#[test]
fn a_defined_square_prints() {
    assert_eq!(eval_output(": sq dup * ; 7 sq ."), "49 ");
}

#[test]
fn conditional_negation_prints_the_magnitude() {
    let source = ": abs? dup 0 < if negate then ; -4 abs? .";

    assert_eq!(eval_output(source), "4 ");
}

#[test]
fn an_interactive_counted_loop_prints_its_indices() {
    assert_eq!(eval_output("10 0 do i . loop"), "0 1 2 3 4 5 6 7 8 9 ");
}

#[test]
fn stars_emit_and_break_the_line() {
    let source = ": star 42 emit ; : stars 0 do star loop cr ; 5 stars";

    assert_eq!(eval_output(source), "*****\n");
}

#[test]
fn radix_switches_show_radix_correct_digits() {
    assert_eq!(eval_output("255 hex . decimal 255 ."), "ff 255 ");
}

#[test]
fn parsing_follows_the_current_radix() {
    // A literal read in hex echoes its own digits back in hex.
    assert_eq!(eval_output("hex 255 . ff . decimal"), "255 ff ");
}

#[test]
fn an_underflow_reports_and_leaves_the_machine_responsive() {
    let mut machine = Machine::boot_capturing();

    let error = match machine.eval("<test>", ".") {
        Err(Exception::Error(error)) => error,
        other => panic!("expected an underflow, got {:?}", other),
    };

    assert_eq!(error.kind, ErrKind::StackUnderflow);
    assert!(machine.catch(error).is_none());

    let report = machine.console.take();
    assert!(report.contains("Stack underflow"), "report: {:?}", report);

    machine.eval("<test>", "2 3 + .").unwrap();
    assert_eq!(machine.console.take(), "5 ");
}

#[test]
fn dot_quote_prints_at_run_time() {
    let source = ": greet .\" hello, world\" cr ; greet";

    assert_eq!(eval_output(source), "hello, world\n");
}

#[test]
fn dot_paren_prints_while_compiling() {
    let source = ": quiet-word .( compiling now) 1 ; ";

    assert_eq!(eval_output(source), "compiling now");
}

#[test]
fn comments_are_invisible() {
    let source = "1 ( an inline comment ) 2 + . \\ and a line comment\n";

    assert_eq!(eval_output(source), "3 ");
}

#[test]
fn pictured_output_builds_a_string() {
    // 45 as two digits with a plus sign held in front.
    assert_eq!(eval_output("45 <# # # 43 hold #> type"), "+45");
}

#[test]
fn unsigned_print_treats_the_cell_raw() {
    assert_eq!(eval_output("7 u."), "7 ");
}

#[test]
fn the_stack_dump_is_non_destructive() {
    assert_eq!(eval_output("1 2 3 .s . . ."), "( 1 2 3 )\n3 2 1 ");
}

#[test]
fn see_decompiles_a_colon_definition() {
    let output = eval_output(": sq dup * ; see sq");

    assert!(output.contains(": sq"), "output: {:?}", output);
    assert!(output.contains("dup"), "output: {:?}", output);
    assert!(output.contains("*"), "output: {:?}", output);
}

#[test]
fn words_lists_new_definitions_first() {
    let output = eval_output(": freshly-minted 1 ; words");
    let fresh = output.find("freshly-minted").unwrap();
    let dup = output.find("dup").unwrap();

    assert!(fresh < dup, "output: {:?}", output);
}

#[test]
fn tracing_names_each_dispatch() {
    let output = eval_output("1 trace 2 3 + -1 trace");

    assert!(output.contains("+"), "output: {:?}", output);
    assert!(output.contains("( 2 3 )"), "output: {:?}", output);
}

#[test]
fn include_reads_a_file_on_the_input_stack() {
    let path = temp_dir().join(format!("oxforth-include-{}.fs", process::id()));

    fs::write(&path, ": from-file 11 ;\nfrom-file .\n").unwrap();

    let source = format!("include {}", path.display());
    let output = eval_output(&source);

    fs::remove_file(&path).ok();
    assert_eq!(output, "11 ");
}

#[test]
fn nested_includes_hit_the_input_stack_ceiling() {
    let path = temp_dir().join(format!("oxforth-nest-{}.fs", process::id()));

    // A file that includes itself: keyboard + eval text + two file
    // frames fill the stack, so the third include overflows.
    fs::write(&path, format!("include {}\n", path.display())).unwrap();

    let mut machine = Machine::boot_capturing();
    let result = machine.eval("<test>", &format!("include {}", path.display()));

    fs::remove_file(&path).ok();

    match result {
        Err(Exception::Error(error)) => assert_eq!(error.kind, ErrKind::InStack),
        other => panic!("expected the input stack to fill, got {:?}", other),
    }
}

#[test]
fn bye_unwinds_with_an_exit_code() {
    let mut machine = Machine::boot_capturing();

    match machine.eval("<test>", "1 2 bye") {
        Err(Exception::Bye(code)) => assert_eq!(code, 0),
        other => panic!("expected bye, got {:?}", other),
    }
}

#[test]
fn string_words_push_typeable_addresses() {
    assert_eq!(eval_output("\" cached text\" type"), "cached text");
}
