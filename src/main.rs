use oxforth::{
    LOCALE, VERSION,
    runtime::{error::Exception, interpreter::Machine},
};
use std::{env::args, process::exit};

/// Command line options.
struct Options {
    /// `-i <path>`: push a source file onto the input stack at startup.
    include: Option<String>,

    /// `-x <word>`: run a word once after the primary input drains.
    execute: Option<String>,

    /// `-q`: suppress the banner.
    quiet: bool,

    /// `-t`: enable tracing before the first token.
    trace: bool,
}

fn usage() -> ! {
    eprintln!("usage: oxforth [-i <file>] [-x <word>] [-q] [-t]");
    exit(2);
}

fn parse_options() -> Options {
    let mut options = Options {
        include: None,
        execute: None,
        quiet: false,
        trace: false,
    };

    let mut arguments = args().skip(1);

    while let Some(argument) = arguments.next() {
        match argument.as_str() {
            "-i" => match arguments.next() {
                Some(path) => options.include = Some(path),
                None => usage(),
            },

            "-x" => match arguments.next() {
                Some(word) => options.execute = Some(word),
                None => usage(),
            },

            "-q" => options.quiet = true,

            "-t" => options.trace = true,

            _ => usage(),
        }
    }

    options
}

/// `D` for the stack-checked build, `F` for the fast one.
fn build_letter() -> char {
    if cfg!(feature = "stack-checked") { 'D' } else { 'F' }
}

fn main() {
    let options = parse_options();
    let mut machine = Machine::boot();

    if !options.quiet {
        println!(
            "-- OxForth alpha Version: {}{} ({})",
            VERSION,
            build_letter(),
            LOCALE
        );
    }

    machine.trace = options.trace;
    machine.set_deferred(options.execute);

    if let Some(path) = &options.include {
        if let Err(exception) = machine.input.push_file(&mut machine.flash, path) {
            eprintln!("? {}", exception);

            let code = match exception {
                Exception::Error(error) => error.kind.code() as i32,
                Exception::Bye(code) => code,
                Exception::Reset(_) => 1,
            };

            exit(code);
        }
    }

    exit(machine.quit());
}
