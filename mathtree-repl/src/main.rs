mod config;
mod error;

use config::{usage, Config};
use env_logger::Env;
use error::InvalidBinding;
use log::{debug, info};
use mathtree_compute::{
    build::parse_expression_with,
    derivative::differentiate_with,
    numerical::{evaluate_checked, Ctxt},
    simplify::{canonicalize_with, step::Step},
};
use mathtree_error::Error;
use mathtree_parser::{
    grammar::{build_tables, Grammar, ParseTable},
    tokenizer::TokenKind,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use std::{fs, io::{self, IsTerminal, Read}, process::ExitCode};

const MANUAL: &str = "\
Enter an expression in x, such as `2*x^2 - 5*x*x` or `log(e)_(x + 1)`.
Append `; x=1, y=2` to evaluate the expression at a point. Enter `q` to quit.";

/// Prints the report of the error, pointing into the given source.
fn report(err: &Error, src_id: &str, source: &str) {
    if let Err(io_err) = err.report_to_stderr(src_id, source) {
        eprintln!("{}", io_err);
    }
}

/// Builds the parse tables, from the grammar file if one was given.
fn load_table(config: &Config) -> Option<ParseTable> {
    let Some(path) = &config.grammar else {
        return match mathtree_parser::expression_table() {
            Ok(table) => Some(table),
            Err(err) => {
                report(&err, "grammar", "");
                None
            },
        };
    };

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("cannot read {}: {}", path.display(), err);
            return None;
        },
    };
    match text.parse::<Grammar>().and_then(|grammar| build_tables(grammar, TokenKind::alphabet())) {
        Ok(table) => {
            info!("loaded grammar from {}", path.display());
            Some(table)
        },
        Err(err) => {
            report(&err, &path.display().to_string(), &text);
            None
        },
    }
}

/// Splits `expr ; x=1, y=2` into the expression and the bound variables, if there are any.
fn split_bindings(line: &str) -> Result<(&str, Option<Ctxt>), Error> {
    let Some((source, bindings)) = line.split_once(';') else {
        return Ok((line, None));
    };

    let mut ctxt = Ctxt::new();
    let mut start = source.len() + 1;
    for text in bindings.split(',') {
        let span = start..start + text.len();
        start = span.end + 1;

        let invalid = || Error::new(vec![span.clone()], InvalidBinding { text: text.to_string() });
        let (name, value) = text.split_once('=').ok_or_else(invalid)?;
        let (name, value) = (name.trim(), value.trim().parse::<f64>().map_err(|_| invalid())?);
        if name.is_empty() {
            return Err(invalid());
        }
        ctxt.add_var(name, value);
    }

    Ok((source, Some(ctxt)))
}

fn print_steps(steps: &[Step]) {
    for step in steps {
        println!("  {}", step);
    }
}

/// Parses, canonicalizes, and differentiates one line of input, printing the results.
fn read_eval(line: &str, table: &ParseTable, config: &Config) -> Result<(), Error> {
    let (source, ctxt) = split_bindings(line)?;
    let node = parse_expression_with(table, source, &config.limits)?;
    debug!("built {:?}", node);

    let mut steps = Vec::new();
    let (canonical, exclusions) = canonicalize_with(&node, &config.limits, &mut steps)?;
    println!("Representation: {}", canonical);
    if config.steps {
        print_steps(&steps);
    }
    println!("Exclusions: {}", exclusions);

    let mut steps = Vec::new();
    let (derivative, mut derivative_exclusions) =
        differentiate_with(&canonical, &config.var, &config.limits, &mut steps)?;
    derivative_exclusions.extend(exclusions.clone());
    println!("Derivative: {}", derivative);
    if config.steps {
        print_steps(&steps);
    }
    println!("Derivative exclusions: {}", derivative_exclusions);

    if let Some(ctxt) = ctxt {
        println!("Value: {}", evaluate_checked(&canonical, &exclusions, &ctxt)?);
        println!("Slope: {}", evaluate_checked(&derivative, &derivative_exclusions, &ctxt)?);
    }
    Ok(())
}

/// Processes every non-empty line of the input. Returns false if any line failed.
fn batch(input: &str, table: &ParseTable, config: &Config) -> bool {
    let mut ok = true;
    for line in input.lines().filter(|line| !line.trim().is_empty()) {
        println!("> {}", line);
        if let Err(err) = read_eval(line, table, config) {
            report(&err, "input", line);
            ok = false;
        }
    }
    ok
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::new().filter_or("MATHTREE_LOG", "warn")).init();

    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            report(&err, "arguments", "");
            eprint!("{}", usage());
            return ExitCode::FAILURE;
        },
    };
    if config.help {
        print!("{}", usage());
        return ExitCode::SUCCESS;
    }
    let Some(table) = load_table(&config) else {
        return ExitCode::FAILURE;
    };

    if let Some(path) = &config.file {
        // process source file
        let input = match fs::read_to_string(path) {
            Ok(input) => input,
            Err(err) => {
                eprintln!("cannot read {}: {}", path.display(), err);
                return ExitCode::FAILURE;
            },
        };
        return if batch(&input, &table, &config) { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    if !io::stdin().is_terminal() {
        // read expressions from stdin
        let mut input = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut input) {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
        return if batch(&input, &table, &config) { ExitCode::SUCCESS } else { ExitCode::FAILURE };
    }

    // run the repl / interactive mode
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        },
    };
    println!("{}", MANUAL);

    fn process_line(rl: &mut DefaultEditor, table: &ParseTable, config: &Config) -> Result<bool, ReadlineError> {
        let input = rl.readline(">>> ")?;
        let trimmed = input.trim();
        if trimmed == "q" || trimmed == "Q" {
            return Ok(false);
        }
        if trimmed.is_empty() {
            return Ok(true);
        }

        rl.add_history_entry(&input)?;

        if let Err(err) = read_eval(&input, table, config) {
            report(&err, "input", &input);
        }
        Ok(true)
    }

    loop {
        match process_line(&mut rl, &table, &config) {
            Ok(true) => (),
            Ok(false) => break,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => break,
            Err(err) => {
                eprintln!("{}", err);
                break;
            },
        }
    }

    println!("Goodbye!");
    ExitCode::SUCCESS
}
