// ABOUTME: CLI entry point — runs a script file or drops into an interactive REPL

use clap::Parser as ClapParser;
use lox::config::{self, EXIT_RUNTIME_ERROR, EXIT_USAGE_ERROR, HISTORY_FILE, WELCOME_MESSAGE, WELCOME_PROMPT};
use lox::error::Diagnostics;
use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::scanner::Scanner;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::path::PathBuf;
use std::process::ExitCode;

/// A tree-walking interpreter for Lox
#[derive(ClapParser, Debug)]
#[command(name = "lox")]
#[command(version = config::VERSION)]
#[command(about = "A tree-walking interpreter for Lox")]
struct CliArgs {
    /// Script file to execute (if omitted, starts an interactive REPL)
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match args.script {
        Some(path) => run_file(&path),
        None => {
            run_prompt();
            ExitCode::SUCCESS
        }
    }
}

fn run_file(path: &PathBuf) -> ExitCode {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            eprintln!("Cannot read script file {}: {}", path.display(), e);
            return ExitCode::from(EXIT_USAGE_ERROR as u8);
        }
    };

    let mut diagnostics = Diagnostics::new();
    let interpreter = Interpreter::new(Box::new(std::io::stdout()));
    run(&contents, &interpreter, &mut diagnostics);

    if diagnostics.had_error {
        ExitCode::from(EXIT_USAGE_ERROR as u8)
    } else if diagnostics.had_runtime_error {
        ExitCode::from(EXIT_RUNTIME_ERROR as u8)
    } else {
        ExitCode::SUCCESS
    }
}

fn run_prompt() {
    let editor_config = Config::builder().auto_add_history(true).build();
    let mut rl = match DefaultEditor::with_config(editor_config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("Failed to initialize REPL: {}", e);
            return;
        }
    };
    let _ = rl.load_history(HISTORY_FILE);

    println!("{}", WELCOME_MESSAGE);

    let interpreter = Interpreter::new(Box::new(std::io::stdout()));
    let mut diagnostics = Diagnostics::new();

    loop {
        match rl.readline(WELCOME_PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                run(&line, &interpreter, &mut diagnostics);
                // A mistyped line shouldn't end the session; only the
                // syntax-error flag resets between prompts.
                diagnostics.reset();
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    let _ = rl.save_history(HISTORY_FILE);
}

fn run(source: &str, interpreter: &Interpreter, diagnostics: &mut Diagnostics) {
    let tokens = Scanner::new(source).scan_tokens(diagnostics);
    let statements = {
        let mut parser = Parser::new(tokens, diagnostics);
        parser.parse()
    };

    if diagnostics.had_error {
        return;
    }

    interpreter.interpret(&statements, diagnostics);
}
