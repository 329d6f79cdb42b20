//! Thin CLI over the Achronyme engine.
//!
//! With a file argument, evaluates the file as one program and prints the
//! result. Without arguments, runs an interactive line-by-line session with
//! `reset` and `quit` commands.

use std::{
    env, fs,
    io::{self, BufRead, Write},
    process::ExitCode,
};

use achronyme::Session;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let mut session = Session::new();

    if let Some(file_path) = args.get(1) {
        let source = match fs::read_to_string(file_path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("error: cannot read {file_path}: {err}");
                return ExitCode::FAILURE;
            }
        };
        return match session.eval(&source) {
            Ok(rendered) => {
                println!("{rendered}");
                ExitCode::SUCCESS
            }
            Err(err) => {
                eprintln!("error: {err}");
                ExitCode::FAILURE
            }
        };
    }

    repl(&mut session)
}

fn repl(session: &mut Session) -> ExitCode {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("ach> ");
        if stdout.flush().is_err() {
            return ExitCode::FAILURE;
        }
        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return ExitCode::SUCCESS,
            Ok(_) => {}
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }

        let line = line.trim();
        match line {
            "" => {}
            "quit" | "exit" => return ExitCode::SUCCESS,
            "reset" => session.reset(),
            source => match session.eval(source) {
                Ok(rendered) => println!("{rendered}"),
                Err(err) => eprintln!("error: {err}"),
            },
        }
    }
}
