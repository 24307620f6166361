use std::io;

use env_logger::Env;
use myshell::{
    executable::{PathFinder, Runner},
    prompt::ConsolePrompter,
    session::Session,
    Shell,
};

fn main() {
    // Silent unless RUST_LOG asks for output; the transcript must stay exact.
    env_logger::Builder::from_env(Env::default().default_filter_or("off")).init();

    let prompter = ConsolePrompter::new(io::stdin().lock(), io::stdout(), io::stderr());
    let mut shell = Shell::new(prompter, PathFinder::new(), Runner::new(), Session::new());

    match shell.run() {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("{:#}", error);
            std::process::exit(1);
        }
    }
}
