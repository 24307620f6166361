//! An interactive shell: reads a line, splits it into arguments with
//! POSIX-like quoting, then runs a builtin or a program found on `PATH`.

pub mod command;
pub mod executable;
pub mod paths;
pub mod prompt;
pub mod session;
pub mod shell;
pub mod tokenizer;

pub use shell::Shell;
