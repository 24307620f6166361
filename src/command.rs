use std::str::FromStr;

use anyhow::anyhow;
use thiserror::Error;

use crate::{
    executable::{
        ExecutableError, ExecutablePathFinder, ExecutableRunner, LaunchOptions, Resolved,
    },
    paths,
    prompt::Prompter,
    session::Session,
    tokenizer::tokenize,
};

pub const BUILTINS: &[&str] = &["exit", "echo", "type", "pwd", "cd"];

pub fn is_builtin(name: &str) -> bool {
    return BUILTINS.contains(&name);
}

#[derive(Error, Debug, PartialEq)]
pub enum CommandError {
    #[error("Invalid exit command format")]
    InvalidExit,

    #[error("Usage: type <command>")]
    TypeUsage,

    #[error("cd: missing argument")]
    CdMissingArgument,

    #[error("cd: too many arguments")]
    CdTooManyArguments,

    #[error("cd: $HOME not set")]
    HomeNotSet,

    #[error("cd: {0}: No such file or directory")]
    NoSuchDirectory(String),
}

#[derive(Debug, PartialEq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

#[derive(Debug, PartialEq)]
pub enum TypeCommand {
    WellKnown { cmd: String },
    Unknown { cmd: String },
}

#[derive(Debug, PartialEq)]
pub enum CdTarget {
    Home,
    Path(String),
}

#[derive(Debug, PartialEq)]
pub enum BuiltinCommand {
    Exit { code: i32 },
    Echo { input: String },
    Type(TypeCommand),
    Pwd,
    Cd { target: CdTarget },
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Builtin(BuiltinCommand),
    Invalid(CommandError),
    Unknown { cmd: String, args: Vec<String> },
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        return Command::from_tokens(tokenize(s)).ok_or(anyhow!("Failed to parse the command"));
    }
}

impl Command {
    /// Builds a command from an argument vector; `None` when it is empty.
    pub fn from_tokens(tokens: Vec<String>) -> Option<Self> {
        let mut tokens = tokens.into_iter();
        let cmd = tokens.next()?;
        let args: Vec<String> = tokens.collect();

        let command = match cmd.as_str() {
            "exit" => match args.as_slice() {
                [code] if code == "0" => Command::Builtin(BuiltinCommand::Exit { code: 0 }),
                _ => Command::Invalid(CommandError::InvalidExit),
            },
            "echo" => Command::Builtin(BuiltinCommand::Echo {
                input: args.join(" "),
            }),
            "type" => match args.as_slice() {
                [name] if is_builtin(name) => {
                    Command::Builtin(BuiltinCommand::Type(TypeCommand::WellKnown {
                        cmd: name.to_string(),
                    }))
                }
                [name] => Command::Builtin(BuiltinCommand::Type(TypeCommand::Unknown {
                    cmd: name.to_string(),
                })),
                _ => Command::Invalid(CommandError::TypeUsage),
            },
            "pwd" => Command::Builtin(BuiltinCommand::Pwd),
            "cd" => match args.as_slice() {
                [] => Command::Invalid(CommandError::CdMissingArgument),
                [target] if target == "~" => Command::Builtin(BuiltinCommand::Cd {
                    target: CdTarget::Home,
                }),
                [target] => Command::Builtin(BuiltinCommand::Cd {
                    target: CdTarget::Path(target.to_string()),
                }),
                _ => Command::Invalid(CommandError::CdTooManyArguments),
            },
            _ => Command::Unknown { cmd, args },
        };

        return Some(command);
    }

    pub fn run(
        self,
        prompter: &mut impl Prompter,
        finder: &impl ExecutablePathFinder,
        runner: &impl ExecutableRunner,
        session: &mut Session,
        options: LaunchOptions,
    ) -> anyhow::Result<Flow> {
        match self {
            Command::Builtin(builtin_command) => {
                return run_builtin_command(builtin_command, prompter, finder, session);
            }
            Command::Invalid(error) => {
                prompter.prompt(&format!("{}\n", error))?;
                return Ok(Flow::Continue);
            }
            Command::Unknown { cmd, args } => {
                return run_unknown_command(prompter, finder, runner, session, options, cmd, args);
            }
        }
    }
}

fn run_builtin_command(
    command: BuiltinCommand,
    prompter: &mut impl Prompter,
    finder: &impl ExecutablePathFinder,
    session: &mut Session,
) -> anyhow::Result<Flow> {
    match command {
        BuiltinCommand::Exit { code } => {
            return Ok(Flow::Exit(code));
        }
        BuiltinCommand::Echo { input } => {
            let prompt = format!("{}\n", input);
            prompter.prompt(&prompt)?;
        }
        BuiltinCommand::Type(command) => match command {
            TypeCommand::WellKnown { cmd } => {
                let prompt = format!("{} is a shell builtin\n", cmd);
                prompter.prompt(&prompt)?;
            }
            TypeCommand::Unknown { cmd } => {
                let search_path = session.search_path();

                let resolved = finder.resolve(&cmd, search_path.as_deref());
                let prompt = match resolved {
                    Resolved::External(full_path) => {
                        format!("{} is {}\n", cmd, full_path.display())
                    }
                    _ => format!("{}: not found\n", cmd),
                };
                prompter.prompt(&prompt)?;
            }
        },
        BuiltinCommand::Pwd => match session.current_dir() {
            Ok(pwd) => {
                let prompt = format!("{}\n", pwd.display());
                prompter.prompt(&prompt)?;
            }
            Err(error) => {
                let message = format!("Error getting current directory: {}\n", error);
                prompter.report(&message)?;
            }
        },
        BuiltinCommand::Cd { target } => {
            if let Err(error) = change_directory(session, target) {
                prompter.prompt(&format!("{}\n", error))?;
            }
        }
    }

    return Ok(Flow::Continue);
}

fn change_directory(session: &mut Session, target: CdTarget) -> Result<(), CommandError> {
    let target = match target {
        CdTarget::Home => session.home().ok_or(CommandError::HomeNotSet)?,
        CdTarget::Path(path) => path.into(),
    };

    let destination = match session.current_dir() {
        Ok(cwd) => paths::resolve_against(&cwd, &target),
        Err(_) => paths::normalize(&target),
    };

    if let Err(error) = session.change_dir(&destination) {
        log::debug!("cd to {} failed: {}", destination.display(), error);
        return Err(CommandError::NoSuchDirectory(
            destination.display().to_string(),
        ));
    }

    return Ok(());
}

fn run_unknown_command(
    prompter: &mut impl Prompter,
    finder: &impl ExecutablePathFinder,
    runner: &impl ExecutableRunner,
    session: &Session,
    options: LaunchOptions,
    cmd: String,
    args: Vec<String>,
) -> anyhow::Result<Flow> {
    let search_path = session.search_path();
    let Resolved::External(path) = finder.resolve(&cmd, search_path.as_deref()) else {
        let prompt = format!("{}\n", ExecutableError::CommandNotFound(cmd));
        prompter.prompt(&prompt)?;
        return Ok(Flow::Continue);
    };

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(cmd.clone());
    argv.extend(args);

    match runner.execute(&path, &argv, options) {
        Ok(outcome) => {
            log::debug!("{} exited with {}", path.display(), outcome.status);

            if !outcome.stdout.is_empty() {
                prompter.prompt(&String::from_utf8_lossy(&outcome.stdout))?;
            }
            if !outcome.stderr.is_empty() {
                prompter.report(&String::from_utf8_lossy(&outcome.stderr))?;
            }
        }
        Err(error) => {
            log::warn!("{:#}", anyhow::Error::from(error));
            let prompt = format!("{}\n", ExecutableError::CommandNotFound(cmd));
            prompter.prompt(&prompt)?;
        }
    }

    return Ok(Flow::Continue);
}
