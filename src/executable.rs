use std::{
    ffi::OsStr,
    io,
    path::{Path, PathBuf},
    process::{Child, ExitStatus, Stdio},
};
use thiserror::Error;

use crate::command::is_builtin;

#[derive(Error, Debug)]
pub enum ExecutableError {
    #[error("{0}: command not found")]
    CommandNotFound(String),

    #[error("failed to spawn {}", path.display())]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for {}", path.display())]
    WaitFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, PartialEq)]
pub enum Resolved {
    Builtin(String),
    External(PathBuf),
    NotFound,
}

pub trait ExecutablePathFinder {
    fn find_executable_path(&self, search_path: &OsStr, name: &str) -> Option<PathBuf> {
        for dir in std::env::split_paths(search_path) {
            // Empty entries do not stand for the current directory.
            if dir.as_os_str().is_empty() {
                continue;
            }

            let candidate = dir.join(name);
            log::trace!("Probing {}", candidate.display());
            if is_executable_file(&candidate) {
                return Some(candidate);
            }
        }

        return None;
    }

    fn resolve(&self, name: &str, search_path: Option<&OsStr>) -> Resolved {
        if is_builtin(name) {
            return Resolved::Builtin(name.to_string());
        }

        let found = if name.contains(std::path::is_separator) {
            let path = PathBuf::from(name);
            is_executable_file(&path).then_some(path)
        } else {
            search_path.and_then(|search_path| self.find_executable_path(search_path, name))
        };

        let resolved = match found {
            Some(path) => Resolved::External(path),
            None => Resolved::NotFound,
        };
        log::debug!("Resolved {:?} to {:?}", name, resolved);

        return resolved;
    }
}

#[cfg(unix)]
fn is_executable_file(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    return match std::fs::metadata(path) {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    };
}

#[cfg(not(unix))]
fn is_executable_file(path: &Path) -> bool {
    return std::fs::metadata(path)
        .map(|metadata| metadata.is_file())
        .unwrap_or(false);
}

#[cfg(unix)]
fn set_arg0(command: &mut std::process::Command, name: &str) {
    use std::os::unix::process::CommandExt;
    command.arg0(name);
}

#[cfg(not(unix))]
fn set_arg0(_command: &mut std::process::Command, _name: &str) {}

#[derive(Debug, Clone, Copy)]
pub struct LaunchOptions {
    pub inherit_streams: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        return Self {
            inherit_streams: true,
        };
    }
}

#[derive(Debug)]
pub struct LaunchOutcome {
    pub status: ExitStatus,
    // Empty unless the streams were captured.
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

pub struct Launched {
    path: PathBuf,
    child: Child,
}

pub trait ExecutableRunner {
    /// Starts `path` with `args`, where `args[0]` is the name the user typed.
    fn spawn(
        &self,
        path: &Path,
        args: &[String],
        options: LaunchOptions,
    ) -> Result<Launched, ExecutableError> {
        let mut command = std::process::Command::new(path);
        if let Some(name) = args.first() {
            set_arg0(&mut command, name);
        }
        command.args(args.iter().skip(1));

        if options.inherit_streams {
            command
                .stdin(Stdio::inherit())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());
        } else {
            command
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped());
        }

        let child = command.spawn().map_err(|source| {
            return ExecutableError::SpawnFailed {
                path: path.to_path_buf(),
                source,
            };
        })?;

        return Ok(Launched {
            path: path.to_path_buf(),
            child,
        });
    }

    fn wait(&self, launched: Launched) -> Result<LaunchOutcome, ExecutableError> {
        let Launched { path, child } = launched;
        let output = child
            .wait_with_output()
            .map_err(|source| return ExecutableError::WaitFailed { path, source })?;

        return Ok(LaunchOutcome {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }

    fn execute(
        &self,
        path: &Path,
        args: &[String],
        options: LaunchOptions,
    ) -> Result<LaunchOutcome, ExecutableError> {
        let launched = self.spawn(path, args, options)?;
        return self.wait(launched);
    }
}

pub struct PathFinder {}

impl ExecutablePathFinder for PathFinder {}

impl PathFinder {
    pub fn new() -> Self {
        return Self {};
    }
}

pub struct Runner {}

impl ExecutableRunner for Runner {}

impl Runner {
    pub fn new() -> Self {
        return Self {};
    }
}
