use std::{
    collections::HashMap,
    ffi::OsString,
    io,
    path::{Path, PathBuf},
};

/// Process state shared by every REPL iteration.
///
/// The working directory is never cached here: the operating system stays
/// authoritative, and this type is the only place the shell reads or
/// changes it. Environment lookups go through optional overrides first.
#[derive(Debug, Default)]
pub struct Session {
    overrides: HashMap<String, OsString>,
}

/// A captured working directory that can later be restored.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingDir(PathBuf);

impl WorkingDir {
    pub fn path(&self) -> &Path {
        return &self.0;
    }
}

impl Session {
    pub fn new() -> Self {
        return Self::default();
    }

    pub fn with_var(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.overrides.insert(key.to_string(), value.into());
        return self;
    }

    pub fn var(&self, key: &str) -> Option<OsString> {
        if let Some(value) = self.overrides.get(key) {
            return Some(value.clone());
        }

        return std::env::var_os(key);
    }

    pub fn search_path(&self) -> Option<OsString> {
        return self.var("PATH");
    }

    /// Home directory, treating an empty value the same as an unset one.
    pub fn home(&self) -> Option<PathBuf> {
        return self
            .var("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from);
    }

    pub fn current_dir(&self) -> io::Result<PathBuf> {
        return std::env::current_dir();
    }

    pub fn change_dir(&mut self, path: &Path) -> io::Result<()> {
        log::debug!("Changing working directory to {}", path.display());
        return std::env::set_current_dir(path);
    }

    pub fn snapshot(&self) -> io::Result<WorkingDir> {
        return Ok(WorkingDir(self.current_dir()?));
    }

    pub fn restore(&mut self, snapshot: &WorkingDir) -> io::Result<()> {
        return self.change_dir(snapshot.path());
    }
}
