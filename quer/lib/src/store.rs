//! Storage for querscripts.
//!
//! A querscript is plain text with one command per line, written in queue
//! order. There is no header and no escaping: a line is a command verbatim.
//!
//! [`ScriptStore`] is the seam the session uses for every script access, so
//! the loop can be exercised against [`MemoryScriptStore`] without touching
//! the filesystem.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Cursor, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::config::QuerConfig;
use crate::error::StoreError;

/// Trait for querscript storage backends.
pub trait ScriptStore {
    /// Returns the directory that holds the scripts.
    fn location(&self) -> &Path;

    /// Returns the file extension used for scripts.
    fn extension(&self) -> &str;

    /// Resolves a script name to its path.
    fn script_path(&self, name: &str) -> PathBuf {
        self.location()
            .join(format!("{name}.{}", self.extension()))
    }

    /// Returns true if something exists at the script's resolved path.
    fn exists(&self, name: &str) -> bool;

    /// Opens a script for line-by-line reading.
    ///
    /// ## Errors
    ///
    /// Returns an error if the script is missing or cannot be read.
    fn open(&self, name: &str) -> Result<Box<dyn BufRead>, StoreError>;

    /// Writes `commands` to the script, one per line, replacing any content.
    ///
    /// ## Errors
    ///
    /// Returns an error if the script cannot be written.
    fn write(&self, name: &str, commands: &[String]) -> Result<PathBuf, StoreError>;

    /// Lists the names of all saved scripts, sorted.
    ///
    /// ## Errors
    ///
    /// Returns an error if the script directory cannot be read.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Removes every entry in the script directory, returning how many were
    /// removed.
    ///
    /// ## Errors
    ///
    /// Returns an error if an entry cannot be removed.
    fn clean(&self) -> Result<usize, StoreError>;
}

/// Filesystem-backed script storage.
///
/// ## Examples
///
/// ```no_run
/// use quer_lib::{DirScriptStore, QuerConfig, ScriptStore};
///
/// let store = DirScriptStore::new(&QuerConfig::from_env());
/// store.write("greet", &["echo hello".to_string()]).unwrap();
/// assert_eq!(store.list().unwrap(), vec!["greet"]);
/// ```
#[derive(Debug, Clone)]
pub struct DirScriptStore {
    dir: PathBuf,
    extension: String,
}

impl DirScriptStore {
    /// Creates a store for the configured script directory.
    #[must_use]
    pub fn new(config: &QuerConfig) -> Self {
        Self {
            dir: config.script_dir().to_path_buf(),
            extension: config.extension().to_string(),
        }
    }

    /// Creates the script directory if it does not exist yet.
    ///
    /// ## Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_location(&self) -> Result<&Path, StoreError> {
        fs::create_dir_all(&self.dir)?;
        Ok(&self.dir)
    }
}

impl ScriptStore for DirScriptStore {
    fn location(&self) -> &Path {
        &self.dir
    }

    fn extension(&self) -> &str {
        &self.extension
    }

    fn exists(&self, name: &str) -> bool {
        self.script_path(name).exists()
    }

    fn open(&self, name: &str) -> Result<Box<dyn BufRead>, StoreError> {
        let path = self.script_path(name);

        if !path.exists() {
            return Err(StoreError::NotFound { path });
        }
        if !path.is_file() {
            return Err(StoreError::NotAFile { path });
        }

        let file = File::open(&path)?;
        debug!(path = %path.display(), "opened quer script");
        Ok(Box::new(BufReader::new(file)))
    }

    fn write(&self, name: &str, commands: &[String]) -> Result<PathBuf, StoreError> {
        self.ensure_location()?;
        let path = self.script_path(name);

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        let mut writer = BufWriter::new(file);

        for command in commands {
            writeln!(writer, "{command}")?;
        }
        writer.flush()?;

        debug!(path = %path.display(), commands = commands.len(), "wrote quer script");
        Ok(path)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(self.extension.as_str()) {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().into_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    fn clean(&self) -> Result<usize, StoreError> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            debug!(path = %path.display(), "removed");
            removed += 1;
        }

        Ok(removed)
    }
}

/// In-memory script storage.
///
/// Useful for tests and for embedding the session without a script
/// directory. Data is lost when the store is dropped.
#[derive(Debug)]
pub struct MemoryScriptStore {
    location: PathBuf,
    scripts: RwLock<BTreeMap<String, String>>,
    unreadable: RwLock<BTreeSet<String>>,
}

impl MemoryScriptStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            location: PathBuf::from("memory"),
            scripts: RwLock::new(BTreeMap::new()),
            unreadable: RwLock::new(BTreeSet::new()),
        }
    }

    /// Stores a script with the given raw contents.
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Lock`] if the store lock is poisoned.
    pub fn insert(&self, name: &str, contents: impl Into<String>) -> Result<(), StoreError> {
        self.scripts
            .write()
            .map_err(|_| StoreError::Lock)?
            .insert(name.to_string(), contents.into());
        Ok(())
    }

    /// Marks a name as present but impossible to open.
    ///
    /// ## Errors
    ///
    /// Returns [`StoreError::Lock`] if the store lock is poisoned.
    pub fn insert_unreadable(&self, name: &str) -> Result<(), StoreError> {
        self.unreadable
            .write()
            .map_err(|_| StoreError::Lock)?
            .insert(name.to_string());
        Ok(())
    }

    /// Returns the raw contents of a stored script.
    #[must_use]
    pub fn contents(&self, name: &str) -> Option<String> {
        self.scripts.read().ok()?.get(name).cloned()
    }
}

impl Default for MemoryScriptStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptStore for MemoryScriptStore {
    fn location(&self) -> &Path {
        &self.location
    }

    fn extension(&self) -> &str {
        "querscript"
    }

    fn exists(&self, name: &str) -> bool {
        let stored = self
            .scripts
            .read()
            .is_ok_and(|scripts| scripts.contains_key(name));
        let unreadable = self
            .unreadable
            .read()
            .is_ok_and(|names| names.contains(name));
        stored || unreadable
    }

    fn open(&self, name: &str) -> Result<Box<dyn BufRead>, StoreError> {
        let path = self.script_path(name);

        if self
            .unreadable
            .read()
            .map_err(|_| StoreError::Lock)?
            .contains(name)
        {
            return Err(StoreError::NotAFile { path });
        }

        let contents = self
            .scripts
            .read()
            .map_err(|_| StoreError::Lock)?
            .get(name)
            .cloned()
            .ok_or(StoreError::NotFound { path })?;

        Ok(Box::new(Cursor::new(contents.into_bytes())))
    }

    fn write(&self, name: &str, commands: &[String]) -> Result<PathBuf, StoreError> {
        let contents: String = commands.iter().map(|command| format!("{command}\n")).collect();
        self.insert(name, contents)?;
        Ok(self.script_path(name))
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .scripts
            .read()
            .map_err(|_| StoreError::Lock)?
            .keys()
            .cloned()
            .collect())
    }

    fn clean(&self) -> Result<usize, StoreError> {
        let mut scripts = self.scripts.write().map_err(|_| StoreError::Lock)?;
        let mut unreadable = self.unreadable.write().map_err(|_| StoreError::Lock)?;
        let removed = scripts.len() + unreadable.len();
        scripts.clear();
        unreadable.clear();
        Ok(removed)
    }
}
