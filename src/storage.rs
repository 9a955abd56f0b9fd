//! Persistence slots the task store can be backed with

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::traits::PersistenceSlot;

/// A slot that stores its content in a local file
#[derive(Clone, Debug, PartialEq)]
pub struct JsonFileSlot {
    backing_file: PathBuf,
}

impl JsonFileSlot {
    pub fn new(path: &Path) -> Self {
        Self { backing_file: PathBuf::from(path) }
    }

    /// Get the path to the backing file
    pub fn path(&self) -> &Path {
        &self.backing_file
    }

    fn temp_file(&self) -> PathBuf {
        let mut name = self.backing_file.file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.backing_file.with_file_name(name)
    }
}

impl PersistenceSlot for JsonFileSlot {
    fn load(&self) -> io::Result<Option<String>> {
        match std::fs::read_to_string(&self.backing_file) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// The content is written to a sibling file first, then moved over the backing file
    fn save(&mut self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.backing_file.parent() {
            if parent.as_os_str().is_empty() == false {
                std::fs::create_dir_all(parent)?;
            }
        }
        let temp = self.temp_file();
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.backing_file)
    }
}


/// A slot that lives in memory.
///
/// Clones share the same content, so that a test can keep a handle on what a store saved.
#[derive(Clone, Debug, Default)]
pub struct MemorySlot {
    content: Arc<Mutex<Option<String>>>,
    fail_saves: Arc<Mutex<bool>>,
    save_count: Arc<Mutex<usize>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot that already holds some content
    pub fn with_content<S: ToString>(content: S) -> Self {
        let slot = Self::default();
        *slot.content.lock().unwrap() = Some(content.to_string());
        slot
    }

    pub fn content(&self) -> Option<String> {
        self.content.lock().unwrap().clone()
    }

    /// How many times content has been successfully saved
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap()
    }

    /// Make every subsequent save fail (or succeed again)
    pub fn set_fail_saves(&self, fail: bool) {
        *self.fail_saves.lock().unwrap() = fail;
    }
}

impl PersistenceSlot for MemorySlot {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.content())
    }

    fn save(&mut self, content: &str) -> io::Result<()> {
        if *self.fail_saves.lock().unwrap() {
            return Err(io::Error::new(io::ErrorKind::Other, "saves are disabled for this slot"));
        }
        *self.content.lock().unwrap() = Some(content.to_string());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }
}
