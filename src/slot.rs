// Durable key-value slots

use chrono::Utc;
use eyre::{Context, Result, eyre};
use fs2::FileExt;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A store of string values under string keys
///
/// Writes fully replace whatever was stored under the key before.
pub trait Slot {
    /// Read the value under `key`, or `None` if nothing was ever written
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`
    fn write(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: Slot + ?Sized> Slot for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

/// Validate a slot key
///
/// Keys double as file names for [`FileSlot`], so they are restricted to
/// alphanumerics, `_` and `-`.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(eyre!("Slot key cannot be empty"));
    }
    if key.len() > 64 {
        return Err(eyre!("Slot key too long: {} (max 64 chars)", key));
    }
    if !key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(eyre!("Invalid slot key: {} (must be alphanumeric with _/-)", key));
    }
    Ok(())
}

/// One JSON file per key inside a directory
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Open a slot directory, creating it if needed
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create slot directory")?;
        Ok(Self { dir })
    }

    /// File backing `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Slot for FileSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.path_for(key);

        let mut file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("Failed to open slot file for reading"),
        };

        // Shared lock so a concurrent write is never seen half done
        FileExt::lock_shared(&file).context("Failed to acquire file lock")?;
        let mut content = String::new();
        file.read_to_string(&mut content).context("Failed to read slot file")?;
        Ok(Some(content))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.path_for(key);

        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .context("Failed to open slot file for writing")?;

        // Truncate only once we hold the lock
        FileExt::lock_exclusive(&file).context("Failed to acquire file lock")?;
        file.set_len(0)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        debug!(file = ?path, bytes = value.len(), "Wrote slot file");
        // Lock is released when file is dropped
        Ok(())
    }
}

/// Keys stored as rows of an SQLite table
pub struct SqliteSlot {
    db: Connection,
}

impl SqliteSlot {
    /// Open or create the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create slot directory")?;
        }

        let db = Connection::open(path).context("Failed to open SQLite database")?;
        let slot = Self { db };
        slot.create_schema()?;
        Ok(slot)
    }

    /// Private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let slot = Self { db };
        slot.create_schema()?;
        Ok(slot)
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating slot schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }
}

impl Slot for SqliteSlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let value: Option<String> = self
            .db
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.db.execute(
            "INSERT OR REPLACE INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)",
            rusqlite::params![key, value, Utc::now().timestamp_millis()],
        )?;
        debug!(key, bytes = value.len(), "Wrote slot row");
        Ok(())
    }
}

/// Process-local slot, mostly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    values: HashMap<String, String>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Slot for MemorySlot {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("tasks").is_ok());
        assert!(validate_key("my-tasks_2").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("a b").is_err());
        assert!(validate_key(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_file_slot_missing_key() {
        let temp = TempDir::new().unwrap();
        let slot = FileSlot::open(temp.path()).unwrap();
        assert_eq!(slot.read("tasks").unwrap(), None);
    }

    #[test]
    fn test_file_slot_overwrites() {
        let temp = TempDir::new().unwrap();
        let mut slot = FileSlot::open(temp.path().join("nested")).unwrap();

        slot.write("tasks", "[1,2,3,4,5,6]").unwrap();
        slot.write("tasks", "[]").unwrap();

        assert_eq!(slot.read("tasks").unwrap().as_deref(), Some("[]"));
        let on_disk = fs::read_to_string(slot.path_for("tasks")).unwrap();
        assert_eq!(on_disk, "[]");
    }

    #[test]
    fn test_file_slot_read_never_sees_partial_write() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::thread;

        let temp = TempDir::new().unwrap();
        let small = format!("[{}]", vec!["\"a\""; 3].join(","));
        let large = format!("[{}]", vec!["\"task text that takes up room\""; 20_000].join(","));

        let mut writer = FileSlot::open(temp.path()).unwrap();
        writer.write("tasks", &small).unwrap();

        let done = Arc::new(AtomicBool::new(false));
        let reader = {
            let dir = temp.path().to_path_buf();
            let done = Arc::clone(&done);
            let (small, large) = (small.clone(), large.clone());
            thread::spawn(move || {
                let slot = FileSlot::open(dir).unwrap();
                let mut reads = 0;
                while !done.load(Ordering::SeqCst) || reads == 0 {
                    let content = slot.read("tasks").unwrap().unwrap();
                    assert!(content == small || content == large, "read a partial write");
                    reads += 1;
                }
                reads
            })
        };

        for i in 0..50 {
            let value = if i % 2 == 0 { &large } else { &small };
            writer.write("tasks", value).unwrap();
        }
        done.store(true, Ordering::SeqCst);

        assert!(reader.join().unwrap() > 0);
    }

    #[test]
    fn test_file_slot_rejects_bad_key() {
        let temp = TempDir::new().unwrap();
        let mut slot = FileSlot::open(temp.path()).unwrap();
        assert!(slot.write("../tasks", "[]").is_err());
    }

    #[test]
    fn test_sqlite_slot_round_trip() {
        let temp = TempDir::new().unwrap();
        let db_path = temp.path().join("tasklist.db");

        {
            let mut slot = SqliteSlot::open(&db_path).unwrap();
            assert_eq!(slot.read("tasks").unwrap(), None);
            slot.write("tasks", "[\"a\"]").unwrap();
            slot.write("tasks", "[\"b\"]").unwrap();
        }

        let slot = SqliteSlot::open(&db_path).unwrap();
        assert_eq!(slot.read("tasks").unwrap().as_deref(), Some("[\"b\"]"));
    }

    #[test]
    fn test_sqlite_slot_keys_are_independent() {
        let mut slot = SqliteSlot::open_in_memory().unwrap();
        slot.write("one", "1").unwrap();
        slot.write("two", "2").unwrap();
        assert_eq!(slot.read("one").unwrap().as_deref(), Some("1"));
        assert_eq!(slot.read("two").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn test_memory_slot() {
        let mut slot = MemorySlot::new();
        assert_eq!(slot.read("tasks").unwrap(), None);
        slot.write("tasks", "[]").unwrap();
        assert_eq!(slot.read("tasks").unwrap().as_deref(), Some("[]"));
    }
}
