//! Session persistence.
//!
//! A save holds only what is needed to rebuild a session: the seed, the
//! player position, the session name and an opaque player blob owned by the
//! caller. Terrain is never written; loading regenerates it from the seed.
//!
//! Saves are stored one directory per session:
//! `{base_dir}/{session}/save.json`

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PersistenceError;

/// File name of a session's save inside its directory
pub const SAVE_FILE_NAME: &str = "save.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedWorld {
    pub seed: u64,
    pub player_position: SavedPosition,
}

/// On-disk form of a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveFile {
    pub world: SavedWorld,
    /// Caller-owned data, stored verbatim
    #[serde(default = "empty_object")]
    pub player: Value,
    #[serde(default)]
    pub session_name: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

impl SaveFile {
    pub fn new(seed: u64, (x, y): (i32, i32), player: Value, session_name: impl Into<String>) -> Self {
        Self {
            world: SavedWorld {
                seed,
                player_position: SavedPosition { x, y },
            },
            player,
            session_name: Some(session_name.into()),
        }
    }

    pub fn position(&self) -> (i32, i32) {
        let p = self.world.player_position;
        (p.x, p.y)
    }

    /// Write as pretty-printed JSON. The document goes to a sibling
    /// `.tmp` file first and is renamed over `path`, so an interrupted write
    /// leaves any previous save intact.
    pub fn write_to(&self, path: &Path) -> Result<(), PersistenceError> {
        let tmp = temp_path(path);
        let tmp_err = |source| PersistenceError::Io {
            path: tmp.clone(),
            source,
        };

        let file = File::create(&tmp).map_err(tmp_err)?;
        let mut writer = BufWriter::new(file);
        let written = serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|source| PersistenceError::Parse {
                path: path.to_path_buf(),
                source,
            })
            .and_then(|()| writer.flush().map_err(tmp_err))
            .and_then(|()| writer.get_ref().sync_all().map_err(tmp_err));
        drop(writer);

        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }

        fs::rename(&tmp, path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read_from(path: &Path) -> Result<Self, PersistenceError> {
        let file = File::open(path).map_err(|source| PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|source| PersistenceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Durable storage for saves, keyed by session name
pub trait SaveStore {
    fn save(&self, session: &str, save: &SaveFile) -> Result<(), PersistenceError>;

    /// Fails with `SessionNotFound` when no save exists for `session`
    fn load(&self, session: &str) -> Result<SaveFile, PersistenceError>;

    /// Names of all sessions with a save, sorted
    fn list_sessions(&self) -> Result<Vec<String>, PersistenceError>;
}

/// Directory-backed save store
#[derive(Clone, Debug)]
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the save file for `session`
    pub fn save_path(&self, session: &str) -> Result<PathBuf, PersistenceError> {
        validate_session_name(session)?;
        Ok(self.base_dir.join(session).join(SAVE_FILE_NAME))
    }

    pub fn exists(&self, session: &str) -> bool {
        self.save_path(session).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Delete a session's directory (if it exists)
    pub fn delete(&self, session: &str) -> Result<(), PersistenceError> {
        validate_session_name(session)?;
        let dir = self.base_dir.join(session);
        if dir.exists() {
            fs::remove_dir_all(&dir).map_err(|source| PersistenceError::Io { path: dir, source })?;
        }
        Ok(())
    }
}

impl SaveStore for FileStore {
    fn save(&self, session: &str, save: &SaveFile) -> Result<(), PersistenceError> {
        let path = self.save_path(session)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| PersistenceError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        save.write_to(&path)
    }

    fn load(&self, session: &str) -> Result<SaveFile, PersistenceError> {
        let path = self.save_path(session)?;
        if !path.is_file() {
            return Err(PersistenceError::SessionNotFound(session.to_string()));
        }
        SaveFile::read_from(&path)
    }

    fn list_sessions(&self) -> Result<Vec<String>, PersistenceError> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let io_err = |source| PersistenceError::Io {
            path: self.base_dir.clone(),
            source,
        };

        let mut sessions = Vec::new();
        for entry in fs::read_dir(&self.base_dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if !path.join(SAVE_FILE_NAME).is_file() {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                sessions.push(name.to_string());
            }
        }

        sessions.sort();
        Ok(sessions)
    }
}

/// `save.json` -> `save.json.tmp`
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn validate_session_name(session: &str) -> Result<(), PersistenceError> {
    let invalid = session.is_empty()
        || session == "."
        || session == ".."
        || session.contains(['/', '\\'])
        || session.contains('\0');
    if invalid {
        Err(PersistenceError::InvalidSessionName(session.to_string()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn sample() -> SaveFile {
        SaveFile::new(42, (17, -3), json!({"name": "Ada", "level": 3}), "alpha")
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.save("alpha", &sample()).unwrap();
        assert!(store.exists("alpha"));
        assert!(dir.path().join("alpha").join("save.json").is_file());

        let loaded = store.load("alpha").unwrap();
        assert_eq!(loaded, sample());
        assert_eq!(loaded.position(), (17, -3));
    }

    #[test]
    fn test_overwrite_replaces_save() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.save("alpha", &sample()).unwrap();

        let moved = SaveFile::new(42, (99, 5), json!({"name": "Ada", "level": 4}), "alpha");
        store.save("alpha", &moved).unwrap();

        assert_eq!(store.load("alpha").unwrap(), moved);
        assert!(!dir.path().join("alpha").join("save.json.tmp").exists());
    }

    #[test]
    fn test_stale_temp_file_is_ignored() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.save("alpha", &sample()).unwrap();

        // Leftover from a save cut short
        fs::write(dir.path().join("alpha").join("save.json.tmp"), "{ \"world\": ").unwrap();
        assert_eq!(store.load("alpha").unwrap(), sample());
        assert_eq!(store.list_sessions().unwrap(), vec!["alpha"]);

        // The next save reclaims it
        store.save("alpha", &sample()).unwrap();
        assert!(!dir.path().join("alpha").join("save.json.tmp").exists());
    }

    #[test]
    fn test_temp_path_sits_next_to_save() {
        let path = Path::new("saves").join("alpha").join("save.json");
        assert_eq!(temp_path(&path), Path::new("saves").join("alpha").join("save.json.tmp"));
    }

    #[test]
    fn test_wire_format() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "world": { "seed": 42, "player_position": { "x": 17, "y": -3 } },
                "player": { "name": "Ada", "level": 3 },
                "session_name": "alpha"
            })
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let text = r#"{"world": {"seed": 7, "player_position": {"x": 1, "y": 2}}}"#;
        let save: SaveFile = serde_json::from_str(text).unwrap();
        assert_eq!(save.world.seed, 7);
        assert_eq!(save.player, json!({}));
        assert_eq!(save.session_name, None);
    }

    #[test]
    fn test_missing_session() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.load("nobody"),
            Err(PersistenceError::SessionNotFound(name)) if name == "nobody"
        ));
    }

    #[test]
    fn test_corrupt_save() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        fs::create_dir_all(dir.path().join("broken")).unwrap();
        fs::write(dir.path().join("broken").join("save.json"), "{ not json").unwrap();

        assert!(matches!(store.load("broken"), Err(PersistenceError::Parse { .. })));
    }

    #[test]
    fn test_missing_required_field() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("save.json");
        fs::write(&path, r#"{"world": {"seed": 7}}"#).unwrap();
        assert!(matches!(SaveFile::read_from(&path), Err(PersistenceError::Parse { .. })));
    }

    #[test]
    fn test_list_sessions() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(store.list_sessions().unwrap().is_empty());

        store.save("zeta", &sample()).unwrap();
        store.save("alpha", &sample()).unwrap();
        // Directories without a save are ignored
        fs::create_dir_all(dir.path().join("empty")).unwrap();

        assert_eq!(store.list_sessions().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_missing_base_dir_lists_nothing() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path().join("not-there"));
        assert!(store.list_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_delete_session() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        store.save("alpha", &sample()).unwrap();
        store.delete("alpha").unwrap();
        assert!(!store.exists("alpha"));
        store.delete("alpha").unwrap();
    }

    #[test]
    fn test_rejects_path_like_names() {
        let dir = tempdir().unwrap();
        let store = FileStore::new(dir.path());
        for name in ["", "..", "a/b", "a\\b"] {
            assert!(matches!(
                store.save(name, &sample()),
                Err(PersistenceError::InvalidSessionName(_))
            ));
        }
    }
}
