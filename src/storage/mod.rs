//! # Storage Module - Player Data Persistence
//!
//! Player records live in a Sled database under `<data_dir>/players`, serialized with
//! bincode. CSV exports and imports are plain files directly inside `<data_dir>`.
//!
//! ```text
//! data/
//! ├── players/        ← sled database (records, name index, bridge identities)
//! ├── backup.csv      ← `data export backup`
//! └── migrated.csv    ← picked up by `data import migrated`
//! ```
//!
//! Command handlers only see the [`PlayerStore`] trait; [`SledPlayerStore`] is the
//! implementation the binary and the integration tests use.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lifestealx::storage::{PlayerStore, SledPlayerStore};
//! use lifestealx::types::{PlayerId, PlayerRecord};
//!
//! fn main() -> Result<(), lifestealx::errors::StorageError> {
//!     let mut store = SledPlayerStore::open("./data")?;
//!     let record = PlayerRecord::new(PlayerId::new_random(), "Steve", 10);
//!     store.save(&record)?;
//!     let path = store.export("backup")?;
//!     println!("exported to {}", path.display());
//!     Ok(())
//! }
//! ```

pub mod csv;

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use log::{debug, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sled::{Batch, IVec};

use crate::errors::StorageError;
use crate::logutil::escape_log;
use crate::types::{PlayerId, PlayerRecord, PLAYER_SCHEMA_VERSION};

const TREE_PLAYERS: &str = "players";
const TREE_NAMES: &str = "player_names";
const TREE_BRIDGE: &str = "bridge_players";

/// Characters allowed in export/import file stems. A stem that would need
/// percent-encoding under this set is rejected.
const FILE_STEM: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Normalize a user-supplied file stem: trim, drop a trailing `.csv`, and reject
/// anything outside `[A-Za-z0-9_.-]` or starting with a dot.
///
/// Export, import and the import candidate listing all go through this, so a stem
/// that is listed can always be imported under the same name.
pub fn file_stem(stem: &str) -> Result<&str, StorageError> {
    let trimmed = stem.trim();
    let trimmed = trimmed.strip_suffix(".csv").unwrap_or(trimmed);
    let encoded = Cow::from(utf8_percent_encode(trimmed, FILE_STEM));
    if trimmed.is_empty() || trimmed.starts_with('.') || matches!(encoded, Cow::Owned(_)) {
        return Err(StorageError::InvalidFileName(stem.to_string()));
    }
    Ok(trimmed)
}

/// Persistence contract consumed by the command handlers.
pub trait PlayerStore {
    /// Load the record for `id`; `Ok(None)` when the player never joined.
    fn load(&self, id: &PlayerId) -> Result<Option<PlayerRecord>, StorageError>;
    /// Durably write `record`. Returns only after the write is flushed.
    fn save(&mut self, record: &PlayerRecord) -> Result<(), StorageError>;
    /// Export every record to `<stem>.csv`, returning the written path.
    fn export(&self, stem: &str) -> Result<PathBuf, StorageError>;
    /// Upsert every row of `<stem>.csv`, returning the number of rows applied.
    /// A malformed file or a failed write leaves every stored record unchanged.
    fn import(&mut self, stem: &str) -> Result<usize, StorageError>;
    /// Stems of CSV files available for import, sorted.
    fn import_candidates(&self) -> Vec<String>;
}

/// Sled-backed persistence for player records.
pub struct SledPlayerStore {
    _db: sled::Db,
    players: sled::Tree,
    names: sled::Tree,
    bridge: sled::Tree,
    data_dir: PathBuf,
}

impl SledPlayerStore {
    /// Open (or create) the store rooted at `data_dir`.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StorageError> {
        let data_dir = data_dir.as_ref().to_path_buf();
        fs::create_dir_all(&data_dir)?;
        let db = sled::open(data_dir.join("players"))?;
        let players = db.open_tree(TREE_PLAYERS)?;
        let names = db.open_tree(TREE_NAMES)?;
        let bridge = db.open_tree(TREE_BRIDGE)?;
        Ok(Self {
            _db: db,
            players,
            names,
            bridge,
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn name_key(name: &str) -> Vec<u8> {
        name.trim().to_ascii_lowercase().into_bytes()
    }

    fn id_from_bytes(bytes: &IVec) -> Option<PlayerId> {
        uuid::Uuid::from_slice(bytes).ok().map(PlayerId)
    }

    fn deserialize(bytes: IVec) -> Result<PlayerRecord, StorageError> {
        let record: PlayerRecord = bincode::deserialize(&bytes)?;
        if record.schema_version != PLAYER_SCHEMA_VERSION {
            return Err(StorageError::SchemaMismatch {
                entity: "player",
                expected: PLAYER_SCHEMA_VERSION,
                found: record.schema_version,
            });
        }
        Ok(record)
    }

    /// Look up a stored identity by player name (case-insensitive).
    pub fn find_id_by_name(&self, name: &str) -> Result<Option<PlayerId>, StorageError> {
        Ok(self
            .names
            .get(Self::name_key(name))?
            .as_ref()
            .and_then(Self::id_from_bytes))
    }

    /// All stored records, ordered by identity.
    pub fn list_players(&self) -> Result<Vec<PlayerRecord>, StorageError> {
        let mut out = Vec::new();
        for entry in self.players.iter() {
            let (_, bytes) = entry?;
            out.push(Self::deserialize(bytes)?);
        }
        Ok(out)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Remember a non-native (bridged) player so the identity bridge can resolve it offline.
    pub fn register_bridge_player(&self, name: &str, id: PlayerId) -> Result<(), StorageError> {
        self.bridge.insert(Self::name_key(name), id.as_bytes().to_vec())?;
        self.bridge.flush()?;
        Ok(())
    }

    /// Every remembered bridged player as `(lowercase name, id)`.
    pub fn bridge_players(&self) -> Result<HashMap<String, PlayerId>, StorageError> {
        let mut out = HashMap::new();
        for entry in self.bridge.iter() {
            let (key, value) = entry?;
            if let Some(id) = Self::id_from_bytes(&value) {
                out.insert(String::from_utf8_lossy(&key).into_owned(), id);
            }
        }
        Ok(out)
    }

    /// Name index changes for a write of `records`. Each name points at its player;
    /// a previous name still owned by the same player is dropped unless another record
    /// in the same write claims it.
    fn name_index_batch(&self, records: &[PlayerRecord]) -> Result<Batch, StorageError> {
        let claimed: HashSet<Vec<u8>> = records
            .iter()
            .map(|r| Self::name_key(&r.name))
            .filter(|k| !k.is_empty())
            .collect();
        let mut batch = Batch::default();
        for record in records {
            let id = record.uuid.as_bytes().to_vec();
            // An unreadable old record has no name worth cleaning up.
            if let Some(old) = self.load(&record.uuid).ok().flatten() {
                let old_key = Self::name_key(&old.name);
                if !old_key.is_empty()
                    && !claimed.contains(&old_key)
                    && self.names.get(&old_key)?.as_deref() == Some(id.as_slice())
                {
                    batch.remove(old_key);
                }
            }
            let key = Self::name_key(&record.name);
            if !key.is_empty() {
                batch.insert(key, id);
            }
        }
        Ok(batch)
    }

    fn csv_path(&self, stem: &str) -> Result<PathBuf, StorageError> {
        Ok(self.data_dir.join(format!("{}.csv", file_stem(stem)?)))
    }

    /// Write content to a file with exclusive locking and an atomic rename.
    fn write_file_locked(path: &Path, content: &str) -> Result<(), StorageError> {
        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)?;
        lock_file.lock_exclusive()?;

        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let base = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("export.csv");
        let mut counter = 0u32;
        let tmp_path = loop {
            let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
            match OpenOptions::new().write(true).create_new(true).open(&candidate) {
                Ok(mut tmp) => {
                    tmp.write_all(content.as_bytes())?;
                    tmp.flush()?;
                    let _ = tmp.sync_all();
                    break candidate;
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    counter = counter.saturating_add(1);
                }
                Err(e) => return Err(StorageError::Io(e)),
            }
        };

        fs::rename(&tmp_path, path)?;
        if let Ok(dir_file) = File::open(dir) {
            let _ = dir_file.sync_all();
        }
        drop(lock_file);
        Ok(())
    }
}

impl PlayerStore for SledPlayerStore {
    fn load(&self, id: &PlayerId) -> Result<Option<PlayerRecord>, StorageError> {
        match self.players.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(Self::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, record: &PlayerRecord) -> Result<(), StorageError> {
        let mut record = record.clone();
        record.schema_version = PLAYER_SCHEMA_VERSION;
        let bytes = bincode::serialize(&record)?;
        let names = self.name_index_batch(std::slice::from_ref(&record))?;
        self.players.insert(record.uuid.as_bytes(), bytes)?;
        self.names.apply_batch(names)?;
        self.players.flush()?;
        self.names.flush()?;
        debug!(
            "saved player {} ({}) max_health={}",
            escape_log(&record.name),
            record.uuid,
            record.max_health
        );
        Ok(())
    }

    fn export(&self, stem: &str) -> Result<PathBuf, StorageError> {
        let path = self.csv_path(stem)?;
        let records = self.list_players()?;
        let content = csv::encode_records(&records);
        Self::write_file_locked(&path, &content)?;
        Ok(path)
    }

    fn import(&mut self, stem: &str) -> Result<usize, StorageError> {
        let path = self.csv_path(stem)?;
        if !path.exists() {
            return Err(StorageError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(&path)?;
        let mut records = csv::decode_records(&content)?;

        // Every row lands in one atomic batch, or none do.
        let mut players = Batch::default();
        for record in &mut records {
            record.schema_version = PLAYER_SCHEMA_VERSION;
            players.insert(record.uuid.as_bytes().to_vec(), bincode::serialize(record)?);
        }
        let names = self.name_index_batch(&records)?;
        self.players.apply_batch(players)?;
        self.names.apply_batch(names)?;
        self.players.flush()?;
        self.names.flush()?;
        debug!(
            "imported {} player records from {}",
            records.len(),
            path.display()
        );
        Ok(records.len())
    }

    fn import_candidates(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("cannot list {}: {}", self.data_dir.display(), e);
                return Vec::new();
            }
        };
        let mut stems: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| {
                let name = entry.file_name().into_string().ok()?;
                let stem = name.strip_suffix(".csv")?;
                // Only names an import could find again.
                file_stem(stem).ok().map(str::to_string)
            })
            .collect();
        stems.sort();
        stems
    }
}
