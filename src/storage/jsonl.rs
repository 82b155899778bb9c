//! JSONL (JSON Lines) storage.
//!
//! Each line is a valid JSON object representing one record. The tournament
//! lives in three files under `<data_dir>/tournament/`.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{next_player_id, StorageConfig, StorageError, TournamentStore};
use crate::models::{ByeRecord, MatchResult, Player, PlayerId};

/// Record types stored as JSONL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Player,
    Match,
    Bye,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Player => "players.jsonl",
            EntityType::Match => "matches.jsonl",
            EntityType::Bye => "byes.jsonl",
        }
    }
}

/// Get the path for an entity file.
pub fn entity_path(config: &StorageConfig, entity: EntityType) -> PathBuf {
    config.tournament_dir().join(entity.filename())
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single record to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended record to {:?}", self.path);
        Ok(())
    }

    /// Write records, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} records to {:?}", count, self.path);

        Ok(count)
    }

    /// Truncate the file, leaving it empty.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.write_all(&[]).map(|_| ())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    pub fn for_entity(config: &StorageConfig, entity: EntityType) -> Self {
        Self::new(entity_path(config, entity))
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all records. A missing file reads as empty; unparseable lines
    /// are skipped with a warning.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} records from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Tournament store backed by JSONL files.
///
/// Single-process only: no file locking is done.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    config: StorageConfig,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn reader<T: DeserializeOwned>(&self, entity: EntityType) -> JsonlReader<T> {
        JsonlReader::for_entity(&self.config, entity)
    }

    fn writer<T: Serialize>(&self, entity: EntityType) -> JsonlWriter<T> {
        JsonlWriter::for_entity(&self.config, entity)
    }
}

impl TournamentStore for JsonlStore {
    fn players(&self) -> Result<Vec<Player>, StorageError> {
        self.reader(EntityType::Player).read_all()
    }

    fn matches(&self) -> Result<Vec<MatchResult>, StorageError> {
        self.reader(EntityType::Match).read_all()
    }

    fn byes(&self) -> Result<Vec<ByeRecord>, StorageError> {
        self.reader(EntityType::Bye).read_all()
    }

    fn register_player(&mut self, name: String) -> Result<Player, StorageError> {
        let id = next_player_id(&self.players()?)?;
        let player = Player::new(id, name);
        self.writer(EntityType::Player).append(&player)?;
        Ok(player)
    }

    fn report_match(
        &mut self,
        winner: PlayerId,
        loser: PlayerId,
    ) -> Result<MatchResult, StorageError> {
        let sequence = self.matches()?.len();
        let result = MatchResult::new(winner, loser, sequence);
        self.writer(EntityType::Match).append(&result)?;
        Ok(result)
    }

    fn record_bye(&mut self, player: PlayerId, round: u32) -> Result<ByeRecord, StorageError> {
        let bye = ByeRecord::new(player, round);
        self.writer(EntityType::Bye).append(&bye)?;
        Ok(bye)
    }

    fn delete_matches(&mut self) -> Result<(), StorageError> {
        self.writer::<MatchResult>(EntityType::Match).clear()?;
        self.writer::<ByeRecord>(EntityType::Bye).clear()?;
        Ok(())
    }

    fn delete_players(&mut self) -> Result<(), StorageError> {
        self.delete_matches()?;
        self.writer::<Player>(EntityType::Player).clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestEntity {
        id: String,
        value: u32,
    }

    fn entity(id: &str, value: u32) -> TestEntity {
        TestEntity {
            id: id.to_string(),
            value,
        }
    }

    fn test_store(temp_dir: &TempDir) -> JsonlStore {
        JsonlStore::new(StorageConfig::new(temp_dir.path().to_path_buf()))
    }

    #[test]
    fn test_jsonl_write_and_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.jsonl");
        let entities = vec![entity("1", 100), entity("2", 200)];

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        assert_eq!(writer.write_all(&entities).unwrap(), 2);

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), entities);
    }

    #[test]
    fn test_jsonl_append_creates_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("append.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        writer.append(&entity("1", 1)).unwrap();
        writer.append(&entity("2", 2)).unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap().len(), 2);
    }

    #[test]
    fn test_jsonl_read_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let reader: JsonlReader<TestEntity> =
            JsonlReader::new(temp_dir.path().join("nonexistent.jsonl"));

        assert!(!reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_read_all_skips_bad_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad_lines.jsonl");

        std::fs::write(
            &path,
            r#"{"id":"1","value":1}
not-valid-json

{"id":"2","value":2}
"#,
        )
        .unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert_eq!(reader.read_all().unwrap(), vec![entity("1", 1), entity("2", 2)]);
    }

    #[test]
    fn test_clear_truncates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("clear.jsonl");

        let writer: JsonlWriter<TestEntity> = JsonlWriter::new(path.clone());
        writer.write_all(&[entity("1", 1)]).unwrap();
        writer.clear().unwrap();

        let reader: JsonlReader<TestEntity> = JsonlReader::new(path);
        assert!(reader.exists());
        assert!(reader.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_entity_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));
        assert_eq!(
            entity_path(&config, EntityType::Player),
            PathBuf::from("/data/tournament/players.jsonl")
        );
        assert_eq!(EntityType::Match.filename(), "matches.jsonl");
        assert_eq!(EntityType::Bye.filename(), "byes.jsonl");
    }

    #[test]
    fn test_store_registers_serial_ids() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);

        let first = store.register_player("Chandra Nalaar".to_string()).unwrap();
        let second = store.register_player("Jace Beleren".to_string()).unwrap();

        assert_eq!(first.id, PlayerId::new(1));
        assert_eq!(second.id, PlayerId::new(2));
        assert_eq!(store.get_player_count().unwrap(), 2);
    }

    #[test]
    fn test_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        {
            let mut store = test_store(&temp_dir);
            let a = store.register_player("Ann".to_string()).unwrap();
            let b = store.register_player("Bob".to_string()).unwrap();
            store.report_match(a.id, b.id).unwrap();
            store.record_bye(b.id, 2).unwrap();
        }

        let store = test_store(&temp_dir);
        let standings = store.get_standings().unwrap();
        let history = store.get_match_history().unwrap();

        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].player_id, PlayerId::new(1));
        assert_eq!((standings[0].wins, standings[0].matches), (1, 1));
        assert_eq!((standings[1].wins, standings[1].matches), (1, 2));
        assert!(history.have_played(PlayerId::new(2), PlayerId::new(1)));
        assert!(history.had_bye(PlayerId::new(2)));
    }

    #[test]
    fn test_store_delete_matches_keeps_players() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        let a = store.register_player("Ann".to_string()).unwrap();
        let b = store.register_player("Bob".to_string()).unwrap();
        store.report_match(a.id, b.id).unwrap();

        store.delete_matches().unwrap();

        assert!(store.matches().unwrap().is_empty());
        assert!(store.byes().unwrap().is_empty());
        assert_eq!(store.get_player_count().unwrap(), 2);
    }

    #[test]
    fn test_store_delete_players_resets_ids() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = test_store(&temp_dir);
        store.register_player("Ann".to_string()).unwrap();
        store.register_player("Bob".to_string()).unwrap();

        store.delete_players().unwrap();
        assert_eq!(store.get_player_count().unwrap(), 0);

        let fresh = store.register_player("Cid".to_string()).unwrap();
        assert_eq!(fresh.id, PlayerId::new(1));
    }
}
