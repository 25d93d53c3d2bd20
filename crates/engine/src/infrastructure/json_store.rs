//! Character repository backed by a single JSON file.
//!
//! The file holds a JSON array of character records. Every write replaces
//! the whole file: the new contents go to a sibling temp file which is then
//! renamed over the previous one, so readers never see a half-written document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dndhelper_domain::{Character, CharacterId};
use tokio::fs;
use tokio::sync::Mutex;

use crate::infrastructure::ports::{CharacterRepo, RepoError};

pub struct JsonFileCharacterRepo {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl JsonFileCharacterRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<Character>, RepoError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RepoError::database("read", e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(dedup_by_id(serde_json::from_slice(&bytes)?))
    }

    async fn write_all(&self, characters: &[Character]) -> Result<(), RepoError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| RepoError::database("create_dir", e))?;
        }

        let json = serde_json::to_vec_pretty(characters)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .map_err(|e| RepoError::database("write", e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| RepoError::database("rename", e))?;
        Ok(())
    }
}

#[async_trait]
impl CharacterRepo for JsonFileCharacterRepo {
    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        self.read_all().await
    }

    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.read_all().await?.into_iter().find(|c| c.id() == id))
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        let _guard = self.write_lock.lock().await;
        let mut characters = self.read_all().await?;
        match characters.iter_mut().find(|c| c.id() == character.id()) {
            Some(existing) => *existing = character.clone(),
            None => characters.push(character.clone()),
        }
        self.write_all(&characters).await
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let _guard = self.write_lock.lock().await;
        let characters = self.read_all().await?;
        let before = characters.len();
        let remaining: Vec<Character> = characters.into_iter().filter(|c| c.id() != id).collect();
        if remaining.len() == before {
            return Ok(());
        }
        self.write_all(&remaining).await
    }
}

/// Duplicate ids in a hand-edited file collapse to the last record.
fn dedup_by_id(characters: Vec<Character>) -> Vec<Character> {
    let mut order = Vec::new();
    let mut by_id: HashMap<CharacterId, Character> = HashMap::new();
    for character in characters {
        let id = character.id();
        if by_id.insert(id, character).is_none() {
            order.push(id);
        }
    }
    order.into_iter().filter_map(|id| by_id.remove(&id)).collect()
}
