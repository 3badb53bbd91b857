//! Referenced-entity store backed by a directory of Wikibase JSON files.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use wikibase_rdf::json::entity_from_json;
use wikibase_rdf::{Entity, EntityId, EntityLoader, LoaderError};

/// Loads `{dir}/{id}.json`. A missing file means "not found".
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    dir: PathBuf,
}

impl DirectoryLoader {
    /// Creates a loader over `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory entities are read from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl EntityLoader for DirectoryLoader {
    fn load(&self, id: &EntityId) -> Result<Option<Entity>, LoaderError> {
        let path = self.dir.join(format!("{id}.json"));
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LoaderError::new(id.as_str(), format!("{}: {e}", path.display()))),
        };
        entity_from_json(&text)
            .map(Some)
            .map_err(|e| LoaderError::new(id.as_str(), format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wikibase-rdf-loader-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn loads_and_misses() {
        let dir = scratch("ok");
        fs::write(
            dir.join("Q5.json"),
            r#"{"id":"Q5","type":"item","labels":{"en":{"language":"en","value":"human"}}}"#,
        )
        .unwrap();
        let loader = DirectoryLoader::new(&dir);

        let found = loader.load(&EntityId::from("Q5")).unwrap().unwrap();
        assert_eq!(found.labels.get("en").map(String::as_str), Some("human"));
        assert!(loader.load(&EntityId::from("Q6")).unwrap().is_none());
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = scratch("bad");
        fs::write(dir.join("Q5.json"), "{ not json").unwrap();
        let err = DirectoryLoader::new(&dir).load(&EntityId::from("Q5")).unwrap_err();
        assert_eq!(err.entity, "Q5");
        fs::remove_dir_all(&dir).unwrap();
    }
}
