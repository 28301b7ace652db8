//! JSON document persistence shared by the stores
//!
//! Every entity is stored as one pretty-printed JSON document. Saves rewrite
//! the whole document; there is no locking, so the last writer wins.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;

use crate::{Error, Result};

/// Whether `id` can name a document
///
/// Ids are limited to ASCII letters, digits, `-` and `_` so they always
/// resolve to a file directly inside the store directory.
pub(crate) fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Path of the JSON document for `id` inside `dir`
///
/// Returns `None` for an id that could escape `dir`.
pub(crate) fn document_path(dir: &Path, id: &str) -> Option<PathBuf> {
    is_valid_id(id).then(|| dir.join(format!("{}.json", id)))
}

/// Overwrite the document for `id` inside `dir`
pub(crate) async fn write_document<T: Serialize>(dir: &Path, id: &str, value: &T) -> Result<()> {
    let path = document_path(dir, id)
        .ok_or_else(|| Error::persistence("write", dir, format!("invalid document id '{}'", id)))?;
    write_json(&path, value).await
}

/// Serialize `value` and overwrite the document at `path`
pub(crate) async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::persistence("create directory", parent, e))?;
    }

    let contents = serde_json::to_string_pretty(value)
        .map_err(|e| Error::persistence("serialize", path, e))?;

    fs::write(path, contents)
        .await
        .map_err(|e| Error::persistence("write", path, e))
}

/// Read and parse the document at `path`
///
/// Returns `Ok(None)` if the file does not exist.
pub(crate) async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(Error::persistence("read", path, e)),
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|e| Error::persistence("parse", path, e))
}

/// Remove the document at `path`
///
/// Returns `false` if there was nothing to remove.
pub(crate) async fn remove_json(path: &Path) -> Result<bool> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::persistence("remove", path, e)),
    }
}

/// List the `.json` documents in `dir`, skipping `skip` (e.g. an index file)
pub(crate) async fn list_documents(dir: &Path, skip: Option<&str>) -> Result<Vec<PathBuf>> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(Error::persistence("list", dir, e)),
    };

    let mut paths = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| Error::persistence("list", dir, e))?
    {
        let path = entry.path();
        let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
        let skipped = skip.is_some() && path.file_name().and_then(|n| n.to_str()) == skip;
        if is_json && !skipped {
            paths.push(path);
        }
    }

    paths.sort();
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        name: String,
        count: u32,
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let path = document_path(&temp_dir.path().join("nested"), "doc-1").unwrap();

        let doc = Doc {
            name: "first".to_string(),
            count: 3,
        };
        write_json(&path, &doc).await.unwrap();

        let loaded: Option<Doc> = read_json(&path).await.unwrap();
        assert_eq!(loaded, Some(doc));
    }

    #[tokio::test]
    async fn test_read_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Option<Doc> = read_json(&temp_dir.path().join("missing.json"))
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_read_corrupt_is_persistence_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();

        let result: Result<Option<Doc>> = read_json(&path).await;
        assert!(matches!(result, Err(Error::Persistence { .. })));
    }

    #[tokio::test]
    async fn test_list_documents_skips_index() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("a.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("index.json"), "{}").unwrap();
        std::fs::write(temp_dir.path().join("notes.txt"), "").unwrap();

        let paths = list_documents(temp_dir.path(), Some("index.json"))
            .await
            .unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("a.json"));
    }

    #[test]
    fn test_ids_stay_inside_the_store() {
        let dir = Path::new("/data/checkpoints");
        assert_eq!(
            document_path(dir, "cp-20250101-ab12_cd"),
            Some(dir.join("cp-20250101-ab12_cd.json"))
        );
        for id in ["", "..", "../workflows/wf-1", "a/b", "a\\b", "wf.1", "/etc/passwd"] {
            assert!(document_path(dir, id).is_none(), "accepted {:?}", id);
        }
    }

    #[tokio::test]
    async fn test_write_document_rejects_escaping_id() {
        let temp_dir = TempDir::new().unwrap();
        let store_dir = temp_dir.path().join("checkpoints");
        let doc = Doc {
            name: "x".to_string(),
            count: 1,
        };

        let result = write_document(&store_dir, "../outside", &doc).await;
        assert!(matches!(result, Err(Error::Persistence { .. })));
        assert!(!temp_dir.path().join("outside.json").exists());

        write_document(&store_dir, "inside", &doc).await.unwrap();
        assert!(store_dir.join("inside.json").exists());
    }

    #[tokio::test]
    async fn test_remove_json() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(remove_json(&path).await.unwrap());
        assert!(!remove_json(&path).await.unwrap());
    }
}
