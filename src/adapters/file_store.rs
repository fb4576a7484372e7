use crate::domain::ports::{document_id, touch, Collection, Document, FieldUpdate, RecordStore};
use crate::utils::error::{BoardError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

/// Stores one pretty-printed JSON file per record: `<base>/<collection>/<id>.json`.
///
/// Writes within one process are serialized and land through a temp file plus
/// rename, which makes each single-document update atomic. Several processes
/// sharing a directory get no such guarantee.
#[derive(Debug)]
pub struct FileStore {
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub async fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        for collection in Collection::all() {
            fs::create_dir_all(base_path.join(collection.name())).await?;
        }
        tracing::debug!("Opened file store at {}", base_path.display());
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the record's file, or `None` when `id` cannot be a file name.
    /// Such an id was never inserted, so lookups treat it as absent.
    fn document_path(&self, collection: Collection, id: &str) -> Option<PathBuf> {
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        safe.then(|| {
            self.base_path
                .join(collection.name())
                .join(format!("{}.json", id))
        })
    }

    async fn read_document(path: &Path) -> Result<Option<Document>> {
        match fs::read(path).await {
            Ok(bytes) => {
                let document: Document = serde_json::from_slice(&bytes)?;
                Ok(Some(document))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_document(path: &Path, document: &Document) -> Result<()> {
        let data = serde_json::to_vec_pretty(document)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, data).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

fn created_at(document: &Document) -> Option<DateTime<Utc>> {
    document
        .get("createdAt")
        .and_then(Value::as_str)
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|at| at.with_timezone(&Utc))
}

#[async_trait]
impl RecordStore for FileStore {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>> {
        let Some(path) = self.document_path(collection, id) else {
            return Ok(None);
        };
        Self::read_document(&path).await
    }

    async fn insert(&self, collection: Collection, document: Document) -> Result<()> {
        let id = document_id(&document)?;
        let path = self.document_path(collection, id).ok_or_else(|| {
            BoardError::store(format!("id '{}' cannot be used as a file name", id))
        })?;
        let _guard = self.write_lock.lock().await;
        if fs::try_exists(&path).await? {
            return Err(BoardError::store(format!(
                "duplicate id in {}: {}",
                collection,
                path.display()
            )));
        }
        Self::write_document(&path, &document).await?;
        tracing::debug!("Inserted {}", path.display());
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<bool> {
        let Some(path) = self.document_path(collection, id) else {
            return Ok(false);
        };
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!("Deleted {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn update(
        &self,
        collection: Collection,
        id: &str,
        update: FieldUpdate,
    ) -> Result<bool> {
        let Some(path) = self.document_path(collection, id) else {
            return Ok(false);
        };
        let _guard = self.write_lock.lock().await;
        let Some(mut document) = Self::read_document(&path).await? else {
            return Ok(false);
        };
        update.apply(&mut document)?;
        touch(&mut document)?;
        Self::write_document(&path, &document).await?;
        tracing::debug!("Updated {}.{} on {}", collection, update.field(), id);
        Ok(true)
    }

    async fn find_by(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
    ) -> Result<Vec<Document>> {
        let dir = self.base_path.join(collection.name());
        let mut entries = fs::read_dir(&dir).await?;
        let mut matches = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            // 讀取途中被刪除的檔案直接略過
            let Some(document) = Self::read_document(&path).await? else {
                continue;
            };
            if document.get(field).and_then(Value::as_str) == Some(value) {
                matches.push(document);
            }
        }

        matches.sort_by(|a, b| {
            let id_a = a.get("id").and_then(Value::as_str);
            let id_b = b.get("id").and_then(Value::as_str);
            created_at(a).cmp(&created_at(b)).then_with(|| id_a.cmp(&id_b))
        });
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).await.unwrap();

        store
            .insert(
                Collection::Boards,
                doc(json!({"id": "b1", "title": "Plan", "listOrder": []})),
            )
            .await
            .unwrap();
        assert!(temp_dir.path().join("boards").join("b1.json").exists());

        store
            .update(
                Collection::Boards,
                "b1",
                FieldUpdate::Push {
                    field: "listOrder",
                    value: json!("l1"),
                },
            )
            .await
            .unwrap();

        // 重新開啟確認資料已落地
        let reopened = FileStore::open(temp_dir.path()).await.unwrap();
        let board = reopened.get(Collection::Boards, "b1").await.unwrap().unwrap();
        assert_eq!(board["listOrder"], json!(["l1"]));

        assert!(reopened.delete(Collection::Boards, "b1").await.unwrap());
        assert!(reopened.get(Collection::Boards, "b1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_orders_by_creation_time() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).await.unwrap();

        let rows = [
            ("c2", "2024-01-01T00:00:02Z"),
            ("c1", "2024-01-01T00:00:01Z"),
            ("c3", "2024-01-01T00:00:03.5Z"),
        ];
        for (id, at) in rows {
            store
                .insert(
                    Collection::Cards,
                    doc(json!({"id": id, "listId": "l1", "createdAt": at})),
                )
                .await
                .unwrap();
        }

        let found = store.find_by(Collection::Cards, "listId", "l1").await.unwrap();
        let ids: Vec<&str> = found.iter().map(|d| d["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
    }

    #[tokio::test]
    async fn test_path_like_ids_are_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::open(temp_dir.path()).await.unwrap();

        assert!(store.get(Collection::Boards, "../escape").await.unwrap().is_none());
        assert!(!store.delete(Collection::Lists, "a b").await.unwrap());
        let updated = store
            .update(
                Collection::Cards,
                "no.such",
                FieldUpdate::Set {
                    field: "content",
                    value: json!("x"),
                },
            )
            .await
            .unwrap();
        assert!(!updated);

        // 寫入仍拒絕無法當檔名的 id
        let err = store
            .insert(Collection::Boards, doc(json!({"id": "../escape"})))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::utils::error::ErrorKind::StoreFailure);
        assert!(!temp_dir.path().join("escape.json").exists());
    }
}
