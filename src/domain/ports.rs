use crate::utils::error::{BoardError, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::fmt;

/// A stored record: a JSON object carrying at least a string `id` field.
pub type Document = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Boards,
    Lists,
    Cards,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Boards => "boards",
            Collection::Lists => "lists",
            Collection::Cards => "cards",
        }
    }

    pub fn all() -> [Collection; 3] {
        [Collection::Boards, Collection::Lists, Collection::Cards]
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single-field mutation the store applies atomically to one document.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Replace the field's value.
    Set { field: &'static str, value: Value },
    /// Append to an array field, creating it when missing.
    Push { field: &'static str, value: Value },
    /// Remove every array element equal to `value`.
    Pull { field: &'static str, value: Value },
}

impl FieldUpdate {
    pub fn field(&self) -> &'static str {
        match self {
            FieldUpdate::Set { field, .. }
            | FieldUpdate::Push { field, .. }
            | FieldUpdate::Pull { field, .. } => *field,
        }
    }

    /// Applies the update to an in-memory document. Shared by every adapter so the
    /// semantics cannot diverge between backends.
    pub fn apply(&self, document: &mut Document) -> Result<()> {
        match self {
            FieldUpdate::Set { field, value } => {
                document.insert((*field).to_string(), value.clone());
            }
            FieldUpdate::Push { field, value } => {
                let slot = document
                    .entry((*field).to_string())
                    .or_insert_with(|| Value::Array(Vec::new()));
                match slot {
                    Value::Array(items) => items.push(value.clone()),
                    _ => {
                        return Err(BoardError::store(format!(
                            "cannot push onto non-array field '{}'",
                            field
                        )))
                    }
                }
            }
            FieldUpdate::Pull { field, value } => match document.get_mut(*field) {
                Some(Value::Array(items)) => items.retain(|item| item != value),
                Some(_) => {
                    return Err(BoardError::store(format!(
                        "cannot pull from non-array field '{}'",
                        field
                    )))
                }
                None => {}
            },
        }
        Ok(())
    }
}

/// Reads the string `id` every stored document carries.
pub fn document_id(document: &Document) -> Result<&str> {
    document
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| BoardError::store("document has no string 'id' field"))
}

/// Stamps `updatedAt` with the current time in the same format the models serialize.
pub fn touch(document: &mut Document) -> Result<()> {
    let now = serde_json::to_value(chrono::Utc::now())?;
    document.insert("updatedAt".to_string(), now);
    Ok(())
}

/// Persistence collaborator: a document store addressed by collection and id.
///
/// There is no compare-and-set primitive. Each `update` must be atomic for the
/// document it touches and must refresh the document's `updatedAt` field.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, collection: Collection, id: &str) -> Result<Option<Document>>;

    /// Fails when a document with the same id already exists.
    async fn insert(&self, collection: Collection, document: Document) -> Result<()>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, collection: Collection, id: &str) -> Result<bool>;

    /// Returns `false` when the document does not exist.
    async fn update(&self, collection: Collection, id: &str, update: FieldUpdate) -> Result<bool>;

    /// All documents whose string `field` equals `value`, in insertion order.
    async fn find_by(&self, collection: Collection, field: &str, value: &str)
        -> Result<Vec<Document>>;
}
