pub mod boards;
pub mod cards;
pub mod guard;
pub mod lists;
pub mod query;
pub mod records;
pub mod service;

pub use crate::domain::model::{Board, BoardId, Card, CardId, List, ListId, UserId};
pub use crate::domain::ports::{Collection, Document, FieldUpdate, RecordStore};
pub use crate::utils::error::Result;
pub use records::Records;
pub use service::{BoardService, Limits};
