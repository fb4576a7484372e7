pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliArgs, Command};

pub use adapters::{FileStore, InMemoryStore};
pub use config::AppConfig;
pub use crate::core::{
    Board, BoardId, BoardService, Card, CardId, Limits, List, ListId, RecordStore, UserId,
};
pub use utils::error::{BoardError, ErrorKind, Result};
