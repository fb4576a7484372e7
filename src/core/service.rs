use crate::core::records::Records;
use crate::domain::ports::RecordStore;

/// Text length limits, counted in characters after trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub title_max_chars: usize,
    pub content_max_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            title_max_chars: 100,
            content_max_chars: 1000,
        }
    }
}

/// Entry point for every board, list and card operation.
///
/// Holds no locks of its own. Operations may run concurrently from any number of
/// tasks; single-element appends and removals rely on the store's atomic field
/// updates, while reorders rewrite whole order arrays and race last-writer-wins.
pub struct BoardService<S: RecordStore> {
    pub(crate) records: Records<S>,
    pub(crate) limits: Limits,
}

impl<S: RecordStore> BoardService<S> {
    pub fn new(store: S) -> Self {
        Self::with_limits(store, Limits::default())
    }

    pub fn with_limits(store: S, limits: Limits) -> Self {
        Self {
            records: Records::new(store),
            limits,
        }
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    pub fn store(&self) -> &S {
        self.records.store()
    }
}
