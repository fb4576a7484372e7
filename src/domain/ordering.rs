//! Ordered membership over a parent's order array.
//!
//! `Board.listOrder` and `List.cardOrder` share every rule here; callers pick the
//! array with [`OrderField`] and operate on plain id sequences.

use crate::domain::ports::Collection;
use crate::utils::error::{BoardError, Result};
use crate::utils::validation::validate_index;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::hash::Hash;

/// Which parent order array an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    BoardLists,
    ListCards,
}

impl OrderField {
    pub fn parent_collection(&self) -> Collection {
        match self {
            OrderField::BoardLists => Collection::Boards,
            OrderField::ListCards => Collection::Lists,
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            OrderField::BoardLists => "listOrder",
            OrderField::ListCards => "cardOrder",
        }
    }

    pub fn child_kind(&self) -> &'static str {
        match self {
            OrderField::BoardLists => "list",
            OrderField::ListCards => "card",
        }
    }
}

pub fn position_of<T: PartialEq>(order: &[T], id: &T) -> Option<usize> {
    order.iter().position(|member| member == id)
}

/// Removes `id` and returns the index it occupied. Absence means the caller acted
/// on stale state.
pub fn remove_member<T: PartialEq + Display>(order: &mut Vec<T>, id: &T) -> Result<usize> {
    let index = position_of(order, id)
        .ok_or_else(|| BoardError::invalid(format!("{} is not a member of the order", id)))?;
    order.remove(index);
    Ok(index)
}

/// Inserts at `index`, which may equal `order.len()` (append).
pub fn insert_member<T>(order: &mut Vec<T>, id: T, index: usize) -> Result<()> {
    validate_index("newIndex", index, Some(order.len()))?;
    order.insert(index, id);
    Ok(())
}

/// Moves an existing member to `new_index` in `[0, len - 1]`, preserving the
/// relative order of every other member.
pub fn move_member<T: PartialEq + Display>(
    order: &mut Vec<T>,
    id: &T,
    new_index: usize,
) -> Result<()> {
    let current = position_of(order, id)
        .ok_or_else(|| BoardError::invalid(format!("{} is not a member of the order", id)))?;
    validate_index("newIndex", new_index, order.len().checked_sub(1))?;

    let member = order.remove(current);
    order.insert(new_index, member);
    Ok(())
}

/// Children arranged by their parent's order array.
#[derive(Debug)]
pub struct Projection<R, K> {
    pub records: Vec<R>,
    /// Live children the order array does not mention; appended after the ordered ones.
    pub unlisted: usize,
    /// Ids in the order array with no live child behind them.
    pub stale: Vec<K>,
}

impl<R, K> Projection<R, K> {
    pub fn has_drift(&self) -> bool {
        self.unlisted > 0 || !self.stale.is_empty()
    }
}

/// Sorts `records` by `order`. Records missing from `order` keep their incoming
/// relative order and follow the ordered ones; nothing is ever dropped. Duplicate
/// ids in `order` place the record at its first occurrence.
pub fn project<R, K, F>(order: &[K], records: Vec<R>, key: F) -> Projection<R, K>
where
    K: Eq + Hash + Clone,
    F: Fn(&R) -> &K,
{
    let mut rank: HashMap<&K, usize> = HashMap::with_capacity(order.len());
    for (index, id) in order.iter().enumerate() {
        rank.entry(id).or_insert(index);
    }

    let live: HashSet<&K> = records.iter().map(|record| key(record)).collect();
    let stale: Vec<K> = order
        .iter()
        .filter(|id| !live.contains(id))
        .cloned()
        .collect();

    let mut ordered: Vec<(usize, R)> = Vec::with_capacity(records.len());
    let mut unlisted: Vec<R> = Vec::new();
    for record in records {
        match rank.get(key(&record)) {
            Some(&index) => ordered.push((index, record)),
            None => unlisted.push(record),
        }
    }
    ordered.sort_by_key(|(index, _)| *index);

    let unlisted_count = unlisted.len();
    let mut records: Vec<R> = ordered.into_iter().map(|(_, record)| record).collect();
    records.extend(unlisted);

    Projection {
        records,
        unlisted: unlisted_count,
        stale,
    }
}

/// Rebuilds an order array against the live children: stale and duplicate ids
/// are dropped, unlisted children are appended in the order given.
pub fn reconcile<K: Eq + Hash + Clone>(order: &[K], live: &[K]) -> Vec<K> {
    let live_set: HashSet<&K> = live.iter().collect();
    let mut seen: HashSet<&K> = HashSet::with_capacity(live.len());
    let mut repaired: Vec<K> = Vec::with_capacity(live.len());

    for id in order {
        if live_set.contains(id) && seen.insert(id) {
            repaired.push(id.clone());
        }
    }
    for id in live {
        if seen.insert(id) {
            repaired.push(id.clone());
        }
    }
    repaired
}
