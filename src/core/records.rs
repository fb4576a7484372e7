//! Typed access to boards, lists and cards on top of a [`RecordStore`].

use crate::domain::model::{Board, BoardId, Card, CardId, List, ListId};
use crate::domain::ordering::OrderField;
use crate::domain::ports::{Collection, Document, FieldUpdate, RecordStore};
use crate::utils::error::{BoardError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;

pub struct Records<S: RecordStore> {
    store: S,
}

fn to_document<T: Serialize>(record: &T) -> Result<Document> {
    match serde_json::to_value(record)? {
        Value::Object(document) => Ok(document),
        other => Err(BoardError::store(format!(
            "record serialized to a non-object value: {}",
            other
        ))),
    }
}

fn from_document<T: DeserializeOwned>(document: Document) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(document))?)
}

fn kind_of(collection: Collection) -> &'static str {
    match collection {
        Collection::Boards => "board",
        Collection::Lists => "list",
        Collection::Cards => "card",
    }
}

impl<S: RecordStore> Records<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn fetch<T: DeserializeOwned>(&self, collection: Collection, id: &str) -> Result<T> {
        match self.store.get(collection, id).await? {
            Some(document) => from_document(document),
            None => Err(BoardError::not_found(kind_of(collection), id)),
        }
    }

    pub async fn board(&self, id: &BoardId) -> Result<Board> {
        self.fetch(Collection::Boards, id.as_str()).await
    }

    pub async fn list(&self, id: &ListId) -> Result<List> {
        self.fetch(Collection::Lists, id.as_str()).await
    }

    pub async fn card(&self, id: &CardId) -> Result<Card> {
        self.fetch(Collection::Cards, id.as_str()).await
    }

    pub async fn insert_board(&self, board: &Board) -> Result<()> {
        self.store
            .insert(Collection::Boards, to_document(board)?)
            .await
    }

    pub async fn insert_list(&self, list: &List) -> Result<()> {
        self.store.insert(Collection::Lists, to_document(list)?).await
    }

    pub async fn insert_card(&self, card: &Card) -> Result<()> {
        self.store.insert(Collection::Cards, to_document(card)?).await
    }

    pub async fn delete_board(&self, id: &BoardId) -> Result<bool> {
        self.store.delete(Collection::Boards, id.as_str()).await
    }

    pub async fn delete_list(&self, id: &ListId) -> Result<bool> {
        self.store.delete(Collection::Lists, id.as_str()).await
    }

    pub async fn delete_card(&self, id: &CardId) -> Result<bool> {
        self.store.delete(Collection::Cards, id.as_str()).await
    }

    /// A `false` from the store means the record vanished between read and write.
    async fn apply(&self, collection: Collection, id: &str, update: FieldUpdate) -> Result<()> {
        if self.store.update(collection, id, update).await? {
            Ok(())
        } else {
            Err(BoardError::not_found(kind_of(collection), id))
        }
    }

    pub async fn set_field<V: Serialize>(
        &self,
        collection: Collection,
        id: &str,
        field: &'static str,
        value: V,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.apply(collection, id, FieldUpdate::Set { field, value })
            .await
    }

    /// Atomic append of one child id to the parent's order array.
    pub async fn push_member(
        &self,
        order: OrderField,
        parent_id: &str,
        child_id: &impl Display,
    ) -> Result<()> {
        let update = FieldUpdate::Push {
            field: order.field(),
            value: Value::String(child_id.to_string()),
        };
        self.apply(order.parent_collection(), parent_id, update)
            .await
    }

    /// Atomic removal of every occurrence of a child id from the parent's order array.
    pub async fn pull_member(
        &self,
        order: OrderField,
        parent_id: &str,
        child_id: &impl Display,
    ) -> Result<()> {
        let update = FieldUpdate::Pull {
            field: order.field(),
            value: Value::String(child_id.to_string()),
        };
        self.apply(order.parent_collection(), parent_id, update)
            .await
    }

    /// Full-array rewrite. Last writer wins against a concurrent rewrite.
    pub async fn set_order<T: Serialize>(
        &self,
        order: OrderField,
        parent_id: &str,
        members: &[T],
    ) -> Result<()> {
        self.set_field(order.parent_collection(), parent_id, order.field(), members)
            .await
    }

    pub async fn lists_of_board(&self, board_id: &BoardId) -> Result<Vec<List>> {
        self.store
            .find_by(Collection::Lists, "boardId", board_id.as_str())
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }

    pub async fn cards_of_list(&self, list_id: &ListId) -> Result<Vec<Card>> {
        self.store
            .find_by(Collection::Cards, "listId", list_id.as_str())
            .await?
            .into_iter()
            .map(from_document)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;
    use crate::domain::model::UserId;
    use crate::utils::error::ErrorKind;

    #[tokio::test]
    async fn test_typed_round_trip_and_order_updates() {
        let records = Records::new(InMemoryStore::new());
        let board = Board::new("Sprint".to_string(), UserId::from("u1"));
        records.insert_board(&board).await.unwrap();

        let list = List::new("Todo".to_string(), board.id.clone());
        records.insert_list(&list).await.unwrap();
        records
            .push_member(OrderField::BoardLists, board.id.as_str(), &list.id)
            .await
            .unwrap();

        let stored = records.board(&board.id).await.unwrap();
        assert_eq!(stored.list_order, vec![list.id.clone()]);
        assert!(stored.updated_at >= board.updated_at);

        records
            .pull_member(OrderField::BoardLists, board.id.as_str(), &list.id)
            .await
            .unwrap();
        assert!(records.board(&board.id).await.unwrap().list_order.is_empty());

        assert_eq!(records.lists_of_board(&board.id).await.unwrap(), vec![list]);
    }

    #[tokio::test]
    async fn test_missing_records_are_not_found() {
        let records = Records::new(InMemoryStore::new());
        let err = records.card(&CardId::from("c404")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "card not found: c404");

        let err = records
            .push_member(OrderField::ListCards, "l404", &CardId::from("c1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
