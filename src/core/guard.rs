//! Ownership guard. Authorization exists only at the board; lists and cards
//! resolve their parent chain up to it.

use crate::core::records::Records;
use crate::domain::model::{Board, BoardId, Card, CardId, List, ListId, UserId};
use crate::domain::ports::RecordStore;
use crate::utils::error::{BoardError, Result};

impl<S: RecordStore> Records<S> {
    pub async fn require_owned_board(
        &self,
        board_id: &BoardId,
        user_id: &UserId,
    ) -> Result<Board> {
        let board = self.board(board_id).await?;
        if !board.is_owned_by(user_id) {
            tracing::warn!(board = %board_id, user = %user_id, "Rejected non-owner access");
            return Err(BoardError::Forbidden {
                board_id: board_id.to_string(),
                user_id: user_id.to_string(),
            });
        }
        Ok(board)
    }

    pub async fn require_owned_list(
        &self,
        list_id: &ListId,
        user_id: &UserId,
    ) -> Result<(List, Board)> {
        let list = self.list(list_id).await?;
        let board = self.require_owned_board(&list.board_id, user_id).await?;
        Ok((list, board))
    }

    pub async fn require_owned_card(
        &self,
        card_id: &CardId,
        user_id: &UserId,
    ) -> Result<(Card, List, Board)> {
        let card = self.card(card_id).await?;
        let (list, board) = self.require_owned_list(&card.list_id, user_id).await?;
        Ok((card, list, board))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;
    use crate::utils::error::ErrorKind;

    async fn seeded() -> (Records<InMemoryStore>, Board, List, Card) {
        let records = Records::new(InMemoryStore::new());
        let board = Board::new("Home".to_string(), UserId::from("owner"));
        let list = List::new("Chores".to_string(), board.id.clone());
        let card = Card::new("Dishes".to_string(), list.id.clone());
        records.insert_board(&board).await.unwrap();
        records.insert_list(&list).await.unwrap();
        records.insert_card(&card).await.unwrap();
        (records, board, list, card)
    }

    #[tokio::test]
    async fn test_owner_passes() {
        let (records, board, _, card) = seeded().await;
        let owner = UserId::from("owner");

        assert_eq!(records.require_owned_board(&board.id, &owner).await.unwrap().id, board.id);
        let (_, _, resolved) = records.require_owned_card(&card.id, &owner).await.unwrap();
        assert_eq!(resolved.id, board.id);
    }

    #[tokio::test]
    async fn test_other_user_is_forbidden_at_every_level() {
        let (records, board, list, card) = seeded().await;
        let intruder = UserId::from("intruder");

        let err = records.require_owned_board(&board.id, &intruder).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = records.require_owned_list(&list.id, &intruder).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        let err = records.require_owned_card(&card.id, &intruder).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_unknown_board_is_not_found() {
        let (records, ..) = seeded().await;
        let err = records
            .require_owned_board(&BoardId::from("missing"), &UserId::from("owner"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_with_dangling_board_is_not_found() {
        let (records, ..) = seeded().await;
        let orphan = List::new("Orphan".to_string(), BoardId::from("gone"));
        records.insert_list(&orphan).await.unwrap();

        let err = records
            .require_owned_list(&orphan.id, &UserId::from("owner"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
