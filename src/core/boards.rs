use crate::core::service::BoardService;
use crate::domain::model::{Board, BoardId, UserId};
use crate::domain::ordering::{reconcile, OrderField};
use crate::domain::ports::{Collection, RecordStore};
use crate::utils::error::Result;
use crate::utils::validation::validate_text;

impl<S: RecordStore> BoardService<S> {
    /// The requester becomes the owner.
    #[tracing::instrument(skip(self, title))]
    pub async fn create_board(&self, title: &str, user_id: &UserId) -> Result<Board> {
        let title = validate_text("title", title, self.limits.title_max_chars)?;
        let board = Board::new(title, user_id.clone());
        self.records.insert_board(&board).await?;
        tracing::info!(board = %board.id, "Created board");
        Ok(board)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_board(&self, board_id: &BoardId, user_id: &UserId) -> Result<Board> {
        self.records.require_owned_board(board_id, user_id).await
    }

    #[tracing::instrument(skip(self, title))]
    pub async fn update_board(
        &self,
        board_id: &BoardId,
        title: Option<&str>,
        user_id: &UserId,
    ) -> Result<Board> {
        let board = self.records.require_owned_board(board_id, user_id).await?;
        let Some(title) = title else {
            return Ok(board);
        };
        let title = validate_text("title", title, self.limits.title_max_chars)?;
        self.records
            .set_field(Collection::Boards, board_id.as_str(), "title", &title)
            .await?;
        self.records.board(board_id).await
    }

    /// Deletes the board together with its lists and their cards.
    ///
    /// Children go first so a failure part way leaves the board reachable for a retry.
    #[tracing::instrument(skip(self))]
    pub async fn delete_board(&self, board_id: &BoardId, user_id: &UserId) -> Result<bool> {
        self.records.require_owned_board(board_id, user_id).await?;

        let lists = self.records.lists_of_board(board_id).await?;
        for list in &lists {
            for card in self.records.cards_of_list(&list.id).await? {
                self.records.delete_card(&card.id).await?;
            }
            self.records.delete_list(&list.id).await?;
        }

        let deleted = self.records.delete_board(board_id).await?;
        tracing::info!(board = %board_id, lists = lists.len(), "Deleted board");
        Ok(deleted)
    }

    /// Explicitly rewrites `listOrder` to match the board's live lists: stale ids
    /// are dropped and unlisted lists are appended in creation order.
    #[tracing::instrument(skip(self))]
    pub async fn repair_board_order(&self, board_id: &BoardId, user_id: &UserId) -> Result<Board> {
        let mut board = self.records.require_owned_board(board_id, user_id).await?;
        let live: Vec<_> = self
            .records
            .lists_of_board(board_id)
            .await?
            .into_iter()
            .map(|list| list.id)
            .collect();

        let repaired = reconcile(&board.list_order, &live);
        if repaired != board.list_order {
            tracing::info!(
                board = %board_id,
                before = board.list_order.len(),
                after = repaired.len(),
                "Repaired list order"
            );
            self.records
                .set_order(OrderField::BoardLists, board_id.as_str(), &repaired)
                .await?;
            board.list_order = repaired;
        }
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use crate::adapters::InMemoryStore;
    use crate::core::service::BoardService;
    use crate::domain::model::UserId;
    use crate::domain::ports::Collection;
    use crate::utils::error::ErrorKind;

    #[tokio::test]
    async fn test_create_board_trims_and_owns() {
        let service = BoardService::new(InMemoryStore::new());
        let owner = UserId::from("u1");
        let board = service.create_board("  Q3 plan ", &owner).await.unwrap();

        assert_eq!(board.title, "Q3 plan");
        assert_eq!(board.owner_id, owner);
        assert!(board.list_order.is_empty());
        assert_eq!(service.get_board(&board.id, &owner).await.unwrap(), board);
    }

    #[tokio::test]
    async fn test_create_board_rejects_blank_title() {
        let service = BoardService::new(InMemoryStore::new());
        let err = service.create_board(" ", &UserId::from("u1")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(service.store().writes(), 0);
    }

    #[tokio::test]
    async fn test_update_board_title() {
        let service = BoardService::new(InMemoryStore::new());
        let owner = UserId::from("u1");
        let board = service.create_board("Old", &owner).await.unwrap();

        let updated = service.update_board(&board.id, Some("New"), &owner).await.unwrap();
        assert_eq!(updated.title, "New");

        let unchanged = service.update_board(&board.id, None, &owner).await.unwrap();
        assert_eq!(unchanged.title, "New");

        let err = service
            .update_board(&board.id, Some("Hijacked"), &UserId::from("u2"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[tokio::test]
    async fn test_delete_board_cascades() {
        let store = InMemoryStore::new();
        let service = BoardService::new(store.clone());
        let owner = UserId::from("u1");
        let board = service.create_board("Trip", &owner).await.unwrap();
        let list = service.create_list(&board.id, "Pack", &owner).await.unwrap();
        service.create_card(&list.id, "Socks", &owner).await.unwrap();

        assert!(service.delete_board(&board.id, &owner).await.unwrap());
        assert_eq!(store.len(Collection::Boards).await, 0);
        assert_eq!(store.len(Collection::Lists).await, 0);
        assert_eq!(store.len(Collection::Cards).await, 0);
    }
}
