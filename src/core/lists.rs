use crate::core::service::BoardService;
use crate::domain::model::{Board, BoardId, List, ListId, UserId};
use crate::domain::ordering::{move_member, OrderField};
use crate::domain::ports::{Collection, RecordStore};
use crate::utils::error::Result;
use crate::utils::validation::validate_text;

impl<S: RecordStore> BoardService<S> {
    /// Inserts the list, then appends its id to the board's `listOrder`.
    ///
    /// The two writes are not transactional. If the append fails the list still
    /// exists and is returned by `lists_for_board` after the ordered ones.
    #[tracing::instrument(skip(self, title))]
    pub async fn create_list(
        &self,
        board_id: &BoardId,
        title: &str,
        user_id: &UserId,
    ) -> Result<List> {
        self.records.require_owned_board(board_id, user_id).await?;
        let title = validate_text("title", title, self.limits.title_max_chars)?;

        let list = List::new(title, board_id.clone());
        self.records.insert_list(&list).await?;
        self.records
            .push_member(OrderField::BoardLists, board_id.as_str(), &list.id)
            .await?;

        tracing::info!(board = %board_id, list = %list.id, "Created list");
        Ok(list)
    }

    /// `None` leaves the title untouched.
    #[tracing::instrument(skip(self, title))]
    pub async fn update_list(
        &self,
        list_id: &ListId,
        title: Option<&str>,
        user_id: &UserId,
    ) -> Result<List> {
        let (list, _) = self.records.require_owned_list(list_id, user_id).await?;
        let Some(title) = title else {
            return Ok(list);
        };
        let title = validate_text("title", title, self.limits.title_max_chars)?;

        self.records
            .set_field(Collection::Lists, list_id.as_str(), "title", &title)
            .await?;
        self.records.list(list_id).await
    }

    /// Removes the list from its board's `listOrder`, deletes its cards, then the list.
    #[tracing::instrument(skip(self))]
    pub async fn delete_list(&self, list_id: &ListId, user_id: &UserId) -> Result<bool> {
        let (list, board) = self.records.require_owned_list(list_id, user_id).await?;

        self.records
            .pull_member(OrderField::BoardLists, board.id.as_str(), list_id)
            .await?;

        let cards = self.records.cards_of_list(list_id).await?;
        for card in &cards {
            self.records.delete_card(&card.id).await?;
        }

        let deleted = self.records.delete_list(&list.id).await?;
        tracing::info!(board = %board.id, list = %list_id, cards = cards.len(), "Deleted list");
        Ok(deleted)
    }

    /// Moves a list to `new_index` within `[0, listOrder.len() - 1]` and rewrites
    /// the whole `listOrder`.
    #[tracing::instrument(skip(self))]
    pub async fn reorder_list(
        &self,
        list_id: &ListId,
        new_index: usize,
        user_id: &UserId,
    ) -> Result<Board> {
        let (_, mut board) = self.records.require_owned_list(list_id, user_id).await?;

        let mut order = board.list_order.clone();
        move_member(&mut order, list_id, new_index)?;

        self.records
            .set_order(OrderField::BoardLists, board.id.as_str(), &order)
            .await?;
        board.list_order = order;

        tracing::debug!(board = %board.id, list = %list_id, new_index, "Reordered list");
        Ok(board)
    }
}
