use crate::core::service::BoardService;
use crate::domain::model::{Board, Card, CardId, ListId, UserId};
use crate::domain::ordering::{insert_member, position_of, remove_member, OrderField};
use crate::domain::ports::{Collection, RecordStore};
use crate::utils::error::{BoardError, Result};
use crate::utils::validation::{validate_index, validate_text};

impl<S: RecordStore> BoardService<S> {
    /// Inserts the card, then appends its id to the list's `cardOrder`.
    #[tracing::instrument(skip(self, content))]
    pub async fn create_card(
        &self,
        list_id: &ListId,
        content: &str,
        user_id: &UserId,
    ) -> Result<Card> {
        self.records.require_owned_list(list_id, user_id).await?;
        let content = validate_text("content", content, self.limits.content_max_chars)?;

        let card = Card::new(content, list_id.clone());
        self.records.insert_card(&card).await?;
        self.records
            .push_member(OrderField::ListCards, list_id.as_str(), &card.id)
            .await?;

        tracing::info!(list = %list_id, card = %card.id, "Created card");
        Ok(card)
    }

    #[tracing::instrument(skip(self, content))]
    pub async fn update_card(
        &self,
        card_id: &CardId,
        content: Option<&str>,
        user_id: &UserId,
    ) -> Result<Card> {
        let (card, _, _) = self.records.require_owned_card(card_id, user_id).await?;
        let Some(content) = content else {
            return Ok(card);
        };
        let content = validate_text("content", content, self.limits.content_max_chars)?;

        self.records
            .set_field(Collection::Cards, card_id.as_str(), "content", &content)
            .await?;
        self.records.card(card_id).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete_card(&self, card_id: &CardId, user_id: &UserId) -> Result<bool> {
        let (_, list, _) = self.records.require_owned_card(card_id, user_id).await?;

        self.records
            .pull_member(OrderField::ListCards, list.id.as_str(), card_id)
            .await?;
        let deleted = self.records.delete_card(card_id).await?;

        tracing::info!(list = %list.id, card = %card_id, "Deleted card");
        Ok(deleted)
    }

    /// Moves a card to `new_index` in `dest_list_id`, which may be its current list.
    ///
    /// `new_index` may be as large as the destination's current length, and that slot
    /// always means "last": across lists it appends, within one list it moves the card
    /// to the end. Every check runs before the first write, so a rejected move leaves
    /// the store untouched. A same-list move writes once.
    #[tracing::instrument(skip(self))]
    pub async fn reorder_card(
        &self,
        card_id: &CardId,
        source_list_id: &ListId,
        dest_list_id: &ListId,
        new_index: usize,
        user_id: &UserId,
    ) -> Result<Board> {
        let card = self.records.card(card_id).await?;
        if &card.list_id != source_list_id {
            return Err(BoardError::invalid(format!(
                "card {} belongs to list {}, not {}",
                card_id, card.list_id, source_list_id
            )));
        }

        let same_list = source_list_id == dest_list_id;
        let mut source = self.records.list(source_list_id).await?;
        let dest = if same_list {
            source.clone()
        } else {
            self.records.list(dest_list_id).await?
        };
        if source.board_id != dest.board_id {
            return Err(BoardError::invalid(format!(
                "cannot move card {} from board {} to board {}",
                card_id, source.board_id, dest.board_id
            )));
        }

        let board = self
            .records
            .require_owned_board(&source.board_id, user_id)
            .await?;

        validate_index("newIndex", new_index, Some(dest.card_order.len()))?;
        if !same_list && position_of(&dest.card_order, card_id).is_some() {
            return Err(BoardError::invalid(format!(
                "card {} is already listed in {}",
                card_id, dest_list_id
            )));
        }

        remove_member(&mut source.card_order, card_id)?;
        let (mut dest_order, slot) = if same_list {
            // 同列表移除後少一格,len 代表移到最後
            let order = source.card_order.clone();
            let slot = new_index.min(order.len());
            (order, slot)
        } else {
            (dest.card_order, new_index)
        };
        insert_member(&mut dest_order, card_id.clone(), slot)?;

        if !same_list {
            self.records
                .set_field(Collection::Cards, card_id.as_str(), "listId", dest_list_id)
                .await?;
            self.records
                .set_order(OrderField::ListCards, source_list_id.as_str(), &source.card_order)
                .await?;
        }
        self.records
            .set_order(OrderField::ListCards, dest_list_id.as_str(), &dest_order)
            .await?;

        tracing::debug!(
            card = %card_id,
            from = %source_list_id,
            to = %dest_list_id,
            new_index,
            "Moved card"
        );
        Ok(board)
    }
}
