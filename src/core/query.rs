use crate::core::service::BoardService;
use crate::domain::model::{BoardId, Card, List, ListId, UserId};
use crate::domain::ordering::{project, reconcile, OrderField};
use crate::domain::ports::RecordStore;
use crate::utils::error::Result;

impl<S: RecordStore> BoardService<S> {
    /// Lists of a board in `listOrder` sequence. Lists the order array does not
    /// mention follow in creation order; stale ids are skipped. The stored order is
    /// never rewritten here.
    #[tracing::instrument(skip(self))]
    pub async fn lists_for_board(&self, board_id: &BoardId, user_id: &UserId) -> Result<Vec<List>> {
        let board = self.records.require_owned_board(board_id, user_id).await?;
        let lists = self.records.lists_of_board(board_id).await?;

        let projection = project(&board.list_order, lists, |list| &list.id);
        if projection.has_drift() {
            tracing::warn!(
                board = %board_id,
                unlisted = projection.unlisted,
                stale = projection.stale.len(),
                "List order drifted from live lists"
            );
        }
        Ok(projection.records)
    }

    /// Cards of a list in `cardOrder` sequence, with the same drift handling as
    /// [`BoardService::lists_for_board`].
    #[tracing::instrument(skip(self))]
    pub async fn cards_for_list(&self, list_id: &ListId, user_id: &UserId) -> Result<Vec<Card>> {
        let (list, _) = self.records.require_owned_list(list_id, user_id).await?;
        let cards = self.records.cards_of_list(list_id).await?;

        let projection = project(&list.card_order, cards, |card| &card.id);
        if projection.has_drift() {
            tracing::warn!(
                list = %list_id,
                unlisted = projection.unlisted,
                stale = projection.stale.len(),
                "Card order drifted from live cards"
            );
        }
        Ok(projection.records)
    }

    /// Owner-initiated counterpart of `repair_board_order` for a list's `cardOrder`.
    #[tracing::instrument(skip(self))]
    pub async fn repair_list_order(&self, list_id: &ListId, user_id: &UserId) -> Result<List> {
        let (mut list, _) = self.records.require_owned_list(list_id, user_id).await?;
        let live: Vec<_> = self
            .records
            .cards_of_list(list_id)
            .await?
            .into_iter()
            .map(|card| card.id)
            .collect();

        let repaired = reconcile(&list.card_order, &live);
        if repaired != list.card_order {
            tracing::info!(
                list = %list_id,
                before = list.card_order.len(),
                after = repaired.len(),
                "Repaired card order"
            );
            self.records
                .set_order(OrderField::ListCards, list_id.as_str(), &repaired)
                .await?;
            list.card_order = repaired;
        }
        Ok(list)
    }
}
