use board_order::{BoardId, BoardService, CardId, ErrorKind, FileStore, ListId, UserId};
use tempfile::TempDir;

#[tokio::test]
async fn test_board_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let owner = UserId::from("U1");

    let (board_id, todo, done, card) = {
        let service = BoardService::new(FileStore::open(temp_dir.path()).await.unwrap());
        let board = service.create_board("Release", &owner).await.unwrap();
        let todo = service.create_list(&board.id, "Todo", &owner).await.unwrap();
        let done = service.create_list(&board.id, "Done", &owner).await.unwrap();
        let card = service.create_card(&todo.id, "Tag v1", &owner).await.unwrap();
        service
            .reorder_card(&card.id, &todo.id, &done.id, 0, &owner)
            .await
            .unwrap();
        service.reorder_list(&done.id, 0, &owner).await.unwrap();
        (board.id, todo.id, done.id, card.id)
    };

    let service = BoardService::new(FileStore::open(temp_dir.path()).await.unwrap());
    let lists = service.lists_for_board(&board_id, &owner).await.unwrap();
    let ids: Vec<_> = lists.iter().map(|l| l.id.clone()).collect();
    assert_eq!(ids, vec![done.clone(), todo.clone()]);

    let cards = service.cards_for_list(&done, &owner).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, card);
    assert_eq!(cards[0].list_id, done);
    assert!(service.cards_for_list(&todo, &owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_list_removes_files() {
    let temp_dir = TempDir::new().unwrap();
    let owner = UserId::from("U1");
    let service = BoardService::new(FileStore::open(temp_dir.path()).await.unwrap());

    let board = service.create_board("Cleanup", &owner).await.unwrap();
    let list = service.create_list(&board.id, "Old", &owner).await.unwrap();
    let card = service.create_card(&list.id, "stale", &owner).await.unwrap();

    assert!(service.delete_list(&list.id, &owner).await.unwrap());

    let list_file = temp_dir
        .path()
        .join("lists")
        .join(format!("{}.json", list.id));
    let card_file = temp_dir
        .path()
        .join("cards")
        .join(format!("{}.json", card.id));
    assert!(!list_file.exists());
    assert!(!card_file.exists());

    let board = service.get_board(&board.id, &owner).await.unwrap();
    assert!(board.list_order.is_empty());

    let err = service
        .get_board(&board.id, &UserId::from("U2"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_unusable_ids_are_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let owner = UserId::from("U1");
    let service = BoardService::new(FileStore::open(temp_dir.path()).await.unwrap());

    let err = service
        .get_board(&BoardId::from("no.such"), &owner)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service
        .cards_for_list(&ListId::from("a b"), &owner)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service
        .delete_card(&CardId::from("../card"), &owner)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let err = service
        .get_board(&BoardId::from("missing"), &owner)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
