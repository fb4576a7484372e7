use crate::core::{BoardId, BoardService, CardId, ListId, RecordStore, UserId};
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Parser)]
#[command(name = "board-order")]
#[command(about = "Maintain board, list and card ordering in a local data directory")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "board-order.toml")]
    pub config: String,

    /// Override store.path from the config
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Authenticated user the command runs as
    #[arg(short, long)]
    pub user: String,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    CreateBoard { title: String },
    ShowBoard { board: String },
    RenameBoard { board: String, title: String },
    DeleteBoard { board: String },
    RepairBoard { board: String },
    Lists { board: String },
    CreateList { board: String, title: String },
    RenameList { list: String, title: String },
    DeleteList { list: String },
    MoveList { list: String, index: usize },
    Cards { list: String },
    CreateCard { list: String, content: String },
    EditCard { card: String, content: String },
    DeleteCard { card: String },
    MoveCard {
        card: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        index: usize,
    },
    RepairList { list: String },
}

fn render<T: Serialize>(payload: T) -> Result<Value> {
    Ok(serde_json::to_value(payload)?)
}

impl Command {
    /// Runs the command and renders its payload as JSON.
    pub async fn execute<S: RecordStore>(
        self,
        service: &BoardService<S>,
        user: &UserId,
    ) -> Result<Value> {
        let value = match self {
            Command::CreateBoard { title } => render(service.create_board(&title, user).await?)?,
            Command::ShowBoard { board } => {
                render(service.get_board(&BoardId::from(board), user).await?)?
            }
            Command::RenameBoard { board, title } => {
                render(service.update_board(&BoardId::from(board), Some(&title), user).await?)?
            }
            Command::DeleteBoard { board } => {
                json!({ "deleted": service.delete_board(&BoardId::from(board), user).await? })
            }
            Command::RepairBoard { board } => {
                render(service.repair_board_order(&BoardId::from(board), user).await?)?
            }
            Command::Lists { board } => {
                render(service.lists_for_board(&BoardId::from(board), user).await?)?
            }
            Command::CreateList { board, title } => {
                render(service.create_list(&BoardId::from(board), &title, user).await?)?
            }
            Command::RenameList { list, title } => {
                render(service.update_list(&ListId::from(list), Some(&title), user).await?)?
            }
            Command::DeleteList { list } => {
                json!({ "deleted": service.delete_list(&ListId::from(list), user).await? })
            }
            Command::MoveList { list, index } => {
                render(service.reorder_list(&ListId::from(list), index, user).await?)?
            }
            Command::Cards { list } => {
                render(service.cards_for_list(&ListId::from(list), user).await?)?
            }
            Command::CreateCard { list, content } => {
                render(service.create_card(&ListId::from(list), &content, user).await?)?
            }
            Command::EditCard { card, content } => {
                render(service.update_card(&CardId::from(card), Some(&content), user).await?)?
            }
            Command::DeleteCard { card } => {
                json!({ "deleted": service.delete_card(&CardId::from(card), user).await? })
            }
            Command::MoveCard {
                card,
                from,
                to,
                index,
            } => {
                let board = service
                    .reorder_card(
                        &CardId::from(card),
                        &ListId::from(from),
                        &ListId::from(to),
                        index,
                        user,
                    )
                    .await?;
                render(board)?
            }
            Command::RepairList { list } => {
                render(service.repair_list_order(&ListId::from(list), user).await?)?
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryStore;

    #[test]
    fn test_parse_move_card() {
        let args = CliArgs::try_parse_from([
            "board-order",
            "--user",
            "u1",
            "move-card",
            "c1",
            "--from",
            "l1",
            "--to",
            "l2",
            "--index",
            "0",
        ])
        .unwrap();

        assert_eq!(args.user, "u1");
        assert_eq!(args.config, "board-order.toml");
        match args.command {
            Command::MoveCard {
                card,
                from,
                to,
                index,
            } => {
                assert_eq!(
                    (card.as_str(), from.as_str(), to.as_str(), index),
                    ("c1", "l1", "l2", 0)
                );
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_user_is_required() {
        assert!(CliArgs::try_parse_from(["board-order", "create-board", "Plan"]).is_err());
    }

    #[tokio::test]
    async fn test_execute_renders_json() {
        let service = BoardService::new(InMemoryStore::new());
        let user = UserId::from("u1");

        let board = Command::CreateBoard {
            title: "Plan".to_string(),
        }
        .execute(&service, &user)
        .await
        .unwrap();
        assert_eq!(board["title"], "Plan");
        assert_eq!(board["ownerId"], "u1");

        let board_id = board["id"].as_str().unwrap().to_string();
        let list = Command::CreateList {
            board: board_id.clone(),
            title: "Todo".to_string(),
        }
        .execute(&service, &user)
        .await
        .unwrap();

        let lists = Command::Lists { board: board_id }
            .execute(&service, &user)
            .await
            .unwrap();
        assert_eq!(lists[0]["id"], list["id"]);
    }
}
