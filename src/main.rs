use anyhow::Context;
use board_order::utils::{logger, validation::Validate};
use board_order::{AppConfig, BoardService, CliArgs, FileStore, InMemoryStore, RecordStore, UserId};
use clap::Parser;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 設定檔不存在時使用預設值
    let mut config = if Path::new(&args.config).exists() {
        AppConfig::from_file(&args.config)
            .with_context(|| format!("failed to load config file '{}'", args.config))?
    } else {
        AppConfig::default()
    };

    if let Some(data_dir) = &args.data_dir {
        config.store.path = data_dir.clone();
    }

    logger::init_logger(&config.logging, args.verbose);
    tracing::info!("🚀 Starting board-order CLI");
    if args.verbose {
        tracing::debug!("Config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let user = UserId::from(args.user.as_str());
    match config.store.backend.as_str() {
        "memory" => {
            tracing::warn!("In-memory store selected; nothing outlives this command");
            let service = BoardService::with_limits(InMemoryStore::new(), config.limits());
            run(&service, args, &user).await
        }
        _ => {
            let store = FileStore::open(&config.store.path)
                .await
                .with_context(|| format!("failed to open data directory '{}'", config.store.path))?;
            tracing::info!("📁 Data directory: {}", store.base_path().display());
            let service = BoardService::with_limits(store, config.limits());
            run(&service, args, &user).await
        }
    }
}

async fn run<S: RecordStore>(
    service: &BoardService<S>,
    args: CliArgs,
    user: &UserId,
) -> anyhow::Result<()> {
    match args.command.execute(service, user).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Command failed: {} (kind: {:?})", e, e.kind());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.kind() {
                board_order::ErrorKind::InvalidArgument => 2,
                board_order::ErrorKind::NotFound => 3,
                board_order::ErrorKind::Forbidden => 4,
                board_order::ErrorKind::StoreFailure => 5,
            };
            std::process::exit(exit_code);
        }
    }
}
