//! Console loop driving the dispatcher without a chat transport.
//!
//! Reads lines from stdin as messages from a single user and prints
//! the bot's replies. Useful for poking at command parsing, glyph
//! replay, and the record store end to end:
//!
//! ```text
//! BOT_USERNAME=sheetbot cargo run --example console_bot
//! ```

use std::io::{self, BufRead, Write};

use bot_core::{BotConfig, IncomingMessage};
use database::Database;
use dispatcher::{Dispatcher, LoggingSender, MessageSender};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = BotConfig::from_env().unwrap_or_default();
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:sheetbot.db?mode=rwc".to_string());

    let db = Database::connect(&database_url).await?;
    db.migrate().await?;

    let dispatcher = Dispatcher::new(db, config)?;
    let sender = LoggingSender;

    println!("sheet bot console - type commands, empty line for the greeting, Ctrl-D to quit");

    let stdin = io::stdin();
    let mut timestamp: i64 = 0;
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        timestamp += 1;

        let msg = IncomingMessage::direct("console", line.trim_end(), timestamp);
        match dispatcher.handle_text(&msg).await {
            Ok(replies) => sender.send_all(&replies).await?,
            Err(err) => eprintln!("dispatch failed: {err}"),
        }
    }

    Ok(())
}
