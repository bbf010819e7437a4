// console.rs - Operator Console
// Reads commands from standard input while the bot runs: status, reloading
// the custom command file and graceful shutdown.

use crate::center::CommandCenter;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt};
use tokio::sync::mpsc;

#[derive(Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    Quit,
    Help,
    Status,
    Reload,
    Empty,
    Unknown(String),
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Self {
        let command = line.trim().to_lowercase();
        match command.as_str() {
            "quit" | "q" | "exit" => ConsoleCommand::Quit,
            "help" | "h" => ConsoleCommand::Help,
            "status" => ConsoleCommand::Status,
            "reload" => ConsoleCommand::Reload,
            "" => ConsoleCommand::Empty,
            _ => ConsoleCommand::Unknown(command),
        }
    }
}

/// Serve console commands until `quit` or end of input.
pub async fn run<R>(input: R, center: Arc<CommandCenter>, shutdown_tx: mpsc::Sender<String>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut stdout = tokio::io::stdout();

    loop {
        if stdout.write_all(b"> ").await.is_err() || stdout.flush().await.is_err() {
            log::warn!("Console prompt could not be written; console stopped");
            return;
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                log::debug!("Console input closed");
                return;
            }
            Err(e) => {
                log::error!("Error reading console input: {}", e);
                return;
            }
        };

        match ConsoleCommand::parse(&line) {
            ConsoleCommand::Quit => {
                println!("⏹️  Shutting down bot...");
                if shutdown_tx.send("quit".to_string()).await.is_err() {
                    log::error!("Failed to send shutdown signal");
                }
                return;
            }
            ConsoleCommand::Help => {
                println!("🤖 Available commands:");
                println!("  quit, q, exit  - Stop the bot gracefully");
                println!("  help, h        - Show this help message");
                println!("  status         - Show the custom command prefix and count");
                println!("  reload         - Reload custom commands from disk");
            }
            ConsoleCommand::Status => println!("{}", status_line(&center).await),
            ConsoleCommand::Reload => match center.custom_commands.load().await {
                Some(notice) => {
                    notice.log();
                    println!("{}", notice);
                }
                None => println!("✅ Reloaded. {}", status_line(&center).await),
            },
            ConsoleCommand::Empty => {}
            ConsoleCommand::Unknown(command) => {
                println!("❓ Unknown command: '{}'. Type 'help' for available commands.", command);
            }
        }
    }
}

async fn status_line(center: &CommandCenter) -> String {
    let config = center.custom_commands.snapshot().await;
    format!(
        "Prefix: '{}', custom commands: {}",
        config.prefix,
        config.commands.len()
    )
}
