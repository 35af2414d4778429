use crate::cli::HistoryCommand;
use crate::config::{AdminConfig, MAX_HISTORY_LIMIT};
use crate::error::Result;
use crate::history::{MessageStore, Role};
use colored::Colorize;
use prettytable::{format, Table};

const PREVIEW_CHARS: usize = 60;

/// Handle history commands
pub fn handle_history(command: HistoryCommand, config: &AdminConfig) -> Result<()> {
    let store = MessageStore::open(config.storage.resolved_history_db()?)?;

    match command {
        HistoryCommand::List { limit, json } => {
            let mut messages = store.recent(limit.min(MAX_HISTORY_LIMIT))?;
            messages.reverse();

            if json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else if messages.is_empty() {
                println!("{}", "No chat history found.".yellow());
            } else {
                let mut table = Table::new();
                table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

                table.add_row(prettytable::row![
                    "ID".bold(),
                    "Role".bold(),
                    "Message".bold(),
                    "Time".bold()
                ]);

                for message in &messages {
                    let role = match message.role {
                        Role::User => message.role.as_str().cyan(),
                        Role::Assistant => message.role.as_str().green(),
                        Role::System => message.role.as_str().yellow(),
                    };
                    let time = message
                        .timestamp
                        .with_timezone(&chrono::Local)
                        .format("%Y-%m-%d %H:%M")
                        .to_string();

                    table.add_row(prettytable::row![
                        message.id,
                        role,
                        preview(&message.content, PREVIEW_CHARS),
                        time
                    ]);
                }

                println!("\nChat History ({}):", store.path().display());
                table.printstd();
                println!();
            }
        }
        HistoryCommand::Clear => {
            let deleted = store.clear()?;
            println!("{}", format!("Deleted {} messages", deleted).green());
        }
    }

    store.close()
}

/// Single-line preview of at most `max` characters
fn preview(content: &str, max: usize) -> String {
    let flat: String = content
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if flat.chars().count() > max {
        let cut: String = flat.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_flattens_whitespace() {
        assert_eq!(preview("hello\n  world\t!", 60), "hello world !");
    }

    #[test]
    fn test_preview_truncates_on_char_boundaries() {
        let long = "가".repeat(100);
        let out = preview(&long, 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with("..."));
    }

    #[test]
    fn test_preview_keeps_short_text() {
        assert_eq!(preview("short", 10), "short");
    }
}
