use anyhow::{bail, Result};
use clap::{CommandFactory, Parser, Subcommand};
use client_core::{ActionChoice, AttendeeCriteria, EventCriteria, Phase, UiAction};
use shared::domain::{ActionKind, Username};

#[derive(Parser, Debug)]
#[command(
    name = "console",
    no_binary_name = true,
    disable_help_flag = true,
    disable_help_subcommand = true,
    disable_version_flag = true
)]
struct Line {
    #[command(subcommand)]
    command: ConsoleCommand,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
enum ConsoleCommand {
    /// Discover events: events <location> <start YYYY-MM-DD> <end YYYY-MM-DD> [max]
    Events {
        location: String,
        start_date: String,
        end_date: String,
        max_results: Option<u32>,
    },
    /// Discover attendees of an event by name
    Attendees {
        #[arg(required = true, num_args = 1..)]
        event_name: Vec<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        max: Option<u32>,
    },
    /// Discover attendees of the n-th listed event
    Pick { position: usize },
    /// Switch to the events, attendees or notifications tab
    Tab { phase: Phase },
    /// Select or deselect one attendee
    Toggle { username: String },
    /// Select every listed attendee
    All,
    /// Clear the selection
    #[command(name = "none", alias = "clear")]
    ClearSelection,
    /// Queue the selected attendees for notifications
    Send,
    /// Remove a user from the notification queue
    #[command(alias = "rm")]
    Remove { username: String },
    /// Run a bulk action on the queue: act <retweet|like|comment|quote> [message]
    Act {
        action: ActionKind,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        message: Vec<String>,
    },
    /// Check service health
    Health,
    /// Show the service's posting credentials status
    Auth,
    /// Show this help
    Help,
    /// Leave the console
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Ui(UiAction),
    Help,
    Quit,
}

/// Parses one console line. Blank lines yield `None`.
pub fn parse_line(line: &str, default_max_results: u32) -> Result<Option<Command>> {
    let tokens = split_line(line)?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let parsed = Line::try_parse_from(tokens)?;
    Ok(Some(into_command(parsed.command, default_max_results)))
}

pub fn help_text() -> String {
    Line::command().render_help().to_string()
}

fn into_command(command: ConsoleCommand, default_max_results: u32) -> Command {
    let action = match command {
        ConsoleCommand::Events {
            location,
            start_date,
            end_date,
            max_results,
        } => UiAction::DiscoverEvents(
            EventCriteria::new(location, start_date, end_date)
                .with_max_results(max_results.unwrap_or(default_max_results)),
        ),
        ConsoleCommand::Attendees {
            event_name,
            date,
            max,
        } => {
            let mut criteria = AttendeeCriteria::new(event_name.join(" "))
                .with_max_results(max.unwrap_or(default_max_results));
            if let Some(date) = date {
                criteria = criteria.with_event_date(date);
            }
            UiAction::DiscoverAttendees(criteria)
        }
        ConsoleCommand::Pick { position } => UiAction::ChooseEvent(position),
        ConsoleCommand::Tab { phase } => UiAction::ShowPhase(phase),
        ConsoleCommand::Toggle { username } => UiAction::Toggle(Username::from(username)),
        ConsoleCommand::All => UiAction::SelectAll,
        ConsoleCommand::ClearSelection => UiAction::ClearSelection,
        ConsoleCommand::Send => UiAction::SendSelectedToNotifications,
        ConsoleCommand::Remove { username } => UiAction::Dequeue(Username::from(username)),
        ConsoleCommand::Act { action, message } => {
            let mut choice = ActionChoice::new(action);
            if !message.is_empty() {
                choice = choice.with_message(message.join(" "));
            }
            UiAction::Dispatch(choice)
        }
        ConsoleCommand::Health => UiAction::CheckHealth,
        ConsoleCommand::Auth => UiAction::CheckAuth,
        ConsoleCommand::Help => return Command::Help,
        ConsoleCommand::Quit => return Command::Quit,
    };
    Command::Ui(action)
}

/// Whitespace splitting with single and double quotes grouping words.
fn split_line(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_token = true;
            }
            None if ch.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(ch);
                in_token = true;
            }
        }
    }

    if let Some(q) = quote {
        bail!("unterminated {q} quote");
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
