mod commands;
mod config;
mod render;

use std::{io::Write as _, path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use client_core::{HttpEventApi, Session, UiAction, UiEvent};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{help_text, parse_line, Command},
    config::{finalize, load_settings, Settings},
    render::render_ui_event,
};

#[derive(Parser, Debug)]
#[command(about = "Discover events and their attendees, then run bulk social actions")]
struct Args {
    /// Settings file (defaults to ./event-client.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    #[arg(long)]
    max_results: Option<u32>,
    /// Ask the service for its health before the first prompt
    #[arg(long)]
    check_health: bool,
}

fn resolve_settings(args: &Args) -> Result<Settings> {
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = &args.api_url {
        settings.api_base_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        settings.request_timeout_secs = secs;
    }
    if let Some(max) = args.max_results {
        settings.default_max_results = max;
    }
    finalize(settings)
}

fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_events(session: &Session, events: &[UiEvent]) {
    for event in events {
        let text = render_ui_event(event, session.controller());
        println!("{}", text.trim_end());
    }
}

fn prompt(session: &Session) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "[{}]> ", session.controller().phase())?;
    stdout.flush()
}

async fn run(session: &mut Session) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt(session)?;
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line, session.default_max_results()) {
            Ok(None) => {}
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => println!("{}", help_text()),
            Ok(Some(Command::Ui(action))) => {
                let events = session.handle(action).await;
                print_events(session, &events);
            }
            Err(err) => {
                warn!(%err, "unparsable command");
                println!("{}", err.to_string().trim_end());
            }
        }
        prompt(session)?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings = resolve_settings(&args)?;
    init_tracing(&settings.log_filter);

    let api = HttpEventApi::new(&settings.api_base_url, settings.request_timeout())?;
    info!(
        base_url = api.base_url(),
        timeout_secs = settings.request_timeout_secs,
        "event console starting"
    );
    let mut session =
        Session::new(Arc::new(api)).with_default_max_results(settings.default_max_results);

    if args.check_health {
        let events = session.handle(UiAction::CheckHealth).await;
        print_events(&session, &events);
    }

    println!("Type 'help' for commands.");
    run(&mut session).await
}
