//! voice2-search - drive the chat list search against a Voice2 backend
//!
//! Run with: VOICE2_BASE_URL=http://localhost:4712 cargo run -- search meeting --fuzzy

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use voice2_client::domain::models::SearchFilters;
use voice2_client::{AppError, HttpSearchApi, ResultState, SearchConfig, SearchOrchestrator};

#[derive(Debug, Parser)]
#[command(name = "voice2-search", version, about = "Search Voice2 chats from the terminal")]
struct Cli {
    /// Backend base URL (overrides VOICE2_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Maximum results for advanced search
    #[arg(long)]
    limit: Option<usize>,

    /// Accept self-signed TLS certificates
    #[arg(long)]
    insecure: bool,

    /// Print states as JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all chats (merged chats hidden)
    List,
    /// Search once with the given query and filters
    Search {
        /// Search text; may be empty when filters are given
        query: Vec<String>,
        #[arg(long)]
        fuzzy: bool,
        #[arg(long)]
        boost_recent: bool,
        /// Start date, YYYY-MM-DD
        #[arg(long)]
        from: Option<String>,
        /// End date, YYYY-MM-DD
        #[arg(long)]
        to: Option<String>,
        /// Tag filter, repeatable
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Read queries from stdin and print every settled state.
    /// Lines starting with ':' change filters (:fuzzy on, :recent off,
    /// :from DATE, :to DATE, :tag NAME, :clear, :refresh).
    Watch,
}

/// One line of watch-mode input
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Query(String),
    Fuzzy(bool),
    BoostRecent(bool),
    DateFrom(Option<chrono::NaiveDate>),
    DateTo(Option<chrono::NaiveDate>),
    Tag(String),
    Clear,
    Refresh,
}

fn parse_switch(value: &str) -> voice2_client::Result<bool> {
    match value {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(AppError::InvalidInput(format!("expected on/off, got '{}'", other))),
    }
}

fn parse_optional_date(value: &str) -> voice2_client::Result<Option<chrono::NaiveDate>> {
    if value.is_empty() || value == "none" {
        Ok(None)
    } else {
        SearchFilters::parse_date(value).map(Some)
    }
}

fn parse_line(line: &str) -> voice2_client::Result<Input> {
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Input::Query(line.to_string()));
    };

    let (name, arg) = command
        .trim()
        .split_once(' ')
        .map(|(n, a)| (n, a.trim()))
        .unwrap_or((command.trim(), ""));

    match name {
        "fuzzy" => parse_switch(arg).map(Input::Fuzzy),
        "recent" => parse_switch(arg).map(Input::BoostRecent),
        "from" => parse_optional_date(arg).map(Input::DateFrom),
        "to" => parse_optional_date(arg).map(Input::DateTo),
        "tag" if !arg.is_empty() => Ok(Input::Tag(arg.to_string())),
        "clear" => Ok(Input::Clear),
        "refresh" => Ok(Input::Refresh),
        _ => Err(AppError::InvalidInput(format!("unknown command ':{}'", command.trim()))),
    }
}

fn apply(orchestrator: &SearchOrchestrator, input: Input) {
    match input {
        Input::Query(q) => orchestrator.set_query(q),
        Input::Fuzzy(on) => {
            orchestrator.set_fuzzy(on);
        }
        Input::BoostRecent(on) => {
            orchestrator.set_boost_recent(on);
        }
        Input::DateFrom(d) => {
            orchestrator.set_date_from(d);
        }
        Input::DateTo(d) => {
            orchestrator.set_date_to(d);
        }
        Input::Tag(t) => {
            orchestrator.toggle_tag(&t);
        }
        Input::Clear => orchestrator.clear_filters(),
        Input::Refresh => orchestrator.refresh(),
    }
}

fn render(state: &ResultState, json: bool) -> voice2_client::Result<String> {
    if json {
        return Ok(serde_json::to_string(state)?);
    }

    Ok(match state {
        ResultState::Loading => "loading...".to_string(),
        ResultState::Error { message } => format!("error: {}", message),
        ResultState::Success { items, tag_facets } => {
            let mut out = format!("{} chat(s)", items.len());
            for chat in items {
                out.push_str(&format!("\n  {}  {}  {}", chat.timestamp, chat.id, chat.display_title()));
            }
            if !tag_facets.is_empty() {
                let facets: Vec<String> = tag_facets
                    .iter()
                    .map(|f| match f.count {
                        Some(n) => format!("{} ({})", f.name, n),
                        None => f.name.clone(),
                    })
                    .collect();
                out.push_str(&format!("\n  tags: {}", facets.join(", ")));
            }
            out
        }
    })
}

fn build_config(cli: &Cli) -> anyhow::Result<SearchConfig> {
    let mut config = SearchConfig::from_env()?;
    if let Some(url) = &cli.base_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(limit) = cli.limit {
        config = config.with_result_limit(limit)?;
    }
    Ok(config.with_accept_invalid_certs(cli.insecure))
}

async fn watch(orchestrator: SearchOrchestrator, json: bool, timeout: Duration) -> anyhow::Result<()> {
    let mut states = orchestrator.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    orchestrator.refresh();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("failed to read stdin")? {
                    Some(line) => match parse_line(&line) {
                        Ok(input) => apply(&orchestrator, input),
                        Err(e) => eprintln!("{}", e),
                    },
                    None => break,
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
                let state = states.borrow_and_update().clone();
                if !state.is_loading() {
                    println!("{}", render(&state, json)?);
                }
            }
        }
    }

    // Input closed: run the pending dispatch now instead of waiting out the debounce
    if orchestrator.has_pending_dispatch() {
        let state = orchestrator.dispatch_now().await;
        println!("{}", render(&state, json)?);
        return Ok(());
    }

    tokio::task::yield_now().await;
    let unseen = states.has_changed().unwrap_or(false);
    if unseen || states.borrow().is_loading() {
        let settled = tokio::time::timeout(timeout, states.wait_for(|s| !s.is_loading())).await;
        if let Ok(Ok(state)) = settled {
            println!("{}", render(&state, json)?);
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let timeout = Duration::from_secs(config.request_timeout_secs);

    let api = HttpSearchApi::new(&config)?;
    tracing::info!(base_url = api.base_url(), "Using Voice2 backend");

    let orchestrator = SearchOrchestrator::new(Arc::new(api), config);

    match cli.command {
        Command::List => {
            let state = orchestrator.dispatch_now().await;
            println!("{}", render(&state, cli.json)?);
        }
        Command::Search { query, fuzzy, boost_recent, from, to, tags } => {
            orchestrator.set_fuzzy(fuzzy);
            orchestrator.set_boost_recent(boost_recent);
            orchestrator.set_date_from(from.as_deref().map(SearchFilters::parse_date).transpose()?);
            orchestrator.set_date_to(to.as_deref().map(SearchFilters::parse_date).transpose()?);
            for tag in &tags {
                orchestrator.toggle_tag(tag);
            }
            orchestrator.set_query(query.join(" "));

            let state = orchestrator.dispatch_now().await;
            println!("{}", render(&state, cli.json)?);
        }
        Command::Watch => watch(orchestrator, cli.json, timeout).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_query() {
        assert_eq!(parse_line("team meeting").unwrap(), Input::Query("team meeting".into()));
        assert_eq!(parse_line("").unwrap(), Input::Query(String::new()));
    }

    #[test]
    fn test_parse_filter_commands() {
        assert_eq!(parse_line(":fuzzy on").unwrap(), Input::Fuzzy(true));
        assert_eq!(parse_line(":recent off").unwrap(), Input::BoostRecent(false));
        assert_eq!(parse_line(":tag work").unwrap(), Input::Tag("work".into()));
        assert_eq!(parse_line(":from none").unwrap(), Input::DateFrom(None));
        assert_eq!(
            parse_line(":to 2026-04-30").unwrap(),
            Input::DateTo(chrono::NaiveDate::from_ymd_opt(2026, 4, 30))
        );
        assert_eq!(parse_line(":clear").unwrap(), Input::Clear);
        assert_eq!(parse_line(":refresh").unwrap(), Input::Refresh);
    }

    #[test]
    fn test_parse_rejects_bad_commands() {
        assert!(parse_line(":fuzzy maybe").is_err());
        assert!(parse_line(":tag").is_err());
        assert!(parse_line(":bogus").is_err());
        assert!(parse_line(":from yesterday").is_err());
    }

    #[test]
    fn test_render_error_and_json() {
        let state = ResultState::error("HTTP 404: Not Found");
        assert_eq!(render(&state, false).unwrap(), "error: HTTP 404: Not Found");
        assert!(render(&state, true).unwrap().contains("\"state\":\"error\""));
    }
}
