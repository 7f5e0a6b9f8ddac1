//! engai – terminal chat session against an engai-server.
//!
//! One process is one session: the transcript lives in memory and is gone
//! when the program exits. Lines starting with `/` are commands; anything
//! else is sent as a question together with the pending attachment.

mod command;

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use engai_client::{ConversationStore, HttpTransport, is_accepted, load_attachment};
use engai_types::{Message, ModelTier, Role};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::command::Command;

#[derive(Debug, Parser)]
#[command(name = "engai", version, about = "Chat with the engineering AI core")]
struct Cli {
    /// API root of the server.
    #[arg(long, env = "ENGAI_SERVER_URL", default_value = "http://localhost:5000/api")]
    server: String,

    /// Model tier: `flash` or `pro`.
    #[arg(long, default_value = "flash")]
    model: String,

    /// Start with an empty transcript instead of the greeting.
    #[arg(long)]
    no_greeting: bool,

    /// `tracing` filter for diagnostics on stderr.
    #[arg(long, env = "ENGAI_LOG", default_value = "warn")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_new(&cli.log)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let transport = HttpTransport::new(&cli.server);
    let mut store = if cli.no_greeting {
        ConversationStore::new()
    } else {
        ConversationStore::with_greeting()
    };
    store.set_model_tier(ModelTier::from_form_value(Some(&cli.model)));
    info!(endpoint = %transport.endpoint(), model = %store.model_tier(), "session started");

    for message in store.transcript() {
        print_message(message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt(&store)?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => println!("{}", command::HELP),
            Command::Attach(path) => attach(&mut store, Path::new(&path)).await,
            Command::Detach => match store.clear_attachment() {
                Some(a) => println!("Removed {}", a.original_name),
                None => println!("Nothing attached"),
            },
            Command::Model(tier) => {
                store.set_model_tier(tier);
                println!("Model: {tier}");
            }
            Command::History => store.transcript().iter().for_each(print_message),
            Command::Unknown(cmd) => println!("Unknown command {cmd}; try /help"),
            Command::Say(text) => {
                store.set_input(text);
                let before = store.transcript().len();
                if store.send(&transport).await {
                    store.transcript()[before..].iter().for_each(print_message);
                } else {
                    debug!("blank turn ignored");
                }
            }
        }
    }

    info!(turns = store.transcript().len(), "session ended");
    Ok(())
}

async fn attach(store: &mut ConversationStore, path: &Path) {
    match load_attachment(path).await {
        Ok(attachment) if is_accepted(&attachment) => {
            println!("Attached {} ({})", attachment.original_name, attachment.mime_type);
            store.select_attachment(attachment);
        }
        Ok(attachment) => println!(
            "{} is {}; only PDF and image files can be attached",
            attachment.original_name, attachment.mime_type
        ),
        Err(e) => println!("Cannot read {}: {e}", path.display()),
    }
}

fn prompt(store: &ConversationStore) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    match store.pending_attachment() {
        Some(a) => write!(out, "[{}] [{}] > ", store.model_tier(), a.original_name)?,
        None => write!(out, "[{}] > ", store.model_tier())?,
    }
    out.flush()
}

fn print_message(message: &Message) {
    let who = match message.role() {
        Role::User => "you",
        Role::Assistant => "engai",
    };
    if let Some(name) = message.attachment_name() {
        println!("{who} [{name}]: {}", message.text());
    } else {
        println!("{who}: {}", message.text());
    }
    println!();
}
