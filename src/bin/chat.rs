//! Terminal chat surface
//!
//! Reads lines from stdin and relays them through a running relay server.
//! A bare number picks one of the starter prompts; `/quit` or EOF exits.

use assistant_relay::config::env_parse;
use assistant_relay::surface::{
    ChatMessage, ChatSurface, HttpRelayClient, PendingTurn, Role, DEFAULT_TYPING_DELAY,
    STARTER_MESSAGES,
};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();

    let relay_url = std::env::var("RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
    let typing_delay = env_parse::<u64>("CHAT_TYPING_DELAY_MS")
        .map_or(DEFAULT_TYPING_DELAY, Duration::from_millis);

    let client = HttpRelayClient::new(&relay_url);
    tracing::info!(endpoint = client.endpoint(), "Chat surface starting");

    let mut chat = ChatSurface::new().with_typing_delay(typing_delay);

    println!("Ask me anything, or pick a question:");
    for (i, starter) in STARTER_MESSAGES.iter().enumerate() {
        println!("  {}. {starter}", i + 1);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut shown = 0;

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == "/quit" {
            break;
        }

        let Some(turn) = begin_turn(&mut chat, &line) else {
            continue;
        };

        shown = print_new(&chat, shown);
        if chat.is_typing() {
            println!("assistant is typing...");
        }

        let result = turn.send(&client).await;
        chat.finish(result);
        shown = print_new(&chat, shown);
    }

    Ok(())
}

/// Start a turn from one input line. Before the chat starts, a bare number
/// picks a starter prompt.
fn begin_turn(chat: &mut ChatSurface, line: &str) -> Option<PendingTurn> {
    let starter = (!chat.has_started_chat())
        .then(|| line.trim().parse::<usize>().ok())
        .flatten()
        .and_then(|n| n.checked_sub(1));

    // A number with no matching starter is sent as ordinary text
    starter
        .and_then(|index| chat.choose_starter(index))
        .or_else(|| chat.submit(line))
}

/// Print messages appended since the last call, returning the new count
fn print_new(chat: &ChatSurface, shown: usize) -> usize {
    let messages = chat.messages();
    for message in messages.iter().skip(shown) {
        print_message(message);
    }
    messages.len()
}

fn print_message(message: &ChatMessage) {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    println!("{who} [{}]: {}", message.timestamp.format("%H:%M"), message.content);
}
