//! Terminal front-end for the connection-game engine.
//!
//! Implements the chat transport over stdin/stdout: every line typed is
//! an inbound message from the local owner, and every announcement is
//! printed. Multiple human seats all read from the same keyboard, so a
//! local series is hot-seat.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use anyhow::Error;
use async_trait::async_trait;
use ctrlc::set_handler;
use log::info;
use pico_args::Arguments;
use tokio::sync::{Mutex, mpsc};

use connect_game::{
    ChannelId, ChatTransport, GameSession, InboundMessage, MessageFilter, PlayerRegistry,
    TransportError, UserId,
};

const HELP: &str = "\
Run a connection-game series in the terminal

USAGE:
  cg_console [OPTIONS]

OPTIONS:
  --json                   Also print the series summary as JSON

FLAGS:
  -h, --help               Print help information

Setup questions and moves are read from stdin; answer the prompts as they
appear. Send \"end\" on your turn to resign, ctrl-c to stop an unattended
series.
";

/// Identity behind the keyboard. The owner is gamemaster and every human
/// seat at once.
const OWNER_ID: UserId = 1;

/// The single channel a terminal session plays in.
const CONSOLE_CHANNEL: ChannelId = ChannelId(0);

/// Chat transport over stdin/stdout.
struct ConsoleTransport {
    lines: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl ConsoleTransport {
    fn new() -> Arc<Self> {
        let (line_tx, line_rx) = mpsc::unbounded_channel();
        // Stdin reads block, so they live on their own thread.
        std::thread::spawn(move || {
            for line in std::io::stdin().lines() {
                let Ok(line) = line else {
                    break;
                };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        });
        Arc::new(Self {
            lines: Mutex::new(line_rx),
        })
    }
}

#[async_trait]
impl ChatTransport for ConsoleTransport {
    async fn announce(&self, _channel: ChannelId, text: &str) {
        println!("{text}");
    }

    async fn wait_message(&self, filter: MessageFilter) -> Result<InboundMessage, TransportError> {
        let mut lines = self.lines.lock().await;
        loop {
            let Some(text) = lines.recv().await else {
                return Err(TransportError::Closed);
            };
            let message = InboundMessage {
                author: OWNER_ID,
                channel: CONSOLE_CHANNEL,
                text,
            };
            if filter.accepts(&message) {
                return Ok(message);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }
    let print_json = pargs.contains("--json");

    env_logger::builder().format_target(false).init();

    let transport = ConsoleTransport::new();
    let registry = PlayerRegistry::builtin();

    // Every human seat binds the keyboard identity: hot-seat play.
    let seats = vec![OWNER_ID; connect_game::game::MAX_TEAMS as usize];
    let mut session = GameSession::configure(
        registry,
        transport,
        OWNER_ID,
        &seats,
        vec![CONSOLE_CHANNEL],
    )
    .await?;

    let interrupt = session.interrupt_flag();
    set_handler(move || interrupt.store(true, Ordering::Relaxed))?;

    info!("starting series");
    let summary = session.run().await?;

    if print_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
