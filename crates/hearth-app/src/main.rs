//! Hearth application binary - composition root.
//!
//! Ties together all Hearth crates into a single executable:
//! 1. Load configuration from TOML
//! 2. Build the auth service and in-memory stores
//! 3. Wire the dispatcher to console collaborators
//! 4. Start the reminder scheduler in the background
//! 5. Read utterances from stdin and run them through the voice pipeline
//!
//! Each input line is treated as one finalized recognition result, so the
//! full stabilize -> classify -> dispatch path runs without a microphone.

mod cli;
mod console;

use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use hearth_assist::Assistant;
use hearth_core::config::HearthConfig;
use hearth_dispatch::Dispatcher;
use hearth_intent::{Classifier, Command};
use hearth_schedule::ReminderScheduler;
use hearth_store::auth::AuthService;
use hearth_store::{ChoreStore, LocalAuth, PantryStore, ReminderStore};
use hearth_voice::{RecognitionEvent, UtteranceStabilizer};

use cli::CliArgs;
use console::{ConsolePrompter, ConsoleSurface};

/// Demo account so the spoken login phrase works out of the box.
const DEMO_USER: &str = "anna";
const DEMO_PASSWORD: &str = "password";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Tracing.
    let filter = match args.log_level.as_deref() {
        Some(level) => tracing_subscriber::EnvFilter::new(level),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Starting Hearth v{}", env!("CARGO_PKG_VERSION"));

    // Config.
    let config_file = args.resolve_config_path();
    let config = HearthConfig::load_or_default(&config_file);

    // Auth and stores.
    let auth = Arc::new(LocalAuth::new());
    auth.register(DEMO_USER, DEMO_PASSWORD)?;
    auth.logout();
    tracing::info!("Demo account ready: say \"login with {}\"", DEMO_USER);

    let reminders = Arc::new(ReminderStore::new());
    let pantry = Arc::new(PantryStore::new());
    let chores = Arc::new(ChoreStore::new());

    // Dispatcher wired to the console surface.
    let surface = Arc::new(ConsoleSurface);
    let dispatcher = Dispatcher::new(
        surface.clone(),
        surface.clone(),
        surface,
        auth,
        reminders.clone(),
        pantry,
        chores,
        &config.dispatch,
    );

    // Reminder scheduler.
    let scheduler = ReminderScheduler::new(reminders, Arc::new(ConsolePrompter), &config.scheduler);
    let runner = scheduler.clone();
    tokio::spawn(async move { runner.run().await });

    // Voice pipeline.
    let classifier = Classifier::new();
    let mut stabilizer = UtteranceStabilizer::new();
    let assistant = Assistant::new();

    println!("Speak (type) a command, or \"quit\" to exit.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        // Each line is one short recognition session.
        stabilizer.observe(&RecognitionEvent::Started);
        let utterance = match stabilizer.observe(&RecognitionEvent::Final { text: line }) {
            Some(utterance) => utterance,
            None => continue,
        };

        let command = classifier.classify(&utterance.text);
        let chat_fallback = match &command {
            Command::Unrecognized { raw } => Some(raw.clone()),
            _ => None,
        };

        if let Some(outcome) = dispatcher.dispatch(command) {
            if !outcome.announced {
                // The dispatcher left it unspoken for the assistant.
                if let (true, Some(message)) = (config.assistant.enabled, chat_fallback) {
                    println!("[assist] {}", assistant.reply(&message));
                } else {
                    println!("{}", outcome.response);
                }
            }
        }
    }

    scheduler.shutdown();
    tracing::info!("Hearth stopped");
    Ok(())
}
