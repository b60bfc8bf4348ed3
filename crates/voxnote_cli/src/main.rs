//! Text host for the VoxNote assistant.
//!
//! # Responsibility
//! - Feed typed (or transcribed) utterances to the core one at a time.
//! - Print each response and close the stores on exit.

use anyhow::Context;
use clap::Parser;
use log::info;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use voxnote_core::model::timestamp;
use voxnote_core::service::response;
use voxnote_core::{init_logging, AssistantConfig, FileAssistant, LogSettings};

const DUE_COMMAND: &str = ":due";
const QUIT_COMMANDS: &[&str] = &[":quit", ":q", ":exit"];

#[derive(Parser)]
#[command(name = "voxnote")]
#[command(about = "Voice-style notes and reminders from plain utterances")]
#[command(version)]
struct Cli {
    /// Directory holding the notes and reminders files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Wake word stripped from the start of utterances
    #[arg(long)]
    assistant_name: Option<String>,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rotating log files
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Handle this single utterance and exit instead of reading stdin
    utterance: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AssistantConfig::from_env()?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(name) = cli.assistant_name {
        config.assistant_name = name;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logging(&LogSettings {
        level: config.log_level.clone(),
        log_dir: cli.log_dir.unwrap_or_else(|| config.log_dir()),
        echo_warnings: false,
    })
    .context("failed to start logging")?;

    let mut assistant = FileAssistant::open_files(&config).with_context(|| {
        format!("failed to open stores in `{}`", config.data_dir.display())
    })?;

    info!(
        "event=cli_start module=cli status=ok mode={} version={}",
        if cli.utterance.is_some() { "one_shot" } else { "interactive" },
        voxnote_core::core_version()
    );

    match cli.utterance {
        Some(utterance) => println!("{}", assistant.handle(&utterance).response),
        None => run_interactive(&mut assistant, &config)?,
    }

    assistant.close().context("failed to flush stores on exit")?;
    Ok(())
}

fn run_interactive(assistant: &mut FileAssistant, config: &AssistantConfig) -> anyhow::Result<()> {
    println!(
        "Hi, I'm {}. Say something like 'create a note buy milk' or 'remind me to call mom in 2 hours'.",
        config.assistant_name
    );
    println!("Type {DUE_COMMAND} for due reminders, :quit to leave.");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if QUIT_COMMANDS.contains(&input) {
            break;
        }
        if input == DUE_COMMAND {
            let due = assistant.due_reminders(timestamp::now());
            println!("{}", response::render_due(&due));
            continue;
        }

        println!("{}", assistant.handle(input).response);
    }
    println!("Bye!");
    Ok(())
}
