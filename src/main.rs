use anyhow::Context;
use clap::Parser;
use keypad_calc::config::Config;
use keypad_calc::display::{Display, JsonDisplay, TerminalDisplay};
use keypad_calc::keypad::{Command, parse_line};
use keypad_calc::session::Session;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::thread;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keypad-calc")]
#[command(about = "A keypad calculator driven by key presses")]
struct Cli {
    /// Keys to press, then exit (e.g. "1+2*3 Enter"). Reads stdin when absent.
    #[arg(short, long)]
    keys: Option<String>,

    /// Print display frames as JSON objects
    #[arg(long)]
    json: bool,

    /// Config file path (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// How long the error indicator stays up, in milliseconds
    #[arg(long, value_name = "MS")]
    revert_delay_ms: Option<u64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref());
    if let Some(delay) = cli.revert_delay_ms {
        config.error_revert_delay_ms = delay;
    }

    let (tx, rx) = flume::unbounded();
    match cli.keys {
        Some(keys) => {
            send_line(&tx, &keys);
            drop(tx);
        }
        None => spawn_stdin_reader(tx).context("Failed to start input reader")?,
    }

    let stdout = io::stdout();
    if cli.json {
        run(&config, JsonDisplay::new(stdout.lock()), rx).await
    } else {
        run(&config, TerminalDisplay::new(stdout.lock()), rx).await
    }
}

async fn run<D: Display>(
    config: &Config,
    display: D,
    commands: flume::Receiver<Command>,
) -> anyhow::Result<()> {
    Session::new(config, display).run(commands).await?;
    Ok(())
}

/// Send the commands for one line of keys. Returns `false` once the session
/// has stopped listening.
fn send_line(tx: &flume::Sender<Command>, line: &str) -> bool {
    let (commands, unknown) = parse_line(line);
    if !unknown.is_empty() {
        tracing::warn!(?unknown, "ignoring unknown keys");
    }
    commands.into_iter().all(|command| tx.send(command).is_ok())
}

fn spawn_stdin_reader(tx: flume::Sender<Command>) -> io::Result<()> {
    thread::Builder::new()
        .name("stdin-keys".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if !send_line(&tx, &line) {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
        })?;
    Ok(())
}
