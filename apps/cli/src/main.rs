//! `imeswitch` - drive the IME switch coordinator over stdin/stdout.
//!
//! Editors (or scripts) write JSON-lines commands to stdin; coordinator
//! events come back as JSON lines on stdout. Logs go to stderr.
//!
//! Usage:
//!   imeswitch --config ~/.config/imeswitch/config.json
//!   echo '{"cmd":"cursor","line":"你好","column":1,"kind":"rust"}' | imeswitch

mod commands;
mod host;

use anyhow::Context;
use clap::Parser;
use host::{event_line, write_line, Host, SharedMode};
use imeswitch_coordinator::{Coordinator, SwitcherConfig};
use imeswitch_events::CallbackEventBus;
use imeswitch_switcher::HelperSwitcher;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "imeswitch")]
#[command(about = "Switch the input method between Chinese and English from cursor context")]
struct Args {
    /// Configuration file (JSON). Missing file means defaults.
    #[arg(short, long, env = "IMESWITCH_CONFIG")]
    config: Option<PathBuf>,

    /// Directory containing `bin/ime-switcher.exe`. Defaults to the
    /// directory of this executable.
    #[arg(long)]
    helper_dir: Option<PathBuf>,
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("imeswitch").join("config.json"))
}

fn default_helper_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(PathBuf::from))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .or_else(default_config_path)
        .context("no config directory on this platform; pass --config")?;
    let config = SwitcherConfig::load_or_default(&config_path)?;

    let default_filter = if config.log_enabled {
        "info,imeswitch=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(config = %config_path.display(), "starting imeswitch");

    let helper_dir = args.helper_dir.or_else(default_helper_dir);
    let switcher = Arc::new(HelperSwitcher::new(helper_dir, config.executable.clone()));
    let mode = Arc::new(SharedMode::default());
    let event_bus = Arc::new(CallbackEventBus::new(|topic: &str, payload| {
        write_line(&event_line(topic, &payload));
    }));

    let (handle, task) = Coordinator::new(config, switcher.clone())
        .with_event_bus(event_bus)
        .with_mode_provider(mode.clone())
        .spawn();

    let host = Host::new(handle.clone(), switcher, mode, config_path);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("failed to read stdin")? {
                Some(line) => host.handle_line(&line).await?,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    handle.shutdown();
    task.await.context("coordinator worker panicked")?;
    tracing::info!("imeswitch stopped");
    Ok(())
}
