//! Adapter between the stdin protocol and the coordinator.

use crate::commands::HostCommand;
use imeswitch_context::{CursorSnapshot, EditorMode, ModeProvider};
use imeswitch_coordinator::{CoordinatorHandle, SwitcherConfig};
use imeswitch_events::{event_names, StateChangedEvent};
use imeswitch_switcher::{HelperSwitcher, ImeSwitcher};
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Editor mode as last reported on stdin.
#[derive(Default)]
pub struct SharedMode(Mutex<EditorMode>);

impl SharedMode {
    pub fn set(&self, mode: EditorMode) {
        *self.0.lock().unwrap_or_else(|e| e.into_inner()) = mode;
    }
}

impl ModeProvider for SharedMode {
    fn mode(&self) -> EditorMode {
        *self.0.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Build the stdout line for an emitted event.
///
/// State changes carry the status-bar label so simple hosts can display it
/// without decoding the payload.
pub fn event_line(topic: &str, payload: &Value) -> Value {
    let mut line = json!({ "event": topic, "payload": payload });
    if topic == event_names::STATE_CHANGED {
        if let Ok(state) = serde_json::from_value::<StateChangedEvent>(payload.clone()) {
            line["label"] = Value::from(state.status_label());
        }
    }
    line
}

/// Write one JSON line to stdout.
pub fn write_line(value: &Value) {
    let mut out = std::io::stdout().lock();
    if let Err(e) = writeln!(out, "{value}").and_then(|_| out.flush()) {
        tracing::debug!(error = %e, "stdout write failed");
    }
}

pub struct Host {
    handle: CoordinatorHandle,
    switcher: Arc<HelperSwitcher>,
    mode: Arc<SharedMode>,
    config_path: PathBuf,
}

impl Host {
    pub fn new(
        handle: CoordinatorHandle,
        switcher: Arc<HelperSwitcher>,
        mode: Arc<SharedMode>,
        config_path: PathBuf,
    ) -> Self {
        Self {
            handle,
            switcher,
            mode,
            config_path,
        }
    }

    /// Handle one stdin line. Malformed input is reported and skipped.
    pub async fn handle_line(&self, line: &str) -> anyhow::Result<()> {
        let cmd = match HostCommand::parse(line) {
            None => return Ok(()),
            Some(Ok(cmd)) => cmd,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "ignoring malformed command");
                write_line(&json!({ "error": e.to_string() }));
                return Ok(());
            }
        };
        self.handle(cmd).await
    }

    async fn handle(&self, cmd: HostCommand) -> anyhow::Result<()> {
        match cmd {
            HostCommand::Cursor {
                line,
                column,
                kind,
                selection,
            } => {
                // Each event carries its own line, so a later event that the
                // gate rejects cannot change what a pending detection reads.
                let snapshot = (!selection).then(|| CursorSnapshot::new(line, column));
                self.handle.cursor_moved(kind, Arc::new(snapshot))?;
            }
            HostCommand::Mode { insert_like } => {
                self.mode.set(match insert_like {
                    Some(insert_like) => EditorMode::Known { insert_like },
                    None => EditorMode::Unavailable,
                });
            }
            HostCommand::Switch { lang } => self.handle.manual_switch(lang)?,
            HostCommand::Toggle => self.handle.toggle_enabled()?,
            HostCommand::Status => {
                let status = self.handle.status().await?;
                write_line(&json!({ "status": status }));
            }
            HostCommand::Query => match self.switcher.query().await {
                Ok(lang) => write_line(&json!({ "query": lang })),
                Err(e) => {
                    tracing::warn!(error = %e, "helper query failed");
                    write_line(&json!({ "error": e.to_string() }));
                }
            },
            HostCommand::Reload => match SwitcherConfig::load_or_default(&self.config_path) {
                Ok(config) => {
                    tracing::info!(path = %self.config_path.display(), "configuration reloaded");
                    self.switcher.set_executable(config.executable.clone());
                    self.handle.update_config(config)?;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "configuration reload failed");
                    write_line(&json!({ "error": e.to_string() }));
                }
            },
        }
        Ok(())
    }
}
