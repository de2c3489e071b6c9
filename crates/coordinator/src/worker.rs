//! The coordinator worker - single task that owns all switch state.
//!
//! Every inbound operation arrives as a [`Command`] on one channel, so state
//! is only ever touched from this task. Timers are deadlines stored in the
//! state and awaited by the main `select!` loop.

use crate::config::SwitcherConfig;
use crate::state::{CoordinatorState, CoordinatorStatus};
use imeswitch_context::{CursorProvider, ModeProvider, TargetLang};
use imeswitch_events::{
    emit_event, event_names, EventBusRef, HelperUnavailableEvent, StateChangedEvent,
};
use imeswitch_switcher::ImeSwitcherRef;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub(crate) enum Command {
    CursorMoved {
        document_kind: String,
        provider: Arc<dyn CursorProvider>,
    },
    ManualSwitch(TargetLang),
    ToggleEnabled,
    UpdateConfig(SwitcherConfig),
    Status(oneshot::Sender<CoordinatorStatus>),
}

pub(crate) struct Worker {
    state: CoordinatorState,
    switcher: ImeSwitcherRef,
    event_bus: EventBusRef,
    mode_provider: Arc<dyn ModeProvider>,
}

impl Worker {
    pub fn new(
        config: SwitcherConfig,
        switcher: ImeSwitcherRef,
        event_bus: EventBusRef,
        mode_provider: Arc<dyn ModeProvider>,
    ) -> Self {
        Self {
            state: CoordinatorState::new(config),
            switcher,
            event_bus,
            mode_provider,
        }
    }

    pub async fn run(
        mut self,
        mut rx: mpsc::UnboundedReceiver<Command>,
        shutdown: CancellationToken,
    ) {
        tracing::info!("coordinator worker started");

        if !self.switcher.is_available() {
            self.notify_helper_unavailable("switch helper not found".to_string());
        }

        loop {
            let debounce_at = self.state.pending.as_ref().map(|p| p.deadline);
            let pause_at = self.state.pause_deadline;

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                cmd = rx.recv() => match cmd {
                    Some(cmd) => self.handle(cmd).await,
                    None => break,
                },
                _ = sleep_until(pause_at) => {
                    self.state.pause_deadline = None;
                    tracing::debug!("manual pause expired");
                }
                _ = sleep_until(debounce_at) => self.fire_pending().await,
            }
        }

        self.state.cancel_pending();
        self.state.pause_deadline = None;
        tracing::info!("coordinator worker stopped");
    }

    async fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::CursorMoved {
                document_kind,
                provider,
            } => self.on_cursor_moved(document_kind, provider).await,
            Command::ManualSwitch(lang) => self.manual_switch(lang).await,
            Command::ToggleEnabled => {
                let enabled = self.state.toggle_enabled();
                tracing::info!(enabled, "automatic switching toggled");
                self.emit_state();
            }
            Command::UpdateConfig(config) => {
                self.state.replace_config(config);
                tracing::debug!(config = ?self.state.config, "configuration updated");
                self.emit_state();
            }
            Command::Status(reply) => {
                let _ = reply.send(self.state.status(Instant::now()));
            }
        }
    }

    async fn on_cursor_moved(
        &mut self,
        document_kind: String,
        provider: Arc<dyn CursorProvider>,
    ) {
        if !self.state.config.enabled {
            return;
        }
        let now = Instant::now();
        if self.state.is_paused(now) {
            tracing::trace!("cursor event dropped during manual pause");
            return;
        }
        if !self.state.config.is_allowed(&document_kind) {
            tracing::trace!(kind = %document_kind, "document kind not allowed");
            return;
        }

        // Modal editors outside insert mode only take English, as if the
        // user had switched by hand.
        if self.mode_provider.mode().forces_english() {
            self.state.cancel_pending();
            if self.state.last_switched != Some(TargetLang::En) {
                self.manual_switch(TargetLang::En).await;
            }
            return;
        }

        self.state.schedule(document_kind, provider, now);
    }

    async fn fire_pending(&mut self) {
        let Some(pending) = self.state.pending.take() else {
            return;
        };
        if !self.state.config.enabled || self.state.is_paused(Instant::now()) {
            return;
        }

        let Some(snapshot) = pending.provider.snapshot() else {
            tracing::debug!(kind = %pending.document_kind, "no cursor snapshot, skipping");
            return;
        };

        let verdict = snapshot.detect();
        tracing::debug!(
            verdict = %verdict,
            column = snapshot.column,
            kind = %pending.document_kind,
            "context detected"
        );

        if let Some(target) = verdict.target() {
            self.switch_to(target).await;
        }
    }

    async fn manual_switch(&mut self, lang: TargetLang) {
        let now = Instant::now();
        self.state.cancel_pending();
        self.state.pause(now);
        self.state.last_switched = None;
        tracing::debug!(lang = %lang, "manual switch");
        self.switch_to(lang).await;
    }

    /// Invoke the helper unless `lang` is already in force.
    async fn switch_to(&mut self, lang: TargetLang) {
        if self.state.last_switched == Some(lang) {
            return;
        }

        match self.switcher.switch(lang, self.state.config.toggle_key).await {
            Ok(()) => {
                self.state.last_switched = Some(lang);
                if self.state.config.log_enabled {
                    tracing::info!(lang = %lang, "IME switched");
                } else {
                    tracing::debug!(lang = %lang, "IME switched");
                }
                self.emit_state();
            }
            Err(e) => {
                tracing::warn!(lang = %lang, error = %e, "IME switch failed");
                if e.is_helper_missing() {
                    self.notify_helper_unavailable(e.to_string());
                }
            }
        }
    }

    fn emit_state(&self) {
        let event = StateChangedEvent {
            lang: self.state.last_switched,
            enabled: self.state.config.enabled,
        };
        emit_event(&*self.event_bus, event_names::STATE_CHANGED, &event);
    }

    fn notify_helper_unavailable(&mut self, message: String) {
        if self.state.helper_notice_sent {
            return;
        }
        self.state.helper_notice_sent = true;
        tracing::warn!(%message, "switch helper unavailable");
        emit_event(
            &*self.event_bus,
            event_names::HELPER_UNAVAILABLE,
            &HelperUnavailableEvent { message },
        );
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
