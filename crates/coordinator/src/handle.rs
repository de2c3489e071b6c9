//! Coordinator construction and the host-facing handle.

use crate::config::SwitcherConfig;
use crate::error::{CoordinatorError, Result};
use crate::state::CoordinatorStatus;
use crate::worker::{Command, Worker};
use imeswitch_context::{CursorProvider, CursorSnapshot, ModeProvider, NoModeProvider, TargetLang};
use imeswitch_events::{EventBusRef, NullEventBus};
use imeswitch_switcher::ImeSwitcherRef;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Builder for the coordinator worker.
///
/// Collaborators are injected here once; nothing is looked up globally.
pub struct Coordinator {
    config: SwitcherConfig,
    switcher: ImeSwitcherRef,
    event_bus: EventBusRef,
    mode_provider: Arc<dyn ModeProvider>,
}

impl Coordinator {
    /// New coordinator with no observers and no modal-editing integration.
    pub fn new(config: SwitcherConfig, switcher: ImeSwitcherRef) -> Self {
        Self {
            config,
            switcher,
            event_bus: Arc::new(NullEventBus),
            mode_provider: Arc::new(NoModeProvider),
        }
    }

    pub fn with_event_bus(mut self, event_bus: EventBusRef) -> Self {
        self.event_bus = event_bus;
        self
    }

    pub fn with_mode_provider(mut self, mode_provider: Arc<dyn ModeProvider>) -> Self {
        self.mode_provider = mode_provider;
        self
    }

    /// Spawn the worker on the current tokio runtime.
    ///
    /// The returned `JoinHandle` completes after [`CoordinatorHandle::shutdown`]
    /// or once every handle has been dropped.
    pub fn spawn(self) -> (CoordinatorHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();

        let worker = Worker::new(
            self.config,
            self.switcher,
            self.event_bus,
            self.mode_provider,
        );
        let task = tokio::spawn(worker.run(rx, shutdown.clone()));

        (CoordinatorHandle { tx, shutdown }, task)
    }
}

/// Cloneable, non-blocking entry point used by host adapters.
///
/// Every method enqueues a command for the worker and returns immediately,
/// so it is safe to call from a UI thread.
#[derive(Clone)]
pub struct CoordinatorHandle {
    tx: mpsc::UnboundedSender<Command>,
    shutdown: CancellationToken,
}

impl CoordinatorHandle {
    /// Report a cursor movement. `provider` is read when the debounce
    /// deadline fires.
    pub fn cursor_moved(
        &self,
        document_kind: impl Into<String>,
        provider: Arc<dyn CursorProvider>,
    ) -> Result<()> {
        self.send(Command::CursorMoved {
            document_kind: document_kind.into(),
            provider,
        })
    }

    /// Report a cursor movement with a fixed line/column.
    pub fn cursor_moved_at(
        &self,
        line_text: impl Into<String>,
        column: usize,
        document_kind: impl Into<String>,
    ) -> Result<()> {
        self.cursor_moved(
            document_kind,
            Arc::new(CursorSnapshot::new(line_text, column)),
        )
    }

    /// Switch immediately and pause automatic switching.
    pub fn manual_switch(&self, lang: TargetLang) -> Result<()> {
        self.send(Command::ManualSwitch(lang))
    }

    /// Flip the enabled flag. Disabling cancels a pending detection.
    pub fn toggle_enabled(&self) -> Result<()> {
        self.send(Command::ToggleEnabled)
    }

    pub fn update_config(&self, config: SwitcherConfig) -> Result<()> {
        self.send(Command::UpdateConfig(config))
    }

    pub async fn status(&self) -> Result<CoordinatorStatus> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Status(reply))?;
        rx.await.map_err(|_| CoordinatorError::WorkerStopped)
    }

    /// Stop the worker. Pending timers are dropped.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.tx.is_closed() && !self.shutdown.is_cancelled()
    }

    fn send(&self, cmd: Command) -> Result<()> {
        self.tx.send(cmd).map_err(|_| CoordinatorError::WorkerStopped)
    }
}

impl std::fmt::Debug for CoordinatorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorHandle")
            .field("running", &self.is_running())
            .finish()
    }
}
