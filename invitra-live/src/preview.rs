//! Debounced preview synchronization.
//!
//! Form edits arrive as input snapshots on a watch channel. The gate coalesces
//! a burst of edits into a single render at the end of the debounce window;
//! the driver task renders off the editing path and publishes a versioned
//! document to the surface. Writing a snapshot never blocks the editor.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use invitra_render::{DesignCustomizationModel, EventDescriptor, ThemeSelection};

use crate::settings::SyncSettings;
use crate::surface::PreviewDocument;

/// Everything a render needs, captured at one instant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewInput {
    pub event: EventDescriptor,
    pub theme: ThemeSelection,
    pub design: DesignCustomizationModel,
}

impl PreviewInput {
    pub fn new(
        event: EventDescriptor,
        theme: ThemeSelection,
        design: DesignCustomizationModel,
    ) -> Self {
        PreviewInput {
            event,
            theme,
            design,
        }
    }
}

/// Which editing surface feeds the synchronizer. The step-by-step form gets
/// the shorter window; the edit-mode page gets the longer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewMode {
    #[default]
    Form,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewState {
    Idle,
    Scheduled,
    Rendering,
}

/// Pure debounce core. All time flows in through arguments, so the gate can be
/// driven by a real clock, a paused test clock, or unit tests with synthetic
/// instants.
///
/// Every input mutation bumps `input_version`; a fired render carries the
/// version it was scheduled with, and a completed render only moves
/// `rendered_version` forward. Last write wins.
#[derive(Debug)]
pub struct DebounceGate {
    state: PreviewState,
    window: Duration,
    deadline: Option<Instant>,
    input_version: u64,
    rendered_version: u64,
}

impl DebounceGate {
    pub fn new(window: Duration) -> Self {
        DebounceGate {
            state: PreviewState::Idle,
            window,
            deadline: None,
            input_version: 0,
            rendered_version: 0,
        }
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn input_version(&self) -> u64 {
        self.input_version
    }

    pub fn rendered_version(&self) -> u64 {
        self.rendered_version
    }

    /// Records an input mutation and re-arms the window. A change that lands
    /// while a render is in flight keeps the gate in `Rendering`; `complete`
    /// re-schedules from the armed deadline.
    pub fn note_change(&mut self, now: Instant) {
        self.input_version += 1;
        self.deadline = Some(now + self.window);
        if self.state == PreviewState::Idle {
            self.state = PreviewState::Scheduled;
        }
    }

    /// Collapses the remaining window so the next `fire` succeeds immediately.
    /// From `Idle` this schedules a render of the current snapshot, which is
    /// what a tab switch wants: fresh content even if nothing changed.
    pub fn flush(&mut self, now: Instant) {
        match self.state {
            PreviewState::Idle => {
                self.state = PreviewState::Scheduled;
                self.deadline = Some(now);
            }
            PreviewState::Scheduled => self.deadline = Some(now),
            PreviewState::Rendering => {}
        }
    }

    /// Attempts to start a render. Returns the input version to render when
    /// the armed deadline has been reached.
    pub fn fire(&mut self, now: Instant) -> Option<u64> {
        if self.state != PreviewState::Scheduled {
            return None;
        }
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.state = PreviewState::Rendering;
        self.deadline = None;
        Some(self.input_version)
    }

    /// Finishes the in-flight render. Moves `rendered_version` forward only if
    /// this render was newer, and re-schedules if input arrived mid-render.
    pub fn complete(&mut self, version: u64) {
        if self.state != PreviewState::Rendering {
            return;
        }
        if version > self.rendered_version {
            self.rendered_version = version;
        }
        if self.input_version > self.rendered_version && self.deadline.is_some() {
            self.state = PreviewState::Scheduled;
        } else {
            self.state = PreviewState::Idle;
            self.deadline = None;
        }
    }

    /// True when newer input exists than the given render version.
    pub fn is_stale(&self, version: u64) -> bool {
        version < self.input_version
    }
}

enum SyncCommand {
    Flush,
}

/// Owns the driver task that turns debounced snapshots into published
/// documents. Dropping the synchronizer shuts the driver down.
pub struct PreviewSynchronizer {
    cmd_tx: mpsc::UnboundedSender<SyncCommand>,
    task: JoinHandle<()>,
}

impl PreviewSynchronizer {
    /// Spawns the driver task. The renderer runs on the driver, never on the
    /// editing path; the surface receives one `PreviewDocument` per fired
    /// render, tagged with the input version it reflects.
    pub fn spawn<R>(
        settings: &SyncSettings,
        mode: PreviewMode,
        snapshot_rx: watch::Receiver<PreviewInput>,
        renderer: R,
        surface: watch::Sender<PreviewDocument>,
    ) -> Self
    where
        R: Fn(&PreviewInput) -> String + Send + 'static,
    {
        let window = match mode {
            PreviewMode::Form => settings.form_window(),
            PreviewMode::Editing => settings.edit_window(),
        };
        let gate = DebounceGate::new(window);
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(drive(gate, snapshot_rx, cmd_rx, renderer, surface));
        PreviewSynchronizer { cmd_tx, task }
    }

    /// Bypasses the debounce window, e.g. when the preview step becomes
    /// visible and must not show stale content.
    pub fn flush_immediately(&self) {
        let _ = self.cmd_tx.send(SyncCommand::Flush);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stops the driver and waits for it to exit.
    pub async fn shutdown(self) {
        drop(self.cmd_tx);
        let _ = self.task.await;
    }
}

/// Wake-up horizon while no deadline is armed.
const IDLE_WAKE: Duration = Duration::from_secs(3600);

async fn drive<R>(
    mut gate: DebounceGate,
    mut snapshot_rx: watch::Receiver<PreviewInput>,
    mut cmd_rx: mpsc::UnboundedReceiver<SyncCommand>,
    renderer: R,
    surface: watch::Sender<PreviewDocument>,
) where
    R: Fn(&PreviewInput) -> String + Send,
{
    loop {
        let deadline = gate.deadline();
        let wake = deadline.unwrap_or_else(|| Instant::now() + IDLE_WAKE);
        tokio::select! {
            changed = snapshot_rx.changed() => {
                if changed.is_err() {
                    // Input side dropped; nothing further to render.
                    break;
                }
                gate.note_change(Instant::now());
            }
            cmd = cmd_rx.recv() => match cmd {
                Some(SyncCommand::Flush) => gate.flush(Instant::now()),
                None => break,
            },
            _ = tokio::time::sleep_until(wake), if deadline.is_some() => {
                if let Some(version) = gate.fire(Instant::now()) {
                    let snapshot = snapshot_rx.borrow_and_update().clone();
                    let html = renderer(&snapshot);
                    if !gate.is_stale(version) {
                        let _ = surface.send(PreviewDocument { html, version });
                    }
                    gate.complete(version);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gate_400() -> (DebounceGate, Instant) {
        (DebounceGate::new(Duration::from_millis(400)), Instant::now())
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_burst_coalesces_into_one_fire_with_last_version() {
        let (mut gate, t0) = gate_400();
        for i in 0..5 {
            gate.note_change(t0 + ms(i * 50));
        }
        assert_eq!(gate.state(), PreviewState::Scheduled);
        assert_eq!(gate.input_version(), 5);

        // Window re-armed from the last keystroke at t0+200ms.
        assert_eq!(gate.fire(t0 + ms(599)), None);
        assert_eq!(gate.fire(t0 + ms(600)), Some(5));
        assert_eq!(gate.state(), PreviewState::Rendering);

        gate.complete(5);
        assert_eq!(gate.state(), PreviewState::Idle);
        assert_eq!(gate.rendered_version(), 5);
    }

    #[test]
    fn test_fire_without_schedule_is_none() {
        let (mut gate, t0) = gate_400();
        assert_eq!(gate.fire(t0), None);
        assert_eq!(gate.state(), PreviewState::Idle);
    }

    #[test]
    fn test_flush_collapses_the_window() {
        let (mut gate, t0) = gate_400();
        gate.note_change(t0);
        assert_eq!(gate.fire(t0 + ms(10)), None);
        gate.flush(t0 + ms(10));
        assert_eq!(gate.fire(t0 + ms(10)), Some(1));
    }

    #[test]
    fn test_flush_from_idle_schedules_a_refresh_of_the_current_version() {
        let (mut gate, t0) = gate_400();
        gate.flush(t0);
        assert_eq!(gate.fire(t0), Some(0));
        gate.complete(0);
        assert_eq!(gate.state(), PreviewState::Idle);
        assert_eq!(gate.rendered_version(), 0);
    }

    #[test]
    fn test_change_during_render_reschedules_on_complete() {
        let (mut gate, t0) = gate_400();
        gate.note_change(t0);
        let version = gate.fire(t0 + ms(400)).unwrap();
        assert_eq!(version, 1);

        // A keystroke lands while the render is in flight.
        gate.note_change(t0 + ms(450));
        assert_eq!(gate.state(), PreviewState::Rendering);
        assert!(gate.is_stale(version));

        gate.complete(version);
        assert_eq!(gate.state(), PreviewState::Scheduled);
        assert_eq!(gate.fire(t0 + ms(850)), Some(2));
        gate.complete(2);
        assert_eq!(gate.state(), PreviewState::Idle);
        assert_eq!(gate.rendered_version(), 2);
    }

    #[test]
    fn test_complete_never_moves_rendered_version_backwards() {
        let (mut gate, t0) = gate_400();
        gate.note_change(t0);
        gate.note_change(t0 + ms(10));
        let version = gate.fire(t0 + ms(410)).unwrap();
        assert_eq!(version, 2);
        gate.complete(2);
        assert_eq!(gate.rendered_version(), 2);

        // A late completion for an older render is a no-op.
        gate.flush(t0 + ms(500));
        assert_eq!(gate.fire(t0 + ms(500)), Some(2));
        gate.complete(1);
        assert_eq!(gate.rendered_version(), 2);
    }

    #[test]
    fn test_is_stale_tracks_input_version() {
        let (mut gate, t0) = gate_400();
        gate.note_change(t0);
        assert!(!gate.is_stale(1));
        gate.note_change(t0 + ms(5));
        assert!(gate.is_stale(1));
        assert!(!gate.is_stale(2));
    }
}
