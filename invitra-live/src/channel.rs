//! Real-time generation progress via tokio broadcast channels.
//! One broadcast channel per generation id; extra subscribers get capacity 64.
//!
//! A channel streams [`GenerationStatus`] updates while the backend works,
//! bounded by a hard ceiling, and the submission itself resolves the handle.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::error::{LiveError, LiveResult};
use crate::generation::{GeneratedSite, SiteGenerationRequest};
use crate::settings::ChannelSettings;

/// Hard ceiling on a progress channel. After this the channel closes and no
/// further status callbacks fire, whatever the transport is doing.
pub const CHANNEL_CEILING: Duration = Duration::from_secs(60);

/// One progress update on the wire. `estimated_time` is seconds remaining.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStatus {
    pub step: String,
    pub progress: u8,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<u32>,
}

/// Envelope for messages crossing the channel transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChannelMessage {
    StatusUpdate { data: GenerationStatus },
}

impl ChannelMessage {
    pub fn status(data: GenerationStatus) -> Self {
        ChannelMessage::StatusUpdate { data }
    }

    /// Lenient decode: unknown message types and malformed payloads yield
    /// `None`, never an error. The stream keeps going.
    pub fn decode(raw: &str) -> Option<GenerationStatus> {
        match serde_json::from_str::<ChannelMessage>(raw) {
            Ok(ChannelMessage::StatusUpdate { data }) => Some(data),
            Err(_) => None,
        }
    }

    pub fn encode(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOutcome {
    Success,
    Error,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Closed,
    Opening,
    Streaming,
    Done(ChannelOutcome),
}

/// Keeps delivered progress monotonically non-decreasing. Values clamp to
/// 0-100; a late regression from the transport is dropped.
#[derive(Debug, Clone, Default)]
pub struct ProgressGauge {
    last: u8,
}

impl ProgressGauge {
    pub fn apply(&mut self, mut status: GenerationStatus) -> Option<GenerationStatus> {
        if status.progress > 100 {
            status.progress = 100;
        }
        if status.progress < self.last {
            return None;
        }
        self.last = status.progress;
        Some(status)
    }

    pub fn last(&self) -> u8 {
        self.last
    }
}

/// Broadcast channel map: generation_id -> Sender<GenerationStatus>.
pub type ProgressHub = Arc<DashMap<Uuid, broadcast::Sender<GenerationStatus>>>;

/// Create a new empty ProgressHub.
pub fn new_hub() -> ProgressHub {
    Arc::new(DashMap::new())
}

/// Register a live channel for a generation id.
/// Rejected when the id already has one, so a generation maps to exactly one
/// channel.
pub fn register(
    hub: &ProgressHub,
    generation_id: Uuid,
    capacity: usize,
) -> LiveResult<broadcast::Receiver<GenerationStatus>> {
    match hub.entry(generation_id) {
        dashmap::mapref::entry::Entry::Occupied(_) => {
            Err(LiveError::ChannelBusy { generation_id })
        }
        dashmap::mapref::entry::Entry::Vacant(slot) => {
            let (tx, rx) = broadcast::channel(capacity);
            slot.insert(tx);
            Ok(rx)
        }
    }
}

/// Notify subscribers of a generation about a status update.
/// No-op if the id is unknown, so a stale callback lands nowhere.
pub fn notify_status(hub: &ProgressHub, generation_id: Uuid, status: GenerationStatus) {
    if let Some(tx) = hub.get(&generation_id) {
        let _ = tx.send(status);
    }
}

/// Subscribe to status updates for the given generation id.
/// Creates the broadcast channel if it doesn't exist yet.
pub fn subscribe(hub: &ProgressHub, generation_id: Uuid) -> broadcast::Receiver<GenerationStatus> {
    if let Some(tx) = hub.get(&generation_id) {
        return tx.subscribe();
    }
    // Not found; create and insert, then subscribe.
    let (tx, rx) = broadcast::channel(64);
    hub.insert(generation_id, tx);
    rx
}

/// Close a generation channel and drop its sender. Subscribers see their
/// stream end.
pub fn close(hub: &ProgressHub, generation_id: Uuid) {
    hub.remove(&generation_id);
}

/// The capability that actually produces a site. Implementations report
/// progress by calling [`notify_status`] with the generation id they were
/// given.
pub trait GenerationBackend: Send + Sync + 'static {
    fn submit(
        &self,
        request: &SiteGenerationRequest,
        generation_id: Uuid,
    ) -> impl Future<Output = LiveResult<GeneratedSite>> + Send;
}

/// Opens progress channels and drives one generation end to end.
pub struct GenerationChannel<B> {
    hub: ProgressHub,
    backend: Arc<B>,
    settings: ChannelSettings,
    auth_token: Option<String>,
}

impl<B: GenerationBackend> GenerationChannel<B> {
    pub fn new(
        hub: ProgressHub,
        backend: B,
        settings: ChannelSettings,
        auth_token: Option<String>,
    ) -> Self {
        GenerationChannel {
            hub,
            backend: Arc::new(backend),
            settings,
            auth_token,
        }
    }

    pub fn hub(&self) -> ProgressHub {
        self.hub.clone()
    }

    /// Watch an already-live generation without starting a new one.
    pub fn watch(
        &self,
        generation_id: Uuid,
    ) -> LiveResult<broadcast::Receiver<GenerationStatus>> {
        match self.hub.get(&generation_id) {
            Some(tx) => Ok(tx.subscribe()),
            None => Err(LiveError::ChannelClosed { generation_id }),
        }
    }

    /// Opens a channel and submits the request.
    ///
    /// Fails fast with [`LiveError::MissingCredential`] when no auth token is
    /// configured, before anything is registered. The returned handle streams
    /// gauged progress and resolves to the generated site.
    pub async fn start(&self, request: SiteGenerationRequest) -> LiveResult<GenerationHandle> {
        if self.auth_token.is_none() {
            return Err(LiveError::MissingCredential);
        }

        let generation_id = Uuid::new_v4();
        let receiver = register(&self.hub, generation_id, self.settings.buffer)?;
        let ceiling = self.settings.ceiling();

        let (state_tx, _state_rx) = watch::channel(ChannelState::Opening);
        let state = Arc::new(state_tx);

        let (tx, rx) = mpsc::channel(self.settings.buffer.max(1));
        let bridge_state = state.clone();
        tokio::spawn(stream_progress(
            receiver,
            tx,
            bridge_state,
            ceiling,
            generation_id,
        ));

        let backend = self.backend.clone();
        let hub = self.hub.clone();
        let submission = tokio::spawn(async move {
            let result = backend.submit(&request, generation_id).await;
            // Teardown always removes the hub entry, success or not.
            close(&hub, generation_id);
            result
        });

        Ok(GenerationHandle {
            generation_id,
            progress: ReceiverStream::new(rx),
            state,
            submission,
            ceiling,
        })
    }
}

/// Forwards hub updates to the handle's progress stream until the channel
/// closes or the ceiling is reached. Transport faults are logged and
/// swallowed; they never abort the generation.
async fn stream_progress(
    mut receiver: broadcast::Receiver<GenerationStatus>,
    tx: mpsc::Sender<GenerationStatus>,
    state: Arc<watch::Sender<ChannelState>>,
    ceiling: Duration,
    generation_id: Uuid,
) {
    mark(&state, ChannelState::Streaming);
    let mut gauge = ProgressGauge::default();
    let deadline = tokio::time::sleep(ceiling);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => {
                tracing::warn!(%generation_id, "progress channel hit its ceiling; closing");
                mark(&state, ChannelState::Done(ChannelOutcome::TimedOut));
                break;
            }
            received = receiver.recv() => match received {
                Ok(status) => {
                    if let Some(status) = gauge.apply(status) {
                        if tx.send(status).await.is_err() {
                            // Caller dropped the stream; stop forwarding.
                            break;
                        }
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // Skipped messages; continue receiving.
                    tracing::warn!(%generation_id, skipped, "progress subscriber lagged");
                    continue;
                }
            }
        }
    }
}

/// State updates never clobber a finished outcome.
fn mark(state: &watch::Sender<ChannelState>, next: ChannelState) {
    state.send_if_modified(|current| {
        if matches!(current, ChannelState::Done(_)) {
            return false;
        }
        *current = next;
        true
    });
}

/// A live generation: the gauged progress stream plus the pending submission.
#[derive(Debug)]
pub struct GenerationHandle {
    generation_id: Uuid,
    /// Monotone progress updates. Ends when the channel closes.
    pub progress: ReceiverStream<GenerationStatus>,
    state: Arc<watch::Sender<ChannelState>>,
    submission: JoinHandle<LiveResult<GeneratedSite>>,
    ceiling: Duration,
}

impl GenerationHandle {
    pub fn id(&self) -> Uuid {
        self.generation_id
    }

    pub fn state(&self) -> ChannelState {
        *self.state.borrow()
    }

    /// Resolves the generation. The submission's own response decides the
    /// outcome; waiting is bounded by the channel ceiling.
    pub async fn finish(mut self) -> LiveResult<GeneratedSite> {
        match tokio::time::timeout(self.ceiling, &mut self.submission).await {
            Ok(Ok(Ok(site))) => {
                self.state
                    .send_replace(ChannelState::Done(ChannelOutcome::Success));
                Ok(site)
            }
            Ok(Ok(Err(err))) => {
                self.state
                    .send_replace(ChannelState::Done(ChannelOutcome::Error));
                Err(err)
            }
            Ok(Err(join_err)) => {
                self.state
                    .send_replace(ChannelState::Done(ChannelOutcome::Error));
                Err(LiveError::Join(join_err.to_string()))
            }
            Err(_elapsed) => {
                self.submission.abort();
                self.state
                    .send_replace(ChannelState::Done(ChannelOutcome::TimedOut));
                Err(LiveError::Timeout {
                    seconds: self.ceiling.as_secs(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn status(step: &str, progress: u8) -> GenerationStatus {
        GenerationStatus {
            step: step.to_string(),
            progress,
            message: format!("{step} at {progress}"),
            estimated_time: None,
        }
    }

    #[test]
    fn test_wire_shape_is_type_tagged_status_update() {
        let msg = ChannelMessage::status(GenerationStatus {
            step: "analyzing".to_string(),
            progress: 10,
            message: "Анализируем ваше событие…".to_string(),
            estimated_time: Some(15),
        });
        let raw = msg.encode();
        assert!(raw.starts_with("{\"type\":\"status_update\",\"data\":{"));
        assert!(raw.contains("\"estimated_time\":15"));

        let decoded = ChannelMessage::decode(&raw).unwrap();
        assert_eq!(decoded.step, "analyzing");
        assert_eq!(decoded.progress, 10);
    }

    #[test]
    fn test_decode_ignores_unknown_types_and_garbage() {
        assert_eq!(
            ChannelMessage::decode("{\"type\":\"ping\",\"data\":{}}"),
            None
        );
        assert_eq!(ChannelMessage::decode("not json at all"), None);
        assert_eq!(
            ChannelMessage::decode("{\"type\":\"status_update\",\"data\":{\"step\":1}}"),
            None
        );
    }

    #[test]
    fn test_decode_tolerates_missing_estimated_time() {
        let decoded = ChannelMessage::decode(
            "{\"type\":\"status_update\",\"data\":{\"step\":\"completed\",\"progress\":100,\"message\":\"Сайт готов!\"}}",
        )
        .unwrap();
        assert_eq!(decoded.estimated_time, None);
        assert_eq!(decoded.progress, 100);
    }

    #[test]
    fn test_gauge_drops_regressions_and_clamps() {
        let mut gauge = ProgressGauge::default();
        assert_eq!(gauge.apply(status("a", 20)).map(|s| s.progress), Some(20));
        assert_eq!(gauge.apply(status("b", 55)).map(|s| s.progress), Some(55));
        // A late echo of an earlier step is dropped.
        assert_eq!(gauge.apply(status("a", 20)), None);
        assert_eq!(gauge.apply(status("c", 150)).map(|s| s.progress), Some(100));
        assert_eq!(gauge.last(), 100);
    }

    #[test]
    fn test_gauge_allows_repeats_of_the_same_progress() {
        let mut gauge = ProgressGauge::default();
        assert!(gauge.apply(status("a", 40)).is_some());
        assert!(gauge.apply(status("a", 40)).is_some());
    }

    #[test]
    fn test_register_rejects_a_second_channel_for_the_same_id() {
        let hub = new_hub();
        let id = Uuid::new_v4();
        let _rx = register(&hub, id, 8).unwrap();
        let err = register(&hub, id, 8).unwrap_err();
        assert_eq!(err, LiveError::ChannelBusy { generation_id: id });

        close(&hub, id);
        assert!(register(&hub, id, 8).is_ok());
    }

    #[test]
    fn test_notify_on_unknown_id_is_a_no_op() {
        let hub = new_hub();
        // Nothing registered; must not panic or create an entry.
        notify_status(&hub, Uuid::new_v4(), status("a", 10));
        assert!(hub.is_empty());

        let id = Uuid::new_v4();
        let mut rx = register(&hub, id, 8).unwrap();
        notify_status(&hub, id, status("a", 10));
        assert_eq!(rx.try_recv().ok().map(|s| s.progress), Some(10));
    }

    #[test]
    fn test_subscribe_creates_the_channel_on_first_use() {
        let hub = new_hub();
        let id = Uuid::new_v4();
        let mut rx = subscribe(&hub, id);
        notify_status(&hub, id, status("a", 25));
        assert_eq!(rx.try_recv().ok().map(|s| s.step), Some("a".to_string()));
    }
}
