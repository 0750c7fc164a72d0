//! # Invitra Live
//!
//! Live-preview synchronization and generation channels on top of
//! [`invitra_render`]. Editing stays responsive because nothing renders on the
//! input path: snapshots flow through a watch channel into a debounced driver
//! task, and generation progress fans out through per-id broadcast channels.
//!
//! ## Features
//! - Debounce gate with versioned snapshots: a burst of edits becomes exactly
//!   one render, and stale results are discarded
//! - Preview synchronizer task publishing versioned documents to a surface
//! - Progress channels keyed by generation id with monotone delivery, a hard
//!   streaming ceiling and lenient wire decoding
//! - In-process generation backend that walks the recovered step table and
//!   assembles the site record
//! - Sandboxed iframe embedding and a resize re-entrancy latch
//!
//! ## Example
//! ```ignore
//! use invitra_live::{new_hub, ChannelSettings, GenerationChannel, LocalGenerationBackend,
//!     SiteGenerationRequest};
//! use invitra_render::{EventDescriptor, EventType, ThemeSelection};
//!
//! # async fn run() -> invitra_live::LiveResult<()> {
//! let hub = new_hub();
//! let backend = LocalGenerationBackend::new(hub.clone());
//! let channel = GenerationChannel::new(hub, backend, ChannelSettings::default(),
//!     Some("token".to_string()));
//!
//! let event = EventDescriptor::new(EventType::Birthday, "Анна 30");
//! let request = SiteGenerationRequest::from_event(&event, &ThemeSelection::default())?;
//! let handle = channel.start(request).await?;
//! let site = handle.finish().await?;
//! assert_eq!(site.slug, "анна-30");
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod error;
pub mod generation;
pub mod preview;
pub mod settings;
pub mod surface;

pub use channel::{
    close, new_hub, notify_status, register, subscribe, ChannelMessage, ChannelOutcome,
    ChannelState, GenerationBackend, GenerationChannel, GenerationHandle, GenerationStatus,
    ProgressGauge, ProgressHub, CHANNEL_CEILING,
};
pub use error::{LiveError, LiveResult};
pub use generation::{
    error_status, GeneratedSite, GenerationStep, LocalGenerationBackend, SiteGenerationRequest,
    GENERATION_STEPS,
};
pub use preview::{
    DebounceGate, PreviewInput, PreviewMode, PreviewState, PreviewSynchronizer,
};
pub use settings::{ChannelSettings, Settings, SyncSettings};
pub use surface::{PreviewDocument, ResizeGuard, SandboxEmbed};
