//! Boundary between rendered documents and the host surface that shows them.
//!
//! The renderer produces a full HTML document; the host displays it inside a
//! sandboxed iframe and auto-sizes it with a resize observer. This module owns
//! the embed markup and the latch that keeps the observer from looping.

use std::sync::atomic::{AtomicBool, Ordering};

use invitra_render::html::escape_html;

pub const DEFAULT_MIN_HEIGHT_PX: u32 = 600;

/// Sandbox flags for the preview iframe. Scripts stay enabled so the document
/// can run the Tailwind runtime, but top-level navigation stays blocked.
pub const SANDBOX_FLAGS: &str = "allow-scripts allow-same-origin allow-popups allow-forms";

/// A rendered document paired with the input version it was produced from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreviewDocument {
    pub html: String,
    pub version: u64,
}

/// Wraps a document into a srcdoc iframe for the host page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxEmbed {
    pub min_height_px: u32,
}

impl Default for SandboxEmbed {
    fn default() -> Self {
        SandboxEmbed {
            min_height_px: DEFAULT_MIN_HEIGHT_PX,
        }
    }
}

impl SandboxEmbed {
    pub fn new(min_height_px: u32) -> Self {
        SandboxEmbed { min_height_px }
    }

    /// The iframe element carrying the document. An empty document becomes an
    /// empty div so the frame never renders `about:blank` chrome.
    pub fn embed(&self, html: &str) -> String {
        let body = if html.trim().is_empty() {
            "<div></div>"
        } else {
            html
        };
        format!(
            "<iframe srcdoc=\"{}\" title=\"Live Preview\" sandbox=\"{}\" style=\"width: 100%; min-height: {}px; border: 0;\"></iframe>",
            escape_html(body),
            SANDBOX_FLAGS,
            self.min_height_px
        )
    }
}

/// Re-entrancy latch for the host's resize observer. Measuring the iframe can
/// itself trigger a resize notification; the latch drops those echoes so the
/// observer never loops.
#[derive(Debug, Default)]
pub struct ResizeGuard {
    measuring: AtomicBool,
}

impl ResizeGuard {
    pub fn new() -> Self {
        ResizeGuard::default()
    }

    /// Starts a measurement pass. Returns false if one is already running, in
    /// which case the caller must skip its pass (and not call [`end`]).
    ///
    /// [`end`]: ResizeGuard::end
    pub fn begin(&self) -> bool {
        !self.measuring.swap(true, Ordering::SeqCst)
    }

    /// Ends the measurement pass started by a successful [`begin`].
    ///
    /// [`begin`]: ResizeGuard::begin
    pub fn end(&self) {
        self.measuring.store(false, Ordering::SeqCst);
    }
}
