//! # Invitra Render
//!
//! Pure rendering core for invitation sites: structured event data plus a
//! theme selection and design overrides become a standalone HTML document.
//!
//! ## Features
//! - Typed event model with RSVP/timeline/dress-code/gallery blocks and
//!   form-level validation
//! - Static theme catalog (styles, color schemes, event accents) where every
//!   lookup degrades to a documented fallback instead of failing
//! - Deterministic fragment-composition renderer with HTML-escaping of all
//!   user text and presence-gated optional blocks
//! - Curated style suggestions and a preset-only randomizer
//! - Slug and meta-description helpers for the generation pipeline
//!
//! ## Example
//! ```ignore
//! use invitra_render::{render_invitation, DesignCustomizationModel, EventDescriptor,
//!     EventType, ThemeSelection};
//!
//! let event = EventDescriptor::new(EventType::Birthday, "Анна 30");
//! let theme = ThemeSelection::new("playful", "vibrant_celebration");
//! let design = DesignCustomizationModel::seeded_from(&theme);
//!
//! let html = render_invitation(&event, &theme, &design).expect("valid event");
//! assert!(html.contains("Анна 30"));
//! ```

pub mod design;
pub mod error;
pub mod event;
pub mod html;
pub mod site;
pub mod suggest;
pub mod theme;

// --- Core types ---
pub use design::{
    AnimationKind, AnimationSettings, DesignCustomizationModel, DesignPatch, LayoutSettings,
    OverrideFlags, PaletteSettings, TypographySettings,
};
pub use error::{RenderError, RenderResult};
pub use event::{
    ContactInfo, DressCode, DressCodeKind, EventDescriptor, EventType, GalleryImage, MusicKey,
    RsvpSettings, TimelineEntry, DEFAULT_RSVP_OPTIONS, MIN_RSVP_OPTIONS,
};
pub use suggest::StyleSuggestion;
pub use theme::{EventAccent, Palette, StyleClasses, ThemeSelection};

/// Render the invitation document for a validated event.
pub fn render_invitation(
    event: &EventDescriptor,
    theme: &ThemeSelection,
    design: &DesignCustomizationModel,
) -> RenderResult<String> {
    html::render(event, theme, design)
}

/// Render the invitation document, degrading to the placeholder on any
/// rendering fault. Never fails.
pub fn render_or_fallback(
    event: &EventDescriptor,
    theme: &ThemeSelection,
    design: &DesignCustomizationModel,
) -> String {
    html::render_or_fallback(event, theme, design)
}

/// Validate an event descriptor without rendering it.
pub fn validate_event(event: &EventDescriptor) -> RenderResult<()> {
    event.validate()
}

/// Ranked style suggestions for an event.
pub fn suggest_styles(event: &EventDescriptor) -> Vec<StyleSuggestion> {
    suggest::suggest(event.event_type, &event.description)
}
