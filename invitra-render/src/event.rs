//! Event descriptor: the normalized structured representation of the invitation form.
//! Immutable-by-replacement; mutation helpers return a new value or fail without touching it.

use crate::error::{RenderError, RenderResult};
use serde::{Deserialize, Serialize};

/// Minimum number of RSVP options while RSVP is enabled.
pub const MIN_RSVP_OPTIONS: usize = 2;

/// The two protected RSVP defaults. They may be edited but never removed.
pub const DEFAULT_RSVP_OPTIONS: [&str; 2] = ["Да, приду", "Нет, не приду"];

/// Supported event categories. Unknown wire values deserialize as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum EventType {
    Wedding,
    Birthday,
    Anniversary,
    Corporate,
    Graduation,
    Housewarming,
    BabyShower,
    #[default]
    Other,
}

impl EventType {
    /// Wire key (snake_case), as used in generation requests and saved records.
    pub fn as_key(&self) -> &'static str {
        match self {
            EventType::Wedding => "wedding",
            EventType::Birthday => "birthday",
            EventType::Anniversary => "anniversary",
            EventType::Corporate => "corporate",
            EventType::Graduation => "graduation",
            EventType::Housewarming => "housewarming",
            EventType::BabyShower => "baby_shower",
            EventType::Other => "other",
        }
    }

    /// Resolve a wire key; anything unrecognized maps to `Other`.
    pub fn from_key(key: &str) -> Self {
        match key {
            "wedding" => EventType::Wedding,
            "birthday" => EventType::Birthday,
            "anniversary" => EventType::Anniversary,
            "corporate" => EventType::Corporate,
            "graduation" => EventType::Graduation,
            "housewarming" => EventType::Housewarming,
            "baby_shower" => EventType::BabyShower,
            _ => EventType::Other,
        }
    }
}

impl From<String> for EventType {
    fn from(key: String) -> Self {
        EventType::from_key(&key)
    }
}

/// Contact person details. Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl ContactInfo {
    /// True if any contact field carries a value (gates the contact block).
    pub fn is_present(&self) -> bool {
        !self.name.trim().is_empty()
            || !self.phone.trim().is_empty()
            || !self.email.trim().is_empty()
    }
}

/// RSVP configuration. While enabled, `options` holds at least two entries;
/// the first two are protected defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsvpSettings {
    pub enabled: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

impl Default for RsvpSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            options: DEFAULT_RSVP_OPTIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RsvpSettings {
    /// Replace the text of an option. Any index may be edited, including the
    /// protected defaults; empty text is rejected.
    pub fn set_option(&mut self, index: usize, text: impl Into<String>) -> RenderResult<()> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RenderError::EmptyRsvpOption { index });
        }
        let len = self.options.len();
        let slot = self
            .options
            .get_mut(index)
            .ok_or(RenderError::RsvpOptionOutOfBounds { index, len })?;
        *slot = text;
        Ok(())
    }

    /// Append a new option after the existing ones.
    pub fn add_option(&mut self, text: impl Into<String>) -> RenderResult<()> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RenderError::EmptyRsvpOption {
                index: self.options.len(),
            });
        }
        self.options.push(text);
        Ok(())
    }

    /// Remove an option. Indices 0 and 1 are protected; removal is also
    /// rejected when it would leave fewer than the required minimum.
    pub fn remove_option(&mut self, index: usize) -> RenderResult<()> {
        if index < MIN_RSVP_OPTIONS {
            return Err(RenderError::ProtectedRsvpOption { index });
        }
        let len = self.options.len();
        if index >= len {
            return Err(RenderError::RsvpOptionOutOfBounds { index, len });
        }
        if len - 1 < MIN_RSVP_OPTIONS {
            return Err(RenderError::RsvpOptionsBelowMinimum {
                provided: len - 1,
                minimum: MIN_RSVP_OPTIONS,
            });
        }
        self.options.remove(index);
        Ok(())
    }

    fn validate(&self) -> RenderResult<()> {
        if !self.enabled {
            return Ok(());
        }
        let non_empty = self.options.iter().filter(|o| !o.trim().is_empty()).count();
        if non_empty < MIN_RSVP_OPTIONS {
            return Err(RenderError::RsvpOptionsBelowMinimum {
                provided: non_empty,
                minimum: MIN_RSVP_OPTIONS,
            });
        }
        if let Some(index) = self.options.iter().position(|o| o.trim().is_empty()) {
            return Err(RenderError::EmptyRsvpOption { index });
        }
        Ok(())
    }
}

/// A single programme entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub time: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Dress code category with localized display labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum DressCodeKind {
    Formal,
    Casual,
    Business,
    Costume,
    SmartCasual,
    Elegant,
    /// Catch-all for unrecognized saved values; labeled "Специальный".
    Special,
}

impl DressCodeKind {
    pub fn localized_label(&self) -> &'static str {
        match self {
            DressCodeKind::Formal => "Формальный",
            DressCodeKind::Casual => "Кэжуал",
            DressCodeKind::Business => "Деловой",
            DressCodeKind::Costume => "Костюм",
            DressCodeKind::SmartCasual => "Смарт-кэжуал",
            DressCodeKind::Elegant => "Элегантный",
            DressCodeKind::Special => "Специальный",
        }
    }
}

impl From<String> for DressCodeKind {
    fn from(key: String) -> Self {
        match key.as_str() {
            "formal" => DressCodeKind::Formal,
            "casual" => DressCodeKind::Casual,
            "business" => DressCodeKind::Business,
            "costume" => DressCodeKind::Costume,
            "smart_casual" => DressCodeKind::SmartCasual,
            "elegant" => DressCodeKind::Elegant,
            _ => DressCodeKind::Special,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DressCode {
    #[serde(rename = "type")]
    pub kind: DressCodeKind,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// Curated background-music moods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum MusicKey {
    Romantic,
    Party,
    Elegant,
    Fun,
    /// Catch-all for unrecognized saved values; labeled "Специальная подборка".
    Custom,
}

impl MusicKey {
    pub fn localized_label(&self) -> &'static str {
        match self {
            MusicKey::Romantic => "Романтичная музыка",
            MusicKey::Party => "Веселая музыка для вечеринки",
            MusicKey::Elegant => "Элегантная музыка",
            MusicKey::Fun => "Зажигательная музыка",
            MusicKey::Custom => "Специальная подборка",
        }
    }
}

impl From<String> for MusicKey {
    fn from(key: String) -> Self {
        match key.as_str() {
            "romantic" => MusicKey::Romantic,
            "party" => MusicKey::Party,
            "elegant" => MusicKey::Elegant,
            "fun" => MusicKey::Fun,
            _ => MusicKey::Custom,
        }
    }
}

/// The normalized event description handed to the renderer, the suggestion
/// engine, and the generation channel. Plain text fields use an empty string
/// for "not provided"; presence-gated rendering keys off that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EventDescriptor {
    pub event_type: EventType,
    pub title: String,
    pub description: String,
    pub date: String,
    pub time: String,
    pub venue_name: String,
    pub venue_address: String,
    pub contact: ContactInfo,
    pub rsvp: RsvpSettings,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<TimelineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dress_code: Option<DressCode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gallery: Vec<GalleryImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_music: Option<MusicKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wishes_text: Option<String>,
}

impl Default for EventDescriptor {
    fn default() -> Self {
        Self {
            event_type: EventType::Other,
            title: String::new(),
            description: String::new(),
            date: String::new(),
            time: String::new(),
            venue_name: String::new(),
            venue_address: String::new(),
            contact: ContactInfo::default(),
            rsvp: RsvpSettings::default(),
            timeline: Vec::new(),
            dress_code: None,
            gallery: Vec::new(),
            background_music: None,
            wishes_text: None,
        }
    }
}

impl EventDescriptor {
    /// Fresh descriptor for a new event of the given type, with the RSVP
    /// defaults seeded.
    pub fn new(event_type: EventType, title: impl Into<String>) -> Self {
        Self {
            event_type,
            title: title.into(),
            ..Self::default()
        }
    }

    /// Form-level validation. The renderer assumes this has passed but still
    /// treats every optional field defensively.
    pub fn validate(&self) -> RenderResult<()> {
        if self.title.trim().is_empty() {
            return Err(RenderError::EmptyTitle);
        }
        self.rsvp.validate()?;
        for entry in &self.timeline {
            if entry.title.trim().is_empty() {
                return Err(RenderError::EmptyField {
                    field: "timeline.title".to_string(),
                });
            }
        }
        for image in &self.gallery {
            if image.url.trim().is_empty() {
                return Err(RenderError::EmptyField {
                    field: "gallery.url".to_string(),
                });
            }
        }
        Ok(())
    }
}
