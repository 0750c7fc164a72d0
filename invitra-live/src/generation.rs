//! Generation pipeline: the request and site records, the step table reported
//! over the progress channel, and the in-process backend used by the simulate
//! bin and tests. A network-backed service implements [`GenerationBackend`]
//! the same way and is otherwise invisible to the rest of the crate.
//!
//! [`GenerationBackend`]: crate::channel::GenerationBackend

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use invitra_render::site::{meta_description, slugify};
use invitra_render::{DesignCustomizationModel, EventDescriptor, EventType, ThemeSelection};

use crate::channel::{notify_status, GenerationBackend, GenerationStatus, ProgressHub};
use crate::error::{LiveError, LiveResult};

/// What the composer writes into a core field the submitter left empty. The
/// live preview omits those fragments instead; a published site keeps the row
/// and marks the value as pending.
pub const FALLBACK_EVENT_TITLE: &str = "Ваше событие";
pub const FALLBACK_EVENT_DATE: &str = "Дата уточняется";
pub const FALLBACK_VENUE: &str = "Место уточняется";
pub const FALLBACK_ORGANIZER: &str = "Организатор";

/// One pipeline step as reported over the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationStep {
    pub step: &'static str,
    pub progress: u8,
    pub message: &'static str,
    pub estimated_time: Option<u32>,
}

impl GenerationStep {
    pub fn to_status(self) -> GenerationStatus {
        GenerationStatus {
            step: self.step.to_string(),
            progress: self.progress,
            message: self.message.to_string(),
            estimated_time: self.estimated_time,
        }
    }
}

/// Pipeline steps in order: progress percent, user-facing message and the
/// estimated seconds remaining.
pub const GENERATION_STEPS: [GenerationStep; 6] = [
    GenerationStep {
        step: "analyzing",
        progress: 10,
        message: "Анализируем ваше событие…",
        estimated_time: Some(15),
    },
    GenerationStep {
        step: "designing",
        progress: 25,
        message: "Подбираем дизайн и цветовую гамму…",
        estimated_time: Some(12),
    },
    GenerationStep {
        step: "structuring",
        progress: 45,
        message: "Формируем структуру сайта…",
        estimated_time: Some(10),
    },
    GenerationStep {
        step: "generating",
        progress: 70,
        message: "Создаём контент приглашения…",
        estimated_time: Some(6),
    },
    GenerationStep {
        step: "finalizing",
        progress: 90,
        message: "Последние штрихи…",
        estimated_time: Some(3),
    },
    GenerationStep {
        step: "completed",
        progress: 100,
        message: "Сайт готов!",
        estimated_time: None,
    },
];

/// Status for a failed generation: the step is `error` and progress resets.
pub fn error_status(message: impl Into<String>) -> GenerationStatus {
    GenerationStatus {
        step: "error".to_string(),
        progress: 0,
        message: message.into(),
        estimated_time: Some(0),
    }
}

/// A site generation request as the backend wire carries it. `content_details`
/// is the flattened event descriptor in its own wire form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteGenerationRequest {
    pub event_type: EventType,
    pub theme: ThemeSelection,
    pub color_preferences: Option<String>,
    pub content_details: Value,
    pub style_preferences: Option<String>,
    pub target_audience: Option<String>,
}

impl SiteGenerationRequest {
    /// Builds the request from the editing models.
    pub fn from_event(event: &EventDescriptor, theme: &ThemeSelection) -> LiveResult<Self> {
        let content_details =
            serde_json::to_value(event).map_err(|e| LiveError::SubmissionFailed {
                reason: e.to_string(),
            })?;
        Ok(SiteGenerationRequest {
            event_type: event.event_type,
            theme: theme.clone(),
            color_preferences: Some(theme.color_scheme.clone()),
            content_details,
            style_preferences: None,
            target_audience: None,
        })
    }
}

/// A generated site record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSite {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub meta_description: String,
    pub event_type: EventType,
    pub theme: ThemeSelection,
    pub html_content: String,
    pub is_published: bool,
    pub view_count: u32,
    pub share_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GeneratedSite {
    /// Seeds the edit-mode preview for a saved site: the stored document shows
    /// immediately, and the design model picks up where the theme left off.
    pub fn edit_seed(&self) -> (DesignCustomizationModel, String) {
        (
            DesignCustomizationModel::seeded_from(&self.theme),
            self.html_content.clone(),
        )
    }
}

/// In-process backend: walks the step table, renders the document locally and
/// assembles the record.
pub struct LocalGenerationBackend {
    hub: ProgressHub,
    step_delay: Duration,
}

impl LocalGenerationBackend {
    pub fn new(hub: ProgressHub) -> Self {
        LocalGenerationBackend {
            hub,
            step_delay: Duration::from_millis(120),
        }
    }

    /// Delay between step notifications. Tests use zero.
    pub fn with_step_delay(mut self, step_delay: Duration) -> Self {
        self.step_delay = step_delay;
        self
    }

    /// Recovers the event from `content_details` and fills the composer
    /// placeholders. The envelope's event type wins over the payload's.
    fn compose_event(request: &SiteGenerationRequest) -> LiveResult<EventDescriptor> {
        let mut event: EventDescriptor = serde_json::from_value(request.content_details.clone())
            .map_err(|e| LiveError::SubmissionFailed {
                reason: format!("bad content_details: {e}"),
            })?;
        event.event_type = request.event_type;
        if event.title.trim().is_empty() {
            event.title = FALLBACK_EVENT_TITLE.to_string();
        }
        if event.date.trim().is_empty() {
            event.date = FALLBACK_EVENT_DATE.to_string();
        }
        if event.venue_name.trim().is_empty() {
            event.venue_name = FALLBACK_VENUE.to_string();
        }
        // A phone or email without a name still gets a label; a fully empty
        // contact stays empty and the contact block stays hidden.
        if event.contact.name.trim().is_empty() && event.contact.is_present() {
            event.contact.name = FALLBACK_ORGANIZER.to_string();
        }
        Ok(event)
    }
}

impl GenerationBackend for LocalGenerationBackend {
    async fn submit(
        &self,
        request: &SiteGenerationRequest,
        generation_id: Uuid,
    ) -> LiveResult<GeneratedSite> {
        let event = match Self::compose_event(request) {
            Ok(event) => event,
            Err(err) => {
                notify_status(&self.hub, generation_id, error_status(err.to_string()));
                return Err(err);
            }
        };

        for step in GENERATION_STEPS.iter().take(GENERATION_STEPS.len() - 1) {
            notify_status(&self.hub, generation_id, step.to_status());
            if !self.step_delay.is_zero() {
                tokio::time::sleep(self.step_delay).await;
            }
        }

        let design = DesignCustomizationModel::seeded_from(&request.theme);
        let html_content = invitra_render::render_or_fallback(&event, &request.theme, &design);
        let slug = slugify(&event.title);
        let meta = meta_description(&event);

        notify_status(
            &self.hub,
            generation_id,
            GENERATION_STEPS[GENERATION_STEPS.len() - 1].to_status(),
        );

        let now = Utc::now();
        Ok(GeneratedSite {
            id: Uuid::new_v4(),
            title: event.title.clone(),
            slug,
            meta_description: meta,
            event_type: event.event_type,
            theme: request.theme.clone(),
            html_content,
            is_published: false,
            view_count: 0,
            share_count: 0,
            created_at: now,
            updated_at: now,
        })
    }
}
