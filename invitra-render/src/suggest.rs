//! Style suggestions: ranked design patches derived from the event type and
//! free-text description. The engine only ever hands out combinations from a
//! fixed curated preset table, so an applied suggestion (or the randomizer)
//! can never produce an unreadable palette.

use crate::design::{DesignPatch, LayoutPatch, PalettePatch, TypographyPatch};
use crate::event::EventType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// One ranked suggestion. `patch` is a structurally valid partial design
/// overlay; `rationale` is display text tied to the concrete event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleSuggestion {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rationale: String,
    pub popularity_score: u8,
    pub tags: BTreeSet<String>,
    pub patch: DesignPatch,
}

struct Preset {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    motive: &'static str,
    colors: [&'static str; 3],
    heading_font: &'static str,
    body_font: &'static str,
    spacing_px: f32,
    border_radius_px: f32,
    base_score: i32,
    keywords: &'static [&'static str],
    tags: [&'static str; 2],
}

const KEYWORD_BOOST: i32 = 18;
const EVENT_BOOST: i32 = 12;

/// The curated table. Color triples come from the original MVP builder's
/// scheme picker; fonts reuse the catalog pairs.
const PRESETS: [Preset; 5] = [
    Preset {
        id: "warm",
        name: "Тёплая",
        description: "Тёплые оттенки заката",
        motive: "тёплые цвета создают уютное настроение",
        colors: ["#FF6B6B", "#FFE66D", "#FF8E53"],
        heading_font: "Comfortaa",
        body_font: "Open Sans",
        spacing_px: 24.0,
        border_radius_px: 16.0,
        base_score: 72,
        keywords: &["тепл", "уют", "осен", "warm", "золот"],
        tags: ["тёплая", "уютная"],
    },
    Preset {
        id: "cool",
        name: "Прохладная",
        description: "Свежие морские тона",
        motive: "спокойные оттенки освежают страницу",
        colors: ["#4ECDC4", "#45B7D1", "#96CEB4"],
        heading_font: "Inter",
        body_font: "Inter",
        spacing_px: 24.0,
        border_radius_px: 12.0,
        base_score: 64,
        keywords: &["природ", "зелен", "бирюз", "море", "nature", "green", "teal"],
        tags: ["прохладная", "свежая"],
    },
    Preset {
        id: "elegant",
        name: "Элегантная",
        description: "Сдержанные благородные цвета",
        motive: "сдержанная гамма подчёркивает торжественность",
        colors: ["#2C3E50", "#34495E", "#7F8C8D"],
        heading_font: "Playfair Display",
        body_font: "Source Sans Pro",
        spacing_px: 32.0,
        border_radius_px: 4.0,
        base_score: 81,
        keywords: &["элегант", "классич", "строг", "нейтральн", "elegant", "formal"],
        tags: ["элегантная", "строгая"],
    },
    Preset {
        id: "vibrant",
        name: "Яркая",
        description: "Смелые праздничные акценты",
        motive: "яркие акценты задают праздничный тон",
        colors: ["#E74C3C", "#F39C12", "#9B59B6"],
        heading_font: "Comfortaa",
        body_font: "Open Sans",
        spacing_px: 20.0,
        border_radius_px: 20.0,
        base_score: 58,
        keywords: &["ярк", "праздничн", "красн", "весел", "bright", "vibrant"],
        tags: ["яркая", "праздничная"],
    },
    Preset {
        id: "pastel",
        name: "Пастельная",
        description: "Нежные пастельные тона",
        motive: "мягкие тона добавляют нежности",
        colors: ["#FFB6C1", "#E6E6FA", "#F0F8FF"],
        heading_font: "Lora",
        body_font: "Source Sans Pro",
        spacing_px: 28.0,
        border_radius_px: 24.0,
        base_score: 67,
        keywords: &["розов", "пастель", "романтич", "нежн", "лаванд", "голуб", "pink", "pastel"],
        tags: ["пастельная", "нежная"],
    },
];

/// Preset ids favored by each event type.
fn event_affinity(event_type: EventType) -> &'static [&'static str] {
    match event_type {
        EventType::Wedding => &["pastel", "elegant"],
        EventType::Birthday => &["vibrant", "warm"],
        EventType::Anniversary => &["warm", "elegant"],
        EventType::Corporate => &["elegant", "cool"],
        EventType::Graduation => &["vibrant", "cool"],
        EventType::Housewarming => &["warm", "cool"],
        EventType::BabyShower => &["pastel", "warm"],
        EventType::Other => &[],
    }
}

/// Genitive phrase used in rationale text.
fn event_phrase(event_type: EventType) -> &'static str {
    match event_type {
        EventType::Wedding => "свадьбы",
        EventType::Birthday => "дня рождения",
        EventType::Anniversary => "годовщины",
        EventType::Corporate => "корпоративного мероприятия",
        EventType::Graduation => "выпускного",
        EventType::Housewarming => "новоселья",
        EventType::BabyShower => "праздника малыша",
        EventType::Other => "вашего события",
    }
}

fn preset_patch(preset: &Preset) -> DesignPatch {
    DesignPatch {
        color_palette: Some(PalettePatch::triple(
            preset.colors[0],
            preset.colors[1],
            preset.colors[2],
        )),
        typography: Some(TypographyPatch {
            heading_font: Some(preset.heading_font.to_string()),
            body_font: Some(preset.body_font.to_string()),
            font_size_px: None,
            line_height: None,
        }),
        layout: Some(LayoutPatch {
            spacing_px: Some(preset.spacing_px),
            border_radius_px: Some(preset.border_radius_px),
            shadow_intensity: None,
        }),
        animations: None,
    }
}

/// Ranked suggestions for the given event. Always returns every curated
/// preset (five entries), ordered by score descending; ranking is driven by
/// the event type plus keyword matches over the description.
pub fn suggest(event_type: EventType, description: &str) -> Vec<StyleSuggestion> {
    let lowered = description.to_lowercase();
    let favored = event_affinity(event_type);

    let mut scored: Vec<(i32, bool, &Preset)> = PRESETS
        .iter()
        .map(|preset| {
            let mut score = preset.base_score;
            if favored.contains(&preset.id) {
                score += EVENT_BOOST;
            }
            let keyword_hit = preset.keywords.iter().any(|kw| lowered.contains(kw));
            if keyword_hit {
                score += KEYWORD_BOOST;
            }
            (score.clamp(0, 100), keyword_hit, preset)
        })
        .collect();

    // stable sort keeps the table order for equal scores
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .map(|(score, keyword_hit, preset)| {
            let mut rationale = format!(
                "Для {} хорошо подходит палитра «{}»: {}",
                event_phrase(event_type),
                preset.name,
                preset.motive,
            );
            if keyword_hit {
                rationale.push_str(" (по мотивам вашего описания)");
            }
            rationale.push('.');

            let mut tags: BTreeSet<String> =
                preset.tags.iter().map(|t| t.to_string()).collect();
            tags.insert(event_type.as_key().to_string());

            StyleSuggestion {
                id: preset.id.to_string(),
                name: preset.name.to_string(),
                description: preset.description.to_string(),
                rationale,
                popularity_score: score as u8,
                tags,
                patch: preset_patch(preset),
            }
        })
        .collect()
}

/// Uniform pick among the curated presets. Entropy comes from a fresh v4
/// uuid, so no extra dependency; the result is always one of the five
/// curated combinations, never a synthesized palette.
pub fn randomize() -> DesignPatch {
    let idx = Uuid::new_v4().as_bytes()[0] as usize % PRESETS.len();
    preset_patch(&PRESETS[idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suggestion_count_is_in_bounds() {
        let suggestions = suggest(EventType::Other, "");
        assert!((3..=6).contains(&suggestions.len()));
    }

    #[test]
    fn test_suggestions_are_ranked_descending() {
        let suggestions = suggest(EventType::Birthday, "");
        let scores: Vec<u8> = suggestions.iter().map(|s| s.popularity_score).collect();
        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(scores, sorted);
    }

    #[test]
    fn test_wedding_prefers_elegant_without_description() {
        let suggestions = suggest(EventType::Wedding, "");
        assert_eq!(suggestions[0].id, "elegant");
    }

    #[test]
    fn test_pink_keywords_push_pastel_to_the_top() {
        let suggestions = suggest(EventType::Wedding, "хотим розовые пастельные тона");
        assert_eq!(suggestions[0].id, "pastel");
        assert!(suggestions[0].rationale.contains("по мотивам вашего описания"));
    }

    #[test]
    fn test_bright_birthday_prefers_vibrant() {
        let suggestions = suggest(EventType::Birthday, "яркие праздничные цвета");
        assert_eq!(suggestions[0].id, "vibrant");
    }

    #[test]
    fn test_rationale_mentions_the_event() {
        let suggestions = suggest(EventType::Graduation, "");
        for s in &suggestions {
            assert!(s.rationale.contains("выпускного"), "{}", s.rationale);
        }
    }

    #[test]
    fn test_every_patch_is_structurally_valid() {
        for s in suggest(EventType::Corporate, "классический стиль") {
            assert!(s.patch.validate().is_ok(), "preset {}", s.id);
        }
    }

    #[test]
    fn test_randomize_stays_inside_the_curated_set() {
        let curated: Vec<String> = PRESETS.iter().map(|p| p.colors[0].to_string()).collect();
        for _ in 0..32 {
            let patch = randomize();
            assert!(patch.validate().is_ok());
            let primary = patch.color_palette.unwrap().primary.unwrap();
            assert!(curated.contains(&primary), "unexpected color {primary}");
        }
    }
}
