//! Slug and metadata helpers for generated invitation sites.

use crate::event::EventDescriptor;
use regex::Regex;
use std::sync::OnceLock;

/// Slug used when a title reduces to nothing.
pub const FALLBACK_SLUG: &str = "invitation";

const META_DESCRIPTION_MAX: usize = 160;
const META_FALLBACK: &str = "Приглашаем вас на незабываемое мероприятие";

/// URL slug from a free-form title: lowercase, strip everything that is not
/// a word char / whitespace / hyphen, collapse separator runs to a single
/// `-`. Cyrillic letters are word chars and survive as-is.
pub fn slugify(title: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    static COLLAPSE: OnceLock<Regex> = OnceLock::new();
    let strip = STRIP.get_or_init(|| Regex::new(r"[^\w\s-]").unwrap());
    let collapse = COLLAPSE.get_or_init(|| Regex::new(r"[-\s]+").unwrap());

    let lowered = title.to_lowercase();
    let stripped = strip.replace_all(&lowered, "");
    let collapsed = collapse.replace_all(&stripped, "-");
    let trimmed = collapsed.trim_matches('-');

    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Slug that does not collide with `existing`: appends `-1`, `-2`, … until
/// an unused value is found.
pub fn unique_slug(title: &str, existing: &[String]) -> String {
    let base = slugify(title);
    if !existing.iter().any(|s| *s == base) {
        return base;
    }
    let mut counter = 1;
    loop {
        let candidate = format!("{}-{}", base, counter);
        if !existing.iter().any(|s| *s == candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Plain-text SEO description, at most 160 chars (cut on a char boundary).
/// Uses the event description when present, otherwise composes one from
/// title, date and venue.
pub fn meta_description(event: &EventDescriptor) -> String {
    let description = event.description.trim();
    if !description.is_empty() {
        return truncate_chars(description, META_DESCRIPTION_MAX);
    }

    let parts: Vec<&str> = [
        event.title.trim(),
        event.date.trim(),
        event.venue_name.trim(),
    ]
    .into_iter()
    .filter(|p| !p.is_empty())
    .collect();

    if parts.is_empty() {
        META_FALLBACK.to_string()
    } else {
        truncate_chars(&parts.join(", "), META_DESCRIPTION_MAX)
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slugify_keeps_cyrillic() {
        assert_eq!(slugify("Анна 30"), "анна-30");
        assert_eq!(slugify("День Рождения!"), "день-рождения");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Hello,   World -- again"), "hello-world-again");
        assert_eq!(slugify("--trim me--"), "trim-me");
    }

    #[test]
    fn test_slugify_empty_input_gets_fallback() {
        assert_eq!(slugify(""), FALLBACK_SLUG);
        assert_eq!(slugify("!!! ---"), FALLBACK_SLUG);
    }

    #[test]
    fn test_unique_slug_appends_counter() {
        let existing = vec!["анна-30".to_string(), "анна-30-1".to_string()];
        assert_eq!(unique_slug("Анна 30", &existing), "анна-30-2");
        assert_eq!(unique_slug("Пётр 40", &existing), "пётр-40");
    }

    #[test]
    fn test_meta_description_prefers_event_description() {
        let mut event = EventDescriptor::new(EventType::Birthday, "Анна 30");
        event.description = "Отмечаем юбилей в кругу друзей".to_string();
        assert_eq!(meta_description(&event), "Отмечаем юбилей в кругу друзей");
    }

    #[test]
    fn test_meta_description_composes_from_fields() {
        let mut event = EventDescriptor::new(EventType::Birthday, "Анна 30");
        event.date = "2025-12-31".to_string();
        event.venue_name = "Лофт на набережной".to_string();
        assert_eq!(
            meta_description(&event),
            "Анна 30, 2025-12-31, Лофт на набережной"
        );
    }

    #[test]
    fn test_meta_description_is_truncated_on_char_boundary() {
        let mut event = EventDescriptor::new(EventType::Other, "Событие");
        event.description = "ю".repeat(300);
        let meta = meta_description(&event);
        assert_eq!(meta.chars().count(), 160);
    }

    #[test]
    fn test_meta_description_fallback_when_everything_is_empty() {
        let event = EventDescriptor::default();
        assert_eq!(meta_description(&event), META_FALLBACK);
    }
}
