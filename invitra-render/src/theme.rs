//! Theme catalog: static lookup tables mapping event types, style keys, and
//! color-scheme keys to concrete visual parameters. Every resolver is total;
//! unknown keys degrade to a documented fallback instead of failing.

use crate::event::EventType;
use serde::{Deserialize, Serialize};

/// Style key applied when the requested one is unknown.
pub const FALLBACK_STYLE_KEY: &str = "modern";

/// Color-scheme key applied when the requested one is unknown.
pub const FALLBACK_COLOR_SCHEME_KEY: &str = "bold_modern";

/// All style keys the catalog carries, in display order.
pub const STYLE_KEYS: [&str; 6] = [
    "modern",
    "classic",
    "minimalist",
    "elegant",
    "playful",
    "rustic",
];

/// All color-scheme keys the catalog carries, in display order.
pub const COLOR_SCHEME_KEYS: [&str; 10] = [
    "romantic_pastels",
    "vibrant_celebration",
    "elegant_neutrals",
    "bold_modern",
    "nature_inspired",
    "classic_black_white",
    "warm_autumn",
    "cool_winter",
    "spring_fresh",
    "summer_bright",
];

/// The user's visual choice: a style key plus a color-scheme key. Keys stay
/// plain strings end to end so an unknown key round-trips and degrades at
/// resolve time rather than failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeSelection {
    pub style: String,
    pub color_scheme: String,
}

impl Default for ThemeSelection {
    fn default() -> Self {
        Self {
            style: FALLBACK_STYLE_KEY.to_string(),
            color_scheme: FALLBACK_COLOR_SCHEME_KEY.to_string(),
        }
    }
}

impl ThemeSelection {
    pub fn new(style: impl Into<String>, color_scheme: impl Into<String>) -> Self {
        Self {
            style: style.into(),
            color_scheme: color_scheme.into(),
        }
    }
}

/// Per-event-type accent: a display icon and a gradient utility pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventAccent {
    pub icon: &'static str,
    pub gradient: &'static str,
}

/// Structural/layout class set for one style key. Carries no literal colors;
/// color always flows in through the palette custom properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleClasses {
    pub container_class: &'static str,
    pub card_class: &'static str,
    pub title_class: &'static str,
    pub description_class: &'static str,
    pub button_class: &'static str,
}

/// Concrete palette for one color-scheme key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub primary: &'static str,
    pub secondary: &'static str,
    pub accent: &'static str,
    pub background: &'static str,
    pub text: &'static str,
}

impl Palette {
    /// The scheme's gradient expression, derived from its color triple.
    pub fn gradient(&self) -> String {
        format!(
            "linear-gradient(135deg, {}, {}, {})",
            self.primary, self.secondary, self.accent
        )
    }
}

/// Accent lookup. Total over `EventType`.
pub fn resolve_event_accent(event_type: EventType) -> EventAccent {
    match event_type {
        EventType::Wedding => EventAccent {
            icon: "💍",
            gradient: "from-purple-500 to-pink-500",
        },
        EventType::Birthday => EventAccent {
            icon: "🎂",
            gradient: "from-pink-500 to-rose-500",
        },
        EventType::Anniversary => EventAccent {
            icon: "💖",
            gradient: "from-orange-500 to-red-500",
        },
        EventType::Corporate => EventAccent {
            icon: "🏢",
            gradient: "from-indigo-500 to-blue-500",
        },
        EventType::Graduation => EventAccent {
            icon: "🎓",
            gradient: "from-indigo-500 to-blue-500",
        },
        EventType::Housewarming => EventAccent {
            icon: "🏡",
            gradient: "from-emerald-500 to-teal-500",
        },
        EventType::BabyShower => EventAccent {
            icon: "🍼",
            gradient: "from-green-500 to-emerald-500",
        },
        EventType::Other => EventAccent {
            icon: "🎉",
            gradient: "from-violet-500 to-purple-500",
        },
    }
}

/// Style lookup. Unknown keys fall back to `modern`.
pub fn resolve_style(style_key: &str) -> StyleClasses {
    match style_key {
        "classic" => StyleClasses {
            container_class: "max-w-4xl mx-auto text-center",
            card_class: "bg-white/95 backdrop-blur-sm rounded-none border-2 border-gray-200 p-8 md:p-12 shadow-lg max-w-2xl mx-auto mb-8 fade-in",
            title_class: "text-4xl md:text-6xl lg:text-7xl font-serif font-bold gradient-bg bg-clip-text text-transparent mb-6 text-shadow leading-tight",
            description_class: "text-lg md:text-xl text-gray-800 max-w-2xl mx-auto leading-relaxed font-serif",
            button_class: "w-full p-3 md:p-4 gradient-bg text-white font-serif font-semibold rounded-none border-2 border-white transition-all duration-200 text-base",
        },
        "minimalist" => StyleClasses {
            container_class: "max-w-3xl mx-auto text-center",
            card_class: "bg-white/70 backdrop-blur-sm rounded-lg p-6 md:p-8 shadow-sm max-w-xl mx-auto mb-6 fade-in",
            title_class: "text-3xl md:text-5xl lg:text-6xl font-light gradient-bg bg-clip-text text-transparent mb-4 leading-tight",
            description_class: "text-base md:text-lg text-gray-600 max-w-xl mx-auto leading-relaxed font-light",
            button_class: "w-full p-3 gradient-bg text-white font-light rounded-md transition-all duration-200 text-sm",
        },
        "elegant" => StyleClasses {
            container_class: "max-w-4xl mx-auto text-center",
            card_class: "bg-white/85 backdrop-blur-md rounded-3xl p-8 md:p-12 shadow-xl max-w-2xl mx-auto mb-8 fade-in border border-gray-100",
            title_class: "text-4xl md:text-6xl lg:text-7xl font-bold gradient-bg bg-clip-text text-transparent mb-6 text-shadow leading-tight",
            description_class: "text-lg md:text-xl text-gray-700 max-w-2xl mx-auto leading-relaxed font-medium",
            button_class: "w-full p-4 gradient-bg text-white font-semibold rounded-2xl transition-all duration-300 text-base hover:shadow-lg",
        },
        "playful" => StyleClasses {
            container_class: "max-w-5xl mx-auto text-center",
            card_class: "bg-white/80 backdrop-blur-sm rounded-2xl p-8 md:p-12 shadow-2xl max-w-3xl mx-auto mb-8 fade-in",
            title_class: "text-4xl md:text-6xl lg:text-7xl font-bold gradient-bg bg-clip-text text-transparent mb-6 text-shadow leading-tight",
            description_class: "text-lg md:text-xl text-gray-600 max-w-2xl mx-auto leading-relaxed",
            button_class: "w-full p-4 gradient-bg text-white font-bold rounded-2xl transition-all duration-300 text-lg hover:scale-110 hover:rotate-2",
        },
        "rustic" => StyleClasses {
            container_class: "max-w-4xl mx-auto text-center",
            card_class: "bg-white/90 backdrop-blur-sm rounded-lg p-6 md:p-10 shadow-lg max-w-2xl mx-auto mb-8 fade-in border-2 border-amber-200",
            title_class: "text-4xl md:text-6xl lg:text-7xl font-bold gradient-bg bg-clip-text text-transparent mb-6 text-shadow leading-tight",
            description_class: "text-lg md:text-xl text-gray-700 max-w-2xl mx-auto leading-relaxed",
            button_class: "w-full p-4 gradient-bg text-white font-bold rounded-lg transition-all duration-200 text-base border-2 border-white",
        },
        // "modern" and anything unrecognized
        _ => StyleClasses {
            container_class: "max-w-5xl mx-auto text-center",
            card_class: "bg-white/90 backdrop-blur-md rounded-2xl p-8 md:p-12 shadow-2xl max-w-3xl mx-auto mb-8 fade-in",
            title_class: "text-5xl md:text-7xl lg:text-8xl font-extrabold gradient-bg bg-clip-text text-transparent mb-8 text-shadow leading-tight",
            description_class: "text-xl md:text-2xl text-gray-700 max-w-3xl mx-auto leading-relaxed font-light",
            button_class: "w-full p-4 md:p-5 gradient-bg text-white font-bold rounded-xl transition-all duration-300 text-lg hover:scale-105",
        },
    }
}

/// Palette lookup. Unknown keys fall back to `bold_modern`.
pub fn resolve_palette(color_scheme_key: &str) -> Palette {
    match color_scheme_key {
        "romantic_pastels" => Palette {
            primary: "#f472b6",
            secondary: "#fbcfe8",
            accent: "#c084fc",
            background: "#fdf2f8",
            text: "#1f2937",
        },
        "vibrant_celebration" => Palette {
            primary: "#ec4899",
            secondary: "#facc15",
            accent: "#ef4444",
            background: "#fefce8",
            text: "#1f2937",
        },
        "elegant_neutrals" => Palette {
            primary: "#78716c",
            secondary: "#a8a29e",
            accent: "#d97706",
            background: "#fafaf9",
            text: "#292524",
        },
        "nature_inspired" => Palette {
            primary: "#10b981",
            secondary: "#14b8a6",
            accent: "#06b6d4",
            background: "#ecfdf5",
            text: "#064e3b",
        },
        "classic_black_white" => Palette {
            primary: "#111827",
            secondary: "#4b5563",
            accent: "#9ca3af",
            background: "#ffffff",
            text: "#111827",
        },
        "warm_autumn" => Palette {
            primary: "#fb923c",
            secondary: "#ca8a04",
            accent: "#f87171",
            background: "#fff7ed",
            text: "#431407",
        },
        "cool_winter" => Palette {
            primary: "#60a5fa",
            secondary: "#bfdbfe",
            accent: "#22d3ee",
            background: "#eff6ff",
            text: "#1e3a8a",
        },
        "spring_fresh" => Palette {
            primary: "#4ade80",
            secondary: "#bbf7d0",
            accent: "#f9a8d4",
            background: "#f0fdf4",
            text: "#14532d",
        },
        "summer_bright" => Palette {
            primary: "#fbbf24",
            secondary: "#fb923c",
            accent: "#38bdf8",
            background: "#fffbeb",
            text: "#78350f",
        },
        // "bold_modern" and anything unrecognized
        _ => Palette {
            primary: "#6366f1",
            secondary: "#8b5cf6",
            accent: "#7e22ce",
            background: "#eef2ff",
            text: "#1e1b4b",
        },
    }
}

/// Curated heading/body font pair for a style key. Unknown keys fall back to
/// the modern pair.
pub fn resolve_font_pair(style_key: &str) -> (&'static str, &'static str) {
    match style_key {
        "elegant" => ("Playfair Display", "Source Sans Pro"),
        "playful" => ("Comfortaa", "Open Sans"),
        "classic" | "rustic" => ("Lora", "Source Sans Pro"),
        // "modern", "minimalist" and anything unrecognized
        _ => ("Inter", "Inter"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_style_falls_back_to_modern() {
        assert_eq!(resolve_style("vaporwave"), resolve_style(FALLBACK_STYLE_KEY));
        assert_eq!(resolve_style(""), resolve_style("modern"));
    }

    #[test]
    fn test_unknown_scheme_falls_back_to_bold_modern() {
        assert_eq!(
            resolve_palette("neon_nights"),
            resolve_palette(FALLBACK_COLOR_SCHEME_KEY)
        );
    }

    #[test]
    fn test_every_catalog_key_resolves_to_distinct_entries() {
        for key in STYLE_KEYS {
            // every listed key must have its own entry, not the fallback,
            // except the fallback itself
            if key != FALLBACK_STYLE_KEY {
                assert_ne!(resolve_style(key), resolve_style("zzz"), "style {key}");
            }
        }
        for key in COLOR_SCHEME_KEYS {
            if key != FALLBACK_COLOR_SCHEME_KEY {
                assert_ne!(resolve_palette(key), resolve_palette("zzz"), "scheme {key}");
            }
        }
    }

    #[test]
    fn test_gradient_derives_from_color_triple() {
        let palette = resolve_palette("vibrant_celebration");
        assert_eq!(
            palette.gradient(),
            "linear-gradient(135deg, #ec4899, #facc15, #ef4444)"
        );
    }

    #[test]
    fn test_accent_is_total_over_event_types() {
        let accent = resolve_event_accent(EventType::Birthday);
        assert_eq!(accent.icon, "🎂");
        assert_eq!(accent.gradient, "from-pink-500 to-rose-500");
        // the catch-all category still gets an accent
        assert!(!resolve_event_accent(EventType::Other).icon.is_empty());
    }
}
