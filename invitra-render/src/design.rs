//! User-adjustable design overrides layered on top of a [`ThemeSelection`].
//!
//! The model is seeded from the theme catalog and then mutated by the user.
//! Each of the four groups (palette, typography, layout, animations) carries a
//! dirty flag; a later theme change re-seeds only the groups the user has not
//! touched, so explicit customization survives switching themes.

use crate::error::{RenderError, RenderResult};
use crate::theme::{self, ThemeSelection};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub fn validate_hex_color(value: &str) -> RenderResult<()> {
    static HEX_COLOR_REGEX: OnceLock<Regex> = OnceLock::new();
    let hex_regex = HEX_COLOR_REGEX.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap());

    if hex_regex.is_match(value) {
        Ok(())
    } else {
        Err(RenderError::InvalidColor {
            value: value.to_string(),
            reason: "must be a 6-digit hex color (e.g., #ff0000)".to_string(),
        })
    }
}

fn validate_range(field: &str, value: f32, min: f32, max: f32) -> RenderResult<()> {
    if value < min || value > max {
        Err(RenderError::ValueOutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            range: format!("{} to {}", min, max),
        })
    } else {
        Ok(())
    }
}

fn validate_positive(field: &str, value: f32) -> RenderResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RenderError::ValueOutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            range: "greater than 0".to_string(),
        })
    }
}

/// Concrete colors applied to the document, as `#rrggbb` strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaletteSettings {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
}

impl Default for PaletteSettings {
    fn default() -> Self {
        Self::from_palette(&theme::resolve_palette(theme::FALLBACK_COLOR_SCHEME_KEY))
    }
}

impl PaletteSettings {
    pub fn from_palette(palette: &theme::Palette) -> Self {
        Self {
            primary: palette.primary.to_string(),
            secondary: palette.secondary.to_string(),
            accent: palette.accent.to_string(),
            background: palette.background.to_string(),
            text: palette.text.to_string(),
        }
    }

    /// The gradient expression derived from the current color triple.
    pub fn gradient(&self) -> String {
        format!(
            "linear-gradient(135deg, {}, {}, {})",
            self.primary, self.secondary, self.accent
        )
    }

    /// The `:root` custom-property block the renderer injects. Every color
    /// literal in the rendered document resolves through these variables.
    pub fn css_variables(&self) -> String {
        format!(
            ":root {{\n    --color-primary: {};\n    --color-secondary: {};\n    --color-accent: {};\n    --color-background: {};\n    --color-text: {};\n}}\n",
            self.primary, self.secondary, self.accent, self.background, self.text
        )
    }

    pub fn set_primary(&mut self, value: &str) -> RenderResult<()> {
        set_color(&mut self.primary, value)
    }

    pub fn set_secondary(&mut self, value: &str) -> RenderResult<()> {
        set_color(&mut self.secondary, value)
    }

    pub fn set_accent(&mut self, value: &str) -> RenderResult<()> {
        set_color(&mut self.accent, value)
    }

    pub fn set_background(&mut self, value: &str) -> RenderResult<()> {
        set_color(&mut self.background, value)
    }

    pub fn set_text(&mut self, value: &str) -> RenderResult<()> {
        set_color(&mut self.text, value)
    }
}

fn set_color(slot: &mut String, value: &str) -> RenderResult<()> {
    validate_hex_color(value)?;
    *slot = value.to_string();
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypographySettings {
    pub heading_font: String,
    pub body_font: String,
    pub font_size_px: f32,
    pub line_height: f32,
}

impl Default for TypographySettings {
    fn default() -> Self {
        Self {
            heading_font: "Inter".to_string(),
            body_font: "Inter".to_string(),
            font_size_px: 16.0,
            line_height: 1.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutSettings {
    pub spacing_px: f32,
    pub border_radius_px: f32,
    /// Shadow strength from 0.0 (none) to 1.0 (full).
    pub shadow_intensity: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            spacing_px: 24.0,
            border_radius_px: 16.0,
            shadow_intensity: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    #[default]
    Fade,
    Slide,
    Zoom,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationSettings {
    pub enabled: bool,
    /// Playback speed multiplier, 0.1 to 2.0.
    pub speed: f32,
    pub kind: AnimationKind,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 1.0,
            kind: AnimationKind::Fade,
        }
    }
}

/// Dirty markers, one per group. A set flag means the user (or an applied
/// suggestion) owns that group and theme changes must not re-seed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OverrideFlags {
    pub palette: bool,
    pub typography: bool,
    pub layout: bool,
    pub animations: bool,
}

impl OverrideFlags {
    pub fn is_clear(&self) -> bool {
        !(self.palette || self.typography || self.layout || self.animations)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignCustomizationModel {
    pub color_palette: PaletteSettings,
    pub typography: TypographySettings,
    pub layout: LayoutSettings,
    pub animations: AnimationSettings,
    #[serde(skip_serializing_if = "OverrideFlags::is_clear")]
    pub overrides: OverrideFlags,
}

impl DesignCustomizationModel {
    /// Fresh model seeded from the catalog entries for `theme`: the scheme's
    /// palette and the style's curated font pair. All override flags start
    /// clear.
    pub fn seeded_from(theme: &ThemeSelection) -> Self {
        let (heading, body) = theme::resolve_font_pair(&theme.style);
        Self {
            color_palette: PaletteSettings::from_palette(&theme::resolve_palette(
                &theme.color_scheme,
            )),
            typography: TypographySettings {
                heading_font: heading.to_string(),
                body_font: body.to_string(),
                ..TypographySettings::default()
            },
            layout: LayoutSettings::default(),
            animations: AnimationSettings::default(),
            overrides: OverrideFlags::default(),
        }
    }

    /// Re-seed from a new theme without clobbering user edits: only groups
    /// whose override flag is clear pick up the new catalog values.
    pub fn retheme(&mut self, theme: &ThemeSelection) {
        if !self.overrides.palette {
            self.color_palette =
                PaletteSettings::from_palette(&theme::resolve_palette(&theme.color_scheme));
        }
        if !self.overrides.typography {
            let (heading, body) = theme::resolve_font_pair(&theme.style);
            self.typography.heading_font = heading.to_string();
            self.typography.body_font = body.to_string();
        }
    }

    /// Apply a partial overlay (from a suggestion or the randomizer). The
    /// patch is validated first; on success every group it touches is
    /// overwritten field by field and marked as overridden.
    pub fn apply_patch(&mut self, patch: &DesignPatch) -> RenderResult<()> {
        patch.validate()?;

        if let Some(ref p) = patch.color_palette {
            apply_opt(&mut self.color_palette.primary, &p.primary);
            apply_opt(&mut self.color_palette.secondary, &p.secondary);
            apply_opt(&mut self.color_palette.accent, &p.accent);
            apply_opt(&mut self.color_palette.background, &p.background);
            apply_opt(&mut self.color_palette.text, &p.text);
            self.overrides.palette = true;
        }
        if let Some(ref p) = patch.typography {
            apply_opt(&mut self.typography.heading_font, &p.heading_font);
            apply_opt(&mut self.typography.body_font, &p.body_font);
            apply_copy(&mut self.typography.font_size_px, p.font_size_px);
            apply_copy(&mut self.typography.line_height, p.line_height);
            self.overrides.typography = true;
        }
        if let Some(ref p) = patch.layout {
            apply_copy(&mut self.layout.spacing_px, p.spacing_px);
            apply_copy(&mut self.layout.border_radius_px, p.border_radius_px);
            apply_copy(&mut self.layout.shadow_intensity, p.shadow_intensity);
            self.overrides.layout = true;
        }
        if let Some(ref p) = patch.animations {
            apply_copy(&mut self.animations.enabled, p.enabled);
            apply_copy(&mut self.animations.speed, p.speed);
            apply_copy(&mut self.animations.kind, p.kind);
            self.overrides.animations = true;
        }
        Ok(())
    }
}

fn apply_opt(slot: &mut String, value: &Option<String>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

fn apply_copy<T: Copy>(slot: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *slot = v;
    }
}

/// All-`Option` mirror of the model groups, used as a partial overlay.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_palette: Option<PalettePatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typography: Option<TypographyPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animations: Option<AnimationPatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PalettePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl PalettePatch {
    /// Patch carrying just the three-color triple used by curated presets.
    pub fn triple(
        primary: impl Into<String>,
        secondary: impl Into<String>,
        accent: impl Into<String>,
    ) -> Self {
        Self {
            primary: Some(primary.into()),
            secondary: Some(secondary.into()),
            accent: Some(accent.into()),
            background: None,
            text: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypographyPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading_font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_font: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_px: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_px: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius_px: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_intensity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnimationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<AnimationKind>,
}

impl DesignPatch {
    /// Check every value the patch carries. Colors must be `#rrggbb`, the
    /// bounded fields must be within range, sizes must be positive.
    pub fn validate(&self) -> RenderResult<()> {
        if let Some(ref p) = self.color_palette {
            for value in [&p.primary, &p.secondary, &p.accent, &p.background, &p.text]
                .into_iter()
                .flatten()
            {
                validate_hex_color(value)?;
            }
        }
        if let Some(ref p) = self.typography {
            if let Some(size) = p.font_size_px {
                validate_positive("fontSizePx", size)?;
            }
            if let Some(lh) = p.line_height {
                validate_positive("lineHeight", lh)?;
            }
        }
        if let Some(ref p) = self.layout {
            if let Some(s) = p.spacing_px {
                validate_range("spacingPx", s, 0.0, 256.0)?;
            }
            if let Some(r) = p.border_radius_px {
                validate_range("borderRadiusPx", r, 0.0, 128.0)?;
            }
            if let Some(i) = p.shadow_intensity {
                validate_range("shadowIntensity", i, 0.0, 1.0)?;
            }
        }
        if let Some(ref p) = self.animations {
            if let Some(speed) = p.speed {
                validate_range("animationSpeed", speed, 0.1, 2.0)?;
            }
        }
        Ok(())
    }
}
