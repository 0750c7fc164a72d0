//! Renders an invitation into a standalone HTML document for the preview
//! iframe. Pure string assembly: structurally equal inputs always produce
//! byte-identical output, with no clock, randomness or external state.
//!
//! Every optional block is a presence-gated fragment. Empty backing data
//! omits the whole block instead of rendering an empty container, and all
//! free text goes through [`escape_html`] before insertion.

use crate::design::DesignCustomizationModel;
use crate::error::RenderResult;
use crate::event::{ContactInfo, EventDescriptor};
use crate::theme::{self, EventAccent, StyleClasses, ThemeSelection};
use std::fmt::{self, Write};

/// Static styles shared by every document. Color never appears here; it is
/// injected through the custom-property block built per render.
const BASE_STYLES: &str = "\
.elegant-shadow { box-shadow: 0 25px 50px -12px rgba(0, 0, 0, 0.1); }
.text-shadow { text-shadow: 0 2px 4px rgba(0,0,0,0.1); }
";

const DEFAULT_HERO_TEXT: &str = "You are cordially invited to celebrate with us";
const FALLBACK_TITLE: &str = "Ваше событие";
const FALLBACK_MESSAGE: &str = "Добро пожаловать на наше событие!";
const FOOTER_TAGLINE: &str = "Создано с ❤️ и использованием современных технологий";

const CALENDAR_ICON: &str = r#"<svg class="w-6 h-6 text-white" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M8 7V3m8 4V3m-9 8h10M5 21h14a2 2 0 002-2V7a2 2 0 00-2-2H5a2 2 0 00-2 2v12a2 2 0 002 2z"></path></svg>"#;
const PIN_ICON: &str = r#"<svg class="w-6 h-6 text-white" fill="none" stroke="currentColor" viewBox="0 0 24 24"><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M17.657 16.657L13.414 20.9a1.998 1.998 0 01-2.827 0l-4.244-4.243a8 8 0 1111.314 0z"></path><path stroke-linecap="round" stroke-linejoin="round" stroke-width="2" d="M15 11a3 3 0 11-6 0 3 3 0 016 0z"></path></svg>"#;

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Rejects script URLs; everything else passes through untouched.
fn is_safe_url(url: &str) -> bool {
    !url.trim().to_lowercase().starts_with("javascript:")
}

/// Keeps only characters that cannot break out of a CSS string context.
fn sanitize_font(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-')
        .collect()
}

/// `YYYY-MM-DD` becomes `DD.MM.YYYY`; anything else passes through as typed.
fn format_date_ru(raw: &str) -> String {
    let parts: Vec<&str> = raw.split('-').collect();
    let is_iso = parts.len() == 3
        && parts[0].len() == 4
        && parts[1].len() == 2
        && parts[2].len() == 2
        && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit()));
    if is_iso {
        format!("{}.{}.{}", parts[2], parts[1], parts[0])
    } else {
        raw.to_string()
    }
}

/// First `max` characters, respecting char boundaries. Trims `HH:MM:SS`
/// down to the `HH:MM` badge.
fn clip_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Renders the full invitation document. The descriptor is validated first;
/// past that point rendering cannot fail except for formatting errors.
pub fn render(
    event: &EventDescriptor,
    theme: &ThemeSelection,
    design: &DesignCustomizationModel,
) -> RenderResult<String> {
    event.validate()?;

    let classes = theme::resolve_style(&theme.style);
    let accent = theme::resolve_event_accent(event.event_type);

    let mut body = String::new();
    hero_section(&mut body, event, &classes, &accent)?;
    details_section(&mut body, event, &classes)?;
    timeline_section(&mut body, event, &classes)?;
    dress_code_section(&mut body, event, &classes)?;
    gallery_section(&mut body, event, &classes)?;
    wishes_section(&mut body, event, &classes)?;
    rsvp_section(&mut body, event, &classes)?;
    contact_section(&mut body, &event.contact, &classes)?;
    music_section(&mut body, event, &classes)?;
    footer_section(&mut body, event)?;

    let css = document_styles(design, &theme.style)?;

    let mut html = String::new();
    write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en" class="scroll-smooth">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{}</title>
<script src="https://cdn.tailwindcss.com"></script>
<style>
{}</style>
</head>
<body class="min-h-screen">
<section class="min-h-screen flex items-center justify-center px-4 py-12">
<div class="{}">
{}</div>
</section>
</body>
</html>
"#,
        escape_html(&event.title),
        css,
        classes.container_class,
        body,
    )?;

    Ok(html)
}

/// Minimal always-renderable placeholder: title plus a generic message.
pub fn fallback_document(title: &str) -> String {
    let safe_title = if title.trim().is_empty() {
        FALLBACK_TITLE
    } else {
        title
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
</head>
<body style="margin:0;min-height:100vh;display:flex;align-items:center;justify-content:center;font-family:sans-serif;background:#eef2ff;color:#1e1b4b;">
<div style="text-align:center;padding:2rem;">
<h1 style="font-size:2rem;margin-bottom:0.5rem;">{title}</h1>
<p>{message}</p>
</div>
</body>
</html>
"#,
        title = escape_html(safe_title),
        message = FALLBACK_MESSAGE,
    )
}

/// Like [`render`] but never fails: any rendering fault degrades to
/// [`fallback_document`] so the preview surface is never left blank.
pub fn render_or_fallback(
    event: &EventDescriptor,
    theme: &ThemeSelection,
    design: &DesignCustomizationModel,
) -> String {
    render(event, theme, design).unwrap_or_else(|_| fallback_document(&event.title))
}

/// Per-render style block: custom properties from the design palette, the
/// derived gradient, typography and layout overrides, and the animation
/// rules. All color literals in the document live here.
fn document_styles(
    design: &DesignCustomizationModel,
    style_key: &str,
) -> Result<String, fmt::Error> {
    let palette = &design.color_palette;
    let typo = &design.typography;
    let layout = &design.layout;

    let mut css = String::new();
    css.push_str(&palette.css_variables());
    writeln!(css, ".gradient-bg {{ background: {}; }}", palette.gradient())?;
    writeln!(
        css,
        "body {{ background-color: var(--color-background); color: var(--color-text); font-family: '{}', sans-serif; font-size: {:.1}px; line-height: {:.2}; }}",
        sanitize_font(&typo.body_font),
        typo.font_size_px,
        typo.line_height,
    )?;
    writeln!(
        css,
        "h1, h2, h3, h4 {{ font-family: '{}', sans-serif; }}",
        sanitize_font(&typo.heading_font),
    )?;
    writeln!(
        css,
        ".invite-card {{ border-radius: {:.1}px; margin-bottom: {:.1}px; box-shadow: 0 25px 50px -12px rgba(0, 0, 0, {:.2}); }}",
        layout.border_radius_px,
        layout.spacing_px,
        layout.shadow_intensity.clamp(0.0, 1.0) * 0.5,
    )?;
    css.push_str(BASE_STYLES);
    css.push_str(&animation_styles(design)?);

    // style-key extras, matching the per-style class sets
    if style_key == "classic" {
        css.push_str(".font-serif { font-family: 'Georgia', serif; }\n");
    }
    if style_key == "minimalist" {
        css.push_str(".font-light { font-weight: 300; }\n");
    }
    Ok(css)
}

fn animation_styles(design: &DesignCustomizationModel) -> Result<String, fmt::Error> {
    use crate::design::AnimationKind;

    let anim = &design.animations;
    if !anim.enabled {
        return Ok(String::new());
    }
    let from = match anim.kind {
        AnimationKind::Fade => "opacity: 0; transform: translateY(20px);",
        AnimationKind::Slide => "opacity: 0; transform: translateX(-30px);",
        AnimationKind::Zoom => "opacity: 0; transform: scale(0.95);",
        AnimationKind::None => return Ok(String::new()),
    };
    let to = "opacity: 1; transform: none;";
    let duration = 0.8 / anim.speed.clamp(0.1, 2.0);

    let mut css = String::new();
    writeln!(
        css,
        ".fade-in {{ animation: invite-in {:.2}s ease-out; }}",
        duration
    )?;
    writeln!(
        css,
        "@keyframes invite-in {{ from {{ {} }} to {{ {} }} }}",
        from, to
    )?;
    Ok(css)
}

fn hero_section(
    out: &mut String,
    event: &EventDescriptor,
    classes: &StyleClasses,
    accent: &EventAccent,
) -> fmt::Result {
    let description = if event.description.trim().is_empty() {
        DEFAULT_HERO_TEXT.to_string()
    } else {
        escape_html(&event.description)
    };
    write!(
        out,
        r#"<div class="mb-8 fade-in">
<div class="text-6xl mb-4">{}</div>
<h1 class="{}">{}</h1>
<p class="{}">{}</p>
</div>
"#,
        accent.icon,
        classes.title_class,
        escape_html(&event.title),
        classes.description_class,
        description,
    )
}

/// When/Where card grid. Each card is gated on its own fields; the grid is
/// omitted entirely when no field is set.
fn details_section(
    out: &mut String,
    event: &EventDescriptor,
    classes: &StyleClasses,
) -> fmt::Result {
    let has_when = !event.date.is_empty() || !event.time.is_empty();
    let has_where = !event.venue_name.is_empty() || !event.venue_address.is_empty();
    if !has_when && !has_where {
        return Ok(());
    }

    write!(
        out,
        "<div class=\"{} invite-card\">\n<div class=\"grid md:grid-cols-2 gap-6 text-left\">\n",
        classes.card_class
    )?;

    if has_when {
        let mut when = String::new();
        if !event.date.is_empty() {
            when.push_str(&escape_html(&format_date_ru(&event.date)));
        }
        if !event.time.is_empty() {
            if !when.is_empty() {
                when.push(' ');
            }
            write!(
                when,
                "<span class=\"ml-2 px-2 py-1 rounded bg-indigo-50 text-indigo-700 text-sm font-semibold\">{}</span>",
                escape_html(clip_chars(&event.time, 5))
            )?;
        }
        detail_card(out, CALENDAR_ICON, "When", &when)?;
    }
    if has_where {
        let mut place = escape_html(&event.venue_name);
        if !event.venue_address.is_empty() {
            if place.is_empty() {
                place = escape_html(&event.venue_address);
            } else {
                write!(
                    place,
                    "<br><span class=\"text-sm text-gray-500\">{}</span>",
                    escape_html(&event.venue_address)
                )?;
            }
        }
        detail_card(out, PIN_ICON, "Where", &place)?;
    }

    out.push_str("</div>\n</div>\n");
    Ok(())
}

fn detail_card(out: &mut String, icon: &str, label: &str, value: &str) -> fmt::Result {
    write!(
        out,
        r#"<div class="flex items-center space-x-4">
<div class="w-12 h-12 gradient-bg rounded-full flex items-center justify-center">{}</div>
<div>
<h3 class="font-semibold text-gray-900 mb-1">{}</h3>
<p class="text-gray-600">{}</p>
</div>
</div>
"#,
        icon, label, value,
    )
}

fn timeline_section(
    out: &mut String,
    event: &EventDescriptor,
    classes: &StyleClasses,
) -> fmt::Result {
    if event.timeline.is_empty() {
        return Ok(());
    }
    write!(
        out,
        "<div class=\"{} invite-card\">\n<h3 class=\"text-2xl md:text-3xl font-bold text-gray-900 mb-6\">Программа мероприятия</h3>\n<div class=\"space-y-4\">\n",
        classes.card_class
    )?;
    for entry in &event.timeline {
        write!(
            out,
            r#"<div class="flex items-start space-x-4 p-4 bg-gray-50 rounded-lg">
<div class="w-16 h-16 gradient-bg rounded-full flex items-center justify-center flex-shrink-0">
<span class="text-white font-bold text-sm">{}</span>
</div>
<div class="flex-1">
<h4 class="font-semibold text-gray-900 mb-1">{}</h4>
"#,
            escape_html(clip_chars(&entry.time, 5)),
            escape_html(&entry.title),
        )?;
        if !entry.description.is_empty() {
            write!(
                out,
                "<p class=\"text-gray-600\">{}</p>\n",
                escape_html(&entry.description)
            )?;
        }
        out.push_str("</div>\n</div>\n");
    }
    out.push_str("</div>\n</div>\n");
    Ok(())
}

fn dress_code_section(
    out: &mut String,
    event: &EventDescriptor,
    classes: &StyleClasses,
) -> fmt::Result {
    let Some(ref dress_code) = event.dress_code else {
        return Ok(());
    };
    write!(
        out,
        r#"<div class="{} invite-card">
<h3 class="text-2xl md:text-3xl font-bold text-gray-900 mb-6">Дресс-код</h3>
<div class="p-4 bg-indigo-50 rounded-lg">
<h4 class="font-semibold text-indigo-900 mb-2">{}</h4>
"#,
        classes.card_class,
        dress_code.kind.localized_label(),
    )?;
    if !dress_code.description.is_empty() {
        write!(
            out,
            "<p class=\"text-indigo-700\">{}</p>\n",
            escape_html(&dress_code.description)
        )?;
    }
    out.push_str("</div>\n</div>\n");
    Ok(())
}

fn gallery_section(
    out: &mut String,
    event: &EventDescriptor,
    classes: &StyleClasses,
) -> fmt::Result {
    let images: Vec<_> = event
        .gallery
        .iter()
        .filter(|img| !img.url.is_empty() && is_safe_url(&img.url))
        .collect();
    if images.is_empty() {
        return Ok(());
    }
    write!(
        out,
        "<div class=\"{} invite-card\">\n<h3 class=\"text-2xl md:text-3xl font-bold text-gray-900 mb-6\">Фотогалерея</h3>\n<div class=\"grid md:grid-cols-3 gap-4\">\n",
        classes.card_class
    )?;
    for img in images {
        write!(
            out,
            "<img src=\"{}\" alt=\"{}\" class=\"w-full h-48 object-cover rounded-lg\">\n",
            escape_html(&img.url),
            escape_html(&img.alt),
        )?;
    }
    out.push_str("</div>\n</div>\n");
    Ok(())
}

fn wishes_section(
    out: &mut String,
    event: &EventDescriptor,
    classes: &StyleClasses,
) -> fmt::Result {
    let Some(ref wishes) = event.wishes_text else {
        return Ok(());
    };
    if wishes.trim().is_empty() {
        return Ok(());
    }
    write!(
        out,
        r#"<div class="{} invite-card">
<h3 class="text-2xl md:text-3xl font-bold text-gray-900 mb-6">Пожелания гостям</h3>
<div class="p-6 bg-gradient-to-r from-yellow-50 to-orange-50 rounded-lg border-l-4 border-yellow-400">
<p class="text-gray-800 text-lg leading-relaxed">{}</p>
</div>
</div>
"#,
        classes.card_class,
        escape_html(wishes),
    )
}

fn rsvp_section(out: &mut String, event: &EventDescriptor, classes: &StyleClasses) -> fmt::Result {
    if !event.rsvp.enabled {
        return Ok(());
    }
    write!(
        out,
        "<div class=\"{} invite-card\">\n<h3 class=\"text-2xl md:text-3xl font-bold text-gray-900 mb-6\">Will you join us?</h3>\n<div class=\"grid gap-4\">\n",
        classes.card_class
    )?;
    for option in &event.rsvp.options {
        write!(
            out,
            "<button class=\"{}\">{}</button>\n",
            classes.button_class,
            escape_html(option),
        )?;
    }
    out.push_str("</div>\n</div>\n");
    Ok(())
}

fn contact_section(out: &mut String, contact: &ContactInfo, classes: &StyleClasses) -> fmt::Result {
    if !contact.is_present() {
        return Ok(());
    }
    write!(
        out,
        "<div class=\"{} invite-card\">\n<h3 class=\"text-xl font-bold text-gray-900 mb-4\">Questions?</h3>\n<div class=\"space-y-2 text-gray-600\">\n",
        classes.card_class
    )?;
    if !contact.name.is_empty() {
        write!(out, "<p class=\"font-medium\">{}</p>\n", escape_html(&contact.name))?;
    }
    if !contact.phone.is_empty() {
        let phone = escape_html(&contact.phone);
        write!(
            out,
            "<p><a href=\"tel:{}\" class=\"hover:text-indigo-600 transition-colors\">{}</a></p>\n",
            phone, phone,
        )?;
    }
    if !contact.email.is_empty() {
        let email = escape_html(&contact.email);
        write!(
            out,
            "<p><a href=\"mailto:{}\" class=\"hover:text-indigo-600 transition-colors\">{}</a></p>\n",
            email, email,
        )?;
    }
    out.push_str("</div>\n</div>\n");
    Ok(())
}

fn music_section(out: &mut String, event: &EventDescriptor, classes: &StyleClasses) -> fmt::Result {
    let Some(ref music) = event.background_music else {
        return Ok(());
    };
    write!(
        out,
        r#"<div class="{} invite-card">
<h3 class="text-2xl md:text-3xl font-bold text-gray-900 mb-6">Музыкальное сопровождение</h3>
<div class="p-4 bg-purple-50 rounded-lg">
<p class="text-purple-700 font-medium">{}</p>
</div>
</div>
"#,
        classes.card_class,
        music.localized_label(),
    )
}

fn footer_section(out: &mut String, event: &EventDescriptor) -> fmt::Result {
    write!(
        out,
        r#"<footer class="py-12 text-center fade-in">
<h3 class="text-2xl font-bold mb-2">{}</h3>
<p class="text-sm opacity-70">{}</p>
</footer>
"#,
        escape_html(&event.title),
        FOOTER_TAGLINE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventType;
    use pretty_assertions::assert_eq;

    fn minimal_event() -> EventDescriptor {
        EventDescriptor::new(EventType::Birthday, "Анна 30")
    }

    #[test]
    fn test_escape_html_covers_markup_chars() {
        assert_eq!(
            escape_html(r#"<b>"Tom & Jerry"</b>"#),
            "&lt;b&gt;&quot;Tom &amp; Jerry&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_date_formatting() {
        assert_eq!(format_date_ru("2025-12-31"), "31.12.2025");
        assert_eq!(format_date_ru("завтра"), "завтра");
        assert_eq!(format_date_ru(""), "");
    }

    #[test]
    fn test_time_badge_is_clipped() {
        assert_eq!(clip_chars("18:30:00", 5), "18:30");
        assert_eq!(clip_chars("18:30", 5), "18:30");
        assert_eq!(clip_chars("18", 5), "18");
    }

    #[test]
    fn test_script_urls_are_rejected() {
        assert!(!is_safe_url("javascript:alert(1)"));
        assert!(!is_safe_url("  JavaScript:alert(1)"));
        assert!(is_safe_url("https://example.com/a.jpg"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let event = minimal_event();
        let theme = ThemeSelection::default();
        let design = DesignCustomizationModel::seeded_from(&theme);
        let first = render(&event, &theme, &design).unwrap();
        let second = render(&event, &theme, &design).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_optional_fields_leave_no_trace() {
        let event = minimal_event();
        let theme = ThemeSelection::default();
        let design = DesignCustomizationModel::seeded_from(&theme);
        let html = render(&event, &theme, &design).unwrap();

        assert!(!html.contains("Where"));
        assert!(!html.contains("When"));
        assert!(!html.contains("Программа мероприятия"));
        assert!(!html.contains("Дресс-код"));
        assert!(!html.contains("Фотогалерея"));
        assert!(!html.contains("Questions?"));
        assert!(!html.contains("Музыкальное сопровождение"));
        // RSVP is on by default with the two protected options
        assert!(html.contains("Will you join us?"));
    }

    #[test]
    fn test_user_text_is_escaped_in_output() {
        let mut event = minimal_event();
        event.title = "<script>alert('x')</script>".to_string();
        let theme = ThemeSelection::default();
        let design = DesignCustomizationModel::seeded_from(&theme);
        let html = render(&event, &theme, &design).unwrap();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_palette_change_only_touches_style_block() {
        let event = minimal_event();
        let theme = ThemeSelection::default();
        let design_a = DesignCustomizationModel::seeded_from(&theme);
        let mut design_b = design_a.clone();
        design_b.color_palette.set_primary("#123456").unwrap();
        design_b.color_palette.set_accent("#654321").unwrap();

        let html_a = render(&event, &theme, &design_a).unwrap();
        let html_b = render(&event, &theme, &design_b).unwrap();
        assert_ne!(html_a, html_b);

        let body_a = html_a.split("</head>").nth(1).unwrap();
        let body_b = html_b.split("</head>").nth(1).unwrap();
        assert_eq!(body_a, body_b);
    }

    #[test]
    fn test_fallback_document_always_has_a_title() {
        let html = fallback_document("");
        assert!(html.contains(FALLBACK_TITLE));
        let html = fallback_document("Свадьба");
        assert!(html.contains("Свадьба"));
        assert!(html.contains(FALLBACK_MESSAGE));
    }

    #[test]
    fn test_render_or_fallback_never_fails() {
        // empty title fails validation, so the placeholder takes over
        let event = EventDescriptor::new(EventType::Wedding, "");
        let theme = ThemeSelection::default();
        let design = DesignCustomizationModel::seeded_from(&theme);
        let html = render_or_fallback(&event, &theme, &design);
        assert!(html.contains(FALLBACK_TITLE));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }
}
