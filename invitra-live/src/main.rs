//! Simulation driver: scripted form edits through the preview synchronizer,
//! then a full generation through the in-process backend. Pass an event file
//! (`.yaml` or `.json`) to replace the sample event, and `--settings FILE` to
//! override the defaults.

use std::time::Duration;

use tokio::sync::watch;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

use invitra_live::{
    new_hub, GenerationChannel, LiveError, LiveResult, LocalGenerationBackend, PreviewDocument,
    PreviewInput, PreviewMode, PreviewSynchronizer, SandboxEmbed, Settings, SiteGenerationRequest,
};
use invitra_render::design::PalettePatch;
use invitra_render::{
    ContactInfo, DesignCustomizationModel, DesignPatch, DressCode, DressCodeKind, EventDescriptor,
    EventType, MusicKey, ThemeSelection, TimelineEntry,
};

const DEMO_TOKEN: &str = "demo-token";

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).compact().init();

    if let Err(err) = run().await {
        tracing::error!("simulation failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> LiveResult<()> {
    let mut event_path: Option<String> = None;
    let mut settings = Settings::default();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--settings" => {
                let path = args
                    .next()
                    .ok_or_else(|| LiveError::Config("--settings needs a file".to_string()))?;
                settings = Settings::load(path)?;
            }
            other => event_path = Some(other.to_string()),
        }
    }

    let event = match &event_path {
        Some(path) => load_event(path)?,
        None => sample_event(),
    };
    let theme = ThemeSelection::new("playful", "vibrant_celebration");
    let design = DesignCustomizationModel::seeded_from(&theme);

    preview_phase(&settings, event.clone(), theme.clone(), design).await?;
    generation_phase(&settings, &event, &theme).await
}

fn load_event(path: &str) -> LiveResult<EventDescriptor> {
    let text =
        std::fs::read_to_string(path).map_err(|e| LiveError::Config(format!("{path}: {e}")))?;
    if path.ends_with(".json") {
        serde_json::from_str(&text).map_err(|e| LiveError::Config(format!("{path}: {e}")))
    } else {
        serde_yaml::from_str(&text).map_err(|e| LiveError::Config(format!("{path}: {e}")))
    }
}

fn sample_event() -> EventDescriptor {
    let mut event = EventDescriptor::new(EventType::Birthday, "Анна: 30 лет");
    event.description = "Отмечаем юбилей в кругу самых близких".to_string();
    event.date = "2026-09-12".to_string();
    event.time = "18:00".to_string();
    event.venue_name = "Лофт «Панорама»".to_string();
    event.venue_address = "ул. Садовая, 15".to_string();
    event.contact = ContactInfo {
        name: "Анна".to_string(),
        phone: "+7 900 123-45-67".to_string(),
        email: String::new(),
    };
    event.timeline = vec![
        TimelineEntry {
            time: "18:00".to_string(),
            title: "Сбор гостей".to_string(),
            description: "Welcome-коктейли на террасе".to_string(),
        },
        TimelineEntry {
            time: "19:00".to_string(),
            title: "Праздничный ужин".to_string(),
            description: String::new(),
        },
    ];
    event.dress_code = Some(DressCode {
        kind: DressCodeKind::SmartCasual,
        description: "Яркий акцент приветствуется".to_string(),
    });
    event.background_music = Some(MusicKey::Party);
    event
}

/// Drives a typing burst and a recolor through the synchronizer, then writes
/// the last published document to `preview.html`.
async fn preview_phase(
    settings: &Settings,
    event: EventDescriptor,
    theme: ThemeSelection,
    design: DesignCustomizationModel,
) -> LiveResult<()> {
    let (input_tx, input_rx) = watch::channel(PreviewInput::new(event, theme, design));
    let (surface_tx, surface_rx) = watch::channel(PreviewDocument::default());

    let synchronizer = PreviewSynchronizer::spawn(
        &settings.preview,
        PreviewMode::Form,
        input_rx,
        |input: &PreviewInput| {
            invitra_render::render_or_fallback(&input.event, &input.theme, &input.design)
        },
        surface_tx,
    );

    // A typing burst inside one window coalesces into a single publish.
    for title in ["А", "Анна", "Анна: 3", "Анна: 30 лет"] {
        input_tx.send_modify(|input| input.event.title = title.to_string());
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    tokio::time::sleep(settings.preview.form_window() + Duration::from_millis(100)).await;
    let published = surface_rx.borrow().clone();
    tracing::info!(
        version = published.version,
        bytes = published.html.len(),
        "burst coalesced into one publish"
    );

    // Recolor, then flush so the preview refreshes without waiting the window.
    let patch = DesignPatch {
        color_palette: Some(PalettePatch::triple("#10b981", "#14b8a6", "#0f766e")),
        ..DesignPatch::default()
    };
    let mut patch_error = None;
    input_tx.send_modify(|input| {
        if let Err(err) = input.design.apply_patch(&patch) {
            patch_error = Some(err);
        }
    });
    if let Some(err) = patch_error {
        return Err(err.into());
    }
    synchronizer.flush_immediately();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let recolored = surface_rx.borrow().clone();
    tracing::info!(version = recolored.version, "palette change published");

    let embed = SandboxEmbed::default().embed(&recolored.html);
    match std::fs::write("preview.html", &recolored.html) {
        Ok(()) => tracing::info!(embed_bytes = embed.len(), "wrote preview.html"),
        Err(err) => tracing::warn!("could not write preview.html: {err}"),
    }

    synchronizer.shutdown().await;
    Ok(())
}

/// Runs one generation end to end, logging every status the channel delivers.
async fn generation_phase(
    settings: &Settings,
    event: &EventDescriptor,
    theme: &ThemeSelection,
) -> LiveResult<()> {
    let hub = new_hub();
    let backend = LocalGenerationBackend::new(hub.clone());
    let channel = GenerationChannel::new(
        hub,
        backend,
        settings.channel.clone(),
        Some(DEMO_TOKEN.to_string()),
    );

    let request = SiteGenerationRequest::from_event(event, theme)?;
    let mut handle = channel.start(request).await?;
    tracing::info!(generation_id = %handle.id(), "generation started");

    while let Some(status) = handle.progress.next().await {
        tracing::info!(step = %status.step, progress = status.progress, "{}", status.message);
    }

    let site = handle.finish().await?;
    tracing::info!(
        site_id = %site.id,
        slug = %site.slug,
        bytes = site.html_content.len(),
        "site generated"
    );
    tracing::info!(meta = %site.meta_description, "meta description");

    let (edit_design, initial_html) = site.edit_seed();
    tracing::debug!(
        palette = %edit_design.color_palette.primary,
        initial_bytes = initial_html.len(),
        "edit mode seeds from the saved site"
    );
    Ok(())
}
