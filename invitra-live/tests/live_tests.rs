use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::sync::watch;
use tokio_stream::StreamExt;
use uuid::Uuid;

use invitra_live::{
    new_hub, notify_status, ChannelOutcome, ChannelSettings, ChannelState, GeneratedSite,
    GenerationBackend, GenerationChannel, GenerationStatus, LiveError, LiveResult,
    LocalGenerationBackend, PreviewDocument, PreviewInput, PreviewMode, PreviewSynchronizer,
    ProgressHub, Settings, SiteGenerationRequest,
};
use invitra_render::{EventDescriptor, EventType, ThemeSelection};

fn sample_event() -> EventDescriptor {
    let mut event = EventDescriptor::new(EventType::Birthday, "Анна: 30 лет");
    event.description = "Отмечаем юбилей в кругу самых близких".to_string();
    event.date = "2026-09-12".to_string();
    event.time = "18:00".to_string();
    event.venue_name = "Лофт «Панорама»".to_string();
    event
}

fn spawn_preview(
    window_ms: u64,
) -> (
    watch::Sender<PreviewInput>,
    watch::Receiver<PreviewDocument>,
    PreviewSynchronizer,
    Arc<AtomicUsize>,
) {
    let mut settings = Settings::default();
    settings.preview.debounce_ms = window_ms;

    let (input_tx, input_rx) = watch::channel(PreviewInput::default());
    let (surface_tx, surface_rx) = watch::channel(PreviewDocument::default());
    let renders = Arc::new(AtomicUsize::new(0));
    let counter = renders.clone();

    let synchronizer = PreviewSynchronizer::spawn(
        &settings.preview,
        PreviewMode::Form,
        input_rx,
        move |input: &PreviewInput| {
            counter.fetch_add(1, Ordering::SeqCst);
            format!("<html><body><h1>{}</h1></body></html>", input.event.title)
        },
        surface_tx,
    );
    (input_tx, surface_rx, synchronizer, renders)
}

#[tokio::test(start_paused = true)]
async fn test_burst_of_edits_renders_once_with_the_last_snapshot() {
    let (input_tx, surface_rx, synchronizer, renders) = spawn_preview(400);

    for i in 1..=5 {
        input_tx.send_modify(|input| input.event.title = format!("Анна {i}"));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    // Window re-arms from the last edit; wait it out.
    tokio::time::sleep(Duration::from_millis(450)).await;

    let doc = surface_rx.borrow().clone();
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert_eq!(doc.version, 5);
    assert!(doc.html.contains("Анна 5"));

    synchronizer.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_flush_bypasses_the_debounce_window() {
    let (input_tx, surface_rx, synchronizer, renders) = spawn_preview(400);

    input_tx.send_modify(|input| input.event.title = "Срочный показ".to_string());
    tokio::time::sleep(Duration::from_millis(5)).await;
    assert_eq!(renders.load(Ordering::SeqCst), 0);

    synchronizer.flush_immediately();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let doc = surface_rx.borrow().clone();
    assert_eq!(renders.load(Ordering::SeqCst), 1);
    assert_eq!(doc.version, 1);
    assert!(doc.html.contains("Срочный показ"));

    synchronizer.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_late_edit_publishes_a_second_fresher_document() {
    let (input_tx, surface_rx, synchronizer, renders) = spawn_preview(400);

    input_tx.send_modify(|input| input.event.title = "Первая версия".to_string());
    tokio::time::sleep(Duration::from_millis(450)).await;
    assert!(surface_rx.borrow().html.contains("Первая версия"));

    input_tx.send_modify(|input| input.event.title = "Вторая версия".to_string());
    tokio::time::sleep(Duration::from_millis(450)).await;

    let doc = surface_rx.borrow().clone();
    assert_eq!(renders.load(Ordering::SeqCst), 2);
    assert_eq!(doc.version, 2);
    assert!(doc.html.contains("Вторая версия"));

    synchronizer.shutdown().await;
}

fn dummy_site() -> GeneratedSite {
    let now = chrono::Utc::now();
    GeneratedSite {
        id: Uuid::new_v4(),
        title: "Тест".to_string(),
        slug: "тест".to_string(),
        meta_description: String::new(),
        event_type: EventType::Other,
        theme: ThemeSelection::default(),
        html_content: "<!DOCTYPE html>".to_string(),
        is_published: false,
        view_count: 0,
        share_count: 0,
        created_at: now,
        updated_at: now,
    }
}

fn status(step: &str, progress: u8) -> GenerationStatus {
    GenerationStatus {
        step: step.to_string(),
        progress,
        message: step.to_string(),
        estimated_time: None,
    }
}

/// Replays a fixed status script through the hub, then succeeds.
struct ScriptedBackend {
    hub: ProgressHub,
    script: Vec<GenerationStatus>,
}

impl GenerationBackend for ScriptedBackend {
    async fn submit(
        &self,
        _request: &SiteGenerationRequest,
        generation_id: Uuid,
    ) -> LiveResult<GeneratedSite> {
        for update in &self.script {
            notify_status(&self.hub, generation_id, update.clone());
            tokio::task::yield_now().await;
        }
        Ok(dummy_site())
    }
}

/// Notifies once, stalls past the channel ceiling, then notifies again.
struct StallingBackend {
    hub: ProgressHub,
}

impl GenerationBackend for StallingBackend {
    async fn submit(
        &self,
        _request: &SiteGenerationRequest,
        generation_id: Uuid,
    ) -> LiveResult<GeneratedSite> {
        notify_status(&self.hub, generation_id, status("analyzing", 10));
        tokio::time::sleep(Duration::from_secs(2)).await;
        notify_status(&self.hub, generation_id, status("finalizing", 90));
        Ok(dummy_site())
    }
}

#[tokio::test]
async fn test_progress_delivery_is_monotone_through_the_channel() {
    let hub = new_hub();
    let backend = ScriptedBackend {
        hub: hub.clone(),
        script: vec![
            status("analyzing", 20),
            status("structuring", 55),
            // A stale callback echoes an earlier step.
            status("analyzing", 20),
            status("completed", 100),
        ],
    };
    let channel = GenerationChannel::new(
        hub,
        backend,
        ChannelSettings::default(),
        Some("token".to_string()),
    );

    let request = SiteGenerationRequest::from_event(&sample_event(), &ThemeSelection::default())
        .unwrap();
    let mut handle = channel.start(request).await.unwrap();

    let mut delivered = Vec::new();
    while let Some(update) = handle.progress.next().await {
        delivered.push(update.progress);
    }
    assert_eq!(delivered, vec![20, 55, 100]);

    let site = handle.finish().await.unwrap();
    assert_eq!(site.title, "Тест");
}

#[tokio::test]
async fn test_missing_credential_fails_fast() {
    let hub = new_hub();
    let backend = ScriptedBackend {
        hub: hub.clone(),
        script: Vec::new(),
    };
    let channel = GenerationChannel::new(hub.clone(), backend, ChannelSettings::default(), None);

    let request = SiteGenerationRequest::from_event(&sample_event(), &ThemeSelection::default())
        .unwrap();
    let err = channel.start(request).await.unwrap_err();
    assert_eq!(err, LiveError::MissingCredential);
    // Nothing was registered.
    assert!(hub.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_ceiling_ends_the_stream_and_no_late_callbacks_arrive() {
    let hub = new_hub();
    let backend = StallingBackend { hub: hub.clone() };
    let settings = ChannelSettings {
        ceiling_secs: 1,
        buffer: 8,
    };
    let channel = GenerationChannel::new(hub, backend, settings, Some("token".to_string()));

    let request = SiteGenerationRequest::from_event(&sample_event(), &ThemeSelection::default())
        .unwrap();
    let mut handle = channel.start(request).await.unwrap();

    let mut delivered = Vec::new();
    while let Some(update) = handle.progress.next().await {
        delivered.push(update.progress);
    }
    // The 90 lands after the ceiling closed the channel.
    assert_eq!(delivered, vec![10]);
    assert_eq!(handle.state(), ChannelState::Done(ChannelOutcome::TimedOut));
}

#[tokio::test]
async fn test_local_backend_walks_the_step_table_and_builds_the_record() {
    let hub = new_hub();
    let backend = LocalGenerationBackend::new(hub.clone()).with_step_delay(Duration::ZERO);
    let channel = GenerationChannel::new(
        hub,
        backend,
        ChannelSettings::default(),
        Some("token".to_string()),
    );

    let event = sample_event();
    let theme = ThemeSelection::new("playful", "vibrant_celebration");
    let request = SiteGenerationRequest::from_event(&event, &theme).unwrap();
    let mut handle = channel.start(request).await.unwrap();

    let mut steps = Vec::new();
    while let Some(update) = handle.progress.next().await {
        steps.push((update.step, update.progress));
    }
    assert_eq!(
        steps,
        vec![
            ("analyzing".to_string(), 10),
            ("designing".to_string(), 25),
            ("structuring".to_string(), 45),
            ("generating".to_string(), 70),
            ("finalizing".to_string(), 90),
            ("completed".to_string(), 100),
        ]
    );

    let site = handle.finish().await.unwrap();
    assert_eq!(site.title, "Анна: 30 лет");
    assert_eq!(site.slug, "анна-30-лет");
    assert_eq!(site.meta_description, "Отмечаем юбилей в кругу самых близких");
    assert_eq!(site.event_type, EventType::Birthday);
    assert_eq!(site.theme, theme);
    assert!(!site.is_published);
    assert_eq!(site.view_count, 0);
    assert!(site.html_content.contains("Анна: 30 лет"));
    assert!(site.html_content.contains("12.09.2026"));
    assert!(site.html_content.contains("Лофт «Панорама»"));
}

#[tokio::test]
async fn test_submission_failure_reports_an_error_status_and_resolves_with_the_error() {
    let hub = new_hub();
    let backend = LocalGenerationBackend::new(hub.clone()).with_step_delay(Duration::ZERO);
    let channel = GenerationChannel::new(
        hub,
        backend,
        ChannelSettings::default(),
        Some("token".to_string()),
    );

    // content_details stays Null: the backend cannot recover an event.
    let request = SiteGenerationRequest::default();
    let mut handle = channel.start(request).await.unwrap();

    let mut delivered = Vec::new();
    while let Some(update) = handle.progress.next().await {
        delivered.push(update);
    }
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].step, "error");
    assert_eq!(delivered[0].progress, 0);

    let err = handle.finish().await.unwrap_err();
    assert!(matches!(err, LiveError::SubmissionFailed { .. }));
}

#[tokio::test]
async fn test_edit_seed_matches_the_saved_theme() {
    let hub = new_hub();
    let backend = LocalGenerationBackend::new(hub.clone()).with_step_delay(Duration::ZERO);
    let channel = GenerationChannel::new(
        hub,
        backend,
        ChannelSettings::default(),
        Some("token".to_string()),
    );

    let theme = ThemeSelection::new("elegant", "warm_autumn");
    let request = SiteGenerationRequest::from_event(&sample_event(), &theme).unwrap();
    let handle = channel.start(request).await.unwrap();
    let site = handle.finish().await.unwrap();

    let (design, initial_html) = site.edit_seed();
    assert_eq!(
        design,
        invitra_render::DesignCustomizationModel::seeded_from(&theme)
    );
    assert_eq!(initial_html, site.html_content);
}
