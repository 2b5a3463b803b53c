//! Integration tests for the runtime surface: logging setup, configuration
//! loading and event delivery working together.

use bridge_traits::LogLevel;
use core_runtime::config::{GalleryConfig, ResolvePolicy, ENV_FOLDER_PATH, ENV_WINDOW_SIZE};
use core_runtime::events::{CoreEvent, EventBus, GalleryEvent};
use core_runtime::logging::{init_logging, redact_if_sensitive, LogFormat, LoggingConfig};
use core_runtime::Error;

#[test]
fn test_logging_initializes_once_per_process() {
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug);

    assert!(init_logging(config.clone()).is_ok());
    assert!(matches!(init_logging(config), Err(Error::Config(_))));

    tracing::info!(target: "core_gallery", offset = 0u64, "logging ready");
}

#[test]
fn test_invalid_filter_is_rejected() {
    let config = LoggingConfig::default().with_filter("core_auth=notalevel[");
    assert!(matches!(init_logging(config), Err(Error::Config(_))));
}

#[test]
fn test_config_debug_output_is_safe_to_log() {
    let config = GalleryConfig::from_lookup(|key| match key {
        "DROPBOX_REFRESH_TOKEN" => Some("rt-value-123".to_string()),
        "DROPBOX_APP_SECRET" => Some("secret-value-456".to_string()),
        k if k == ENV_FOLDER_PATH => Some("/Camera Uploads".to_string()),
        k if k == ENV_WINDOW_SIZE => Some("6".to_string()),
        _ => None,
    })
    .unwrap();

    let rendered = format!("{:?}", config);
    assert!(!rendered.contains("rt-value-123"));
    assert!(!rendered.contains("secret-value-456"));
    assert!(rendered.contains("/Camera Uploads"));
    assert_eq!(config.window_size, 6);
    assert_eq!(config.resolve_policy, ResolvePolicy::Strict);

    assert_eq!(redact_if_sensitive("refresh_token", &config.refresh_token), "[REDACTED]");
}

#[tokio::test]
async fn test_gallery_events_flow_through_filtered_stream() {
    let bus = EventBus::new(16);
    let mut stream = bus
        .stream()
        .filter(|event| matches!(event, CoreEvent::Gallery(GalleryEvent::Exhausted { .. })));

    bus.emit(CoreEvent::Gallery(GalleryEvent::BatchLoaded {
        offset: 0,
        count: 3,
        skipped: 0,
        has_more: false,
    }))
    .unwrap();
    bus.emit(CoreEvent::Gallery(GalleryEvent::Exhausted { total: 3 }))
        .unwrap();

    assert_eq!(
        stream.recv().await.unwrap(),
        CoreEvent::Gallery(GalleryEvent::Exhausted { total: 3 })
    );
}
