//! Page through a Dropbox folder and print temporary image links.
//!
//! Run with:
//! ```bash
//! DROPBOX_REFRESH_TOKEN=... DROPBOX_APP_KEY=... DROPBOX_APP_SECRET=... \
//! DROPBOX_FOLDER_PATH=/Photos cargo run -p core-service --example browse_gallery -- 3
//! ```
//!
//! The optional argument limits the number of pages fetched.

use anyhow::Context;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::GalleryService;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))
        .context("failed to initialize logging")?;

    let max_pages: usize = match std::env::args().nth(1) {
        Some(raw) => raw.parse().context("page count must be a number")?,
        None => usize::MAX,
    };

    let service = GalleryService::from_env().context("failed to set up the gallery")?;
    info!(config = ?service.config(), "Browsing gallery");

    for page in 1..=max_pages {
        let batch = service.next_page().await?;
        for image in &batch.images {
            println!("{:>3}  {}  {}", page, image.filename, image.access_url);
        }
        if !batch.has_more {
            break;
        }
    }

    let progress = service.progress().await;
    println!(
        "{} of {} images listed",
        progress.offset,
        progress.total.unwrap_or_default()
    );
    Ok(())
}
