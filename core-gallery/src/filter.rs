//! Entry filtering and path normalization for the indexer.

use bridge_traits::storage::RemoteEntry;

/// Extensions the gallery renders, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

/// Whether `name` ends in `.jpeg`, `.jpg`, `.png` or `.gif`, in any case.
pub fn is_image_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate)),
        None => false,
    }
}

/// Files with an image extension. Folders and deleted entries never qualify.
pub fn is_gallery_image(entry: &RemoteEntry) -> bool {
    entry.is_file() && is_image_name(&entry.name)
}

/// Normalize a folder path for the listing call.
///
/// The root is the empty string. Anything else gets exactly one leading `/`
/// and no trailing `/`.
pub fn normalize_folder_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}
