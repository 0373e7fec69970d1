//! Lore text loading

use std::path::Path;

/// Read the lore text shown on the lore screen
///
/// A missing or unreadable file is reported and yields an empty text, so the
/// lore screen simply shows nothing.
pub fn load_lore_text<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    match std::fs::read_to_string(path) {
        Ok(text) => {
            log::debug!("Loaded {} characters of lore from {}", text.chars().count(), path.display());
            text
        }
        Err(e) => {
            log::error!("Failed to read lore text {}: {}", path.display(), e);
            String::new()
        }
    }
}
