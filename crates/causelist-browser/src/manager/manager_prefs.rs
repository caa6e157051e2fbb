//! Chrome profile preferences.
//!
//! Chrome only honours download preferences that are present in the
//! profile's `Default/Preferences` file when it starts, so they are merged
//! into that file before launch.

use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tracing::{debug, warn};

use super::BrowserError;

/// Path of the preferences file inside a user data directory.
pub(super) fn preferences_path(profile_dir: &Path) -> PathBuf {
    profile_dir.join("Default").join("Preferences")
}

/// Merge the download preferences into `existing`, keeping every other key.
pub(super) fn merge_preferences(existing: Value, download_dir: Option<&Path>) -> Value {
    let mut root = if existing.is_object() {
        existing
    } else {
        json!({})
    };

    set(&mut root, &["plugins", "always_open_pdf_externally"], json!(true));
    set(&mut root, &["download", "prompt_for_download"], json!(false));
    set(&mut root, &["download", "directory_upgrade"], json!(true));
    // Several PDFs are fetched from one page.
    set(
        &mut root,
        &["profile", "default_content_setting_values", "automatic_downloads"],
        json!(1),
    );
    if let Some(dir) = download_dir {
        set(
            &mut root,
            &["download", "default_directory"],
            json!(dir.display().to_string()),
        );
    }

    root
}

fn set(root: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut node = root;
    for key in parents {
        if !node[*key].is_object() {
            node[*key] = json!({});
        }
        node = &mut node[*key];
    }
    node[*last] = value;
}

/// Write the download preferences into the profile at `profile_dir`.
pub(super) fn write_preferences(
    profile_dir: &Path,
    download_dir: Option<&Path>,
) -> Result<(), BrowserError> {
    let path = preferences_path(profile_dir);

    let existing = match std::fs::read_to_string(&path) {
        Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring unreadable Chrome preferences {}: {}", path.display(), e);
            Value::Null
        }),
        Err(_) => Value::Null,
    };

    let merged = merge_preferences(existing, download_dir);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| BrowserError::Profile(format!("{}: {}", parent.display(), e)))?;
    }
    let text = serde_json::to_string(&merged)
        .map_err(|e| BrowserError::Profile(e.to_string()))?;
    std::fs::write(&path, text)
        .map_err(|e| BrowserError::Profile(format!("{}: {}", path.display(), e)))?;

    debug!("Wrote Chrome preferences to {}", path.display());
    Ok(())
}
