//! Upload file naming rules.
//!
//! Turns an untrusted client file name plus a declared content type into a
//! disk-safe name: a single path component, carrying an extension when one can be
//! inferred, prefixed with the epoch-millisecond timestamp of the upload.

use chrono::{DateTime, Utc};

use crate::constants::{DEFAULT_CONTENT_TYPE, MAX_FILE_NAME_BYTES, SYNTHESIZED_NAME_PREFIX};

/// Content types with a known extension. Lookup keys are normalized MIME types.
pub const MIME_EXTENSIONS: &[(&str, &str)] = &[
    ("video/mp4", ".mp4"),
    ("video/mpeg", ".mpeg"),
    ("video/quicktime", ".mov"),
    ("video/x-msvideo", ".avi"),
    ("video/webm", ".webm"),
    ("image/jpeg", ".jpg"),
    ("image/png", ".png"),
    ("image/gif", ".gif"),
    ("application/pdf", ".pdf"),
    ("application/zip", ".zip"),
];

/// Normalize MIME type by stripping parameters (e.g. "video/mp4; codecs=avc1" -> "video/mp4").
pub fn normalize_content_type(content_type: &str) -> String {
    let normalized = content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or_default()
        .to_lowercase();

    if normalized.is_empty() {
        DEFAULT_CONTENT_TYPE.to_string()
    } else {
        normalized
    }
}

/// Extension (with leading dot) for a content type, if it is in [`MIME_EXTENSIONS`].
pub fn extension_for_content_type(content_type: &str) -> Option<&'static str> {
    let normalized = normalize_content_type(content_type);
    MIME_EXTENSIONS
        .iter()
        .find(|(mime, _)| *mime == normalized)
        .map(|(_, ext)| *ext)
}

/// True when the name has a non-empty stem and a non-empty suffix around its last dot.
///
/// Stricter than a plain "contains a dot" test on purpose: dotfiles such as `.bashrc`
/// and names ending in a dot count as having no extension, so a known content type
/// still contributes one (`.bashrc` + `video/mp4` → `.bashrc.mp4`).
pub fn has_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .unwrap_or(false)
}

/// Reduce a client-supplied name to a single safe path component.
///
/// Directory parts (either separator style) are discarded, control characters are
/// dropped, and surrounding whitespace and trailing dots are trimmed. Returns `None`
/// when nothing usable remains, e.g. for `..` or `/`.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = last.chars().filter(|c| !c.is_control()).collect();
    let cleaned = cleaned.trim().trim_end_matches('.').trim_end();

    if cleaned.is_empty() {
        return None;
    }

    Some(truncate_keeping_extension(cleaned, MAX_FILE_NAME_BYTES))
}

/// Build the on-disk name for an upload completing processing at `now`.
///
/// `upload-<millis>` stands in for a missing or unusable suggestion; a known
/// extension is appended when the name has none; the result is prefixed with
/// `<millis>-`.
pub fn derive_stored_name(
    suggested: Option<&str>,
    content_type: &str,
    now: DateTime<Utc>,
) -> String {
    let millis = now.timestamp_millis();

    let mut name = suggested
        .and_then(sanitize_file_name)
        .unwrap_or_else(|| format!("{}-{}", SYNTHESIZED_NAME_PREFIX, millis));

    if !has_extension(&name) {
        if let Some(ext) = extension_for_content_type(content_type) {
            name.push_str(ext);
        }
    }

    format!("{}-{}", millis, name)
}

fn truncate_keeping_extension(name: &str, max_bytes: usize) -> String {
    if name.len() <= max_bytes {
        return name.to_string();
    }

    if let Some((stem, ext)) = name.rsplit_once('.') {
        // Extensions longer than a quarter of the budget are not worth preserving
        if !stem.is_empty() && ext.len() + 1 < max_bytes / 4 {
            let stem = truncate_on_char_boundary(stem, max_bytes - ext.len() - 1);
            return format!("{}.{}", stem, ext);
        }
    }

    truncate_on_char_boundary(name, max_bytes).to_string()
}

fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
