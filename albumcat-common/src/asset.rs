//! Cover image naming
//!
//! Uploaded covers are stored as `<epoch-ms>-<sanitized-original-name>` and
//! served under `/covers/`.

/// URL prefix the host serves the covers directory under
pub const COVERS_URL_PREFIX: &str = "/covers";

/// Replace every character outside `[a-zA-Z0-9.]` with `_`
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect()
}

/// Stored file name for an upload received at `now_ms`
pub fn generated_name(now_ms: i64, original: &str) -> String {
    format!("{}-{}", now_ms, sanitize_filename(original))
}

/// Public URL of a stored cover
pub fn cover_url(stored_name: &str) -> String {
    format!("{}/{}", COVERS_URL_PREFIX, stored_name)
}
