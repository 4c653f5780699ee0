//! URL helpers for resources served next to the application
//!
//! The dashboard is a static bundle; the only thing it loads from its own
//! origin is `config.toml` and static assets.

/// Base URL of the page (scheme, host and path up to the last `/`)
///
/// # Returns
/// - URL like "https://example.com/tracker/"
/// - Empty string if window is not available
pub fn origin_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let origin = location.origin().unwrap_or_default();
    let pathname = location.pathname().unwrap_or_else(|_| "/".to_string());
    format!("{}{}", origin, directory_of(&pathname))
}

/// Build a URL for a file served next to `index.html`
///
/// # Example
/// ```ignore
/// let url = origin_url("config.toml");
/// ```
pub fn origin_url(path: &str) -> String {
    format!("{}{}", origin_base(), path.trim_start_matches('/'))
}

/// `/tracker/index.html` -> `/tracker/`
fn directory_of(pathname: &str) -> &str {
    match pathname.rfind('/') {
        Some(pos) => &pathname[..=pos],
        None => "/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_of() {
        assert_eq!(directory_of("/tracker/index.html"), "/tracker/");
        assert_eq!(directory_of("/"), "/");
        assert_eq!(directory_of(""), "/");
    }
}
