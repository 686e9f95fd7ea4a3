/// Best-effort resolution of a stored image path to a URL.
///
/// Mirrors how the directory backend exposes credential photos: absolute
/// URLs and server-local paths pass through untouched, bucket-relative
/// paths are joined onto the configured public base URL. Returns `None`
/// rather than failing the surrounding lookup when nothing can be
/// resolved.
pub fn resolve_image_url(public_base_url: Option<&str>, path: Option<&str>) -> Option<String> {
    let path = path?.trim();
    if path.is_empty() {
        return None;
    }

    if path.starts_with("http://") || path.starts_with("https://") {
        return Some(path.to_string());
    }

    if path.starts_with('/') {
        return Some(path.to_string());
    }

    let base = public_base_url?.trim_end_matches('/');
    if base.is_empty() {
        return None;
    }

    Some(format!("{}/{}", base, path))
}
