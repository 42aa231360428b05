/// Join a collection endpoint and a record identifier with exactly one `/`
/// between them, whether or not the endpoint already ends in one.
pub fn join_endpoint(endpoint: &str, id: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        id.trim_start_matches('/')
    )
}

/// Absolute URL for `path` on the server at `base_url`
pub fn absolute_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
