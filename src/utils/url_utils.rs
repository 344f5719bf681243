//! URL helpers shared by the canonicalizer, the discoverer and the submitter.

use url::Url;

/// Check if a URL is an absolute http(s) URL
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https"),
        Err(_) => false,
    }
}

/// Collapse a host name to its last two labels
///
/// `media.redgifs.com` becomes `redgifs.com`. Hosts with fewer than two
/// labels are returned unchanged.
#[must_use]
pub fn registrable_host(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }
    labels[labels.len() - 2..].join(".")
}

/// Upgrade a protocol-relative reference (`//host/path`) to https
#[must_use]
pub fn absolutize_protocol_relative(candidate: &str) -> String {
    if candidate.starts_with("//") {
        format!("https:{candidate}")
    } else {
        candidate.to_string()
    }
}

/// Build the save URL for a target: `<endpoint>/<percent-encoded target>`
#[must_use]
pub fn save_url(endpoint: &str, target: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        urlencoding::encode(target)
    )
}
