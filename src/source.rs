use std::fs;

use crate::error::{LoadError, LoadResult};

/// Fetch the raw bytes of a book from a local path or an `http(s)` URL.
///
/// One attempt, no retries. Every failure is a transport failure.
pub fn fetch(location: &str) -> LoadResult<Vec<u8>> {
    if is_url(location) {
        fetch_url(location)
    } else {
        fs::read(location)
            .map_err(|e| LoadError::TransportFailure(format!("{}: {}", location, e)))
    }
}

fn is_url(location: &str) -> bool {
    let lower = location.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn fetch_url(url: &str) -> LoadResult<Vec<u8>> {
    log::debug!("fetching {}", url);
    let response = reqwest::blocking::get(url)
        .map_err(|e| LoadError::TransportFailure(format!("{}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::TransportFailure(format!(
            "{}: HTTP status {}",
            url, status
        )));
    }

    response
        .bytes()
        .map(|body| body.to_vec())
        .map_err(|e| LoadError::TransportFailure(format!("{}: {}", url, e)))
}
