/// Utility helpers used by the collector and the CSV writer.
///
/// This module contains:
/// - Photo size token substitution
/// - Randomized page delay
/// - CSV field escaping
/// - TLS crypto provider setup
///
/// IMPORTANT:
/// - No network or file I/O lives here.
///

use std::time::Duration;

use rustls::crypto::{CryptoProvider, ring};

/// Install the `ring` provider as the process-wide rustls default.
///
/// rustls >= 0.23 requires an explicit CryptoProvider when more than
/// one backend is compiled in. Must run before the first HTTP client
/// is built. Calling it again is a no-op.
///
pub fn install_crypto_provider() {
    // Err only means a provider is already installed
    let _ = CryptoProvider::install_default(ring::default_provider());
}

/// Swap the size token of a photo URL for a larger variant.
///
/// Examples:
/// - (".../photos/1/square.jpg", "square", "medium") -> ".../photos/1/medium.jpg"
/// - (".../photos/1/large.jpg",  "square", "medium") -> unchanged
///
/// This is a plain substring replacement over every occurrence,
/// not content negotiation with the image host.
///
pub fn resize_photo_url(url: &str, default_token: &str, target_token: &str) -> String {
    url.replace(default_token, target_token)
}

/// Delay to wait after a page: `base` plus uniform jitter in [0, jitter).
pub fn page_delay(base: Duration, jitter: Duration) -> Duration {
    base + jitter.mul_f64(rand::random::<f64>())
}

/// Escape a value for CSV: wrap in quotes if it contains a comma, quote, or newline.
pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
