use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use std::time::Duration;

pub struct HttpClientFactory;

impl HttpClientFactory {
    /// Creates a new HTTP client with retry middleware.
    ///
    /// Retries are exponential and only fire on transient failures
    /// (connect errors, timeouts, 5xx, 429).
    pub fn create_client(timeout: Duration, max_retries: u32) -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(max_retries);

        let client = Client::builder()
            .pool_max_idle_per_host(5)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(concat!("tickerpulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }
}

/// Append percent-encoded query parameters to `base_url`.
///
/// `ClientWithMiddleware` has no `.query()`, so adapters build the full URL.
pub fn build_url_with_query<K, V>(base_url: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = base_url.to_string();
    let mut separator = if base_url.contains('?') { '&' } else { '?' };

    for (key, value) in params {
        url.push(separator);
        percent_encode_into(&mut url, key.as_ref());
        url.push('=');
        percent_encode_into(&mut url, value.as_ref());
        separator = '&';
    }

    url
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
fn percent_encode_into(out: &mut String, s: &str) {
    for byte in s.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.' | b'~') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{:02X}", byte));
        }
    }
}
