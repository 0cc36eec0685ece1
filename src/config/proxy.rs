//! Proxy resolution from the preference store.
//!
//! The store carries a toggle plus separate HTTP and HTTPS endpoints; the
//! webview session takes a single proxy URL. The HTTPS endpoint inherits
//! the HTTP value when not configured explicitly, and a malformed endpoint
//! degrades to "no proxy" rather than surfacing an error.

use tauri::Url;

use crate::config::keys;
use crate::config::ConfigStore;
use crate::error::{ShellError, ShellResult};

/// Resolved proxy endpoints, after fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub http: String,
    pub https: String,
}

impl ProxySettings {
    /// Resolve proxy settings from the store.
    ///
    /// `None` unless the proxy toggle is set and an HTTP endpoint exists.
    /// A missing HTTPS endpoint is populated with the HTTP value.
    pub fn resolve(store: &ConfigStore) -> Option<Self> {
        if !store.get_flag(keys::USE_PROXY) {
            return None;
        }
        let http = store.get_str(keys::HTTP_PROXY)?.to_string();
        let https = store
            .get_str(keys::HTTPS_PROXY)
            .map(str::to_string)
            .unwrap_or_else(|| http.clone());
        Some(Self { http, https })
    }

    /// The URL applied to the webview session. The hosted page is
    /// HTTPS-only, so the HTTPS endpoint wins.
    pub fn webview_proxy_url(&self) -> ShellResult<Url> {
        endpoint_to_url(&self.https)
    }
}

/// Turn a configured endpoint (`host:port` or a full URL) into a proxy URL.
fn endpoint_to_url(endpoint: &str) -> ShellResult<Url> {
    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };
    Url::parse(&candidate).map_err(|e| ShellError::InvalidProxy(format!("{}: {}", endpoint, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, serde_json::Value)]) -> ConfigStore {
        let mut store = ConfigStore::new("unused.json");
        for (key, value) in entries {
            store.set(key, value.clone());
        }
        store
    }

    #[test]
    fn test_disabled_toggle_means_no_proxy() {
        let store = store_with(&[(keys::HTTP_PROXY, "127.0.0.1:8080".into())]);
        assert_eq!(ProxySettings::resolve(&store), None);
    }

    #[test]
    fn test_toggle_without_endpoint_means_no_proxy() {
        let store = store_with(&[(keys::USE_PROXY, true.into())]);
        assert_eq!(ProxySettings::resolve(&store), None);
    }

    #[test]
    fn test_https_falls_back_to_http() {
        let store = store_with(&[
            (keys::USE_PROXY, true.into()),
            (keys::HTTP_PROXY, "proxy.local:3128".into()),
        ]);
        let settings = ProxySettings::resolve(&store).unwrap();
        assert_eq!(settings.http, "proxy.local:3128");
        assert_eq!(settings.https, "proxy.local:3128");
    }

    #[test]
    fn test_explicit_https_wins() {
        let store = store_with(&[
            (keys::USE_PROXY, true.into()),
            (keys::HTTP_PROXY, "proxy.local:3128".into()),
            (keys::HTTPS_PROXY, "secure.local:3129".into()),
        ]);
        let settings = ProxySettings::resolve(&store).unwrap();
        assert_eq!(settings.https, "secure.local:3129");
    }

    #[test]
    fn test_bare_endpoint_gets_a_scheme() {
        let url = endpoint_to_url("proxy.local:3128").unwrap();
        assert_eq!(url.as_str(), "http://proxy.local:3128/");
    }

    #[test]
    fn test_full_url_endpoint_is_kept() {
        let url = endpoint_to_url("socks5://127.0.0.1:1080").unwrap();
        assert_eq!(url.scheme(), "socks5");
    }

    #[test]
    fn test_malformed_endpoint_is_an_error_not_a_panic() {
        assert!(endpoint_to_url("http://[broken").is_err());
    }
}
