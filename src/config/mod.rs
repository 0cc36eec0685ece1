//! Persisted user preferences.
//!
//! One flat key/value document covers window geometry, proxy settings and
//! the display toggles injected into the hosted page. `store` owns the
//! load/save round-trip; `proxy` derives webview proxy settings from it.

pub mod proxy;
pub mod store;

pub use proxy::ProxySettings;
pub use store::{keys, ConfigStore, SaveErrorHook};
