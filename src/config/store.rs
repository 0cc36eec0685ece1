//! Persisted preference store.
//!
//! A flat key/value document (`settings.json` in the per-user app config
//! dir) holding window geometry, proxy settings and display toggles. The
//! whole document is loaded at startup and flushed on main-window close.
//!
//! Failure policy: a missing or corrupt document falls back atomically to
//! the built-in defaults (never a partial merge), and a failed save is
//! swallowed after being routed through an optional error hook. Losing
//! geometry or toggles is non-fatal to the shell.

use std::path::{Path, PathBuf};

use serde_json::{json, Map, Value};

use crate::error::{ShellError, ShellResult};

/// Preference keys. Names match the persisted document of earlier releases,
/// so existing settings files keep working.
pub mod keys {
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const POS_X: &str = "posX";
    pub const POS_Y: &str = "posY";
    pub const USE_PROXY: &str = "useProxy";
    pub const HTTP_PROXY: &str = "httpProxy";
    pub const HTTPS_PROXY: &str = "httpsProxy";
    pub const HIDE_AVATARS: &str = "hideAvatars";
    pub const HIDE_PREVIEWS: &str = "hidePreviews";
    pub const THUMB_SIZE: &str = "thumbSize";
}

/// Called when a save fails. Installing one lets a caller surface
/// persistence failures without changing the swallow-by-default behavior.
pub type SaveErrorHook = Box<dyn Fn(&ShellError) + Send + Sync>;

/// In-memory preference set backed by a JSON document on disk.
pub struct ConfigStore {
    path: PathBuf,
    values: Map<String, Value>,
    save_error_hook: Option<SaveErrorHook>,
}

impl ConfigStore {
    /// Create a store bound to `path`, initialized to the defaults.
    /// Call [`load`](Self::load) to pull in the persisted document.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            values: Self::defaults(),
            save_error_hook: None,
        }
    }

    /// The geometry defaults used when no valid document exists.
    fn defaults() -> Map<String, Value> {
        let mut map = Map::new();
        map.insert(keys::WIDTH.into(), json!(1000));
        map.insert(keys::HEIGHT.into(), json!(720));
        map.insert(keys::THUMB_SIZE.into(), json!(0));
        map
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Install a hook that observes save failures.
    pub fn set_save_error_hook(&mut self, hook: SaveErrorHook) {
        self.save_error_hook = Some(hook);
    }

    // ========================================================================
    // Load / save
    // ========================================================================

    /// Read the persisted document. Any read or parse failure replaces the
    /// in-memory state wholly with the defaults, so a corrupt or partially
    /// written file never produces a half-initialized set.
    pub fn load(&mut self) {
        self.values = match Self::read_document(&self.path) {
            Ok(values) => {
                log::debug!("[CONFIG] loaded {} keys from {:?}", values.len(), self.path);
                values
            }
            Err(e) => {
                log::info!("[CONFIG] using defaults ({})", e);
                Self::defaults()
            }
        };
    }

    fn read_document(path: &Path) -> ShellResult<Map<String, Value>> {
        let data = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&data)? {
            Value::Object(map) => Ok(map),
            other => Err(ShellError::Other(format!(
                "settings document is not an object: {}",
                other
            ))),
        }
    }

    /// Serialize the whole set and overwrite the persisted document.
    /// Failures are reported to the save-error hook (or logged) and
    /// swallowed; no retry.
    pub fn save(&self) {
        if let Err(e) = self.try_save() {
            match &self.save_error_hook {
                Some(hook) => hook(&e),
                None => log::warn!("[CONFIG] save failed: {}", e),
            }
        }
    }

    /// Fallible save, for callers that want the error.
    pub fn try_save(&self) -> ShellResult<()> {
        let data = serde_json::to_string(&Value::Object(self.values.clone()))?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The current value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Write `value` in place.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Remove `key` if present. Idempotent.
    pub fn unset(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Numeric view of a value; JSON integers and floats both qualify.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Truthy view of a value. Matching the loosely-typed documents written
    /// by earlier releases, a non-zero number and a non-empty string both
    /// count as set.
    pub fn get_flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
            Some(Value::String(s)) => !s.is_empty(),
            _ => false,
        }
    }

    /// String view of a value; `None` for missing or empty strings.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    /// Snapshot of the whole set, for the settings window.
    pub fn all(&self) -> Map<String, Value> {
        self.values.clone()
    }
}
