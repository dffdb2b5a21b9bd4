//! Browser backends: `localStorage`, the Fullscreen API, and console logging.

use fc_core::error::StorageError;
use fc_core::persist::Storage;
use fc_editor::fullscreen::Fullscreen;
use wasm_bindgen::JsValue;

fn js_message(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{e:?}"))
}

// ─── localStorage ────────────────────────────────────────────────────────

/// `window.localStorage` as a canvas storage backend.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// Fails when there is no window or storage is disabled (private mode,
    /// sandboxed iframe).
    pub fn open() -> Result<Self, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Backend("no window".to_string()))?;
        let inner = window
            .local_storage()
            .map_err(|e| StorageError::Backend(js_message(e)))?
            .ok_or_else(|| StorageError::Backend("localStorage is disabled".to_string()))?;
        Ok(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Backend(js_message(e)))
    }

    // QuotaExceededError surfaces here as a thrown DOMException
    fn save(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|e| StorageError::Backend(js_message(e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::Backend(js_message(e)))
    }
}

// ─── Fullscreen ──────────────────────────────────────────────────────────

/// The document's Fullscreen API, applied to the root element.
pub struct BrowserFullscreen {
    document: Option<web_sys::Document>,
}

impl BrowserFullscreen {
    pub fn new() -> Self {
        Self {
            document: web_sys::window().and_then(|w| w.document()),
        }
    }
}

impl Default for BrowserFullscreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Fullscreen for BrowserFullscreen {
    fn is_fullscreen(&self) -> bool {
        self.document
            .as_ref()
            .is_some_and(|d| d.fullscreen_element().is_some())
    }

    fn enter(&mut self) -> Result<(), String> {
        let root = self
            .document
            .as_ref()
            .and_then(|d| d.document_element())
            .ok_or_else(|| "no document element".to_string())?;
        root.request_fullscreen().map_err(js_message)
    }

    fn exit(&mut self) -> Result<(), String> {
        match &self.document {
            Some(document) => {
                document.exit_fullscreen();
                Ok(())
            }
            None => Err("no document".to_string()),
        }
    }
}

// ─── Console logging ─────────────────────────────────────────────────────

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let msg: JsValue = format!("[{}] {}", record.target(), record.args()).into();
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&msg),
            log::Level::Warn => web_sys::console::warn_1(&msg),
            log::Level::Info => web_sys::console::info_1(&msg),
            log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg),
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
static LOGGER: ConsoleLogger = ConsoleLogger;

/// Route `log` records to the browser console. Safe to call repeatedly.
pub fn console_log_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Info);
        }
    }
}
