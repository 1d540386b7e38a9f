//! Attribute model with synchronous change notification.
//!
//! A [`WidgetModel`] is a bag of JSON attributes shared between a view and the
//! code that configures it. Views register callbacks keyed by event name
//! (`"change:<attribute>"`, or `"change"` for any attribute) and are called
//! synchronously, in registration order, whenever `set` changes a value.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::error::Result;

pub type ListenerId = u64;

/// Callback invoked with the model and the new attribute value.
pub type ChangeCallback = Arc<dyn Fn(&WidgetModel, &Value) + Send + Sync>;

pub const COLOR: &str = "color";
pub const VISIBLE: &str = "visible";
pub const SELECTED: &str = "selected";

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Default)]
pub struct WidgetModel {
    inner: Arc<Mutex<ModelInner>>,
}

#[derive(Default)]
struct ModelInner {
    attrs: BTreeMap<String, Value>,
    listeners: Vec<Listener>,
}

struct Listener {
    id: ListenerId,
    event: String,
    callback: ChangeCallback,
}

impl WidgetModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attrs<I, K>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let model = Self::new();
        {
            let mut inner = model.lock();
            for (k, v) in attrs {
                inner.attrs.insert(k.into(), v);
            }
        }
        model
    }

    fn lock(&self) -> MutexGuard<'_, ModelInner> {
        // Listeners never run under the lock.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.lock().attrs.get(name).cloned()
    }

    /// Set an attribute. Listeners run only when the stored value actually changes.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> bool {
        let value = value.into();
        let callbacks: Vec<ChangeCallback> = {
            let mut inner = self.lock();
            if inner.attrs.get(name) == Some(&value) {
                return false;
            }
            inner.attrs.insert(name.to_string(), value.clone());
            let specific = format!("change:{}", name);
            inner
                .listeners
                .iter()
                .filter(|l| l.event == specific || l.event == "change")
                .map(|l| Arc::clone(&l.callback))
                .collect()
        };
        log::trace!("model attribute '{}' changed to {}", name, value);
        for cb in callbacks {
            cb(self, &value);
        }
        true
    }

    /// Register `callback` for `event` (e.g. `"change:color"`).
    pub fn listen_to<F>(&self, event: &str, callback: F) -> ListenerId
    where
        F: Fn(&WidgetModel, &Value) + Send + Sync + 'static,
    {
        let id = NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed);
        self.lock().listeners.push(Listener {
            id,
            event: event.to_string(),
            callback: Arc::new(callback),
        });
        id
    }

    pub fn stop_listening(&self, id: ListenerId) -> bool {
        let mut inner = self.lock();
        let before = inner.listeners.len();
        inner.listeners.retain(|l| l.id != id);
        inner.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    // ── typed accessors ─────────────────────────────────────────────────

    /// Configured color; empty strings and non-strings read as unset.
    pub fn color(&self) -> Option<String> {
        match self.get(COLOR) {
            Some(Value::String(s)) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    pub fn set_color(&self, color: Option<&str>) -> bool {
        match color {
            Some(c) => self.set(COLOR, c),
            None => self.set(COLOR, Value::Null),
        }
    }

    pub fn visible(&self) -> bool {
        self.get(VISIBLE).and_then(|v| v.as_bool()).unwrap_or(true)
    }

    pub fn set_visible(&self, visible: bool) -> bool {
        self.set(VISIBLE, visible)
    }

    pub fn selected(&self) -> Vec<usize> {
        self.get(SELECTED)
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    pub fn set_selected(&self, indices: &[usize]) -> bool {
        self.set(SELECTED, Value::from(indices.to_vec()))
    }

    // ── state persistence ───────────────────────────────────────────────

    /// Serialize the attributes (not the listeners) as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.lock().attrs)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let attrs: BTreeMap<String, Value> = serde_json::from_str(json)?;
        Ok(Self::with_attrs(attrs))
    }
}

impl std::fmt::Debug for WidgetModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("WidgetModel")
            .field("attrs", &inner.attrs)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}
