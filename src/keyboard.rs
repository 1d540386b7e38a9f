//! Window-scoped keyboard dispatch.
//!
//! A [`KeyboardHub`] stands in for the window: the host forwards every key
//! press to it, and each mounted selector holds a [`KeyListener`] that
//! receives them regardless of focus. Dropping the listener unregisters it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::{Arc, Mutex};

/// Legacy DOM key code of the Delete key.
pub const DELETE_KEY_CODE: u32 = 46;
pub const BACKSPACE_KEY_CODE: u32 = 8;
pub const ESCAPE_KEY_CODE: u32 = 27;

/// A key press, identified by legacy key code plus an optional key name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key_code: u32,
    pub key: Option<String>,
}

impl KeyEvent {
    pub fn new(key_code: u32) -> Self {
        Self { key_code, key: None }
    }

    pub fn delete() -> Self {
        Self {
            key_code: DELETE_KEY_CODE,
            key: Some("Delete".to_string()),
        }
    }

    /// Matches the bound key code, or the platform name "Delete" when bound to Delete.
    pub fn matches_binding(&self, key_code: u32) -> bool {
        self.key_code == key_code
            || (key_code == DELETE_KEY_CODE && self.key.as_deref() == Some("Delete"))
    }

    pub fn from_egui(key: egui::Key) -> Option<Self> {
        key_code(key).map(|key_code| Self {
            key_code,
            key: Some(key.name().to_string()),
        })
    }
}

/// Legacy key code for the keys a selector may bind.
pub fn key_code(key: egui::Key) -> Option<u32> {
    use egui::Key;
    let code = match key {
        Key::Backspace => BACKSPACE_KEY_CODE,
        Key::Tab => 9,
        Key::Enter => 13,
        Key::Escape => ESCAPE_KEY_CODE,
        Key::Space => 32,
        Key::ArrowLeft => 37,
        Key::ArrowUp => 38,
        Key::ArrowRight => 39,
        Key::ArrowDown => 40,
        Key::Insert => 45,
        Key::Delete => DELETE_KEY_CODE,
        _ => return None,
    };
    Some(code)
}

struct Registration {
    id: u64,
    sender: Sender<KeyEvent>,
}

/// Shared key dispatcher. Cheap to clone; all clones address the same listeners.
#[derive(Clone, Default)]
pub struct KeyboardHub {
    inner: Arc<Mutex<HubInner>>,
}

#[derive(Default)]
struct HubInner {
    listeners: Vec<Registration>,
}

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

impl KeyboardHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Key presses dispatched from now on queue up in it.
    pub fn listen(&self) -> KeyListener {
        let (tx, rx) = std::sync::mpsc::channel();
        let id = NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut inner) = self.inner.lock() {
            inner.listeners.push(Registration { id, sender: tx });
        }
        KeyListener {
            id,
            rx,
            hub: self.clone(),
        }
    }

    /// Deliver a key press to every registered listener.
    pub fn dispatch(&self, event: KeyEvent) {
        if let Ok(mut inner) = self.inner.lock() {
            inner
                .listeners
                .retain(|reg| reg.sender.send(event.clone()).is_ok());
        }
    }

    /// Forward the key presses of this egui frame.
    pub fn forward_egui(&self, input: &egui::InputState) {
        for ev in &input.events {
            if let egui::Event::Key {
                key, pressed: true, ..
            } = ev
            {
                if let Some(k) = KeyEvent::from_egui(*key) {
                    self.dispatch(k);
                }
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().map(|i| i.listeners.len()).unwrap_or(0)
    }

    fn unregister(&self, id: u64) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.listeners.retain(|reg| reg.id != id);
        }
    }
}

/// Registration on a [`KeyboardHub`]; released on drop.
pub struct KeyListener {
    id: u64,
    rx: Receiver<KeyEvent>,
    hub: KeyboardHub,
}

impl KeyListener {
    /// Next queued key press, if any.
    pub fn try_next(&self) -> Option<KeyEvent> {
        match self.rx.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drain every queued key press.
    pub fn drain(&self) -> Vec<KeyEvent> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.hub.unregister(self.id);
    }
}
