//! Event stream of a lasso selector.
//!
//! Callers can subscribe to selector activity via [`EventController`]. Each
//! event carries a set of [`EventKind`] flags (bitflags-style) so that a
//! single occurrence can match several categories (closing a lasso that
//! encloses points is both `LASSO_CLOSED` and `SELECTION_CHANGED`).
//!
//! The caller specifies an [`EventFilter`] to receive only the events they
//! care about. The filter is a simple OR mask: an event is delivered when
//! `(event.kinds & filter) != 0`.

use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

// ─────────────────────────────────────────────────────────────────────────────
// EventKind – bitflags
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventKind(pub u64);

impl EventKind {
    // ── Gesture ─────────────────────────────────────────────────────────
    /// A drag started and a new lasso element was created.
    pub const LASSO_STARTED: Self = Self(1 << 0);
    /// A drag ended and its lasso was closed and kept.
    pub const LASSO_CLOSED: Self = Self(1 << 1);
    /// A drag ended without enclosing any point; its lasso was removed.
    pub const LASSO_DISCARDED: Self = Self(1 << 2);

    // ── Lasso management ────────────────────────────────────────────────
    /// A lasso was clicked and its `selected` flag flipped.
    pub const LASSO_TOGGLED: Self = Self(1 << 3);
    /// A selected lasso was deleted from the keyboard.
    pub const LASSO_DELETED: Self = Self(1 << 4);
    /// Mark membership changed (a lasso was closed over points or deleted).
    pub const SELECTION_CHANGED: Self = Self(1 << 5);

    // ── Appearance / layout ─────────────────────────────────────────────
    /// The lasso stroke color was changed.
    pub const COLOR_CHANGED: Self = Self(1 << 6);
    /// The selector overlay was resized.
    pub const RESIZE: Self = Self(1 << 7);

    // ── Lifecycle ───────────────────────────────────────────────────────
    /// Mark views and scales are ready; interaction is enabled.
    pub const READY: Self = Self(1 << 8);
    /// A key press reached the selector.
    pub const KEY_PRESSED: Self = Self(1 << 9);
    /// The surface was exported (SVG or PNG).
    pub const EXPORT: Self = Self(1 << 10);

    /// Wildcard: matches *every* event kind.
    pub const ALL: Self = Self(u64::MAX);

    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check whether `self` contains all bits in `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for EventKind {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for EventKind {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for EventKind {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// String conversions
// ─────────────────────────────────────────────────────────────────────────────

const KIND_NAMES: &[(EventKind, &str)] = &[
    (EventKind::LASSO_STARTED, "LASSO_STARTED"),
    (EventKind::LASSO_CLOSED, "LASSO_CLOSED"),
    (EventKind::LASSO_DISCARDED, "LASSO_DISCARDED"),
    (EventKind::LASSO_TOGGLED, "LASSO_TOGGLED"),
    (EventKind::LASSO_DELETED, "LASSO_DELETED"),
    (EventKind::SELECTION_CHANGED, "SELECTION_CHANGED"),
    (EventKind::COLOR_CHANGED, "COLOR_CHANGED"),
    (EventKind::RESIZE, "RESIZE"),
    (EventKind::READY, "READY"),
    (EventKind::KEY_PRESSED, "KEY_PRESSED"),
    (EventKind::EXPORT, "EXPORT"),
];

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "EMPTY");
        }
        if *self == EventKind::ALL {
            return write!(f, "ALL");
        }

        let mut names = Vec::new();
        let mut known_bits: u64 = 0;
        for (kind, name) in KIND_NAMES {
            known_bits |= kind.0;
            if self.contains(*kind) {
                names.push((*name).to_string());
            }
        }

        let extra = self.0 & !known_bits;
        if extra != 0 {
            names.push(format!("0x{:x}", extra));
        }
        write!(f, "{}", names.join("|"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Metadata – per-event-type payloads
// ─────────────────────────────────────────────────────────────────────────────

/// Metadata for lasso lifecycle events.
#[derive(Debug, Clone, PartialEq)]
pub struct LassoMeta {
    /// Identifier of the lasso (`l<N>`).
    pub id: String,
    /// Number of vertices at the time of the event.
    pub vertex_count: usize,
    /// New `selected` display flag (toggle events only).
    pub selected: Option<bool>,
}

/// Metadata for resize events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeMeta {
    pub width: f32,
    pub height: f32,
}

/// Metadata for export events.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportMeta {
    /// "svg" or "png".
    pub format: String,
    pub path: Option<String>,
}

/// An event emitted by a lasso selector.
#[derive(Debug, Clone)]
pub struct SelectorEvent {
    /// Bitflag set of categories this event belongs to.
    pub kinds: EventKind,
    /// Seconds since the controller was created.
    pub timestamp: f64,

    pub lasso: Option<LassoMeta>,
    pub color: Option<String>,
    pub resize: Option<ResizeMeta>,
    pub key_code: Option<u32>,
    pub export: Option<ExportMeta>,
}

impl SelectorEvent {
    pub fn new(kinds: EventKind) -> Self {
        Self {
            kinds,
            timestamp: 0.0, // set by the controller
            lasso: None,
            color: None,
            resize: None,
            key_code: None,
            export: None,
        }
    }

    pub fn with_lasso(mut self, id: &str, vertex_count: usize, selected: Option<bool>) -> Self {
        self.lasso = Some(LassoMeta {
            id: id.to_string(),
            vertex_count,
            selected,
        });
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventFilter
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct EventFilter {
    pub mask: EventKind,
}

impl EventFilter {
    pub const fn all() -> Self {
        Self {
            mask: EventKind::ALL,
        }
    }

    pub const fn only(mask: EventKind) -> Self {
        Self { mask }
    }

    #[inline]
    pub fn matches(&self, event: &SelectorEvent) -> bool {
        event.kinds.intersects(self.mask)
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        Self::all()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// EventController
// ─────────────────────────────────────────────────────────────────────────────

struct Subscriber {
    filter: EventFilter,
    sender: Sender<SelectorEvent>,
}

/// Collects selector events and distributes them to subscribers.
///
/// Attach it with [`LassoSelector::with_events`](crate::LassoSelector::with_events),
/// then call [`subscribe`](Self::subscribe) to receive events on an `mpsc` channel.
#[derive(Clone)]
pub struct EventController {
    inner: Arc<Mutex<EventCtrlInner>>,
}

struct EventCtrlInner {
    subscribers: Vec<Subscriber>,
    start_instant: std::time::Instant,
}

impl EventController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventCtrlInner {
                subscribers: Vec::new(),
                start_instant: std::time::Instant::now(),
            })),
        }
    }

    pub fn subscribe(&self, filter: EventFilter) -> Receiver<SelectorEvent> {
        let (tx, rx) = std::sync::mpsc::channel();
        if let Ok(mut inner) = self.inner.lock() {
            inner.subscribers.push(Subscriber { filter, sender: tx });
        }
        rx
    }

    pub fn subscribe_all(&self) -> Receiver<SelectorEvent> {
        self.subscribe(EventFilter::all())
    }

    /// Send `event` to every subscriber whose filter matches.
    ///
    /// Subscribers whose receiver was dropped are pruned the next time an
    /// event matching their filter is emitted.
    pub fn emit(&self, mut event: SelectorEvent) {
        let Ok(mut inner) = self.inner.lock() else {
            return;
        };
        event.timestamp = inner.start_instant.elapsed().as_secs_f64();
        inner.subscribers.retain(|sub| {
            if sub.filter.matches(&event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                true
            }
        });
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().map(|i| i.subscribers.len()).unwrap_or(0)
    }
}

impl Default for EventController {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────────────────────────
