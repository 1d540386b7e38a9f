//! Drag gesture recognition.
//!
//! [`DragBehavior`] turns raw pointer events into a strict
//! start -> move* -> end sequence, in coordinates local to the overlay.

use egui::{Pos2, Vec2};

/// Raw pointer input, in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Pos2),
    Move(Pos2),
    Up(Pos2),
}

/// Recognized gesture step, in overlay-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start(Pos2),
    Move(Pos2),
    End(Pos2),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
}

#[derive(Debug, Clone, Default)]
pub struct DragBehavior {
    state: DragState,
    /// Screen position of the overlay's top-left corner.
    origin: Vec2,
}

impl DragBehavior {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    pub fn set_origin(&mut self, origin: Pos2) {
        self.origin = origin.to_vec2();
    }

    /// Feed one pointer event. Moves and releases outside a gesture, and a
    /// second press during one, produce nothing.
    pub fn on_pointer(&mut self, event: PointerEvent) -> Option<DragEvent> {
        match (self.state, event) {
            (DragState::Idle, PointerEvent::Down(p)) => {
                self.state = DragState::Dragging;
                Some(DragEvent::Start(p - self.origin))
            }
            (DragState::Dragging, PointerEvent::Move(p)) => Some(DragEvent::Move(p - self.origin)),
            (DragState::Dragging, PointerEvent::Up(p)) => {
                self.state = DragState::Idle;
                Some(DragEvent::End(p - self.origin))
            }
            _ => None,
        }
    }

    /// Pointer events implied by an egui response for this frame.
    pub fn pointer_events(response: &egui::Response) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        let pos = response
            .interact_pointer_pos()
            .or_else(|| response.hover_pos());
        if let Some(p) = pos {
            if response.drag_started_by(egui::PointerButton::Primary) {
                out.push(PointerEvent::Down(p));
            }
            if response.dragged_by(egui::PointerButton::Primary)
                && response.drag_delta() != Vec2::ZERO
            {
                out.push(PointerEvent::Move(p));
            }
        }
        // The release must always close the gesture, even if the pointer left the window.
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            out.push(PointerEvent::Up(pos.unwrap_or(response.rect.min)));
        }
        out
    }
}
