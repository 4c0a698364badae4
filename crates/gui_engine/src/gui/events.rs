//! Widget events
//! Key principles:
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Registration system (only notify interested handlers)
//! - Queued delivery: widgets raise events during the frame, the manager
//!   dispatches them after the widget has been updated

use crate::foundation::collections::WidgetId;
use crate::foundation::rect::Rect2I;
use std::collections::HashMap;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetEventType {
    /// The widget's render target or viewport changed size
    TargetResized,
    /// The window behind the render target gained or lost focus
    WindowFocusChanged,
}

/// Event raised by a widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    /// New root panel area
    TargetResized {
        /// Widget that raised the event
        widget: WidgetId,
        /// New viewport area, empty when the camera is gone
        area: Rect2I,
    },
    /// New focus state
    WindowFocusChanged {
        /// Widget that raised the event
        widget: WidgetId,
        /// Whether the window now has focus
        focused: bool,
    },
}

impl WidgetEvent {
    /// Type of event
    pub fn event_type(&self) -> WidgetEventType {
        match self {
            WidgetEvent::TargetResized { .. } => WidgetEventType::TargetResized,
            WidgetEvent::WindowFocusChanged { .. } => WidgetEventType::WindowFocusChanged,
        }
    }

    /// Widget that raised the event
    pub fn widget(&self) -> WidgetId {
        match self {
            WidgetEvent::TargetResized { widget, .. } | WidgetEvent::WindowFocusChanged { widget, .. } => *widget,
        }
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
pub trait WidgetEventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &WidgetEvent) -> bool;
}

impl<F> WidgetEventHandler for F
where
    F: FnMut(&WidgetEvent) -> bool,
{
    fn on_event(&mut self, event: &WidgetEvent) -> bool {
        self(event)
    }
}

/// Per-widget event queue with registered handlers
#[derive(Default)]
pub struct WidgetEventSystem {
    queue: Vec<WidgetEvent>,
    handlers: HashMap<WidgetEventType, Vec<Box<dyn WidgetEventHandler>>>,
}

impl std::fmt::Debug for WidgetEventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetEventSystem")
            .field("queue", &self.queue)
            .field("handler_types", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl WidgetEventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event type
    pub fn register_handler(&mut self, event_type: WidgetEventType, handler: Box<dyn WidgetEventHandler>) {
        self.handlers.entry(event_type).or_default().push(handler);
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: WidgetEvent) {
        self.queue.push(event);
    }

    /// Events waiting for dispatch
    pub fn pending(&self) -> &[WidgetEvent] {
        &self.queue
    }

    /// Deliver all queued events; returns how many were delivered
    pub fn dispatch(&mut self) -> usize {
        let queued = std::mem::take(&mut self.queue);
        let count = queued.len();

        for event in &queued {
            if let Some(handlers) = self.handlers.get_mut(&event.event_type()) {
                for handler in handlers.iter_mut() {
                    if handler.on_event(event) {
                        break;
                    }
                }
            }
        }

        count
    }

    /// Clear all queued events
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
