//! Typed event bus
//!
//! Layout changes and pointer-driven notifications fan out to subscribers
//! through a closed set of event kinds. Subscribers register per kind and
//! are invoked in registration order; there is no ordering guarantee beyond
//! that. The bus is owned by the coordinator and torn down with it.

use crate::layout::LabelId;
use crate::selection::SelectionRange;

/// Everything the engine broadcasts to the rendering layer and to callers.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutEvent {
    /// A row reserved additional height; entities at or below it shifted down
    RowGrew { row_index: usize, height: f64 },
    /// The total document height changed
    ContentResized { height: f64 },
    /// The in-flight selection covers a new range
    SelectionChanged { range: SelectionRange },
    /// The selection highlight was dropped
    SelectionCleared,
    /// A label box was clicked
    LabelClicked { id: LabelId },
    /// A path caption was clicked
    PathClicked {
        start: LabelId,
        end: LabelId,
        text: String,
    },
}

impl LayoutEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LayoutEvent::RowGrew { .. } => EventKind::RowGrew,
            LayoutEvent::ContentResized { .. } => EventKind::ContentResized,
            LayoutEvent::SelectionChanged { .. } => EventKind::SelectionChanged,
            LayoutEvent::SelectionCleared => EventKind::SelectionCleared,
            LayoutEvent::LabelClicked { .. } => EventKind::LabelClicked,
            LayoutEvent::PathClicked { .. } => EventKind::PathClicked,
        }
    }
}

/// Discriminant used for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    RowGrew,
    ContentResized,
    SelectionChanged,
    SelectionCleared,
    LabelClicked,
    PathClicked,
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberId(u64);

struct Subscriber {
    id: SubscriberId,
    kind: EventKind,
    callback: Box<dyn FnMut(&LayoutEvent)>,
}

/// Per-kind subscriber list with registration-order dispatch.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event kind.
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&LayoutEvent) + 'static,
    ) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            callback: Box::new(callback),
        });
        id
    }

    /// Drop one subscription. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        self.subscribers.retain(|subscriber| subscriber.id != id);
    }

    /// Deliver an event to every matching subscriber, in registration order.
    pub fn emit(&mut self, event: &LayoutEvent) {
        let kind = event.kind();
        for subscriber in &mut self.subscribers {
            if subscriber.kind == kind {
                (subscriber.callback)(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_subscribe_and_emit() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(EventKind::RowGrew, move |event| {
            if let LayoutEvent::RowGrew { row_index, .. } = event {
                sink.borrow_mut().push(*row_index);
            }
        });

        bus.emit(&LayoutEvent::RowGrew {
            row_index: 3,
            height: 19.0,
        });
        bus.emit(&LayoutEvent::SelectionCleared);

        assert_eq!(*seen.borrow(), vec![3]);
    }

    #[test]
    fn test_dispatch_in_registration_order() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second", "third"] {
            let sink = Rc::clone(&order);
            bus.subscribe(EventKind::SelectionCleared, move |_| {
                sink.borrow_mut().push(tag);
            });
        }

        bus.emit(&LayoutEvent::SelectionCleared);
        assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let id = bus.subscribe(EventKind::SelectionCleared, move |_| {
            *sink.borrow_mut() += 1;
        });

        bus.emit(&LayoutEvent::SelectionCleared);
        bus.unsubscribe(id);
        bus.emit(&LayoutEvent::SelectionCleared);

        assert_eq!(*count.borrow(), 1);
    }
}
