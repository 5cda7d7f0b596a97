/*
events.rs

Copyright 2025 Hervé Quatremain

This file is part of Gridlink.

Gridlink is free software: you can redistribute it and/or modify it under the
terms of the GNU General Public License as published by the Free Software
Foundation, either version 3 of the License, or (at your option) any later
version.

Gridlink is distributed in the hope that it will be useful, but WITHOUT ANY
WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR
A PARTICULAR PURPOSE. See the GNU General Public License for more details.

You should have received a copy of the GNU General Public License along with
Gridlink. If not, see <https://www.gnu.org/licenses/>.

SPDX-License-Identifier: GPL-3.0-or-later
*/

//! Events emitted by the path engine.
//!
//! Consumers, such as the rendering layer, subscribe to a specific [`EventKind`], to every
//! event, or receive the events over a channel. Each [`Event`] carries the data needed to
//! redraw the affected path without querying the full state.

use log::debug;
use std::collections::HashMap;
use std::fmt;

use crate::grid::Position;
use crate::path_engine::DrawnPath;

/// Event kinds, used to subscribe to a single kind of event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    PathStarted,
    PathExtended,
    PathTruncated,
    PathCompleted,
    PathCancelled,
    LevelComplete,
    UndoApplied,
    SessionReset,
}

/// Event emitted after a change of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A path started on its lower point.
    PathStarted { number: usize, start: Position },

    /// A cell was added to the active path.
    PathExtended { number: usize, cell: Position },

    /// The player went back over the active path. `removed` lists the released cells.
    PathTruncated {
        number: usize,
        end: Position,
        removed: Vec<Position>,
    },

    /// The active path reached the next point and was committed.
    PathCompleted { path: DrawnPath },

    /// The active path was discarded. `released` lists the cells that are free again.
    PathCancelled {
        number: usize,
        released: Vec<Position>,
    },

    /// All the points are connected.
    LevelComplete { point_count: usize },

    /// The last commit was undone.
    UndoApplied {
        current_number: usize,
        committed: Vec<DrawnPath>,
    },

    /// The session went back to its initial state.
    SessionReset { current_number: usize },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::PathStarted { .. } => EventKind::PathStarted,
            Event::PathExtended { .. } => EventKind::PathExtended,
            Event::PathTruncated { .. } => EventKind::PathTruncated,
            Event::PathCompleted { .. } => EventKind::PathCompleted,
            Event::PathCancelled { .. } => EventKind::PathCancelled,
            Event::LevelComplete { .. } => EventKind::LevelComplete,
            Event::UndoApplied { .. } => EventKind::UndoApplied,
            Event::SessionReset { .. } => EventKind::SessionReset,
        }
    }
}

/// Identifier returned when subscribing, used to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Event)>;

/// Dispatch events to the listeners.
///
/// Listeners registered for a kind receive the events of that kind, then the catch-all
/// listeners receive every event, then the channels.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: HashMap<EventKind, Vec<(SubscriptionId, Listener)>>,
    any_listeners: Vec<(SubscriptionId, Listener)>,
    channels: Vec<async_channel::Sender<Event>>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("EventBus")
            .field(
                "listeners",
                &self.listeners.values().map(Vec::len).sum::<usize>(),
            )
            .field("any_listeners", &self.any_listeners.len())
            .field("channels", &self.channels.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    /// Call `listener` for each event of the given kind.
    pub fn subscribe<F>(&mut self, kind: EventKind, listener: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        let id: SubscriptionId = self.next_id();
        self.listeners
            .entry(kind)
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Call `listener` for every event.
    pub fn subscribe_all<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Event) + 'static,
    {
        let id: SubscriptionId = self.next_id();
        self.any_listeners.push((id, Box::new(listener)));
        id
    }

    /// Return a channel that receives a copy of every event.
    ///
    /// The channel is dropped from the bus once the receiver is closed.
    pub fn channel(&mut self) -> async_channel::Receiver<Event> {
        let (sender, receiver) = async_channel::unbounded::<Event>();
        self.channels.push(sender);
        receiver
    }

    /// Remove a listener. Return whether the listener was found.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before: usize = self.listener_count();
        for listeners in self.listeners.values_mut() {
            listeners.retain(|(i, _)| *i != id);
        }
        self.any_listeners.retain(|(i, _)| *i != id);
        self.listener_count() != before
    }

    /// Number of registered callbacks, channels excluded.
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum::<usize>() + self.any_listeners.len()
    }

    /// Deliver an event to the listeners of its kind, to the catch-all listeners, and to the
    /// channels.
    pub fn emit(&mut self, event: Event) {
        debug!("Event: {event:?}");
        if let Some(listeners) = self.listeners.get_mut(&event.kind()) {
            for (_, listener) in listeners.iter_mut() {
                listener(&event);
            }
        }
        for (_, listener) in &mut self.any_listeners {
            listener(&event);
        }
        self.channels
            .retain(|sender| sender.try_send(event.clone()).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn specific_and_catch_all_listeners_both_fire() {
        let mut bus = EventBus::new();
        let started: Rc<RefCell<Vec<Event>>> = Rc::default();
        let all: Rc<RefCell<Vec<EventKind>>> = Rc::default();

        let s = Rc::clone(&started);
        bus.subscribe(EventKind::PathStarted, move |e| s.borrow_mut().push(e.clone()));
        let a = Rc::clone(&all);
        bus.subscribe_all(move |e| a.borrow_mut().push(e.kind()));

        bus.emit(Event::PathStarted {
            number: 1,
            start: Position::new(0, 0),
        });
        bus.emit(Event::SessionReset { current_number: 1 });

        assert_eq!(started.borrow().len(), 1);
        assert_eq!(
            *all.borrow(),
            vec![EventKind::PathStarted, EventKind::SessionReset]
        );
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let count: Rc<RefCell<usize>> = Rc::default();
        let c = Rc::clone(&count);
        let id: SubscriptionId = bus.subscribe_all(move |_| *c.borrow_mut() += 1);

        bus.emit(Event::SessionReset { current_number: 1 });
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(Event::SessionReset { current_number: 1 });

        assert_eq!(*count.borrow(), 1);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn channel_receives_events_until_closed() {
        let mut bus = EventBus::new();
        let receiver = bus.channel();
        bus.emit(Event::LevelComplete { point_count: 2 });
        assert_eq!(
            receiver.try_recv(),
            Ok(Event::LevelComplete { point_count: 2 })
        );

        drop(receiver);
        bus.emit(Event::LevelComplete { point_count: 2 });
        assert_eq!(bus.channels.len(), 0);
    }
}
