// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounded in-memory log of routing decisions.
//!
//! Entries carry the log id of the gesture they belong to. A repeated event
//! (same gesture, same payload) bumps the repeat count of the newest entry
//! instead of taking a new slot, so a long run of Move events costs one entry.

use core::fmt;
use std::collections::VecDeque;

use crate::event::MotionAction;

/// Default number of retained entries.
pub const DEFAULT_CAPACITY: usize = 40;

/// A routing decision worth keeping for diagnostics.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GestureLogEvent {
    /// A new chain was installed.
    SetInputConsumer {
        /// Name of the chain, see [`Chain::name`](crate::consumer::Chain::name).
        name: String,
    },
    /// A motion event reached a non-idle chain.
    MotionEvent {
        /// Action of the event.
        action: MotionAction,
    },
    /// The router reset to its baseline.
    Reset,
    /// An inactivity callback did not match the active node and was ignored.
    StaleInactivity,
    /// A back action was reported.
    BackAction {
        /// The action completed.
        completed: bool,
        /// It came from the navigation bar button.
        is_button: bool,
    },
}

impl fmt::Display for GestureLogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetInputConsumer { name } => write!(f, "setInputConsumer: {name}"),
            Self::MotionEvent { action } => write!(f, "onMotionEvent: {}", action.label()),
            Self::Reset => f.write_str("reset"),
            Self::StaleInactivity => f.write_str("onConsumerInactive: stale"),
            Self::BackAction {
                completed,
                is_button,
            } => write!(f, "onBackAction: completed={completed} button={is_button}"),
        }
    }
}

/// One retained entry.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogEntry {
    /// Gesture the entry belongs to; `None` outside any gesture.
    pub log_id: Option<u32>,
    /// What happened.
    pub event: GestureLogEvent,
    /// How many consecutive times it happened.
    pub count: u32,
}

/// Ring buffer of [`LogEntry`] values plus the gesture log id counter.
#[derive(Clone, Debug)]
pub struct ActiveGestureLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
    next_log_id: u32,
    current_log_id: Option<u32>,
}

impl Default for ActiveGestureLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ActiveGestureLog {
    /// Create a log retaining at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_log_id: 0,
            current_log_id: None,
        }
    }

    /// Allocate the id of a new gesture and make it current.
    pub fn generate_and_set_log_id(&mut self) -> u32 {
        let id = self.next_log_id;
        self.next_log_id = self.next_log_id.wrapping_add(1);
        self.current_log_id = Some(id);
        id
    }

    /// Id of the current gesture.
    pub fn current_log_id(&self) -> Option<u32> {
        self.current_log_id
    }

    /// Append `event` under the current log id.
    pub fn add(&mut self, event: GestureLogEvent) {
        let log_id = self.current_log_id;
        if let Some(last) = self.entries.back_mut()
            && last.log_id == log_id
            && last.event == event
        {
            last.count = last.count.saturating_add(1);
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(LogEntry {
            log_id,
            event,
            count: 1,
        });
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl ExactSizeIterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. The log id counter keeps counting.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Write the retained entries, newest first.
    pub fn dump(&self, prefix: &str, out: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(out, "{prefix}TouchInteractionLog (count={}):", self.entries.len())?;
        for entry in self.entries.iter().rev() {
            write!(out, "{prefix}  ")?;
            match entry.log_id {
                Some(id) => write!(out, "[{id}] ")?,
                None => write!(out, "[-] ")?,
            }
            write!(out, "{}", entry.event)?;
            if entry.count > 1 {
                write!(out, " & {} similar events", entry.count - 1)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeats_are_folded() {
        let mut log = ActiveGestureLog::default();
        log.generate_and_set_log_id();
        for _ in 0..5 {
            log.add(GestureLogEvent::MotionEvent {
                action: MotionAction::Move,
            });
        }
        log.add(GestureLogEvent::MotionEvent {
            action: MotionAction::Up,
        });
        let entries: Vec<_> = log.entries().cloned().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].count, 5);
        assert_eq!(entries[1].count, 1);
    }

    #[test]
    fn same_event_in_new_gesture_is_new_entry() {
        let mut log = ActiveGestureLog::default();
        log.generate_and_set_log_id();
        log.add(GestureLogEvent::Reset);
        log.generate_and_set_log_id();
        log.add(GestureLogEvent::Reset);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn bounded_and_clearable() {
        let mut log = ActiveGestureLog::with_capacity(3);
        for _ in 0..10 {
            log.generate_and_set_log_id();
            log.add(GestureLogEvent::Reset);
        }
        assert_eq!(log.len(), 3);
        let ids: Vec<_> = log.entries().map(|e| e.log_id).collect();
        assert_eq!(ids, vec![Some(7), Some(8), Some(9)]);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.generate_and_set_log_id(), 10);
    }

    #[test]
    fn dump_is_newest_first() {
        let mut log = ActiveGestureLog::default();
        log.generate_and_set_log_id();
        log.add(GestureLogEvent::SetInputConsumer {
            name: "OTHER_ACTIVITY".into(),
        });
        log.add(GestureLogEvent::MotionEvent {
            action: MotionAction::Move,
        });
        log.add(GestureLogEvent::MotionEvent {
            action: MotionAction::Move,
        });
        let mut out = String::new();
        log.dump("", &mut out).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "TouchInteractionLog (count=2):");
        assert_eq!(lines[1], "  [0] onMotionEvent: MOVE & 1 similar events");
        assert_eq!(lines[2], "  [0] setInputConsumer: OTHER_ACTIVITY");
    }
}
