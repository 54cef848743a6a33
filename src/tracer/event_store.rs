//! Event storage with callbacks and filtering
//!
//! This module provides thread-safe event storage with support for callbacks,
//! filtering by time range, and custom predicates.

use super::tracer_events::{EventFilterFn, TracerEvent};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Type alias for event callback functions
pub type EventCallback = Arc<dyn Fn(&dyn TracerEvent) + Send + Sync>;

/// Store for capturing and querying tracer events
///
/// EventStore provides thread-safe storage for tracer events with support for:
/// - Callbacks triggered on each stored event
/// - Filtering by time range
/// - Custom filter predicates
/// - Query for last N events
/// - An optional capacity, past which the oldest events are dropped
pub struct EventStore {
    events: Arc<Mutex<VecDeque<Box<dyn TracerEvent>>>>,
    on_store_callback: Option<EventCallback>,
    capacity: Option<usize>,
}

impl EventStore {
    /// Create a new event store
    ///
    /// # Arguments
    ///
    /// * `on_store_callback` - Optional callback function called whenever an event is stored
    pub fn new(on_store_callback: Option<EventCallback>) -> Self {
        Self {
            events: Arc::new(Mutex::new(VecDeque::new())),
            on_store_callback,
            capacity: None,
        }
    }

    /// Create a store retaining at most `capacity` events (at least one)
    pub fn with_capacity(capacity: usize, on_store_callback: Option<EventCallback>) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::new(on_store_callback)
        }
    }

    /// Maximum number of retained events, if bounded
    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    fn events(&self) -> MutexGuard<'_, VecDeque<Box<dyn TracerEvent>>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store an event in the event store
    ///
    /// If a callback is configured, it will be called with the stored event.
    pub fn store(&self, event: Box<dyn TracerEvent>) {
        if let Some(callback) = &self.on_store_callback {
            callback(event.as_ref());
        }

        let mut events = self.events();
        if let Some(capacity) = self.capacity {
            while events.len() >= capacity {
                events.pop_front();
            }
        }
        events.push_back(event);
    }

    fn passes(
        event: &dyn TracerEvent,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> bool {
        if start_time.is_some_and(|start| event.timestamp() < start) {
            return false;
        }
        if end_time.is_some_and(|end| event.timestamp() > end) {
            return false;
        }
        filter_func.map_or(true, |filter| filter.matches(event))
    }

    /// Count events matching filters
    ///
    /// # Arguments
    ///
    /// * `start_time` - Include events with timestamp >= start_time
    /// * `end_time` - Include events with timestamp <= end_time
    /// * `filter_func` - Custom filter function to apply to events
    pub fn count_events(
        &self,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> usize {
        self.events()
            .iter()
            .filter(|event| Self::passes(event.as_ref(), start_time, end_time, filter_func))
            .count()
    }

    /// Get summaries of events matching filters
    ///
    /// Returns printable summaries instead of cloning events
    pub fn get_event_summaries(
        &self,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        self.events()
            .iter()
            .filter(|event| Self::passes(event.as_ref(), start_time, end_time, filter_func))
            .map(|event| event.printable_summary())
            .collect()
    }

    /// Names of the methods of matching events, in recording order
    pub fn get_methods(&self, filter_func: Option<&dyn EventFilterFn>) -> Vec<String> {
        self.events()
            .iter()
            .filter(|event| Self::passes(event.as_ref(), None, None, filter_func))
            .map(|event| event.method().to_string())
            .collect()
    }

    /// Get the last N event summaries, optionally filtered
    pub fn get_last_n_summaries(
        &self,
        n: usize,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        let events = self.events();

        let filtered: Vec<_> = events
            .iter()
            .filter(|event| Self::passes(event.as_ref(), None, None, filter_func))
            .collect();

        let start_idx = filtered.len().saturating_sub(n);

        filtered[start_idx..].iter().map(|e| e.printable_summary()).collect()
    }

    /// Clear all events from the store
    pub fn clear(&self) {
        self.events().clear();
    }

    /// Get the total number of events in the store
    pub fn len(&self) -> usize {
        self.events().len()
    }

    /// Check if the event store is empty
    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new(None)
    }
}
