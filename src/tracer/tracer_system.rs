//! Tracer system for coordinating tracer events
//!
//! This module provides the central system for recording, filtering, and querying
//! tracer events. It coordinates with the event store and, as a [`CallInterceptor`],
//! turns every traced call boundary into a structured event.

use super::call_args::{repr, CallInfo};
use super::event_store::EventStore;
use super::interceptor::CallInterceptor;
use super::tracer_events::*;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Source recorded on events produced by intercepted calls
pub const INTERCEPTOR_SOURCE: &str = "tracer";

/// Central system for capturing and querying tracer events
pub struct TracerSystem {
    event_store: Arc<EventStore>,
    enabled: Arc<AtomicBool>,
}

impl TracerSystem {
    /// Create a new tracer system
    ///
    /// # Arguments
    ///
    /// * `event_store` - Optional event store to use. If None, a new one will be created.
    /// * `enabled` - Whether the tracer system is enabled
    pub fn new(event_store: Option<Arc<EventStore>>, enabled: bool) -> Self {
        Self {
            event_store: event_store.unwrap_or_else(|| Arc::new(EventStore::default())),
            enabled: Arc::new(AtomicBool::new(enabled)),
        }
    }

    /// Enabled system whose store keeps only the latest `capacity` events
    pub fn bounded(capacity: usize) -> Self {
        Self::new(Some(Arc::new(EventStore::with_capacity(capacity, None))), true)
    }

    /// Maximum number of retained events, if bounded
    pub fn capacity(&self) -> Option<usize> {
        self.event_store.capacity()
    }

    /// Check if the tracer is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Enable the tracer system
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::SeqCst);
    }

    /// Disable the tracer system
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// Record a tracer event in the event store
    pub fn record_event(&self, event: Box<dyn TracerEvent>) {
        if !self.is_enabled() {
            return;
        }
        self.event_store.store(event);
    }

    /// Record entry into a traced method
    ///
    /// # Arguments
    ///
    /// * `method` - Name of the traced method
    /// * `level` - Trace level attached to the method
    /// * `tag` - Message tag attached to the method
    /// * `positional` - Rendered positional arguments
    /// * `keyword` - Rendered keyword arguments
    /// * `source` - The source of the event
    /// * `correlation_id` - Request-scoped id for tracing related events
    #[allow(clippy::too_many_arguments)]
    pub fn record_method_entry(
        &self,
        method: impl Into<String>,
        level: usize,
        tag: impl Into<String>,
        positional: Vec<String>,
        keyword: Vec<(String, String)>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) {
        if !self.is_enabled() {
            return;
        }

        let event = Box::new(MethodEntryTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: correlation_id.into(),
            source: source.into(),
            method: method.into(),
            level,
            tag: tag.into(),
            positional,
            keyword,
        });

        self.event_store.store(event);
    }

    /// Record a traced method returning `result`
    pub fn record_method_exit(
        &self,
        method: impl Into<String>,
        level: usize,
        tag: impl Into<String>,
        result: impl Into<String>,
        source: impl Into<String>,
        correlation_id: impl Into<String>,
    ) {
        if !self.is_enabled() {
            return;
        }

        let event = Box::new(MethodExitTracerEvent {
            timestamp: current_timestamp(),
            correlation_id: correlation_id.into(),
            source: source.into(),
            method: method.into(),
            level,
            tag: tag.into(),
            result: result.into(),
        });

        self.event_store.store(event);
    }

    /// Get event summaries from the store, optionally filtered
    pub fn get_event_summaries(
        &self,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        self.event_store.get_event_summaries(start_time, end_time, filter_func)
    }

    /// Get the last N event summaries, optionally filtered
    pub fn get_last_n_summaries(
        &self,
        n: usize,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> Vec<String> {
        self.event_store.get_last_n_summaries(n, filter_func)
    }

    /// Method names of recorded events, optionally filtered
    pub fn get_methods(&self, filter_func: Option<&dyn EventFilterFn>) -> Vec<String> {
        self.event_store.get_methods(filter_func)
    }

    /// Count events matching filters
    pub fn count_events(
        &self,
        start_time: Option<f64>,
        end_time: Option<f64>,
        filter_func: Option<&dyn EventFilterFn>,
    ) -> usize {
        self.event_store.count_events(start_time, end_time, filter_func)
    }

    /// Clear all events from the event store
    pub fn clear(&self) {
        self.event_store.clear();
    }

    /// Get the total number of events in the store
    pub fn len(&self) -> usize {
        self.event_store.len()
    }

    /// Check if the event store is empty
    pub fn is_empty(&self) -> bool {
        self.event_store.is_empty()
    }
}

impl Default for TracerSystem {
    fn default() -> Self {
        Self::new(None, true)
    }
}

impl CallInterceptor for TracerSystem {
    fn before(&self, call: &CallInfo<'_>) {
        self.record_method_entry(
            call.name,
            call.meta.level,
            call.meta.message.as_str(),
            call.args.positional().to_vec(),
            call.args.keyword().to_vec(),
            INTERCEPTOR_SOURCE,
            call.correlation_id.unwrap_or_default(),
        );
    }

    fn after(&self, call: &CallInfo<'_>, result: &dyn fmt::Debug) {
        self.record_method_exit(
            call.name,
            call.meta.level,
            call.meta.message.as_str(),
            repr(result),
            INTERCEPTOR_SOURCE,
            call.correlation_id.unwrap_or_default(),
        );
    }
}

/// Get current timestamp as Unix timestamp (seconds since epoch)
fn current_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs_f64())
        .unwrap_or_default()
}
