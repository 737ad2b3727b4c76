//! Event Bus implementation.
//!
//! Each open chart owns its own `EventBus`; there is no process-wide
//! instance. Hosts register synchronous handlers or poll a broadcast
//! receiver.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{ChartEvent, EventCategory};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Create a new unique subscription ID
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &ChartEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Arc<dyn Fn(ChartEvent) + Send + Sync>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Channel capacity for broadcast.
    pub channel_capacity: usize,
    /// Whether to keep event history.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            enable_history: false,
            max_history_size: 500,
        }
    }
}

/// Error types for event bus operations
#[derive(Debug, Clone, thiserror::Error)]
pub enum EventBusError {
    /// No subscribers are listening
    #[error("No active subscribers")]
    NoSubscribers,
}

/// Chart event distribution to host subscribers
pub struct EventBus {
    sender: broadcast::Sender<ChartEvent>,
    handlers: RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>,
    history: RwLock<VecDeque<ChartEvent>>,
    config: EventBusConfig,
}

impl EventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity.max(1));
        Self {
            sender,
            handlers: RwLock::new(HashMap::new()),
            history: RwLock::new(VecDeque::new()),
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of handlers and receivers reached, or
    /// `NoSubscribers` when nobody is listening.
    pub fn publish(&self, event: ChartEvent) -> Result<usize, EventBusError> {
        if self.config.enable_history {
            self.add_to_history(&event);
        }

        // Handlers may subscribe or unsubscribe, so call them without the lock held.
        let matching: Vec<EventHandler> = self
            .handlers
            .read()
            .values()
            .filter(|(filter, _)| filter.matches(&event))
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &matching {
            handler(event.clone());
        }

        let received = self.sender.send(event).unwrap_or(0);
        let reached = matching.len() + received;
        if reached == 0 && self.handlers.read().is_empty() {
            return Err(EventBusError::NoSubscribers);
        }
        Ok(reached)
    }

    /// Subscribe to events with a synchronous handler
    ///
    /// The handler runs on the publishing thread, inside the editing call
    /// that caused the event, so it should return quickly.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(ChartEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Arc::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for manual event polling
    pub fn receiver(&self) -> broadcast::Receiver<ChartEvent> {
        self.sender.subscribe()
    }

    /// Unsubscribe from events
    ///
    /// Returns true if the subscription was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Recent events, oldest first (empty unless history is enabled)
    pub fn history(&self) -> Vec<ChartEvent> {
        self.history.read().iter().cloned().collect()
    }

    /// Clear event history
    pub fn clear_history(&self) {
        self.history.write().clear();
    }

    /// Get the current configuration
    pub fn config(&self) -> &EventBusConfig {
        &self.config
    }

    fn add_to_history(&self, event: &ChartEvent) {
        let mut history = self.history.write();
        history.push_back(event.clone());
        while history.len() > self.config.max_history_size {
            history.pop_front();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let bus = EventBus::new();

        let id = bus.subscribe(EventFilter::All, |_| {});
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);

        // Double unsubscribe should return false
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        let result = bus.publish(ChartEvent::RowSelected { row: 0 });
        assert!(matches!(result, Err(EventBusError::NoSubscribers)));
    }

    #[test]
    fn test_event_filtering() {
        let bus = EventBus::new();
        let cell_count = Arc::new(AtomicUsize::new(0));
        let row_count = Arc::new(AtomicUsize::new(0));

        let cc = cell_count.clone();
        bus.subscribe(EventFilter::Categories(vec![EventCategory::Cell]), move |_| {
            cc.fetch_add(1, Ordering::SeqCst);
        });

        let rc = row_count.clone();
        bus.subscribe(EventFilter::Categories(vec![EventCategory::Row]), move |_| {
            rc.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(ChartEvent::StitchChanged {
            cell: 1,
            old: "ch".to_string(),
            new: "dc".to_string(),
        })
        .ok();
        bus.publish(ChartEvent::RowSelected { row: 2 }).ok();
        bus.publish(ChartEvent::RowSelected { row: 3 }).ok();

        assert_eq!(cell_count.load(Ordering::SeqCst), 1);
        assert_eq!(row_count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_handler_may_unsubscribe_itself() {
        let bus = Arc::new(EventBus::new());
        let slot: Arc<RwLock<Option<SubscriptionId>>> = Arc::new(RwLock::new(None));

        let bus_clone = Arc::clone(&bus);
        let slot_clone = Arc::clone(&slot);
        let id = bus.subscribe(EventFilter::All, move |_| {
            if let Some(id) = *slot_clone.read() {
                bus_clone.unsubscribe(id);
            }
        });
        *slot.write() = Some(id);

        bus.publish(ChartEvent::RowSelected { row: 0 }).ok();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_history_max_size() {
        let bus = EventBus::with_config(EventBusConfig {
            enable_history: true,
            max_history_size: 3,
            ..Default::default()
        });

        for row in 0..5 {
            bus.publish(ChartEvent::RowSelected { row }).ok();
        }

        let history = bus.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0], ChartEvent::RowSelected { row: 2 });

        bus.clear_history();
        assert!(bus.history().is_empty());
    }

    #[test]
    fn test_broadcast_receiver() {
        let bus = EventBus::new();
        let mut receiver = bus.receiver();

        bus.publish(ChartEvent::IndicatorFocusGained { indicator: 7 })
            .expect("receiver is listening");

        let event = receiver.try_recv().expect("event queued");
        assert_eq!(event, ChartEvent::IndicatorFocusGained { indicator: 7 });
    }
}
