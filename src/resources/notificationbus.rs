//! Process-wide notification bus.
//!
//! The [`NotificationBus`] resource fans out what happens to a katamari
//! (contacts, attach/detach, objectives, victory, reset, input swaps) to any
//! number of listeners such as UI, audio, scoring or camera code.
//!
//! Each event kind has its own [`Channel`]. Delivery is synchronous, on the
//! publishing thread, in subscription order. Publishing with no subscribers
//! and unsubscribing an unknown handle are both no-ops.
//!
//! Handlers only receive the notice payload. They cannot reach the katamari
//! and must go through its public operations to change anything.
//!
//! # Lifecycle
//!
//! The bus lives as long as the world does. [`NotificationBus::teardown`]
//! drops every subscription at once; [`crate::game::reset_game`] calls it right
//! after publishing [`ResetGame`].
//!
//! # Example
//! ```ignore
//! let mut bus = NotificationBus::new();
//! let id = bus.attach.subscribe(|notice| log::info!("rolled up {:?}", notice.collectible));
//! bus.attach.publish(&notice);
//! bus.attach.unsubscribe(id);
//! ```

use std::fmt;

use bevy_ecs::prelude::Resource;

use crate::events::collision::ContactBegin;
use crate::events::notices::{CollectibleNotice, ResetGame};
use crate::resources::gamemodel::GameModel;
use crate::resources::input::SharedInput;

/// Boxed subscriber callback.
pub type Handler<E> = Box<dyn FnMut(&E) + Send + Sync>;

/// Handle returned by [`Channel::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Multicast list of handlers for one event kind.
pub struct Channel<E> {
    next_id: u64,
    handlers: Vec<(SubscriptionId, Handler<E>)>,
}

impl<E> Default for Channel<E> {
    fn default() -> Self {
        Self {
            next_id: 1,
            handlers: Vec::new(),
        }
    }
}

impl<E> fmt::Debug for Channel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("subscribers", &self.handlers.len())
            .finish()
    }
}

impl<E> Channel<E> {
    /// Append a handler; it runs after every handler subscribed before it.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&E) + Send + Sync + 'static,
    {
        // ids are never reused, even across teardowns, so a stale handle
        // cannot remove a newer subscriber
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(handler_id, _)| *handler_id != id);
        self.handlers.len() != before
    }

    /// Deliver `event` to every handler in subscription order.
    pub fn publish(&mut self, event: &E) {
        for (_, handler) in self.handlers.iter_mut() {
            handler(event);
        }
    }

    /// Drop all handlers.
    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// One channel per event kind.
#[derive(Resource, Debug, Default)]
pub struct NotificationBus {
    /// Raw contact data for every contact that reaches the katamari logic.
    pub contact: Channel<ContactBegin>,
    pub attach: Channel<CollectibleNotice>,
    pub detach: Channel<CollectibleNotice>,
    pub objectives_updated: Channel<GameModel>,
    pub victory: Channel<GameModel>,
    pub reset_game: Channel<ResetGame>,
    /// A new input provider should drive the katamari.
    pub input_changed: Channel<SharedInput>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear every subscriber list.
    pub fn teardown(&mut self) {
        self.contact.clear();
        self.attach.clear();
        self.detach.clear();
        self.objectives_updated.clear();
        self.victory.clear();
        self.reset_game.clear();
        self.input_changed.clear();
    }

    /// Total subscribers across all channels.
    pub fn subscriber_count(&self) -> usize {
        self.contact.len()
            + self.attach.len()
            + self.detach.len()
            + self.objectives_updated.len()
            + self.victory.len()
            + self.reset_game.len()
            + self.input_changed.len()
    }
}
