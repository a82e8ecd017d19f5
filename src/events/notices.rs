//! Payloads carried by the [`NotificationBus`](crate::resources::notificationbus::NotificationBus).
//!
//! These are plain values handed to subscribers by reference. They describe
//! what happened; listeners (UI, audio, scoring, camera) react to them but
//! never get access to the katamari itself.
use bevy_ecs::prelude::Entity;

/// A collectible joined or left a katamari.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectibleNotice {
    pub katamari: Entity,
    pub collectible: Entity,
    pub volume: f64,
    pub mass: f64,
    /// Katamari radius after the change.
    pub radius: f64,
}

/// The session is being reset. Published right before the bus is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResetGame;
