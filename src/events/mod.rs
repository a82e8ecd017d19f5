//! Event types and observers used by the simulation.
//!
//! Two kinds of events live here:
//! - bevy [`Event`](bevy_ecs::event::Event)s exchanged with the external
//!   collaborators (contacts from physics, mesh consolidation for rendering),
//!   handled by observers;
//! - plain notice payloads fanned out to listeners through the
//!   [`NotificationBus`](crate::resources::notificationbus::NotificationBus).
//!
//! Submodules:
//! - [`collision`] – contact begin/end delivered by the physics collaborator
//! - [`notices`] – payloads published on the notification bus
//! - [`render`] – hooks fired at the rendering collaborator
pub mod collision;
pub mod notices;
pub mod render;
