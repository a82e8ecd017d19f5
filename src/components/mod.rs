//! ECS components for entities.
//!
//! This module groups all component types that can be attached to entities in
//! the simulated world.
//!
//! Submodules overview:
//! - [`boxcollider`] – axis-aligned box collider for terrain and collectibles
//! - [`collectible`] – volume/mass/size data of objects that can be rolled up
//! - [`katamari`] – the growing sphere and its accretion bookkeeping
//! - [`layer`] – collision layer tag used to classify contacts
//! - [`mapposition`] – world-space position for an entity
//! - [`persistent`] – marker for entities that survive a game reset
//! - [`rigidbody`] – physics body with velocity, forces and kinematic flags
//! - [`stuckto`] – parent link making an entity follow another one

pub mod boxcollider;
pub mod collectible;
pub mod katamari;
pub mod layer;
pub mod mapposition;
pub mod persistent;
pub mod rigidbody;
pub mod stuckto;
