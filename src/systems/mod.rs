//! Simulation systems and observers.
//!
//! Submodules overview
//! - [`collision`] – sphere/box contact detection and penetration response
//! - [`contact`] – observers applying absorb, shed and climb decisions
//! - [`input`] – sample the active input source into force/torque requests
//! - [`movement`] – integrate rigid bodies and probe the ground
//! - [`objectives`] – mirror katamari state into the game model
//! - [`stuckto`] – keep attached entities at their offset from the parent
//! - [`time`] – update simulation time and delta

pub mod collision;
pub mod contact;
pub mod input;
pub mod movement;
pub mod objectives;
pub mod stuckto;
pub mod time;
