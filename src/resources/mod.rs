//! ECS resources made available to systems.
//!
//! This module groups the long-lived data injected into the ECS world and
//! accessed by systems and observers during a tick.
//!
//! Overview
//! - `activecontacts` – pairs touching at the end of the last tick
//! - `gameconfig` – tuning and session settings loaded from `config.ini`
//! - `gamemodel` – objectives snapshot shared with listeners
//! - `input` – pluggable movement providers and the one currently active
//! - `notificationbus` – multicast channels for gameplay notices
//! - `worldtime` – simulation time and delta
pub mod activecontacts;
pub mod gameconfig;
pub mod gamemodel;
pub mod input;
pub mod notificationbus;
pub mod worldtime;
