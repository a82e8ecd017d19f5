//! Pluggable movement input.
//!
//! An [`InputSource`] produces one normalized movement vector per tick:
//! `x` lateral, `y` yaw, `z` forward, each in `[-1, 1]`.
//!
//! The [`ActiveInput`] resource holds the provider currently driving the
//! katamari. It can be swapped at runtime by publishing on the bus's
//! `input_changed` channel; the new provider takes over at the start of the
//! next tick.

use std::f64::consts::TAU;
use std::fmt;
use std::sync::{Arc, Mutex};

use bevy_ecs::prelude::Resource;
use glam::DVec3;
use log::info;

use crate::components::katamari::Katamari;
use crate::resources::notificationbus::{NotificationBus, SubscriptionId};

/// Source of per-tick movement vectors.
pub trait InputSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Movement for the given tick.
    fn movement(&self, tick: u64, katamari: &Katamari) -> DVec3;
}

/// Shared handle to an input provider.
pub type SharedInput = Arc<dyn InputSource>;

/// Never moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn name(&self) -> &str {
        "idle"
    }

    fn movement(&self, _tick: u64, _katamari: &Katamari) -> DVec3 {
        DVec3::ZERO
    }
}

/// Always pushes in the same direction.
#[derive(Debug, Clone, Copy)]
pub struct ConstantInput(pub DVec3);

impl InputSource for ConstantInput {
    fn name(&self) -> &str {
        "constant"
    }

    fn movement(&self, _tick: u64, _katamari: &Katamari) -> DVec3 {
        self.0
    }
}

/// Plays a list of `(ticks, movement)` steps and loops.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    steps: Vec<(u64, DVec3)>,
    total: u64,
}

impl ScriptedInput {
    pub fn new(steps: Vec<(u64, DVec3)>) -> Self {
        let total = steps.iter().map(|(ticks, _)| ticks).sum();
        Self { steps, total }
    }

    /// Forward, a left turn, forward again, then a right sweep.
    pub fn demo() -> Self {
        Self::new(vec![
            (240, DVec3::new(0.0, 0.0, 1.0)),
            (60, DVec3::new(-1.0, -0.5, 0.4)),
            (240, DVec3::new(0.0, 0.0, 1.0)),
            (120, DVec3::new(1.0, 0.5, 0.2)),
            (180, DVec3::new(0.0, 0.0, -1.0)),
        ])
    }
}

impl InputSource for ScriptedInput {
    fn name(&self) -> &str {
        "scripted"
    }

    fn movement(&self, tick: u64, _katamari: &Katamari) -> DVec3 {
        if self.total == 0 {
            return DVec3::ZERO;
        }
        let mut remaining = tick % self.total;
        for (ticks, movement) in &self.steps {
            if remaining < *ticks {
                return *movement;
            }
            remaining -= ticks;
        }
        DVec3::ZERO
    }
}

/// Steers in a slow circle around the origin.
///
/// While the katamari is pressed against a wall the circle tightens, which
/// keeps it from grinding along the same face forever.
#[derive(Debug, Clone, Copy)]
pub struct OrbitInput {
    pub period_ticks: u64,
}

impl Default for OrbitInput {
    fn default() -> Self {
        Self { period_ticks: 1200 }
    }
}

impl InputSource for OrbitInput {
    fn name(&self) -> &str {
        "orbit"
    }

    fn movement(&self, tick: u64, katamari: &Katamari) -> DVec3 {
        let period = self.period_ticks.max(1);
        let angle = TAU * (tick % period) as f64 / period as f64;
        let turn = if katamari.contact_count() > 0 { 1.0 } else { 0.3 };
        DVec3::new(angle.cos(), turn, angle.sin())
    }
}

/// The provider currently driving the katamari.
#[derive(Resource)]
pub struct ActiveInput {
    current: SharedInput,
    pending: Arc<Mutex<Option<SharedInput>>>,
    subscription: Option<SubscriptionId>,
}

impl fmt::Debug for ActiveInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveInput")
            .field("current", &self.current.name())
            .field("subscription", &self.subscription)
            .finish()
    }
}

impl Default for ActiveInput {
    fn default() -> Self {
        Self::new(Arc::new(IdleInput))
    }
}

impl ActiveInput {
    pub fn new(source: SharedInput) -> Self {
        Self {
            current: source,
            pending: Arc::new(Mutex::new(None)),
            subscription: None,
        }
    }

    pub fn current(&self) -> &SharedInput {
        &self.current
    }

    pub fn name(&self) -> &str {
        self.current.name()
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.is_some()
    }

    /// Listen for input swaps on the bus. Reconnecting replaces the old
    /// subscription.
    pub fn connect(&mut self, bus: &mut NotificationBus) {
        if let Some(id) = self.subscription.take() {
            bus.input_changed.unsubscribe(id);
        }
        let slot = Arc::clone(&self.pending);
        let id = bus.input_changed.subscribe(move |input: &SharedInput| {
            if let Ok(mut pending) = slot.lock() {
                *pending = Some(Arc::clone(input));
            }
        });
        self.subscription = Some(id);
    }

    /// Forget the subscription without touching the bus (it was torn down).
    pub fn mark_disconnected(&mut self) {
        self.subscription = None;
    }

    /// Swap in the most recently announced provider, if any.
    pub fn apply_pending(&mut self) -> bool {
        let next = self.pending.lock().ok().and_then(|mut pending| pending.take());
        match next {
            Some(source) => {
                info!("Input source changed: {} -> {}", self.current.name(), source.name());
                self.current = source;
                true
            }
            None => false,
        }
    }
}
