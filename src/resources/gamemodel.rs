//! Objectives and progress snapshot.
//!
//! [`GameModel`] is what scoring and UI listeners see: it is copied into the
//! ObjectivesUpdated and Victory notices and printed by `--report`.

use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameModel {
    /// Radius the katamari has to reach to win.
    pub target_radius: f64,
    pub radius: f64,
    pub mass: f64,
    /// Objects currently carried.
    pub collected: usize,
    pub elapsed: f64,
    pub ticks: u64,
    pub victory: bool,
}

impl Default for GameModel {
    fn default() -> Self {
        Self::new(1.5)
    }
}

impl GameModel {
    pub fn new(target_radius: f64) -> Self {
        Self {
            target_radius,
            radius: 0.0,
            mass: 0.0,
            collected: 0,
            elapsed: 0.0,
            ticks: 0,
            victory: false,
        }
    }

    /// Fraction of the target radius reached, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.target_radius <= 0.0 {
            return 1.0;
        }
        (self.radius / self.target_radius).clamp(0.0, 1.0)
    }

    pub fn target_reached(&self) -> bool {
        self.radius >= self.target_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_clamped() {
        let mut model = GameModel::new(2.0);
        assert_eq!(model.progress(), 0.0);
        model.radius = 1.0;
        assert!((model.progress() - 0.5).abs() < 1e-12);
        model.radius = 3.0;
        assert_eq!(model.progress(), 1.0);
        assert!(model.target_reached());
    }

    #[test]
    fn test_serializes_to_json() {
        let model = GameModel::new(1.5);
        let json = serde_json::to_string(&model).unwrap();
        assert!(json.contains("\"target_radius\":1.5"));
        let back: GameModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back, model);
    }
}
