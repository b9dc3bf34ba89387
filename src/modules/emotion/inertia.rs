use crate::config::InertiaConfig;

use super::state::intensity_from_f64;
use super::{Emotion, EmotionalState, Shift};

/// Deep, slow-moving moods. They converge at `heavy_scale` times the base rate.
pub const HEAVY_EMOTIONS: &[&str] = &[
    "sadness",
    "grief",
    "despair",
    "love",
    "trust",
    "contentment",
    "self_understanding",
    "self_acceptance",
    "self_awareness",
    "self_worth",
];

pub fn is_heavy(emotion: Emotion) -> bool {
    HEAVY_EMOTIONS.contains(&emotion.name())
}

#[derive(Debug, Clone, PartialEq)]
pub struct InertiaEngine {
    base_factor: f64,
    heavy_factor: f64,
}

impl InertiaEngine {
    pub fn new(config: &InertiaConfig) -> Self {
        Self {
            base_factor: config.base_factor,
            heavy_factor: config.base_factor * config.heavy_scale,
        }
    }

    pub fn factor_for(&self, emotion: Emotion) -> f64 {
        if is_heavy(emotion) {
            self.heavy_factor
        } else {
            self.base_factor
        }
    }

    /// Moves each shifted emotion part of the way toward its target. Emotions absent
    /// from `shift` keep their current value.
    pub fn apply(&self, current: &EmotionalState, shift: &Shift) -> EmotionalState {
        let mut next = Shift::new();
        for (emotion, target) in shift.iter() {
            let old = current.get(emotion) as f64;
            let moved = old + (target as f64 - old) * self.factor_for(emotion);
            next.insert(emotion, intensity_from_f64(moved));
        }
        current.set_many(&next)
    }
}

impl Default for InertiaEngine {
    fn default() -> Self {
        Self::new(&InertiaConfig::default())
    }
}

pub fn apply_inertia(current: &EmotionalState, shift: &Shift) -> EmotionalState {
    InertiaEngine::default().apply(current, shift)
}

#[cfg(test)]
mod tests {
    use super::{apply_inertia, is_heavy, InertiaEngine};
    use crate::_test_mock::state_mock::StateTestHelpers;
    use crate::config::InertiaConfig;
    use crate::modules::emotion::EmotionalState;

    #[test]
    fn test_heavy_factor_is_half_of_base() {
        let engine = InertiaEngine::default();
        let sadness = StateTestHelpers::emotion("sadness");
        let joy = StateTestHelpers::emotion("joy");
        assert!(is_heavy(sadness));
        assert!(!is_heavy(joy));
        assert_eq!(engine.factor_for(joy), 0.5);
        assert_eq!(engine.factor_for(sadness), 0.25);
    }

    #[test]
    fn test_unshifted_emotions_are_untouched() {
        let state = StateTestHelpers::state_with(&[("joy", 33), ("fear", 12)]);
        let shift = StateTestHelpers::shift(&[("joy", 100)]);
        let next = apply_inertia(&state, &shift);
        assert_eq!(next.get_by_name("fear").unwrap(), 12);
        assert_eq!(next.get_by_name("joy").unwrap(), 67);
    }

    #[test]
    fn test_full_factor_jumps_to_target() {
        let engine = InertiaEngine::new(&InertiaConfig { base_factor: 1.0, heavy_scale: 1.0 });
        let shift = StateTestHelpers::shift(&[("grief", 90)]);
        let next = engine.apply(&EmotionalState::zeroed(), &shift);
        assert_eq!(next.get_by_name("grief").unwrap(), 90);
    }
}
