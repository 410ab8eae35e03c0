//! Virtual neurochemistry.
//!
//! Five bounded scalars nudged by discrete events and pulled back toward a
//! baseline by homeostasis. The current mix derives the graph parameters
//! (how deep thought spreads, how easily nodes fire, how plastic synapses
//! are) and a qualitative tone used to flavor output.
//!
//! | scalar | broadens | narrows |
//! |--------|----------|---------|
//! | serotonin | depth, decay factor | |
//! | cortisol | threshold | depth, decay factor, plasticity |
//! | norepinephrine | sensitivity (lower threshold) | |
//! | dopamine | plasticity | |

use crate::error::ValidationError;
use crate::params::GraphParams;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Resting level of each scalar: (dopamine, serotonin, norepinephrine, cortisol, oxytocin).
pub const BASELINE: Neurochemistry = Neurochemistry {
    dopamine: 0.5,
    serotonin: 0.5,
    norepinephrine: 0.3,
    cortisol: 0.1,
    oxytocin: 0.3,
};

/// Default pull toward baseline per learning step.
pub const HOMEOSTASIS_SPEED: f64 = 0.02;

/// Discrete events that shift the chemical mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChemicalEvent {
    FeedbackPositive,
    FeedbackNegative,
    CuriosityDiscovery,
    Unanswered,
    SocialTrust,
    NovelInput,
}

impl ChemicalEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChemicalEvent::FeedbackPositive => "feedback_positive",
            ChemicalEvent::FeedbackNegative => "feedback_negative",
            ChemicalEvent::CuriosityDiscovery => "curiosity_discovery",
            ChemicalEvent::Unanswered => "unanswered",
            ChemicalEvent::SocialTrust => "social_trust",
            ChemicalEvent::NovelInput => "novel_input",
        }
    }

    /// Deltas as (dopamine, serotonin, norepinephrine, cortisol, oxytocin).
    fn deltas(&self) -> [f64; 5] {
        match self {
            ChemicalEvent::FeedbackPositive => [0.15, 0.0, 0.0, -0.05, 0.10],
            ChemicalEvent::FeedbackNegative => [-0.10, 0.0, 0.10, 0.15, 0.0],
            ChemicalEvent::CuriosityDiscovery => [0.20, 0.10, 0.0, 0.0, 0.0],
            ChemicalEvent::Unanswered => [0.0, 0.0, 0.15, 0.10, 0.0],
            ChemicalEvent::SocialTrust => [0.0, 0.04, 0.0, 0.0, 0.08],
            ChemicalEvent::NovelInput => [0.04, 0.0, 0.08, 0.0, 0.0],
        }
    }
}

impl FromStr for ChemicalEvent {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feedback_positive" => Ok(ChemicalEvent::FeedbackPositive),
            "feedback_negative" => Ok(ChemicalEvent::FeedbackNegative),
            "curiosity_discovery" => Ok(ChemicalEvent::CuriosityDiscovery),
            "unanswered" => Ok(ChemicalEvent::Unanswered),
            "social_trust" => Ok(ChemicalEvent::SocialTrust),
            "novel_input" => Ok(ChemicalEvent::NovelInput),
            other => Err(ValidationError::UnknownEvent(other.to_string())),
        }
    }
}

/// Qualitative mood derived from the chemical mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Defensive,
    Warm,
    Focused,
    Reflective,
    #[default]
    Neutral,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Defensive => "defensive",
            Tone::Warm => "warm",
            Tone::Focused => "focused",
            Tone::Reflective => "reflective",
            Tone::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The five-scalar neuromodulator state. Every scalar stays in [0,1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neurochemistry {
    pub dopamine: f64,
    pub serotonin: f64,
    pub norepinephrine: f64,
    pub cortisol: f64,
    pub oxytocin: f64,
}

impl Default for Neurochemistry {
    fn default() -> Self {
        BASELINE
    }
}

impl Neurochemistry {
    pub fn new(
        dopamine: f64,
        serotonin: f64,
        norepinephrine: f64,
        cortisol: f64,
        oxytocin: f64,
    ) -> Self {
        let mut chem = Self {
            dopamine,
            serotonin,
            norepinephrine,
            cortisol,
            oxytocin,
        };
        chem.clamp();
        chem
    }

    fn scalars_mut(&mut self) -> [&mut f64; 5] {
        [
            &mut self.dopamine,
            &mut self.serotonin,
            &mut self.norepinephrine,
            &mut self.cortisol,
            &mut self.oxytocin,
        ]
    }

    fn clamp(&mut self) {
        for v in self.scalars_mut() {
            *v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        }
    }

    /// Apply an event's deltas, then clamp the whole vector.
    pub fn modulate(&mut self, event: ChemicalEvent) {
        let deltas = event.deltas();
        for (v, d) in self.scalars_mut().into_iter().zip(deltas) {
            *v += d;
        }
        self.clamp();
    }

    /// Move every scalar `speed` of the way toward its baseline.
    pub fn homeostasis(&mut self, speed: f64) {
        let speed = speed.clamp(0.0, 1.0);
        let baseline = [
            BASELINE.dopamine,
            BASELINE.serotonin,
            BASELINE.norepinephrine,
            BASELINE.cortisol,
            BASELINE.oxytocin,
        ];
        for (v, b) in self.scalars_mut().into_iter().zip(baseline) {
            *v += (b - *v) * speed;
        }
        self.clamp();
    }

    /// Derive engine parameters from the current mix.
    pub fn graph_params(&self) -> GraphParams {
        let depth = (4.0 + self.serotonin * 2.0 - self.cortisol * 2.0).round_ties_even();
        let max_propagation_depth = depth.clamp(2.0, 7.0) as u32;

        let activation_threshold = (0.15
            * (1.0 - self.norepinephrine * 0.25 + self.cortisol * 0.35))
            .clamp(0.06, 0.4);

        let decay_factor =
            (0.6 * (1.0 + self.serotonin * 0.2 - self.cortisol * 0.25)).clamp(0.35, 0.9);

        let plasticity = (1.0 + self.dopamine * 0.5 - self.cortisol * 0.3).clamp(0.6, 1.8);

        GraphParams {
            max_propagation_depth,
            activation_threshold,
            decay_factor,
            plasticity,
        }
    }

    /// First matching rule wins: defensive, warm, focused, reflective, neutral.
    pub fn tone(&self) -> Tone {
        if self.cortisol > 0.6 {
            Tone::Defensive
        } else if self.dopamine > 0.65 && self.oxytocin > 0.45 {
            Tone::Warm
        } else if self.norepinephrine > 0.6 {
            Tone::Focused
        } else if self.serotonin > 0.65 {
            Tone::Reflective
        } else {
            Tone::Neutral
        }
    }
}
