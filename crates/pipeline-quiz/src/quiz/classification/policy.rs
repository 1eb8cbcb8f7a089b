use std::fmt;

use serde::{Deserialize, Serialize};

use super::rules::TierSignals;

/// Coarse pipeline risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    A,
    B,
    C,
}

impl Tier {
    /// Displayed score out of 10; lower is worse.
    pub fn score(self) -> f32 {
        match self {
            Tier::A => 2.9,
            Tier::B => 4.1,
            Tier::C => 5.6,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Tier::A => "Severe Pipeline Failure Risk",
            Tier::B => "High-Risk Pipeline",
            Tier::C => "Unstable / Unclear Pipeline",
        }
    }

    /// How many copy variants exist for the tier.
    pub const fn variant_count(self) -> u8 {
        match self {
            Tier::A => 2,
            Tier::B | Tier::C => 3,
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            Tier::A => "tier-a",
            Tier::B => "tier-b",
            Tier::C => "tier-c",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
        };
        f.write_str(letter)
    }
}

/// Ordered decision list; the first matching tier wins and C is the fallback.
pub(crate) fn decide_tier(signals: &TierSignals) -> Tier {
    if signals.is_decision_maker
        && signals.is_ideal_size
        && signals.has_near_term_intent
        && signals.reports_pain
        && signals.severe_experience_pain
    {
        return Tier::A;
    }

    if signals.is_decision_maker
        && signals.reports_pain
        && (signals.is_ideal_size || signals.is_adjacent_size)
        && (signals.moderate_experience_pain || signals.is_exploring)
    {
        return Tier::B;
    }

    Tier::C
}
