mod policy;
mod rules;

pub use policy::Tier;
pub use rules::TierSignals;

use super::answers::AnswerSet;
use super::rubric::ScoringRubric;
use super::variant::VariantSource;
use policy::decide_tier;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless classifier that applies the rubric to a completed answer set.
#[derive(Debug, Clone)]
pub struct TierClassifier {
    rubric: ScoringRubric,
}

impl TierClassifier {
    pub fn new(rubric: ScoringRubric) -> Self {
        Self { rubric }
    }

    pub fn signals(&self, answers: &AnswerSet) -> TierSignals {
        rules::signals_for(answers, &self.rubric)
    }

    /// Tier, score, and label are a function of the answers alone; only the
    /// variant draws from `variants`.
    pub fn classify(
        &self,
        answers: &AnswerSet,
        variants: &mut dyn VariantSource,
    ) -> ClassificationResult {
        let signals = self.signals(answers);
        let tier = decide_tier(&signals);
        let variant_count = tier.variant_count();
        let variant = variants.pick(variant_count).clamp(1, variant_count);

        debug!(%tier, variant, ?signals, "answers classified");

        let keys = &self.rubric.questions;
        ClassificationResult {
            tier,
            score: tier.score(),
            label: tier.label().to_string(),
            variant,
            role: answers.get(&keys.role).map(str::to_string),
            company_size: answers.get(&keys.company_size).map(str::to_string),
        }
    }
}

/// Classification output, created fresh per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub tier: Tier,
    pub score: f32,
    pub label: String,
    pub variant: u8,
    pub role: Option<String>,
    pub company_size: Option<String>,
}
