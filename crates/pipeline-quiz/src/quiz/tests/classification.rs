use super::common::*;

use crate::quiz::classification::{Tier, TierClassifier};
use crate::quiz::content::{result_content, Segment};
use crate::quiz::rubric::{
    ScoringRubric, CONFIDENCE_FINE, FORECAST_OFTEN, ROLE_FOUNDER, SIZE_1000_PLUS, SIZE_51_250,
    TIMELINE_3_MONTHS,
};
use crate::quiz::variant::RandomVariantSource;

fn classifier() -> TierClassifier {
    TierClassifier::new(ScoringRubric::default())
}

#[test]
fn founder_with_forecast_pain_is_tier_a() {
    let answers = answers(&[
        ("q1", ROLE_FOUNDER),
        ("q3", SIZE_51_250),
        ("q5", "It's actively costing us deals"),
        ("q6", TIMELINE_3_MONTHS),
        ("q7", FORECAST_OFTEN),
    ]);

    let result = classifier().classify(&answers, &mut ScriptedVariants::new(&[2]));

    assert_eq!(result.tier, Tier::A);
    assert_eq!(result.score, 2.9);
    assert_eq!(result.label, "Severe Pipeline Failure Risk");
    assert_eq!(result.variant, 2);
}

#[test]
fn tier_a_variants_stay_in_range_for_random_source() {
    let classifier = classifier();
    let answers = tier_a_answers();

    for seed in 0..64 {
        let result = classifier.classify(&answers, &mut RandomVariantSource::seeded(seed));
        assert_eq!(result.tier, Tier::A);
        assert!((1..=2).contains(&result.variant), "seed {seed}");
    }
}

#[test]
fn only_the_variant_depends_on_the_source() {
    let classifier = classifier();
    let answers = tier_b_answers();

    let first = classifier.classify(&answers, &mut ScriptedVariants::new(&[1]));
    let second = classifier.classify(&answers, &mut ScriptedVariants::new(&[3]));

    assert_eq!(first.tier, Tier::B);
    assert_eq!((first.tier, first.score, &first.label), (second.tier, second.score, &second.label));
    assert_eq!(first.label, "High-Risk Pipeline");
    assert_eq!(first.score, 4.1);
    assert_eq!((first.variant, second.variant), (1, 3));
}

#[test]
fn variant_bound_follows_tier() {
    let classifier = classifier();

    let mut variants = ScriptedVariants::default();
    classifier.classify(&tier_a_answers(), &mut variants);
    classifier.classify(&tier_b_answers(), &mut variants);
    classifier.classify(&tier_c_answers(), &mut variants);

    assert_eq!(variants.requested, vec![2, 3, 3]);
}

#[test]
fn out_of_range_picks_are_clamped() {
    let result = classifier().classify(&tier_a_answers(), &mut ScriptedVariants::new(&[9]));
    assert_eq!(result.variant, 2);

    let result = classifier().classify(&tier_c_answers(), &mut ScriptedVariants::new(&[0]));
    assert_eq!(result.variant, 1);
}

#[test]
fn no_pain_and_junior_role_is_tier_c() {
    let result = classifier().classify(&tier_c_answers(), &mut ScriptedVariants::new(&[1]));

    assert_eq!(result.tier, Tier::C);
    assert_eq!(result.score, 5.6);
    assert_eq!(result.label, "Unstable / Unclear Pipeline");
}

#[test]
fn working_fine_blocks_tier_a_and_b() {
    let answers = with_answer(&tier_a_answers(), "q5", CONFIDENCE_FINE);
    let classifier = classifier();

    assert!(!classifier.signals(&answers).reports_pain);
    let result = classifier.classify(&answers, &mut ScriptedVariants::new(&[1]));
    assert_eq!(result.tier, Tier::C);
}

#[test]
fn unanswered_confidence_counts_as_pain() {
    let answers = answers(&[("q1", ROLE_FOUNDER), ("q3", SIZE_1000_PLUS)]);
    let signals = classifier().signals(&answers);

    assert!(signals.reports_pain);
    assert!(signals.is_decision_maker);
    assert!(signals.is_adjacent_size);
    assert!(!signals.is_ideal_size);
}

#[test]
fn tier_a_first_variant_echoes_role_and_size() {
    let result = classifier().classify(&tier_a_answers(), &mut ScriptedVariants::new(&[1]));
    let content = result_content(&result);

    assert_eq!(content.tier, Tier::A);
    assert_eq!(content.variant, 1);
    assert!(content.paragraphs[0]
        .0
        .contains(&Segment::Emphasis(ROLE_FOUNDER.to_string())));
    assert!(content.paragraphs[0]
        .plain()
        .contains("51-250 employee B2B company"));
}
