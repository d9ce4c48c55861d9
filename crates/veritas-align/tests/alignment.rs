//! Alignment and grounding scenarios across the public API.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use veritas_align::{
    AlignError, Aligner, AlignmentRecord, GroundingTier, REFUSAL, build_grounded_answer, ground,
};

const SOURCES: [&str; 3] = [
    "Les données sont conservées pendant trois ans.",
    "Le responsable du traitement tient un registre des activités.",
    "Les personnes concernées disposent d'un droit d'accès.",
];

#[test]
fn verbatim_answer_is_grounded_on_its_sources() {
    let generated = "Les données sont conservées pendant trois ans. \
                     Le responsable du traitement tient un registre des activités.";
    let records = Aligner::default().align(generated, &SOURCES);

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(AlignmentRecord::is_aligned));
    assert_eq!(
        build_grounded_answer(&records),
        "Les données sont conservées pendant trois ans. \
         Le responsable du traitement tient un registre des activités."
    );
}

#[test]
fn hallucinated_answer_is_refused() {
    let generated = "Le prix du ticket de métro augmente chaque printemps à Lyon.";
    let records = Aligner::default().align(generated, &SOURCES);

    assert_eq!(records.len(), 1);
    let answer = ground(&records);
    assert_eq!(answer.tier, GroundingTier::Refused, "{records:?}");
    assert_eq!(answer.text, REFUSAL);
}

#[test]
fn paraphrase_falls_back_to_best_effort() {
    let generated = "Les données sont gardées durant une période de trois ans.";
    let records = Aligner::default().align(generated, &SOURCES);

    let answer = ground(&records);
    assert_eq!(answer.tier, GroundingTier::BestEffort);
    assert_eq!(answer.text, SOURCES[0]);
}

#[test]
fn records_serialize_with_flat_fields() {
    let records = Aligner::default().align(SOURCES[2], &SOURCES);
    let json = serde_json::to_value(&records).unwrap();

    assert_eq!(json[0]["generated"], SOURCES[2]);
    assert_eq!(json[0]["source"], SOURCES[2]);
    assert_eq!(json[0]["similarity"], 1.0);
    assert_eq!(json[0]["aligned"], true);

    let back: Vec<AlignmentRecord> = serde_json::from_value(json).unwrap();
    assert_eq!(back, records);
}

#[test]
fn deserializing_checks_invariants() {
    let verified_without_source = r#"{"generated": "x", "source": null, "similarity": 0.9, "aligned": true}"#;
    let err = serde_json::from_str::<AlignmentRecord>(verified_without_source).unwrap_err();
    assert!(err.to_string().contains(&AlignError::AlignedWithoutSource.to_string()));

    let out_of_range = r#"{"generated": "x", "similarity": 1.5, "aligned": false}"#;
    assert!(serde_json::from_str::<AlignmentRecord>(out_of_range).is_err());
}
