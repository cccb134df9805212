//! Trust score flows for a submitted profile form.

use std::collections::BTreeSet;

use welcomehub_trust::{
    evaluate, Badge, Certification, DocumentRef, ProfileInput, TrustScoreConfig,
    TrustScoreEvaluator,
};

fn contact_profile() -> ProfileInput {
    ProfileInput::new()
        .with_name("A")
        .with_email("a@x.com")
        .with_phone("1234567890")
}

#[test]
fn test_empty_form_scores_nothing() {
    let result = evaluate(&ProfileInput::new());
    assert_eq!(result.score, 0);
    assert!(result.badges.is_empty());
}

#[test]
fn test_contact_details_only() {
    let result = evaluate(&contact_profile());
    assert_eq!(result.score, 50);
    assert_eq!(result.badges, BTreeSet::from([Badge::Bronze]));
}

#[test]
fn test_verified_profile() {
    let profile = contact_profile().with_verification_document(DocumentRef::new("id.pdf"));
    let result = evaluate(&profile);
    assert_eq!(result.score, 100);
    assert_eq!(result.highest_badge(), Some(Badge::Gold));
}

#[test]
fn test_certified_profile() {
    let profile = contact_profile()
        .with_certification(Certification::new("CPR", "Red Cross", "2023-05-02"))
        .with_certification(Certification::new("Forklift", "OSHA", "2022-11-14"));
    let result = evaluate(&profile);
    assert_eq!(result.score, 70);
    assert_eq!(result.badges, BTreeSet::from([Badge::Silver]));
}

#[test]
fn test_submission_from_form_json() {
    let payload = r#"{
        "name": "Grace",
        "email": "grace@example.com",
        "phone": "5550001111",
        "verificationDocument": { "fileName": "license.png", "contentType": "image/png" },
        "certifications": []
    }"#;
    let profile: ProfileInput = serde_json::from_str(payload).unwrap();

    assert!(profile.validate_submission().is_ok());
    let result = evaluate(&profile);
    assert_eq!(result.score, 100);
    assert!(result.has_badge(Badge::Gold));
}

#[test]
fn test_submission_with_bare_file_input_value() {
    let payload = r#"{
        "name": "Grace",
        "email": "grace@example.com",
        "phone": "5550001111",
        "verificationDocument": "C:\\fakepath\\id.pdf"
    }"#;
    let profile: ProfileInput = serde_json::from_str(payload).unwrap();
    assert!(profile.validate_submission().is_ok());
    assert_eq!(evaluate(&profile).score, 100);

    let flagged: ProfileInput =
        serde_json::from_str(r#"{ "name": "Grace", "verificationDocument": true }"#).unwrap();
    assert_eq!(evaluate(&flagged).score, 60);
}

#[test]
fn test_invalid_submission_still_scores() {
    let profile = ProfileInput::new().with_name("A").with_phone("123");
    assert!(profile.validate_submission().is_err());
    assert_eq!(evaluate(&profile).score, 30);
}

#[test]
fn test_custom_config_changes_tiers() {
    let config = TrustScoreConfig::from_json(
        r#"{ "badgeThresholds": [["Gold", 150], ["Silver", 100], ["Bronze", 50]] }"#,
    )
    .unwrap();
    let evaluator = TrustScoreEvaluator::new(config).unwrap();

    let profile = contact_profile().with_verification_document(DocumentRef::new("id.pdf"));
    let result = evaluator.evaluate(&profile);
    assert_eq!(result.score, 100);
    assert_eq!(result.badges, BTreeSet::from([Badge::Silver]));
}
