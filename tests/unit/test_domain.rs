use reviews_api::domain::review::entity::{ReviewFields, ReviewStatus};
use reviews_api::domain::review::mapper;
use reviews_api::domain::review::status::StatusAction;
use reviews_api::domain::shared::pagination::total_pages;

#[test]
fn status_synonyms_resolve_to_one_action() {
    assert_eq!(StatusAction::parse("approved"), Some(StatusAction::Approve));
    assert_eq!(StatusAction::parse("approve"), Some(StatusAction::Approve));
    assert_eq!(StatusAction::parse("1"), Some(StatusAction::Approve));
    assert_eq!(StatusAction::parse("hold"), Some(StatusAction::Hold));
    assert_eq!(StatusAction::parse("0"), Some(StatusAction::Hold));
    assert_eq!(StatusAction::parse("archived"), None);
}

#[test]
fn external_vocabulary_always_emits_approved() {
    assert_eq!(ReviewStatus::from_internal("approve"), ReviewStatus::Approved);
    assert_eq!(ReviewStatus::from_internal("1"), ReviewStatus::Approved);
    assert_eq!(ReviewStatus::Approved.as_internal(), "approve");
    assert_eq!(
        serde_json::to_value(ReviewStatus::Approved).unwrap(),
        serde_json::json!("approved")
    );
}

#[test]
fn mapper_keeps_absent_fields_absent() {
    let patch = mapper::to_internal(&ReviewFields::default(), None, 0);
    assert!(!patch.has_changes());
}

#[test]
fn pagination_math_is_stable() {
    assert_eq!(total_pages(25, 10), 3);
    assert_eq!(total_pages(0, 10), 0);
}
