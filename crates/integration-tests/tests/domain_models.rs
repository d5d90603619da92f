//! Model-level invariants: the report state machine, the discriminated
//! target reference, and pagination arithmetic.

use domains::{Page, PageRequest, ReportStatus, ReportTarget, ReportType};
use uuid::Uuid;

#[test]
fn report_state_machine_matrix() {
    use ReportStatus::*;

    let legal = [
        (Pending, Reviewed),
        (Pending, Resolved),
        (Pending, Dismissed),
        (Reviewed, Resolved),
        (Reviewed, Dismissed),
    ];
    for (from, to) in legal {
        assert!(from.can_transition_to(to), "{from} -> {to} should be legal");
    }

    let illegal = [
        (Pending, Pending),
        (Reviewed, Pending),
        (Reviewed, Reviewed),
        (Resolved, Pending),
        (Resolved, Reviewed),
        (Resolved, Dismissed),
        (Dismissed, Pending),
        (Dismissed, Resolved),
        (Dismissed, Dismissed),
    ];
    for (from, to) in illegal {
        assert!(!from.can_transition_to(to), "{from} -> {to} should be illegal");
    }

    assert!(Resolved.is_terminal());
    assert!(Dismissed.is_terminal());
    assert!(!Pending.is_terminal());
    assert!(!Reviewed.is_terminal());
}

#[test]
fn target_variant_round_trips_through_model_tag() {
    let id = Uuid::now_v7();
    for target in [ReportTarget::Blog(id), ReportTarget::Comment(id), ReportTarget::User(id)] {
        assert_eq!(ReportTarget::from_model(target.model(), id), Some(target));
        assert_eq!(target.id(), id);
    }
    assert_eq!(ReportTarget::from_model("Gallery", id), None);
}

#[test]
fn report_type_serialization_matches_wire_names() {
    assert_eq!(serde_json::to_string(&ReportType::Article).unwrap(), "\"article\"");
    assert_eq!(serde_json::to_string(&ReportType::General).unwrap(), "\"general\"");
    let parsed: ReportType = serde_json::from_str("\"comment\"").unwrap();
    assert_eq!(parsed, ReportType::Comment);
}

#[test]
fn pagination_envelope_arithmetic() {
    // 25 items at page size 10: page 3 carries the trailing 5.
    let request = PageRequest::new(3, 10);
    assert_eq!(request.offset(), 20);
    let page = Page::new(vec![0; 5], 25, request);
    assert_eq!(page.current_page, 3);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.total_count, 25);

    // An exact multiple does not round up an extra page.
    let page = Page::new(vec![0; 10], 30, PageRequest::new(1, 10));
    assert_eq!(page.total_pages, 3);
}

#[test]
fn page_request_bounds() {
    assert_eq!(PageRequest::new(0, 10).page(), 1);
    assert_eq!(PageRequest::new(2, 0).per_page(), 1);
    assert_eq!(PageRequest::new(2, 10_000).per_page(), PageRequest::MAX_PER_PAGE);
    assert_eq!(PageRequest::default().per_page(), PageRequest::DEFAULT_PER_PAGE);
}
