//! Integration tests for pretrace.
//!
//! These tests run the full alignment → profile → classifier → summary
//! pipeline through the public API.

use pretrace::prelude::*;

fn rotated(rows: &[(&str, Point)], theta: f64, shift: Point) -> Layout {
    let (s, c) = theta.sin_cos();
    Layout::from_rows(
        rows.iter()
            .map(|&(doc, [x, y])| (doc, [c * x - s * y + shift[0], s * x + c * y + shift[1]])),
    )
}

fn reflected(rows: &[(&str, Point)]) -> Layout {
    Layout::from_rows(rows.iter().map(|&(doc, [x, y])| (doc, [-x, y])))
}

const ABC: [(&str, Point); 3] = [("A", [0.0, 0.0]), ("B", [1.0, 0.0]), ("C", [0.0, 2.0])];

/// Eight documents on a ring; `stemmed` layouts push the first four outward.
fn ring(stemmed: bool) -> Layout {
    let names = ["d0", "d1", "d2", "d3", "d4", "d5", "d6", "d7"];
    Layout::from_rows(names.iter().enumerate().map(|(k, &name)| {
        let angle = k as f64 * std::f64::consts::FRAC_PI_4;
        let radius = if stemmed && k < 4 { 3.0 } else { 1.0 };
        (name, [radius * angle.cos(), radius * angle.sin()])
    }))
}

#[test]
fn test_three_document_rotation_workflow() {
    let layouts = LayoutSet::new(vec![
        Layout::from_rows(ABC),
        rotated(&ABC, std::f64::consts::FRAC_PI_2, [0.0, 0.0]),
        rotated(&ABC, 1.3, [0.0, 0.0]),
    ])
    .expect("same documents everywhere");
    let decisions = DecisionMatrix::from_columns(vec![("stem".to_string(), vec![0, 1, 1])])
        .expect("binary column");

    // Stage by stage: alignment recovers the anchor.
    let aligned = align_layouts(&layouts, 0).expect("aligned");
    assert_eq!(aligned.documents(), &["A", "B", "C"]);
    for i in 1..3 {
        for (p, q) in aligned.points(i).iter().zip(aligned.points(0)) {
            assert!((p[0] - q[0]).abs() < 1e-9, "layout {i}: {p:?} vs {q:?}");
            assert!((p[1] - q[1]).abs() < 1e-9, "layout {i}: {p:?} vs {q:?}");
        }
    }

    // Whole pipeline: collapsed trajectories only support the majority class.
    let report = assess_predictability(&layouts, &decisions).expect("valid inputs");
    let errors = report.document_errors();
    assert_eq!(errors.shape(), (3, 1));
    for doc in ["A", "B", "C"] {
        let e = errors.get(doc, "stem").expect("cell");
        assert!((e - 1.0 / 3.0).abs() < 1e-12, "{doc}: {e}");
    }

    let stem = report.summary("stem").expect("stem row");
    assert!((stem.mean_classification_error - 1.0 / 3.0).abs() < 1e-12);
    assert_eq!(report.alignments().len(), 3);
    assert!(report.alignments()[0].is_anchor);
    assert!(report.alignments()[1..].iter().all(|a| a.fit.residual_ss < 1e-18));
}

#[test]
fn test_geometry_changing_decision_is_significant() {
    let layouts = LayoutSet::new(vec![ring(false), ring(true), ring(false), ring(true)])
        .expect("valid layouts");
    let decisions = DecisionMatrix::from_columns(vec![
        ("stem".to_string(), vec![0, 1, 0, 1]),
        ("lowercase".to_string(), vec![0, 0, 1, 1]),
    ])
    .expect("binary columns");

    let report = assess_predictability(&layouts, &decisions).expect("valid inputs");

    let stem = report.summary("stem").expect("stem row");
    assert_eq!(stem.mean_classification_error, 0.0);
    assert!(stem.significant);

    // `lowercase` does not move anything: each position carries one label of
    // each kind, so every classifier gets half of them wrong.
    let lowercase = report.summary("lowercase").expect("lowercase row");
    assert_eq!(lowercase.mean_classification_error, 0.5);
    assert!(!lowercase.significant);
    assert_eq!(report.significant_decisions(), vec!["stem"]);
}

#[test]
fn test_reflected_layout_is_aligned() {
    let layouts = LayoutSet::new(vec![Layout::from_rows(ABC), reflected(&ABC)])
        .expect("valid layouts");
    let aligned = align_layouts(&layouts, 0).expect("aligned");

    assert!(aligned.diagnostics()[1].fit.reflected);
    for (p, q) in aligned.points(1).iter().zip(aligned.points(0)) {
        assert!((p[0] - q[0]).abs() < 1e-9 && (p[1] - q[1]).abs() < 1e-9);
    }
}

#[test]
fn test_row_order_does_not_matter() {
    let shuffled = Layout::from_rows([ABC[2], ABC[0], ABC[1]]);
    let layouts = LayoutSet::new(vec![shuffled, rotated(&ABC, 0.4, [3.0, -1.0])])
        .expect("valid layouts");
    let profiles = build_profiles(&align_layouts(&layouts, 0).expect("aligned"));

    let names: Vec<&str> = profiles.iter().map(DocumentProfile::document).collect();
    assert_eq!(names, vec!["A", "B", "C"]);
    let c = &profiles[2];
    assert!((c.point(1)[0] - 0.0).abs() < 1e-9);
    assert!((c.point(1)[1] - 2.0).abs() < 1e-9);
}

#[test]
fn test_single_layout_rejected() {
    let result = LayoutSet::new(vec![Layout::from_rows(ABC)]);
    assert_eq!(result, Err(PretraceError::InsufficientLayouts { found: 1 }));
}

#[test]
fn test_single_layout_rejected_when_read_from_json() {
    let json = r#"{"layouts":[{"documents":["A","B"],"points":[[0,0],[1,1]]}]}"#;
    let err = serde_json::from_str::<LayoutSet>(json).expect_err("one layout");
    assert!(
        err.to_string()
            .contains(&PretraceError::InsufficientLayouts { found: 1 }.to_string()),
        "{err}"
    );
}

#[test]
fn test_inputs_read_from_json_run_end_to_end() {
    let layouts = LayoutSet::new(vec![ring(false), ring(true), ring(false), ring(true)])
        .expect("valid layouts");
    let decisions = DecisionMatrix::from_columns(vec![("stem".to_string(), vec![0, 1, 0, 1])])
        .expect("binary column");

    let layouts: LayoutSet =
        serde_json::from_str(&serde_json::to_string(&layouts).expect("serializable"))
            .expect("valid layouts");
    let decisions: DecisionMatrix =
        serde_json::from_str(&serde_json::to_string(&decisions).expect("serializable"))
            .expect("valid decisions");

    let report = assess_predictability(&layouts, &decisions).expect("valid inputs");
    assert_eq!(report.significant_decisions(), vec!["stem"]);
}

#[test]
fn test_mismatched_documents_rejected() {
    let other = Layout::from_rows([("A", [0.0, 0.0]), ("B", [1.0, 0.0]), ("D", [0.0, 2.0])]);
    let err = LayoutSet::new(vec![Layout::from_rows(ABC), other]).expect_err("mismatch");
    assert_eq!(
        err,
        PretraceError::DocumentSetMismatch {
            layout: 1,
            missing: vec!["C".to_string()],
            unexpected: vec!["D".to_string()],
        }
    );
    assert!(err.to_string().contains("layout 1"));
}

#[test]
fn test_non_finite_coordinate_rejected() {
    let bad = Layout::from_rows([("A", [0.0, 0.0]), ("B", [f64::NAN, 0.0]), ("C", [0.0, 2.0])]);
    assert!(matches!(
        LayoutSet::new(vec![Layout::from_rows(ABC), bad]),
        Err(PretraceError::NonFiniteCoordinate { layout: 1, .. })
    ));
}

#[test]
fn test_decision_row_count_must_match_layouts() {
    let layouts =
        LayoutSet::new(vec![Layout::from_rows(ABC), rotated(&ABC, 0.3, [0.0, 0.0])]).expect("valid");
    let decisions = DecisionMatrix::from_columns(vec![("stem".to_string(), vec![0, 1, 1])])
        .expect("binary column");

    let err = assess_predictability(&layouts, &decisions).expect_err("3 rows for 2 layouts");
    assert!(matches!(err, PretraceError::DimensionMismatch { .. }));
}

#[test]
fn test_non_binary_decision_rejected() {
    let err = DecisionMatrix::from_columns(vec![("stem".to_string(), vec![0, 2, 1])])
        .expect_err("2 is not a label");
    assert_eq!(
        err,
        PretraceError::InvalidLabel {
            decision: "stem".to_string(),
            row: 1,
            value: 2
        }
    );
}

#[test]
fn test_report_serializes_to_json() {
    let layouts = LayoutSet::new(vec![ring(false), ring(true), ring(false), ring(true)])
        .expect("valid layouts");
    let decisions = DecisionMatrix::from_columns(vec![("stem".to_string(), vec![0, 1, 0, 1])])
        .expect("binary column");
    let report = assess_predictability(&layouts, &decisions).expect("valid inputs");

    let json = serde_json::to_value(report.summaries()).expect("serializable");
    assert_eq!(json[0]["decision"], "stem");
    assert_eq!(json[0]["significant"], true);
    assert!(json[0].get("CE_upper_bound").is_some());
}
