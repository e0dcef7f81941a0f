use super::*;
use crate::layout::Layout;

const TOL: f64 = 1e-9;

fn anchor_points() -> Vec<Point> {
    vec![[0.0, 0.0], [2.0, 0.5], [1.0, 3.0], [-1.5, 1.0]]
}

fn transform(points: &[Point], theta: f64, reflect: bool, shift: Point) -> Vec<Point> {
    let (s, c) = theta.sin_cos();
    points
        .iter()
        .map(|p| {
            let y = if reflect { -p[1] } else { p[1] };
            [c * p[0] - s * y + shift[0], s * p[0] + c * y + shift[1]]
        })
        .collect()
}

fn assert_points_close(actual: &[Point], expected: &[Point]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            (a[0] - e[0]).abs() < TOL && (a[1] - e[1]).abs() < TOL,
            "expected {e:?}, got {a:?}"
        );
    }
}

#[test]
fn test_self_alignment_is_identity() {
    let x = anchor_points();
    let fit = fit_procrustes(&x, &x).expect("same points");

    assert!(!fit.reflected);
    assert!((fit.rotation[0][0] - 1.0).abs() < TOL);
    assert!(fit.rotation[0][1].abs() < TOL);
    assert!(fit.rotation[1][0].abs() < TOL);
    assert!((fit.rotation[1][1] - 1.0).abs() < TOL);
    assert!(fit.translation[0].abs() < TOL && fit.translation[1].abs() < TOL);
    assert!(fit.residual_ss < TOL);
}

#[test]
fn test_recovers_rotation_and_translation() {
    let x = anchor_points();
    let y = transform(&x, 1.1, false, [4.0, -2.5]);
    let fit = fit_procrustes(&x, &y).expect("matching sets");

    assert!(!fit.reflected);
    let aligned: Vec<Point> = y.iter().map(|&p| fit.apply(p)).collect();
    assert_points_close(&aligned, &x);
    assert!(fit.residual_ss < TOL);
}

#[test]
fn test_recovers_reflection() {
    let x = anchor_points();
    let y = transform(&x, -0.4, true, [1.0, 1.0]);
    let fit = fit_procrustes(&x, &y).expect("matching sets");

    assert!(fit.reflected);
    let det = fit.rotation[0][0] * fit.rotation[1][1] - fit.rotation[0][1] * fit.rotation[1][0];
    assert!((det + 1.0).abs() < TOL);
    let aligned: Vec<Point> = y.iter().map(|&p| fit.apply(p)).collect();
    assert_points_close(&aligned, &x);
}

#[test]
fn test_does_not_rescale() {
    let x = anchor_points();
    let y: Vec<Point> = x.iter().map(|p| [p[0] * 3.0, p[1] * 3.0]).collect();
    let fit = fit_procrustes(&x, &y).expect("matching sets");

    // Orthogonal transform keeps the spread of the scaled copy.
    assert!(fit.residual_ss > 1.0);
    let aligned: Vec<Point> = y.iter().map(|&p| fit.apply(p)).collect();
    let spread = |pts: &[Point]| {
        let c = centroid(pts);
        pts.iter()
            .map(|p| (p[0] - c[0]).powi(2) + (p[1] - c[1]).powi(2))
            .sum::<f64>()
    };
    assert!((spread(&aligned) - spread(&y)).abs() < 1e-6);
}

#[test]
fn test_degenerate_points_translate_only() {
    let x = anchor_points();
    let y = vec![[7.0, 7.0]; 4];
    let fit = fit_procrustes(&x, &y).expect("matching sets");

    assert!(!fit.reflected);
    let c = centroid(&x);
    let p = fit.apply([7.0, 7.0]);
    assert!((p[0] - c[0]).abs() < TOL && (p[1] - c[1]).abs() < TOL);
}

#[test]
fn test_fit_rejects_length_mismatch() {
    let x = anchor_points();
    let result = fit_procrustes(&x, &x[..2]);
    assert!(matches!(result, Err(PretraceError::DimensionMismatch { .. })));
}

#[test]
fn test_fit_rejects_empty() {
    let result = fit_procrustes(&[], &[]);
    assert!(result.is_err());
}

fn named(points: &[Point]) -> Vec<(String, Point)> {
    ["d", "a", "c", "b"]
        .iter()
        .zip(points)
        .map(|(n, p)| ((*n).to_string(), *p))
        .collect()
}

#[test]
fn test_align_layouts_uses_sorted_anchor_order() {
    let x = anchor_points();
    let rotated = transform(&x, 2.0, false, [0.5, 0.5]);

    // Second layout lists its rows in a different order.
    let mut rows = named(&rotated);
    rows.reverse();

    let set = LayoutSet::new(vec![Layout::from_rows(named(&x)), Layout::from_rows(rows)])
        .expect("same documents");
    let aligned = align_layouts(&set, 0).expect("valid anchor");

    assert_eq!(aligned.documents(), &["a", "b", "c", "d"]);
    assert_eq!(aligned.n_layouts(), 2);

    let expected_anchor = vec![x[1], x[3], x[2], x[0]];
    assert_eq!(aligned.points(0), expected_anchor.as_slice());
    assert_points_close(aligned.points(1), &expected_anchor);

    let diags = aligned.diagnostics();
    assert!(diags[0].is_anchor);
    assert_eq!(diags[0].fit, ProcrustesFit::identity());
    assert!(!diags[1].is_anchor);
    assert!(diags[1].fit.residual_ss < TOL);
}

#[test]
fn test_align_layouts_with_non_default_anchor() {
    let x = anchor_points();
    let rotated = transform(&x, 0.7, false, [3.0, 0.0]);
    let set = LayoutSet::new(vec![
        Layout::from_rows(named(&x)),
        Layout::from_rows(named(&rotated)),
    ])
    .expect("same documents");

    let aligned = align_layouts(&set, 1).expect("valid anchor");
    assert_eq!(aligned.anchor(), 1);
    assert!(aligned.diagnostics()[1].is_anchor);

    let sorted_rotated = vec![rotated[1], rotated[3], rotated[2], rotated[0]];
    assert_eq!(aligned.points(1), sorted_rotated.as_slice());
    assert_points_close(aligned.points(0), &sorted_rotated);
}

#[test]
fn test_align_layouts_rejects_bad_anchor() {
    let x = anchor_points();
    let set = LayoutSet::new(vec![Layout::from_rows(named(&x)), Layout::from_rows(named(&x))])
        .expect("same documents");
    let err = align_layouts(&set, 2).expect_err("anchor 2 of 2");
    assert_eq!(
        err,
        PretraceError::AnchorOutOfRange {
            anchor: 2,
            n_layouts: 2
        }
    );
}
