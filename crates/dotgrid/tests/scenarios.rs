use approx::assert_abs_diff_eq;
use dotgrid::{
    directional_length, longest_path, BlobFeature, BlobGraph, DotGridDetector, DotGridError,
    DotGridParams, PathMarks, PathParams, WalkOptions, DIRECTION_BUCKETS,
};
use dotgrid_core::{FieldError, GrayImage, ResponseMap};
use nalgebra::Point2;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn graph_of(points: &[(f32, f32)]) -> BlobGraph {
    BlobGraph::with_features(points.iter().map(|&(x, y)| BlobFeature::at(x, y)).collect())
}

fn assert_graph_consistent(g: &BlobGraph) {
    for (_, f) in g.iter() {
        assert_eq!(f.neighbors().len(), f.separations().len());
        assert_eq!(f.neighbors().len(), f.bearings().len());
        for (bucket, edges) in f.direction_index().iter() {
            assert!(bucket < DIRECTION_BUCKETS);
            for &e in edges {
                assert!(e < f.neighbor_count());
            }
        }
    }
}

const A: usize = 0;
const B: usize = 1;
const C: usize = 2;
const D: usize = 3;

#[test]
fn collinear_chain_is_found_from_both_ends() {
    init_logger();
    let mut g = graph_of(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    assert_eq!(4, g.link_within_radius(15.0, None));
    assert_graph_consistent(&g);

    let params = PathParams::default();
    let mut marks = PathMarks::new(g.len());
    let from_a = longest_path(&g, A, false, &params, &mut marks);
    assert_eq!(2, from_a.length);
    assert_eq!(Some(C), from_a.end);

    let from_c = longest_path(&g, C, false, &params, &mut marks);
    assert_eq!(2, from_c.length);
    assert_eq!(Some(A), from_c.end);
}

#[test]
fn small_neighbourhood_forms_no_edges() {
    init_logger();
    let mut g = graph_of(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
    assert_eq!(0, g.link_within_radius(9.0, None));
    let mut marks = PathMarks::new(g.len());
    for id in 0..g.len() {
        let path = longest_path(&g, id, false, &PathParams::default(), &mut marks);
        assert_eq!(0, path.length);
        assert_eq!(None, path.end);
    }
}

#[test]
fn right_angle_follows_the_straight_branch() {
    init_logger();
    let mut g = graph_of(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0), (10.0, 10.0)]);
    g.link_within_radius(15.0, None);
    assert!(g.feature(A).unwrap().is_linked_to(D));
    assert_graph_consistent(&g);

    let params = PathParams {
        tolerance_deg: 5.0,
        ..PathParams::default()
    };
    let mut marks = PathMarks::new(g.len());
    let path = longest_path(&g, A, true, &params, &mut marks);
    assert_eq!(2, path.length);
    assert_eq!(Some(C), path.end);
    assert_eq!(vec![A, B, C], path.nodes);
    assert!(marks.is_selected(A) && marks.is_selected(B) && marks.is_selected(C));
    assert!(!marks.is_selected(D));
}

#[test]
fn walk_length_grows_with_max_depth_up_to_the_chain() {
    let points: Vec<(f32, f32)> = (0..5).map(|i| (i as f32 * 10.0, 0.0)).collect();
    let mut g = graph_of(&points);
    g.link_within_radius(15.0, None);
    let direction = std::f32::consts::FRAC_PI_2;

    let mut last = 0;
    for max_depth in 0..8 {
        let mut marks = PathMarks::new(g.len());
        let opts = WalkOptions {
            max_depth,
            ..WalkOptions::from_params(&PathParams::default())
        };
        let walk = directional_length(&g, 0, direction, opts, &mut marks);
        if max_depth == 0 {
            assert_eq!(0, walk.length);
        }
        assert!(walk.length >= last);
        assert!(walk.length <= g.len() - 1);
        last = walk.length;
    }
    assert_eq!(4, last);
}

#[test]
fn conditional_add_appends_only_on_the_source() {
    let mut g = graph_of(&[(0.0, 0.0), (3.0, 4.0)]);
    assert!(!g.add_neighbour_within(A, B, 5.0));
    assert_eq!(0, g.edge_count());

    assert!(g.add_neighbour_within(A, B, 5.5));
    assert_eq!(1, g.feature(A).unwrap().neighbor_count());
    assert_eq!(0, g.feature(B).unwrap().neighbor_count());
    let edge = g.feature(A).unwrap().edges()[0];
    assert_eq!(B, edge.target);
    assert_abs_diff_eq!(5.0, edge.separation, epsilon = 1e-6);
    assert_abs_diff_eq!(3.0f32.atan2(4.0), edge.bearing, epsilon = 1e-6);
    assert_graph_consistent(&g);
}

const COLS: usize = 5;
const ROWS: usize = 4;
const SPACING: f32 = 20.0;
const DOT_RADIUS: f32 = 5.0;

fn dot_centers() -> Vec<Point2<f32>> {
    let mut out = Vec::new();
    for r in 0..ROWS {
        for c in 0..COLS {
            out.push(Point2::new(
                SPACING + c as f32 * SPACING,
                SPACING + r as f32 * SPACING,
            ));
        }
    }
    out
}

fn dot_fields() -> (ResponseMap, GrayImage) {
    let centers = dot_centers();
    let width = (COLS + 1) * SPACING as usize;
    let height = (ROWS + 1) * SPACING as usize;
    let nearest = |x: usize, y: usize| {
        centers
            .iter()
            .map(|c| ((x as f32 - c.x).powi(2) + (y as f32 - c.y).powi(2)).sqrt())
            .fold(f32::INFINITY, f32::min)
    };
    let spot = ResponseMap::from_fn(width, height, |x, y| {
        (1.0 - nearest(x, y) / DOT_RADIUS).max(0.0)
    });
    let mono = GrayImage::from_fn(width, height, |x, y| {
        if nearest(x, y) <= DOT_RADIUS {
            30
        } else {
            220
        }
    });
    (spot, mono)
}

#[test]
fn detector_recovers_lattice_rows() {
    init_logger();
    let (spot, mono) = dot_fields();
    let mut seeds = dot_centers();
    // A seed on empty background.
    seeds.push(Point2::new(5.0, 95.0));

    let mut params = DotGridParams::default();
    params.graph.neighborhood_radius = 25.0;
    let detector = DotGridDetector::new(params);
    let det = detector.detect(&seeds, &spot.view(), &mono.view()).unwrap();

    assert_eq!(seeds.len(), det.graph.len());
    assert_eq!(vec![COLS * ROWS], det.garbage);
    assert_eq!(0, det.graph.feature(COLS * ROWS).unwrap().neighbor_count());
    for (_, f) in det.graph.iter().take(COLS * ROWS) {
        assert_abs_diff_eq!(4.1, f.average_radius, epsilon = 1e-3);
        assert_abs_diff_eq!(0.0, f.ovality.unwrap(), epsilon = 1e-6);
        assert_abs_diff_eq!(30.0, f.average_intensity, epsilon = 1e-3);
    }
    assert_graph_consistent(&det.graph);

    assert_eq!(ROWS, det.lines.len());
    for (r, line) in det.lines.iter().enumerate() {
        let expected: Vec<usize> = (0..COLS).map(|c| r * COLS + c).collect();
        assert_eq!(expected, line.nodes);
    }
    let points = det.line_points();
    assert_abs_diff_eq!(SPACING, points[0][0].x, epsilon = 1e-6);
}

#[test]
fn detector_rejects_mismatched_inputs() {
    let detector = DotGridDetector::new(DotGridParams::default());
    let spot = ResponseMap::new(8, 8);
    let mono = GrayImage::new(8, 6);
    let err = detector.detect(&[], &spot.view(), &mono.view()).unwrap_err();
    assert_eq!(
        DotGridError::SizeMismatch {
            spot: (8, 8),
            mono: (8, 6)
        },
        err
    );

    let err = detector
        .detect_raw(4, 4, &[0.0; 16], &[0; 12], &[])
        .unwrap_err();
    assert_eq!(
        DotGridError::Field(FieldError::SizeMismatch {
            width: 4,
            height: 4,
            expected: 16,
            actual: 12
        }),
        err
    );
}
