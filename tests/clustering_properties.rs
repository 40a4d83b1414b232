use assert_approx_eq::assert_approx_eq;
use color_cluster_wasm::{
    CameraState, ClusterConfig, ColorPoint, Error, GestureConfig, GestureController, PixelBuffer,
    PointerEvent, assign_points, cluster, extract_color_points, quantize, rotate_x, rotate_y,
    segment,
};

/// Deterministic pseudo-random points spread across the cube.
fn scattered(n: usize) -> Vec<ColorPoint> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state % 10_000) as f64 / 10_000.0
    };
    (0..n).map(|_| ColorPoint::new(next(), next(), next())).collect()
}

#[test]
fn two_extreme_points_split_into_two_clusters() {
    let points = vec![ColorPoint::new(0.0, 0.0, 0.0), ColorPoint::new(1.0, 1.0, 1.0)];
    let cfg = ClusterConfig::default().with_k(2).with_max_iterations(10);
    for seed in 0..8 {
        let result = cluster(&points, &cfg.with_seed(seed)).unwrap();
        let mut centroids = result.centroids().to_vec();
        centroids.sort_by(|a, b| a.channels()[0].total_cmp(&b.channels()[0]));
        assert_eq!(centroids, points);
        assert!(result.converged());
    }
}

#[test]
fn more_clusters_than_distinct_points_is_rejected() {
    let points = vec![ColorPoint::new(0.2, 0.2, 0.2), ColorPoint::new(0.8, 0.8, 0.8)];
    let result = cluster(&points, &ClusterConfig::default().with_k(3));
    assert!(matches!(result, Err(Error::InvalidArgument(_))));
}

#[test]
fn zero_iterations_keep_the_seeded_point() {
    let points = scattered(50);
    let cfg = ClusterConfig::default().with_k(1).with_max_iterations(0).with_seed(42);
    let a = cluster(&points, &cfg).unwrap();
    let b = cluster(&points, &cfg).unwrap();
    assert!(points.contains(&a.centroids()[0]));
    assert_eq!(a, b);
}

#[test]
fn single_cluster_centroid_is_channel_mean() {
    let points = scattered(200);
    let n = points.len() as f64;
    let mean = points.iter().fold([0.0; 3], |acc, p| {
        let c = p.channels();
        [acc[0] + c[0], acc[1] + c[1], acc[2] + c[2]]
    });
    let result = cluster(&points, &ClusterConfig::default().with_k(1).with_seed(5)).unwrap();
    let c = result.centroids()[0].channels();
    for i in 0..3 {
        assert_approx_eq!(c[i], mean[i] / n, 1e-12);
    }
}

#[test]
fn fixed_seed_is_deterministic() {
    let points = scattered(500);
    let cfg = ClusterConfig::default().with_k(6).with_max_iterations(50).with_seed(1234);
    let a = cluster(&points, &cfg).unwrap();
    let b = cluster(&points, &cfg).unwrap();
    assert_eq!(a.centroids(), b.centroids());
    assert_eq!(a.assignments(), b.assignments());
}

#[test]
fn converged_result_is_a_fixed_point() {
    let points = scattered(400);
    let cfg = ClusterConfig::default().with_k(5).with_max_iterations(500).with_seed(9);
    let result = cluster(&points, &cfg).unwrap();
    assert!(result.converged());
    let relabelled = assign_points(&points, result.centroids()).unwrap();
    assert_eq!(relabelled, result.assignments());
}

#[test]
fn centroids_stay_inside_the_cube() {
    let points = scattered(300);
    let result = cluster(&points, &ClusterConfig::default().with_k(8).with_seed(3)).unwrap();
    for c in result.centroids() {
        assert!(c.channels().iter().all(|v| (0.0..=1.0).contains(v)));
    }
    assert_eq!(result.assignments().len(), points.len());
    assert!(result.assignments().iter().all(|&l| l < 8));
}

#[test]
fn segmentation_uses_only_centroid_colours() {
    let (w, h) = (12u32, 9u32);
    let pixels: Vec<[f64; 3]> = scattered((w * h) as usize)
        .into_iter()
        .map(|p| p.channels())
        .collect();
    let buffer = PixelBuffer::new(w, h, pixels).unwrap();
    let points = extract_color_points(&buffer);
    let result = cluster(&points, &ClusterConfig::default().with_k(4).with_seed(77)).unwrap();

    let out = segment(&buffer, result.centroids()).unwrap();
    assert_eq!(out.dimensions(), (w, h));
    assert_eq!(out.pixels().count(), points.len());

    let allowed: Vec<[u8; 3]> = result.centroids().iter().map(quantize).collect();
    for px in out.pixels() {
        assert_eq!(px[3], 255);
        assert!(allowed.contains(&[px[0], px[1], px[2]]));
    }
}

#[test]
fn rotations_undo_each_other() {
    let v = [0.25, -0.4, 0.35];
    let theta = 0.77;
    let back_x = rotate_x(rotate_x(v, theta), -theta);
    let back_y = rotate_y(rotate_y(v, theta), -theta);
    for i in 0..3 {
        assert_approx_eq!(back_x[i], v[i], 1e-12);
        assert_approx_eq!(back_y[i], v[i], 1e-12);
    }
}

#[test]
fn pinch_doubling_distance_doubles_zoom() {
    let mut gestures = GestureController::new(GestureConfig::default());
    let mut camera = CameraState::default();
    gestures.apply_pointer_event(&mut camera, PointerEvent::down(1, 40.0, 60.0));
    gestures.apply_pointer_event(&mut camera, PointerEvent::down(2, 60.0, 60.0));
    // Both ends move together through one event each, keeping the midpoint.
    gestures.apply_pointer_event(&mut camera, PointerEvent::moved(1, 30.0, 60.0));
    gestures.apply_pointer_event(&mut camera, PointerEvent::moved(2, 70.0, 60.0));
    assert_approx_eq!(camera.zoom(), 2.0);
    assert_approx_eq!(camera.pan[0], 0.0);
    assert_approx_eq!(camera.pan[1], 0.0);
}
