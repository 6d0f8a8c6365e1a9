//! Axis-aligned bounds `[xmin, xmax, ymin, ymax, zmin, zmax]` and integer extents.

/// Bounds that compare as empty against any point, ready to be grown.
pub fn create_uninitialized_bounds() -> [f64; 6] {
    [f64::MAX, -f64::MAX, f64::MAX, -f64::MAX, f64::MAX, -f64::MAX]
}

/// Mark `bounds` as uninitialized.
pub fn uninitialize_bounds(bounds: &mut [f64; 6]) {
    *bounds = [1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
}

/// Whether `bounds` holds a valid x range.
pub fn are_bounds_initialized(bounds: &[f64; 6]) -> bool {
    bounds[1] - bounds[0] >= 0.0
}

/// The box spanned by two corner points.
pub fn compute_bounds_from_points(point1: &[f64; 3], point2: &[f64; 3], bounds: &mut [f64; 6]) {
    for i in 0..3 {
        bounds[2 * i] = point1[i].min(point2[i]);
        bounds[2 * i + 1] = point1[i].max(point2[i]);
    }
}

/// Whether the integer extent `extent1` lies inside `extent2`.
pub fn extent_is_within_other_extent(extent1: &[i64; 6], extent2: &[i64; 6]) -> bool {
    (0..6).step_by(2).all(|i| {
        extent1[i] >= extent2[i]
            && extent1[i] <= extent2[i + 1]
            && extent1[i + 1] >= extent2[i]
            && extent1[i + 1] <= extent2[i + 1]
    })
}

/// Whether `bounds1` lies inside `bounds2`, each axis widened by `delta`.
pub fn bounds_is_within_other_bounds(
    bounds1: &[f64; 6],
    bounds2: &[f64; 6],
    delta: &[f64; 3],
) -> bool {
    (0..3).all(|axis| {
        let i = 2 * axis;
        let d = delta[axis];
        !(bounds1[i] + d < bounds2[i]
            || bounds1[i] - d > bounds2[i + 1]
            || bounds1[i + 1] + d < bounds2[i]
            || bounds1[i + 1] - d > bounds2[i + 1])
    })
}

/// Whether `point` lies inside `bounds`, each axis widened by `delta`.
pub fn point_is_within_bounds(point: &[f64; 3], bounds: &[f64; 6], delta: &[f64; 3]) -> bool {
    (0..3).all(|i| {
        !(point[i] + delta[i] < bounds[2 * i] || point[i] - delta[i] > bounds[2 * i + 1])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uninitialized_bounds() {
        let mut b = [0.0, 1.0, 0.0, 1.0, 0.0, 1.0];
        assert!(are_bounds_initialized(&b));
        uninitialize_bounds(&mut b);
        assert!(!are_bounds_initialized(&b));
        assert!(!are_bounds_initialized(&create_uninitialized_bounds()));
    }

    #[test]
    fn test_compute_bounds_from_points() {
        let mut b = [0.0; 6];
        compute_bounds_from_points(&[1.0, -2.0, 3.0], &[-1.0, 2.0, 0.0], &mut b);
        assert_eq!(b, [-1.0, 1.0, -2.0, 2.0, 0.0, 3.0]);
    }

    #[test]
    fn test_containment() {
        let outer = [0.0, 10.0, 0.0, 10.0, 0.0, 10.0];
        let inner = [1.0, 2.0, 1.0, 2.0, 9.0, 10.5];
        assert!(!bounds_is_within_other_bounds(&inner, &outer, &[0.0; 3]));
        assert!(bounds_is_within_other_bounds(&inner, &outer, &[0.0, 0.0, 1.0]));

        assert!(point_is_within_bounds(&[10.0, 0.0, 5.0], &outer, &[0.0; 3]));
        assert!(!point_is_within_bounds(&[10.1, 0.0, 5.0], &outer, &[0.0; 3]));

        assert!(extent_is_within_other_extent(&[0, 2, 0, 2, 0, 2], &[0, 4, 0, 4, 0, 4]));
        assert!(!extent_is_within_other_extent(&[0, 5, 0, 2, 0, 2], &[0, 4, 0, 4, 0, 4]));
    }
}
