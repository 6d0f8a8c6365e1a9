//! Helpers over axis-aligned boxes stored as `[xmin, xmax, ymin, ymax, zmin, zmax]`.

use scivis_linalg::bounds::create_uninitialized_bounds;

/// Extent of the box along `axis`.
pub fn get_length(bounds: &[f64; 6], axis: usize) -> f64 {
    bounds[2 * axis + 1] - bounds[2 * axis]
}

/// Extents of the box along x, y and z.
pub fn get_lengths(bounds: &[f64; 6]) -> [f64; 3] {
    [
        get_length(bounds, 0),
        get_length(bounds, 1),
        get_length(bounds, 2),
    ]
}

/// Center of the box.
pub fn get_center(bounds: &[f64; 6]) -> [f64; 3] {
    [
        0.5 * (bounds[0] + bounds[1]),
        0.5 * (bounds[2] + bounds[3]),
        0.5 * (bounds[4] + bounds[5]),
    ]
}

/// Largest extent of the box.
pub fn get_max_length(bounds: &[f64; 6]) -> f64 {
    let [lx, ly, lz] = get_lengths(bounds);
    lx.max(ly).max(lz)
}

/// Whether every axis range is non-empty.
pub fn is_valid(bounds: &[f64; 6]) -> bool {
    bounds[0] <= bounds[1] && bounds[2] <= bounds[3] && bounds[4] <= bounds[5]
}

/// Reset the box to the empty state, where any added point becomes its only
/// content.
pub fn reset(bounds: &mut [f64; 6]) {
    *bounds = create_uninitialized_bounds();
}

/// Grow the box so that it contains `point`.
pub fn add_point(bounds: &mut [f64; 6], point: &[f64; 3]) {
    for i in 0..3 {
        bounds[2 * i] = bounds[2 * i].min(point[i]);
        bounds[2 * i + 1] = bounds[2 * i + 1].max(point[i]);
    }
}

/// Whether `point` lies in the closed box.
pub fn contains_point(bounds: &[f64; 6], point: &[f64; 3]) -> bool {
    (0..3).all(|i| point[i] >= bounds[2 * i] && point[i] <= bounds[2 * i + 1])
}

/// Pad every side of the box by `delta`.
pub fn inflate(bounds: &mut [f64; 6], delta: f64) {
    for i in 0..3 {
        bounds[2 * i] -= delta;
        bounds[2 * i + 1] += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lengths_and_center() {
        let b = [0.0, 2.0, -1.0, 1.0, 3.0, 3.5];
        assert_eq!(get_lengths(&b), [2.0, 2.0, 0.5]);
        assert_eq!(get_center(&b), [1.0, 0.0, 3.25]);
        assert_relative_eq!(get_max_length(&b), 2.0);
        assert!(is_valid(&b));
    }

    #[test]
    fn test_grow_from_empty() {
        let mut b = [0.0; 6];
        reset(&mut b);
        assert_eq!(b, create_uninitialized_bounds());
        assert!(!is_valid(&b));

        add_point(&mut b, &[1.0, -2.0, 0.5]);
        assert_eq!(b, [1.0, 1.0, -2.0, -2.0, 0.5, 0.5]);
        add_point(&mut b, &[-1.0, 0.0, 0.0]);
        assert_eq!(b, [-1.0, 1.0, -2.0, 0.0, 0.0, 0.5]);

        assert!(contains_point(&b, &[1.0, 0.0, 0.5]));
        assert!(!contains_point(&b, &[1.0, 0.1, 0.5]));

        inflate(&mut b, 0.5);
        assert_eq!(b, [-1.5, 1.5, -2.5, 0.5, -0.5, 1.0]);
    }
}
