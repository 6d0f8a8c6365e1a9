use num_traits::{Float, NumCast};

/// Storage of 3D points addressed by a dense index.
///
/// The locator only keeps point ids; coordinates always live in the container,
/// which may store single or double precision values.
pub trait PointContainer {
    /// Number of points currently stored.
    fn number_of_points(&self) -> usize;

    /// Coordinates of point `idx`, widened to `f64`.
    fn point(&self, idx: usize) -> [f64; 3];

    /// Write point `idx`, growing the container if `idx` is past the end.
    fn set_point(&mut self, idx: usize, coords: &[f64; 3]);

    /// Append a point and return its index.
    fn push_point(&mut self, coords: &[f64; 3]) -> usize;

    /// Whether point `idx` is bit-for-bit equal to `coords` once `coords` is
    /// converted to the storage precision.
    fn coincides(&self, idx: usize, coords: &[f64; 3]) -> bool;
}

fn to_storage<T: Float>(coords: &[f64; 3]) -> [T; 3] {
    coords.map(|c| <T as NumCast>::from(c).unwrap_or_else(T::nan))
}

impl<T: Float> PointContainer for Vec<[T; 3]> {
    fn number_of_points(&self) -> usize {
        self.len()
    }

    fn point(&self, idx: usize) -> [f64; 3] {
        self[idx].map(|c| c.to_f64().unwrap_or(f64::NAN))
    }

    fn set_point(&mut self, idx: usize, coords: &[f64; 3]) {
        if idx >= self.len() {
            self.resize(idx + 1, [T::zero(); 3]);
        }
        self[idx] = to_storage(coords);
    }

    fn push_point(&mut self, coords: &[f64; 3]) -> usize {
        self.push(to_storage(coords));
        self.len() - 1
    }

    fn coincides(&self, idx: usize, coords: &[f64; 3]) -> bool {
        self[idx] == to_storage::<T>(coords)
    }
}

impl<C: PointContainer + ?Sized> PointContainer for &mut C {
    fn number_of_points(&self) -> usize {
        (**self).number_of_points()
    }

    fn point(&self, idx: usize) -> [f64; 3] {
        (**self).point(idx)
    }

    fn set_point(&mut self, idx: usize, coords: &[f64; 3]) {
        (**self).set_point(idx, coords)
    }

    fn push_point(&mut self, coords: &[f64; 3]) -> usize {
        (**self).push_point(coords)
    }

    fn coincides(&self, idx: usize, coords: &[f64; 3]) -> bool {
        (**self).coincides(idx, coords)
    }
}
