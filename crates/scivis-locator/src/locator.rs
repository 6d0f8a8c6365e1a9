use scivis_linalg::vector::distance2_between_points;
use serde::{Deserialize, Serialize};

use crate::{
    bounding_box,
    error::LocatorError,
    node::{NodeId, NodeKind, OctreeNode},
    octree::{InsertMode, Octree},
    points::PointContainer,
};

/// Parameters of the incremental octree point locator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocatorConfig {
    /// Maximum number of points in a leaf before it splits.
    pub max_points_per_leaf: usize,
    /// Distance below which two points are considered the same point.
    pub tolerance: f64,
    /// Expand the root box to a cube so that every octant is a cube.
    pub build_cubic_octree: bool,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            max_points_per_leaf: 128,
            tolerance: 1e-3,
            build_cubic_octree: false,
        }
    }
}

/// Outcome of [`IncrementalOctreePointLocator::is_inserted_point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertedPointQuery {
    /// Id of an inserted point within tolerance of the query, if any.
    pub point_id: Option<usize>,
    /// The leaf the query point falls into.
    pub leaf: NodeId,
}

/// Outcome of [`IncrementalOctreePointLocator::insert_unique_point`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniqueInsertion {
    /// Whether the point was new and got inserted.
    pub inserted: bool,
    /// Id of the inserted point, or of the existing point it matched.
    pub id: usize,
}

/// Incrementally built octree over a point container, used to merge
/// coincident points while they are being inserted.
///
/// The locator owns the container for the duration of the insertion and hands
/// it back in [`IncrementalOctreePointLocator::free_search_structure`].
///
/// Example:
///
/// ```
/// use scivis_locator::{IncrementalOctreePointLocator, LocatorConfig};
///
/// let mut locator = IncrementalOctreePointLocator::new(LocatorConfig::default());
/// locator.init_point_insertion(Vec::<[f64; 3]>::new(), &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0], 0)?;
///
/// let first = locator.insert_unique_point(&[0.5, 0.5, 0.5])?;
/// let again = locator.insert_unique_point(&[0.5, 0.5, 0.5])?;
/// assert!(first.inserted);
/// assert!(!again.inserted);
/// assert_eq!(first.id, again.id);
/// # Ok::<(), scivis_locator::LocatorError>(())
/// ```
#[derive(Debug, Clone)]
pub struct IncrementalOctreePointLocator<P: PointContainer> {
    config: LocatorConfig,
    insert_tolerance2: f64,
    octree_max_dim_size: f64,
    fudge_factor: f64,
    octree: Option<Octree>,
    points: Option<P>,
}

impl<P: PointContainer> Default for IncrementalOctreePointLocator<P> {
    fn default() -> Self {
        Self::new(LocatorConfig::default())
    }
}

impl<P: PointContainer> IncrementalOctreePointLocator<P> {
    /// Create a locator with no search structure yet.
    pub fn new(config: LocatorConfig) -> Self {
        let insert_tolerance2 = config.tolerance * config.tolerance;
        Self {
            config,
            insert_tolerance2,
            octree_max_dim_size: 0.0,
            fudge_factor: 0.0,
            octree: None,
            points: None,
        }
    }

    /// The configuration in use.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Squared tolerance used by the uniqueness checks.
    pub fn insert_tolerance2(&self) -> f64 {
        self.insert_tolerance2
    }

    /// Override the squared tolerance; `0.0` selects the exact-match path.
    ///
    /// The value is recomputed from the configured tolerance on the next
    /// [`Self::init_point_insertion`].
    pub fn set_insert_tolerance2(&mut self, tolerance2: f64) {
        self.insert_tolerance2 = tolerance2;
    }

    /// Largest extent of the user bounds.
    pub fn octree_max_dim_size(&self) -> f64 {
        self.octree_max_dim_size
    }

    /// Amount by which the lower bounds were pulled back.
    pub fn fudge_factor(&self) -> f64 {
        self.fudge_factor
    }

    /// The octree, `None` before initialization.
    pub fn octree(&self) -> Option<&Octree> {
        self.octree.as_ref()
    }

    /// The point container, `None` before initialization.
    pub fn points(&self) -> Option<&P> {
        self.points.as_ref()
    }

    /// Number of nodes in the octree, `0` without one.
    pub fn number_of_nodes(&self) -> usize {
        self.octree.as_ref().map_or(0, |o| o.number_of_nodes())
    }

    /// Number of points registered in the octree.
    pub fn number_of_points(&self) -> usize {
        self.octree
            .as_ref()
            .map_or(0, |o| o.root_node().number_of_points())
    }

    /// Padded bounds of the root node.
    pub fn bounds(&self) -> Option<[f64; 6]> {
        self.octree.as_ref().map(|o| o.root_node().bounds())
    }

    /// Look up a node of the current octree.
    pub fn node(&self, id: NodeId) -> Option<&OctreeNode> {
        self.octree.as_ref().and_then(|o| o.node(id))
    }

    /// Drop the octree and give the point container back.
    pub fn free_search_structure(&mut self) -> Option<P> {
        self.octree = None;
        self.points.take()
    }

    /// Prepare the locator to receive points lying inside `bounds`.
    ///
    /// Any previous octree is discarded. The box is padded so that boundary
    /// points fall strictly inside the half-open root: flat axes are widened
    /// symmetrically and other axes get their lower bound pulled back by
    /// [`Self::fudge_factor`].
    ///
    /// # Arguments
    ///
    /// * `points` - The container receiving the inserted points.
    /// * `bounds` - The region the points will lie in.
    /// * `estimated_num_points` - Expected number of points, used as a capacity hint.
    pub fn init_point_insertion(
        &mut self,
        points: P,
        bounds: &[f64; 6],
        estimated_num_points: usize,
    ) -> Result<(), LocatorError> {
        if self.config.max_points_per_leaf == 0 {
            return Err(LocatorError::InvalidConfig(
                "max_points_per_leaf must be at least 1".to_string(),
            ));
        }

        if !bounds.iter().all(|b| b.is_finite()) || !bounding_box::is_valid(bounds) {
            log::error!("a valid bounding box is required for point insertion: {bounds:?}");
            return Err(LocatorError::InvalidBounds(*bounds));
        }

        self.free_search_structure();
        self.insert_tolerance2 = self.config.tolerance * self.config.tolerance;

        let mut tmp_bbox = *bounds;
        let mut dim_diff = bounding_box::get_lengths(bounds);
        self.octree_max_dim_size = bounding_box::get_max_length(bounds);

        if self.config.build_cubic_octree {
            for i in 0..3 {
                if dim_diff[i] != self.octree_max_dim_size {
                    let delta = self.octree_max_dim_size - dim_diff[i];
                    tmp_bbox[2 * i] -= 0.5 * delta;
                    tmp_bbox[2 * i + 1] += 0.5 * delta;
                    dim_diff[i] = self.octree_max_dim_size;
                }
            }
        }

        self.fudge_factor = self.octree_max_dim_size * 1e-5;
        let min_side_size = self.octree_max_dim_size * 1e-2;

        for i in 0..3 {
            if dim_diff[i] < min_side_size {
                // a slab, widen it around its extent
                let lower = tmp_bbox[2 * i];
                tmp_bbox[2 * i] = tmp_bbox[2 * i + 1] - min_side_size;
                tmp_bbox[2 * i + 1] = lower + min_side_size;
            } else {
                tmp_bbox[2 * i] -= self.fudge_factor;
            }
        }

        log::debug!(
            "octree locator bounds {tmp_bbox:?}, max dim {}, capacity hint {}",
            self.octree_max_dim_size,
            estimated_num_points
        );

        self.octree = Some(Octree::new(&tmp_bbox));
        self.points = Some(points);
        Ok(())
    }

    fn state(&self) -> Result<(&Octree, &P), LocatorError> {
        match (&self.octree, &self.points) {
            (Some(octree), Some(points)) => Ok((octree, points)),
            _ => Err(LocatorError::NotInitialized),
        }
    }

    fn state_mut(&mut self) -> Result<(&mut Octree, &mut P), LocatorError> {
        match (&mut self.octree, &mut self.points) {
            (Some(octree), Some(points)) => Ok((octree, points)),
            _ => Err(LocatorError::NotInitialized),
        }
    }

    fn insert_with_mode(
        &mut self,
        coords: &[f64; 3],
        mode: InsertMode,
    ) -> Result<usize, LocatorError> {
        let max_pts = self.config.max_points_per_leaf;
        let (octree, points) = self.state_mut()?;
        let leaf = octree.leaf_container(coords);
        Ok(octree.insert_point(leaf, points, coords, max_pts, mode))
    }

    /// Write `coords` at `pt_id` and register it, without any duplicate check.
    pub fn insert_point(&mut self, pt_id: usize, coords: &[f64; 3]) -> Result<(), LocatorError> {
        self.insert_with_mode(coords, InsertMode::SetAt(pt_id)).map(|_| ())
    }

    /// Append `coords` to the container and register it, without any duplicate
    /// check. Returns the new id.
    pub fn insert_next_point(&mut self, coords: &[f64; 3]) -> Result<usize, LocatorError> {
        self.insert_with_mode(coords, InsertMode::Append)
    }

    /// Register `coords` under `pt_id`, writing it to the container only if
    /// `write_point` is set.
    ///
    /// Without `write_point` the container must already hold `pt_id`,
    /// otherwise [`LocatorError::InvalidPointId`] is returned.
    pub fn insert_point_without_checking(
        &mut self,
        coords: &[f64; 3],
        pt_id: usize,
        write_point: bool,
    ) -> Result<(), LocatorError> {
        let mode = if write_point {
            InsertMode::SetAt(pt_id)
        } else {
            let (_, points) = self.state()?;
            let len = points.number_of_points();
            if pt_id >= len {
                return Err(LocatorError::InvalidPointId { id: pt_id, len });
            }
            InsertMode::IndexOnly(pt_id)
        };
        self.insert_with_mode(coords, mode).map(|_| ())
    }

    /// Insert `coords` unless an inserted point lies within the tolerance.
    pub fn insert_unique_point(
        &mut self,
        coords: &[f64; 3],
    ) -> Result<UniqueInsertion, LocatorError> {
        let query = self.is_inserted_point(coords)?;
        if let Some(id) = query.point_id {
            return Ok(UniqueInsertion {
                inserted: false,
                id,
            });
        }

        let max_pts = self.config.max_points_per_leaf;
        let (octree, points) = self.state_mut()?;
        let id = octree.insert_point(query.leaf, points, coords, max_pts, InsertMode::Append);
        Ok(UniqueInsertion { inserted: true, id })
    }

    /// Look for an inserted point within the tolerance of `coords`.
    ///
    /// With a zero tolerance only exact matches in the target leaf count.
    /// Otherwise the nearest point in the leaf is compared with the nearest
    /// one in the neighbourhood whenever the tolerance sphere crosses the
    /// leaf boundary.
    pub fn is_inserted_point(&self, coords: &[f64; 3]) -> Result<InsertedPointQuery, LocatorError> {
        let (octree, points) = self.state()?;
        let leaf = octree.leaf_container(coords);
        let leaf_node = &octree[leaf];

        if self.insert_tolerance2 == 0.0 {
            return Ok(InsertedPointQuery {
                point_id: find_duplicate_in_leaf(points, leaf_node, coords),
                leaf,
            });
        }

        let mut best = closest_in_leaf(points, leaf_node, coords);
        if let Some((id, dist2)) = best {
            if dist2 == 0.0 {
                return Ok(InsertedPointQuery {
                    point_id: Some(id),
                    leaf,
                });
            }
        }

        let else_dist2 = leaf_node.distance2_to_inner_boundary(coords, octree.root_node());
        if else_dist2 < self.insert_tolerance2 {
            let ref_dist2 = self.octree_max_dim_size * self.octree_max_dim_size * 4.0;
            let ext = closest_in_sphere(
                octree,
                points,
                coords,
                self.insert_tolerance2,
                Some(leaf),
                ref_dist2,
            );
            if let Some((ext_id, ext_dist2)) = ext {
                if best.map_or(true, |(_, d)| ext_dist2 < d) {
                    best = Some((ext_id, ext_dist2));
                }
            }
        }

        Ok(InsertedPointQuery {
            point_id: best
                .filter(|(_, d)| *d <= self.insert_tolerance2)
                .map(|(id, _)| id),
            leaf,
        })
    }

    /// Closest point stored in `leaf` and its squared distance to `point`.
    pub fn find_closest_point_in_leaf_node(
        &self,
        leaf: NodeId,
        point: &[f64; 3],
    ) -> Result<Option<(usize, f64)>, LocatorError> {
        let (octree, points) = self.state()?;
        Ok(octree
            .node(leaf)
            .and_then(|node| closest_in_leaf(points, node, point)))
    }

    /// Id of a point in `leaf` exactly equal to `point`.
    pub fn find_duplicate_point_in_leaf_node(
        &self,
        leaf: NodeId,
        point: &[f64; 3],
    ) -> Result<Option<usize>, LocatorError> {
        let (octree, points) = self.state()?;
        Ok(octree
            .node(leaf)
            .and_then(|node| find_duplicate_in_leaf(points, node, point)))
    }

    /// Closest point within `sqrt(radius2)` of `point`.
    ///
    /// Subtrees are visited depth first and skipped when their data box is
    /// farther than `ref_dist2`, unless they contain the point; `mask` is never
    /// visited. The search is exhaustive only when `ref_dist2` is large enough,
    /// see [`Self::find_closest_inserted_point`] for an exact query.
    pub fn find_closest_point_in_sphere(
        &self,
        point: &[f64; 3],
        radius2: f64,
        mask: Option<NodeId>,
        ref_dist2: f64,
    ) -> Result<Option<(usize, f64)>, LocatorError> {
        let (octree, points) = self.state()?;
        Ok(closest_in_sphere(octree, points, point, radius2, mask, ref_dist2))
    }

    /// Closest point within `radius` of `x` and its squared distance.
    pub fn find_closest_point_within_radius(
        &self,
        radius: f64,
        x: &[f64; 3],
    ) -> Result<Option<(usize, f64)>, LocatorError> {
        let radius2 = radius * radius;
        self.find_closest_point_in_sphere(x, radius2, None, radius2)
    }

    /// Closest inserted point to `x`, wherever `x` lies.
    ///
    /// Returns `None` when no point has been inserted yet.
    pub fn find_closest_inserted_point(
        &self,
        x: &[f64; 3],
    ) -> Result<Option<(usize, f64)>, LocatorError> {
        let (octree, points) = self.state()?;
        let root = octree.root_node();
        if root.number_of_points() == 0 {
            return Ok(None);
        }

        let leaf = if root.contains_point(x) {
            octree.leaf_container(x)
        } else {
            // start from the leaf under the nearest point of the data box
            let mut initial = [0.0; 3];
            root.distance2_to_boundary_with_closest(x, root, true, false, &mut initial);
            octree.leaf_container(&initial)
        };

        let mut best = closest_in_leaf(points, &octree[leaf], x);
        let radius2 = best.map_or(f64::MAX, |(_, d)| d);
        if let Some((id, d)) = closest_in_sphere(octree, points, x, radius2, Some(leaf), radius2) {
            if d < radius2 {
                best = Some((id, d));
            }
        }
        Ok(best)
    }

    /// Ids of all points within `radius` of `x`, boundary included.
    pub fn find_points_within_radius(
        &self,
        radius: f64,
        x: &[f64; 3],
    ) -> Result<Vec<usize>, LocatorError> {
        let (octree, points) = self.state()?;
        let radius2 = radius * radius;
        let mut ids = Vec::new();
        let mut stack = vec![octree.root()];

        while let Some(id) = stack.pop() {
            let Some(node) = octree.node(id) else {
                continue;
            };
            if node.number_of_points() == 0 {
                continue;
            }

            let (min_dist2, max_dist2) = box_distance2_range(node, x);
            if min_dist2 > radius2 {
                continue;
            }
            if max_dist2 <= radius2 {
                ids.extend(octree.point_ids_under(id));
                continue;
            }

            match node.kind() {
                NodeKind::Leaf(leaf_ids) => ids.extend(
                    leaf_ids
                        .iter()
                        .copied()
                        .filter(|&pid| distance2_between_points(&points.point(pid), x) <= radius2),
                ),
                NodeKind::Internal(children) => stack.extend(children.iter().rev()),
            }
        }

        Ok(ids)
    }
}

/// Squared distances from `x` to the nearest and to the farthest point of the node box.
fn box_distance2_range(node: &OctreeNode, x: &[f64; 3]) -> (f64, f64) {
    let (min, max) = (node.min_bounds(), node.max_bounds());
    let mut min_dist2 = 0.0;
    let mut max_dist2 = 0.0;
    for i in 0..3 {
        let below = min[i] - x[i];
        let above = x[i] - max[i];
        let near = below.max(above).max(0.0);
        let far = (x[i] - min[i]).abs().max((x[i] - max[i]).abs());
        min_dist2 += near * near;
        max_dist2 += far * far;
    }
    (min_dist2, max_dist2)
}

fn closest_in_leaf<P: PointContainer>(
    points: &P,
    leaf: &OctreeNode,
    point: &[f64; 3],
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for &id in leaf.point_ids()? {
        let dist2 = distance2_between_points(&points.point(id), point);
        if best.map_or(true, |(_, d)| dist2 < d) {
            best = Some((id, dist2));
        }
        if dist2 == 0.0 {
            break;
        }
    }
    best
}

fn find_duplicate_in_leaf<P: PointContainer>(
    points: &P,
    leaf: &OctreeNode,
    point: &[f64; 3],
) -> Option<usize> {
    leaf.point_ids()?
        .iter()
        .copied()
        .find(|&id| points.coincides(id, point))
}

fn closest_in_sphere<P: PointContainer>(
    octree: &Octree,
    points: &P,
    point: &[f64; 3],
    radius2: f64,
    mask: Option<NodeId>,
    ref_dist2: f64,
) -> Option<(usize, f64)> {
    let root = octree.root_node();
    let mut best: Option<(usize, f64)> = None;
    let mut min_dist2 = f64::MAX;
    let mut stack = vec![octree.root()];

    while min_dist2 > 0.0 {
        let Some(id) = stack.pop() else {
            break;
        };
        let Some(node) = octree.node(id) else {
            continue;
        };

        match node.kind() {
            NodeKind::Internal(children) => {
                for &child_id in children {
                    let Some(child) = octree.node(child_id) else {
                        continue;
                    };
                    // empty nodes are pushed only if they contain the point
                    let dist_to_data = if child.number_of_points() > 0 {
                        child.distance2_to_boundary(point, root, true)
                    } else {
                        radius2 + radius2
                    };
                    if Some(child_id) != mask
                        && (dist_to_data <= ref_dist2 || child.contains_point(point))
                    {
                        stack.push(child_id);
                    }
                }
            }
            NodeKind::Leaf(_) => {
                if let Some((pid, d)) = closest_in_leaf(points, node, point) {
                    if d < min_dist2 {
                        min_dist2 = d;
                        best = Some((pid, d));
                    }
                }
            }
        }
    }

    best.filter(|(_, d)| *d <= radius2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_locator(
        max_points_per_leaf: usize,
        tolerance: f64,
    ) -> IncrementalOctreePointLocator<Vec<[f64; 3]>> {
        let mut locator = IncrementalOctreePointLocator::new(LocatorConfig {
            max_points_per_leaf,
            tolerance,
            build_cubic_octree: false,
        });
        locator
            .init_point_insertion(Vec::new(), &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0], 0)
            .expect("valid bounds");
        locator
    }

    #[test]
    fn test_not_initialized() {
        let mut locator: IncrementalOctreePointLocator<Vec<[f64; 3]>> = Default::default();
        assert_eq!(
            locator.insert_next_point(&[0.0; 3]),
            Err(LocatorError::NotInitialized)
        );
        assert_eq!(
            locator.is_inserted_point(&[0.0; 3]),
            Err(LocatorError::NotInitialized)
        );
        assert_eq!(locator.number_of_nodes(), 0);
        assert!(locator.free_search_structure().is_none());
    }

    #[test]
    fn test_invalid_init() {
        let mut locator: IncrementalOctreePointLocator<Vec<[f64; 3]>> = Default::default();
        let bad = [1.0, 0.0, 0.0, 1.0, 0.0, 1.0];
        assert_eq!(
            locator.init_point_insertion(Vec::new(), &bad, 0),
            Err(LocatorError::InvalidBounds(bad))
        );
        let nan = [0.0, f64::NAN, 0.0, 1.0, 0.0, 1.0];
        assert!(locator.init_point_insertion(Vec::new(), &nan, 0).is_err());

        let mut locator: IncrementalOctreePointLocator<Vec<[f64; 3]>> =
            IncrementalOctreePointLocator::new(LocatorConfig {
                max_points_per_leaf: 0,
                ..Default::default()
            });
        assert!(matches!(
            locator.init_point_insertion(Vec::new(), &[0.0, 1.0, 0.0, 1.0, 0.0, 1.0], 0),
            Err(LocatorError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_padded_bounds() -> Result<(), LocatorError> {
        let mut locator: IncrementalOctreePointLocator<Vec<[f64; 3]>> = Default::default();
        locator.init_point_insertion(Vec::new(), &[0.0, 2.0, 0.0, 1.0, 3.0, 3.0], 0)?;
        assert_relative_eq!(locator.octree_max_dim_size(), 2.0);
        assert_relative_eq!(locator.fudge_factor(), 2e-5);
        assert_eq!(locator.number_of_nodes(), 1);

        let b = locator.bounds().expect("initialized");
        assert_relative_eq!(b[0], -2e-5);
        assert_relative_eq!(b[1], 2.0);
        assert_relative_eq!(b[2], -2e-5);
        assert_relative_eq!(b[3], 1.0);
        // z is a slab
        assert_relative_eq!(b[4], 2.98);
        assert_relative_eq!(b[5], 3.02);
        Ok(())
    }

    #[test]
    fn test_cubic_bounds() -> Result<(), LocatorError> {
        let mut locator: IncrementalOctreePointLocator<Vec<[f64; 3]>> =
            IncrementalOctreePointLocator::new(LocatorConfig {
                build_cubic_octree: true,
                ..Default::default()
            });
        locator.init_point_insertion(Vec::new(), &[0.0, 4.0, 1.0, 3.0, 0.0, 4.0], 0)?;
        let b = locator.bounds().expect("initialized");
        assert_relative_eq!(b[2], -4e-5);
        assert_relative_eq!(b[3], 4.0);
        assert_relative_eq!(b[1] - b[0], b[5] - b[4]);
        Ok(())
    }

    #[test]
    fn test_zero_tolerance_exact_match() -> Result<(), LocatorError> {
        let mut locator = unit_locator(4, 1e-3);
        locator.set_insert_tolerance2(0.0);

        let a = locator.insert_unique_point(&[0.25, 0.5, 0.75])?;
        let b = locator.insert_unique_point(&[0.25, 0.5, 0.75])?;
        let c = locator.insert_unique_point(&[0.25, 0.5, 0.7500001])?;
        assert!(a.inserted);
        assert_eq!(b, UniqueInsertion { inserted: false, id: a.id });
        assert!(c.inserted);
        assert_eq!(locator.number_of_points(), 2);
        Ok(())
    }

    #[test]
    fn test_tolerance_across_leaves() -> Result<(), LocatorError> {
        let mut locator = unit_locator(1, 1e-2);
        locator.insert_next_point(&[0.1, 0.1, 0.1])?;
        locator.insert_next_point(&[0.9, 0.9, 0.9])?;
        let near_center = locator.insert_next_point(&[0.499, 0.5, 0.5])?;

        // the query falls in a neighbouring octant of the existing point
        let query = locator.is_inserted_point(&[0.505, 0.5, 0.5])?;
        assert_eq!(query.point_id, Some(near_center));
        assert_ne!(
            Some(query.leaf),
            locator
                .octree()
                .map(|o| o.leaf_container(&[0.499, 0.5, 0.5]))
        );

        let far = locator.is_inserted_point(&[0.52, 0.5, 0.5])?;
        assert_eq!(far.point_id, None);
        Ok(())
    }

    #[test]
    fn test_insert_point_modes() -> Result<(), LocatorError> {
        let mut locator = unit_locator(8, 1e-3);
        locator.insert_point(4, &[0.3, 0.3, 0.3])?;
        locator.insert_point_without_checking(&[0.3, 0.3, 0.3], 4, false)?;
        assert_eq!(locator.points().map(|p| p.len()), Some(5));
        assert_eq!(locator.number_of_points(), 2);

        let leaf = locator
            .octree()
            .map(|o| o.leaf_container(&[0.3, 0.3, 0.3]))
            .expect("initialized");
        assert_eq!(locator.find_duplicate_point_in_leaf_node(leaf, &[0.3, 0.3, 0.3])?, Some(4));
        assert_eq!(
            locator.find_closest_point_in_leaf_node(leaf, &[0.3, 0.3, 0.4])?.map(|(id, _)| id),
            Some(4)
        );

        let points = locator.free_search_structure().expect("initialized");
        assert_eq!(points[4], [0.3, 0.3, 0.3]);
        assert_eq!(locator.number_of_nodes(), 0);
        Ok(())
    }

    #[test]
    fn test_closest_inserted_point_outside() -> Result<(), LocatorError> {
        let mut locator = unit_locator(2, 1e-3);
        for p in [[0.1, 0.1, 0.1], [0.2, 0.8, 0.3], [0.9, 0.9, 0.9], [0.6, 0.2, 0.4]] {
            locator.insert_next_point(&p)?;
        }
        let (id, d) = locator
            .find_closest_inserted_point(&[2.0, 2.0, 2.0])?
            .expect("points inserted");
        assert_eq!(id, 2);
        assert_relative_eq!(d, 3.0 * 1.1 * 1.1, epsilon = 1e-12);

        let (id, _) = locator
            .find_closest_inserted_point(&[0.55, 0.25, 0.45])?
            .expect("points inserted");
        assert_eq!(id, 3);
        Ok(())
    }

    #[test]
    fn test_points_within_radius() -> Result<(), LocatorError> {
        let mut locator = unit_locator(2, 1e-3);
        for p in [[0.1, 0.1, 0.1], [0.15, 0.1, 0.1], [0.9, 0.9, 0.9], [0.1, 0.1, 0.3]] {
            locator.insert_next_point(&p)?;
        }
        let mut ids = locator.find_points_within_radius(0.1, &[0.1, 0.1, 0.1])?;
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1]);

        let mut all = locator.find_points_within_radius(10.0, &[0.5, 0.5, 0.5])?;
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2, 3]);

        let within = locator.find_closest_point_within_radius(0.05, &[0.14, 0.1, 0.1])?;
        assert_eq!(within.map(|(id, _)| id), Some(1));
        assert_eq!(locator.find_closest_point_within_radius(0.05, &[0.5, 0.5, 0.5])?, None);
        Ok(())
    }

    #[test]
    fn test_index_only_insert_requires_stored_point() -> Result<(), LocatorError> {
        let mut locator = unit_locator(4, 1e-3);
        assert_eq!(
            locator.insert_point_without_checking(&[0.5; 3], 10, false),
            Err(LocatorError::InvalidPointId { id: 10, len: 0 })
        );
        assert_eq!(locator.number_of_points(), 0);
        assert_eq!(locator.is_inserted_point(&[0.5; 3])?.point_id, None);

        let id = locator.insert_next_point(&[0.2, 0.3, 0.4])?;
        assert_eq!(
            locator.insert_point_without_checking(&[0.5; 3], id + 1, false),
            Err(LocatorError::InvalidPointId { id: id + 1, len: 1 })
        );

        // an id the container already holds is registered as is
        locator.insert_point_without_checking(&[0.2, 0.3, 0.4], id, false)?;
        assert_eq!(locator.points().map(Vec::len), Some(1));
        assert_eq!(locator.number_of_points(), 2);
        Ok(())
    }
}
