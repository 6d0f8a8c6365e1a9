use scivis_linalg::vector::distance2_between_points;

/// Index of a node inside an [`crate::octree::Octree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Either a leaf with the ids of its points, or an internal node with 8 octants.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Leaf node holding the ids of the points it contains.
    Leaf(Vec<usize>),
    /// Internal node with its children ordered by [`OctreeNode::child_index`].
    Internal([NodeId; 8]),
}

/// One octant of the spatial index.
///
/// Besides its spatial box, the node tracks the number of points in its subtree
/// and the tight box around them (the data bounds). A point `p` is spatially
/// inside the node iff `min < p <= max` on every axis.
#[derive(Debug, Clone, PartialEq)]
pub struct OctreeNode {
    min_bounds: [f64; 3],
    max_bounds: [f64; 3],
    min_data_bounds: [f64; 3],
    max_data_bounds: [f64; 3],
    number_of_points: usize,
    parent: Option<NodeId>,
    pub(crate) kind: NodeKind,
}

impl OctreeNode {
    /// Create an empty leaf covering `bounds`.
    ///
    /// The data bounds start inverted so that the first point collapses them
    /// onto itself.
    pub fn new(bounds: &[f64; 6], parent: Option<NodeId>) -> Self {
        let min_bounds = [bounds[0], bounds[2], bounds[4]];
        let max_bounds = [bounds[1], bounds[3], bounds[5]];
        Self {
            min_bounds,
            max_bounds,
            min_data_bounds: max_bounds,
            max_data_bounds: min_bounds,
            number_of_points: 0,
            parent,
            kind: NodeKind::Leaf(Vec::new()),
        }
    }

    /// Spatial bounds as `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    pub fn bounds(&self) -> [f64; 6] {
        [
            self.min_bounds[0],
            self.max_bounds[0],
            self.min_bounds[1],
            self.max_bounds[1],
            self.min_bounds[2],
            self.max_bounds[2],
        ]
    }

    /// Lower corner of the spatial box.
    pub fn min_bounds(&self) -> &[f64; 3] {
        &self.min_bounds
    }

    /// Upper corner of the spatial box.
    pub fn max_bounds(&self) -> &[f64; 3] {
        &self.max_bounds
    }

    /// Lower corner of the box around the points, or of the spatial box when empty.
    pub fn min_data_bounds(&self) -> &[f64; 3] {
        if self.number_of_points == 0 {
            return &self.min_bounds;
        }
        &self.min_data_bounds
    }

    /// Upper corner of the box around the points, or of the spatial box when empty.
    pub fn max_data_bounds(&self) -> &[f64; 3] {
        if self.number_of_points == 0 {
            return &self.max_bounds;
        }
        &self.max_data_bounds
    }

    /// Number of points in the subtree rooted at this node.
    pub fn number_of_points(&self) -> usize {
        self.number_of_points
    }

    /// The parent node, `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Leaf or internal payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    /// Point ids of a leaf, `None` for internal nodes.
    pub fn point_ids(&self) -> Option<&[usize]> {
        match &self.kind {
            NodeKind::Leaf(ids) => Some(ids),
            NodeKind::Internal(_) => None,
        }
    }

    /// Children of an internal node, `None` for leaves.
    pub fn children(&self) -> Option<&[NodeId; 8]> {
        match &self.kind {
            NodeKind::Leaf(_) => None,
            NodeKind::Internal(children) => Some(children),
        }
    }

    /// The `i`-th child of an internal node.
    pub fn child(&self, i: usize) -> Option<NodeId> {
        self.children().and_then(|c| c.get(i).copied())
    }

    pub(crate) fn push_point_id(&mut self, id: usize) {
        if let NodeKind::Leaf(ids) = &mut self.kind {
            ids.push(id);
        }
    }

    pub(crate) fn take_point_ids(&mut self) -> Vec<usize> {
        match &mut self.kind {
            NodeKind::Leaf(ids) => std::mem::take(ids),
            NodeKind::Internal(_) => Vec::new(),
        }
    }

    /// Center of the spatial box, shared by all 8 octants.
    pub fn center(&self) -> [f64; 3] {
        [
            (self.min_bounds[0] + self.max_bounds[0]) * 0.5,
            (self.min_bounds[1] + self.max_bounds[1]) * 0.5,
            (self.min_bounds[2] + self.max_bounds[2]) * 0.5,
        ]
    }

    /// Octant of `point`: bit 0 is set above the center in x, bit 1 in y, bit 2 in z.
    pub fn child_index(&self, point: &[f64; 3]) -> usize {
        let mid = self.center();
        usize::from(point[0] > mid[0])
            | usize::from(point[1] > mid[1]) << 1
            | usize::from(point[2] > mid[2]) << 2
    }

    /// Spatial bounds of octant `i`, following the bit layout of [`Self::child_index`].
    pub fn child_bounds(&self, i: usize) -> [f64; 6] {
        let mid = self.center();
        let mut bounds = [0.0; 6];
        for axis in 0..3 {
            let (lo, hi) = if (i >> axis) & 1 == 0 {
                (self.min_bounds[axis], mid[axis])
            } else {
                (mid[axis], self.max_bounds[axis])
            };
            bounds[2 * axis] = lo;
            bounds[2 * axis + 1] = hi;
        }
        bounds
    }

    /// Whether halving the box still produces strictly smaller octants on some axis.
    pub(crate) fn is_divisible(&self) -> bool {
        let mid = self.center();
        (0..3).any(|i| self.min_bounds[i] < mid[i] && mid[i] < self.max_bounds[i])
    }

    /// Half-open containment test, `min < p <= max` on every axis.
    pub fn contains_point(&self, point: &[f64; 3]) -> bool {
        (0..3).all(|i| self.min_bounds[i] < point[i] && point[i] <= self.max_bounds[i])
    }

    /// Closed containment test against the data bounds.
    pub fn contains_point_by_data(&self, point: &[f64; 3]) -> bool {
        (0..3).all(|i| self.min_data_bounds[i] <= point[i] && point[i] <= self.max_data_bounds[i])
    }

    /// Whether every point under this node is exactly `point`.
    pub fn contains_duplicate_points_only(&self, point: &[f64; 3]) -> bool {
        (0..3).all(|i| self.min_data_bounds[i] == point[i] && point[i] == self.max_data_bounds[i])
    }

    /// Add `n_hits` to the point counter and, if `update_data`, grow the data
    /// bounds to include `point`. Returns whether the data bounds changed.
    pub(crate) fn update_counter_and_data_bounds(
        &mut self,
        point: &[f64; 3],
        n_hits: usize,
        update_data: bool,
    ) -> bool {
        self.number_of_points += n_hits;

        if !update_data {
            return false;
        }

        let mut updated = false;
        for i in 0..3 {
            if point[i] < self.min_data_bounds[i] {
                self.min_data_bounds[i] = point[i];
                updated = true;
            }
            if point[i] > self.max_data_bounds[i] {
                self.max_data_bounds[i] = point[i];
                updated = true;
            }
        }
        updated
    }

    /// Squared distance from `point` to the box of this node, the data box if
    /// `check_data` is set. Points inside the box get the distance to the
    /// nearest face.
    pub fn distance2_to_boundary(
        &self,
        point: &[f64; 3],
        root: &OctreeNode,
        check_data: bool,
    ) -> f64 {
        let mut closest = [0.0; 3];
        self.distance2_to_boundary_with_closest(point, root, check_data, false, &mut closest)
    }

    /// Squared distance from an inside `point` to the nearest face shared with
    /// another node, i.e. a face that is not part of the root boundary.
    ///
    /// Returns `f64::MAX` when the node has no such face.
    pub fn distance2_to_inner_boundary(&self, point: &[f64; 3], root: &OctreeNode) -> f64 {
        let mut closest = [0.0; 3];
        self.distance2_to_boundary_with_closest(point, root, false, true, &mut closest)
    }

    /// Squared distance to the boundary, writing the closest boundary point to `closest`.
    ///
    /// # Arguments
    ///
    /// * `point` - The query point.
    /// * `root` - The root of the octree, used to tell inner faces from outer ones.
    /// * `check_data` - Measure against the data bounds instead of the spatial bounds.
    /// * `inner_only` - For inside points, ignore faces lying on the root boundary.
    /// * `closest` - The closest point on the boundary.
    pub fn distance2_to_boundary_with_closest(
        &self,
        point: &[f64; 3],
        root: &OctreeNode,
        check_data: bool,
        inner_only: bool,
        closest: &mut [f64; 3],
    ) -> f64 {
        let (this_min, this_max, root_min, root_max) = if check_data {
            (
                self.min_data_bounds(),
                self.max_data_bounds(),
                root.min_data_bounds(),
                root.max_data_bounds(),
            )
        } else {
            (
                &self.min_bounds,
                &self.max_bounds,
                &root.min_bounds,
                &root.max_bounds,
            )
        };

        let inside = (0..3).all(|i| this_min[i] <= point[i] && point[i] <= this_max[i]);

        if !inside {
            // corner, edge or face: clamping onto the box gives the closest point
            for i in 0..3 {
                closest[i] = point[i].clamp(this_min[i], this_max[i]);
            }
            return distance2_between_points(point, closest);
        }

        // faces ordered x-min, x-max, y-min, y-max, z-min, z-max
        let mut min_dist = f64::MAX;
        let mut min_face = 0;
        for face in 0..6 {
            let axis = face >> 1;
            let (dist, on_root) = if face & 1 == 0 {
                (point[axis] - this_min[axis], this_min[axis] == root_min[axis])
            } else {
                (this_max[axis] - point[axis], this_max[axis] == root_max[axis])
            };
            if inner_only && on_root {
                continue;
            }
            if dist < min_dist {
                min_dist = dist;
                min_face = face;
            }
        }

        // no inner face at all keeps the sentinel unsquared
        if min_dist != f64::MAX {
            min_dist *= min_dist;
        }

        *closest = *point;
        let axis = min_face >> 1;
        closest[axis] = if min_face & 1 == 0 {
            this_min[axis]
        } else {
            this_max[axis]
        };

        min_dist
    }
}
