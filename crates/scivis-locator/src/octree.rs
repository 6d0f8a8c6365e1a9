use crate::{
    node::{NodeId, NodeKind, OctreeNode},
    points::PointContainer,
};

/// How a point being inserted reaches the point container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// The point is already stored under this id, only register the id.
    IndexOnly(usize),
    /// Write the coordinates at this id.
    SetAt(usize),
    /// Append the coordinates and use the new id.
    Append,
}

impl InsertMode {
    fn apply<P: PointContainer>(self, points: &mut P, coords: &[f64; 3]) -> usize {
        match self {
            InsertMode::IndexOnly(id) => id,
            InsertMode::SetAt(id) => {
                points.set_point(id, coords);
                id
            }
            InsertMode::Append => points.push_point(coords),
        }
    }
}

/// Arena of octree nodes, the root being the first one.
///
/// Leaves split into 8 octants once they hold `max_points_per_leaf` points and
/// a new, different point arrives. Leaves made only of exact duplicates keep
/// growing instead.
#[derive(Debug, Clone)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
}

impl Octree {
    /// Create a tree made of a single empty leaf covering `bounds`.
    pub fn new(bounds: &[f64; 6]) -> Self {
        Self {
            nodes: vec![OctreeNode::new(bounds, None)],
        }
    }

    /// The root node id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The root node.
    pub fn root_node(&self) -> &OctreeNode {
        &self.nodes[0]
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&OctreeNode> {
        self.nodes.get(id.0)
    }

    /// Total number of nodes, leaves and internal ones.
    pub fn number_of_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &OctreeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Iterate over the leaves.
    pub fn leaves(&self) -> impl Iterator<Item = (NodeId, &OctreeNode)> {
        self.nodes().filter(|(_, n)| n.is_leaf())
    }

    /// Descend from the root to the leaf whose octants lead to `point`.
    pub fn leaf_container(&self, point: &[f64; 3]) -> NodeId {
        let mut id = self.root();
        while let NodeKind::Internal(children) = &self.nodes[id.0].kind {
            id = children[self.nodes[id.0].child_index(point)];
        }
        id
    }

    /// Ids of all points stored under `id`, in depth-first order.
    pub fn point_ids_under(&self, id: NodeId) -> Vec<usize> {
        let mut ids = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match &self.nodes[current.0].kind {
                NodeKind::Leaf(leaf_ids) => ids.extend_from_slice(leaf_ids),
                NodeKind::Internal(children) => stack.extend(children.iter().rev()),
            }
        }
        ids
    }

    /// Insert a point into the leaf `leaf`, splitting it when it overflows.
    ///
    /// `leaf` must be the leaf container of `coords`. Returns the id of the
    /// inserted point.
    pub fn insert_point<P: PointContainer>(
        &mut self,
        leaf: NodeId,
        points: &mut P,
        coords: &[f64; 3],
        max_points_per_leaf: usize,
        mode: InsertMode,
    ) -> usize {
        let node = &self.nodes[leaf.0];
        let num_ids = node.point_ids().map_or(0, |ids| ids.len());

        if num_ids == 0
            || num_ids < max_points_per_leaf
            || node.contains_duplicate_points_only(coords)
        {
            let id = mode.apply(points, coords);
            self.nodes[leaf.0].push_point_id(id);
            self.update_counter_and_data_bounds_recursively(leaf, coords, 1, true, None);
            return id;
        }

        let pnt_ids = self.nodes[leaf.0].take_point_ids();
        self.create_child_nodes(leaf, points, &pnt_ids, coords, max_points_per_leaf, mode)
    }

    /// Split `id` into 8 empty leaves and turn it into an internal node.
    fn subdivide(&mut self, id: NodeId) -> [NodeId; 8] {
        let node = &self.nodes[id.0];
        let child_bounds: [[f64; 6]; 8] = std::array::from_fn(|i| node.child_bounds(i));

        let first = self.nodes.len();
        self.nodes
            .extend(child_bounds.iter().map(|b| OctreeNode::new(b, Some(id))));

        let children = std::array::from_fn(|i| NodeId(first + i));
        self.nodes[id.0].kind = NodeKind::Internal(children);
        children
    }

    /// Keep `pnt_ids` and the new point together in the leaf `id`, used once
    /// the box is too small to be halved any further.
    fn store_without_split<P: PointContainer>(
        &mut self,
        id: NodeId,
        points: &mut P,
        pnt_ids: &[usize],
        new_pnt: &[f64; 3],
        mode: InsertMode,
    ) -> usize {
        log::debug!("octree node {} cannot be subdivided further", id.0);
        let new_id = mode.apply(points, new_pnt);
        let mut ids = pnt_ids.to_vec();
        ids.push(new_id);
        self.nodes[id.0].kind = NodeKind::Leaf(ids);
        self.update_counter_and_data_bounds_recursively(id, new_pnt, 1, true, None);
        new_id
    }

    /// Distribute the points of a full leaf among 8 new children, then insert
    /// the new point.
    ///
    /// `pnt_ids` are already counted by `id` and its ancestors.
    fn create_child_nodes<P: PointContainer>(
        &mut self,
        id: NodeId,
        points: &mut P,
        pnt_ids: &[usize],
        new_pnt: &[f64; 3],
        max_points_per_leaf: usize,
        mode: InsertMode,
    ) -> usize {
        let Some(&first) = pnt_ids.first() else {
            let new_id = mode.apply(points, new_pnt);
            self.nodes[id.0].kind = NodeKind::Leaf(vec![new_id]);
            self.update_counter_and_data_bounds_recursively(id, new_pnt, 1, true, None);
            return new_id;
        };

        let sample = points.point(first);
        if self.nodes[id.0].contains_duplicate_points_only(&sample) {
            return self.separate_exactly_duplicate_points_from_new_insertion(
                id, points, pnt_ids, new_pnt, mode,
            );
        }

        if !self.nodes[id.0].is_divisible() {
            return self.store_without_split(id, points, pnt_ids, new_pnt, mode);
        }

        log::debug!(
            "splitting octree node {} holding {} points",
            id.0,
            pnt_ids.len()
        );

        let children = self.subdivide(id);
        let mut num_ids = [0usize; 8];
        for &pid in pnt_ids {
            let p = points.point(pid);
            let octant = self.nodes[id.0].child_index(&p);
            num_ids[octant] += 1;

            let child = &mut self.nodes[children[octant].0];
            child.push_point_id(pid);
            child.update_counter_and_data_bounds(&p, 1, true);
        }

        let target = self.nodes[id.0].child_index(new_pnt);
        if num_ids[target] == pnt_ids.len() {
            // every old point went to the octant of the new one, split it again
            return self.create_child_nodes(
                children[target],
                points,
                pnt_ids,
                new_pnt,
                max_points_per_leaf,
                mode,
            );
        }

        let new_id = mode.apply(points, new_pnt);
        self.nodes[children[target].0].push_point_id(new_id);
        self.update_counter_and_data_bounds_recursively(children[target], new_pnt, 1, true, None);
        new_id
    }

    /// Subdivide `id` until the run of identical points `pnt_ids` and the new
    /// point fall into different octants.
    fn separate_exactly_duplicate_points_from_new_insertion<P: PointContainer>(
        &mut self,
        id: NodeId,
        points: &mut P,
        pnt_ids: &[usize],
        new_pnt: &[f64; 3],
        mode: InsertMode,
    ) -> usize {
        let dup_pnt = match pnt_ids.first() {
            Some(&first) => points.point(first),
            None => return self.store_without_split(id, points, pnt_ids, new_pnt, mode),
        };

        log::debug!(
            "separating {} duplicate points in octree node {}",
            pnt_ids.len(),
            id.0
        );

        let mut oc_node = id;
        let (duplic, single) = loop {
            if !self.nodes[oc_node.0].is_divisible() {
                let new_id = self.store_without_split(oc_node, points, pnt_ids, new_pnt, mode);
                if oc_node != id {
                    self.update_counter_and_data_bounds_recursively(
                        oc_node,
                        &dup_pnt,
                        pnt_ids.len(),
                        true,
                        Some(id),
                    );
                }
                return new_id;
            }

            let children = self.subdivide(oc_node);
            let dup_octant = self.nodes[oc_node.0].child_index(&dup_pnt);
            let new_octant = self.nodes[oc_node.0].child_index(new_pnt);
            if dup_octant != new_octant {
                break (children[dup_octant], children[new_octant]);
            }
            oc_node = children[dup_octant];
        };

        let new_id = mode.apply(points, new_pnt);
        self.nodes[single.0].push_point_id(new_id);
        self.update_counter_and_data_bounds_recursively(single, new_pnt, 1, true, None);

        // `id` and its ancestors already count the duplicates
        self.nodes[duplic.0].kind = NodeKind::Leaf(pnt_ids.to_vec());
        self.update_counter_and_data_bounds_recursively(
            duplic,
            &dup_pnt,
            pnt_ids.len(),
            true,
            Some(id),
        );

        new_id
    }

    /// Update the counter and data bounds of `id` and of its ancestors up to,
    /// but excluding, `end_node`. `None` walks up to the root included.
    ///
    /// An ancestor only grows its data bounds if its child's bounds changed.
    fn update_counter_and_data_bounds_recursively(
        &mut self,
        id: NodeId,
        point: &[f64; 3],
        n_hits: usize,
        update_data: bool,
        end_node: Option<NodeId>,
    ) {
        let mut current = id;
        let mut update = update_data;
        loop {
            let node = &mut self.nodes[current.0];
            update = node.update_counter_and_data_bounds(point, n_hits, update);
            match node.parent() {
                Some(parent) if Some(parent) != end_node => current = parent,
                _ => return,
            }
        }
    }
}

impl std::ops::Index<NodeId> for Octree {
    type Output = OctreeNode;

    fn index(&self, id: NodeId) -> &OctreeNode {
        &self.nodes[id.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(tree: &mut Octree, points: &mut Vec<[f64; 3]>, p: [f64; 3], max_pts: usize) -> usize {
        let leaf = tree.leaf_container(&p);
        tree.insert_point(leaf, points, &p, max_pts, InsertMode::Append)
    }

    #[test]
    fn test_leaf_splits_on_overflow() {
        let mut tree = Octree::new(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let mut points = Vec::new();

        insert(&mut tree, &mut points, [0.1, 0.1, 0.1], 2);
        insert(&mut tree, &mut points, [0.9, 0.9, 0.9], 2);
        assert_eq!(tree.number_of_nodes(), 1);

        let id = insert(&mut tree, &mut points, [0.1, 0.9, 0.1], 2);
        assert_eq!(id, 2);
        assert_eq!(tree.number_of_nodes(), 9);

        let root = tree.root_node();
        assert!(!root.is_leaf());
        assert_eq!(root.number_of_points(), 3);
        assert_eq!(root.min_data_bounds(), &[0.1, 0.1, 0.1]);
        assert_eq!(root.max_data_bounds(), &[0.9, 0.9, 0.9]);

        let leaf = tree.leaf_container(&[0.1, 0.9, 0.1]);
        assert_eq!(tree.node(leaf).and_then(|n| n.point_ids()), Some(&[2usize][..]));
    }

    #[test]
    fn test_full_octant_is_split_again() {
        let mut tree = Octree::new(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let mut points = Vec::new();

        insert(&mut tree, &mut points, [0.1, 0.1, 0.1], 2);
        insert(&mut tree, &mut points, [0.2, 0.2, 0.2], 2);
        insert(&mut tree, &mut points, [0.3, 0.3, 0.3], 2);

        // root, then its octant 0 both split
        assert_eq!(tree.number_of_nodes(), 17);
        assert_eq!(tree.root_node().number_of_points(), 3);
        for (_, leaf) in tree.leaves() {
            assert!(leaf.point_ids().map_or(0, |ids| ids.len()) <= 2);
        }
        let mut all = tree.point_ids_under(tree.root());
        all.sort_unstable();
        assert_eq!(all, vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicates_grow_then_separate() {
        let mut tree = Octree::new(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let mut points = Vec::new();

        for _ in 0..5 {
            insert(&mut tree, &mut points, [0.3, 0.3, 0.3], 2);
        }
        assert_eq!(tree.number_of_nodes(), 1);
        assert_eq!(tree.root_node().point_ids().map(|ids| ids.len()), Some(5));

        insert(&mut tree, &mut points, [0.4, 0.4, 0.4], 2);
        assert_eq!(tree.root_node().number_of_points(), 6);

        let dup_leaf = tree.leaf_container(&[0.3, 0.3, 0.3]);
        let new_leaf = tree.leaf_container(&[0.4, 0.4, 0.4]);
        assert_ne!(dup_leaf, new_leaf);
        assert_eq!(tree.node(dup_leaf).map(|n| n.number_of_points()), Some(5));
        assert_eq!(tree.node(new_leaf).and_then(|n| n.point_ids()), Some(&[5usize][..]));

        // every ancestor of the duplicate leaf counts the whole run
        let mut current = tree.node(dup_leaf).and_then(|n| n.parent());
        while let Some(id) = current {
            let node = tree.node(id).expect("parent exists");
            assert!(node.number_of_points() >= 5);
            current = node.parent();
        }
    }

    #[test]
    fn test_index_only_does_not_touch_points() {
        let mut tree = Octree::new(&[0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);
        let mut points = vec![[0.5, 0.5, 0.5]];
        let p = points[0];
        let leaf = tree.leaf_container(&p);
        let id = tree.insert_point(leaf, &mut points, &p, 4, InsertMode::IndexOnly(0));
        assert_eq!(id, 0);
        assert_eq!(points.len(), 1);

        let leaf = tree.leaf_container(&[0.7, 0.7, 0.7]);
        let id = tree.insert_point(leaf, &mut points, &[0.7, 0.7, 0.7], 4, InsertMode::SetAt(3));
        assert_eq!(id, 3);
        assert_eq!(points.len(), 4);
        assert_eq!(points[3], [0.7, 0.7, 0.7]);
    }
}
