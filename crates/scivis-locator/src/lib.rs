#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Axis-aligned bounding box helpers.
pub mod bounding_box;

/// Error types for the point locator.
pub mod error;

/// Incremental octree point locator.
pub mod locator;

/// Octree nodes and their geometric queries.
pub mod node;

/// Arena octree with leaf splitting.
pub mod octree;

/// Point storage abstraction.
pub mod points;

pub use error::LocatorError;
pub use locator::{
    IncrementalOctreePointLocator, InsertedPointQuery, LocatorConfig, UniqueInsertion,
};
pub use node::{NodeId, NodeKind, OctreeNode};
pub use octree::{InsertMode, Octree};
pub use points::PointContainer;
