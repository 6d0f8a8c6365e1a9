/// Errors reported by the octree point locator.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LocatorError {
    /// An insertion or query was issued before `init_point_insertion`.
    #[error("Point insertion has not been initialized")]
    NotInitialized,

    /// The bounds handed to `init_point_insertion` are empty or not finite.
    #[error("Invalid bounds {0:?}")]
    InvalidBounds([f64; 6]),

    /// A configuration value cannot be used to build an octree.
    #[error("Invalid locator configuration: {0}")]
    InvalidConfig(String),

    /// A point id refers past the end of the point container.
    #[error("Point id {id} is out of range for {len} points")]
    InvalidPointId {
        /// The offending id.
        id: usize,
        /// Number of points held by the container.
        len: usize,
    },
}
