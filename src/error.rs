//! Errors reported by mesh conversion.
use thiserror::Error;

/// The coordinate axis a pruning request refers to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    Y,
    Z,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Y => write!(f, "y"),
            Axis::Z => write!(f, "z"),
        }
    }
}

/// Failure of a mesh conversion.
///
/// Every variant aborts the whole conversion: no partial mesh or partial set of collections is
/// ever returned. Conversion is deterministic, so retrying with the same input fails the same way.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConversionError {
    /// The generator output is internally inconsistent, e.g. an element references a node id
    /// that is not among the generator's nodes.
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),
    /// Pruning was requested for a coordinate that is not zero for every node.
    #[error("non-zero {axis}-component would be pruned (node {node}, value {value:e})")]
    LossyPrune { axis: Axis, node: usize, value: f64 },
    /// The numeric cell type code is not in the supported lookup table.
    #[error("unknown gmsh cell type code {code}")]
    UnknownCellType { code: i32 },
    /// More than one cell type appears among the cells of the top dimension.
    #[error("mixed topology meshes are not supported (found cell types {codes:?} in dimension {dim})")]
    UnsupportedTopology { dim: usize, codes: Vec<i32> },
    /// A physical group mixes several cell types.
    #[error("physical group ({dim}, {tag}) mixes cell types (entity {entity})")]
    MixedTopology { dim: usize, tag: i32, entity: i32 },
    /// Tagging of lower-dimensional entities was requested for a higher order mesh.
    #[error("submanifold ({dim}, {tag}) cannot be tagged on a mesh of order {order}")]
    UnsupportedSubmanifold { dim: usize, tag: i32, order: usize },
    /// A physical group has a dimension larger than the dimension of the mesh.
    #[error("physical group of dimension {dim} exceeds the topological dimension {tdim} of the mesh")]
    InvalidGroupDimension { dim: usize, tdim: usize },
}

