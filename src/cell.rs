//! Cell types, the Gmsh cell type lookup table and local node reordering.
//!
//! Gmsh lists the nodes of a cell in its own local order. The finite element assembler consuming
//! converted meshes expects a different order: sub-entities of simplices are numbered after the
//! vertex they are opposite to, and quadrilaterals and hexahedra use tensor-product vertex
//! numbering. Each supported cell type therefore carries a fixed *gather permutation* `p` such that
//! `target[i] = source[p[i]]`.
use crate::error::ConversionError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geometric shape of a reference cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeometricType {
    Point,
    Interval,
    Triangle,
    Quadrilateral,
    Tetrahedron,
    Hexahedron,
}

impl GeometricType {
    /// Topological dimension of the shape.
    pub fn dim(&self) -> usize {
        match self {
            GeometricType::Point => 0,
            GeometricType::Interval => 1,
            GeometricType::Triangle | GeometricType::Quadrilateral => 2,
            GeometricType::Tetrahedron | GeometricType::Hexahedron => 3,
        }
    }

    pub fn num_vertices(&self) -> usize {
        match self {
            GeometricType::Point => 1,
            GeometricType::Interval => 2,
            GeometricType::Triangle => 3,
            GeometricType::Quadrilateral | GeometricType::Tetrahedron => 4,
            GeometricType::Hexahedron => 8,
        }
    }

    /// Local vertex tuples of the sub-entities of dimension `dim`, in target ordering.
    ///
    /// Sub-entity `i` of dimension `dim` consists of the vertices `reference_entities(dim)[i]`.
    /// Returns an empty slice if `dim` exceeds the dimension of the shape.
    pub fn reference_entities(&self, dim: usize) -> &'static [&'static [usize]] {
        use GeometricType::*;
        if dim == 0 {
            return &VERTICES[..self.num_vertices()];
        }
        match (*self, dim) {
            (Interval, 1) => &[&[0, 1]],
            (Triangle, 1) => TRIANGLE_EDGES,
            (Triangle, 2) => &[&[0, 1, 2]],
            (Quadrilateral, 1) => QUADRILATERAL_EDGES,
            (Quadrilateral, 2) => &[&[0, 1, 2, 3]],
            (Tetrahedron, 1) => TETRAHEDRON_EDGES,
            (Tetrahedron, 2) => TETRAHEDRON_FACES,
            (Tetrahedron, 3) => &[&[0, 1, 2, 3]],
            (Hexahedron, 1) => HEXAHEDRON_EDGES,
            (Hexahedron, 2) => HEXAHEDRON_FACES,
            (Hexahedron, 3) => &[&[0, 1, 2, 3, 4, 5, 6, 7]],
            _ => &[],
        }
    }

    /// Shape of the sub-entities of dimension `dim`.
    ///
    /// Returns `None` if `dim` exceeds the dimension of the shape.
    pub fn sub_entity_type(&self, dim: usize) -> Option<GeometricType> {
        use GeometricType::*;
        match (*self, dim) {
            (_, 0) => Some(Point),
            (_, 1) if self.dim() >= 1 => Some(Interval),
            (Triangle | Tetrahedron, 2) => Some(Triangle),
            (Quadrilateral | Hexahedron, 2) => Some(Quadrilateral),
            (Tetrahedron, 3) => Some(Tetrahedron),
            (Hexahedron, 3) => Some(Hexahedron),
            _ => None,
        }
    }
}

const VERTICES: &[&[usize]] = &[&[0], &[1], &[2], &[3], &[4], &[5], &[6], &[7]];

const TRIANGLE_EDGES: &[&[usize]] = &[&[1, 2], &[0, 2], &[0, 1]];

const QUADRILATERAL_EDGES: &[&[usize]] = &[&[0, 1], &[0, 2], &[1, 3], &[2, 3]];

const TETRAHEDRON_EDGES: &[&[usize]] = &[&[2, 3], &[1, 3], &[1, 2], &[0, 3], &[0, 2], &[0, 1]];

const TETRAHEDRON_FACES: &[&[usize]] = &[&[1, 2, 3], &[0, 2, 3], &[0, 1, 3], &[0, 1, 2]];

const HEXAHEDRON_EDGES: &[&[usize]] = &[
    &[0, 1],
    &[0, 2],
    &[0, 4],
    &[1, 3],
    &[1, 5],
    &[2, 3],
    &[2, 6],
    &[3, 7],
    &[4, 5],
    &[4, 6],
    &[5, 7],
    &[6, 7],
];

const HEXAHEDRON_FACES: &[&[usize]] = &[
    &[0, 1, 2, 3],
    &[0, 1, 4, 5],
    &[0, 2, 4, 6],
    &[1, 3, 5, 7],
    &[2, 3, 6, 7],
    &[4, 5, 6, 7],
];

/// A geometric shape together with the polynomial order of its geometry.
///
/// Only the combinations found in [`GMSH_CELL_TYPES`] can be constructed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellType {
    geometry: GeometricType,
    order: usize,
}

impl CellType {
    /// Returns the cell type with the given geometry and order, if it is supported.
    pub fn new(geometry: GeometricType, order: usize) -> Option<Self> {
        GMSH_CELL_TYPES
            .iter()
            .map(|entry| entry.cell_type)
            .find(|cell_type| cell_type.geometry == geometry && cell_type.order == order)
    }

    pub fn geometry(&self) -> GeometricType {
        self.geometry
    }

    /// Polynomial order of the cell geometry (0 for points).
    pub fn order(&self) -> usize {
        self.order
    }

    pub fn dim(&self) -> usize {
        self.geometry.dim()
    }

    pub fn num_nodes(&self) -> usize {
        self.gmsh().num_nodes
    }

    /// The Gmsh table entry describing this cell type.
    pub fn gmsh(&self) -> &'static GmshCellType {
        GMSH_CELL_TYPES
            .iter()
            .find(|entry| entry.cell_type == *self)
            .expect("CellType can only be constructed from entries of the lookup table")
    }

    /// Gather permutation from Gmsh local node order to target local node order.
    pub fn permutation(&self) -> &'static [usize] {
        permutation(self.geometry, self.num_nodes())
            .expect("Every supported cell type has a permutation")
    }

    /// Gather permutation from target local node order back to Gmsh local node order.
    pub fn inverse_permutation(&self) -> Vec<usize> {
        let perm = self.permutation();
        let mut inverse = vec![0; perm.len()];
        for (target, &source) in perm.iter().enumerate() {
            inverse[source] = target;
        }
        inverse
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.gmsh().name)
    }
}

/// An entry of the Gmsh cell type lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmshCellType {
    /// Gmsh's numeric element type code.
    pub code: i32,
    /// Gmsh's name for the element type.
    pub name: &'static str,
    pub cell_type: CellType,
    pub num_nodes: usize,
}

macro_rules! gmsh_cell {
    ($code:expr, $name:expr, $geometry:ident, $order:expr, $num_nodes:expr) => {
        GmshCellType {
            code: $code,
            name: $name,
            cell_type: CellType {
                geometry: GeometricType::$geometry,
                order: $order,
            },
            num_nodes: $num_nodes,
        }
    };
}

/// The supported Gmsh element types.
pub static GMSH_CELL_TYPES: [GmshCellType; 11] = [
    gmsh_cell!(15, "vertex", Point, 0, 1),
    gmsh_cell!(1, "line", Interval, 1, 2),
    gmsh_cell!(8, "line3", Interval, 2, 3),
    gmsh_cell!(2, "triangle", Triangle, 1, 3),
    gmsh_cell!(9, "triangle6", Triangle, 2, 6),
    gmsh_cell!(3, "quad", Quadrilateral, 1, 4),
    gmsh_cell!(10, "quad9", Quadrilateral, 2, 9),
    gmsh_cell!(4, "tetra", Tetrahedron, 1, 4),
    gmsh_cell!(11, "tetra10", Tetrahedron, 2, 10),
    gmsh_cell!(5, "hexahedron", Hexahedron, 1, 8),
    gmsh_cell!(12, "hexahedron27", Hexahedron, 2, 27),
];

/// Looks up the Gmsh element type with the given numeric code.
pub fn gmsh_cell_type(code: i32) -> Result<&'static GmshCellType, ConversionError> {
    GMSH_CELL_TYPES
        .iter()
        .find(|entry| entry.code == code)
        .ok_or(ConversionError::UnknownCellType { code })
}

/// Gather permutation from Gmsh to target local node order for the given shape and node count.
///
/// Returns `None` for unsupported combinations.
pub fn permutation(geometry: GeometricType, num_nodes: usize) -> Option<&'static [usize]> {
    use GeometricType::*;
    let perm: &'static [usize] = match (geometry, num_nodes) {
        (Point, 1) => &[0],
        (Interval, 2) => &[0, 1],
        (Interval, 3) => &[0, 1, 2],
        (Triangle, 3) => &[0, 1, 2],
        (Triangle, 6) => &[0, 1, 2, 4, 5, 3],
        (Quadrilateral, 4) => &[0, 1, 3, 2],
        (Quadrilateral, 9) => &[0, 1, 3, 2, 4, 7, 5, 6, 8],
        (Tetrahedron, 4) => &[0, 1, 2, 3],
        (Tetrahedron, 10) => &[0, 1, 2, 3, 8, 9, 5, 7, 6, 4],
        (Hexahedron, 8) => &[0, 1, 3, 2, 4, 5, 7, 6],
        (Hexahedron, 27) => &[
            0, 1, 3, 2, 4, 5, 7, 6, // vertices
            8, 9, 10, 11, 12, 13, 15, 14, 16, 17, 18, 19, // edges
            20, 21, 22, 23, 24, 25, // faces
            26,
        ],
        _ => return None,
    };
    Some(perm)
}

/// Writes `target[i] = source[perm[i]]` for every `i`.
///
/// # Panics
///
/// Panics if the three slices do not have the same length.
pub fn permute_into<T: Copy>(perm: &[usize], source: &[T], target: &mut [T]) {
    assert_eq!(perm.len(), source.len());
    assert_eq!(perm.len(), target.len());
    for (t, &p) in target.iter_mut().zip(perm) {
        *t = source[p];
    }
}
