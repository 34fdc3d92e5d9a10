//! Procedural generation of structured generator output.
//!
//! The generated [`RawMesh`] values look like what Gmsh produces for axis-aligned rectangles and
//! boxes: consecutive node ids, elements in Gmsh local order, one entity per boundary side and
//! named physical groups.
use crate::cell::{CellType, GeometricType};
use crate::raw::{ElementBlock, NodeId, RawMesh};

/// Physical tag of the group containing all cells of top dimension.
pub const DOMAIN_TAG: i32 = 10;

/// Physical tag of the group containing the corner points of a rectangle.
pub const CORNERS_TAG: i32 = 5;

/// Gmsh-ordered local grid offsets of the cells covering one grid square.
fn square_cells(cell_type: CellType) -> &'static [&'static [[usize; 2]]] {
    use GeometricType::*;
    match (cell_type.geometry(), cell_type.order()) {
        (Quadrilateral, 1) => &[&[[0, 0], [1, 0], [1, 1], [0, 1]]],
        (Quadrilateral, 2) => &[&[[0, 0], [2, 0], [2, 2], [0, 2], [1, 0], [2, 1], [1, 2], [0, 1], [1, 1]]],
        (Triangle, 1) => &[&[[0, 0], [1, 0], [1, 1]], &[[0, 0], [1, 1], [0, 1]]],
        (Triangle, 2) => &[
            &[[0, 0], [2, 0], [2, 2], [1, 0], [2, 1], [1, 1]],
            &[[0, 0], [2, 2], [0, 2], [1, 1], [1, 2], [0, 1]],
        ],
        _ => panic!("Unsupported cell type {} for rectangular mesh", cell_type),
    }
}

fn code_of(geometry: GeometricType, order: usize) -> i32 {
    CellType::new(geometry, order)
        .expect("Lines and points of order 1 and 2 are supported")
        .gmsh()
        .code
}

/// Generates a mesh of the rectangle `[0, size[0]] x [0, size[1]]` (with `z = 0`) with
/// `cells[0] x cells[1]` grid squares.
///
/// Supported cell types are triangles and quadrilaterals of order 1 and 2. Each square is split
/// into two triangles along its diagonal from the lower left corner.
///
/// The boundary curves are the entities `(1, 1)` (bottom), `(1, 2)` (right), `(1, 3)` (top) and
/// `(1, 4)` (left), oriented counterclockwise. The corners are the point entities `(0, 1..=4)` and
/// the interior is the surface `(2, 1)`. The physical group [`DOMAIN_TAG`] contains the surface.
/// For linear cells there are additionally one physical group per boundary curve, carrying the
/// tag of the curve, and the group [`CORNERS_TAG`] of the corner points.
///
/// # Panics
///
/// Panics if the cell type is not supported or a cell count is zero.
pub fn create_rectangular_raw_mesh(size: [f64; 2], cells: [usize; 2], cell_type: CellType) -> RawMesh {
    let local_cells = square_cells(cell_type);
    assert!(cells[0] > 0 && cells[1] > 0, "Cell counts must be positive");

    let k = cell_type.order();
    let [nx, ny] = cells;
    let num_vertices_x = k * nx + 1;
    let num_vertices_y = k * ny + 1;
    let node = |[i, j]: [usize; 2]| (i + j * num_vertices_x) as NodeId + 1;

    let mut raw = RawMesh::new();
    for j in 0..num_vertices_y {
        for i in 0..num_vertices_x {
            let x = size[0] * i as f64 / (k * nx) as f64;
            let y = size[1] * j as f64 / (k * ny) as f64;
            raw.add_node(node([i, j]), [x, y, 0.0]);
        }
    }

    let mut elements = Vec::new();
    for cy in 0..ny {
        for cx in 0..nx {
            for local in local_cells {
                let element: Vec<_> = local
                    .iter()
                    .map(|&[a, b]| node([k * cx + a, k * cy + b]))
                    .collect();
                elements.push(element);
            }
        }
    }
    raw.add_element_block(2, 1, ElementBlock::from_elements(cell_type.gmsh().code, elements));

    // Start and end vertex of each boundary edge, side by side
    let sides: [Vec<([usize; 2], [usize; 2])>; 4] = [
        (0..nx).map(|c| ([k * c, 0], [k * c + k, 0])).collect(),
        (0..ny).map(|c| ([k * nx, k * c], [k * nx, k * c + k])).collect(),
        (0..nx).rev().map(|c| ([k * c + k, k * ny], [k * c, k * ny])).collect(),
        (0..ny).rev().map(|c| ([0, k * c + k], [0, k * c])).collect(),
    ];
    let line_code = code_of(GeometricType::Interval, k);
    for (side_tag, edges) in (1..).zip(&sides) {
        let elements = edges.iter().map(|&(a, b)| {
            let mut element = vec![node(a), node(b)];
            if k == 2 {
                element.push(node([(a[0] + b[0]) / 2, (a[1] + b[1]) / 2]));
            }
            element
        });
        raw.add_element_block(1, side_tag, ElementBlock::from_elements(line_code, elements));
    }

    let corners = [[0, 0], [k * nx, 0], [k * nx, k * ny], [0, k * ny]];
    let vertex_code = code_of(GeometricType::Point, 0);
    for (corner_tag, &corner) in (1..).zip(&corners) {
        raw.add_element_block(0, corner_tag, ElementBlock::new(vertex_code, vec![node(corner)]));
    }

    if k == 1 {
        raw.add_physical_group(0, CORNERS_TAG, 1..=4);
        raw.set_physical_name(0, CORNERS_TAG, "corners");
        for (tag, name) in (1..).zip(["bottom", "right", "top", "left"]) {
            raw.add_physical_group(1, tag, [tag]);
            raw.set_physical_name(1, tag, name);
        }
    }
    raw.add_physical_group(2, DOMAIN_TAG, [1]);
    raw.set_physical_name(2, DOMAIN_TAG, "domain");
    raw
}

pub fn create_unit_square_raw_mesh(cells_per_dim: usize, cell_type: CellType) -> RawMesh {
    create_rectangular_raw_mesh([1.0, 1.0], [cells_per_dim, cells_per_dim], cell_type)
}

/// Generates a mesh of the box `[0, size[0]] x [0, size[1]] x [0, size[2]]` with
/// `cells[0] x cells[1] x cells[2]` grid cubes.
///
/// Supported cell types are linear tetrahedra and hexahedra. Each cube is split into six
/// tetrahedra sharing the diagonal from its lowest to its highest corner, so that the faces of
/// neighboring cubes match.
///
/// The six sides are the surface entities `(2, 1..=6)`, in the order `x = 0`, `x = max`, `y = 0`,
/// `y = max`, `z = 0`, `z = max`, each with a physical group of the same tag. The interior is the
/// volume `(3, 1)`, contained in the physical group [`DOMAIN_TAG`].
///
/// # Panics
///
/// Panics if the cell type is not supported or a cell count is zero.
pub fn create_box_raw_mesh(size: [f64; 3], cells: [usize; 3], cell_type: CellType) -> RawMesh {
    use GeometricType::*;
    assert_eq!(cell_type.order(), 1, "Only linear cells are supported for box meshes");
    assert!(
        matches!(cell_type.geometry(), Tetrahedron | Hexahedron),
        "Unsupported cell type {} for box mesh",
        cell_type
    );
    assert!(cells.iter().all(|&n| n > 0), "Cell counts must be positive");

    let num_vertices = [cells[0] + 1, cells[1] + 1, cells[2] + 1];
    let node = |[i, j, l]: [usize; 3]| (i + num_vertices[0] * (j + num_vertices[1] * l)) as NodeId + 1;

    let mut raw = RawMesh::new();
    for l in 0..num_vertices[2] {
        for j in 0..num_vertices[1] {
            for i in 0..num_vertices[0] {
                let x = size[0] * i as f64 / cells[0] as f64;
                let y = size[1] * j as f64 / cells[1] as f64;
                let z = size[2] * l as f64 / cells[2] as f64;
                raw.add_node(node([i, j, l]), [x, y, z]);
            }
        }
    }

    let local_cells: Vec<Vec<[usize; 3]>> = match cell_type.geometry() {
        Hexahedron => vec![vec![
            [0, 0, 0],
            [1, 0, 0],
            [1, 1, 0],
            [0, 1, 0],
            [0, 0, 1],
            [1, 0, 1],
            [1, 1, 1],
            [0, 1, 1],
        ]],
        _ => {
            // One tetrahedron per monotone path from the lowest to the highest corner
            let axis_orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
            axis_orders
                .iter()
                .map(|axes| {
                    let mut vertex = [0, 0, 0];
                    let mut tet = vec![vertex];
                    for &axis in axes {
                        vertex[axis] = 1;
                        tet.push(vertex);
                    }
                    tet
                })
                .collect()
        }
    };

    let mut elements = Vec::new();
    for cz in 0..cells[2] {
        for cy in 0..cells[1] {
            for cx in 0..cells[0] {
                for local in &local_cells {
                    let element: Vec<_> = local
                        .iter()
                        .map(|&[a, b, c]| node([cx + a, cy + b, cz + c]))
                        .collect();
                    elements.push(element);
                }
            }
        }
    }
    raw.add_element_block(3, 1, ElementBlock::from_elements(cell_type.gmsh().code, elements));

    let face_geometry = cell_type
        .geometry()
        .sub_entity_type(2)
        .expect("Three-dimensional cells have faces");
    let local_faces: &[&[[usize; 2]]] = match face_geometry {
        Quadrilateral => &[&[[0, 0], [1, 0], [1, 1], [0, 1]]],
        _ => &[&[[0, 0], [1, 0], [1, 1]], &[[0, 0], [1, 1], [0, 1]]],
    };
    let face_code = code_of(face_geometry, 1);

    let sides = [(0, 0), (0, cells[0]), (1, 0), (1, cells[1]), (2, 0), (2, cells[2])];
    for (side_tag, &(axis, value)) in (1..).zip(&sides) {
        // The two in-plane axes in increasing order
        let (u, w) = match axis {
            0 => (1, 2),
            1 => (0, 2),
            _ => (0, 1),
        };
        let mut elements = Vec::new();
        for cw in 0..cells[w] {
            for cu in 0..cells[u] {
                for local in local_faces {
                    let element: Vec<_> = local
                        .iter()
                        .map(|&[a, b]| {
                            let mut index = [0; 3];
                            index[axis] = value;
                            index[u] = cu + a;
                            index[w] = cw + b;
                            node(index)
                        })
                        .collect();
                    elements.push(element);
                }
            }
        }
        raw.add_element_block(2, side_tag, ElementBlock::from_elements(face_code, elements));
        raw.add_physical_group(2, side_tag, [side_tag]);
    }

    raw.add_physical_group(3, DOMAIN_TAG, [1]);
    raw.set_physical_name(3, DOMAIN_TAG, "domain");
    raw
}

pub fn create_unit_cube_raw_mesh(cells_per_dim: usize, cell_type: CellType) -> RawMesh {
    create_box_raw_mesh([1.0, 1.0, 1.0], [cells_per_dim; 3], cell_type)
}
