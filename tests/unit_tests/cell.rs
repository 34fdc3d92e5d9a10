use mshconv::cell::{gmsh_cell_type, permute_into, CellType, GeometricType, GMSH_CELL_TYPES};
use mshconv::error::ConversionError;
use proptest::prelude::*;

#[test]
fn gmsh_codes_resolve_to_cell_types() {
    use GeometricType::*;
    let expected = [
        (15, Point, 0, 1),
        (1, Interval, 1, 2),
        (8, Interval, 2, 3),
        (2, Triangle, 1, 3),
        (9, Triangle, 2, 6),
        (3, Quadrilateral, 1, 4),
        (10, Quadrilateral, 2, 9),
        (4, Tetrahedron, 1, 4),
        (11, Tetrahedron, 2, 10),
        (5, Hexahedron, 1, 8),
        (12, Hexahedron, 2, 27),
    ];

    for (code, geometry, order, num_nodes) in expected {
        let entry = gmsh_cell_type(code).unwrap();
        assert_eq!(entry.cell_type.geometry(), geometry);
        assert_eq!(entry.cell_type.order(), order);
        assert_eq!(entry.num_nodes, num_nodes);
        assert_eq!(entry.cell_type.num_nodes(), num_nodes);
        assert_eq!(entry.cell_type.gmsh().code, code);
        assert_eq!(CellType::new(geometry, order), Some(entry.cell_type));
    }
}

#[test]
fn unknown_gmsh_code_is_rejected() {
    // 6 is a prism, which is not supported
    assert_eq!(gmsh_cell_type(6), Err(ConversionError::UnknownCellType { code: 6 }));
    assert_eq!(gmsh_cell_type(-1), Err(ConversionError::UnknownCellType { code: -1 }));
    assert_eq!(CellType::new(GeometricType::Triangle, 3), None);
}

#[test]
fn display_uses_gmsh_names() {
    let tet10 = CellType::new(GeometricType::Tetrahedron, 2).unwrap();
    assert_eq!(tet10.to_string(), "tetra10");
    let quad = CellType::new(GeometricType::Quadrilateral, 1).unwrap();
    assert_eq!(quad.to_string(), "quad");
}

#[test]
fn permutations_are_bijections() {
    for entry in &GMSH_CELL_TYPES {
        let perm = entry.cell_type.permutation();
        let mut sorted = perm.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..entry.num_nodes).collect::<Vec<_>>(), "{}", entry.name);

        let inverse = entry.cell_type.inverse_permutation();
        for (i, &p) in perm.iter().enumerate() {
            assert_eq!(inverse[p], i);
        }
    }
}

#[test]
fn linear_simplex_and_line_permutations_are_identity() {
    for code in [15, 1, 8, 2, 4] {
        let entry = gmsh_cell_type(code).unwrap();
        let perm = entry.cell_type.permutation();
        assert_eq!(perm, (0..entry.num_nodes).collect::<Vec<_>>().as_slice());
    }
}

#[test]
fn quadrilateral_vertices_are_reordered_to_tensor_product_order() {
    let quad = gmsh_cell_type(3).unwrap().cell_type;
    let source = [10, 11, 12, 13];
    let mut target = [0; 4];
    permute_into(quad.permutation(), &source, &mut target);
    assert_eq!(target, [10, 11, 13, 12]);

    let hex = gmsh_cell_type(5).unwrap().cell_type;
    let source: Vec<usize> = (0..8).collect();
    let mut target = vec![0; 8];
    permute_into(hex.permutation(), &source, &mut target);
    assert_eq!(target, [0, 1, 3, 2, 4, 5, 7, 6]);
}

/// Gmsh local edge node numbering: the node `nodes[k]` lies on the edge `edges[k]`.
fn gmsh_edge_nodes(code: i32) -> (Vec<usize>, Vec<[usize; 2]>) {
    match code {
        9 => (vec![3, 4, 5], vec![[0, 1], [1, 2], [2, 0]]),
        10 => (vec![4, 5, 6, 7], vec![[0, 1], [1, 2], [2, 3], [3, 0]]),
        11 => (
            vec![4, 5, 6, 7, 8, 9],
            vec![[0, 1], [1, 2], [2, 0], [3, 0], [3, 2], [3, 1]],
        ),
        12 => (
            (8..20).collect(),
            vec![
                [0, 1],
                [0, 3],
                [0, 4],
                [1, 2],
                [1, 5],
                [2, 3],
                [2, 6],
                [3, 7],
                [4, 5],
                [4, 7],
                [5, 6],
                [6, 7],
            ],
        ),
        _ => unreachable!(),
    }
}

#[test]
fn quadratic_edge_nodes_follow_reference_edges() {
    for code in [9, 10, 11, 12] {
        let cell_type = gmsh_cell_type(code).unwrap().cell_type;
        let geometry = cell_type.geometry();
        let perm = cell_type.permutation();
        let inverse = cell_type.inverse_permutation();
        let num_vertices = geometry.num_vertices();
        let (edge_nodes, edges) = gmsh_edge_nodes(code);

        for (local_edge, reference_edge) in geometry.reference_entities(1).iter().enumerate() {
            // The target node of this edge, and the Gmsh edge it was taken from
            let source_node = perm[num_vertices + local_edge];
            let position = edge_nodes
                .iter()
                .position(|&node| node == source_node)
                .expect("Edge nodes map to edge nodes");
            let mut source_edge: Vec<usize> = edges[position].iter().map(|&v| inverse[v]).collect();
            source_edge.sort_unstable();
            assert_eq!(source_edge, reference_edge.to_vec(), "{} edge {}", cell_type, local_edge);
        }
    }
}

#[test]
fn reference_entities_have_sub_entity_vertex_counts() {
    for entry in &GMSH_CELL_TYPES {
        let geometry = entry.cell_type.geometry();
        for dim in 0..=geometry.dim() {
            let sub_type = geometry.sub_entity_type(dim).unwrap();
            for entity in geometry.reference_entities(dim) {
                assert_eq!(entity.len(), sub_type.num_vertices());
                assert!(entity.iter().all(|&v| v < geometry.num_vertices()));
            }
        }
        assert!(geometry.reference_entities(geometry.dim() + 1).is_empty());
        assert_eq!(geometry.sub_entity_type(geometry.dim() + 1), None);
    }
}

proptest! {
    #[test]
    fn permute_into_gathers(values in prop::collection::vec(any::<i64>(), 27)) {
        for entry in &GMSH_CELL_TYPES {
            let n = entry.num_nodes;
            let perm = entry.cell_type.permutation();
            let mut target = vec![0; n];
            permute_into(perm, &values[..n], &mut target);
            for i in 0..n {
                prop_assert_eq!(target[i], values[perm[i]]);
            }
        }
    }
}
