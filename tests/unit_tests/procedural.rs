use mshconv::cell::{CellType, GeometricType};
use mshconv::procedural::{create_box_raw_mesh, create_rectangular_raw_mesh, CORNERS_TAG, DOMAIN_TAG};
use mshconv::raw::{ElementBlock, MeshModel};
use util::assert_panics;

fn cell_type(geometry: GeometricType, order: usize) -> CellType {
    CellType::new(geometry, order).unwrap()
}

#[test]
fn rectangle_of_linear_triangles() {
    let raw = create_rectangular_raw_mesh([2.0, 1.0], [2, 1], cell_type(GeometricType::Triangle, 1));

    assert_eq!(raw.node_ids(), [1, 2, 3, 4, 5, 6]);
    #[rustfmt::skip]
    let expected_coords = [
        0.0, 0.0, 0.0,
        1.0, 0.0, 0.0,
        2.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        1.0, 1.0, 0.0,
        2.0, 1.0, 0.0,
    ];
    assert_eq!(raw.coordinates(), expected_coords);

    let cells = raw.element_blocks(2);
    assert_eq!(cells.len(), 1);
    assert_eq!(
        cells[0],
        &ElementBlock::from_elements(2, [[1, 2, 5], [1, 5, 4], [2, 3, 6], [2, 6, 5]])
    );

    let bottom = raw.entity_element_blocks(1, 1).unwrap();
    assert_eq!(bottom, [ElementBlock::from_elements(1, [[1, 2], [2, 3]])]);
    let top = raw.entity_element_blocks(1, 3).unwrap();
    assert_eq!(top, [ElementBlock::from_elements(1, [[6, 5], [5, 4]])]);

    let corners: Vec<_> = (1..=4)
        .map(|tag| raw.entity_element_blocks(0, tag).unwrap()[0].node_ids.clone())
        .collect();
    assert_eq!(corners, [[1], [3], [6], [4]]);

    let groups: Vec<_> = raw
        .physical_groups()
        .iter()
        .map(|group| (group.dim, group.tag, group.name.as_deref()))
        .collect();
    assert_eq!(
        groups,
        [
            (0, CORNERS_TAG, Some("corners")),
            (1, 1, Some("bottom")),
            (1, 2, Some("right")),
            (1, 3, Some("top")),
            (1, 4, Some("left")),
            (2, DOMAIN_TAG, Some("domain")),
        ]
    );
}

#[test]
fn rectangle_of_quadratic_triangles() {
    let raw = create_rectangular_raw_mesh([1.0, 1.0], [1, 1], cell_type(GeometricType::Triangle, 2));

    assert_eq!(raw.node_ids().len(), 9);
    assert_eq!(
        raw.element_blocks(2)[0],
        &ElementBlock::from_elements(9, [[1, 3, 9, 2, 6, 5], [1, 9, 7, 5, 8, 4]])
    );
    let right = raw.entity_element_blocks(1, 2).unwrap();
    assert_eq!(right, [ElementBlock::from_elements(8, [[3, 9, 6]])]);

    // Lower dimensional groups are left out for quadratic cells
    let groups: Vec<_> = raw
        .physical_groups()
        .iter()
        .map(|group| (group.dim, group.tag))
        .collect();
    assert_eq!(groups, [(2, DOMAIN_TAG)]);
}

#[test]
fn box_of_hexahedra() {
    let raw = create_box_raw_mesh([1.0, 2.0, 3.0], [1, 1, 1], cell_type(GeometricType::Hexahedron, 1));

    assert_eq!(raw.node_ids().len(), 8);
    assert_eq!(&raw.coordinates()[21..24], [1.0, 2.0, 3.0]);
    assert_eq!(
        raw.element_blocks(3)[0],
        &ElementBlock::from_elements(5, [[1, 2, 4, 3, 5, 6, 8, 7]])
    );
    // The side x = max
    assert_eq!(
        raw.entity_element_blocks(2, 2).unwrap(),
        [ElementBlock::from_elements(3, [[2, 4, 8, 6]])]
    );
    assert_eq!(raw.physical_groups().len(), 7);
}

#[test]
fn box_of_tetrahedra() {
    let raw = create_box_raw_mesh([1.0, 1.0, 1.0], [2, 1, 1], cell_type(GeometricType::Tetrahedron, 1));

    assert_eq!(raw.node_ids().len(), 12);
    let cells = raw.element_blocks(3);
    assert_eq!(cells[0].node_ids.len(), 12 * 4);
    // Every tetrahedron connects the lowest and highest corner of its cube
    for (k, tet) in cells[0].node_ids.chunks_exact(4).enumerate() {
        let cube = k / 6;
        assert_eq!(tet[0], 1 + cube as u64);
        assert_eq!(tet[3], 11 + cube as u64);
    }
    let side_faces = raw.entity_element_blocks(2, 5).unwrap();
    assert_eq!(side_faces[0].cell_code, 2);
    assert_eq!(side_faces[0].node_ids.len(), 4 * 3);
}

#[test]
fn unsupported_procedural_cell_types_panic() {
    let hex = cell_type(GeometricType::Hexahedron, 1);
    assert_panics!(create_rectangular_raw_mesh([1.0, 1.0], [1, 1], hex));

    let quad = cell_type(GeometricType::Quadrilateral, 1);
    assert_panics!(create_rectangular_raw_mesh([1.0, 1.0], [0, 1], quad));

    let tet10 = cell_type(GeometricType::Tetrahedron, 2);
    assert_panics!(create_box_raw_mesh([1.0, 1.0, 1.0], [1, 1, 1], tet10));
}
