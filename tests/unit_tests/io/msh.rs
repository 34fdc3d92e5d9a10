use crate::export_mesh_vtk;
use crate::unit_tests::fixtures::UNIT_SQUARE_MSH;
use mshconv::cell::{CellType, GeometricType};
use mshconv::connectivity::ConnectivityTable;
use mshconv::io::msh::{load_msh_from_file, load_raw_mesh_from_bytes, load_raw_mesh_from_file};
use mshconv::raw::{ElementBlock, MeshModel};
use mshconv::{convert, ConvertOptions};
use nalgebra::DMatrix;
use util::assert_approx_matrix_eq;

#[test]
fn load_raw_unit_square() -> eyre::Result<()> {
    let raw = load_raw_mesh_from_bytes(UNIT_SQUARE_MSH.as_bytes())?;

    assert_eq!(raw.node_ids(), [1, 2, 3, 4]);
    assert_eq!(&raw.coordinates()[6..9], [1.0, 1.0, 0.0]);

    assert_eq!(
        raw.entity_element_blocks(2, 1).unwrap(),
        [ElementBlock::from_elements(2, [[1, 2, 3], [1, 3, 4]])]
    );
    assert_eq!(
        raw.entity_element_blocks(1, 2).unwrap(),
        [ElementBlock::from_elements(1, [[2, 3]])]
    );
    assert!(raw.entity_element_blocks(1, 3).is_none());

    let groups: Vec<_> = raw
        .physical_groups()
        .iter()
        .map(|group| (group.dim, group.tag, group.entities.clone()))
        .collect();
    assert_eq!(groups, [(1, 5, vec![1, 2]), (2, 7, vec![1])]);
    assert!(raw.physical_groups().iter().all(|group| group.name.is_none()));

    Ok(())
}

#[test]
fn convert_loaded_unit_square() -> eyre::Result<()> {
    let mut raw = load_raw_mesh_from_bytes(UNIT_SQUARE_MSH.as_bytes())?;
    raw.set_physical_name(1, 5, "walls");
    let (mesh, collections) = convert(&raw, 2, &ConvertOptions::default().with_prune_z(true))?;

    assert_eq!(mesh.num_nodes(), 4);
    assert_eq!(mesh.gdim(), 2);
    let expected_points = DMatrix::from_row_slice(4, 2, &[0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0]);
    assert_approx_matrix_eq!(mesh.points(), &expected_points, abstol = 1e-14);
    assert_eq!(mesh.cell_type(), CellType::new(GeometricType::Triangle, 1).unwrap());
    assert_eq!(mesh.cells(), &ConnectivityTable::from_rows(3, [[0, 1, 2], [0, 2, 3]]));

    let walls = collections.get_by_name("walls").unwrap();
    assert_eq!(walls.cells(), &ConnectivityTable::from_rows(2, [[0, 1], [1, 2]]));
    assert_eq!(walls.values(), [5, 5]);
    assert_eq!(collections.get(2, 7).unwrap().values(), [7, 7]);

    export_mesh_vtk("io_msh", "convert_loaded_unit_square", &mesh);
    Ok(())
}

#[test]
fn load_unit_square_from_file() -> eyre::Result<()> {
    let path = std::env::temp_dir().join("mshconv_load_unit_square_from_file.msh");
    std::fs::write(&path, UNIT_SQUARE_MSH)?;

    let raw = load_raw_mesh_from_file(&path)?;
    assert_eq!(raw.node_ids().len(), 4);

    let (mesh, collections) = load_msh_from_file(&path, 2, &ConvertOptions::default())?;
    assert_eq!(mesh.num_cells(), 2);
    assert_eq!(collections.len(), 2);
    Ok(())
}

#[test]
fn load_invalid_input_fails() {
    assert!(load_raw_mesh_from_bytes(b"this is not a mesh").is_err());
    assert!(load_raw_mesh_from_file("this/file/does/not/exist.msh").is_err());
}
