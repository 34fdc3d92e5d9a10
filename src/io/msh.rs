//! Loading of Gmsh MSH files as [`RawMesh`] generator output.
use crate::convert::{convert, ConvertOptions};
use crate::mesh::Mesh;
use crate::raw::{ElementBlock, NodeId, RawMesh};
use crate::tagging::MeshValueCollections;
use eyre::{eyre, Context};
use log::info;
use std::path::Path;

/// Loads the generator output stored in a Gmsh MSH file at the given path.
pub fn load_raw_mesh_from_file<P: AsRef<Path>>(file_path: P) -> eyre::Result<RawMesh> {
    let msh_bytes = std::fs::read(file_path).wrap_err("failed to read file")?;
    load_raw_mesh_from_bytes(&msh_bytes).wrap_err("failed to load mesh from msh file")
}

/// Parses the given bytes as a Gmsh MSH file.
///
/// Node ids are assumed to be consecutive, starting at 1, in the order the node blocks appear
/// in the file. Physical group names are not part of the parsed data; use
/// [`RawMesh::set_physical_name`] to attach them.
pub fn load_raw_mesh_from_bytes(bytes: &[u8]) -> eyre::Result<RawMesh> {
    let mut msh_file = mshio::parse_msh_bytes(bytes).map_err(|e| eyre!("failed to parse msh file: {}", e))?;

    let msh_nodes = msh_file
        .data
        .nodes
        .take()
        .ok_or(eyre!("MSH file does not contain nodes"))?;
    let msh_elements = msh_file
        .data
        .elements
        .take()
        .ok_or(eyre!("MSH file does not contain elements"))?;

    let mut raw = RawMesh::new();

    let mut next_id: NodeId = 1;
    for node_block in &msh_nodes.node_blocks {
        // Ensure that node tags are consecutive
        if node_block.node_tags.is_some() {
            return Err(eyre!("node block tags are not consecutive in msh file"));
        }
        for node in &node_block.nodes {
            raw.add_node(next_id, [node.x, node.y, node.z]);
            next_id += 1;
        }
    }

    for element_block in &msh_elements.element_blocks {
        let dim = usize::try_from(element_block.entity_dim)
            .wrap_err("error converting element block entity dimension to usize")?;
        let code = gmsh_code(&element_block.element_type)?;
        let node_ids = element_block
            .elements
            .iter()
            .flat_map(|element| element.nodes.iter().copied())
            .collect();
        raw.add_element_block(dim, element_block.entity_tag, ElementBlock::new(code, node_ids));
    }

    if let Some(entities) = msh_file.data.entities.take() {
        macro_rules! add_physical_groups {
            ($entities:expr, $dim:expr) => {
                for entity in &$entities {
                    for &physical_tag in &entity.physical_tags {
                        raw.add_physical_group($dim, physical_tag, [entity.tag]);
                    }
                }
            };
        }
        add_physical_groups!(entities.points, 0);
        add_physical_groups!(entities.curves, 1);
        add_physical_groups!(entities.surfaces, 2);
        add_physical_groups!(entities.volumes, 3);
    } else {
        info!("MSH file does not contain entities, no physical groups are available");
    }

    Ok(raw)
}

/// Loads a Gmsh MSH file and converts it into a mesh of topological dimension `tdim`.
pub fn load_msh_from_file<P: AsRef<Path>>(
    file_path: P,
    tdim: usize,
    options: &ConvertOptions,
) -> eyre::Result<(Mesh, MeshValueCollections)> {
    let raw = load_raw_mesh_from_file(file_path)?;
    Ok(convert(&raw, tdim, options)?)
}

/// Numeric Gmsh code of an MSH element type supported by conversion.
fn gmsh_code(element_type: &mshio::ElementType) -> eyre::Result<i32> {
    use mshio::ElementType::*;
    let code = match element_type {
        Lin2 => 1,
        Tri3 => 2,
        Qua4 => 3,
        Tet4 => 4,
        Hex8 => 5,
        Lin3 => 8,
        Tri6 => 9,
        Qua9 => 10,
        Tet10 => 11,
        Hex27 => 12,
        Pnt => 15,
        other => return Err(eyre!("unsupported MSH element type {:?}", other)),
    };
    Ok(code)
}
