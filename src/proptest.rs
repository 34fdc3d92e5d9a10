//! Strategies for generating generator output in property-based tests.
use crate::cell::{CellType, GeometricType};
use crate::procedural::create_rectangular_raw_mesh;
use crate::raw::{ElementBlock, MeshModel, NodeId, RawMesh};
use ::proptest::prelude::*;
use std::collections::HashMap;

/// Triangles and quadrilaterals of order 1 and 2.
pub fn planar_cell_type() -> impl Strategy<Value = CellType> {
    let cell_types: Vec<CellType> = [GeometricType::Triangle, GeometricType::Quadrilateral]
        .iter()
        .flat_map(|&geometry| (1..=2).filter_map(move |order| CellType::new(geometry, order)))
        .collect();
    prop::sample::select(cell_types)
}

/// Rectangular meshes with up to 4 x 4 squares, see
/// [`create_rectangular_raw_mesh`](crate::procedural::create_rectangular_raw_mesh).
pub fn rectangular_raw_mesh() -> impl Strategy<Value = RawMesh> {
    let size = [0.5..4.0, 0.5..4.0];
    (size, [1..=4usize, 1..=4usize], planar_cell_type())
        .prop_map(|(size, cells, cell_type)| create_rectangular_raw_mesh(size, cells, cell_type))
}

/// Gives the nodes of `raw` new, non-contiguous ids in a shuffled order and adds
/// `num_unused` nodes not referenced by any element.
pub fn relabeled(raw: RawMesh, num_unused: usize) -> impl Strategy<Value = RawMesh> {
    let num_nodes = raw.node_ids().len() + num_unused;
    // Ids are drawn from a range twice as large as needed, so that gaps appear
    let ids: Vec<NodeId> = (1..=2 * num_nodes as NodeId).collect();
    let positions: Vec<usize> = (0..num_nodes).collect();
    (Just(raw), Just(ids).prop_shuffle(), Just(positions).prop_shuffle())
        .prop_map(move |(raw, ids, positions)| relabel(&raw, &ids, &positions, num_unused))
}

fn relabel(raw: &RawMesh, new_ids: &[NodeId], positions: &[usize], num_unused: usize) -> RawMesh {
    let old_ids = raw.node_ids();
    let id_map: HashMap<NodeId, NodeId> = old_ids.iter().copied().zip(new_ids.iter().copied()).collect();

    // Unused nodes are placed far away so that they are easy to spot
    let mut nodes: Vec<(NodeId, [f64; 3])> = old_ids
        .iter()
        .zip(raw.coordinates().chunks_exact(3))
        .map(|(id, x)| (id_map[id], [x[0], x[1], x[2]]))
        .collect();
    for k in 0..num_unused {
        nodes.push((new_ids[old_ids.len() + k], [1e3, 1e3, 0.0]));
    }

    let mut relabeled = RawMesh::new();
    for &position in positions {
        let (id, x) = nodes[position];
        relabeled.add_node(id, x);
    }

    for entity in raw.entities() {
        for block in &entity.blocks {
            let node_ids = block.node_ids.iter().map(|id| id_map[id]).collect();
            relabeled.add_element_block(entity.dim, entity.tag, ElementBlock::new(block.cell_code, node_ids));
        }
    }

    for group in raw.physical_groups() {
        relabeled.add_physical_group(group.dim, group.tag, group.entities.iter().copied());
        if let Some(name) = &group.name {
            relabeled.set_physical_name(group.dim, group.tag, name.clone());
        }
    }
    relabeled
}
