//! Raw mesh generator output.
//!
//! The generator describes a mesh the way Gmsh does: nodes carry 1-based ids, which need not be
//! contiguous, and three coordinates each. Elements are grouped into blocks of a single cell type,
//! blocks belong to geometric entities identified by `(dim, tag)`, and physical groups collect
//! entities of one dimension under a common tag.
use crate::mesh::Mesh;
use serde::{Deserialize, Serialize};

/// Node id in the numbering of the mesh generator (1-based).
pub type NodeId = u64;

/// Elements of a single cell type, given by the ids of their nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementBlock {
    /// Gmsh element type code.
    pub cell_code: i32,
    /// Node ids of all elements, element after element, in Gmsh local order.
    pub node_ids: Vec<NodeId>,
}

impl ElementBlock {
    pub fn new(cell_code: i32, node_ids: Vec<NodeId>) -> Self {
        Self { cell_code, node_ids }
    }

    /// Creates a block from one node id tuple per element.
    pub fn from_elements<E: AsRef<[NodeId]>>(cell_code: i32, elements: impl IntoIterator<Item = E>) -> Self {
        let node_ids = elements
            .into_iter()
            .flat_map(|element| element.as_ref().to_vec())
            .collect();
        Self { cell_code, node_ids }
    }
}

/// A geometric entity (point, curve, surface or volume) and the elements meshing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub dim: usize,
    pub tag: i32,
    pub blocks: Vec<ElementBlock>,
}

/// A tagged collection of entities of one dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalGroup {
    pub dim: usize,
    pub tag: i32,
    pub name: Option<String>,
    /// Tags of the member entities, all of dimension `dim`.
    pub entities: Vec<i32>,
}

/// Read access to the output of a mesh generator.
///
/// This is the narrow interface through which conversion queries the generator. [`RawMesh`]
/// implements it for generator output held in memory.
pub trait MeshModel {
    /// Node ids and their coordinates, three consecutive values per node.
    fn nodes(&self) -> (&[NodeId], &[f64]);

    /// All element blocks of all entities of the given dimension.
    fn element_blocks(&self, dim: usize) -> Vec<&ElementBlock>;

    fn physical_groups(&self) -> &[PhysicalGroup];

    /// Element blocks of a single entity, or `None` if the entity does not exist.
    fn entity_element_blocks(&self, dim: usize, tag: i32) -> Option<&[ElementBlock]>;
}

/// Generator output held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMesh {
    node_ids: Vec<NodeId>,
    coordinates: Vec<f64>,
    entities: Vec<Entity>,
    physical_groups: Vec<PhysicalGroup>,
}

impl RawMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a raw mesh from node ids and a flat coordinate buffer with three values per node.
    ///
    /// The buffer length is not checked here; inconsistent input is reported by conversion.
    pub fn from_nodes(node_ids: Vec<NodeId>, coordinates: Vec<f64>) -> Self {
        Self {
            node_ids,
            coordinates,
            ..Self::default()
        }
    }

    pub fn add_node(&mut self, id: NodeId, coordinates: [f64; 3]) {
        self.node_ids.push(id);
        self.coordinates.extend_from_slice(&coordinates);
    }

    /// Adds a block of elements to the entity `(dim, tag)`, creating the entity if necessary.
    pub fn add_element_block(&mut self, dim: usize, tag: i32, block: ElementBlock) {
        match self.entity_mut(dim, tag) {
            Some(entity) => entity.blocks.push(block),
            None => self.entities.push(Entity {
                dim,
                tag,
                blocks: vec![block],
            }),
        }
    }

    /// Adds a physical group `(dim, tag)` containing the given entities.
    ///
    /// If the group already exists, the entities are appended to it.
    pub fn add_physical_group(&mut self, dim: usize, tag: i32, entities: impl IntoIterator<Item = i32>) {
        match self.physical_group_mut(dim, tag) {
            Some(group) => group.entities.extend(entities),
            None => self.physical_groups.push(PhysicalGroup {
                dim,
                tag,
                name: None,
                entities: entities.into_iter().collect(),
            }),
        }
    }

    /// Names the physical group `(dim, tag)`. Returns `false` if there is no such group.
    pub fn set_physical_name(&mut self, dim: usize, tag: i32, name: impl Into<String>) -> bool {
        match self.physical_group_mut(dim, tag) {
            Some(group) => {
                group.name = Some(name.into());
                true
            }
            None => false,
        }
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    pub fn coordinates(&self) -> &[f64] {
        &self.coordinates
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    fn entity_mut(&mut self, dim: usize, tag: i32) -> Option<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|entity| entity.dim == dim && entity.tag == tag)
    }

    fn physical_group_mut(&mut self, dim: usize, tag: i32) -> Option<&mut PhysicalGroup> {
        self.physical_groups
            .iter_mut()
            .find(|group| group.dim == dim && group.tag == tag)
    }

    /// Expresses a converted mesh as generator output.
    ///
    /// Nodes receive the ids `1..=n` in index order, coordinates are padded with zeros to three
    /// components, and all cells are placed in a single entity `(tdim, 1)` in Gmsh local node
    /// order. No physical groups are created.
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let points = mesh.points();
        let mut raw = RawMesh::new();
        for i in 0..mesh.num_nodes() {
            let mut coords = [0.0; 3];
            for (j, coord) in coords.iter_mut().enumerate().take(points.ncols()) {
                *coord = points[(i, j)];
            }
            raw.add_node(i as NodeId + 1, coords);
        }

        let cell_type = mesh.cell_type();
        let inverse = cell_type.inverse_permutation();
        let code = cell_type.gmsh().code;
        let block = ElementBlock::from_elements(
            code,
            mesh.cells().rows().map(|row| {
                inverse
                    .iter()
                    .map(|&local| row[local] as NodeId + 1)
                    .collect::<Vec<_>>()
            }),
        );
        raw.add_element_block(cell_type.dim(), 1, block);
        raw
    }
}

impl MeshModel for RawMesh {
    fn nodes(&self) -> (&[NodeId], &[f64]) {
        (&self.node_ids, &self.coordinates)
    }

    fn element_blocks(&self, dim: usize) -> Vec<&ElementBlock> {
        self.entities
            .iter()
            .filter(|entity| entity.dim == dim)
            .flat_map(|entity| &entity.blocks)
            .collect()
    }

    fn physical_groups(&self) -> &[PhysicalGroup] {
        &self.physical_groups
    }

    fn entity_element_blocks(&self, dim: usize, tag: i32) -> Option<&[ElementBlock]> {
        self.entities
            .iter()
            .find(|entity| entity.dim == dim && entity.tag == tag)
            .map(|entity| entity.blocks.as_slice())
    }
}
