//! Tagged collections of mesh entities built from physical groups.
use crate::cell::{gmsh_cell_type, permute_into, CellType};
use crate::compact::NodeMap;
use crate::connectivity::ConnectivityTable;
use crate::error::ConversionError;
use crate::raw::{ElementBlock, MeshModel, PhysicalGroup};
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Entities of one dimension carrying the tag of a physical group.
///
/// Each row of [`cells`](Self::cells) lists the compacted node indices of one entity in target
/// local node order, and `values()[i]` is the value attached to row `i`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MeshValueCollectionData")]
pub struct MeshValueCollection {
    dim: usize,
    tag: i32,
    name: Option<String>,
    cell_type: CellType,
    cells: ConnectivityTable,
    values: Vec<i32>,
}

#[derive(Deserialize)]
struct MeshValueCollectionData {
    dim: usize,
    tag: i32,
    name: Option<String>,
    cell_type: CellType,
    cells: ConnectivityTable,
    values: Vec<i32>,
}

impl TryFrom<MeshValueCollectionData> for MeshValueCollection {
    type Error = ConversionError;

    fn try_from(data: MeshValueCollectionData) -> Result<Self, Self::Error> {
        if data.cell_type.dim() != data.dim {
            return Err(ConversionError::InvalidMesh(format!(
                "collection ({}, {}) has cells of type {} with dimension {}",
                data.dim,
                data.tag,
                data.cell_type,
                data.cell_type.dim()
            )));
        }
        if data.cells.width() != data.cell_type.num_nodes() {
            return Err(ConversionError::InvalidMesh(format!(
                "cells of type {} have {} nodes, collection ({}, {}) has rows of width {}",
                data.cell_type,
                data.cell_type.num_nodes(),
                data.dim,
                data.tag,
                data.cells.width()
            )));
        }
        if data.values.len() != data.cells.len() {
            return Err(ConversionError::InvalidMesh(format!(
                "collection ({}, {}) has {} values for {} cells",
                data.dim,
                data.tag,
                data.values.len(),
                data.cells.len()
            )));
        }

        let MeshValueCollectionData {
            dim,
            tag,
            name,
            cell_type,
            cells,
            values,
        } = data;
        Ok(Self {
            dim,
            tag,
            name,
            cell_type,
            cells,
            values,
        })
    }
}

impl MeshValueCollection {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn tag(&self) -> i32 {
        self.tag
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn cells(&self) -> &ConnectivityTable {
        &self.cells
    }

    pub fn values(&self) -> &[i32] {
        &self.values
    }

    /// Number of tagged entities.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A tagged entity resolved against a mesh: the sub-entity `local_entity` of cell `cell`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityMarker {
    pub cell: usize,
    pub local_entity: usize,
    pub value: i32,
}

/// All collections produced by a conversion, ordered by `(dim, tag)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MeshValueCollectionsData")]
pub struct MeshValueCollections {
    collections: Vec<MeshValueCollection>,
}

#[derive(Deserialize)]
struct MeshValueCollectionsData {
    collections: Vec<MeshValueCollection>,
}

impl From<MeshValueCollectionsData> for MeshValueCollections {
    fn from(data: MeshValueCollectionsData) -> Self {
        Self::from_collections(data.collections)
    }
}

impl MeshValueCollections {
    pub fn from_collections(mut collections: Vec<MeshValueCollection>) -> Self {
        collections.sort_by_key(|collection| (collection.dim, collection.tag));
        Self { collections }
    }

    pub fn get(&self, dim: usize, tag: i32) -> Option<&MeshValueCollection> {
        self.collections
            .binary_search_by_key(&(dim, tag), |collection| (collection.dim, collection.tag))
            .ok()
            .map(|index| &self.collections[index])
    }

    /// Looks up a collection by the name of its physical group.
    pub fn get_by_name(&self, name: &str) -> Option<&MeshValueCollection> {
        self.collections
            .iter()
            .find(|collection| collection.name() == Some(name))
    }

    pub fn iter(&self) -> impl '_ + ExactSizeIterator<Item = &MeshValueCollection> {
        self.collections.iter()
    }

    /// Collections of the given dimension.
    pub fn of_dim(&self, dim: usize) -> impl '_ + Iterator<Item = &MeshValueCollection> {
        self.collections
            .iter()
            .filter(move |collection| collection.dim == dim)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn into_vec(self) -> Vec<MeshValueCollection> {
        self.collections
    }
}

/// Resolves the cell type of a block and checks that it is consistent with dimension `dim`.
///
/// Returns the cell type and the number of elements in the block.
pub(crate) fn resolve_block(block: &ElementBlock, dim: usize) -> Result<(CellType, usize), ConversionError> {
    let gmsh = gmsh_cell_type(block.cell_code)?;
    if gmsh.cell_type.dim() != dim {
        return Err(ConversionError::InvalidMesh(format!(
            "element block of type {} found among entities of dimension {}",
            gmsh.name, dim
        )));
    }
    if block.node_ids.len() % gmsh.num_nodes != 0 {
        return Err(ConversionError::InvalidMesh(format!(
            "element block of type {} has {} node ids, which is not a multiple of {}",
            gmsh.name,
            block.node_ids.len(),
            gmsh.num_nodes
        )));
    }
    Ok((gmsh.cell_type, block.node_ids.len() / gmsh.num_nodes))
}

/// Appends the elements of a block to `table`, remapped to compacted indices and reordered to
/// target local node order.
pub(crate) fn append_block(
    table: &mut ConnectivityTable,
    block: &ElementBlock,
    cell_type: CellType,
    node_map: &NodeMap,
) -> Result<(), ConversionError> {
    let perm = cell_type.permutation();
    let mut source = vec![0; perm.len()];
    let mut target = vec![0; perm.len()];
    for element in block.node_ids.chunks_exact(perm.len()) {
        node_map.remap_into(element, &mut source)?;
        permute_into(perm, &source, &mut target);
        table.push_row(&target);
    }
    Ok(())
}

/// Builds the collection for a single physical group.
///
/// Returns `None` if none of the group's entities carry elements.
pub(crate) fn collect_physical_group<M: MeshModel + ?Sized>(
    model: &M,
    group: &PhysicalGroup,
    node_map: &NodeMap,
) -> Result<Option<MeshValueCollection>, ConversionError> {
    let mixed = |entity| ConversionError::MixedTopology {
        dim: group.dim,
        tag: group.tag,
        entity,
    };

    // First pass: validate cell types and count rows
    let mut group_cell_type = None;
    let mut num_rows = 0;
    let mut entity_blocks = Vec::with_capacity(group.entities.len());
    for &entity in &group.entities {
        let blocks = model
            .entity_element_blocks(group.dim, entity)
            .ok_or_else(|| {
                ConversionError::InvalidMesh(format!(
                    "physical group ({}, {}) refers to unknown entity {}",
                    group.dim, group.tag, entity
                ))
            })?;

        for block in blocks {
            let (cell_type, num_elements) = resolve_block(block, group.dim)?;
            match group_cell_type {
                Some(existing) if existing != cell_type => return Err(mixed(entity)),
                _ => group_cell_type = Some(cell_type),
            }
            num_rows += num_elements;
        }
        entity_blocks.push(blocks);
    }

    let cell_type = match group_cell_type {
        Some(cell_type) => cell_type,
        None => {
            warn!(
                "Physical group ({}, {}) contains no elements and is skipped",
                group.dim, group.tag
            );
            return Ok(None);
        }
    };

    // Second pass: fill pre-sized buffers
    let mut cells = ConnectivityTable::with_capacity(cell_type.num_nodes(), num_rows);
    for block in entity_blocks.into_iter().flatten() {
        append_block(&mut cells, block, cell_type, node_map)?;
    }
    let values = vec![group.tag; num_rows];

    info!("Constructing collection ({}, {}) of {} cells", group.dim, group.tag, cell_type);
    info!("Number of data values: {}", values.len());

    Ok(Some(MeshValueCollection {
        dim: group.dim,
        tag: group.tag,
        name: group.name.clone(),
        cell_type,
        cells,
        values,
    }))
}
