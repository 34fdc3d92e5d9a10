//! Conversion of generator output into a [`Mesh`] and its [`MeshValueCollections`].
use crate::cell::CellType;
use crate::compact::compact_nodes;
use crate::connectivity::ConnectivityTable;
use crate::error::ConversionError;
use crate::mesh::Mesh;
use crate::prune::{prune_coordinates, DEFAULT_PRUNE_TOLERANCE};
use crate::raw::{ElementBlock, MeshModel};
use crate::tagging::{append_block, collect_physical_group, resolve_block, MeshValueCollections};
use itertools::Itertools;
use log::info;
use serde::{Deserialize, Serialize};

/// Options controlling a conversion.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Remove the y-component of all coordinates. Used to embed flat geometries in lower dimension.
    pub prune_y: bool,
    /// Remove the z-component of all coordinates. Used to embed flat geometries in lower dimension.
    pub prune_z: bool,
    /// Absolute tolerance below which a pruned component counts as zero.
    pub tolerance: f64,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            prune_y: false,
            prune_z: false,
            tolerance: DEFAULT_PRUNE_TOLERANCE,
        }
    }
}

impl ConvertOptions {
    pub fn with_prune_y(self, prune_y: bool) -> Self {
        Self { prune_y, ..self }
    }

    pub fn with_prune_z(self, prune_z: bool) -> Self {
        Self { prune_z, ..self }
    }

    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance, ..self }
    }
}

/// Converts generator output into a mesh of topological dimension `tdim` and one
/// [`MeshValueCollection`](crate::tagging::MeshValueCollection) per physical group.
///
/// The cells of dimension `tdim` must all have the same cell type. Nodes not referenced by these
/// cells are discarded and the remaining nodes are renumbered in ascending id order. Physical
/// groups are then converted using the same node numbering.
///
/// Any failure aborts the whole conversion.
pub fn convert<M: MeshModel + ?Sized>(
    model: &M,
    tdim: usize,
    options: &ConvertOptions,
) -> Result<(Mesh, MeshValueCollections), ConversionError> {
    let (cell_type, blocks) = top_dimension_blocks(model, tdim)?;
    info!("Processing mesh of gmsh cell name \"{}\"", cell_type);

    let (node_ids, coordinates) = model.nodes();
    let referenced = blocks.iter().flat_map(|block| block.node_ids.iter().copied());
    let (node_map, points) = compact_nodes(node_ids, coordinates, referenced)?;
    let points = prune_coordinates(points, options.prune_y, options.prune_z, options.tolerance)?;

    info!("Mesh will be permuted with {:?}", cell_type.permutation());
    let num_cells: usize = blocks
        .iter()
        .map(|block| block.node_ids.len() / cell_type.num_nodes())
        .sum();
    let mut cells = ConnectivityTable::with_capacity(cell_type.num_nodes(), num_cells);
    for block in &blocks {
        append_block(&mut cells, block, cell_type, &node_map)?;
    }

    info!("Constructing mesh for tdim: {}, gdim: {}", tdim, points.ncols());
    info!("Number of elements: {}", cells.len());
    let mesh = Mesh::from_points_and_cells(points, cell_type, cells)?;

    let groups = model.physical_groups();
    for group in groups {
        if group.dim > tdim {
            return Err(ConversionError::InvalidGroupDimension { dim: group.dim, tdim });
        }
        if cell_type.order() > 1 && group.dim != tdim {
            return Err(ConversionError::UnsupportedSubmanifold {
                dim: group.dim,
                tag: group.tag,
                order: cell_type.order(),
            });
        }
    }

    let mut collections = Vec::with_capacity(groups.len());
    for (dim, dim_groups) in &groups.iter().sorted_by_key(|group| group.dim).group_by(|group| group.dim) {
        info!("Collecting physical groups of dimension {}", dim);
        for group in dim_groups {
            if let Some(collection) = collect_physical_group(model, group, &node_map)? {
                collections.push(collection);
            }
        }
    }

    Ok((mesh, MeshValueCollections::from_collections(collections)))
}

/// Gathers the element blocks of dimension `tdim` and checks that they share a cell type.
fn top_dimension_blocks<M: MeshModel + ?Sized>(
    model: &M,
    tdim: usize,
) -> Result<(CellType, Vec<&ElementBlock>), ConversionError> {
    let blocks = model.element_blocks(tdim);

    let codes: Vec<i32> = blocks
        .iter()
        .map(|block| block.cell_code)
        .sorted()
        .dedup()
        .collect();
    if codes.len() > 1 {
        return Err(ConversionError::UnsupportedTopology { dim: tdim, codes });
    }

    let mut cell_type = None;
    for block in &blocks {
        let (block_cell_type, _) = resolve_block(block, tdim)?;
        cell_type = Some(block_cell_type);
    }

    let cell_type = cell_type
        .ok_or_else(|| ConversionError::InvalidMesh(format!("mesh has no cells of dimension {}", tdim)))?;
    Ok((cell_type, blocks))
}
