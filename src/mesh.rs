use crate::cell::CellType;
use crate::connectivity::ConnectivityTable;
use crate::error::ConversionError;
use crate::tagging::{EntityMarker, MeshValueCollection};
use mshconv_nested_vec::NestedVec;
use nalgebra::DMatrix;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Index-based mesh consisting of cells of a single type.
///
/// Node coordinates are stored as a matrix with one row per node and one column per geometric
/// dimension. Cells are rows of node indices in target local node order.
///
/// A mesh is immutable once constructed. Derived connectivity (node to cell incidence) is
/// computed on first use and cached.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "MeshData")]
pub struct Mesh {
    points: DMatrix<f64>,
    cell_type: CellType,
    cells: ConnectivityTable,
    #[serde(skip)]
    node_cells: OnceCell<NestedVec<usize>>,
}

/// Serialized form of a [`Mesh`], validated on deserialization.
#[derive(Deserialize)]
struct MeshData {
    points: DMatrix<f64>,
    cell_type: CellType,
    cells: ConnectivityTable,
}

impl TryFrom<MeshData> for Mesh {
    type Error = ConversionError;

    fn try_from(data: MeshData) -> Result<Self, Self::Error> {
        Self::from_points_and_cells(data.points, data.cell_type, data.cells)
    }
}

impl PartialEq for Mesh {
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && self.cell_type == other.cell_type && self.cells == other.cells
    }
}

impl Mesh {
    /// Construct a mesh from node coordinates and cell connectivity.
    ///
    /// Fails with [`ConversionError::InvalidMesh`] if the row width of `cells` does not match the
    /// node count of `cell_type`, if a cell references a node index out of bounds, or if the
    /// coordinate matrix does not have between one and three columns.
    pub fn from_points_and_cells(
        points: DMatrix<f64>,
        cell_type: CellType,
        cells: ConnectivityTable,
    ) -> Result<Self, ConversionError> {
        if !(1..=3).contains(&points.ncols()) {
            return Err(ConversionError::InvalidMesh(format!(
                "geometric dimension must be between 1 and 3, got {}",
                points.ncols()
            )));
        }
        if cells.width() != cell_type.num_nodes() {
            return Err(ConversionError::InvalidMesh(format!(
                "cells of type {} have {} nodes, connectivity has rows of width {}",
                cell_type,
                cell_type.num_nodes(),
                cells.width()
            )));
        }
        if let Some(max_index) = cells.max_index() {
            if max_index >= points.nrows() {
                return Err(ConversionError::InvalidMesh(format!(
                    "cell references node {} but the mesh only has {} nodes",
                    max_index,
                    points.nrows()
                )));
            }
        }

        Ok(Self {
            points,
            cell_type,
            cells,
            node_cells: OnceCell::new(),
        })
    }

    pub fn points(&self) -> &DMatrix<f64> {
        &self.points
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn cells(&self) -> &ConnectivityTable {
        &self.cells
    }

    /// Topological dimension.
    pub fn tdim(&self) -> usize {
        self.cell_type.dim()
    }

    /// Geometric dimension, i.e. the number of coordinates per node.
    pub fn gdim(&self) -> usize {
        self.points.ncols()
    }

    pub fn num_nodes(&self) -> usize {
        self.points.nrows()
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// The vertex nodes of a cell, i.e. its corner nodes without higher order nodes.
    pub fn cell_vertices(&self, cell: usize) -> Option<&[usize]> {
        let num_vertices = self.cell_type.geometry().num_vertices();
        self.cells.row(cell).map(|row| &row[..num_vertices])
    }

    /// For each node, the indices of the cells containing it, in ascending order.
    pub fn node_cells(&self) -> &NestedVec<usize> {
        self.node_cells.get_or_init(|| {
            let mut counts = vec![0; self.num_nodes()];
            for &node in self.cells.as_flat() {
                counts[node] += 1;
            }
            NestedVec::from_counts(&counts, |push| {
                for (cell_index, row) in self.cells.rows().enumerate() {
                    for &node in row {
                        push(node, cell_index);
                    }
                }
            })
        })
    }

    /// Sorted vertex nodes of the sub-entity `local_entity` of dimension `dim` of a cell.
    fn sub_entity_key(&self, cell: usize, dim: usize, local_entity: usize) -> Option<Vec<usize>> {
        let row = self.cells.row(cell)?;
        let local_vertices = self
            .cell_type
            .geometry()
            .reference_entities(dim)
            .get(local_entity)?;
        let mut key: Vec<usize> = local_vertices.iter().map(|&v| row[v]).collect();
        key.sort_unstable();
        Some(key)
    }

    /// Finds facets which belong to exactly one cell, as pairs of cell index and local facet index.
    ///
    /// The result is sorted. A mesh of points has no facets.
    pub fn boundary_facets(&self) -> Vec<(usize, usize)> {
        let tdim = self.tdim();
        if tdim == 0 {
            return Vec::new();
        }
        let num_facets = self.cell_type.geometry().reference_entities(tdim - 1).len();

        // Use a BTreeMap to avoid non-determinism due to HashMap's internal randomization
        let mut facet_counts = BTreeMap::new();
        for cell in 0..self.num_cells() {
            for local_facet in 0..num_facets {
                if let Some(key) = self.sub_entity_key(cell, tdim - 1, local_facet) {
                    facet_counts
                        .entry(key)
                        .and_modify(|(_, count)| *count += 1)
                        .or_insert(((cell, local_facet), 1));
                }
            }
        }

        let mut facets: Vec<_> = facet_counts
            .into_values()
            .filter(|&(_, count)| count == 1)
            .map(|(facet, _)| facet)
            .collect();
        facets.sort_unstable();
        facets
    }

    /// Resolves every row of a collection to a sub-entity of a cell of this mesh.
    ///
    /// Rows are matched by their vertex nodes. If an entity is shared by several cells, the cell
    /// with the smallest index is reported. Fails with [`ConversionError::InvalidMesh`] if a row
    /// does not correspond to any sub-entity of the mesh.
    pub fn locate_entities(&self, collection: &MeshValueCollection) -> Result<Vec<EntityMarker>, ConversionError> {
        let dim = collection.dim();
        let tdim = self.tdim();
        if dim > tdim {
            return Err(ConversionError::InvalidGroupDimension { dim, tdim });
        }

        let geometry = self.cell_type.geometry();
        let num_local = geometry.reference_entities(dim).len();
        let row_vertices = collection.cell_type().geometry().num_vertices();
        let node_cells = self.node_cells();

        let mut markers = Vec::with_capacity(collection.len());
        for (row, &value) in collection.cells().rows().zip(collection.values()) {
            let mut key = row[..row_vertices].to_vec();
            key.sort_unstable();

            let candidates = key
                .first()
                .and_then(|&node| node_cells.get(node))
                .unwrap_or(&[]);
            let marker = candidates
                .iter()
                .flat_map(|&cell| (0..num_local).map(move |local| (cell, local)))
                .find(|&(cell, local)| self.sub_entity_key(cell, dim, local).as_ref() == Some(&key))
                .map(|(cell, local_entity)| EntityMarker {
                    cell,
                    local_entity,
                    value,
                })
                .ok_or_else(|| {
                    ConversionError::InvalidMesh(format!(
                        "entity with nodes {:?} of collection ({}, {}) is not part of the mesh",
                        row,
                        dim,
                        collection.tag()
                    ))
                })?;
            markers.push(marker);
        }

        Ok(markers)
    }
}
