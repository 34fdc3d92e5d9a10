//! Export of meshes and tagged collections to VTK.
use crate::cell::{CellType, GeometricType};
use crate::connectivity::ConnectivityTable;
use crate::mesh::Mesh;
use crate::tagging::MeshValueCollection;
use eyre::{eyre, Context};
use nalgebra::DMatrix;
use std::path::Path;
use vtkio::model::CellType as VtkCellType;
use vtkio::model::{ByteOrder, Cells, DataSet, Piece, UnstructuredGridPiece, Version, VertexNumbers, Vtk};

/// VTK cell type and the gather permutation from Gmsh to VTK local node order.
///
/// The permutation may be shorter than the Gmsh node count, in which case trailing nodes are
/// dropped.
fn vtk_cell(cell_type: CellType) -> (VtkCellType, &'static [usize]) {
    use GeometricType::*;
    match (cell_type.geometry(), cell_type.order()) {
        (Point, _) => (VtkCellType::Vertex, &[0]),
        (Interval, 1) => (VtkCellType::Line, &[0, 1]),
        (Interval, _) => (VtkCellType::QuadraticEdge, &[0, 1, 2]),
        (Triangle, 1) => (VtkCellType::Triangle, &[0, 1, 2]),
        (Triangle, _) => (VtkCellType::QuadraticTriangle, &[0, 1, 2, 3, 4, 5]),
        (Quadrilateral, 1) => (VtkCellType::Quad, &[0, 1, 2, 3]),
        (Quadrilateral, _) => (VtkCellType::BiquadraticQuad, &[0, 1, 2, 3, 4, 5, 6, 7, 8]),
        (Tetrahedron, 1) => (VtkCellType::Tetra, &[0, 1, 2, 3]),
        // Gmsh and ParaView disagree on the last two edge nodes of quadratic tets
        (Tetrahedron, _) => (VtkCellType::QuadraticTetra, &[0, 1, 2, 3, 4, 5, 6, 7, 9, 8]),
        (Hexahedron, 1) => (VtkCellType::Hexahedron, &[0, 1, 2, 3, 4, 5, 6, 7]),
        // There is no tri-quadratic Hex in legacy VTK, so use Hex20 instead
        (Hexahedron, _) => (
            VtkCellType::QuadraticHexahedron,
            &[0, 1, 2, 3, 4, 5, 6, 7, 8, 11, 13, 9, 16, 18, 19, 17, 10, 12, 14, 15],
        ),
    }
}

/// Builds VTK unstructured grids from a mesh, or from a tagged collection on the nodes of a mesh.
pub struct MeshDataSetBuilder<'a> {
    points: &'a DMatrix<f64>,
    cell_type: CellType,
    cells: &'a ConnectivityTable,

    // Only used for exporting directly to file
    title: Option<String>,
}

impl<'a> MeshDataSetBuilder<'a> {
    pub fn from_mesh(mesh: &'a Mesh) -> Self {
        Self {
            points: mesh.points(),
            cell_type: mesh.cell_type(),
            cells: mesh.cells(),
            title: None,
        }
    }

    /// Exports the entities of a collection as cells, using the nodes of the mesh it belongs to.
    pub fn from_collection(mesh: &'a Mesh, collection: &'a MeshValueCollection) -> Self {
        Self {
            points: mesh.points(),
            cell_type: collection.cell_type(),
            cells: collection.cells(),
            title: None,
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..self
        }
    }

    pub fn try_build(&self) -> eyre::Result<DataSet> {
        let gdim = self.points.ncols();
        let mut points = Vec::with_capacity(3 * self.points.nrows());
        for row in self.points.row_iter() {
            points.extend(row.iter().copied());
            points.extend(std::iter::repeat(0.0).take(3 - gdim.min(3)));
        }

        // Cells are stored in target order, which is first mapped back to Gmsh order
        let to_gmsh = self.cell_type.inverse_permutation();
        let (vtk_type, to_vtk) = vtk_cell(self.cell_type);
        let num_cell_nodes = u32::try_from(to_vtk.len()).wrap_err("cell node count does not fit in u32")?;

        // Vertices is laid out as follows: N, i_1, i_2, ... i_N,
        // so for e.g. quads this becomes 4 followed by the four indices making up the quad
        let mut vertices = Vec::with_capacity(self.cells.len() * (to_vtk.len() + 1));
        for row in self.cells.rows() {
            vertices.push(num_cell_nodes);
            for &gmsh_local in to_vtk {
                let index = row[to_gmsh[gmsh_local]];
                vertices.push(u32::try_from(index).wrap_err("node index does not fit in u32")?);
            }
        }

        let piece = UnstructuredGridPiece {
            points: points.into(),
            cells: Cells {
                cell_verts: VertexNumbers::Legacy {
                    num_cells: u32::try_from(self.cells.len()).wrap_err("cell count does not fit in u32")?,
                    vertices,
                },
                types: vec![vtk_type; self.cells.len()],
            },
            data: Default::default(),
        };

        Ok(DataSet::UnstructuredGrid {
            meta: None,
            pieces: vec![Piece::Inline(Box::new(piece))],
        })
    }

    /// Convenience function for directly exporting the dataset to a file.
    pub fn try_export(&self, filename: impl AsRef<Path>) -> eyre::Result<()> {
        let filepath = filename.as_ref();
        let fallback_title = filepath
            .file_stem()
            .map(|os_str| os_str.to_string_lossy().to_string())
            .unwrap_or_else(|| "untitled".to_string());
        let dataset = self.try_build()?;
        Vtk {
            version: Version { major: 4, minor: 1 },
            // If we don't have a title then just make the filepath the title
            title: self.title.clone().unwrap_or(fallback_title),
            byte_order: ByteOrder::BigEndian,
            data: dataset,
            file_path: None,
        }
        .export(filepath)
        .map_err(|e| eyre!("failed to export VTK file {}: {}", filepath.display(), e))
    }
}
