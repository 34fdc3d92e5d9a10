//! Conversion of Gmsh mesh generator output into meshes with a canonical local node ordering,
//! together with the tagged entity collections defined by Gmsh physical groups.
//!
//! The entry point is [`convert`], which takes generator output through the [`MeshModel`]
//! interface. [`io::msh`] reads generator output from MSH files and [`io::vtk`] exports the
//! result for visualization.
pub mod cell;
pub mod compact;
pub mod connectivity;
pub mod convert;
pub mod error;
pub mod io;
pub mod mesh;
pub mod procedural;
pub mod prune;
pub mod raw;
pub mod tagging;

#[cfg(feature = "proptest")]
pub mod proptest;

pub use convert::{convert, ConvertOptions};
pub use error::ConversionError;
pub use mesh::Mesh;
pub use raw::{MeshModel, RawMesh};
pub use tagging::{MeshValueCollection, MeshValueCollections};

pub extern crate mshconv_nested_vec as nested_vec;
pub extern crate nalgebra;
pub extern crate vtkio;
