//! Reading generator output from files and exporting converted meshes.
pub mod msh;
pub mod vtk;
