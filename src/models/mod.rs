//! Data types shared by the converter: the parsed source tree, geometry
//! values and the generated IWB document model.

pub mod document;
pub mod elements;
pub mod geometry;
pub mod source_tree;
pub mod text;
