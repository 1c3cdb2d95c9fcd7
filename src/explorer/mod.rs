//! File-browser tree engine: builder, renderer and interaction controller.

pub mod controller;
pub mod format;
pub mod render;
pub mod tree;
