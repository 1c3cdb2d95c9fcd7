pub mod details;
pub mod overview;
pub mod status_bar;
pub mod tree;
