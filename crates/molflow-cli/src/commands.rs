pub mod batch;
pub mod layout;
pub mod render;
