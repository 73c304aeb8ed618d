//! Round summary domain

pub mod fallback;
pub mod value_objects;
