//! Output formatting for finished deliberations

pub mod console;
