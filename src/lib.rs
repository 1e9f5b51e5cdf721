//! Filtering and ranking engine for a season of football player statistics.
//!
//! The dashboard binary is a thin egui layer over [`data`]; everything it
//! shows is computed here.

pub mod data;
pub mod settings;
