//! Domain model module declarations.

pub mod focus;
pub mod link;
