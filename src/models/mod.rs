//! Domain model module declarations.

pub mod credential;
pub mod memory;
pub mod task;
