//! Agent run domain: the per-request control loop state

pub mod entities;
pub mod validation;
pub mod value_objects;
