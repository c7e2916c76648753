pub mod entity;

pub use entity::{Entity, UNKNOWN_LABEL};
