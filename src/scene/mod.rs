pub mod arena;
pub mod prefabs;
