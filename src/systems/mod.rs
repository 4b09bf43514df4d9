mod animation;
mod character;
mod collision;

pub use animation::animation_system;
pub use character::{command_walk, contact_interrupt_system, set_walking_allowed, walk_system};
pub use collision::collision_system;
