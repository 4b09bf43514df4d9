pub mod input;
pub mod time;
pub mod window;
