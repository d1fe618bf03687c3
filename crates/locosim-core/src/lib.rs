pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod objects;
pub mod orientation;
pub mod trig;
pub mod types;
