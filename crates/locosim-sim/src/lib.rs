pub mod effects;
pub mod entity;
pub mod pool;
pub mod simulation;
pub mod spatial;
pub mod vehicle;

mod rng;

#[cfg(test)]
mod test_harness;

pub use simulation::Simulation;
