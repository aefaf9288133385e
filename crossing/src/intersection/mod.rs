//! Admission control for a four-way intersection.
//!
//! Vehicles are admitted by approach lane in weighted round-robin order
//! (`scheduler`), and paths into each exit are shared only between vehicles
//! from the same approach (`paths`). `admission` combines the two checks,
//! and `agent` runs one vehicle on its own thread against them.

pub mod route;
pub mod scheduler;
pub mod paths;
pub mod admission;
pub mod agent;
