//! Historical crisis stress testing
//!
//! - `catalog` - the table of crisis profiles
//! - `engine` - deterministic impact and recovery projection
//! - `behavior` - reaction bands and client messaging

mod behavior;
mod catalog;
mod engine;

pub use behavior::BehavioralAdvisor;
pub use catalog::CrisisCatalog;
pub use engine::stress_test;
