//! Infrastructure adapters - concrete implementations of the outbound ports
//!
//! Real deployments adapt the host's own collaborators; the adapters here
//! back tests, demos, and headless use.

pub mod dice;
pub mod memory;
pub mod testing;

pub use dice::RngRollEvaluator;
pub use memory::InMemoryHost;
pub use testing::ScriptedRollEvaluator;
