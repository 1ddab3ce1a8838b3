// Gleaner Core
//
// Shared building blocks for the harvester:
// - JSON-RPC 2.0 wire types used by both the client and the reference server
// - Label mapping model and validation
// - SPL export query construction

pub mod protocol;
pub mod spl;
pub mod types;

pub use types::*;
