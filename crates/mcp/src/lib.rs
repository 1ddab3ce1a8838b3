// Reference MCP-style tool server
// Emulates a security-log search backend with canned results so the client
// and harvester can be exercised without a live Splunk deployment.

pub mod fixtures;
pub mod intent;
pub mod server;
pub mod tools;

pub use server::ReferenceServer;
