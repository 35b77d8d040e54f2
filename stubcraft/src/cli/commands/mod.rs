//! CLI command implementations

pub mod create;
pub mod stubs;

pub use create::CreateCommand;
pub use stubs::StubsCommand;
