// Public modules
pub mod checker;
pub mod defaults;
pub mod error;
pub mod messages;
pub mod model;
pub mod parse;
pub mod paths;
pub mod report;
pub mod spdx2;
pub mod spdx3;
pub mod version;

// Re-export common types for convenience
pub use checker::{Compliance, SbomChecker, SbomSpec};
pub use error::{Error, ErrorCode, Result};
