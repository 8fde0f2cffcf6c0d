//! AST Compatibility Layer - Common Types and Utilities
//!
//! This crate contains the host front end services shared by the AST model,
//! the normalization layer and the driver: source locations, the source
//! manager, language options and integer values.

pub mod apsint;
pub mod error;
pub mod lang_options;
pub mod legacy;
pub mod source_loc;
pub mod source_manager;

pub use apsint::ApsInt;
pub use error::CompatError;
pub use lang_options::{LangOptions, LangStandard};
pub use source_loc::{CharSourceRange, PresumedLoc, SourceLocation, SourceRange};
pub use source_manager::{ExpansionInfo, FileId, FileInfo, SLocEntry, SLocEntryKind, SourceManager};
