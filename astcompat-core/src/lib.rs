//! AST Compatibility Layer - Core
//!
//! One stable API over a host AST whose accessors changed across schema
//! revisions: node locations, macro expansion ranges, containment queries,
//! removal of implicit nodes, recovery of a cast's written operand, and
//! integer constant evaluation.
//!
//! Every adapter keeps one strategy per schema era in `legacy` and `current`
//! submodules; the top-level function of each module calls the one matching
//! `schema::ACTIVE`. Strategies return identical results for the same input.

pub mod cast;
pub mod error;
pub mod eval;
pub mod implicit;
pub mod locations;
pub mod ranges;
pub mod schema;

pub use cast::{get_sub_expr_as_written, skip_implicit_temporary};
pub use error::ContractViolation;
pub use eval::evaluate_as_int;
pub use implicit::ignore_implicit;
pub use locations::{get_begin_loc, get_end_loc, is_cplusplus17, is_explicit_specified};
pub use ranges::{get_immediate_expansion_range, is_point_within};
pub use schema::{SchemaVersion, ACTIVE};
