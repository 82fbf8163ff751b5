//! Query composition
//!
//! Turns the declarative layers of a view (sources, search, group selection)
//! into a single [`Expr`]. The expression is backend-neutral: the store compiles
//! it into an index-assisted scan in `db::query`.

pub mod builder;
pub mod error;
pub mod expr;
pub mod sources;

pub use builder::QueryBuilder;
pub use error::QueryError;
pub use expr::Expr;
pub use sources::{SourcePath, SourceSegment, sources_expr};
