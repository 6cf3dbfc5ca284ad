//! Normalization engine for raw marketplace order payloads.
//!
//! Takes an already-fetched, arbitrarily-shaped JSON payload and produces
//! canonical [`mpdb_core::Purchase`] records with deterministic dedup
//! identifiers. The same logical field (price, title, seller, date) shows
//! up under dozens of key names and nesting depths depending on source and
//! API vintage; every lookup here is an ordered list of candidate paths,
//! and a malformed entry never aborts the rest of the batch.
//!
//! Fetching payloads over the network, persisting the canonical records,
//! and rendering them are external collaborators — this crate performs no
//! I/O.

pub mod error;
pub mod field;
pub mod identifier;
pub mod items;
pub mod mapper;
pub mod money;
pub mod path;

pub use error::MapError;
pub use field::{CompiledField, FieldSpec};
pub use identifier::generate_identifier;
pub use items::LineItemExtractor;
pub use mapper::{MapSummary, OrderMapper};
pub use money::normalize_money;
pub use path::{resolve_path, PathExpr};
