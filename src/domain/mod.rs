//! Domain models and types.
//!
//! The domain layer provides the core vocabulary of the crate:
//!
//! - PII categories ([`EntityType`])
//! - detection spans ([`Span`], [`ResolvedSpan`])
//! - persisted token mappings ([`MappingEntry`])
//! - the error hierarchy ([`AnonymError`]) and [`Result`] alias
//!
//! All fallible operations in the outer layers return
//! [`Result<T, AnonymError>`]; the detection and anonymization pipeline uses
//! `anyhow` internally and converts at the boundary.

pub mod entity;
pub mod errors;
pub mod mapping;
pub mod result;
pub mod span;

// Re-export commonly used types for convenience
pub use entity::EntityType;
pub use errors::AnonymError;
pub use mapping::MappingEntry;
pub use result::Result;
pub use span::{ResolvedSpan, Span};
