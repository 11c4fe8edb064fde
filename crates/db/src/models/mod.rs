//! Domain model structs and DTOs.
//!
//! - `FromRow` + `Serialize` structs match database rows.
//! - `Deserialize` payloads are the loose wire shape; they are validated into
//!   write structs before reaching a repository.

pub mod child_item;
pub mod project;
