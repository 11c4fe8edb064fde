//! Services composed from repositories.
//!
//! - [`ProjectReader`] -- listing and detail views with graceful degradation.
//! - [`ProjectWriter`] -- transactional create/replace/delete of a project and
//!   its child collections.
//!
//! Both hold a pool handle handed to them at construction.

pub mod project_reader;
pub mod project_writer;

pub use project_reader::ProjectReader;
pub use project_writer::{ChildWriteReport, ProjectWriter, WriteReport};
