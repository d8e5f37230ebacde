//! Database repositories for video metadata
//!
//! [`VideoRepository`] is the boundary the upload pipelines and handlers talk to.
//! [`PgVideoRepository`] backs it with PostgreSQL; [`InMemoryVideoRepository`]
//! keeps records in process memory for tests and local tooling.

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoRepository;
pub use video::{PgVideoRepository, VideoRepository};
