pub mod ingest_file;

pub use ingest_file::{IngestFileCommand, IngestFileError, IngestFileResponse};
