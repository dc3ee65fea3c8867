pub mod commands;
pub mod routes;

pub use commands::{IngestFileCommand, IngestFileError, IngestFileResponse};

pub use routes::uploads_routes;
