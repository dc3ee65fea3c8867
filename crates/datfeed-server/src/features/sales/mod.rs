pub mod commands;
pub mod queries;
pub mod routes;

pub use commands::{ForwardPayload, ForwardSalesCommand, ForwardSalesResponse};

pub use routes::sales_routes;
