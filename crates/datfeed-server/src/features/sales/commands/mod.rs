pub mod forward;

pub use forward::{ForwardPayload, ForwardSalesCommand, ForwardSalesResponse};
