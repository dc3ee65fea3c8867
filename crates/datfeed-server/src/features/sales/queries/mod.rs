pub mod list;
pub mod search;

pub use list::{list_paged, list_recent};
pub use search::search;
