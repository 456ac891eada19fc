pub mod errors;
pub mod models;
pub mod page;

pub use errors::*;
pub use models::*;
pub use page::*;
