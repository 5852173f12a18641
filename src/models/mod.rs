pub mod auth;
pub mod records;

pub use auth::*;
pub use records::*;
