pub mod config;
pub mod record;
pub mod schema;

pub use config::*;
pub use record::*;
pub use schema::*;
