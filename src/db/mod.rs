pub mod connection;
pub mod properties;
pub mod users;
pub mod wizard_sessions;

pub use connection::{init_db, Database};
