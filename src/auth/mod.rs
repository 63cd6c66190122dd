pub mod sessions;
pub mod token;

pub use sessions::{create_session, load_owner_from_session, Owner};
