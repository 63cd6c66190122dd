pub mod error;
pub mod home;
pub mod my_listings;
pub mod review;
pub mod type_selection;
pub mod wizard_step;

pub use error::error_page;
pub use home::home_page;
pub use my_listings::{my_listings_page, MyListingsVm};
pub use review::review_page;
pub use type_selection::type_selection_page;
pub use wizard_step::{wizard_step_page, StepPageVm};
