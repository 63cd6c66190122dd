mod auth_tests;
mod listings_tests;
mod wizard_flow_tests;
