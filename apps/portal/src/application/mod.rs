pub mod app_error;
pub mod calendar;
pub mod ports;
pub mod state;
pub mod use_cases;
pub mod validators;
