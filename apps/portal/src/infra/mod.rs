pub mod badge_refresher;
pub mod config;
pub mod setup;
