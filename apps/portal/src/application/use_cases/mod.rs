pub mod analytics;
pub mod dashboard;
pub mod masajids;
pub mod questions;
pub mod session;
pub mod users;

pub use analytics::AnalyticsUseCases;
pub use dashboard::DashboardUseCases;
pub use masajids::MasajidsUseCases;
pub use questions::QuestionsUseCases;
pub use session::SessionUseCases;
pub use users::UsersUseCases;
