pub mod authentication;
pub mod companies;
pub mod conflicts;
pub mod finance;
pub mod food;
pub mod health_check;
pub mod info;
pub mod ordering;
pub mod orders;
pub mod pizza;
pub mod reminders;
pub mod users;

pub use health_check::health_check;
pub use info::info;
