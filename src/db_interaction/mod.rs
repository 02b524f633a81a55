pub mod app_config;
pub mod companies;
pub mod conflicts;
pub mod finance;
pub mod food;
pub mod orders;
pub mod pizza;
pub mod users;

pub use app_config::*;
pub use companies::*;
pub use conflicts::*;
pub use finance::*;
pub use food::*;
pub use orders::*;
pub use pizza::*;
pub use users::*;
