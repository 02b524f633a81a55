pub mod get;
pub mod import;
pub mod post;

pub use get::{available_foods_today, list_all_foods};
pub use import::{import_koziolek_menu, import_tomas_menu};
pub use post::add_food;
