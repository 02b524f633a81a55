pub mod get;
pub mod post;

pub use get::list_companies;
pub use post::add_company;
