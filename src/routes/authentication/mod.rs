pub mod callback;
pub mod login;
pub mod logout;

pub use callback::oauth_callback;
pub use login::login;
pub use logout::logout;
