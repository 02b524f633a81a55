pub mod extractors;
pub mod oauth;

pub use extractors::CurrentUser;
pub use oauth::{OAuthClient, ProviderIdentity};
