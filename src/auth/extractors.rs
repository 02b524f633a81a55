use actix_session::SessionExt;
use actix_web::{error::ErrorUnauthorized, FromRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::session_state::TypedSession;

// The logged-in caller, pulled out of the cookie session
pub struct CurrentUser{
    pub user_id: Uuid,
    pub is_admin: bool
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let session = TypedSession(req.get_session());

        match session.get_user_id() {
            Ok(Some(user_id)) => {
                let is_admin = session.is_admin().unwrap_or(false);
                ready(Ok(CurrentUser{ user_id, is_admin }))
            },
            _ => ready(Err(ErrorUnauthorized("Not logged in")))
        }
    }
}
