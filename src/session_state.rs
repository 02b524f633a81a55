use actix_session::{Session, SessionExt, SessionGetError, SessionInsertError};
use actix_web::{dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform}, error::ErrorForbidden, FromRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::Instrument;
use uuid::Uuid;

pub struct TypedSession(pub Session);

impl TypedSession {
    const USER_ID_KEY: &'static str = "user_id";
    const IS_ADMIN_KEY: &'static str = "is_admin";
    const OAUTH_STATE_KEY: &'static str = "oauth_state";

    pub fn get_user_id(&self) -> Result<Option<Uuid>, SessionGetError>{
        self.0.get(Self::USER_ID_KEY)
    }

    pub fn insert_user_id(&self, user_id: Uuid) -> Result<(), SessionInsertError>{
        self.0.insert(Self::USER_ID_KEY, user_id)
    }

    pub fn is_admin(&self) -> Result<bool, SessionGetError>{
        Ok(self.0.get::<bool>(Self::IS_ADMIN_KEY)?.unwrap_or(false))
    }

    pub fn insert_is_admin(&self, is_admin: bool) -> Result<(), SessionInsertError>{
        self.0.insert(Self::IS_ADMIN_KEY, is_admin)
    }

    pub fn get_oauth_state(&self) -> Result<Option<String>, SessionGetError>{
        self.0.get(Self::OAUTH_STATE_KEY)
    }

    pub fn insert_oauth_state(&self, state: &str) -> Result<(), SessionInsertError>{
        self.0.insert(Self::OAUTH_STATE_KEY, state)
    }

    pub fn renew(&self){
        self.0.renew();
    }

    pub fn purge(&self){
        self.0.purge();
    }
}

impl FromRequest for TypedSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let session = req.get_session();
        ready(Ok(TypedSession(session)))
    }
}

pub struct SessionMiddlewareFactory;

impl<S> Transform<S, ServiceRequest> for SessionMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RouteSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RouteSessionMiddleware{service}))
    }
}

pub struct RouteSessionMiddleware<S>{
    service: S
}

impl<S> Service<ServiceRequest> for RouteSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static
{
        type Error = actix_web::Error;
        type Response = S::Response;
        type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

        forward_ready!(service);

        #[tracing::instrument(
            "Checking if user is authenticated to access service",
            skip(self, req)
        )]
        fn call(&self, req: ServiceRequest) -> Self::Future {
            let session = TypedSession(req.get_session());
            let user_id_option = session.get_user_id().unwrap_or(None);

            let current_span = tracing::Span::current();

            if user_id_option.is_none(){
                return Box::pin(ready(
                    Err(ErrorForbidden("Not logged in"))
                ).instrument(current_span))
            }


            let fut = self.service.call(req);

            Box::pin(async move {
                let res = fut.await?;
                Ok(res)
            }
            .instrument(current_span))
        }
}
