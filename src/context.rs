use actix_web::http::header;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use std::future::{ready, Ready};

use crate::error::Error;

// The Authorization header value is taken verbatim as the user id. There is
// no verification behind it; the token only has to be present and non-empty.
#[derive(Debug, Clone)]
pub struct UserInfo {
    pub id: String,
}

impl FromRequest for UserInfo {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty());
        match token {
            Some(t) => ready(Ok(UserInfo { id: t.to_owned() })),
            None => ready(Err(Error::Unauthorized)),
        }
    }
}
