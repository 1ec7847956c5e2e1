use crate::error::Error;

/// Pulls the raw token out of an inbound request.
///
/// `Ok(None)` means the request carries no token at all; a token that is
/// present but malformed is an error.
pub trait RequestTokenExtractor: Send + Sync {
    fn extract(&self, req: &actix_web::HttpRequest) -> Result<Option<String>, Error>;
}

impl<F> RequestTokenExtractor for F
where
    F: Fn(&actix_web::HttpRequest) -> Result<Option<String>, Error> + Send + Sync,
{
    fn extract(&self, req: &actix_web::HttpRequest) -> Result<Option<String>, Error> {
        self(req)
    }
}

/// `Authorization: Bearer <token>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromHeader;

impl RequestTokenExtractor for FromHeader {
    fn extract(&self, req: &actix_web::HttpRequest) -> Result<Option<String>, Error> {
        let header = match req.headers().get(actix_http::header::AUTHORIZATION) {
            Some(hv) => hv
                .to_str()
                .map_err(|_| Error::InvalidAuthorizationHeader)?,
            None => return Ok(None),
        };
        if header.is_empty() {
            return Ok(None);
        }

        let parts: Vec<&str> = header.split(' ').collect();
        if parts.len() != 2 || !parts[0].eq_ignore_ascii_case("bearer") {
            return Err(Error::InvalidAuthorizationHeader);
        }

        Ok(Some(parts[1].to_owned()))
    }
}

/// Reads the token from a named cookie.
#[derive(Debug, Clone)]
pub struct FromCookie(pub String);

impl RequestTokenExtractor for FromCookie {
    fn extract(&self, req: &actix_web::HttpRequest) -> Result<Option<String>, Error> {
        Ok(req
            .cookie(&self.0)
            .map(|c| c.value().to_owned())
            .filter(|v| !v.is_empty()))
    }
}
