use std::sync::Arc;

#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    #[error("should have a JSON content type for JWKS endpoint")]
    InvalidContentType,

    #[error("no keys found in JWKS response")]
    NoKeyFound,

    #[error("unable to decode JWKS response")]
    DecodeError(#[source] Arc<serde_json::Error>),

    #[error("JWKS request error")]
    NetworkError(#[source] Arc<reqwest::Error>),

    #[error("missing key kid={0}")]
    KeyNotFound(String),

    #[error("token has no JWT headers")]
    NoJwtHeaders,

    #[error("algorithm is invalid")]
    InvalidAlgorithm,

    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("required authorization token not found")]
    MissingToken,

    #[error("authorization header format must be Bearer {{token}}")]
    InvalidAuthorizationHeader,
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::DecodeError(Arc::new(e))
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::NetworkError(Arc::new(e))
    }
}

impl Error {
    pub fn error_string(&self) -> &str {
        match *self {
            Self::InvalidContentType => "invalid-content-type",
            Self::NoKeyFound => "no-key-found",
            Self::DecodeError(_) => "decode",
            Self::NetworkError(_) => "network",
            Self::KeyNotFound(_) => "key-not-found",
            Self::NoJwtHeaders => "no-jwt-headers",
            Self::InvalidAlgorithm => "invalid-algorithm",
            Self::InvalidKeyMaterial(_) => "invalid-key-material",
            Self::InvalidToken(_) => "invalid-token",
            Self::MissingToken => "missing-token",
            Self::InvalidAuthorizationHeader => "invalid-authorization-header",
        }
    }
}

impl actix_web::ResponseError for Error {
    fn status_code(&self) -> actix_http::StatusCode {
        match *self {
            Self::InvalidContentType => actix_http::StatusCode::BAD_GATEWAY,
            Self::NoKeyFound => actix_http::StatusCode::BAD_GATEWAY,
            Self::DecodeError(_) => actix_http::StatusCode::BAD_GATEWAY,
            Self::NetworkError(_) => actix_http::StatusCode::BAD_GATEWAY,
            Self::KeyNotFound(_) => actix_http::StatusCode::NOT_FOUND,
            Self::NoJwtHeaders => actix_http::StatusCode::BAD_REQUEST,
            Self::InvalidToken(_) => actix_http::StatusCode::BAD_REQUEST,
            Self::MissingToken => actix_http::StatusCode::UNAUTHORIZED,
            Self::InvalidAuthorizationHeader => actix_http::StatusCode::UNAUTHORIZED,
            _ => actix_http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .insert_header(("x-jwk-client-error", self.error_string()))
            .body(format!("Error: {}", self.error_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::KeyNotFound("abc".to_owned()).to_string(),
            "missing key kid=abc"
        );
        assert_eq!(
            Error::InvalidAuthorizationHeader.to_string(),
            "authorization header format must be Bearer {token}"
        );
    }

    #[test]
    fn test_decode_error_keeps_source() {
        use std::error::Error as _;

        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::DecodeError(_)));
        assert_eq!(err.source().is_some(), true);

        let cloned = err.clone();
        assert_eq!(cloned.to_string(), err.to_string());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::KeyNotFound("x".to_owned()).status_code(),
            actix_http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::NoKeyFound.status_code(),
            actix_http::StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            Error::MissingToken.status_code(),
            actix_http::StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Error::InvalidAlgorithm.status_code(),
            actix_http::StatusCode::INTERNAL_SERVER_ERROR
        );

        let resp = Error::NoJwtHeaders.error_response();
        assert_eq!(resp.status(), actix_http::StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers()
                .get("x-jwk-client-error")
                .unwrap()
                .to_str()
                .unwrap(),
            "no-jwt-headers"
        );
    }
}
