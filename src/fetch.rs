use crate::error::Error;
use crate::jwk::JwkSet;

const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["application/json", "application/jwk-set+json"];

pub(crate) fn is_jwk_set_content_type(content_type: &str) -> bool {
    ACCEPTED_CONTENT_TYPES
        .iter()
        .any(|prefix| content_type.starts_with(prefix))
}

/// Downloads and decodes the key set published at `uri`.
///
/// Transport errors are returned as is. The response must declare a JSON
/// content type and carry at least one key; the status code is not looked at.
pub async fn download_keys(http: &reqwest::Client, uri: &str) -> Result<JwkSet, Error> {
    log::debug!("action=download-keys uri={}", uri);

    let resp = http.get(uri).send().await?;

    let content_type = resp
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|hv| hv.to_str().ok())
        .unwrap_or("");
    if !is_jwk_set_content_type(content_type) {
        log::warn!(
            "action=download-keys-error uri={} status={} content-type={:?}",
            uri,
            resp.status(),
            content_type
        );
        return Err(Error::InvalidContentType);
    }

    let body = resp.bytes().await?;
    let set: JwkSet = serde_json::from_slice(&body)?;

    if set.keys.is_empty() {
        return Err(Error::NoKeyFound);
    }

    log::info!(
        "action=download-keys-done uri={} keys={}",
        uri,
        set.keys.len()
    );
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn jwks_expectation(
        responder: impl httptest::responders::Responder + 'static,
    ) -> httptest::Expectation {
        httptest::Expectation::matching(httptest::matchers::request::method_path(
            "GET",
            "/.well-known/jwks.json",
        ))
        .times(1)
        .respond_with(responder)
    }

    #[test]
    fn test_content_types() {
        assert_eq!(is_jwk_set_content_type("application/json"), true);
        assert_eq!(
            is_jwk_set_content_type("application/json; charset=utf-8"),
            true
        );
        assert_eq!(is_jwk_set_content_type("application/jwk-set+json"), true);
        assert_eq!(is_jwk_set_content_type("text/plain"), false);
        assert_eq!(is_jwk_set_content_type("Application/JSON"), false);
        assert_eq!(is_jwk_set_content_type(""), false);
    }

    #[tokio::test]
    async fn test_download_keys() {
        init();
        let server = httptest::Server::run();
        server.expect(jwks_expectation(
            httptest::responders::status_code(200)
                .append_header("content-type", "application/jwk-set+json")
                .body(r#"{"keys":[{"kid":"abc","kty":"RSA","n":"AQAB","e":"AQAB"},{"kid":"def","kty":"EC"}]}"#),
        ));

        let set = download_keys(
            &reqwest::Client::new(),
            &server.url_str("/.well-known/jwks.json"),
        )
        .await
        .unwrap();

        assert_eq!(set.keys.len(), 2);
        assert_eq!(set.keys[0].kid, "abc");
        assert_eq!(set.keys[1].kid, "def");
    }

    #[tokio::test]
    async fn test_download_keys_invalid_content_type() {
        init();
        let server = httptest::Server::run();
        server.expect(jwks_expectation(
            httptest::responders::status_code(200)
                .append_header("content-type", "text/plain")
                .body(r#"{"keys":[{"kid":"abc","kty":"RSA"}]}"#),
        ));

        let err = download_keys(
            &reqwest::Client::new(),
            &server.url_str("/.well-known/jwks.json"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidContentType));
    }

    #[tokio::test]
    async fn test_download_keys_missing_content_type() {
        init();
        let server = httptest::Server::run();
        server.expect(jwks_expectation(
            httptest::responders::status_code(200).body(r#"{"keys":[]}"#),
        ));

        let err = download_keys(
            &reqwest::Client::new(),
            &server.url_str("/.well-known/jwks.json"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InvalidContentType));
    }

    #[tokio::test]
    async fn test_download_keys_empty() {
        init();
        let server = httptest::Server::run();
        server.expect(jwks_expectation(httptest::responders::json_encoded(
            serde_json::json!({ "keys": [] }),
        )));

        let err = download_keys(
            &reqwest::Client::new(),
            &server.url_str("/.well-known/jwks.json"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::NoKeyFound));
    }

    #[tokio::test]
    async fn test_download_keys_undecodable() {
        init();
        let server = httptest::Server::run();
        server.expect(jwks_expectation(
            httptest::responders::status_code(200)
                .append_header("content-type", "application/json")
                .body("<html>not json</html>"),
        ));

        let err = download_keys(
            &reqwest::Client::new(),
            &server.url_str("/.well-known/jwks.json"),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::DecodeError(_)));
    }

    #[tokio::test]
    async fn test_download_keys_network_error() {
        init();
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = listener.local_addr().unwrap();
        drop(listener);

        let err = download_keys(
            &reqwest::Client::new(),
            &format!("http://{}/.well-known/jwks.json", address),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::NetworkError(_)));
    }
}
