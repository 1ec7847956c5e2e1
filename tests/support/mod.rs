#![allow(dead_code)]

use jwk_client::test::TestKey;

pub const JWKS_PATH: &str = "/.well-known/jwks.json";

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Expects `times` JWKS downloads, each answered with `keys`.
pub fn expect_jwks(server: &httptest::Server, times: usize, keys: &[&TestKey]) {
    server.expect(
        httptest::Expectation::matching(httptest::matchers::request::method_path(
            "GET", JWKS_PATH,
        ))
        .times(times)
        .respond_with(httptest::responders::json_encoded(
            jwk_client::test::jwk_set_body(keys),
        )),
    );
}

/// Like `expect_jwks`, but every response is held back for `delay` so that
/// concurrent callers pile up behind one download.
pub fn expect_slow_jwks(
    server: &httptest::Server,
    times: usize,
    delay: std::time::Duration,
    keys: &[&TestKey],
) {
    server.expect(
        httptest::Expectation::matching(httptest::matchers::request::method_path(
            "GET", JWKS_PATH,
        ))
        .times(times)
        .respond_with(httptest::responders::delay_and_then(
            delay,
            httptest::responders::json_encoded(jwk_client::test::jwk_set_body(keys)),
        )),
    );
}

pub fn build_client(server: &httptest::Server) -> jwk_client::JwkClient {
    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(2))
        .build()
        .unwrap();
    jwk_client::JwkClient::new(
        jwk_client::JwkClientOptions::new(server.url_str(JWKS_PATH)).with_client(http),
    )
}
