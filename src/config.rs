fn default_bind() -> String {
    "[::]:3000".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,

    pub jwks_uri: url::Url,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Seconds. Unset keeps keys until restart.
    pub max_key_age: Option<u64>,
    pub max_cache_size: Option<usize>,

    /// Take tokens from this cookie instead of `Authorization`.
    pub auth_cookie: Option<String>,
}

impl Config {
    pub fn http_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        Ok(reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout))
            .build()?)
    }

    pub fn key_cacher(&self) -> crate::key_cacher::MemoryKeyCacher {
        crate::key_cacher::MemoryKeyCacher::new(
            self.max_key_age.map(std::time::Duration::from_secs),
            self.max_cache_size,
        )
    }

    pub fn jwk_client(&self) -> Result<crate::client::JwkClient, crate::error::Error> {
        let options =
            crate::client::JwkClientOptions::new(self.jwks_uri.as_str()).with_client(self.http_client()?);
        let client = crate::client::JwkClient::new(options).with_key_cacher(self.key_cacher());

        Ok(match &self.auth_cookie {
            Some(name) => client.with_extractor(crate::extractor::FromCookie(name.clone())),
            None => client,
        })
    }
}
