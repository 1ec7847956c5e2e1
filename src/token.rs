use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHeader {
    pub algorithm: String,
    pub key_id: Option<String>,
}

/// A parsed token as far as key resolution cares: its protected headers.
///
/// Compact JWS carries exactly one header; tokens built from other
/// serializations may carry several or, when malformed, none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    headers: Vec<TokenHeader>,
}

impl Token {
    pub fn new(headers: Vec<TokenHeader>) -> Self {
        Self { headers }
    }

    /// Reads the header of a compact token. The signature is not checked.
    pub fn decode(token: &str) -> Result<Self, Error> {
        let metadata = jwt_simple::token::Token::decode_metadata(token)
            .map_err(|e| Error::InvalidToken(e.to_string()))?;

        Ok(Self {
            headers: vec![TokenHeader {
                algorithm: metadata.algorithm().to_owned(),
                key_id: metadata.key_id().map(str::to_owned),
            }],
        })
    }

    pub fn headers(&self) -> &[TokenHeader] {
        &self.headers
    }

    /// Key id of the first header. A header without one yields the empty
    /// string, the same kid that a key record without one is stored under.
    pub fn key_id(&self) -> Result<&str, Error> {
        let header = self.headers.first().ok_or(Error::NoJwtHeaders)?;
        Ok(header.key_id.as_deref().unwrap_or(""))
    }
}
