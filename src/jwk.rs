use elliptic_curve::sec1::ToEncodedPoint;

use crate::error::Error;

/// A single JSON Web Key as published by a JWKS endpoint.
///
/// Only the members needed for lookup and conversion are typed; everything
/// else is carried through untouched in `other`.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Jwk {
    #[serde(default)]
    pub kid: String,

    pub kty: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

/// Key set document, `{"keys": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct JwkSet {
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

impl Jwk {
    pub fn to_es256_public_key(&self) -> Result<jwt_simple::algorithms::ES256PublicKey, Error> {
        if self.kty != "EC" || self.crv.as_deref() != Some("P-256") {
            return Err(Error::InvalidAlgorithm);
        }

        let (x, y) = match (&self.x, &self.y) {
            (Some(x), Some(y)) => (x, y),
            _ => return Err(Error::InvalidKeyMaterial("missing x or y".to_owned())),
        };
        let ec_jwk: elliptic_curve::JwkEcKey = serde_json::from_value(serde_json::json!({
            "kty": "EC",
            "crv": "P-256",
            "x": x,
            "y": y,
        }))
        .map_err(|e| Error::InvalidKeyMaterial(e.to_string()))?;

        let public_key = elliptic_curve::PublicKey::<p256::NistP256>::from_jwk(&ec_jwk)
            .map_err(|e| Error::InvalidKeyMaterial(e.to_string()))?;
        let jwt_key = jwt_simple::algorithms::ES256PublicKey::from_bytes(
            public_key.to_encoded_point(false).as_bytes(),
        )
        .map_err(|e| Error::InvalidKeyMaterial(e.to_string()))?;

        if self.kid.is_empty() {
            Ok(jwt_key)
        } else {
            Ok(jwt_key.with_key_id(&self.kid))
        }
    }

    pub fn to_rs256_public_key(&self) -> Result<jwt_simple::algorithms::RS256PublicKey, Error> {
        if self.kty != "RSA" {
            return Err(Error::InvalidAlgorithm);
        }

        let (n, e) = match (&self.n, &self.e) {
            (Some(n), Some(e)) => (n, e),
            _ => return Err(Error::InvalidKeyMaterial("missing n or e".to_owned())),
        };
        let n = base64::decode_config(n, base64::URL_SAFE_NO_PAD)
            .map_err(|e| Error::InvalidKeyMaterial(format!("n: {}", e)))?;
        let e = base64::decode_config(e, base64::URL_SAFE_NO_PAD)
            .map_err(|e| Error::InvalidKeyMaterial(format!("e: {}", e)))?;

        let jwt_key = jwt_simple::algorithms::RS256PublicKey::from_components(&n, &e)
            .map_err(|e| Error::InvalidKeyMaterial(e.to_string()))?;

        if self.kid.is_empty() {
            Ok(jwt_key)
        } else {
            Ok(jwt_key.with_key_id(&self.kid))
        }
    }
}
