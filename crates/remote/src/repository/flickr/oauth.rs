//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! Only signing is handled here. Tokens are issued out-of-band and passed in
//! through [`Credentials`](super::Credentials).

use crate::error::{ErrorKind, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::collections::BTreeMap;

use super::Credentials;

pub(super) type Params = BTreeMap<String, String>;

/// Percent-encode per RFC 3986 (unreserved characters left alone).
fn encode(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Build the signature base string: `METHOD&url&sorted-params`.
fn base_string(method: &str, url: &str, params: &Params) -> String {
    // BTreeMap iteration is already sorted by key, and keys are unique.
    let normalized = params.iter().map(|(k, v)| format!("{}={}", encode(k), encode(v))).collect::<Vec<_>>().join("&");
    format!("{}&{}&{}", method.to_uppercase(), encode(url), encode(&normalized))
}

fn signature(base: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
    let key = format!("{}&{}", encode(consumer_secret), encode(token_secret));
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).map_err(|_| exn::Exn::from(ErrorKind::Credentials))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Add the `oauth_*` parameters and the resulting `oauth_signature` to
/// `params`, for a request of `method` against `url`.
pub(super) fn sign(
    credentials: &Credentials,
    method: &str,
    url: &str,
    params: &mut Params,
    nonce: &str,
    timestamp: i64,
) -> Result<()> {
    params.insert("oauth_consumer_key".into(), credentials.api_key.clone());
    params.insert("oauth_nonce".into(), nonce.to_string());
    params.insert("oauth_signature_method".into(), "HMAC-SHA1".into());
    params.insert("oauth_timestamp".into(), timestamp.to_string());
    params.insert("oauth_token".into(), credentials.oauth_token.clone());
    params.insert("oauth_version".into(), "1.0".into());
    let base = base_string(method, url, params);
    let signature = signature(&base, &credentials.api_secret, &credentials.oauth_token_secret)?;
    params.insert("oauth_signature".into(), signature);
    Ok(())
}
