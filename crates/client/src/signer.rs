//! RPC request signing (HMAC-SHA1 over the canonical query string)

use base64::{engine::general_purpose::STANDARD, Engine as _};
use fleetmon_types::{ClientError, ClientResult};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use sha1::Sha1;
use std::collections::BTreeMap;

type HmacSha1 = Hmac<Sha1>;

// RFC 3986 unreserved characters stay literal; everything else is escaped.
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~');

/// Percent-encode a query component per the API's canonicalization rules
pub fn percent_encode(input: &str) -> String {
	utf8_percent_encode(input, ENCODE_SET).to_string()
}

/// Compute the request signature over the sorted query parameters.
///
/// The canonical string is `METHOD&%2F&<encoded sorted query>`; the key is
/// the access key secret with a trailing `&`. The BTreeMap argument supplies
/// the lexicographic parameter ordering the signature requires.
pub fn sign_request(
	method: &str,
	params: &BTreeMap<String, String>,
	access_key_secret: &str,
) -> ClientResult<String> {
	let canonical = params
		.iter()
		.map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
		.collect::<Vec<_>>()
		.join("&");

	let string_to_sign = format!("{}&{}&{}", method, percent_encode("/"), percent_encode(&canonical));

	let key = format!("{}&", access_key_secret);
	let mut mac = HmacSha1::new_from_slice(key.as_bytes())
		.map_err(|e| ClientError::Signing(e.to_string()))?;
	mac.update(string_to_sign.as_bytes());

	Ok(STANDARD.encode(mac.finalize().into_bytes()))
}
