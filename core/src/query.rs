//! Query-string and form encoding.
//!
//! Two space rules are supported. RFC 3986 percent-encodes everything except
//! the unreserved set (`A-Z a-z 0-9 - . _ ~`) and writes a space as `%20`.
//! RFC 1738 is the `application/x-www-form-urlencoded` form and writes a space
//! as `+`.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const RFC3986_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Space-encoding rule for query components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryEncoding {
    /// Space becomes `%20`.
    #[default]
    Rfc3986,
    /// Space becomes `+`.
    Rfc1738,
}

/// Encode one key or value.
pub fn encode_component(value: &str, encoding: QueryEncoding) -> String {
    match encoding {
        QueryEncoding::Rfc3986 => utf8_percent_encode(value, RFC3986_ENCODE_SET).to_string(),
        QueryEncoding::Rfc1738 => form_urlencoded::byte_serialize(value.as_bytes()).collect(),
    }
}

/// Encode ordered key/value pairs as `k1=v1&k2=v2`.
pub fn encode_pairs<I, K, V>(pairs: I, encoding: QueryEncoding) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    match encoding {
        QueryEncoding::Rfc1738 => {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (key, value) in pairs {
                serializer.append_pair(key.as_ref(), value.as_ref());
            }
            serializer.finish()
        }
        QueryEncoding::Rfc3986 => pairs
            .into_iter()
            .map(|(key, value)| encode_pair(key.as_ref(), value.as_ref(), encoding))
            .collect::<Vec<_>>()
            .join("&"),
    }
}

pub(crate) fn encode_pair(key: &str, value: &str, encoding: QueryEncoding) -> String {
    format!(
        "{}={}",
        encode_component(key, encoding),
        encode_component(value, encoding)
    )
}
