//! Shared types passed between the width generator, the variant builder and
//! the URL assembler.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Query parameters for a single CDN request.
///
/// A sorted map so the serialized query string, and therefore the URL
/// signature, does not depend on insertion order.
pub type Params = BTreeMap<String, String>;

/// One `(url, label)` pair of a responsive set.
///
/// The label is either a width descriptor (`"640w"`) or a pixel-density
/// descriptor (`"2x"`), exactly as it appears in a `srcset` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantDescriptor {
    pub url: String,
    pub label: String,
}

impl fmt::Display for VariantDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.url, self.label)
    }
}

/// Parse `key=value` tokens into a [`Params`] map. Tokens without `=` are
/// returned unchanged in the second element, in order.
pub fn split_params<I, S>(tokens: I) -> (Params, Vec<String>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut params = Params::new();
    let mut rest = Vec::new();
    for token in tokens {
        let token = token.as_ref();
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                params.insert(key.to_string(), value.to_string());
            }
            _ => rest.push(token.to_string()),
        }
    }
    (params, rest)
}
