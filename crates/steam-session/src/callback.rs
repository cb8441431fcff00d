//! Query parameters delivered by the identity provider after login.

use url::Url;

/// Parameter carrying the identity the provider vouches for.
pub const CLAIMED_ID_PARAM: &str = "openid.claimed_id";

/// Marker the Auth Endpoint appends to the return URL.
pub const AUTH_CALLBACK_PARAM: &str = "auth_callback";

/// Ordered, decoded `(key, value)` pairs of a callback URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pairs: Vec<(String, String)>,
}

impl CallbackParams {
    /// Parse a raw query string, with or without the leading `?`.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect()
    }

    /// Take the query parameters of a full page URL.
    pub fn from_url(url: &Url) -> Self {
        url.query_pairs().into_owned().collect()
    }

    /// Value of `key`. Repeated keys resolve to the last occurrence.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The claimed identity, if present and non-empty.
    pub fn claimed_id(&self) -> Option<&str> {
        self.get(CLAIMED_ID_PARAM).filter(|v| !v.is_empty())
    }

    /// Whether this page load is the provider redirecting back.
    pub fn is_auth_callback(&self) -> bool {
        self.get(AUTH_CALLBACK_PARAM) == Some("true")
    }

    /// SteamID64 at the end of the claimed identity URL.
    pub fn steam_id(&self) -> Option<&str> {
        self.claimed_id()
            .and_then(|id| id.trim_end_matches('/').rsplit('/').next())
            .filter(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()))
    }

    /// Pairs with repeated keys collapsed to their last value, in order of
    /// first appearance.
    pub fn deduplicated(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = Vec::with_capacity(self.pairs.len());
        for (key, value) in &self.pairs {
            match out.iter_mut().find(|(k, _)| *k == key.as_str()) {
                Some(existing) => existing.1 = value.as_str(),
                None => out.push((key.as_str(), value.as_str())),
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CallbackParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
