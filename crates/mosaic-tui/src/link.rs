//! Deep-link URLs
//!
//! The selected item's key lives in a single query parameter of the host
//! URL, e.g. `https://studio.example/work?item=harbour-lights`. Other query
//! parameters are left alone.

use url::Url;

#[derive(Debug, Clone, PartialEq)]
pub struct QueryParamLink {
    base: Url,
    param: String,
}

impl QueryParamLink {
    pub fn new(base: Url, param: impl Into<String>) -> Self {
        Self {
            base,
            param: param.into(),
        }
    }

    pub fn parse(base: &str, param: impl Into<String>) -> mosaic_core::Result<Self> {
        Ok(Self::new(Url::parse(base)?, param))
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// URL for the current selection; `None` removes the parameter
    pub fn key_to_url(&self, key: Option<&str>) -> Url {
        let kept: Vec<(String, String)> = self
            .base
            .query_pairs()
            .filter(|(name, _)| name != self.param.as_str())
            .map(|(name, value)| (name.into_owned(), value.into_owned()))
            .collect();

        let mut url = self.base.clone();
        url.set_query(None);
        if kept.is_empty() && key.is_none() {
            return url;
        }

        {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &kept {
                pairs.append_pair(name, value);
            }
            if let Some(key) = key {
                pairs.append_pair(&self.param, key);
            }
        }
        url
    }

    /// Key carried by a URL, if any
    pub fn key_from_url(&self, url: &Url) -> Option<String> {
        url.query_pairs()
            .find(|(name, _)| name == self.param.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.trim().is_empty())
    }

    /// Accept either a full URL or a bare key
    pub fn extract_key(&self, input: &str) -> Option<String> {
        extract_key(input, &self.param)
    }
}

/// Key carried by `input`, which is either a URL with a `param` query
/// parameter or the bare key itself
pub fn extract_key(input: &str, param: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    match Url::parse(input) {
        Ok(url) if url.has_host() => url
            .query_pairs()
            .find(|(name, _)| name == param)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.trim().is_empty()),
        _ => Some(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link() -> QueryParamLink {
        QueryParamLink::parse("https://studio.example/work?lang=de", "item").unwrap()
    }

    #[test]
    fn test_key_to_url_keeps_other_params() {
        let url = link().key_to_url(Some("xcons-02"));
        assert_eq!(url.as_str(), "https://studio.example/work?lang=de&item=xcons-02");

        let closed = link().key_to_url(None);
        assert_eq!(closed.as_str(), "https://studio.example/work?lang=de");
    }

    #[test]
    fn test_key_replaced_not_duplicated() {
        let link = QueryParamLink::parse("https://studio.example/work?item=old", "item").unwrap();
        assert_eq!(
            link.key_to_url(Some("new")).as_str(),
            "https://studio.example/work?item=new"
        );
        assert_eq!(link.key_to_url(None).as_str(), "https://studio.example/work");
    }

    #[test]
    fn test_extract_key() {
        let link = link();
        assert_eq!(
            link.extract_key("https://studio.example/work?item=harbour-lights"),
            Some("harbour-lights".to_string())
        );
        assert_eq!(link.extract_key("https://studio.example/work?item="), None);
        assert_eq!(link.extract_key("https://studio.example/work"), None);
        assert_eq!(link.extract_key("xcons-01"), Some("xcons-01".to_string()));
        assert_eq!(link.extract_key("  "), None);
    }

    #[test]
    fn test_extract_key_without_base() {
        assert_eq!(
            extract_key("http://localhost:3000/?lang=en&work=xcons-02", "work"),
            Some("xcons-02".to_string())
        );
        assert_eq!(extract_key("http://localhost:3000/?item=x", "work"), None);
    }

    #[test]
    fn test_round_trip_with_spaces() {
        let link = link();
        let url = link.key_to_url(Some("night market"));
        assert_eq!(link.key_from_url(&url), Some("night market".to_string()));
    }
}
