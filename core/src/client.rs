//! Stateless request builder for the movie service.
//!
//! # Design
//! `MovieClient` holds only the base URL and the API key and carries no
//! mutable state between calls. The base URL is validated once, at
//! construction; an unusable one is kept as the error every build returns.
//! Each `build_*` method resolves an `Operation` and produces an absolute
//! `HttpRequest`; executing it is the transport's job, keeping this half of
//! the gateway deterministic.

use url::Url;

use crate::error::GatewayError;
use crate::http::HttpRequest;
use crate::operation::{MovieCategory, Operation, RequestSpec};

/// Query parameter carrying the static credential. Always appended last.
pub const API_KEY_PARAM: &str = "api_key";

#[derive(Debug, Clone)]
pub struct MovieClient {
    base_url: Result<Url, GatewayError>,
    api_key: String,
}

impl MovieClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: parse_base_url(base_url),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> Result<&Url, GatewayError> {
        self.base_url.as_ref().map_err(Clone::clone)
    }

    pub fn build(&self, operation: &Operation) -> Result<HttpRequest, GatewayError> {
        let spec = operation.resolve()?;
        self.request_for(&spec)
    }

    pub fn build_category(&self, category: MovieCategory, page: u32) -> Result<HttpRequest, GatewayError> {
        self.build(&Operation::ListCategory {
            category,
            page: Some(page),
        })
    }

    pub fn build_search(&self, query: &str, page: u32) -> Result<HttpRequest, GatewayError> {
        self.build(&Operation::SearchMovies {
            query: query.to_string(),
            page: Some(page),
        })
    }

    pub fn build_details(&self, movie_id: i64) -> Result<HttpRequest, GatewayError> {
        self.build(&Operation::MovieDetails { movie_id })
    }

    pub fn build_ratings(&self, movie_id: i64, page: u32) -> Result<HttpRequest, GatewayError> {
        self.build(&Operation::MovieRatings {
            movie_id,
            page: Some(page),
        })
    }

    /// Turn a resolved spec into `{base}{path}?{params}&api_key={key}`.
    ///
    /// Parameter values are form-encoded. Base path segments such as `/3`
    /// are kept in front of the endpoint path.
    pub fn request_for(&self, spec: &RequestSpec) -> Result<HttpRequest, GatewayError> {
        let base = self.base_url()?;
        let mut url = base.clone();
        url.set_path(&format!("{}{}", base.path().trim_end_matches('/'), spec.path));
        url.query_pairs_mut()
            .extend_pairs(spec.query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .append_pair(API_KEY_PARAM, &self.api_key);

        Ok(HttpRequest { url: String::from(url) })
    }
}

/// Accept only absolute http(s) URLs without query or fragment.
fn parse_base_url(raw: &str) -> Result<Url, GatewayError> {
    let base = Url::parse(raw).map_err(|e| GatewayError::InvalidConfig(format!("base URL {raw:?}: {e}")))?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(GatewayError::InvalidConfig(format!(
            "base URL {raw:?} must use http or https"
        )));
    }
    if base.query().is_some() || base.fragment().is_some() {
        return Err(GatewayError::InvalidConfig(format!(
            "base URL {raw:?} must not carry a query or fragment"
        )));
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> MovieClient {
        MovieClient::new("https://api.example.org/3", "KEY")
    }

    #[test]
    fn build_category_produces_correct_request() {
        let req = client().build_category(MovieCategory::Popular, 1).unwrap();
        assert_eq!(req.url, "https://api.example.org/3/movie/popular?page=1&api_key=KEY");
    }

    #[test]
    fn build_search_produces_correct_request() {
        let req = client().build_search("batman", 2).unwrap();
        assert_eq!(
            req.url,
            "https://api.example.org/3/search/movie?query=batman&page=2&api_key=KEY"
        );
    }

    #[test]
    fn build_search_encodes_query() {
        let req = client().build_search("fast & furious", 1).unwrap();
        assert_eq!(
            req.url,
            "https://api.example.org/3/search/movie?query=fast+%26+furious&page=1&api_key=KEY"
        );
    }

    #[test]
    fn build_details_produces_correct_request() {
        let req = client().build_details(550).unwrap();
        assert_eq!(req.url, "https://api.example.org/3/movie/550?api_key=KEY");
    }

    #[test]
    fn build_ratings_produces_correct_request() {
        let req = client().build_ratings(550, 1).unwrap();
        assert_eq!(req.url, "https://api.example.org/3/movie/550/reviews?page=1&api_key=KEY");
    }

    #[test]
    fn validation_runs_before_url_construction() {
        let broken = MovieClient::new("not a url", "KEY");
        let err = broken.build_details(-5).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidArgument(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = MovieClient::new("https://api.example.org/3/", "KEY");
        let req = client.build_details(1).unwrap();
        assert_eq!(req.url, "https://api.example.org/3/movie/1?api_key=KEY");
    }

    #[test]
    fn api_key_is_encoded() {
        let client = MovieClient::new("http://localhost:3000", "a b&c");
        let req = client.build_details(7).unwrap();
        assert_eq!(req.url, "http://localhost:3000/movie/7?api_key=a+b%26c");
    }

    #[test]
    fn unparseable_base_url_is_invalid_config() {
        let client = MovieClient::new("not a url", "KEY");
        let err = client.build_category(MovieCategory::Upcoming, 1).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidConfig(_)));
    }

    #[test]
    fn non_http_base_url_is_invalid_config() {
        let client = MovieClient::new("ftp://files.example.org", "KEY");
        let err = client.build_details(1).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidConfig(_)));
    }

    #[test]
    fn base_url_with_query_is_invalid_config() {
        let client = MovieClient::new("https://api.example.org/3?lang=en", "KEY");
        let err = client.build_details(1).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidConfig(_)));
    }

    #[test]
    fn base_url_is_validated_at_construction() {
        let client = MovieClient::new("https://api.example.org/3/", "KEY");
        assert_eq!(client.base_url().unwrap().path(), "/3/");

        let broken = MovieClient::new("ftp://files.example.org", "KEY");
        let first = broken.base_url().unwrap_err();
        assert!(matches!(first, GatewayError::InvalidConfig(_)));
        assert_eq!(broken.build_details(1).unwrap_err(), first);
        assert_eq!(broken.build_ratings(1, 1).unwrap_err(), first);
    }

    #[test]
    fn host_only_base_url_joins_without_double_slash() {
        let client = MovieClient::new("http://localhost:3000", "KEY");
        let req = client.build_search("alien", 1).unwrap();
        assert_eq!(req.url, "http://localhost:3000/search/movie?query=alien&page=1&api_key=KEY");
    }
}
