//! Logical operations and their resolution into endpoint paths.
//!
//! # Design
//! `Operation` is a closed set of the requests the gateway knows how to make.
//! `Operation::resolve` is pure: it validates parameters and produces a
//! `RequestSpec` (path plus ordered query pairs) without touching the network
//! or the gateway configuration. The API key is attached later, when the
//! spec is turned into an absolute URL.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Page requested when the caller does not name one.
pub const DEFAULT_PAGE: u32 = 1;

/// Curated movie listings offered by the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieCategory {
    NowPlaying,
    Popular,
    TopRated,
    Upcoming,
}

impl MovieCategory {
    pub const ALL: [MovieCategory; 4] = [
        MovieCategory::NowPlaying,
        MovieCategory::Popular,
        MovieCategory::TopRated,
        MovieCategory::Upcoming,
    ];

    /// Segment appended to `/movie/` for this listing.
    pub fn path_segment(self) -> &'static str {
        match self {
            MovieCategory::NowPlaying => "now_playing",
            MovieCategory::Popular => "popular",
            MovieCategory::TopRated => "top_rated",
            MovieCategory::Upcoming => "upcoming",
        }
    }

    /// Human-readable label.
    pub fn display_name(self) -> &'static str {
        match self {
            MovieCategory::NowPlaying => "Now Playing",
            MovieCategory::Popular => "Popular",
            MovieCategory::TopRated => "Top Rated",
            MovieCategory::Upcoming => "Upcoming",
        }
    }
}

impl fmt::Display for MovieCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for MovieCategory {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MovieCategory::ALL
            .into_iter()
            .find(|c| c.path_segment() == s)
            .ok_or_else(|| GatewayError::InvalidArgument(format!("unknown movie category: {s:?}")))
    }
}

/// A logical request against the movie service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    SearchMovies {
        query: String,
        #[serde(default)]
        page: Option<u32>,
    },
    ListCategory {
        category: MovieCategory,
        #[serde(default)]
        page: Option<u32>,
    },
    MovieDetails {
        movie_id: i64,
    },
    MovieRatings {
        movie_id: i64,
        #[serde(default)]
        page: Option<u32>,
    },
}

/// Endpoint path and ordered query parameters for one call.
///
/// Built fresh per call and never shared. Does not include the API key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Operation {
    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::SearchMovies { .. } => "search_movies",
            Operation::ListCategory { .. } => "list_category",
            Operation::MovieDetails { .. } => "movie_details",
            Operation::MovieRatings { .. } => "movie_ratings",
        }
    }

    /// Validate parameters and map the operation to its endpoint.
    pub fn resolve(&self) -> Result<RequestSpec, GatewayError> {
        match self {
            Operation::SearchMovies { query, page } => {
                if query.trim().is_empty() {
                    return Err(GatewayError::InvalidArgument(
                        "search query must not be empty".to_string(),
                    ));
                }
                let page = checked_page(*page)?;
                Ok(RequestSpec {
                    path: "/search/movie".to_string(),
                    query: vec![
                        ("query".to_string(), query.clone()),
                        ("page".to_string(), page.to_string()),
                    ],
                })
            }
            Operation::ListCategory { category, page } => {
                let page = checked_page(*page)?;
                Ok(RequestSpec {
                    path: format!("/movie/{}", category.path_segment()),
                    query: vec![("page".to_string(), page.to_string())],
                })
            }
            Operation::MovieDetails { movie_id } => {
                let id = checked_movie_id(*movie_id)?;
                Ok(RequestSpec {
                    path: format!("/movie/{id}"),
                    query: Vec::new(),
                })
            }
            Operation::MovieRatings { movie_id, page } => {
                let id = checked_movie_id(*movie_id)?;
                let page = checked_page(*page)?;
                Ok(RequestSpec {
                    path: format!("/movie/{id}/reviews"),
                    query: vec![("page".to_string(), page.to_string())],
                })
            }
        }
    }
}

fn checked_page(page: Option<u32>) -> Result<u32, GatewayError> {
    match page.unwrap_or(DEFAULT_PAGE) {
        0 => Err(GatewayError::InvalidArgument(
            "page must be a positive integer".to_string(),
        )),
        page => Ok(page),
    }
}

fn checked_movie_id(movie_id: i64) -> Result<i64, GatewayError> {
    if movie_id <= 0 {
        return Err(GatewayError::InvalidArgument(format!(
            "movie id must be a positive integer, got {movie_id}"
        )));
    }
    Ok(movie_id)
}
