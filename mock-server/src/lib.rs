use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

pub const PAGE_SIZE: usize = 20;
pub const MAX_PAGE: u32 = 500;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub original_title: String,
    pub original_language: String,
    pub overview: String,
    pub release_date: String,
    pub popularity: f64,
    pub vote_average: f64,
    pub vote_count: u32,
    pub genre_ids: Vec<u32>,
    pub adult: bool,
    pub video: bool,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthorDetails {
    pub name: String,
    pub username: String,
    pub avatar_path: Option<String>,
    pub rating: Option<u8>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Review {
    pub id: String,
    pub author: String,
    pub author_details: AuthorDetails,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Dates {
    pub maximum: String,
    pub minimum: String,
}

/// Paged listing envelope shared by every list endpoint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paged<T> {
    /// Movie id, present only on review listings.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<i64>,
    /// Release window, present only on the upcoming listing.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub dates: Option<Dates>,
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub status_code: u32,
    pub status_message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Params {
    pub api_key: Option<String>,
    pub page: Option<u32>,
    pub query: Option<String>,
}

#[derive(Debug)]
pub struct Catalog {
    pub movies: Vec<Movie>,
    pub reviews: Vec<(i64, Review)>,
}

#[derive(Clone)]
struct AppState {
    api_key: Arc<str>,
    catalog: Arc<Catalog>,
}

pub fn app(api_key: &str) -> Router {
    app_with_catalog(api_key, Catalog::sample())
}

pub fn app_with_catalog(api_key: &str, catalog: Catalog) -> Router {
    let state = AppState {
        api_key: Arc::from(api_key),
        catalog: Arc::new(catalog),
    };
    Router::new()
        .route("/search/movie", get(search_movies))
        .route("/movie/{id}", get(movie_or_listing))
        .route("/movie/{id}/reviews", get(movie_reviews))
        .with_state(state)
}

pub async fn run(listener: TcpListener, api_key: &str) -> Result<(), std::io::Error> {
    serve(listener, app(api_key)).await
}

/// Serve an already configured router, e.g. one from `app_with_catalog`.
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

fn error(status: StatusCode, status_code: u32, message: &str) -> Response {
    let body = ErrorBody {
        success: false,
        status_code,
        status_message: message.to_string(),
    };
    (status, Json(body)).into_response()
}

fn unauthorized() -> Response {
    error(
        StatusCode::UNAUTHORIZED,
        7,
        "Invalid API key: You must be granted a valid key.",
    )
}

fn not_found() -> Response {
    error(
        StatusCode::NOT_FOUND,
        34,
        "The resource you requested could not be found.",
    )
}

fn invalid_page() -> Response {
    error(
        StatusCode::BAD_REQUEST,
        22,
        "Invalid page: Pages start at 1 and max at 500. They are expected to be an integer.",
    )
}

impl AppState {
    fn authorize(&self, params: &Params) -> Result<(), Response> {
        match params.api_key.as_deref() {
            Some(key) if key == &*self.api_key => Ok(()),
            _ => Err(unauthorized()),
        }
    }
}

fn paginate<T: Clone>(items: &[T], page: Option<u32>) -> Result<Paged<T>, Response> {
    let page = page.unwrap_or(1);
    if page == 0 || page > MAX_PAGE {
        return Err(invalid_page());
    }
    let start = (page as usize - 1) * PAGE_SIZE;
    let results = items.iter().skip(start).take(PAGE_SIZE).cloned().collect();
    Ok(Paged {
        id: None,
        dates: None,
        page,
        results,
        total_pages: items.len().div_ceil(PAGE_SIZE) as u32,
        total_results: items.len() as u32,
    })
}

async fn movie_or_listing(
    State(state): State<AppState>,
    Path(segment): Path<String>,
    Query(params): Query<Params>,
) -> Response {
    if let Err(resp) = state.authorize(&params) {
        return resp;
    }
    let catalog = &state.catalog;
    debug!(%segment, page = ?params.page, "movie endpoint");

    let listing: Vec<Movie> = match segment.as_str() {
        "now_playing" => catalog.released().collect(),
        "upcoming" => catalog.unreleased().collect(),
        "popular" => catalog.sorted_by(|m| m.popularity),
        "top_rated" => catalog.sorted_by(|m| m.vote_average),
        other => {
            let Ok(id) = other.parse::<i64>() else {
                return not_found();
            };
            return match catalog.movie(id) {
                Some(movie) => Json(movie.clone()).into_response(),
                None => not_found(),
            };
        }
    };

    let mut paged = match paginate(&listing, params.page) {
        Ok(paged) => paged,
        Err(resp) => return resp,
    };
    if segment == "upcoming" {
        paged.dates = Some(Dates {
            maximum: "2023-12-20".to_string(),
            minimum: "2023-11-29".to_string(),
        });
    }
    Json(paged).into_response()
}

async fn movie_reviews(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<Params>,
) -> Response {
    if let Err(resp) = state.authorize(&params) {
        return resp;
    }
    if state.catalog.movie(id).is_none() {
        return not_found();
    }
    let reviews: Vec<Review> = state
        .catalog
        .reviews
        .iter()
        .filter(|(movie_id, _)| *movie_id == id)
        .map(|(_, review)| review.clone())
        .collect();
    match paginate(&reviews, params.page) {
        Ok(mut paged) => {
            paged.id = Some(id);
            Json(paged).into_response()
        }
        Err(resp) => resp,
    }
}

async fn search_movies(State(state): State<AppState>, Query(params): Query<Params>) -> Response {
    if let Err(resp) = state.authorize(&params) {
        return resp;
    }
    let needle = params.query.as_deref().unwrap_or("").trim().to_lowercase();
    // An empty query yields an empty page, not an error.
    let matches: Vec<Movie> = if needle.is_empty() {
        Vec::new()
    } else {
        state
            .catalog
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    };
    match paginate(&matches, params.page) {
        Ok(paged) => Json(paged).into_response(),
        Err(resp) => resp,
    }
}

/// Release date at or after which a movie counts as upcoming.
const UPCOMING_FROM: &str = "2023-11-29";

impl Catalog {
    pub fn movie(&self, id: i64) -> Option<&Movie> {
        self.movies.iter().find(|m| m.id == id)
    }

    fn released(&self) -> impl Iterator<Item = Movie> + '_ {
        self.movies
            .iter()
            .filter(|m| m.release_date.as_str() < UPCOMING_FROM)
            .cloned()
    }

    fn unreleased(&self) -> impl Iterator<Item = Movie> + '_ {
        self.movies
            .iter()
            .filter(|m| m.release_date.as_str() >= UPCOMING_FROM)
            .cloned()
    }

    fn sorted_by(&self, key: impl Fn(&Movie) -> f64) -> Vec<Movie> {
        let mut movies = self.movies.clone();
        movies.sort_by(|a, b| key(b).total_cmp(&key(a)));
        movies
    }

    /// Small fixed catalogue used by tests and the standalone binary.
    pub fn sample() -> Self {
        let movie = |id: i64, title: &str, release_date: &str, popularity: f64, vote_average: f64| Movie {
            id,
            title: title.to_string(),
            original_title: title.to_string(),
            original_language: "en".to_string(),
            overview: format!("Overview of {title}."),
            release_date: release_date.to_string(),
            popularity,
            vote_average,
            vote_count: (vote_average * 1000.0) as u32,
            genre_ids: vec![18],
            adult: false,
            video: false,
            poster_path: Some(format!("/poster-{id}.jpg")),
            backdrop_path: None,
        };
        let review = |id: &str, author: &str, rating: Option<u8>, content: &str| Review {
            id: id.to_string(),
            author: author.to_string(),
            author_details: AuthorDetails {
                name: String::new(),
                username: author.to_string(),
                avatar_path: None,
                rating,
            },
            content: content.to_string(),
            created_at: "2023-11-24T12:00:00.000Z".to_string(),
            updated_at: "2023-11-24T12:00:00.000Z".to_string(),
            url: format!("https://reviews.example.org/{id}"),
        };

        Catalog {
            movies: vec![
                movie(550, "Fight Club", "1999-10-15", 61.4, 8.4),
                movie(342, "Summer Storm", "2004-09-02", 7.4, 6.7),
                movie(272, "Batman Begins", "2005-06-10", 55.2, 7.7),
                movie(155, "The Dark Knight", "2008-07-16", 88.1, 8.5),
                movie(753342, "Napoleon", "2023-11-22", 120.9, 6.5),
                movie(787699, "Wonka", "2023-12-06", 140.3, 7.2),
            ],
            reviews: vec![
                (550, review("r-550-1", "goodfella", Some(9), "Still holds up.")),
                (550, review("r-550-2", "tyler", None, "The first rule applies.")),
                (155, review("r-155-1", "gotham", Some(10), "Best of the trilogy.")),
            ],
        }
    }
}
