use crate::images::{ImageSelector, MovieImages};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("TMDB returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response body: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TmdbError>;

#[derive(Clone)]
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    http: Client,
    selector: ImageSelector,
}

impl TmdbClient {
    pub fn new(api_key: String, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("movieinfo-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            api_key,
            base_url: base_url.into(),
            http,
            selector: ImageSelector::default(),
        })
    }

    /// Search by title, optionally narrowed to a release year.
    pub async fn search_movie(&self, name: &str, year: Option<u16>) -> Result<Vec<MovieSummary>> {
        let mut url = format!(
            "{}/search/movie?api_key={}&query={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(name)
        );
        if let Some(y) = year {
            url.push_str(&format!("&year={y}"));
        }
        let data: SearchResp = self.get_json(&url).await?;
        Ok(data.results)
    }

    pub async fn movie_details(&self, id: u64) -> Result<MovieDetails> {
        let url = format!(
            "{}/movie/{}?api_key={}&language=en-US",
            self.base_url,
            id,
            urlencoding::encode(&self.api_key)
        );
        self.get_json(&url).await
    }

    pub async fn movie_credits(&self, id: u64) -> Result<Credits> {
        let url = format!(
            "{}/movie/{}/credits?api_key={}&language=en-US",
            self.base_url,
            id,
            urlencoding::encode(&self.api_key)
        );
        self.get_json(&url).await
    }

    pub async fn movie_images(&self, id: u64) -> Result<MovieImages> {
        let url = format!(
            "{}/movie/{}/images?api_key={}&include_image_language=hi,en,null",
            self.base_url,
            id,
            urlencoding::encode(&self.api_key)
        );
        self.get_json(&url).await
    }

    /// Best display image for the movie. Never fails: upstream errors are logged and read as "no image".
    pub async fn best_image_url(&self, id: u64) -> Option<String> {
        let images = match self.movie_images(id).await {
            Ok(images) => images,
            Err(e) => {
                warn!(movie_id = id, error = %e, "could not fetch movie images");
                return None;
            }
        };
        match self.selector.select_image(&images) {
            Some(sel) => {
                debug!(
                    movie_id = id,
                    tier = sel.tier,
                    width = sel.candidate.width,
                    height = sel.candidate.height,
                    url = %sel.url,
                    "image selected"
                );
                Some(sel.url)
            }
            None => {
                debug!(movie_id = id, "no qualifying image");
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(TmdbError::Status { status: status.as_u16(), body });
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/* ======= DTOs ======= */

#[derive(Deserialize, Debug)]
struct SearchResp {
    #[serde(default)]
    results: Vec<MovieSummary>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct MovieDetails {
    #[serde(default)]
    pub title: String,
    pub release_date: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub spoken_languages: Vec<SpokenLanguage>,
    pub original_language: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Genre {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SpokenLanguage {
    pub iso_639_1: String,
    #[serde(default)]
    pub english_name: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CastMember {
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: String,
}
