use serde::Deserialize;

pub const BACKDROP_BASE_URL: &str = "https://media.themoviedb.org/t/p/w1000_and_h563_face";
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// One image record from `/movie/{id}/images`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ImageCandidate {
    #[serde(rename = "iso_639_1")]
    pub language_code: Option<String>,
    #[serde(rename = "iso_3166_1", default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(rename = "file_path")]
    pub path: String,
}

impl ImageCandidate {
    /// ~16:9, either strictly 1.7..=1.8 or within 0.15 of 16/9.
    pub fn is_landscape(&self) -> bool {
        if self.height == 0 {
            return false;
        }
        let ratio = self.width as f64 / self.height as f64;
        (1.7..=1.8).contains(&ratio) || (ratio - 16.0 / 9.0).abs() <= 0.15
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct MovieImages {
    #[serde(default)]
    pub backdrops: Vec<ImageCandidate>,
    #[serde(default)]
    pub posters: Vec<ImageCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Backdrops,
    Posters,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Any,
    Only(&'static str),
    Except(&'static str),
}

impl Region {
    fn matches(self, code: Option<&str>) -> bool {
        match self {
            Region::Any => true,
            Region::Only(want) => code == Some(want),
            Region::Except(skip) => code != Some(skip),
        }
    }
}

/// One priority level. `language: None` accepts any language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tier {
    pub name: &'static str,
    pub source: Source,
    pub language: Option<&'static str>,
    pub region: Region,
    pub landscape_only: bool,
}

impl Tier {
    fn accepts(&self, c: &ImageCandidate) -> bool {
        if let Some(lang) = self.language {
            if c.language_code.as_deref() != Some(lang) {
                return false;
            }
        }
        self.region.matches(c.region_code.as_deref()) && (!self.landscape_only || c.is_landscape())
    }
}

/// Hindi backdrops first, then English, then whatever poster/backdrop comes first.
pub const DEFAULT_TIERS: [Tier; 5] = [
    Tier { name: "hindi backdrop", source: Source::Backdrops, language: Some("hi"), region: Region::Except("IN"), landscape_only: true },
    Tier { name: "hindi-IN backdrop", source: Source::Backdrops, language: Some("hi"), region: Region::Only("IN"), landscape_only: true },
    Tier { name: "english backdrop", source: Source::Backdrops, language: Some("en"), region: Region::Any, landscape_only: true },
    Tier { name: "poster fallback", source: Source::Posters, language: None, region: Region::Any, landscape_only: false },
    Tier { name: "backdrop fallback", source: Source::Backdrops, language: None, region: Region::Any, landscape_only: false },
];

#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    pub tier: &'static str,
    pub url: String,
    pub candidate: &'a ImageCandidate,
}

#[derive(Debug, Clone)]
pub struct ImageSelector {
    tiers: Vec<Tier>,
    backdrop_base: String,
    poster_base: String,
}

impl Default for ImageSelector {
    fn default() -> Self {
        Self::new(DEFAULT_TIERS.to_vec())
    }
}

impl ImageSelector {
    pub fn new(tiers: Vec<Tier>) -> Self {
        Self {
            tiers,
            backdrop_base: BACKDROP_BASE_URL.to_string(),
            poster_base: POSTER_BASE_URL.to_string(),
        }
    }

    /// Walks the tiers in order; inside a tier the service's order decides.
    pub fn select_image<'a>(&self, images: &'a MovieImages) -> Option<Selection<'a>> {
        self.tiers.iter().find_map(|tier| {
            let (list, base) = match tier.source {
                Source::Backdrops => (&images.backdrops, &self.backdrop_base),
                Source::Posters => (&images.posters, &self.poster_base),
            };
            list.iter().find(|c| tier.accepts(c)).map(|c| Selection {
                tier: tier.name,
                url: format!("{}{}", base, c.path),
                candidate: c,
            })
        })
    }
}
