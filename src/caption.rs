use crate::tmdb::{Credits, MovieDetails};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

/// Telegram limit for photo captions.
pub const CAPTION_LIMIT: usize = 1024;
const TOP_CAST: usize = 10;
const NA: &str = "N/A";

static LANGUAGE_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("hi", "Hindi"),
        ("te", "Telugu"),
        ("ta", "Tamil"),
        ("ml", "Malayalam"),
        ("kn", "Kannada"),
        ("en", "English"),
        ("bn", "Bengali"),
        ("mr", "Marathi"),
        ("gu", "Gujarati"),
        ("pa", "Punjabi"),
        ("or", "Odia"),
        ("as", "Assamese"),
        ("ur", "Urdu"),
    ])
});

/// Everything the reply shows, already reduced to display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieCard {
    pub title: String,
    pub year: String,
    pub release_date: String,
    pub runtime: String,
    pub languages: String,
    pub genres: String,
    pub directors: String,
    pub cast: String,
    pub overview: String,
}

impl MovieCard {
    pub fn new(details: &MovieDetails, credits: &Credits) -> Self {
        let release_date = details
            .release_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let year = release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
            .unwrap_or(NA)
            .to_string();

        let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
        let directors: Vec<&str> = credits
            .crew
            .iter()
            .filter(|m| m.job == "Director")
            .map(|m| m.name.as_str())
            .collect();
        let cast: Vec<&str> = credits.cast.iter().take(TOP_CAST).map(|a| a.name.as_str()).collect();

        let overview = details
            .overview
            .as_deref()
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .unwrap_or("No description available.")
            .to_string();

        Self {
            title: details.title.clone(),
            year,
            release_date: release_date.unwrap_or_else(|| NA.to_string()),
            runtime: details.runtime.map(|r| r.to_string()).unwrap_or_else(|| NA.to_string()),
            languages: or_na(spoken_languages(details)),
            genres: or_na(genres),
            directors: or_na(directors),
            cast: or_na(cast),
            overview,
        }
    }

    /// HTML caption. The overview is clipped so the text Telegram shows (tags stripped,
    /// entities decoded, counted in UTF-16 units) stays within `limit`.
    pub fn render(&self, footer: Option<&str>, limit: usize) -> String {
        let head = format!(
            "🎬 <b>{}</b> ({})\n\n\
             <b>🗓 Release Date:</b> <code>{}</code>\n\
             <b>⏱ Runtime:</b> <code>{} min</code>\n\
             <b>🌐 Languages:</b> <code>{}</code>\n\
             <b>🎭 Genres:</b> <code>{}</code>\n\
             <b>🎬 Director:</b> <code>{}</code>\n\
             <b>⭐ Cast:</b> <code>{}</code>\n\n",
            html_escape(&self.title),
            html_escape(&self.year),
            html_escape(&self.release_date),
            html_escape(&self.runtime),
            html_escape(&self.languages),
            html_escape(&self.genres),
            html_escape(&self.directors),
            html_escape(&self.cast),
        );
        let tail = match footer {
            Some(f) => format!("\n\n{}", html_escape(f)),
            None => String::new(),
        };
        let fixed = visible_len(&head) + visible_len(&tail) + visible_len("📝 <code></code>");
        let budget = limit.saturating_sub(fixed);
        format!("{head}📝 <code>{}</code>{tail}", html_escape(&clip(&self.overview, budget)))
    }
}

/// Display names for the spoken languages, deduplicated, falling back to the original language.
pub fn spoken_languages(details: &MovieDetails) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for l in &details.spoken_languages {
        let name = language_name(&l.iso_639_1, l.english_name.as_deref());
        if !name.is_empty() && !out.contains(&name) {
            out.push(name);
        }
    }
    if out.is_empty() {
        if let Some(code) = details.original_language.as_deref().filter(|c| !c.is_empty()) {
            out.push(language_name(code, None));
        }
    }
    out
}

fn language_name(code: &str, english_name: Option<&str>) -> String {
    if let Some(name) = LANGUAGE_NAMES.get(code) {
        return name.to_string();
    }
    match english_name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => n.to_string(),
        None => code.to_string(),
    }
}

fn or_na<S: AsRef<str>>(items: Vec<S>) -> String {
    if items.is_empty() {
        NA.to_string()
    } else {
        items.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ")
    }
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Length of rendered caption text as Telegram counts it. Only understands the
/// tags and entities this module emits.
pub fn visible_len(html: &str) -> usize {
    let mut len = 0;
    let mut rest = html;
    while let Some(c) = rest.chars().next() {
        match c {
            '<' => match rest.find('>') {
                Some(end) => {
                    rest = &rest[end + 1..];
                    continue;
                }
                None => len += 1,
            },
            '&' => {
                if let Some(entity) = ["&amp;", "&lt;", "&gt;"].iter().find(|e| rest.starts_with(**e)) {
                    len += 1;
                    rest = &rest[entity.len()..];
                    continue;
                }
                len += 1;
            }
            _ => len += c.len_utf16(),
        }
        rest = &rest[c.len_utf8()..];
    }
    len
}

/// Cuts on grapheme boundaries; `max` counts UTF-16 units including the trailing ellipsis.
pub fn clip(s: &str, max: usize) -> String {
    if s.encode_utf16().count() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for g in s.graphemes(true) {
        let n = g.encode_utf16().count();
        if used + n > max - 1 {
            break;
        }
        out.push_str(g);
        used += n;
    }
    out + "…"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tmdb::{CastMember, CrewMember, Genre, SpokenLanguage};

    fn lang(code: &str, name: Option<&str>) -> SpokenLanguage {
        SpokenLanguage { iso_639_1: code.to_string(), english_name: name.map(str::to_string) }
    }

    fn details() -> MovieDetails {
        MovieDetails {
            title: "Dangal".into(),
            release_date: Some("2016-12-21".into()),
            overview: Some("Wrestler <Mahavir> trains his daughters & more.".into()),
            genres: vec![Genre { name: "Drama".into() }, Genre { name: "Action".into() }],
            runtime: Some(161),
            spoken_languages: vec![lang("hi", Some("Hindi")), lang("fr", Some("French")), lang("hi", None)],
            original_language: Some("hi".into()),
        }
    }

    fn credits() -> Credits {
        Credits {
            cast: (0..12).map(|i| CastMember { name: format!("Actor {i}") }).collect(),
            crew: vec![
                CrewMember { name: "Nitesh Tiwari".into(), job: "Director".into() },
                CrewMember { name: "Someone".into(), job: "Producer".into() },
            ],
        }
    }

    #[test]
    fn card_fields() {
        let card = MovieCard::new(&details(), &credits());
        assert_eq!(card.year, "2016");
        assert_eq!(card.languages, "Hindi, French");
        assert_eq!(card.genres, "Drama, Action");
        assert_eq!(card.directors, "Nitesh Tiwari");
        assert!(card.cast.ends_with("Actor 9"));
        assert_eq!(card.cast.split(", ").count(), 10);
    }

    #[test]
    fn missing_fields_are_na() {
        let d = MovieDetails { title: "X".into(), release_date: Some("".into()), ..Default::default() };
        let card = MovieCard::new(&d, &Credits::default());
        assert_eq!(card.year, "N/A");
        assert_eq!(card.release_date, "N/A");
        assert_eq!(card.runtime, "N/A");
        assert_eq!(card.languages, "N/A");
        assert_eq!(card.genres, "N/A");
        assert_eq!(card.directors, "N/A");
        assert_eq!(card.cast, "N/A");
        assert_eq!(card.overview, "No description available.");
    }

    #[test]
    fn languages_fall_back() {
        let mut d = MovieDetails { spoken_languages: vec![lang("xx", None)], ..Default::default() };
        assert_eq!(spoken_languages(&d), vec!["xx".to_string()]);
        d.spoken_languages.clear();
        d.original_language = Some("ta".into());
        assert_eq!(spoken_languages(&d), vec!["Tamil".to_string()]);
    }

    #[test]
    fn render_escapes_and_appends_footer() {
        let card = MovieCard::new(&details(), &credits());
        let html = card.render(Some("Powered By : @Bot"), CAPTION_LIMIT);
        assert!(html.starts_with("🎬 <b>Dangal</b> (2016)"));
        assert!(html.contains("<code>161 min</code>"));
        assert!(html.contains("&lt;Mahavir&gt; trains his daughters &amp; more."));
        assert!(html.ends_with("\n\nPowered By : @Bot"));
        assert!(!card.render(None, CAPTION_LIMIT).contains("Powered"));
    }

    #[test]
    fn render_respects_limit() {
        let mut d = details();
        d.overview = Some("word ".repeat(600));
        let html = MovieCard::new(&d, &credits()).render(Some("footer"), CAPTION_LIMIT);
        assert!(visible_len(&html) <= CAPTION_LIMIT);
        assert!(html.contains("…</code>"));
    }

    #[test]
    fn escaped_overview_measured_as_shown() {
        let mut d = details();
        d.overview = Some("& ".repeat(800));
        let html = MovieCard::new(&d, &credits()).render(Some("footer"), CAPTION_LIMIT);
        let shown = visible_len(&html);
        assert!(shown <= CAPTION_LIMIT);
        assert!(shown > CAPTION_LIMIT - 10);
        assert!(html.contains("&amp; &amp;"));
        assert!(html.chars().count() > CAPTION_LIMIT);
    }

    #[test]
    fn visible_len_counts_displayed_text() {
        assert_eq!(visible_len("<b>a&amp;b</b>"), 3);
        assert_eq!(visible_len("&lt;x&gt;"), 3);
        assert_eq!(visible_len("🎬 <code>x</code>"), 4);
        assert_eq!(visible_len("a & b"), 5);
    }

    #[test]
    fn clip_keeps_graphemes() {
        assert_eq!(clip("hello", 10), "hello");
        assert_eq!(clip("hello world", 6), "hello…");
        assert_eq!(clip("e\u{301}e\u{301}e\u{301}", 4), "e\u{301}…");
        assert_eq!(clip("abc", 0), "");
        assert_eq!(clip("🎬🎬🎬", 4), "🎬…");
    }
}
