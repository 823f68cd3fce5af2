use once_cell::sync::Lazy;
use regex::Regex;
use teloxide::utils::command::BotCommands;

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}$").expect("valid year regex"));

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Commands:")]
pub enum Command {
    #[command(description = "movie details: /movieinfo <movie name> [year]")]
    MovieInfo(String),
    #[command(description = "show this help")]
    Help,
    #[command(description = "show this help")]
    Start,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub name: String,
    pub year: Option<u16>,
}

/// `<name words...> [yyyy]`. A lone year is read as the title (e.g. "1917").
pub fn parse_query(args: &str) -> Option<MovieQuery> {
    let words: Vec<&str> = args.split_whitespace().collect();
    match words.split_last() {
        None => None,
        Some((last, rest)) if !rest.is_empty() && YEAR.is_match(last) => Some(MovieQuery {
            name: rest.join(" "),
            year: last.parse().ok(),
        }),
        Some(_) => Some(MovieQuery { name: words.join(" "), year: None }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_only() {
        assert_eq!(
            parse_query("  Three   Idiots "),
            Some(MovieQuery { name: "Three Idiots".into(), year: None })
        );
    }

    #[test]
    fn name_and_year() {
        assert_eq!(
            parse_query("Lagaan 2001"),
            Some(MovieQuery { name: "Lagaan".into(), year: Some(2001) })
        );
    }

    #[test]
    fn lone_year_is_title() {
        assert_eq!(parse_query("1917"), Some(MovieQuery { name: "1917".into(), year: None }));
        assert_eq!(
            parse_query("Movie 123"),
            Some(MovieQuery { name: "Movie 123".into(), year: None })
        );
    }

    #[test]
    fn non_ascii_digits_stay_in_name() {
        assert_eq!(
            parse_query("Sholay १९७५"),
            Some(MovieQuery { name: "Sholay १९७५".into(), year: None })
        );
    }

    #[test]
    fn empty() {
        assert_eq!(parse_query("   "), None);
    }

    #[test]
    fn parses_bot_command() {
        let cmd = Command::parse("/movieinfo Sholay 1975", "moviebot").unwrap();
        assert_eq!(cmd, Command::MovieInfo("Sholay 1975".into()));
        assert_eq!(Command::parse("/help", "moviebot").unwrap(), Command::Help);
    }
}
