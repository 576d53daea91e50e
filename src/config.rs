use crate::constants::{DEFAULT_BASE_URL, DEFAULT_LANGUAGE};
use crate::error::ReviewError;
use crate::model::{MovieId, StarScore};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "movie-review")]
#[command(about = "Browse TMDB movies and keep your own star ratings")]
#[command(version)]
pub struct Cli {
    /// TMDB API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the TMDB v3 API
    #[arg(long, env = "TMDB_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Language of titles and overviews
    #[arg(long, default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Directory holding saved ratings
    #[arg(long, env = "MOVIE_REVIEW_STORAGE_DIR", default_value = ".movie-review")]
    pub storage_dir: PathBuf,

    /// Search for a title instead of listing popular movies
    #[arg(short, long)]
    pub search: Option<String>,

    /// Number of pages to load
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Open the detail of this movie id
    #[arg(long)]
    pub select: Option<MovieId>,

    /// Rate the selected movie (2, 4, 6, 8 or 10)
    #[arg(long, requires = "select", value_parser = parse_star_score)]
    pub rate: Option<StarScore>,

    /// Print the rendered page as HTML instead of the text summary
    #[arg(long)]
    pub html: bool,
}

impl Cli {
    /// Checks what clap cannot express. Returns the API key on success.
    pub fn validate(&self) -> Result<&str, ReviewError> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ReviewError::Config("missing API key: pass --api-key or set TMDB_API_KEY".into())
            })?;

        if let Some(term) = &self.search {
            if term.trim().is_empty() {
                return Err(ReviewError::EmptySearchTerm);
            }
        }
        Ok(api_key)
    }
}

fn parse_star_score(s: &str) -> Result<StarScore, String> {
    let value: u8 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    match StarScore::try_from(value) {
        Ok(score) if score.is_rated() => Ok(score),
        _ => Err(format!(
            "'{s}' is not a valid rating. Must be one of: {}",
            StarScore::RATINGS.map(|r| r.to_string()).join(", ")
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["movie-review", "--api-key", "k"]).unwrap();
        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert_eq!(cli.language, "en-US");
        assert_eq!(cli.pages, 1);
        assert!(!cli.html);
        assert_eq!(cli.validate().unwrap(), "k");
    }

    #[test]
    fn test_rate_requires_select_and_valid_score() {
        assert!(Cli::try_parse_from(["movie-review", "--rate", "8"]).is_err());
        assert!(Cli::try_parse_from(["movie-review", "--select", "42", "--rate", "7"]).is_err());
        assert!(Cli::try_parse_from(["movie-review", "--select", "42", "--rate", "0"]).is_err());

        let cli = Cli::try_parse_from(["movie-review", "--select", "42", "--rate", "8"]).unwrap();
        assert_eq!(cli.rate.map(StarScore::value), Some(8));
    }

    #[test]
    fn test_validate_rejects_blank_values() {
        let cli = Cli::try_parse_from(["movie-review", "--api-key", "  "]).unwrap();
        assert!(matches!(cli.validate(), Err(ReviewError::Config(_))));

        let cli = Cli::try_parse_from(["movie-review", "--api-key", "k", "--search", " "]).unwrap();
        assert!(matches!(cli.validate(), Err(ReviewError::EmptySearchTerm)));
    }
}
