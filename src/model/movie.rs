use crate::constants::STAR_DESCRIPTIONS;
use crate::error::ReviewError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Catalog identity of a movie.
pub type MovieId = u64;

/// One entry of a listing page.
///
/// Deserialized straight from TMDB list results; fields the views do not
/// render are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

impl MovieSummary {
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            vote_average: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// A personal rating: `0` (not rated) or one of the five star levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StarScore(u8);

impl StarScore {
    /// The five values a user can pick, lowest first.
    pub const RATINGS: [u8; 5] = [2, 4, 6, 8, 10];

    pub const UNRATED: StarScore = StarScore(0);

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_rated(self) -> bool {
        self.0 > 0
    }

    pub fn description(self) -> &'static str {
        STAR_DESCRIPTIONS[usize::from(self.0 / 2)]
    }
}

impl TryFrom<u8> for StarScore {
    type Error = ReviewError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 10 && value % 2 == 0 {
            Ok(StarScore(value))
        } else {
            Err(ReviewError::InvalidStarScore(value))
        }
    }
}

impl From<StarScore> for u8 {
    fn from(score: StarScore) -> Self {
        score.0
    }
}

impl fmt::Display for StarScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the detail overlay shows, plus the user's own rating.
///
/// This is also the record kept in the durable ratings collection, hence
/// the camelCase field names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub movie_id: MovieId,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub my_star_score: Option<StarScore>,
}

impl MovieDetail {
    pub fn new(movie_id: MovieId, title: impl Into<String>) -> Self {
        Self {
            movie_id,
            title: title.into(),
            overview: None,
            genres: Vec::new(),
            poster_path: None,
            vote_average: 0.0,
            my_star_score: None,
        }
    }

    /// Genre names joined for display, e.g. `"Action, Drama"`.
    pub fn genre_names(&self) -> String {
        self.genres
            .iter()
            .map(|g| g.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn star_score(&self) -> StarScore {
        self.my_star_score.unwrap_or_default()
    }

    pub fn set_star_score(&mut self, score: StarScore) {
        self.my_star_score = Some(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_score_accepts_only_even_levels() {
        for value in [0u8, 2, 4, 6, 8, 10] {
            assert_eq!(StarScore::try_from(value).unwrap().value(), value);
        }
        for value in [1u8, 3, 7, 11, 12, 255] {
            assert!(matches!(
                StarScore::try_from(value),
                Err(ReviewError::InvalidStarScore(v)) if v == value
            ));
        }
    }

    #[test]
    fn test_star_descriptions() {
        assert_eq!(StarScore::UNRATED.description(), "Leave a rating");
        assert_eq!(StarScore::try_from(8u8).unwrap().description(), "Great");
        assert_eq!(StarScore::try_from(10u8).unwrap().description(), "Masterpiece");
    }

    #[test]
    fn test_detail_record_shape() {
        let mut detail = MovieDetail::new(42, "Dune");
        detail.genres = vec![
            Genre { id: 1, name: "Science Fiction".into() },
            Genre { id: 2, name: "Adventure".into() },
        ];
        detail.set_star_score(StarScore::try_from(6u8).unwrap());

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["movieId"], 42);
        assert_eq!(json["myStarScore"], 6);
        assert_eq!(detail.genre_names(), "Science Fiction, Adventure");

        let bad = serde_json::json!({ "movieId": 1, "title": "x", "myStarScore": 5 });
        assert!(serde_json::from_value::<MovieDetail>(bad).is_err());
    }

    #[test]
    fn test_summary_ignores_unknown_fields() {
        let raw = r#"{"id": 7, "title": "Heat", "adult": false, "genre_ids": [80], "vote_average": 7.9}"#;
        let summary: MovieSummary = serde_json::from_str(raw).unwrap();
        assert_eq!(summary.id, 7);
        assert_eq!(summary.poster_path, None);
        assert_eq!(summary.vote_average, 7.9);
    }
}
