//! Display-level data types exchanged with the recommendation API.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};
use std::fmt;

use crate::error::ValidationError;

/// Opaque identifier; the API sends either a number (integer or not) or a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MovieId {
    Number(Number),
    Text(String),
}

impl From<i64> for MovieId {
    fn from(n: i64) -> Self {
        MovieId::Number(n.into())
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MovieId::Number(n) => write!(f, "{}", n),
            MovieId::Text(s) => f.write_str(s),
        }
    }
}

/// A recommended movie or series.
///
/// Decoding never rejects a JSON object: a field of an unexpected type is
/// treated as missing, so one odd entry cannot sink the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<MovieId>,
    #[serde(default, deserialize_with = "lenient_title")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_year")]
    pub release_year: Option<i32>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub overview: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub poster_url: Option<String>,
}

fn lenient_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<MovieId>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Number(n) => Some(MovieId::Number(n)),
        Value::String(s) => Some(MovieId::Text(s)),
        _ => None,
    })
}

fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_title<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(lenient_text(d)?.unwrap_or_default())
}

/// Whole years from integers, floats (rounded) or numeric strings.
fn lenient_year<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
    let year = match Value::deserialize(d)? {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.round() as i64)
        }),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| f.round() as i64),
        _ => None,
    };
    Ok(year.and_then(|y| i32::try_from(y).ok()))
}

impl Movie {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            release_year: None,
            overview: None,
            poster_url: None,
        }
    }

    /// Decode one list entry; anything that is not a JSON object is rejected.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Movie::deserialize(value).ok()
    }

    /// Key used to identify a card: the id when present, else the title.
    pub fn display_key(&self) -> String {
        match &self.id {
            Some(id) => id.to_string(),
            None => self.title.clone(),
        }
    }

    /// Poster URL, treating an empty string the same as a missing one.
    pub fn poster(&self) -> Option<&str> {
        self.poster_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }
}

/// The movies returned by one call, with the heading they are shown under.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RecommendationSet {
    pub title: String,
    pub movies: Vec<Movie>,
}

/// Exactly three titles, each non-blank, in the order the user typed them.
///
/// Values are kept verbatim; only the emptiness check ignores whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleTriple([String; 3]);

impl TitleTriple {
    pub fn new(titles: [String; 3]) -> Result<Self, ValidationError> {
        let missing = [
            titles[0].trim().is_empty(),
            titles[1].trim().is_empty(),
            titles[2].trim().is_empty(),
        ];
        if missing.iter().any(|&m| m) {
            return Err(ValidationError { missing });
        }
        Ok(Self(titles))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_inner(self) -> [String; 3] {
        self.0
    }
}
