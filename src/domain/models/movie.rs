//! Movie domain model and the OMDb response envelope.

use serde::{Deserialize, Serialize};

/// Movie details as served to the caller and persisted in the store.
///
/// Field names mirror the OMDb JSON payload. Every field defaults to an
/// empty string so a sparse provider response decodes to zero values
/// instead of failing the whole lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    #[serde(rename = "imdbID", default)]
    pub imdb_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "Language", default)]
    pub language: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "imdbRating", default)]
    pub rating: String,
}

/// Raw OMDb response: the movie payload plus OMDb's own status marker.
///
/// OMDb reports "no data for this title" in-band with `"Response":
/// "False"` rather than through HTTP status codes.
#[derive(Debug, Clone, Deserialize)]
pub struct OmdbResponse {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(rename = "Response", default)]
    pub response: String,
}

impl OmdbResponse {
    /// True when OMDb explicitly reported no result for the queried title.
    pub fn is_no_result(&self) -> bool {
        self.response.eq_ignore_ascii_case("false")
    }
}
