//! Work identifiers accepted by the `/works/{id}` endpoint.

use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::sources::SourceError;

const OPENALEX_HOST: &str = "openalex.org";
const OPENALEX_API_HOST: &str = "api.openalex.org";

/// An identifier that OpenAlex can resolve to a single work
///
/// OpenAlex URLs (`https://openalex.org/W2053250335`) and API work URLs
/// (`https://api.openalex.org/works/W2053250335`) are reduced to their key. DOI URLs, `doi:` forms and bare keys are passed through unchanged,
/// since the API resolves them directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkId(String);

impl WorkId {
    /// Parse and normalize a user or API supplied identifier
    pub fn parse(raw: &str) -> Result<Self, SourceError> {
        let raw = raw.trim();

        if raw.is_empty() {
            return Err(SourceError::InvalidRequest("empty work identifier".to_string()));
        }

        if let Some(ch) = raw
            .chars()
            .find(|c| c.is_control() || c.is_whitespace() || matches!(c, '?' | '#'))
        {
            return Err(SourceError::InvalidRequest(format!(
                "work identifier {:?} contains disallowed character {:?}",
                raw, ch
            )));
        }

        if let Ok(url) = Url::parse(raw) {
            match url.host_str() {
                Some(OPENALEX_HOST) => {
                    let key = url
                        .path_segments()
                        .and_then(|mut segments| segments.next_back())
                        .filter(|s| !s.is_empty())
                        .ok_or_else(|| {
                            SourceError::InvalidRequest(format!("no work key in {}", raw))
                        })?;
                    return Ok(Self(key.to_string()));
                }
                Some(OPENALEX_API_HOST) => {
                    let segments: Vec<&str> =
                        url.path_segments().map(|s| s.collect()).unwrap_or_default();
                    return match segments.as_slice() {
                        ["works", key] if !key.is_empty() => Ok(Self(key.to_string())),
                        _ => Err(SourceError::InvalidRequest(format!(
                            "{} is not an OpenAlex work URL",
                            raw
                        ))),
                    };
                }
                _ => {}
            }
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for WorkId {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WorkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
