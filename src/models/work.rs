//! Work model representing a single OpenAlex work record.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::AbstractIndex;
use crate::sources::SourceError;

/// A scholarly work as returned by the OpenAlex `/works` endpoint
///
/// Only the fields needed for citation output and one-hop traversal are
/// modelled. Anything the API omits or sends as `null` deserializes to `None`
/// (or an empty list), so absence is checked where a formatter needs the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Work {
    /// OpenAlex URL of the work (`https://openalex.org/W...`)
    #[serde(default)]
    pub id: Option<String>,

    /// DOI as a URL (`https://doi.org/...`)
    #[serde(default)]
    pub doi: Option<String>,

    /// Work title
    #[serde(default)]
    pub title: Option<String>,

    /// Year of publication
    #[serde(default)]
    pub publication_year: Option<i32>,

    /// Declared work type (e.g. `journal-article`)
    #[serde(default, rename = "type")]
    pub work_type: Option<String>,

    /// Authors in byline order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub authorships: Vec<Authorship>,

    /// Legacy venue block
    #[serde(default)]
    pub host_venue: Option<Venue>,

    /// Primary location (landing page and hosting source)
    #[serde(default)]
    pub primary_location: Option<Location>,

    /// Volume, issue and page range
    #[serde(default)]
    pub biblio: Option<Biblio>,

    /// Abstract in inverted-index form
    #[serde(default)]
    pub abstract_inverted_index: Option<AbstractIndex>,

    /// OpenAlex URLs of related works
    #[serde(default, deserialize_with = "null_as_empty")]
    pub related_works: Vec<String>,

    /// OpenAlex URLs of works this work cites
    #[serde(default, deserialize_with = "null_as_empty")]
    pub referenced_works: Vec<String>,

    /// API URL listing works that cite this one
    #[serde(default)]
    pub cited_by_api_url: Option<String>,

    /// Number of citing works known to OpenAlex
    #[serde(default)]
    pub cited_by_count: Option<u32>,
}

/// One entry of a work's author list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Authorship {
    #[serde(default)]
    pub author: Author,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,
}

/// A journal, repository or other hosting venue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Venue {
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub landing_page_url: Option<String>,

    #[serde(default)]
    pub source: Option<Venue>,
}

/// Bibliographic locator block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biblio {
    #[serde(default)]
    pub volume: Option<String>,

    #[serde(default)]
    pub issue: Option<String>,

    #[serde(default)]
    pub first_page: Option<String>,

    #[serde(default)]
    pub last_page: Option<String>,
}

impl Biblio {
    /// `first-last`, with a missing bound rendered as an empty string
    pub fn page_range(&self) -> String {
        format!(
            "{}-{}",
            self.first_page.as_deref().unwrap_or_default(),
            self.last_page.as_deref().unwrap_or_default()
        )
    }
}

/// Reference to a work inside a list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkStub {
    pub id: String,
}

/// A single page of a `/works` list response (e.g. a cited-by query)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkList {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub results: Vec<WorkStub>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Work {
    /// Author display names in byline order, skipping unnamed authors
    pub fn author_names(&self) -> Vec<&str> {
        self.authorships
            .iter()
            .filter_map(|a| a.author.display_name.as_deref())
            .collect()
    }

    /// Display name of the first listed author
    pub fn first_author(&self) -> Result<&str, SourceError> {
        self.authorships
            .first()
            .ok_or_else(|| SourceError::missing("authorships"))?
            .author
            .display_name
            .as_deref()
            .ok_or_else(|| SourceError::missing("authorships[0].author.display_name"))
    }

    /// Venue name, preferring `host_venue` over `primary_location.source`
    pub fn venue_name(&self) -> Option<&str> {
        self.host_venue
            .as_ref()
            .and_then(|v| v.display_name.as_deref())
            .or_else(|| {
                self.primary_location
                    .as_ref()
                    .and_then(|l| l.source.as_ref())
                    .and_then(|s| s.display_name.as_deref())
            })
    }

    pub fn landing_page_url(&self) -> Option<&str> {
        self.primary_location
            .as_ref()
            .and_then(|l| l.landing_page_url.as_deref())
    }

    /// The biblio block, which every citation format requires
    pub fn biblio(&self) -> Result<&Biblio, SourceError> {
        self.biblio
            .as_ref()
            .ok_or_else(|| SourceError::missing("biblio"))
    }

    pub fn year(&self) -> Result<i32, SourceError> {
        self.publication_year
            .ok_or_else(|| SourceError::missing("publication_year"))
    }

    pub fn declared_type(&self) -> Result<&str, SourceError> {
        self.work_type
            .as_deref()
            .ok_or_else(|| SourceError::missing("type"))
    }

    /// Plain-text abstract rebuilt from the inverted index
    pub fn abstract_text(&self) -> Result<String, SourceError> {
        self.abstract_inverted_index
            .as_ref()
            .ok_or_else(|| SourceError::missing("abstract_inverted_index"))?
            .reconstruct()
    }

    pub fn has_abstract(&self) -> bool {
        self.abstract_inverted_index.is_some()
    }
}

/// One-line summary: `authors, title, volume, issue, pages, (year), doi. cited by: N. id`
impl fmt::Display for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.author_names();
        let authors = match names.as_slice() {
            [] => "(No authors)".to_string(),
            [only] => only.to_string(),
            [init @ .., last] => format!("{} and {}", init.join(", "), last),
        };

        let (volume, issue, pages) = match &self.biblio {
            Some(b) => (
                b.volume.clone().unwrap_or_default(),
                b.issue.as_deref().map(|i| format!(", {}", i)).unwrap_or_default(),
                b.page_range(),
            ),
            None => (String::new(), String::new(), "-".to_string()),
        };

        write!(
            f,
            "{}, {}, {}{}, {}, ({}), {}. cited by: {}. {}",
            authors,
            self.title.as_deref().unwrap_or_default(),
            volume,
            issue,
            pages,
            self.publication_year
                .map(|y| y.to_string())
                .unwrap_or_default(),
            self.doi.as_deref().unwrap_or_default(),
            self.cited_by_count.unwrap_or(0),
            self.id.as_deref().unwrap_or_default()
        )
    }
}

/// Builder for constructing Work records without going through JSON
#[derive(Debug, Clone, Default)]
pub struct WorkBuilder {
    work: Work,
}

impl WorkBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            work: Work {
                id: Some(id.into()),
                ..Work::default()
            },
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.work.title = Some(title.into());
        self
    }

    /// Append an author to the byline
    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.work.authorships.push(Authorship {
            author: Author {
                id: None,
                display_name: Some(name.into()),
            },
        });
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.work.publication_year = Some(year);
        self
    }

    pub fn work_type(mut self, work_type: impl Into<String>) -> Self {
        self.work.work_type = Some(work_type.into());
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.work.doi = Some(doi.into());
        self
    }

    /// Set the legacy `host_venue` name
    pub fn venue(mut self, name: impl Into<String>) -> Self {
        self.work.host_venue = Some(Venue {
            display_name: Some(name.into()),
        });
        self
    }

    pub fn landing_page_url(mut self, url: impl Into<String>) -> Self {
        self.work
            .primary_location
            .get_or_insert_with(Location::default)
            .landing_page_url = Some(url.into());
        self
    }

    pub fn biblio(mut self, biblio: Biblio) -> Self {
        self.work.biblio = Some(biblio);
        self
    }

    pub fn abstract_index(mut self, index: AbstractIndex) -> Self {
        self.work.abstract_inverted_index = Some(index);
        self
    }

    pub fn related(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.work.related_works = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn references(mut self, ids: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.work.referenced_works = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn cited_by_api_url(mut self, url: impl Into<String>) -> Self {
        self.work.cited_by_api_url = Some(url.into());
        self
    }

    pub fn cited_by_count(mut self, count: u32) -> Self {
        self.work.cited_by_count = Some(count);
        self
    }

    pub fn build(self) -> Work {
        self.work
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn biblio(volume: &str, issue: Option<&str>, first: &str, last: &str) -> Biblio {
        Biblio {
            volume: Some(volume.to_string()),
            issue: issue.map(str::to_string),
            first_page: Some(first.to_string()),
            last_page: Some(last.to_string()),
        }
    }

    #[test]
    fn test_deserialize_nulls() {
        let work: Work = serde_json::from_value(json!({
            "id": "https://openalex.org/W1",
            "title": null,
            "authorships": null,
            "biblio": {"volume": "5", "issue": null, "first_page": null, "last_page": "9"},
            "related_works": null,
            "abstract_inverted_index": null
        }))
        .unwrap();

        assert!(work.title.is_none());
        assert!(work.authorships.is_empty());
        assert!(work.related_works.is_empty());
        assert!(!work.has_abstract());
        assert_eq!(work.biblio().unwrap().page_range(), "-9");
    }

    #[test]
    fn test_type_field_rename() {
        let work: Work =
            serde_json::from_value(json!({"type": "journal-article"})).unwrap();
        assert_eq!(work.declared_type().unwrap(), "journal-article");
    }

    #[test]
    fn test_venue_fallback() {
        let work: Work = serde_json::from_value(json!({
            "primary_location": {
                "landing_page_url": "https://example.org/paper",
                "source": {"display_name": "Fallback Journal"}
            }
        }))
        .unwrap();
        assert_eq!(work.venue_name(), Some("Fallback Journal"));
        assert_eq!(work.landing_page_url(), Some("https://example.org/paper"));

        let work = WorkBuilder::new("W1").venue("Host Venue").build();
        assert_eq!(work.venue_name(), Some("Host Venue"));
    }

    #[test]
    fn test_missing_fields() {
        let work = Work::default();
        assert!(matches!(work.first_author(), Err(SourceError::MissingField(f)) if f == "authorships"));
        assert!(matches!(work.biblio(), Err(SourceError::MissingField(f)) if f == "biblio"));
        assert!(matches!(work.year(), Err(SourceError::MissingField(_))));
        assert!(matches!(work.abstract_text(), Err(SourceError::MissingField(_))));
    }

    #[test]
    fn test_display_summary() {
        let work = WorkBuilder::new("https://openalex.org/W42")
            .title("A Title")
            .author("Ada Lovelace")
            .author("Charles Babbage")
            .author("Mary Somerville")
            .year(1843)
            .doi("https://doi.org/10.1/x")
            .biblio(biblio("5", Some("6"), "10", "20"))
            .cited_by_count(7)
            .build();

        assert_eq!(
            work.to_string(),
            "Ada Lovelace, Charles Babbage and Mary Somerville, A Title, 5, 6, 10-20, (1843), \
             https://doi.org/10.1/x. cited by: 7. https://openalex.org/W42"
        );
    }

    #[test]
    fn test_display_without_authors() {
        let work = WorkBuilder::new("W1")
            .title("T")
            .biblio(biblio("1", None, "1", "2"))
            .build();
        assert!(work.to_string().starts_with("(No authors), T, 1, 1-2"));
    }
}
