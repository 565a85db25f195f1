//! Citation formatting.
//!
//! Supports BibTeX and RIS. Both formatters are pure functions over a
//! [`Work`]; they never touch the network.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Work;
use crate::sources::SourceError;

/// The only record type RIS output supports
pub const RIS_JOURNAL_ARTICLE: &str = "journal-article";

const DOI_URL_PREFIX: &str = "https://doi.org/";

/// Citation entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// BibTeX
    Bibtex,
    /// RIS
    Ris,
}

/// Rejected entry type name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Inappropriate entry type {0:?} provided, please provide either 'bibtex' or 'ris'")]
pub struct EntryTypeError(pub String);

impl FromStr for EntryType {
    type Err = EntryTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bibtex" => Ok(EntryType::Bibtex),
            "ris" => Ok(EntryType::Ris),
            other => Err(EntryTypeError(other.to_string())),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryType::Bibtex => write!(f, "bibtex"),
            EntryType::Ris => write!(f, "ris"),
        }
    }
}

/// Which BibTeX fields to emit
///
/// Every field is on by default; a field whose value is absent from the
/// record is skipped regardless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BibtexOptions {
    pub include_abstract: bool,
    pub author: bool,
    pub title: bool,
    pub journal: bool,
    pub volume: bool,
    pub number: bool,
    pub pages: bool,
    pub year: bool,
    pub doi: bool,
    pub url: bool,
    pub eprint: bool,
    /// Emit `10.x/y` instead of `https://doi.org/10.x/y`
    pub strip_doi_prefix: bool,
}

impl Default for BibtexOptions {
    fn default() -> Self {
        Self {
            include_abstract: true,
            author: true,
            title: true,
            journal: true,
            volume: true,
            number: true,
            pages: true,
            year: true,
            doi: true,
            url: true,
            eprint: true,
            strip_doi_prefix: false,
        }
    }
}

/// Format a work in the requested entry type with default options
pub fn format_entry(work: &Work, entry_type: EntryType) -> Result<String, SourceError> {
    match entry_type {
        EntryType::Bibtex => format_bibtex(work, &BibtexOptions::default()),
        EntryType::Ris => format_ris(work),
    }
}

/// Citation key: last word of the first author's name followed by the year
pub fn bibtex_key(work: &Work) -> Result<String, SourceError> {
    let last_name = work
        .first_author()?
        .split_whitespace()
        .last()
        .ok_or_else(|| SourceError::missing("authorships[0].author.display_name"))?;
    Ok(format!("{}{}", last_name, work.year()?))
}

/// Generate a BibTeX entry
///
/// Format:
/// ```text
/// @journal-article{Kitchin2015,
///  URL = {https://doi.org/10.1021/acscatal.5b00538},
///  author = {John R. Kitchin},
///  ...
///  year = {2015}
/// }
/// ```
/// Fields appear in a fixed order: URL, abstract, author, doi, eprint,
/// journal, number, pages, title, volume, year.
pub fn format_bibtex(work: &Work, options: &BibtexOptions) -> Result<String, SourceError> {
    let key = bibtex_key(work)?;
    let entry_type = work.declared_type()?;
    let biblio = work.biblio()?;
    let landing_page = work.landing_page_url();

    let mut fields: Vec<(&str, String)> = Vec::new();

    if options.url {
        if let Some(url) = landing_page {
            fields.push(("URL", url.to_string()));
        }
    }
    if options.include_abstract && work.has_abstract() {
        fields.push(("abstract", work.abstract_text()?));
    }
    if options.author {
        fields.push(("author", work.author_names().join(", ")));
    }
    if options.doi {
        if let Some(doi) = work.doi.as_deref() {
            let doi = if options.strip_doi_prefix {
                doi.strip_prefix(DOI_URL_PREFIX).unwrap_or(doi)
            } else {
                doi
            };
            fields.push(("doi", doi.to_string()));
        }
    }
    if options.eprint {
        if let Some(url) = landing_page {
            fields.push(("eprint", url.to_string()));
        }
    }
    if options.journal {
        if let Some(venue) = work.venue_name() {
            fields.push(("journal", venue.to_string()));
        }
    }
    if options.number {
        if let Some(issue) = biblio.issue.as_deref() {
            fields.push(("number", issue.to_string()));
        }
    }
    if options.pages {
        fields.push(("pages", biblio.page_range()));
    }
    if options.title {
        if let Some(title) = work.title.as_deref() {
            fields.push(("title", title.to_string()));
        }
    }
    if options.volume {
        if let Some(volume) = biblio.volume.as_deref() {
            fields.push(("volume", volume.to_string()));
        }
    }
    if options.year {
        fields.push(("year", work.year()?.to_string()));
    }

    let body = fields
        .iter()
        .map(|(name, value)| format!(" {} = {{{}}}", name, value))
        .collect::<Vec<_>>()
        .join(",\n");

    let mut entry = format!("@{}{{{},\n", entry_type, key);
    if !body.is_empty() {
        entry.push_str(&body);
        entry.push('\n');
    }
    entry.push_str("}\n");
    Ok(entry)
}

fn ris_line(tag: &str, value: impl fmt::Display) -> String {
    format!("{}  - {}", tag, value)
}

/// Generate an RIS entry
///
/// Only `journal-article` records are supported. `SP` and `EP` are always
/// written and carry an empty value when the record has no page numbers.
pub fn format_ris(work: &Work) -> Result<String, SourceError> {
    let work_type = work.declared_type()?;
    if work_type != RIS_JOURNAL_ARTICLE {
        return Err(SourceError::UnsupportedType(work_type.to_string()));
    }
    let biblio = work.biblio()?;

    let mut lines = vec![ris_line("TY", "JOUR")];
    lines.extend(work.author_names().into_iter().map(|a| ris_line("AU", a)));
    lines.push(ris_line(
        "PY",
        work.publication_year
            .map(|y| y.to_string())
            .unwrap_or_default(),
    ));
    lines.push(ris_line("TI", work.title.as_deref().unwrap_or_default()));
    lines.push(ris_line("JO", work.venue_name().unwrap_or_default()));
    lines.push(ris_line("VL", biblio.volume.as_deref().unwrap_or_default()));
    if let Some(issue) = biblio.issue.as_deref().filter(|i| !i.is_empty()) {
        lines.push(ris_line("IS", issue));
    }
    lines.push(ris_line("SP", biblio.first_page.as_deref().unwrap_or_default()));
    lines.push(ris_line("EP", biblio.last_page.as_deref().unwrap_or_default()));
    lines.push(ris_line("DO", work.doi.as_deref().unwrap_or_default()));
    lines.push("ER  -".to_string());

    Ok(lines.join("\n"))
}
