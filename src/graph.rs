//! One-hop traversal of the citation graph.
//!
//! [`WorkGraph`] resolves the works linked from a record: its related works,
//! the works it references, and the works citing it. Each linked identifier
//! costs one request; requests are made one at a time and each is followed by
//! a fixed pause.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::config::ThrottleConfig;
use crate::models::{Work, WorkId};
use crate::sources::{SourceError, WorkSource};
use crate::utils::{SleepThrottle, Throttle};

/// Kind of link followed from a work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hop {
    /// `related_works`
    Related,
    /// works listed by `cited_by_api_url`
    Citing,
    /// `referenced_works`
    References,
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hop::Related => write!(f, "related"),
            Hop::Citing => write!(f, "citing"),
            Hop::References => write!(f, "references"),
        }
    }
}

/// Pause after each fetch, per hop kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopDelays {
    pub related: Duration,
    pub citing: Duration,
    pub references: Duration,
}

impl HopDelays {
    pub fn for_hop(&self, hop: Hop) -> Duration {
        match hop {
            Hop::Related => self.related,
            Hop::Citing => self.citing,
            Hop::References => self.references,
        }
    }
}

impl Default for HopDelays {
    fn default() -> Self {
        Self::from(&ThrottleConfig::default())
    }
}

impl From<&ThrottleConfig> for HopDelays {
    fn from(config: &ThrottleConfig) -> Self {
        Self {
            related: Duration::from_millis(config.related_delay_ms),
            citing: Duration::from_millis(config.citing_delay_ms),
            references: Duration::from_millis(config.references_delay_ms),
        }
    }
}

/// Fetches works and their one-hop neighbours from a [`WorkSource`]
#[derive(Debug, Clone)]
pub struct WorkGraph {
    source: Arc<dyn WorkSource>,
    throttle: Arc<dyn Throttle>,
    delays: HopDelays,
}

impl WorkGraph {
    /// Create a graph that sleeps with the default delays
    pub fn new(source: Arc<dyn WorkSource>) -> Self {
        Self {
            source,
            throttle: Arc::new(SleepThrottle),
            delays: HopDelays::default(),
        }
    }

    pub fn with_throttle(mut self, throttle: Arc<dyn Throttle>) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn with_delays(mut self, delays: HopDelays) -> Self {
        self.delays = delays;
        self
    }

    pub fn delays(&self) -> HopDelays {
        self.delays
    }

    /// Fetch a single work by identifier or URL
    pub async fn fetch(&self, id: &str) -> Result<Work, SourceError> {
        let id = WorkId::parse(id)?;
        debug!(source = self.source.id(), %id, "fetching work");
        self.source.get_work(&id).await
    }

    /// Works OpenAlex lists as related to `work`
    pub async fn related_works(&self, work: &Work) -> Result<Vec<Work>, SourceError> {
        self.resolve_all(Hop::Related, &work.related_works).await
    }

    /// Works that `work` cites
    pub async fn referenced_works(&self, work: &Work) -> Result<Vec<Work>, SourceError> {
        self.resolve_all(Hop::References, &work.referenced_works).await
    }

    /// Works citing `work`, from the first page of its cited-by listing
    pub async fn citing_works(&self, work: &Work) -> Result<Vec<Work>, SourceError> {
        let url = work
            .cited_by_api_url
            .as_deref()
            .ok_or_else(|| SourceError::missing("cited_by_api_url"))?;
        let page = self.source.get_cited_by(url).await?;
        let ids: Vec<String> = page.results.into_iter().map(|r| r.id).collect();
        self.resolve_all(Hop::Citing, &ids).await
    }

    /// Follow one kind of link from `work`
    pub async fn hop(&self, work: &Work, hop: Hop) -> Result<Vec<Work>, SourceError> {
        match hop {
            Hop::Related => self.related_works(work).await,
            Hop::Citing => self.citing_works(work).await,
            Hop::References => self.referenced_works(work).await,
        }
    }

    /// Fetch every id in order, pausing after each. The first failure aborts.
    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn resolve_all(&self, hop: Hop, ids: &[String]) -> Result<Vec<Work>, SourceError> {
        let delay = self.delays.for_hop(hop);
        let mut works = Vec::with_capacity(ids.len());

        for id in ids {
            works.push(self.fetch(id).await?);
            self.throttle.pause(delay).await;
        }

        info!(%hop, resolved = works.len(), "resolved linked works");
        Ok(works)
    }
}
