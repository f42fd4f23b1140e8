use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::{Result, StoriesError};
use crate::fetcher::ItemFetcher;
use crate::models::{ItemId, ItemRecord};

/// What a single failed item fetch does to the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartialFailurePolicy {
    /// Any item transport error fails the call
    #[default]
    AbortOnError,
    /// Failed items are logged and dropped like absent ones
    SkipFailed,
}

impl FromStr for PartialFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::AbortOnError),
            "skip" => Ok(Self::SkipFailed),
            other => Err(format!("unknown partial failure policy '{other}' (expected 'abort' or 'skip')")),
        }
    }
}

type FetchOutcome = (usize, ItemId, Result<Option<ItemRecord>>);

pub struct HackerNewsService {
    fetcher: ItemFetcher,
    policy: PartialFailurePolicy,
    limiter: Option<Arc<Semaphore>>,
}

impl HackerNewsService {
    pub fn new(fetcher: ItemFetcher) -> Self {
        Self {
            fetcher,
            policy: PartialFailurePolicy::default(),
            limiter: None,
        }
    }

    pub fn with_policy(mut self, policy: PartialFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Caps the number of item fetches in flight for one call.
    pub fn with_max_concurrency(mut self, permits: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(permits)));
        self
    }

    pub fn policy(&self) -> PartialFailurePolicy {
        self.policy
    }

    /// Top `count` best stories, highest score first.
    ///
    /// Only the first `count` ids of the ranking are resolved. Stories the
    /// remote no longer has are left out, so the result can be shorter than
    /// `count`. Equal scores keep their ranking order.
    pub async fn get_best_stories(&self, count: i64, cancel: &CancelToken) -> Result<Vec<ItemRecord>> {
        if count <= 0 {
            return Err(StoriesError::InvalidArgument(
                "Count must be greater than 0".to_string(),
            ));
        }
        if cancel.is_cancelled() {
            return Err(StoriesError::Cancelled);
        }

        let ranking = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StoriesError::Cancelled),
            ids = self.fetcher.api().best_story_ids() => ids?,
        };
        info!(count = ranking.len(), "Retrieved best stories");

        let take = usize::try_from(count).unwrap_or(usize::MAX).min(ranking.len());

        // Dropping the set on any early return aborts the fetches still running
        let mut tasks = JoinSet::new();
        for (rank, &id) in ranking[..take].iter().enumerate() {
            let fetcher = self.fetcher.clone();
            let limiter = self.limiter.clone();
            tasks.spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => match limiter.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        Err(e) => return (rank, id, Err(StoriesError::Internal(e.to_string()))),
                    },
                    None => None,
                };
                (rank, id, fetcher.get_item(id).await)
            });
        }

        let mut stories = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StoriesError::Cancelled),
            found = self.collect(&mut tasks) => found?,
        };

        stories.sort_by(|(rank_a, a), (rank_b, b)| b.score.cmp(&a.score).then(rank_a.cmp(rank_b)));

        Ok(stories.into_iter().map(|(_, story)| story).collect())
    }

    async fn collect(&self, tasks: &mut JoinSet<FetchOutcome>) -> Result<Vec<(usize, ItemRecord)>> {
        let mut found = Vec::with_capacity(tasks.len());

        while let Some(joined) = tasks.join_next().await {
            let (rank, id, outcome) =
                joined.map_err(|e| StoriesError::Internal(format!("Item fetch task failed: {e}")))?;

            match outcome {
                Ok(Some(story)) => found.push((rank, story)),
                Ok(None) => debug!(id, "Dropping absent story"),
                Err(err) => match self.policy {
                    PartialFailurePolicy::AbortOnError => return Err(err),
                    PartialFailurePolicy::SkipFailed => {
                        warn!(id, error = %err, "Skipping story that failed to load")
                    }
                },
            }
        }

        Ok(found)
    }
}
