//! List and delete actions over a full repository walk

use crate::aggregate::{aggregate, Aggregate, PathFilter};
use crate::client::ComponentSource;
use crate::component::Component;
use crate::error::{Error, Result};
use crate::walker::{walk, PageLimit};
use tracing::{info, warn};

/// Progress of a delete sweep, reported once per step
#[derive(Debug)]
pub enum DeleteEvent<'a> {
    /// About to issue the DELETE call
    Deleting { component: &'a Component, url: String },
    /// The remote confirmed the deletion
    Deleted { component: &'a Component },
    /// The DELETE call failed; the sweep carries on
    Failed { component: &'a Component, error: &'a Error },
}

/// Outcome of a delete sweep
#[derive(Debug, Default)]
pub struct DeleteSummary {
    pub attempted: usize,
    /// Confirmed deletions only
    pub deleted: usize,
    /// Size of confirmed deletions only
    pub deleted_size: u64,
    pub failures: Vec<Error>,
}

impl DeleteSummary {
    /// True when every attempted delete succeeded
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs the list and delete actions against one component source
pub struct Sweeper<'a, S: ComponentSource + ?Sized> {
    source: &'a S,
    limit: PageLimit,
}

impl<'a, S: ComponentSource + ?Sized> Sweeper<'a, S> {
    /// Create a sweeper over `source`
    pub fn new(source: &'a S, limit: PageLimit) -> Self {
        Self { source, limit }
    }

    /// Every component in `repository`
    pub async fn list(&self, repository: &str) -> Result<Aggregate> {
        self.plan(repository, None).await
    }

    /// Components in `repository` whose path matches `filter`
    pub async fn list_with_filter(&self, repository: &str, filter: &PathFilter) -> Result<Aggregate> {
        self.plan(repository, Some(filter)).await
    }

    /// Walk `repository` and aggregate it, without side effects.
    ///
    /// `matched` holds the components a delete sweep with the same filter
    /// would remove.
    pub async fn plan(&self, repository: &str, filter: Option<&PathFilter>) -> Result<Aggregate> {
        let listing_url = self.source.listing_url(repository);
        let records = walk(self.source, &listing_url, self.limit).await?;
        Ok(aggregate(&records, filter))
    }

    /// Delete every component in `repository`
    pub async fn delete<F>(&self, repository: &str, observer: F) -> Result<DeleteSummary>
    where
        F: FnMut(DeleteEvent<'_>),
    {
        let plan = self.plan(repository, None).await?;
        Ok(self.delete_records(&plan.matched, observer).await)
    }

    /// Delete the components in `repository` whose path matches `filter`
    pub async fn delete_with_filter<F>(
        &self,
        repository: &str,
        filter: &PathFilter,
        observer: F,
    ) -> Result<DeleteSummary>
    where
        F: FnMut(DeleteEvent<'_>),
    {
        let plan = self.plan(repository, Some(filter)).await?;
        Ok(self.delete_records(&plan.matched, observer).await)
    }

    /// Delete `records` one by one, in order.
    ///
    /// A failed delete is reported and does not stop the sweep.
    pub async fn delete_records<F>(&self, records: &[Component], mut observer: F) -> DeleteSummary
    where
        F: FnMut(DeleteEvent<'_>),
    {
        let mut summary = DeleteSummary::default();

        for component in records {
            observer(DeleteEvent::Deleting {
                component,
                url: self.source.component_url(&component.id),
            });
            summary.attempted += 1;

            match self.source.delete_component(&component.id).await {
                Ok(()) => {
                    summary.deleted += 1;
                    summary.deleted_size += component.file_size;
                    observer(DeleteEvent::Deleted { component });
                }
                Err(error) => {
                    warn!(id = %component.id, path = %component.path, %error, "delete failed");
                    observer(DeleteEvent::Failed {
                        component,
                        error: &error,
                    });
                    summary.failures.push(error);
                }
            }
        }

        info!(
            attempted = summary.attempted,
            deleted = summary.deleted,
            failed = summary.failures.len(),
            "delete sweep finished"
        );
        summary
    }
}
