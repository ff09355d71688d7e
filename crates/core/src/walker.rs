//! Pagination walk over the components listing

use crate::client::ComponentSource;
use crate::component::Component;
use crate::error::{Error, Result};
use tracing::{debug, info};

/// Query parameter carrying the continuation token
const TOKEN_PARAM: &str = "continuationToken";

/// Optional ceiling on the number of pages a walk may request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLimit(Option<usize>);

impl PageLimit {
    /// No ceiling
    pub const UNBOUNDED: PageLimit = PageLimit(None);

    /// Stop after at most `pages` requests
    pub fn at_most(pages: usize) -> Self {
        Self(Some(pages))
    }

    /// Build from an optional configured value
    pub fn from_option(pages: Option<usize>) -> Self {
        Self(pages)
    }

    fn reached(&self, fetched: usize) -> bool {
        matches!(self.0, Some(max) if fetched >= max)
    }
}

/// Build the request URL for one page.
///
/// The token parameter is always appended, with an empty value on the first
/// request. The token itself is forwarded verbatim.
pub fn page_url(listing_url: &str, token: &str) -> String {
    format!("{}&{}={}", listing_url, TOKEN_PARAM, token)
}

/// Fetch every page of `listing_url` and return all records in page order.
///
/// Any fetch failure aborts the walk and nothing collected so far is returned.
pub async fn walk<S>(source: &S, listing_url: &str, limit: PageLimit) -> Result<Vec<Component>>
where
    S: ComponentSource + ?Sized,
{
    let mut records = Vec::new();
    let mut token = String::new();
    let mut pages = 0usize;

    loop {
        let url = page_url(listing_url, &token);
        let page = source.fetch_page(&url).await?;
        pages += 1;

        debug!(url = %url, page = pages, records = page.records.len(), "fetched page");
        records.extend(page.records);

        match page.next_token {
            None => break,
            Some(_) if limit.reached(pages) => return Err(Error::PageLimitExceeded(pages)),
            Some(next) => token = next,
        }
    }

    info!(pages, records = records.len(), "listing complete");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{page, ScriptedSource};

    const LISTING: &str = "http://nexus/service/rest/v1/components?repository=r";

    #[test]
    fn test_page_url_first_request_has_empty_token() {
        assert_eq!(
            page_url(LISTING, ""),
            "http://nexus/service/rest/v1/components?repository=r&continuationToken="
        );
    }

    #[test]
    fn test_page_url_forwards_token_verbatim() {
        assert_eq!(
            page_url(LISTING, "88491cd1d185dd136f143f20c4e7d50c"),
            format!("{}&continuationToken=88491cd1d185dd136f143f20c4e7d50c", LISTING)
        );
    }

    #[tokio::test]
    async fn test_walk_concatenates_pages_in_order() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[("a", 10, "x/1")], Some("tok1"))),
            Ok(page(&[("b", 20, "y/2"), ("c", 5, "y/3")], Some("tok2"))),
            Ok(page(&[("d", 1, "z/4")], None)),
        ]);

        let records = walk(&source, LISTING, PageLimit::UNBOUNDED).await.unwrap();

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(source.fetched_urls().len(), 3);
    }

    #[tokio::test]
    async fn test_walk_threads_tokens_through_requests() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[("a", 10, "x/1")], Some("tok1"))),
            Ok(page(&[("b", 20, "y/2")], None)),
        ]);

        walk(&source, LISTING, PageLimit::UNBOUNDED).await.unwrap();

        assert_eq!(
            source.fetched_urls(),
            vec![
                format!("{}&continuationToken=", LISTING),
                format!("{}&continuationToken=tok1", LISTING),
            ]
        );
    }

    #[tokio::test]
    async fn test_walk_empty_repository() {
        let source = ScriptedSource::new(vec![Ok(page(&[], None))]);

        let records = walk(&source, LISTING, PageLimit::UNBOUNDED).await.unwrap();

        assert!(records.is_empty());
        assert_eq!(source.fetched_urls().len(), 1);
    }

    #[tokio::test]
    async fn test_walk_keeps_duplicates() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[("a", 10, "x/1")], Some("t"))),
            Ok(page(&[("a", 10, "x/1")], None)),
        ]);

        let records = walk(&source, LISTING, PageLimit::UNBOUNDED).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_walk_fails_as_a_unit() {
        let second = format!("{}&continuationToken=tok1", LISTING);
        let source = ScriptedSource::new(vec![
            Ok(page(&[("a", 10, "x/1")], Some("tok1"))),
            Err(Error::fetch(second.clone(), "connection reset")),
        ]);

        let err = walk(&source, LISTING, PageLimit::UNBOUNDED).await.unwrap_err();

        match err {
            Error::Fetch { url, .. } => assert_eq!(url, second),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_page_limit_stops_walk() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[("a", 1, "p/a")], Some("t1"))),
            Ok(page(&[("b", 1, "p/b")], Some("t2"))),
            Ok(page(&[("c", 1, "p/c")], None)),
        ]);

        let err = walk(&source, LISTING, PageLimit::at_most(2)).await.unwrap_err();

        assert!(matches!(err, Error::PageLimitExceeded(2)));
        assert_eq!(source.fetched_urls().len(), 2);
    }

    #[tokio::test]
    async fn test_page_limit_not_hit() {
        let source = ScriptedSource::new(vec![
            Ok(page(&[("a", 1, "p/a")], Some("t1"))),
            Ok(page(&[("b", 1, "p/b")], None)),
        ]);

        let records = walk(&source, LISTING, PageLimit::at_most(2)).await.unwrap();
        assert_eq!(records.len(), 2);
    }
}
