//! Lazy issue pagination

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::{Issue, IssueQuery};

enum Cursor {
    Start,
    Next(String),
    Done,
}

/// Lazy, finite sequence of issue pages
///
/// Each call to [`IssuePages::next_page`] performs exactly one listing
/// request. The sequence cannot be restarted; create a new one instead.
pub struct IssuePages<'a> {
    platform: &'a dyn PlatformService,
    query: IssueQuery,
    cursor: Cursor,
}

impl<'a> IssuePages<'a> {
    /// Start a new pagination over `query`
    pub fn new(platform: &'a dyn PlatformService, query: IssueQuery) -> Self {
        Self {
            platform,
            query,
            cursor: Cursor::Start,
        }
    }

    /// Fetch the next page, or `None` once the listing is exhausted
    pub async fn next_page(&mut self) -> Result<Option<Vec<Issue>>> {
        let cursor = std::mem::replace(&mut self.cursor, Cursor::Done);
        let page = match cursor {
            Cursor::Done => return Ok(None),
            Cursor::Start => self.platform.list_issues(&self.query, None).await?,
            Cursor::Next(url) => self.platform.list_issues(&self.query, Some(&url)).await?,
        };

        if let Some(next) = page.next {
            self.cursor = Cursor::Next(next);
        }
        Ok(Some(page.items))
    }
}
