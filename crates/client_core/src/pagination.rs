use std::{fmt, str::FromStr};

use thiserror::Error;

/// Rows per page. `All` travels over the wire as `limit=0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    Limit(u32),
    All,
}

impl PageSize {
    /// The sizes offered by the page-size selector.
    pub const CHOICES: [PageSize; 5] = [
        PageSize::Limit(10),
        PageSize::Limit(20),
        PageSize::Limit(50),
        PageSize::Limit(100),
        PageSize::All,
    ];

    pub fn from_limit(limit: u32) -> Self {
        if limit == 0 {
            Self::All
        } else {
            Self::Limit(limit)
        }
    }

    pub fn limit(self) -> u32 {
        match self {
            Self::Limit(limit) => limit,
            Self::All => 0,
        }
    }

    pub fn is_all(self) -> bool {
        matches!(self, Self::All)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::Limit(crate::normalize::DEFAULT_LIMIT)
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limit(limit) => write!(f, "{limit}/page"),
            Self::All => f.write_str("all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page size must be one of 10, 20, 50, 100 or all; got '{0}'")]
pub struct InvalidPageSize(pub String);

impl FromStr for PageSize {
    type Err = InvalidPageSize;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let parsed = if raw.eq_ignore_ascii_case("all") {
            Some(Self::All)
        } else {
            raw.parse::<u32>().ok().map(Self::from_limit)
        };
        parsed
            .filter(|size| Self::CHOICES.contains(size))
            .ok_or_else(|| InvalidPageSize(raw.to_string()))
    }
}

/// What the pager under a table shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    pub current: u32,
    pub page_size: PageSize,
    pub total: u64,
    pub rows_on_page: usize,
}

impl Pager {
    /// For `All` a page is as tall as the rows actually rendered.
    pub fn effective_page_size(&self) -> u64 {
        match self.page_size {
            PageSize::Limit(limit) => u64::from(limit.max(1)),
            PageSize::All => (self.rows_on_page as u64).max(1),
        }
    }

    pub fn total_pages(&self) -> u32 {
        let pages = self.total.div_ceil(self.effective_page_size()).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn is_hidden(&self) -> bool {
        self.page_size.is_all() && self.total_pages() <= 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    /// 1-based position of the `index`-th row of this page within the whole list.
    pub fn row_number(&self, index: usize) -> u64 {
        let offset = u64::from(self.current.saturating_sub(1)) * u64::from(self.page_size.limit().max(1));
        offset + index as u64 + 1
    }
}

impl fmt::Display for Pager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} of {} ({} total, {})",
            self.current,
            self.total_pages(),
            self.total,
            self.page_size
        )
    }
}

/// Client-side paging over an already-fetched list.
pub fn paginate<T>(rows: &[T], page: u32, page_size: u32) -> &[T] {
    if page_size == 0 {
        return rows;
    }
    let size = page_size as usize;
    let start = (page.max(1) as usize - 1).saturating_mul(size);
    if start >= rows.len() {
        return &[];
    }
    let end = (start + size).min(rows.len());
    &rows[start..end]
}
