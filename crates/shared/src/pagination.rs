use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: u64 = 6;
pub const MAX_PAGE_SIZE: u64 = 100;

/// `?page=&limit=` query arguments, one-based.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageArgs {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PageArgs {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: Some(page),
            limit: Some(limit),
        }
    }

    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn size(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Saturates on absurd page numbers, which [`PageArgs::ensure_in_range`] then rejects.
    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.size())
    }

    /// A page beyond the last one is not found, page 1 always exists.
    pub fn ensure_in_range(&self, count: u64) -> crate::Result<()> {
        if self.page() > 1 && self.offset() >= count {
            crate::not_found!("invalid page");
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<u64>,
    pub previous: Option<u64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(args: &PageArgs, count: u64, results: Vec<T>) -> Self {
        let page = args.page();
        let next = (page.saturating_mul(args.size()) < count).then(|| page.saturating_add(1));
        let previous = (page > 1).then(|| page - 1);

        Self {
            count,
            next,
            previous,
            results,
        }
    }

    pub fn empty() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: vec![],
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}
