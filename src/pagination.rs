use serde::Serialize;

/// Page size used by list endpoints when the caller does not ask for one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 20;

/// Number of page links rendered on each side of the current page.
const PAGE_WINDOW: usize = 2;

/// Offset/limit pair requested by a list query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Row offset of the first item on the page.
    pub fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) * self.per_page) as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// One page of results together with the page links to show next to it.
///
/// `pages` holds the page numbers around the current one; `None` marks a gap
/// between non-adjacent numbers.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub pages: Vec<Option<usize>>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: usize, total_pages: usize) -> Self {
        Self {
            items,
            page,
            pages: page_links(page, total_pages),
        }
    }
}

fn page_links(page: usize, total_pages: usize) -> Vec<Option<usize>> {
    let mut links = Vec::new();
    let mut previous = 0;

    for number in 1..=total_pages {
        let near_current = number + PAGE_WINDOW >= page && number <= page + PAGE_WINDOW;
        if number == 1 || number == total_pages || near_current {
            if previous != 0 && number > previous + 1 {
                links.push(None);
            }
            links.push(Some(number));
            previous = number;
        }
    }

    links
}
