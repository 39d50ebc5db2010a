//! Page-number pagination for post lists
//!
//! Pages are 1-based. `?page=last` jumps to the final page. A result set with
//! no rows still has one, empty, page; anything outside `1..=num_pages` is a
//! not-found.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Posts per list page.
pub const PAGE_SIZE: i64 = 10;

/// Query string accepted by list pages.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Requested page, before it is checked against the result size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    Number(i64),
    Last,
}

impl PageRequest {
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        match raw.map(str::trim) {
            None | Some("") => Ok(PageRequest::Number(1)),
            Some("last") => Ok(PageRequest::Last),
            Some(value) => value
                .parse::<i64>()
                .map(PageRequest::Number)
                .map_err(|_| AppError::NotFound(format!("Invalid page '{value}'"))),
        }
    }
}

impl TryFrom<&PageQuery> for PageRequest {
    type Error = AppError;

    fn try_from(query: &PageQuery) -> Result<Self> {
        PageRequest::parse(query.page.as_deref())
    }
}

/// Splits `count` rows into pages of `per_page`.
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    count: i64,
    per_page: i64,
}

impl Paginator {
    pub fn new(count: i64, per_page: i64) -> Self {
        Self {
            count: count.max(0),
            per_page: per_page.max(1),
        }
    }

    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    pub fn num_pages(&self) -> i64 {
        if self.count == 0 {
            1
        } else {
            (self.count + self.per_page - 1) / self.per_page
        }
    }

    /// Resolve a request to a concrete page number, or not-found.
    pub fn resolve(&self, request: PageRequest) -> Result<i64> {
        let number = match request {
            PageRequest::Last => self.num_pages(),
            PageRequest::Number(n) => n,
        };
        if number < 1 || number > self.num_pages() {
            return Err(AppError::NotFound(format!(
                "Page {number} does not exist"
            )));
        }
        Ok(number)
    }

    pub fn offset(&self, number: i64) -> i64 {
        (number - 1) * self.per_page
    }
}

/// One page of results plus the navigation metadata list templates use.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub number: i64,
    pub num_pages: i64,
    pub count: i64,
    pub has_next: bool,
    pub has_previous: bool,
    pub object_list: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(object_list: Vec<T>, number: i64, paginator: &Paginator) -> Self {
        let num_pages = paginator.num_pages();
        Self {
            number,
            num_pages,
            count: paginator.count(),
            has_next: number < num_pages,
            has_previous: number > 1,
            object_list,
        }
    }
}
