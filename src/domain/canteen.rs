use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::pagination::Pagination;

/// A facility that sends or receives supply orders.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Canteen {
    pub id: i32,
    pub address: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCanteen {
    pub address: String,
}

impl NewCanteen {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into().trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateCanteen {
    pub address: String,
    pub updated_at: NaiveDateTime,
}

/// Query definition used to list canteens.
#[derive(Debug, Clone, Default)]
pub struct CanteenListQuery {
    /// Substring matched against the address.
    pub search: Option<String>,
    pub pagination: Option<Pagination>,
}

impl CanteenListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}
