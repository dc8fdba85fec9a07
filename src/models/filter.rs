//! Filter and sort criteria for the accumulated transaction set
//!
//! A pure value replaced wholesale whenever the user changes any field, so
//! there are no partial-update races to reason about.

use chrono::NaiveDate;

use crate::models::transaction::TxKind;

/// Status predicate: `Failed` matches everything that is not a success,
/// including pending and aborted transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Success,
    Failed,
}

impl StatusFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(StatusFilter::All),
            "success" => Some(StatusFilter::Success),
            "failed" => Some(StatusFilter::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    BlockHeight,
    #[default]
    BlockTime,
    Amount,
}

impl SortBy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "height" | "block_height" => Some(SortBy::BlockHeight),
            "time" | "block_time" | "date" => Some(SortBy::BlockTime),
            "amount" => Some(SortBy::Amount),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

/// Multi-criterion filter over the accumulated set
///
/// Amount bounds are in STX and apply to token transfers only; every other
/// kind passes the amount check regardless of the bounds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterCriteria {
    /// `None` means all kinds
    pub kind: Option<TxKind>,
    pub status: StatusFilter,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl FilterCriteria {
    /// True when any narrowing filter is set (sorting alone does not count)
    pub fn is_active(&self) -> bool {
        self.kind.is_some()
            || self.status != StatusFilter::All
            || self.date_from.is_some()
            || self.date_to.is_some()
            || self.min_amount.is_some()
            || self.max_amount.is_some()
    }
}
