//! Dual resource budget: free allocation points and costly respec points.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// RespecLimit
// ---------------------------------------------------------------------------

/// Capacity of the respec budget.
///
/// Serialized as a plain integer, or as the string `"unlimited"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RespecLimitRepr", into = "RespecLimitRepr")]
pub enum RespecLimit {
    Limited(u32),
    Unlimited,
}

impl Default for RespecLimit {
    fn default() -> Self {
        Self::Limited(0)
    }
}

impl fmt::Display for RespecLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Limited(n) => write!(f, "{n}"),
            Self::Unlimited => f.write_str("unlimited"),
        }
    }
}

impl FromStr for RespecLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("unlimited") {
            return Ok(Self::Unlimited);
        }
        trimmed.parse::<u32>().map(Self::Limited).map_err(|_| {
            format!("Invalid respec budget: {s}. Must be a non-negative integer or \"unlimited\"")
        })
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RespecLimitRepr {
    Count(u32),
    Text(String),
}

impl TryFrom<RespecLimitRepr> for RespecLimit {
    type Error = String;

    fn try_from(repr: RespecLimitRepr) -> Result<Self, Self::Error> {
        match repr {
            RespecLimitRepr::Count(n) => Ok(Self::Limited(n)),
            RespecLimitRepr::Text(text) => text.parse(),
        }
    }
}

impl From<RespecLimit> for RespecLimitRepr {
    fn from(limit: RespecLimit) -> Self {
        match limit {
            RespecLimit::Limited(n) => Self::Count(n),
            RespecLimit::Unlimited => Self::Text("unlimited".to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// BudgetConfig
// ---------------------------------------------------------------------------

/// Budget capacities supplied by the caller for one optimization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BudgetConfig {
    /// Free points that may still be allocated.
    #[serde(default)]
    pub unallocated: u32,

    /// Respec points available for swaps.
    #[serde(default)]
    pub respec: RespecLimit,
}

impl BudgetConfig {
    pub const fn new(unallocated: u32, respec: RespecLimit) -> Self {
        Self { unallocated, respec }
    }
}

// ---------------------------------------------------------------------------
// BudgetState
// ---------------------------------------------------------------------------

/// The four budget counters. `used <= available` holds at all times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetState {
    pub unallocated_used: u32,
    pub unallocated_available: u32,
    pub respec_used: u32,
    pub respec_available: RespecLimit,
}

impl BudgetState {
    pub const fn from_config(config: BudgetConfig) -> Self {
        Self {
            unallocated_used: 0,
            unallocated_available: config.unallocated,
            respec_used: 0,
            respec_available: config.respec,
        }
    }
}

// ---------------------------------------------------------------------------
// BudgetSummary
// ---------------------------------------------------------------------------

/// Free/costly breakdown of budget usage for reporting.
///
/// Displays as `"15/15 unallocated (FREE), 4/12 respec"` or
/// `"3/15 unallocated (FREE), 4/unlimited respec"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub unallocated_used: u32,
    pub unallocated_available: u32,
    pub respec_used: u32,
    /// `None` when the respec budget is unlimited.
    pub respec_available: Option<u32>,
}

impl fmt::Display for BudgetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} unallocated (FREE), ",
            self.unallocated_used, self.unallocated_available
        )?;
        match self.respec_available {
            Some(available) => write!(f, "{}/{available} respec", self.respec_used),
            None => write!(f, "{}/unlimited respec", self.respec_used),
        }
    }
}
