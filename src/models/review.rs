//! Product review entity

use serde::{Deserialize, Serialize};

/// A posted product review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub name: String,
    /// 1..=5 stars
    pub rating: u8,
    pub comment: String,
    pub created_at: i64,
}
