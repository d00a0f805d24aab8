use crate::model::wire;
use serde::Serialize;
use std::fmt::Display;
use std::num::NonZeroU64;

/// A validated request for one food item at one numbered table.
///
/// Orders are only ever produced by [`validate`](crate::validation::validate); the fields
/// are private so an `Order` cannot change after it passes validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    food: String,
    table: NonZeroU64,
}

impl Order {
    /// Creates an order from already-checked parts. `food` must be trimmed and non-empty.
    pub(crate) fn new(food: impl Into<String>, table: NonZeroU64) -> Self {
        Self {
            food: food.into(),
            table,
        }
    }

    pub fn food(&self) -> &str {
        &self.food
    }

    pub fn table(&self) -> u64 {
        self.table.get()
    }

    /// Encodes the delivery notification: the same `{"food": ..., "table": ...}` object
    /// the order arrived as.
    pub fn to_payload(&self) -> Result<Vec<u8>, serde_json::Error> {
        wire::to_vec(self)
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} for table {}", self.food, self.table)
    }
}
