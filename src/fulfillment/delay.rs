//! Preparation delay sources.
//!
//! [`UniformDelay`] is what the kitchen uses in production. [`FixedDelay`] and
//! [`MenuDelay`] make the delay predictable, which is what tests need to assert
//! completion order.

use crate::fulfillment::InvalidDelayBounds;
use crate::model::Order;
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_MIN_PREP_SECS: f64 = 3.0;
pub const DEFAULT_MAX_PREP_SECS: f64 = 10.0;

/// Decides how long an order takes to prepare.
pub trait DelaySource: Send + Sync {
    fn next_delay(&self, order: &Order) -> Duration;
}

/// Samples uniformly from the closed interval `[min_secs, max_secs]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UniformDelay {
    min_secs: f64,
    max_secs: f64,
}

impl UniformDelay {
    pub fn new(min_secs: f64, max_secs: f64) -> Result<Self, InvalidDelayBounds> {
        let valid = min_secs.is_finite()
            && max_secs.is_finite()
            && min_secs >= 0.0
            && min_secs <= max_secs;
        if !valid {
            return Err(InvalidDelayBounds {
                min: min_secs,
                max: max_secs,
            });
        }
        Ok(Self { min_secs, max_secs })
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.min_secs, self.max_secs)
    }

    pub fn sample_secs(&self) -> f64 {
        rand::rng().random_range(self.min_secs..=self.max_secs)
    }
}

impl Default for UniformDelay {
    fn default() -> Self {
        Self {
            min_secs: DEFAULT_MIN_PREP_SECS,
            max_secs: DEFAULT_MAX_PREP_SECS,
        }
    }
}

impl DelaySource for UniformDelay {
    fn next_delay(&self, _order: &Order) -> Duration {
        Duration::from_secs_f64(self.sample_secs())
    }
}

/// The same delay for every order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl DelaySource for FixedDelay {
    fn next_delay(&self, _order: &Order) -> Duration {
        self.0
    }
}

/// A delay per dish, with a fallback for anything not on the menu.
#[derive(Debug, Clone, Default)]
pub struct MenuDelay {
    dishes: HashMap<String, Duration>,
    fallback: Duration,
}

impl MenuDelay {
    pub fn new(fallback: Duration) -> Self {
        Self {
            dishes: HashMap::new(),
            fallback,
        }
    }

    pub fn dish(mut self, food: impl Into<String>, delay: Duration) -> Self {
        self.dishes.insert(food.into(), delay);
        self
    }
}

impl DelaySource for MenuDelay {
    fn next_delay(&self, order: &Order) -> Duration {
        self.dishes
            .get(order.food())
            .copied()
            .unwrap_or(self.fallback)
    }
}
