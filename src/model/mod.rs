//! Pure data structures: the validated [`Order`] and its wire encoding.

pub mod order;
pub mod wire;

pub use order::*;
