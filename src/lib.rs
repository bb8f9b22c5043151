#![doc = include_str!("../README.md")]

#[macro_use]
extern crate pest_derive;

pub mod calendar;
pub mod effective;
pub mod error;
pub mod format;
pub mod store;

mod cascade;

#[cfg(test)]
mod tests;

// Public re-exports
pub use crate::calendar::{
    AdjustedCalendar, CurrentAdjustment, ForcedAdjustment, HijriDate, PossibleStart,
};
pub use crate::effective::EffectiveTable;
pub use crate::error::{Error, Result};
pub use crate::store::AdjustmentStore;
