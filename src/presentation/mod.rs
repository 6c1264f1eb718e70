//! Presentation layer - display strings, color classes and cards

mod cards;
mod format;

pub use cards::{CardChange, CommodityCard};
pub use format::{format_change, format_price, freshness_text, ColorClass};
