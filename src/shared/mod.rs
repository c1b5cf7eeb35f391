//! Shared value types used by every chrome component

pub mod geometry;

pub use geometry::{Point, Rect, Size};
