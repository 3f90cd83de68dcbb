//! Domain types for signalbars

pub mod candle;
pub mod event;
pub mod interval;
pub mod point;
pub mod time_format;

pub use candle::Candle;
pub use event::{Event, Operation, UnknownOperation, UNKNOWN_WALLET};
pub use interval::{Interval, InvalidIntervalError};
pub use point::PricePoint;
