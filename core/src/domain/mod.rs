//! Domain layer: entities and the injectable clock.

pub mod clock;
pub mod entities;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entities::*;
