pub mod events;
pub mod ports;
pub mod quantity;
pub mod units;

pub use events::*;
pub use ports::*;
pub use quantity::*;
pub use units::{BaseUnit, CompoundUnit, Scale, Unit};
