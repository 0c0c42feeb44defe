//! Units of measure and the compound unit normalizer.

mod compound;
mod scale;
mod unit;
pub mod well_known;

pub use compound::CompoundUnit;
pub use scale::Scale;
pub use unit::{BaseUnit, Unit};
pub use well_known::*;
