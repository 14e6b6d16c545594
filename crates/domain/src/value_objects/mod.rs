//! Value objects - immutable domain primitives with no identity

mod attribute;
mod dice;
mod wound_track;

pub use attribute::{AttributeEffect, AttributeField, AttributeKey, AttributeMod};
pub use dice::{DiceExpression, DiceParseError, DiceTerm};
pub use wound_track::{HealAmount, WoundTrack};
