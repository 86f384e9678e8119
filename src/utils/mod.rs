mod math_helpers;

pub use math_helpers::*;
pub use crate::errors::MagneticsError;
