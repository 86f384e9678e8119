/// The sign rule deciding whether a charge pair attracts or repels.
///
/// `Natural` leaves the decision to the stored charges themselves (positive
/// attracts, negative repels), which reproduces inverse-square gravity or
/// electrostatics when used with signed charges. The forced variants pin the
/// interaction regardless of charge sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// Sign follows the stored charge.
    Natural,
    /// Always attract, using the charge magnitude.
    Attract,
    /// Always repel, using the charge magnitude.
    Repel,
}

/// Resolves a charge magnitude against a polarity decision.
///
/// Under `Natural` the charge passes through unchanged; under a forced
/// decision the magnitude is kept and the sign fixed to positive (attraction)
/// or negative (repulsion).
///
/// # Examples
///
/// ```
/// use rs_magnetics::magnetics::{signed_charge, Polarity};
///
/// assert_eq!(signed_charge(-3.0, Polarity::Natural), -3.0);
/// assert_eq!(signed_charge(-3.0, Polarity::Attract), 3.0);
/// assert_eq!(signed_charge(3.0, Polarity::Repel), -3.0);
/// ```
pub fn signed_charge(charge: f64, polarity: Polarity) -> f64 {
    match polarity {
        Polarity::Natural => charge,
        Polarity::Attract => charge.abs(),
        Polarity::Repel => -charge.abs(),
    }
}
