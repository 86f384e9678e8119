//! Dimension-bounded vector helpers shared by the tree and force evaluators.
//!
//! Positions and velocities are stored as `[f64; 3]` regardless of the
//! simulation dimension; only the first `dim` axes carry meaning and the
//! helpers here never touch the rest.

/// Computes the displacement vector `to - from` over the first `dim` axes.
///
/// Negative zero components are normalized to positive zero so that a later
/// division by distance can never produce a signed-zero direction artifact.
///
/// # Examples
///
/// ```
/// use rs_magnetics::utils::displacement;
///
/// let d = displacement(&[1.0, 2.0, 0.0], &[4.0, 6.0, 0.0], 2);
/// assert_eq!(d, [3.0, 4.0, 0.0]);
/// ```
pub fn displacement(from: &[f64; 3], to: &[f64; 3], dim: usize) -> [f64; 3] {
    let mut delta = [0.0; 3];
    for k in 0..dim {
        let c = to[k] - from[k];
        // -0.0 compares equal to 0.0; reassigning strips the sign bit.
        delta[k] = if c == 0.0 { 0.0 } else { c };
    }
    delta
}

/// Computes the Euclidean norm of `v` over the first `dim` axes.
///
/// # Examples
///
/// ```
/// use rs_magnetics::utils::vector_norm;
///
/// assert_eq!(vector_norm(&[3.0, 4.0, 0.0], 2), 5.0);
/// ```
pub fn vector_norm(v: &[f64; 3], dim: usize) -> f64 {
    let mut sum = 0.0;
    for k in 0..dim {
        sum += v[k] * v[k];
    }
    sum.sqrt()
}

/// Computes the Euclidean distance between two points over the first `dim` axes.
///
/// # Examples
///
/// ```
/// use rs_magnetics::utils::euclidean_distance;
///
/// let a = [0.0, 0.0, 0.0];
/// let b = [1.0, 0.0, 0.0];
/// assert_eq!(euclidean_distance(&a, &b, 2), 1.0);
/// ```
pub fn euclidean_distance(a: &[f64; 3], b: &[f64; 3], dim: usize) -> f64 {
    vector_norm(&displacement(a, b, dim), dim)
}
