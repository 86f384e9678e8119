use std::collections::HashMap;

use log::warn;

use crate::errors::MagneticsError;
use crate::magnetics::{
    accumulate_charges, signed_charge, Link, NodeKind, Particle, Polarity, SpatialTree,
};
use crate::utils::{displacement, vector_norm};

/// Accessor deciding a particle's effective charge.
pub type ChargeFn = Box<dyn Fn(&Particle) -> f64>;
/// Accessor deciding the strength multiplier; receives `None` in tree
/// ("ether") mode, where a single global multiplier applies.
pub type StrengthFn = Box<dyn Fn(Option<&Link>) -> f64>;
/// Accessor deciding the polarity rule for a pair of charges.
pub type PolarityFn = Box<dyn Fn(f64, f64) -> Polarity>;
/// Accessor mapping separation distance to relative force magnitude.
/// Only ever evaluated at d > 0.
pub type DistanceWeightFn = Box<dyn Fn(f64) -> f64>;

/// Default Barnes-Hut admissibility threshold.
pub const DEFAULT_THETA: f64 = 0.9;

/// Computes magnetic attraction/repulsion velocity deltas for a particle set,
/// once per simulation step.
///
/// With no explicit links, evaluation runs in Barnes-Hut tree mode: a spatial
/// partition is rebuilt from current positions, charges and centroids are
/// accumulated bottom-up, and each particle performs a pruned traversal that
/// treats sufficiently distant regions as single aggregate sources. With a
/// non-empty link set, evaluation is an exact pairwise pass over the resolved
/// links and the tree stages are skipped entirely.
///
/// The engine holds no per-step state: the tree is rebuilt fresh on every
/// `apply` call and only particle velocities are mutated. Reuse across steps
/// is safe; concurrent calls over the same particle set are not, and are the
/// host's responsibility to serialize.
///
/// # Examples
///
/// ```
/// use rs_magnetics::magnetics::{MagneticForce, Particle};
///
/// let mut particles = vec![
///     Particle::new(0, [0.0, 0.0, 0.0], 1.0),
///     Particle::new(1, [1.0, 0.0, 0.0], 1.0),
/// ];
///
/// let mut force = MagneticForce::new(2).expect("Failed to create engine");
/// force.initialize(&particles);
/// force.apply(&mut particles, 1.0).expect("Force step failed");
///
/// // Unit charges one unit apart under the default 1/d^2 law: each particle
/// // is accelerated toward the other with magnitude 1.0.
/// assert!((particles[0].velocity[0] - 1.0).abs() < 1e-12);
/// assert!((particles[1].velocity[0] + 1.0).abs() < 1e-12);
/// ```
pub struct MagneticForce {
    dim: usize,
    theta: f64,
    max_distance: f64,
    charge: ChargeFn,
    strength: StrengthFn,
    polarity: PolarityFn,
    distance_weight: DistanceWeightFn,
    links: Vec<Link>,
    index_by_id: HashMap<u64, usize>,
}

impl MagneticForce {
    /// Creates an engine for the given spatial dimension with default
    /// configuration: charge read from the particle, unit strength, natural
    /// polarity, inverse-square distance weighting, theta 0.9 and no maximum
    /// distance cutoff.
    ///
    /// # Errors
    ///
    /// Returns an error if `dim` is not 1, 2 or 3.
    pub fn new(dim: usize) -> Result<Self, MagneticsError> {
        if !(1..=3).contains(&dim) {
            return Err(MagneticsError::InvalidDimension(dim));
        }
        Ok(MagneticForce {
            dim,
            theta: DEFAULT_THETA,
            max_distance: f64::INFINITY,
            charge: Box::new(|p| p.charge),
            strength: Box::new(|link| link.map_or(1.0, |l| l.strength)),
            polarity: Box::new(|_, _| Polarity::Natural),
            distance_weight: Box::new(|d| 1.0 / (d * d)),
            links: Vec::new(),
            index_by_id: HashMap::new(),
        })
    }

    /// Returns the spatial dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns the Barnes-Hut admissibility threshold.
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Sets the Barnes-Hut admissibility threshold.
    ///
    /// # Errors
    ///
    /// Returns an error unless `theta` is finite and positive.
    pub fn set_theta(&mut self, theta: f64) -> Result<(), MagneticsError> {
        if !theta.is_finite() || theta <= 0.0 {
            return Err(MagneticsError::InvalidTheta);
        }
        self.theta = theta;
        Ok(())
    }

    /// Returns the maximum interaction distance.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    /// Sets the maximum distance over which any pair or region contributes.
    /// Farther sources are skipped as a fast path, not treated as errors.
    /// `f64::INFINITY` disables the cutoff.
    ///
    /// # Errors
    ///
    /// Returns an error if `max_distance` is not positive or is NaN.
    pub fn set_max_distance(&mut self, max_distance: f64) -> Result<(), MagneticsError> {
        if max_distance.is_nan() || max_distance <= 0.0 {
            return Err(MagneticsError::InvalidMaxDistance);
        }
        self.max_distance = max_distance;
        Ok(())
    }

    /// Replaces the charge accessor.
    pub fn set_charge_fn<F>(&mut self, charge: F)
    where
        F: Fn(&Particle) -> f64 + 'static,
    {
        self.charge = Box::new(charge);
    }

    /// Sets a constant charge for every particle.
    pub fn set_charge(&mut self, charge: f64) {
        self.charge = Box::new(move |_| charge);
    }

    /// Replaces the strength accessor. The accessor receives `Some(link)` in
    /// pairwise mode and `None` in tree mode.
    pub fn set_strength_fn<F>(&mut self, strength: F)
    where
        F: Fn(Option<&Link>) -> f64 + 'static,
    {
        self.strength = Box::new(strength);
    }

    /// Sets a constant strength multiplier for both modes.
    pub fn set_strength(&mut self, strength: f64) {
        self.strength = Box::new(move |_| strength);
    }

    /// Replaces the polarity accessor, called with the two interacting
    /// charges (the evaluating particle's first).
    pub fn set_polarity_fn<F>(&mut self, polarity: F)
    where
        F: Fn(f64, f64) -> Polarity + 'static,
    {
        self.polarity = Box::new(polarity);
    }

    /// Sets a fixed polarity decision for every pair.
    pub fn set_polarity(&mut self, polarity: Polarity) {
        self.polarity = Box::new(move |_, _| polarity);
    }

    /// Replaces the distance-weighting law. The default is inverse-square.
    pub fn set_distance_weight_fn<F>(&mut self, distance_weight: F)
    where
        F: Fn(f64) -> f64 + 'static,
    {
        self.distance_weight = Box::new(distance_weight);
    }

    /// Returns the current link set.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Replaces the link set and resolves endpoints against the current
    /// id map. A non-empty link set switches evaluation to pairwise mode.
    pub fn set_links(&mut self, links: Vec<Link>) {
        self.links = links;
        self.resolve_links();
    }

    /// Supplies (or re-supplies) the particle set: rebuilds the id-to-index
    /// map and re-resolves every pending link endpoint against it.
    ///
    /// Must be called before the first `apply`, and again whenever the host
    /// reorders, grows or shrinks the particle set.
    pub fn initialize(&mut self, particles: &[Particle]) {
        self.index_by_id.clear();
        for (index, particle) in particles.iter().enumerate() {
            if let Some(previous) = self.index_by_id.insert(particle.id, index) {
                warn!(
                    "Duplicate particle id {} (indices {} and {}); the later particle wins",
                    particle.id, previous, index
                );
            }
        }
        self.resolve_links();
    }

    /// Resolves raw link endpoints into particle indices. An endpoint whose
    /// id is absent from the map stays unresolved and its link is skipped at
    /// evaluation time.
    fn resolve_links(&mut self) {
        for link in &mut self.links {
            link.source_ix = self.index_by_id.get(&link.source).copied();
            link.target_ix = self.index_by_id.get(&link.target).copied();
            if link.source_ix.is_none() {
                warn!("Link source id {} not found in particle set; link will be skipped", link.source);
            }
            if link.target_ix.is_none() {
                warn!("Link target id {} not found in particle set; link will be skipped", link.target);
            }
        }
    }

    /// Runs one force step, adding velocity deltas onto every particle.
    ///
    /// `alpha` is the host loop's decay coefficient, nominally falling from
    /// 1 toward 0 over a run. Velocities are only ever added to - clearing
    /// them between steps is the host's job.
    ///
    /// # Errors
    ///
    /// Returns an error if tree construction fails; velocities carry no
    /// partial-consistency guarantee in that case.
    pub fn apply(&self, particles: &mut [Particle], alpha: f64) -> Result<(), MagneticsError> {
        if self.links.is_empty() {
            self.apply_tree(particles, alpha)
        } else {
            self.apply_links(particles, alpha);
            Ok(())
        }
    }

    /// Barnes-Hut evaluation: build, accumulate, then one pruned traversal
    /// per particle.
    fn apply_tree(&self, particles: &mut [Particle], alpha: f64) -> Result<(), MagneticsError> {
        if particles.len() < 2 {
            return Ok(());
        }

        let positions: Vec<[f64; 3]> = particles.iter().map(|p| p.position).collect();
        let charges: Vec<f64> = particles.iter().map(|p| (self.charge)(p)).collect();

        let mut tree = SpatialTree::build(self.dim, &positions)?;
        accumulate_charges(&mut tree, &positions, &charges);

        let ether_strength = (self.strength)(None);

        for i in 0..particles.len() {
            let mut delta_v = [0.0; 3];
            tree.visit_pre_order(|tree, index, lower, upper| {
                let node = tree.node(index);
                if node.charge == 0.0 {
                    return true;
                }

                let delta = displacement(&positions[i], &node.centroid, self.dim);
                let d = vector_norm(&delta, self.dim);
                let extent = upper[0] - lower[0];

                if d > 0.0 && extent / d < self.theta {
                    if d <= self.max_distance {
                        let polarity = (self.polarity)(charges[i], node.charge);
                        let a = signed_charge(node.charge, polarity)
                            * alpha
                            * ether_strength
                            * (self.distance_weight)(d);
                        accelerate(&mut delta_v, a, &delta, d, self.dim);
                    }
                    return true;
                }

                if matches!(node.kind, NodeKind::Internal { .. }) {
                    return false;
                }

                // Leaf, or a region the particle sits inside of: evaluate the
                // coincident chain member by member.
                for &j in tree.leaf_entries(index) {
                    if j == i {
                        continue;
                    }
                    let delta = displacement(&positions[i], &positions[j], self.dim);
                    let d = vector_norm(&delta, self.dim);
                    if d == 0.0 || d > self.max_distance {
                        continue;
                    }
                    let polarity = (self.polarity)(charges[i], charges[j]);
                    let a = signed_charge(charges[j], polarity)
                        * alpha
                        * ether_strength
                        * (self.distance_weight)(d);
                    accelerate(&mut delta_v, a, &delta, d, self.dim);
                }
                true
            });

            for k in 0..self.dim {
                particles[i].velocity[k] += delta_v[k];
            }
        }
        Ok(())
    }

    /// Exact pairwise evaluation over the resolved link set.
    ///
    /// Each endpoint's acceleration is scaled by the counterpart's charge, so
    /// asymmetric charge ratios produce asymmetric accelerations; this is not
    /// a rigid-body equal-and-opposite force pair.
    fn apply_links(&self, particles: &mut [Particle], alpha: f64) {
        for link in &self.links {
            let (Some(a), Some(b)) = (link.source_ix, link.target_ix) else {
                continue;
            };
            // Stale indices from a shrunk particle set are unusable edges.
            if a >= particles.len() || b >= particles.len() {
                continue;
            }

            let delta = displacement(&particles[a].position, &particles[b].position, self.dim);
            let d = vector_norm(&delta, self.dim);
            if d == 0.0 || d > self.max_distance {
                continue;
            }

            let source_charge = (self.charge)(&particles[a]);
            let target_charge = (self.charge)(&particles[b]);
            let polarity = (self.polarity)(source_charge, target_charge);

            let rel_strength = alpha * (self.strength)(Some(link)) * (self.distance_weight)(d);
            let source_acc = signed_charge(target_charge, polarity) * rel_strength;
            let target_acc = signed_charge(source_charge, polarity) * rel_strength;

            accelerate(&mut particles[a].velocity, source_acc, &delta, d, self.dim);
            accelerate(&mut particles[b].velocity, -target_acc, &delta, d, self.dim);
        }
    }
}

/// Adds an acceleration of the given magnitude along `delta / d` onto a
/// velocity vector. Both evaluation modes route through this kernel so their
/// rounding and sign conventions cannot diverge.
fn accelerate(velocity: &mut [f64; 3], magnitude: f64, delta: &[f64; 3], d: f64, dim: usize) {
    for k in 0..dim {
        velocity[k] += magnitude * delta[k] / d;
    }
}
