/// A point particle participating in the force simulation.
///
/// Positions and velocities are stored as fixed 3-component arrays; only the
/// first `dim` axes of the owning engine carry meaning and the remaining
/// components stay zero. The engine mutates `velocity` in place each step and
/// never creates, destroys or repositions particles - the host simulation loop
/// owns integration and velocity clearing.
///
/// The `charge` sign selects attraction (positive) or repulsion (negative)
/// under the natural polarity rule; its magnitude acts as a mass-like
/// intensity.
///
/// # Examples
///
/// ```
/// use rs_magnetics::magnetics::Particle;
///
/// let p = Particle::new(0, [1.0, 2.0, 0.0], 100.0);
/// assert_eq!(p.velocity, [0.0, 0.0, 0.0]);
/// assert_eq!(p.charge, 100.0);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// Externally supplied identity, used to resolve link endpoints.
    pub id: u64,
    /// Position per axis. Axes beyond the engine dimension must stay zero.
    pub position: [f64; 3],
    /// Velocity per axis, accumulated in place by the engine.
    pub velocity: [f64; 3],
    /// Capacity to attract (positive) or repel (negative).
    pub charge: f64,
}

impl Particle {
    /// Creates a particle at rest with the given identity, position and charge.
    pub fn new(id: u64, position: [f64; 3], charge: f64) -> Self {
        Particle {
            id,
            position,
            velocity: [0.0; 3],
            charge,
        }
    }
}

/// An undirected relation between two particles, addressed by particle id.
///
/// A non-empty link set switches the engine from tree-approximated to exact
/// pairwise evaluation. Endpoints are resolved once against the current
/// particle set into cached slice indices; an endpoint whose id is unknown
/// stays unresolved and the link is skipped at evaluation time rather than
/// raising an error.
///
/// # Examples
///
/// ```
/// use rs_magnetics::magnetics::Link;
///
/// let link = Link::new(1, 2).with_strength(0.5);
/// assert_eq!(link.strength, 0.5);
/// assert!(link.source_index().is_none()); // unresolved until initialization
/// ```
#[derive(Clone, Debug)]
pub struct Link {
    /// Raw identity of the source particle.
    pub source: u64,
    /// Raw identity of the target particle.
    pub target: u64,
    /// Strength coefficient, typically in [0, 1].
    pub strength: f64,
    pub(crate) source_ix: Option<usize>,
    pub(crate) target_ix: Option<usize>,
}

impl Link {
    /// Creates a link between two particle ids with unit strength.
    pub fn new(source: u64, target: u64) -> Self {
        Link {
            source,
            target,
            strength: 1.0,
            source_ix: None,
            target_ix: None,
        }
    }

    /// Sets the strength coefficient.
    pub fn with_strength(mut self, strength: f64) -> Self {
        self.strength = strength;
        self
    }

    /// Returns the resolved index of the source endpoint, if resolution succeeded.
    pub fn source_index(&self) -> Option<usize> {
        self.source_ix
    }

    /// Returns the resolved index of the target endpoint, if resolution succeeded.
    pub fn target_index(&self) -> Option<usize> {
        self.target_ix
    }
}

/// Builds the explicit all-pairs link set over `particles`, each pair linked
/// exactly once with unit strength.
///
/// Exact pairwise evaluation over this mesh is the reference the tree mode
/// converges to as theta shrinks.
///
/// # Examples
///
/// ```
/// use rs_magnetics::magnetics::{full_mesh_links, Particle};
///
/// let particles = vec![
///     Particle::new(0, [0.0, 0.0, 0.0], 1.0),
///     Particle::new(1, [1.0, 0.0, 0.0], 1.0),
///     Particle::new(2, [2.0, 0.0, 0.0], 1.0),
/// ];
/// assert_eq!(full_mesh_links(&particles).len(), 3);
/// ```
pub fn full_mesh_links(particles: &[Particle]) -> Vec<Link> {
    let n = particles.len();
    let mut links = Vec::with_capacity(n.saturating_sub(1) * n / 2);
    for a in 0..n {
        for b in (a + 1)..n {
            links.push(Link::new(particles[a].id, particles[b].id));
        }
    }
    links
}
