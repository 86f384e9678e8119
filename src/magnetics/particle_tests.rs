use crate::magnetics::{full_mesh_links, Link, Particle};

#[test]
fn test_particle_starts_at_rest() {
    let p = Particle::new(7, [1.0, -2.0, 3.0], 100.0);
    assert_eq!(p.id, 7);
    assert_eq!(p.velocity, [0.0, 0.0, 0.0]);
    assert_eq!(p.charge, 100.0);
}

#[test]
fn test_link_defaults_to_unit_strength() {
    let link = Link::new(1, 2);
    assert_eq!(link.strength, 1.0);
    assert!(link.source_index().is_none());
    assert!(link.target_index().is_none());
}

#[test]
fn test_link_with_strength() {
    let link = Link::new(1, 2).with_strength(0.25);
    assert_eq!(link.strength, 0.25);
}

#[test]
fn test_full_mesh_links_pair_count() {
    let particles: Vec<Particle> = (0..5)
        .map(|i| Particle::new(i, [i as f64, 0.0, 0.0], 1.0))
        .collect();
    let links = full_mesh_links(&particles);
    // 5 choose 2
    assert_eq!(links.len(), 10);
}

#[test]
fn test_full_mesh_links_each_pair_once() {
    let particles: Vec<Particle> = (0..4)
        .map(|i| Particle::new(i, [i as f64, 0.0, 0.0], 1.0))
        .collect();
    let links = full_mesh_links(&particles);
    for link in &links {
        assert!(link.source < link.target, "Pairs should be emitted in one orientation only");
    }
}

#[test]
fn test_full_mesh_links_empty_set() {
    assert!(full_mesh_links(&[]).is_empty());
}
