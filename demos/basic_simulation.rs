// demos/basic_simulation.rs

use rs_magnetics::magnetics::{Link, MagneticForce, Particle};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // A small ring of positive charges with one negative charge in the middle.
    let mut particles = vec![
        Particle::new(0, [0.1, 0.0, 0.0], -50.0),
        Particle::new(1, [2.0, 0.0, 0.0], 100.0),
        Particle::new(2, [-2.0, 0.0, 0.0], 100.0),
        Particle::new(3, [0.0, 2.0, 0.0], 100.0),
        Particle::new(4, [0.0, -2.0, 0.0], 100.0),
    ];

    let mut force = MagneticForce::new(2)?;
    force.initialize(&particles);

    println!("Tree mode, 10 ticks with decaying alpha:");
    let mut alpha = 1.0;
    for tick in 0..10 {
        force.apply(&mut particles, alpha)?;

        // The host loop owns integration and velocity clearing.
        for p in &mut particles {
            for k in 0..2 {
                p.position[k] += p.velocity[k];
                p.velocity[k] = 0.0;
            }
        }
        alpha *= 0.9;

        println!(
            "tick {:2}: center particle at ({:.4}, {:.4})",
            tick, particles[0].position[0], particles[0].position[1]
        );
    }

    // Switching to explicit links restricts interaction to declared pairs.
    force.set_links(vec![
        Link::new(1, 2).with_strength(0.5),
        Link::new(3, 4).with_strength(0.5),
    ]);
    force.initialize(&particles);
    force.apply(&mut particles, 1.0)?;

    println!("\nAfter one linked step:");
    for p in &particles {
        println!(
            "particle {}: velocity ({:.6}, {:.6})",
            p.id, p.velocity[0], p.velocity[1]
        );
    }

    Ok(())
}
