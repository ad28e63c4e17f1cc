//! Headless sandbox driving the physics and shockwave simulation
//!
//! Builds a small scene (ground slab, a handful of dynamic spheres and a
//! box), detonates one shockwave and runs the fixed-timestep loop for a few
//! simulated seconds, logging what the wave does to the bodies.

use glam::Vec3;
use shockwave_engine::core::entity::Name;
use shockwave_engine::prelude::*;
use shockwave_engine::shockwave::ShockwaveMedium;
use std::time::Instant;
use tracing::{error, info};

/// Simulated duration of the run, in seconds
const SIMULATED_SECONDS: f32 = 5.0;

fn main() {
    shockwave_engine::init_logging();
    info!("Starting shockwave sandbox");

    let config = load_config();
    let mut world = World::new();
    create_demo_scene(&mut world);

    let mut physics_world = PhysicsWorld::new(&config.physics);
    let mut contacts = ContactMemory::default();
    let mut accumulator = TickAccumulator::new(config.physics.fixed_timestep);

    let mut simulator = ShockwaveSimulator::new(config.shockwave.clone());
    if let Err(err) = simulator.setup() {
        error!(%err, "Shockwave setup failed");
        return;
    }

    let started = Instant::now();
    let mut simulated = 0.0_f32;
    let mut detonated = false;
    let dt = config.physics.fixed_timestep;

    // Feed frame time in chunks that do not divide the timestep evenly, the
    // way a render loop would
    let frame_time = 1.0 / 144.0;
    while simulated < SIMULATED_SECONDS {
        let steps = accumulator.accumulate(frame_time);
        for _ in 0..steps {
            let events = physics_step(
                &mut world,
                &mut physics_world,
                &mut contacts,
                &config.physics,
                dt,
            );
            if !events.collisions.is_empty() {
                info!(
                    fixed_time = physics_world.fixed_time(),
                    collisions = events.collisions.len(),
                    "Contacts resolved"
                );
            }

            // Detonate above the scene half a second in
            if !detonated && physics_world.fixed_time() >= 0.5 {
                let origin = Vec3::new(0.0, 3.0, 0.0);
                match simulator.spawn(origin, &physics_world) {
                    Ok(count) => info!(?origin, particles = count, "Shockwave detonated"),
                    Err(err) => error!(%err, "Shockwave spawn failed"),
                }
                detonated = true;
            }

            simulator.update(&mut world, &mut physics_world, dt);
            simulated += dt;
        }
    }

    report(&world, &simulator);
    info!(
        simulated_seconds = simulated,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Sandbox finished"
    );
}

/// Load `simulation.json` from the working directory if present, else defaults
fn load_config() -> SimulationConfig {
    let mut config = match SimulationConfig::load_from_file("simulation.json") {
        Ok(config) => config,
        Err(err) => {
            info!(%err, "No simulation.json, using defaults");
            SimulationConfig::default()
        }
    };
    if config.shockwave.medium.is_none() {
        config.shockwave.medium = Some(ShockwaveMedium::default());
    }
    config
}

/// Ground slab plus a handful of dynamic bodies around the detonation point
fn create_demo_scene(world: &mut World) {
    world.spawn((
        Name("Ground".into()),
        Transform::from_position(Vec3::new(0.0, -0.5, 0.0)).with_scale(Vec3::new(40.0, 1.0, 40.0)),
        Collider::box_collider(),
    ));

    for (i, x) in [-4.0_f32, -2.0, 2.0, 4.0].into_iter().enumerate() {
        world.spawn((
            Name(format!("Sphere {i}")),
            Transform::from_position(Vec3::new(x, 0.5, 0.0)),
            Collider::sphere().with_material(PhysicsMaterial::bouncy(0.3)),
            Rigidbody::dynamic(2.0),
        ));
    }

    world.spawn((
        Name("Crate".into()),
        Transform::from_position(Vec3::new(0.0, 1.0, 3.0)),
        Collider::box_collider(),
        Rigidbody::dynamic(5.0),
    ));
}

fn report(world: &World, simulator: &ShockwaveSimulator) {
    for (_entity, (name, transform, rigidbody)) in
        world.query::<(&Name, &Transform, &Rigidbody)>().iter()
    {
        info!(
            name = %name.0,
            position = ?transform.position,
            velocity = ?rigidbody.velocity,
            "Final body state"
        );
    }
    info!(
        live_particles = simulator.alive_count(),
        pool_high_water = simulator.high_water_mark(),
        "Final wave state"
    );
}
