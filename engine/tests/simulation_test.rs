//! End-to-end simulation test through the public API
//!
//! Drives a small scene the way the sandbox binary does: fixed-timestep
//! loop, one shockwave detonation, rigid bodies resting on a ground slab.

use shockwave_engine::prelude::*;
use shockwave_engine::shockwave::ShockwaveMedium;

const DT: f32 = 1.0 / 60.0;

fn build_scene(world: &mut World) -> Vec<Entity> {
    world.spawn((
        Transform::from_position(Vec3::new(0.0, -0.5, 0.0)).with_scale(Vec3::new(40.0, 1.0, 40.0)),
        Collider::box_collider(),
    ));

    // The wave front carries no surface area on its first advance, so the
    // spheres sit where the second tick's segment crosses them
    let mut bodies = Vec::new();
    for x in [-12.0_f32, 12.0] {
        bodies.push(world.spawn((
            Transform::from_position(Vec3::new(x, 0.5, 0.0)),
            Collider::sphere(),
            Rigidbody::dynamic(2.0),
        )));
    }
    bodies
}

#[test]
fn shockwave_detonation_pushes_scene_bodies() {
    let mut config = SimulationConfig::default();
    config.shockwave.default_initial_count = 2000;
    config.shockwave.medium = Some(ShockwaveMedium::default());

    let mut world = World::new();
    let bodies = build_scene(&mut world);

    let mut physics_world = PhysicsWorld::new(&config.physics);
    let mut contacts = ContactMemory::default();
    let mut simulator = ShockwaveSimulator::new(config.shockwave.clone());
    simulator.setup().expect("valid shockwave config");

    let mut accumulator = TickAccumulator::new(config.physics.fixed_timestep);
    let mut detonated = false;

    // A second and a half of simulation, detonating at the half-second mark
    for _ in 0..216 {
        let steps = accumulator.accumulate(1.0 / 144.0);
        for _ in 0..steps {
            physics_step(
                &mut world,
                &mut physics_world,
                &mut contacts,
                &config.physics,
                DT,
            );
            if !detonated && physics_world.fixed_time() >= 0.5 {
                let count = simulator
                    .spawn(Vec3::new(0.0, 0.5, 0.0), &physics_world)
                    .expect("simulator is set up");
                assert!(count > 0);
                detonated = true;
            }
            simulator.update(&mut world, &mut physics_world, DT);
        }
    }

    assert!(detonated);

    // The wave passed through both spheres and pushed them outward
    for (entity, sign) in bodies.iter().zip([-1.0_f32, 1.0]) {
        let transform = world.get::<Transform>(*entity).unwrap();
        assert!(
            transform.position.x * sign > 12.0,
            "body should be pushed away from the detonation, at {:?}",
            transform.position
        );
    }

    // The wave decays: supersonic particles slow toward the sound barrier
    // and die, so the pool never grows past one spawn batch
    assert!(simulator.high_water_mark() <= simulator.capacity());
}

#[test]
fn bodies_rest_on_the_ground_without_sinking() {
    let config = SimulationConfig::default();
    let mut world = World::new();

    world.spawn((
        Transform::from_position(Vec3::new(0.0, -0.5, 0.0)).with_scale(Vec3::new(40.0, 1.0, 40.0)),
        Collider::box_collider(),
    ));
    let body = world.spawn((
        Transform::from_position(Vec3::new(0.0, 0.45, 0.0)),
        Collider::box_collider(),
        Rigidbody::dynamic(1.0),
    ));

    let mut physics_world = PhysicsWorld::new(&config.physics);
    let mut contacts = ContactMemory::default();

    physics_step(
        &mut world,
        &mut physics_world,
        &mut contacts,
        &config.physics,
        DT,
    );

    // First contact resolves to rest: the gravity-compensating impulse
    // leaves the body exactly where it was
    let transform = world.get::<Transform>(body).unwrap();
    assert!((transform.position - Vec3::new(0.0, 0.45, 0.0)).length() < 1e-5);
}
