use glam::{Vec2, Vec3};
use hecs::{Entity, World};

use crate::components::*;
use crate::renderer::mesh::{create_checker_ground, create_disc, create_walker};
use crate::renderer::MeshStore;

const WALKER_RADIUS: f32 = 0.35;

const GROUND_LIGHT: Vec3 = Vec3::new(0.22, 0.24, 0.27);
const GROUND_DARK: Vec3 = Vec3::new(0.18, 0.20, 0.23);

/// Spawn the tap-controlled walker at `position`, idle and facing +X.
pub fn spawn_walker(
    world: &mut World,
    meshes: &mut MeshStore,
    position: Vec2,
    speed: f32,
    stop_threshold: f32,
) -> Entity {
    let mesh = meshes.add(create_walker());

    let mut local = LocalTransform::new(position);
    local.layer = 0.2;

    world.spawn((
        local,
        RenderOffset(Vec2::ZERO),
        mesh,
        Color(Vec3::ONE),
        Character::new(speed),
        MoveFsm::new(MoveState::Idle),
        MoveSignal::new(),
        ContactState::new(stop_threshold),
        WalkAnimation::new(),
        Collider::Circle {
            radius: WALKER_RADIUS,
        },
    ))
}

/// Immovable rectangular prop. `quad` is a shared unit quad, scaled up to
/// the block's full size; the collider gets the same half extents.
pub fn spawn_block(
    world: &mut World,
    quad: MeshHandle,
    position: Vec2,
    half_extents: Vec2,
    color: Vec3,
) -> Entity {
    let mut local = LocalTransform::new(position);
    local.scale = half_extents * 2.0;
    local.layer = 0.1;

    world.spawn((
        local,
        quad,
        Color(color),
        Collider::Aabb { half_extents },
        Static,
    ))
}

/// Round obstacle without the Static tag: walkers shoulder it aside a little
/// while their contact clock runs.
pub fn spawn_boulder(
    world: &mut World,
    meshes: &mut MeshStore,
    position: Vec2,
    radius: f32,
    color: Vec3,
) -> Entity {
    let mesh = meshes.add(create_disc(radius, 32, Vec3::ONE));

    let mut local = LocalTransform::new(position);
    local.layer = 0.1;

    world.spawn((local, mesh, Color(color), Collider::Circle { radius }))
}

/// The checkerboard floor. Purely visual: no collider, lowest layer.
pub fn spawn_ground(world: &mut World, meshes: &mut MeshStore) -> Entity {
    let mesh = meshes.add(create_checker_ground(20, 12, 1.0, GROUND_LIGHT, GROUND_DARK));

    let mut local = LocalTransform::new(Vec2::ZERO);
    local.layer = -0.5;

    world.spawn((local, mesh, Color(Vec3::ONE)))
}
