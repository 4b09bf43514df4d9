use glam::{Vec2, Vec3};
use hecs::{Entity, World};

use crate::renderer::mesh::create_quad;
use crate::renderer::MeshStore;
use crate::scene::prefabs::{spawn_block, spawn_boulder, spawn_ground, spawn_walker};

const ARENA_HALF: Vec2 = Vec2::new(9.0, 5.0);
const WALL_THICKNESS: f32 = 0.5;

/// Build the walled arena and its walker.
/// Returns the mesh store (owns all GPU mesh data) and the walker entity.
pub fn load_arena(world: &mut World, walk_speed: f32, stop_contact: f32) -> (MeshStore, Entity) {
    let mut meshes = MeshStore::new();

    spawn_ground(world, &mut meshes);

    // One shared unit quad for every rectangular prop.
    let quad = meshes.add(create_quad(1.0, 1.0, Vec3::ONE));

    // Boundary walls, overlapping at the corners so nothing slips out.
    let slate = Vec3::new(0.35, 0.37, 0.42);
    let ht = WALL_THICKNESS * 0.5;
    for &(pos, half) in &[
        (
            Vec2::new(0.0, ARENA_HALF.y + ht),
            Vec2::new(ARENA_HALF.x + WALL_THICKNESS, ht),
        ),
        (
            Vec2::new(0.0, -(ARENA_HALF.y + ht)),
            Vec2::new(ARENA_HALF.x + WALL_THICKNESS, ht),
        ),
        (
            Vec2::new(ARENA_HALF.x + ht, 0.0),
            Vec2::new(ht, ARENA_HALF.y),
        ),
        (
            Vec2::new(-(ARENA_HALF.x + ht), 0.0),
            Vec2::new(ht, ARENA_HALF.y),
        ),
    ] {
        spawn_block(world, quad, pos, half, slate);
    }

    // Brick blocks scattered around the middle
    let brick = Vec3::new(0.62, 0.32, 0.25);
    for &(x, y, hw, hh) in &[
        (3.5_f32, 1.5_f32, 0.6_f32, 0.6_f32),
        (-4.0, -2.0, 0.9, 0.5),
        (-2.5, 2.8, 0.5, 0.8),
    ] {
        spawn_block(world, quad, Vec2::new(x, y), Vec2::new(hw, hh), brick);
    }

    spawn_boulder(
        world,
        &mut meshes,
        Vec2::new(2.0, -2.2),
        0.6,
        Vec3::new(0.55, 0.5, 0.58),
    );

    let walker = spawn_walker(world, &mut meshes, Vec2::ZERO, walk_speed, stop_contact);

    (meshes, walker)
}
