use glam::Vec2;
use hecs::{Entity, World};

use crate::components::{Collider, CollisionEvent, LocalTransform, Static};

struct ColliderEntry {
    entity: Entity,
    position: Vec2,
    collider: Collider,
}

/// Circle against axis-aligned box, with the circle canonicalized as
/// `entity_a` so callers can rely on the normal pointing circle-to-box.
fn circle_vs_aabb(
    circle_entity: Entity,
    circle_pos: Vec2,
    radius: f32,
    box_entity: Entity,
    box_pos: Vec2,
    half_extents: Vec2,
) -> Option<CollisionEvent> {
    let local_point = circle_pos - box_pos;
    let clamped = local_point.clamp(-half_extents, half_extents);
    let diff = clamped - local_point;
    let dist = diff.length();

    if dist > 1e-6 {
        // Center outside the box: contact through the closest surface point.
        let penetration = radius - dist;
        if penetration > 0.0 {
            Some(CollisionEvent {
                entity_a: circle_entity,
                entity_b: box_entity,
                contact_normal: diff / dist,
                penetration_depth: penetration,
            })
        } else {
            None
        }
    } else {
        // Center inside the box: exit through the nearest face.
        let mut exit = Vec2::X;
        let mut face_dist = half_extents.x - local_point.x;
        if half_extents.x + local_point.x < face_dist {
            face_dist = half_extents.x + local_point.x;
            exit = -Vec2::X;
        }
        if half_extents.y - local_point.y < face_dist {
            face_dist = half_extents.y - local_point.y;
            exit = Vec2::Y;
        }
        if half_extents.y + local_point.y < face_dist {
            face_dist = half_extents.y + local_point.y;
            exit = -Vec2::Y;
        }
        Some(CollisionEvent {
            entity_a: circle_entity,
            entity_b: box_entity,
            contact_normal: -exit,
            penetration_depth: face_dist + radius,
        })
    }
}

/// All returned normals point from entity_a toward entity_b.
fn test_pair(a: &ColliderEntry, b: &ColliderEntry) -> Option<CollisionEvent> {
    match (&a.collider, &b.collider) {
        // Circle(A) vs Circle(B): normal = (B - A).normalize()
        (Collider::Circle { radius: r1 }, Collider::Circle { radius: r2 }) => {
            let diff = b.position - a.position;
            let dist = diff.length();
            let penetration = (r1 + r2) - dist;
            if penetration > 0.0 {
                let normal = if dist > 1e-6 { diff / dist } else { Vec2::X };
                Some(CollisionEvent {
                    entity_a: a.entity,
                    entity_b: b.entity,
                    contact_normal: normal,
                    penetration_depth: penetration,
                })
            } else {
                None
            }
        }

        (Collider::Circle { radius }, Collider::Aabb { half_extents }) => circle_vs_aabb(
            a.entity,
            a.position,
            *radius,
            b.entity,
            b.position,
            *half_extents,
        ),
        // Aabb(A) vs Circle(B): canonicalize so circle=entity_a, box=entity_b
        (Collider::Aabb { half_extents }, Collider::Circle { radius }) => circle_vs_aabb(
            b.entity,
            b.position,
            *radius,
            a.entity,
            a.position,
            *half_extents,
        ),

        // Aabb(A) vs Aabb(B): separate along the axis of least overlap
        (Collider::Aabb { half_extents: h1 }, Collider::Aabb { half_extents: h2 }) => {
            let diff = b.position - a.position;
            let overlap_x = (h1.x + h2.x) - diff.x.abs();
            let overlap_y = (h1.y + h2.y) - diff.y.abs();
            if overlap_x > 0.0 && overlap_y > 0.0 {
                let (normal, penetration) = if overlap_x < overlap_y {
                    (Vec2::new(diff.x.signum(), 0.0), overlap_x)
                } else {
                    (Vec2::new(0.0, diff.y.signum()), overlap_y)
                };
                Some(CollisionEvent {
                    entity_a: a.entity,
                    entity_b: b.entity,
                    contact_normal: normal,
                    penetration_depth: penetration,
                })
            } else {
                None
            }
        }
    }
}

/// Detect overlapping collider pairs and separate them positionally.
/// contact_normal convention: always points from entity_a toward entity_b.
/// - To push A out of B: move A along -normal
/// - To push B out of A: move B along +normal
///
/// The returned events are the frame's raw overlap set; interrupt logic
/// downstream decides what walkers make of them.
pub fn collision_system(world: &mut World) -> Vec<CollisionEvent> {
    // Gather all collider entries
    let entries: Vec<ColliderEntry> = world
        .query_mut::<(&LocalTransform, &Collider)>()
        .into_iter()
        .map(|(entity, (local, collider))| ColliderEntry {
            entity,
            position: local.position,
            collider: *collider,
        })
        .collect();

    // Broadphase: brute force O(n²)
    let mut events = Vec::new();
    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            if let Some(event) = test_pair(&entries[i], &entries[j]) {
                events.push(event);
            }
        }
    }

    // Response: normal points from A to B in all cases
    for event in &events {
        let a_static = world.get::<&Static>(event.entity_a).is_ok();
        let b_static = world.get::<&Static>(event.entity_b).is_ok();

        if a_static && b_static {
            continue;
        }

        let n = event.contact_normal;
        let depth = event.penetration_depth;

        if a_static {
            // A is static, B is dynamic: push B away from A (along +normal)
            if let Ok(mut local) = world.get::<&mut LocalTransform>(event.entity_b) {
                local.position += n * depth;
            }
        } else if b_static {
            // B is static, A is dynamic: push A away from B (along -normal)
            if let Ok(mut local) = world.get::<&mut LocalTransform>(event.entity_a) {
                local.position -= n * depth;
            }
        } else {
            // Both dynamic: split the push 50/50
            if let Ok(mut local) = world.get::<&mut LocalTransform>(event.entity_a) {
                local.position -= n * (depth * 0.5);
            }
            if let Ok(mut local) = world.get::<&mut LocalTransform>(event.entity_b) {
                local.position += n * (depth * 0.5);
            }
        }
    }

    events
}

// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::collision_system;
    use crate::components::{Collider, LocalTransform, Static};
    use glam::Vec2;
    use hecs::{Entity, World};

    fn position(world: &World, e: Entity) -> Vec2 {
        world.get::<&LocalTransform>(e).unwrap().position
    }

    #[test]
    fn overlapping_circles_split_the_push_evenly() {
        let mut world = World::new();
        let a = world.spawn((
            LocalTransform::new(Vec2::ZERO),
            Collider::Circle { radius: 0.5 },
        ));
        let b = world.spawn((
            LocalTransform::new(Vec2::new(0.8, 0.0)),
            Collider::Circle { radius: 0.5 },
        ));

        let events = collision_system(&mut world);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].contact_normal, Vec2::X);
        assert!((events[0].penetration_depth - 0.2).abs() < 1e-6);
        assert!((position(&world, a).x + 0.1).abs() < 1e-6);
        assert!((position(&world, b).x - 0.9).abs() < 1e-6);
    }

    #[test]
    fn a_circle_is_pushed_fully_out_of_a_static_box() {
        let mut world = World::new();
        let circle = world.spawn((
            LocalTransform::new(Vec2::new(0.8, 0.0)),
            Collider::Circle { radius: 0.5 },
        ));
        world.spawn((
            LocalTransform::new(Vec2::ZERO),
            Collider::Aabb {
                half_extents: Vec2::new(0.5, 0.5),
            },
            Static,
        ));

        let events = collision_system(&mut world);
        assert_eq!(events.len(), 1);
        // Normal runs circle-to-box, so the push moves the circle along +X.
        assert_eq!(events[0].contact_normal, -Vec2::X);
        let resting = position(&world, circle);
        assert!((resting.x - 1.0).abs() < 1e-6, "rested at {resting:?}");
        assert_eq!(resting.y, 0.0);
    }

    #[test]
    fn a_circle_centered_inside_a_box_exits_through_the_nearest_face() {
        let mut world = World::new();
        let circle = world.spawn((
            LocalTransform::new(Vec2::new(0.75, 0.0)),
            Collider::Circle { radius: 0.25 },
        ));
        world.spawn((
            LocalTransform::new(Vec2::ZERO),
            Collider::Aabb {
                half_extents: Vec2::ONE,
            },
            Static,
        ));

        let events = collision_system(&mut world);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].contact_normal, -Vec2::X);
        assert_eq!(events[0].penetration_depth, 0.5);
        assert_eq!(position(&world, circle), Vec2::new(1.25, 0.0));
    }

    #[test]
    fn box_pairs_separate_along_the_axis_of_least_overlap() {
        let mut world = World::new();
        let a = world.spawn((
            LocalTransform::new(Vec2::ZERO),
            Collider::Aabb {
                half_extents: Vec2::ONE,
            },
        ));
        let b = world.spawn((
            LocalTransform::new(Vec2::new(1.5, 0.2)),
            Collider::Aabb {
                half_extents: Vec2::ONE,
            },
        ));

        let events = collision_system(&mut world);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].contact_normal, Vec2::X);
        assert!((position(&world, a).x + 0.25).abs() < 1e-6);
        assert!((position(&world, b).x - 1.75).abs() < 1e-6);
        // The crossed axis is untouched.
        assert_eq!(position(&world, a).y, 0.0);
        assert!((position(&world, b).y - 0.2).abs() < 1e-6);
    }

    #[test]
    fn a_static_pair_reports_the_overlap_but_moves_nothing() {
        let mut world = World::new();
        let a = world.spawn((
            LocalTransform::new(Vec2::ZERO),
            Collider::Aabb {
                half_extents: Vec2::ONE,
            },
            Static,
        ));
        let b = world.spawn((
            LocalTransform::new(Vec2::new(0.5, 0.0)),
            Collider::Aabb {
                half_extents: Vec2::ONE,
            },
            Static,
        ));

        let events = collision_system(&mut world);
        assert_eq!(events.len(), 1);
        assert_eq!(position(&world, a), Vec2::ZERO);
        assert_eq!(position(&world, b), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn separated_shapes_produce_no_events() {
        let mut world = World::new();
        world.spawn((
            LocalTransform::new(Vec2::ZERO),
            Collider::Circle { radius: 0.5 },
        ));
        world.spawn((
            LocalTransform::new(Vec2::new(5.0, 0.0)),
            Collider::Aabb {
                half_extents: Vec2::ONE,
            },
        ));

        let events = collision_system(&mut world);
        assert!(events.is_empty());
    }
}
