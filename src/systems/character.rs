use glam::Vec2;
use hecs::{Entity, World};
use std::collections::HashSet;

use crate::components::{
    Character, CollisionEvent, ContactState, LocalTransform, MoveFsm, MoveSignal, MoveState,
};

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

#[cfg(debug_assertions)]
fn log_transition(state: &MoveState) {
    let label = match state {
        MoveState::Idle => "Idle",
        MoveState::Walking { .. } => "Walking",
    };
    println!("[move_state] → {}", label);
}

/// Put the walker into Walking toward `destination`: flip the sprite if it
/// faces away from the target, raise the movement signal, swap the state.
///
/// Uses `force_go` so a tap mid-walk restarts Walking with the new
/// destination payload instead of being ignored as a same-variant change.
fn enter_walking(
    fsm: &mut MoveFsm,
    local: &mut LocalTransform,
    signal: &mut MoveSignal,
    destination: Vec2,
) {
    let relative = destination - local.position;

    // Flip only when the current facing disagrees with the travel direction.
    // A destination straight above or below keeps the current facing.
    let facing_left = local.facing_left();
    if (relative.x < 0.0 && !facing_left) || (relative.x > 0.0 && facing_left) {
        local.scale.x = -local.scale.x;
    }

    signal.raise();
    fsm.force_go(MoveState::Walking { destination });
    #[cfg(debug_assertions)]
    log_transition(&fsm.state);
}

/// Put the walker into Idle and clear the movement signal.
/// Callers only invoke this from a Walking state, so `go` always fires.
fn enter_idle(fsm: &mut MoveFsm, signal: &mut MoveSignal) {
    signal.clear();
    fsm.go(MoveState::Idle);
    #[cfg(debug_assertions)]
    log_transition(&fsm.state);
}

// ---------------------------------------------------------------------------
// Command surface
// ---------------------------------------------------------------------------

/// Send `walker` toward `destination` (world space). Called once per tap
/// gesture; ignored while walking is disallowed. Takes effect before the
/// same frame's movement update, so the first step lands immediately.
pub fn command_walk(world: &mut World, walker: Entity, destination: Vec2) {
    if let Ok((character, fsm, local, signal)) = world.query_one_mut::<(
        &Character,
        &mut MoveFsm,
        &mut LocalTransform,
        &mut MoveSignal,
    )>(walker)
    {
        if !character.walking_allowed {
            return;
        }
        enter_walking(fsm, local, signal, destination);
    }
}

/// Grant or revoke walking permission. Revoking mid-walk cancels the walk on
/// the spot; the walker is Idle by the time this returns.
pub fn set_walking_allowed(world: &mut World, walker: Entity, allowed: bool) {
    if let Ok((character, fsm, signal)) =
        world.query_one_mut::<(&mut Character, &mut MoveFsm, &mut MoveSignal)>(walker)
    {
        character.walking_allowed = allowed;
        if !allowed && matches!(fsm.state, MoveState::Walking { .. }) {
            enter_idle(fsm, signal);
        }
    }
}

// ---------------------------------------------------------------------------
// Per-frame movement
// ---------------------------------------------------------------------------

/// Advance every walker by one frame: step toward the destination at
/// `Character::speed`, landing exactly on it with no overshoot, then go Idle
/// on the following frame once the remaining displacement reads zero.
///
/// `dt <= 0.0` (startup frame, or a stalled clock) is a whole-frame no-op.
pub fn walk_system(world: &mut World, dt: f32) {
    if dt <= 0.0 {
        return;
    }

    for (_e, (character, fsm, local, signal)) in world.query_mut::<(
        &Character,
        &mut MoveFsm,
        &mut LocalTransform,
        &mut MoveSignal,
    )>() {
        fsm.tick(dt);

        if let MoveState::Walking { destination } = fsm.state {
            // Remaining displacement, recomputed fresh each frame since the
            // position (and sometimes the destination) moved.
            let relative = destination - local.position;

            if relative == Vec2::ZERO {
                // Last frame's final step landed exactly on the destination.
                enter_idle(fsm, signal);
                continue;
            }

            let max_step = character.speed * dt;
            if relative.length() > max_step {
                local.position += relative.normalize() * max_step;
            } else {
                // Final step: land exactly, never overshoot. A zero-speed
                // walker never gets here and keeps walking in place.
                local.position = destination;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Contact debounce
// ---------------------------------------------------------------------------

/// Filter raw overlap events into movement interrupts.
///
/// Overlap events carry no began/persisted distinction, so each walker keeps
/// the set of entities it touched last frame. A partner missing from that set
/// starts a fresh contact and rewinds the timer; a persisting partner
/// accumulates time, once per frame no matter how many partners persist.
/// When the accumulated time reaches the stop threshold the timer rewinds and
/// the active state takes its collision response: Walking stops, Idle shrugs
/// it off. Contact that keeps pressing fires again every threshold interval.
pub fn contact_interrupt_system(world: &mut World, events: &[CollisionEvent], dt: f32) {
    if dt <= 0.0 {
        return;
    }

    for (entity, (contact, fsm, signal)) in
        world.query_mut::<(&mut ContactState, &mut MoveFsm, &mut MoveSignal)>()
    {
        let mut current: HashSet<Entity> = HashSet::new();
        for event in events {
            if event.entity_a == entity {
                current.insert(event.entity_b);
            } else if event.entity_b == entity {
                current.insert(event.entity_a);
            }
        }

        let began = current.iter().any(|e| !contact.touching.contains(e));
        let persisted = current.iter().any(|e| contact.touching.contains(e));

        if began {
            // A fresh contact rewinds the clock, even if an older contact
            // was mid-accumulation.
            contact.timer = 0.0;
        } else if persisted {
            contact.timer += dt;
            if contact.timer >= contact.stop_threshold {
                contact.timer = 0.0;
                if matches!(fsm.state, MoveState::Walking { .. }) {
                    enter_idle(fsm, signal);
                }
                // Idle has no collision response; the timer still rewinds.
            }
        }

        contact.touching = current;
    }
}

// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{command_walk, contact_interrupt_system, set_walking_allowed, walk_system};
    use crate::components::{
        Character, Collider, CollisionEvent, ContactState, LocalTransform, MoveFsm, MoveSignal,
        MoveState, Static,
    };
    use crate::systems::collision_system;
    use glam::Vec2;
    use hecs::{Entity, World};

    const DT: f32 = 0.1;
    const SPEED: f32 = 5.0;
    const STOP_THRESHOLD: f32 = 0.5;

    fn spawn_walker(world: &mut World, speed: f32) -> Entity {
        world.spawn((
            LocalTransform::new(Vec2::ZERO),
            Character::new(speed),
            MoveFsm::new(MoveState::Idle),
            MoveSignal::new(),
            ContactState::new(STOP_THRESHOLD),
            Collider::Circle { radius: 0.35 },
        ))
    }

    fn position(world: &World, e: Entity) -> Vec2 {
        world.get::<&LocalTransform>(e).unwrap().position
    }

    fn scale_x(world: &World, e: Entity) -> f32 {
        world.get::<&LocalTransform>(e).unwrap().scale.x
    }

    fn is_walking(world: &World, e: Entity) -> bool {
        matches!(
            world.get::<&MoveFsm>(e).unwrap().state,
            MoveState::Walking { .. }
        )
    }

    fn signal_raised(world: &World, e: Entity) -> bool {
        world.get::<&MoveSignal>(e).unwrap().is_raised()
    }

    fn contact_with(a: Entity, b: Entity) -> CollisionEvent {
        CollisionEvent {
            entity_a: a,
            entity_b: b,
            contact_normal: Vec2::X,
            penetration_depth: 0.01,
        }
    }

    // -- idle and arrival -----------------------------------------------

    #[test]
    fn idle_walker_stays_put_without_commands() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        for _ in 0..100 {
            walk_system(&mut world, DT);
        }
        assert!(!is_walking(&world, walker));
        assert_eq!(position(&world, walker), Vec2::ZERO);
    }

    #[test]
    fn tap_starts_walking_and_the_first_step_lands_same_frame() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        command_walk(&mut world, walker, Vec2::new(10.0, 0.0));
        assert!(is_walking(&world, walker));
        assert!(signal_raised(&world, walker));
        walk_system(&mut world, DT);
        assert_eq!(position(&world, walker), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn walker_reaches_the_destination_exactly_then_idles_next_frame() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        command_walk(&mut world, walker, Vec2::new(10.0, 0.0));

        // speed 5 at dt 0.1 covers 0.5 per frame: 20 frames to (10, 0).
        for _ in 0..20 {
            walk_system(&mut world, DT);
        }
        assert_eq!(position(&world, walker), Vec2::new(10.0, 0.0));
        assert!(is_walking(&world, walker));

        walk_system(&mut world, DT);
        assert!(!is_walking(&world, walker));
        assert!(!signal_raised(&world, walker));
        assert_eq!(position(&world, walker), Vec2::new(10.0, 0.0));
    }

    #[test]
    fn steps_never_exceed_speed_times_dt_and_never_overshoot() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        let destination = Vec2::new(0.6, 0.8);
        command_walk(&mut world, walker, destination);

        let mut prev = position(&world, walker);
        let mut remaining = (destination - prev).length();
        for _ in 0..10 {
            walk_system(&mut world, DT);
            let now = position(&world, walker);
            assert!((now - prev).length() <= SPEED * DT + 1e-5);
            // The gap to the destination shrinks monotonically; an overshoot
            // would widen it.
            let gap = (destination - now).length();
            assert!(gap <= remaining + 1e-5);
            remaining = gap;
            prev = now;
        }
        assert_eq!(position(&world, walker), destination);
    }

    #[test]
    fn tap_on_the_current_position_idles_after_one_frame() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        command_walk(&mut world, walker, Vec2::ZERO);
        assert!(is_walking(&world, walker));
        walk_system(&mut world, DT);
        assert!(!is_walking(&world, walker));
        assert_eq!(position(&world, walker), Vec2::ZERO);
    }

    #[test]
    fn retap_mid_walk_replaces_the_destination() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        command_walk(&mut world, walker, Vec2::new(5.0, 0.0));
        for _ in 0..3 {
            walk_system(&mut world, DT);
        }
        assert_eq!(position(&world, walker), Vec2::new(1.5, 0.0));

        command_walk(&mut world, walker, Vec2::new(-2.0, 0.0));
        match world.get::<&MoveFsm>(walker).unwrap().state {
            MoveState::Walking { destination } => {
                assert_eq!(destination, Vec2::new(-2.0, 0.0));
            }
            MoveState::Idle => panic!("expected Walking"),
        }

        for _ in 0..7 {
            walk_system(&mut world, DT);
        }
        assert_eq!(position(&world, walker), Vec2::new(-2.0, 0.0));
    }

    #[test]
    fn zero_speed_walker_walks_in_place_forever() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, 0.0);
        command_walk(&mut world, walker, Vec2::new(1.0, 0.0));
        for _ in 0..1000 {
            walk_system(&mut world, DT);
        }
        assert!(is_walking(&world, walker));
        assert_eq!(position(&world, walker), Vec2::ZERO);
    }

    #[test]
    fn non_positive_dt_is_a_whole_frame_no_op() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        command_walk(&mut world, walker, Vec2::new(10.0, 0.0));

        walk_system(&mut world, 0.0);
        walk_system(&mut world, -0.016);

        assert!(is_walking(&world, walker));
        assert_eq!(position(&world, walker), Vec2::ZERO);
        assert_eq!(world.get::<&MoveFsm>(walker).unwrap().elapsed, 0.0);
    }

    // -- permission gate ------------------------------------------------

    #[test]
    fn tap_is_ignored_while_walking_is_disallowed() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        set_walking_allowed(&mut world, walker, false);

        command_walk(&mut world, walker, Vec2::new(4.0, 0.0));
        assert!(!is_walking(&world, walker));
        assert!(!signal_raised(&world, walker));

        for _ in 0..10 {
            walk_system(&mut world, DT);
        }
        assert_eq!(position(&world, walker), Vec2::ZERO);
    }

    #[test]
    fn disallowing_mid_walk_idles_before_the_call_returns() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        command_walk(&mut world, walker, Vec2::new(10.0, 0.0));
        for _ in 0..2 {
            walk_system(&mut world, DT);
        }

        set_walking_allowed(&mut world, walker, false);
        assert!(!is_walking(&world, walker));
        assert!(!signal_raised(&world, walker));

        // No further motion on any later frame either.
        for _ in 0..10 {
            walk_system(&mut world, DT);
        }
        assert_eq!(position(&world, walker), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn reallowing_restores_tap_commands() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        set_walking_allowed(&mut world, walker, false);
        command_walk(&mut world, walker, Vec2::new(1.0, 0.0));
        assert!(!is_walking(&world, walker));

        set_walking_allowed(&mut world, walker, true);
        command_walk(&mut world, walker, Vec2::new(1.0, 0.0));
        assert!(is_walking(&world, walker));
    }

    // -- facing ---------------------------------------------------------

    #[test]
    fn facing_flips_only_when_the_target_side_disagrees() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        assert_eq!(scale_x(&world, walker), 1.0);

        // Target to the left while facing right: flip.
        command_walk(&mut world, walker, Vec2::new(-3.0, 0.0));
        assert_eq!(scale_x(&world, walker), -1.0);

        // Retarget further left while already facing left: no flip.
        command_walk(&mut world, walker, Vec2::new(-6.0, 1.0));
        assert_eq!(scale_x(&world, walker), -1.0);

        // Target back on the right: flip back.
        command_walk(&mut world, walker, Vec2::new(4.0, 0.0));
        assert_eq!(scale_x(&world, walker), 1.0);
    }

    #[test]
    fn straight_vertical_destination_keeps_the_current_facing() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        command_walk(&mut world, walker, Vec2::new(-1.0, 0.0));
        assert_eq!(scale_x(&world, walker), -1.0);

        command_walk(&mut world, walker, Vec2::new(-1.0, 5.0));
        assert_eq!(scale_x(&world, walker), -1.0);
    }

    // -- contact debounce -----------------------------------------------

    #[test]
    fn brief_contact_never_interrupts_a_walk() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        let wall = world.spawn((LocalTransform::new(Vec2::new(50.0, 0.0)),));
        command_walk(&mut world, walker, Vec2::new(10.0, 0.0));

        // Contact for 4 frames: begin plus 0.3s of persistence, under the
        // 0.5s threshold.
        for frame in 0..10 {
            walk_system(&mut world, DT);
            let events = if frame < 4 {
                vec![contact_with(walker, wall)]
            } else {
                Vec::new()
            };
            contact_interrupt_system(&mut world, &events, DT);
        }
        assert!(is_walking(&world, walker));
    }

    #[test]
    fn sustained_contact_interrupts_exactly_at_the_threshold_frame() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        let wall = world.spawn((LocalTransform::new(Vec2::new(50.0, 0.0)),));
        command_walk(&mut world, walker, Vec2::new(10.0, 0.0));

        // Frames 1-4 free, contact from frame 5 on. Begin at frame 5 holds
        // the timer at zero; frames 6-10 accumulate 0.5s, firing on frame 10.
        for frame in 1..=10 {
            walk_system(&mut world, DT);
            let events = if frame >= 5 {
                vec![contact_with(walker, wall)]
            } else {
                Vec::new()
            };
            contact_interrupt_system(&mut world, &events, DT);
            if frame <= 9 {
                assert!(is_walking(&world, walker), "interrupted early at frame {frame}");
            }
        }

        assert!(!is_walking(&world, walker));
        // Ten frames of stepping before the stop: 10 * 0.5 units.
        assert_eq!(position(&world, walker), Vec2::new(5.0, 0.0));
        assert_eq!(world.get::<&ContactState>(walker).unwrap().timer, 0.0);
    }

    #[test]
    fn contact_outlasting_the_threshold_fires_again_each_interval() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        let wall = world.spawn((LocalTransform::new(Vec2::new(50.0, 0.0)),));
        command_walk(&mut world, walker, Vec2::new(10.0, 0.0));

        // Begin at frame 1; first fire lands on frame 6 (0.5s later).
        for frame in 1..=6 {
            walk_system(&mut world, DT);
            contact_interrupt_system(&mut world, &[contact_with(walker, wall)], DT);
            if frame <= 5 {
                assert!(is_walking(&world, walker));
            }
        }
        assert!(!is_walking(&world, walker));

        // Walk again while the same contact keeps pressing: the next fire
        // comes one full threshold later, not immediately.
        command_walk(&mut world, walker, Vec2::new(10.0, 0.0));
        for frame in 1..=5 {
            walk_system(&mut world, DT);
            contact_interrupt_system(&mut world, &[contact_with(walker, wall)], DT);
            if frame <= 4 {
                assert!(is_walking(&world, walker), "re-fired early at frame {frame}");
            }
        }
        assert!(!is_walking(&world, walker));
    }

    #[test]
    fn a_new_contact_partner_rewinds_the_timer() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        let wall_a = world.spawn((LocalTransform::new(Vec2::new(50.0, 0.0)),));
        let wall_b = world.spawn((LocalTransform::new(Vec2::new(60.0, 0.0)),));
        command_walk(&mut world, walker, Vec2::new(10.0, 0.0));

        // Wall A: begin frame 1, accumulating frames 2-4 (0.3s).
        for _ in 1..=4 {
            walk_system(&mut world, DT);
            contact_interrupt_system(&mut world, &[contact_with(walker, wall_a)], DT);
        }
        // Wall B joins at frame 5: fresh contact, timer rewinds to zero.
        walk_system(&mut world, DT);
        contact_interrupt_system(
            &mut world,
            &[contact_with(walker, wall_a), contact_with(walker, wall_b)],
            DT,
        );
        assert_eq!(world.get::<&ContactState>(walker).unwrap().timer, 0.0);

        // 0.4s more of both persisting: still under threshold.
        for _ in 6..=9 {
            walk_system(&mut world, DT);
            contact_interrupt_system(
                &mut world,
                &[contact_with(walker, wall_a), contact_with(walker, wall_b)],
                DT,
            );
        }
        assert!(is_walking(&world, walker));

        // One more frame crosses the threshold.
        walk_system(&mut world, DT);
        contact_interrupt_system(
            &mut world,
            &[contact_with(walker, wall_a), contact_with(walker, wall_b)],
            DT,
        );
        assert!(!is_walking(&world, walker));
    }

    #[test]
    fn a_gap_in_contact_starts_a_fresh_episode() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        let wall = world.spawn((LocalTransform::new(Vec2::new(50.0, 0.0)),));
        command_walk(&mut world, walker, Vec2::new(20.0, 0.0));

        // Contact frames 1-4, a one-frame gap, contact again from frame 6.
        // The second episode begins from zero, so nothing fires before
        // frame 11 (begin at 6, 0.5s accumulated over frames 7-11).
        for frame in 1..=10 {
            walk_system(&mut world, DT);
            let events = if frame == 5 {
                Vec::new()
            } else {
                vec![contact_with(walker, wall)]
            };
            contact_interrupt_system(&mut world, &events, DT);
        }
        assert!(is_walking(&world, walker));

        walk_system(&mut world, DT);
        contact_interrupt_system(&mut world, &[contact_with(walker, wall)], DT);
        assert!(!is_walking(&world, walker));
    }

    #[test]
    fn idle_walker_shrugs_off_sustained_contact() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        let wall = world.spawn((LocalTransform::new(Vec2::new(50.0, 0.0)),));

        for _ in 0..20 {
            walk_system(&mut world, DT);
            contact_interrupt_system(&mut world, &[contact_with(walker, wall)], DT);
        }
        assert!(!is_walking(&world, walker));
        assert_eq!(position(&world, walker), Vec2::ZERO);
    }

    // -- full pipeline against real geometry ----------------------------

    #[test]
    fn walking_into_a_wall_stops_after_half_a_second_of_pressing() {
        let mut world = World::new();
        let walker = spawn_walker(&mut world, SPEED);
        world.spawn((
            LocalTransform::new(Vec2::new(3.0, 0.0)),
            Collider::Aabb {
                half_extents: Vec2::new(0.25, 2.0),
            },
            Static,
        ));

        // Destination on the far side of the wall.
        command_walk(&mut world, walker, Vec2::new(6.0, 0.0));

        for _ in 0..60 {
            walk_system(&mut world, DT);
            let events = collision_system(&mut world);
            contact_interrupt_system(&mut world, &events, DT);
        }

        assert!(!is_walking(&world, walker));
        // Pressed against the wall face: wall at x=3 minus its half extent
        // minus the walker radius.
        let resting = position(&world, walker);
        assert!((resting.x - 2.4).abs() < 1e-4, "rested at {resting:?}");
        assert_eq!(resting.y, 0.0);
    }
}
