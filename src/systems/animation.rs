use hecs::World;

use crate::components::{MoveSignal, RenderOffset, WalkAnimation};

const HOP_FREQUENCY: f32 = 3.2; // sine cycles per second
const HOP_HEIGHT: f32 = 0.09;
const SETTLE_RATE: f32 = 6.0; // decay toward rest, per second

/// Reads `MoveSignal`, writes `RenderOffset`. Runs after the state systems
/// and before rendering, so the bob reflects this frame's signal.
///
/// While the signal is raised the sprite hops on a rectified sine; once it
/// clears, the bob decays and snaps to exact rest instead of trailing off in
/// denormals.
pub fn animation_system(world: &mut World, dt: f32) {
    for (_e, (anim, signal, offset)) in
        world.query_mut::<(&mut WalkAnimation, &MoveSignal, &mut RenderOffset)>()
    {
        if signal.is_raised() {
            anim.phase += std::f32::consts::TAU * HOP_FREQUENCY * dt;
            offset.0.y = anim.phase.sin().abs() * HOP_HEIGHT;
        } else {
            anim.phase = 0.0;
            offset.0.y -= offset.0.y * (SETTLE_RATE * dt).min(1.0);
            if offset.0.y.abs() < 1e-4 {
                offset.0.y = 0.0;
            }
        }
    }
}

// ---------------------------------------------------------------------------
