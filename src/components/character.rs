use glam::Vec2;
use hecs::Entity;
use std::collections::HashSet;

use crate::fsm::StateMachine;

/// Movement tuning and the walking-permission gate, attached to a walker.
///
/// Position and facing live on the entity's `LocalTransform` (facing is the
/// sign of `scale.x`); the active movement state lives in [`MoveFsm`]. This
/// struct carries the pieces that are configuration rather than pose.
pub struct Character {
    /// Movement speed in world units per second. Constant at runtime.
    pub speed: f32,
    /// When false, tap commands are ignored and an in-progress walk is
    /// cancelled the moment the flag drops.
    pub walking_allowed: bool,
}

impl Character {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            walking_allowed: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Movement state machine
// ---------------------------------------------------------------------------

/// All discrete movement states a walker can be in.
///
/// Transition logic lives in `src/systems/character.rs` (where it has access
/// to the transform and the animation signal) rather than here so that this
/// file stays pure data.
#[derive(Clone)]
pub enum MoveState {
    /// Standing still, no destination in flight.
    Idle,
    /// Heading straight toward `destination` at `Character::speed`.
    /// The destination is fixed for the state's lifetime; a new tap replaces
    /// the whole state rather than editing this one.
    Walking { destination: Vec2 },
}

/// FSM component attached to a walker entity.
pub type MoveFsm = StateMachine<MoveState>;

// ---------------------------------------------------------------------------

/// Flag the animation system polls to choose between the walk cycle and rest.
///
/// Raised on entering Walking, cleared on entering Idle. Both operations are
/// idempotent, so re-raising mid-walk or clearing an already-clear signal is
/// harmless.
pub struct MoveSignal {
    raised: bool,
}

impl MoveSignal {
    pub fn new() -> Self {
        Self { raised: false }
    }

    pub fn raise(&mut self) {
        self.raised = true;
    }

    pub fn clear(&mut self) {
        self.raised = false;
    }

    pub fn is_raised(&self) -> bool {
        self.raised
    }
}

/// Tracks how long a walker has been pressed against scenery.
///
/// `timer` only has meaning while a contact is ongoing; it rewinds to zero
/// when a fresh contact begins and again every time the threshold fires.
pub struct ContactState {
    /// Seconds of sustained contact required before movement is interrupted.
    pub stop_threshold: f32,
    /// Contact time accumulated since the current contact began or the
    /// threshold last fired.
    pub timer: f32,
    /// Entities this walker overlapped last frame. Lets the interrupt system
    /// tell a brand-new contact from one that is persisting.
    pub touching: HashSet<Entity>,
}

impl ContactState {
    pub fn new(stop_threshold: f32) -> Self {
        Self {
            stop_threshold,
            timer: 0.0,
            touching: HashSet::new(),
        }
    }
}

/// Phase accumulator for the hop bob played while the walker moves.
pub struct WalkAnimation {
    pub phase: f32,
}

impl WalkAnimation {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }
}
