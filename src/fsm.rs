/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually an enum). The machine tracks the current
/// state and how long it has been current. Transition logic is intentionally
/// kept out of the machine itself; it lives in the ECS systems that drive it,
/// where the surrounding components are in scope.
pub struct StateMachine<S> {
    pub state: S,
    /// Seconds spent in the current state. Reset to 0.0 on each transition.
    pub elapsed: f32,
}

impl<S> StateMachine<S> {
    /// Create a new machine starting in `initial`.
    pub fn new(initial: S) -> Self {
        Self {
            state: initial,
            elapsed: 0.0,
        }
    }

    /// Transition to `next` only if it is a different variant from the
    /// current state (compared by discriminant, so no `PartialEq` required).
    /// Resets `elapsed` to 0.0 on an actual transition.
    pub fn go(&mut self, next: S) {
        if std::mem::discriminant(&self.state) != std::mem::discriminant(&next) {
            self.state = next;
            self.elapsed = 0.0;
        }
    }

    /// Like `go`, but always transitions even if the variant is the same.
    /// Use when the variant carries data that changes (e.g. re-targeting a
    /// walk toward a new destination without waiting for the old one to end).
    pub fn force_go(&mut self, next: S) {
        self.state = next;
        self.elapsed = 0.0;
    }

    /// Advance the elapsed-in-state timer by `dt` seconds.
    /// Call once per frame after processing transitions.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }
}
