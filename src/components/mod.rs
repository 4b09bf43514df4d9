use glam::{Mat4, Quat, Vec2, Vec3};
use hecs::Entity;

mod character;

pub use character::{Character, ContactState, MoveFsm, MoveSignal, MoveState, WalkAnimation};

/// Spatial transform: 2D position and scale, plus a draw layer.
pub struct LocalTransform {
    pub position: Vec2,
    /// `scale.x < 0` mirrors the sprite horizontally; its sign is the single
    /// source of truth for which way a walker faces.
    pub scale: Vec2,
    /// Entities with a higher layer draw in front of lower ones.
    pub layer: f32,
}

impl LocalTransform {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            scale: Vec2::ONE,
            layer: 0.0,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale.extend(1.0),
            Quat::IDENTITY,
            self.position.extend(self.layer),
        )
    }

    /// Facing derived from the horizontal mirror. Sprites are authored
    /// looking toward +X, so a negative `scale.x` means looking left.
    pub fn facing_left(&self) -> bool {
        self.scale.x < 0.0
    }
}

/// Extra translation applied at draw time only. The walk-bob animation writes
/// here so the collision position stays untouched by cosmetic motion.
pub struct RenderOffset(pub Vec2);

/// Collision shape attached to an entity.
#[derive(Clone, Copy)]
pub enum Collider {
    Circle { radius: f32 },
    Aabb { half_extents: Vec2 },
}

/// Marker: entity is immovable (never pushed during overlap resolution).
pub struct Static;

/// Collision contact produced by the detection phase.
pub struct CollisionEvent {
    pub entity_a: Entity,
    pub entity_b: Entity,
    pub contact_normal: Vec2,
    pub penetration_depth: f32,
}

/// Index into the MeshStore resource.
#[derive(Clone, Copy)]
pub struct MeshHandle(pub usize);

/// RGB tint multiplied with the mesh's vertex colors at draw time.
pub struct Color(pub Vec3);
