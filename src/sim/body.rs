//! Body capabilities
//!
//! The table never sees a concrete engine body. It talks to the ball through
//! [`Movable`] (kinematic state plus impulses) and [`ContactSource`] (contacts
//! reported this tick). [`SimBall`] is a point-mass implementation used by the
//! headless session and the tests.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_CONTACTS_REPORTED;

/// Identity of a body as reported by the physics engine
///
/// A respawned ball gets a new id, which is how stale references are told
/// apart from the live ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl std::fmt::Display for BodyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A touching of two bodies reported for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactEvent {
    /// The body the ball touched
    pub other: BodyId,
    /// Contact normal (on the ball)
    pub normal: Vec2,
    /// Contact point in ball-local space
    pub local_position: Vec2,
    /// Contact point in the collider's local space
    pub collider_local_position: Vec2,
    /// Collider velocity relative to the ball at the contact point
    pub relative_velocity: Vec2,
}

impl ContactEvent {
    /// Contact with `other` carrying no geometric detail
    pub fn touching(other: BodyId) -> Self {
        Self {
            other,
            normal: Vec2::ZERO,
            local_position: Vec2::ZERO,
            collider_local_position: Vec2::ZERO,
            relative_velocity: Vec2::ZERO,
        }
    }
}

/// Position, velocity and impulse capability of a dynamic body
pub trait Movable {
    fn id(&self) -> BodyId;
    /// World position
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    /// Instantaneous change of momentum; the body divides by its own mass
    fn apply_impulse(&mut self, impulse: Vec2);
    fn mass(&self) -> f32 {
        1.0
    }
    fn is_sleeping(&self) -> bool;
    fn set_sleeping(&mut self, sleeping: bool);
}

/// Enumerates the contacts reported for the current tick
pub trait ContactSource {
    fn contacts(&self) -> &[ContactEvent];
}

/// Point-mass ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimBall {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub mass: f32,
    pub sleeping: bool,
    /// Contacts for the current tick (cleared by [`SimBall::integrate`])
    #[serde(skip)]
    contacts: Vec<ContactEvent>,
}

impl SimBall {
    /// A dormant ball at `pos`
    pub fn new(id: BodyId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            mass: 1.0,
            sleeping: true,
            contacts: Vec::with_capacity(MAX_CONTACTS_REPORTED),
        }
    }

    /// Report a contact for this tick; extra contacts beyond the engine limit are dropped
    pub fn push_contact(&mut self, contact: ContactEvent) -> bool {
        if self.contacts.len() >= MAX_CONTACTS_REPORTED {
            return false;
        }
        self.contacts.push(contact);
        true
    }

    /// Advance one step: integrate gravity and velocity, clear contacts
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        self.contacts.clear();
        if self.sleeping {
            return;
        }
        self.vel += gravity * dt;
        self.pos += self.vel * dt;
    }
}

impl Movable for SimBall {
    fn id(&self) -> BodyId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.pos
    }

    fn velocity(&self) -> Vec2 {
        self.vel
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.vel = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        if self.mass > 0.0 {
            self.vel += impulse / self.mass;
        }
    }

    fn mass(&self) -> f32 {
        self.mass
    }

    fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    fn set_sleeping(&mut self, sleeping: bool) {
        self.sleeping = sleeping;
    }
}

impl ContactSource for SimBall {
    fn contacts(&self) -> &[ContactEvent] {
        &self.contacts
    }
}
