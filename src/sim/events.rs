//! Table events
//!
//! Everything the table wants the outside world to know about goes through
//! [`EventQueue`]. The respawn orchestrator drains it after each tick and reacts
//! to [`GameEvent::BallOut`]. The queue is bounded: a caller that only reads
//! tick reports loses the oldest queued events, never memory.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::BodyId;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A dormant ball was woken and launched
    Launched { ball: BodyId, impulse: Vec2 },
    /// Velocity changed by more than the spike threshold in one tick (diagnostic only)
    VelocitySpike {
        ball: BodyId,
        previous: Vec2,
        current: Vec2,
    },
    /// The ball crossed the drain boundary; it is retired from this point on
    BallOut { ball: BodyId, position: Vec2 },
    BumperHit {
        ball: BodyId,
        bumper: BodyId,
        impulse: Vec2,
    },
    PaddleHit {
        ball: BodyId,
        paddle: BodyId,
        impulse: Vec2,
    },
    /// Incoming velocity was over the cap and was clamped before a flipper impulse
    VelocityClamped { ball: BodyId, velocity: Vec2 },
}

impl GameEvent {
    /// Ball the event concerns
    pub fn ball(&self) -> BodyId {
        match *self {
            GameEvent::Launched { ball, .. }
            | GameEvent::VelocitySpike { ball, .. }
            | GameEvent::BallOut { ball, .. }
            | GameEvent::BumperHit { ball, .. }
            | GameEvent::PaddleHit { ball, .. }
            | GameEvent::VelocityClamped { ball, .. } => ball,
        }
    }

    pub fn is_ball_out(&self) -> bool {
        matches!(self, GameEvent::BallOut { .. })
    }
}

/// Events kept when nobody drains the queue
pub const EVENT_QUEUE_CAPACITY: usize = 256;

/// Bounded FIFO of events waiting for the orchestrator
#[derive(Debug, Clone)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::with_capacity(EVENT_QUEUE_CAPACITY)
    }
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    /// Append an event, dropping the oldest one when full
    pub fn push(&mut self, event: GameEvent) {
        if self.events.len() == self.capacity {
            if let Some(old) = self.events.pop_front() {
                self.dropped += 1;
                log::warn!("Event queue full ({}), dropping {old:?}", self.capacity);
            }
        }
        self.events.push_back(event);
    }

    /// Events discarded because the queue was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
