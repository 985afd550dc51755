//! Collision-response simulation module
//!
//! Everything here runs synchronously inside one fixed physics step:
//! - No suspension points, no threads
//! - Contacts handled in engine order, one impulse applied before the next
//! - Flipper smoothing and angular velocity are per tick
//! - Engine bodies reached only through the capabilities in [`body`]

pub mod ball;
pub mod body;
pub mod bumper;
pub mod events;
pub mod impact;
pub mod paddle;
pub mod probe;
pub mod table;

pub use ball::{BallMotionTracker, TrackerConfig};
pub use body::{BodyId, ContactEvent, ContactSource, Movable, SimBall};
pub use bumper::{Bumper, SurfaceMaterial, radial_impulse};
pub use events::{EVENT_QUEUE_CAPACITY, EventQueue, GameEvent};
pub use impact::{ImpactBreakdown, ImpactPlan, ImpactTuning, PaddleImpactResolver, hit_fraction, speed_factor};
pub use paddle::{Paddle, PaddleSide};
pub use probe::{ProbeReading, ProbeSchedule};
pub use table::{Table, TickReport};
