//! Per-tick dispatch
//!
//! The table owns the flippers and bumpers and runs one fixed step:
//! 1. Ease every flipper toward its target angle.
//! 2. Run the ball checks (spike, launch, drain).
//! 3. Resolve each reported contact in engine order, applying its impulse
//!    before the next one is looked at.
//! 4. Run post-impact probes that have come due.
//!
//! A ball that raised `BallOut` is retired. The table refuses to touch it again,
//! even if the orchestrator keeps handing it in before the replacement exists.
//! Only the most recent retired id is remembered: a respawned ball always gets
//! a new id and the old one is dropped by the orchestrator.
//!
//! Events go out twice: in the returned [`TickReport`] for the caller of
//! [`Table::step`], and in the bounded [`EventQueue`] for an orchestrator that
//! polls between ticks. Read whichever fits; the queue never outgrows its
//! capacity if left undrained.

use std::collections::HashSet;

use super::ball::{BallMotionTracker, TrackerConfig};
use super::body::{BodyId, ContactEvent, ContactSource, Movable};
use super::bumper::Bumper;
use super::events::{EventQueue, GameEvent};
use super::impact::{ImpactTuning, PaddleImpactResolver};
use super::paddle::Paddle;
use super::probe::{ProbeReading, ProbeSchedule};
use crate::consts::MAX_CONTACTS_REPORTED;
use crate::error::ConfigError;
use crate::input::{InputAction, InputSource};
use crate::settings::TableConfig;

/// What happened during one step
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub tick: u64,
    pub events: Vec<GameEvent>,
    pub probes: Vec<ProbeReading>,
}

impl TickReport {
    pub fn ball_out(&self) -> bool {
        self.events.iter().any(GameEvent::is_ball_out)
    }
}

/// Flippers, bumpers and the ball checks, stepped together
#[derive(Debug, Clone)]
pub struct Table {
    paddles: Vec<Paddle>,
    bumpers: Vec<Bumper>,
    resolver: PaddleImpactResolver,
    tracker: BallMotionTracker,
    probes: ProbeSchedule,
    probe_delay_ticks: u32,
    events: EventQueue,
    retired: Option<BodyId>,
    tick: u64,
}

impl Table {
    /// Build a table, rejecting unknown actions, bad numbers and duplicate ids
    pub fn new(config: &TableConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut ids = HashSet::new();
        let all_ids = config
            .paddles
            .iter()
            .map(|p| p.id)
            .chain(config.bumpers.iter().map(|b| b.id));
        for id in all_ids {
            if !ids.insert(id) {
                return Err(ConfigError::DuplicateBody { id });
            }
        }

        let paddles = config
            .paddles
            .iter()
            .map(|p| -> Result<Paddle, ConfigError> {
                let action: InputAction = p.action.parse()?;
                Ok(Paddle::new(
                    BodyId(p.id),
                    p.side,
                    action,
                    p.position,
                    p.rest_angle,
                    config.flip_angle(),
                    config.flip_smoothing,
                ))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let bumpers = config
            .bumpers
            .iter()
            .map(|b| Bumper::new(BodyId(b.id), b.position, b.force.unwrap_or(config.bumper_force)))
            .collect::<Vec<_>>();

        log::info!(
            "Table ready: {} paddles, {} bumpers, max speed {}",
            paddles.len(),
            bumpers.len(),
            config.max_ball_speed
        );

        Ok(Self {
            paddles,
            bumpers,
            resolver: PaddleImpactResolver::new(ImpactTuning::from(config)),
            tracker: BallMotionTracker::new(TrackerConfig::from(config)),
            probes: ProbeSchedule::new(),
            probe_delay_ticks: config.probe_delay_ticks,
            events: EventQueue::new(),
            retired: None,
            tick: 0,
        })
    }

    pub fn paddles(&self) -> &[Paddle] {
        &self.paddles
    }

    pub fn paddle(&self, id: BodyId) -> Option<&Paddle> {
        self.paddles.iter().find(|p| p.id == id)
    }

    pub fn bumpers(&self) -> &[Bumper] {
        &self.bumpers
    }

    /// Steps taken so far
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Events waiting for the orchestrator, oldest first; drain after each
    /// tick to see every event
    pub fn events(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    pub fn is_retired(&self, ball: BodyId) -> bool {
        self.retired == Some(ball)
    }

    /// Probes still waiting for their tick
    pub fn pending_probes(&self) -> usize {
        self.probes.len()
    }

    /// Ease every flipper toward its target for this tick
    pub fn advance_paddles<I: InputSource + ?Sized>(&mut self, input: &I) {
        for paddle in &mut self.paddles {
            let held = input.is_held(paddle.action);
            paddle.step(held);
        }
    }

    /// Run one fixed step; `ball` is `None` while no ball is live
    pub fn step<B, I>(&mut self, ball: Option<&mut B>, input: &I) -> TickReport
    where
        B: Movable + ContactSource + ?Sized,
        I: InputSource + ?Sized,
    {
        self.tick += 1;
        let mut report = TickReport {
            tick: self.tick,
            ..Default::default()
        };

        self.advance_paddles(input);

        match ball {
            Some(ball) if !self.is_retired(ball.id()) => {
                let launch = input.just_pressed(InputAction::LaunchBall);
                let events = self.tracker.step(ball, launch);
                let out = events.iter().any(GameEvent::is_ball_out);
                report.events.extend(events);

                if out {
                    self.retire(ball.id());
                } else {
                    self.resolve_contacts(ball, input, &mut report);
                }
                report.probes = self.probes.run_due(self.tick, Some(&*ball));
            }
            Some(ball) => {
                log::trace!("Ball {} is retired, skipping", ball.id());
                report.probes = self.probes.run_due::<B>(self.tick, None);
            }
            None => {
                report.probes = self.probes.run_due::<B>(self.tick, None);
            }
        }

        for event in &report.events {
            self.events.push(*event);
        }
        report
    }

    fn retire(&mut self, ball: BodyId) {
        self.retired = Some(ball);
        self.probes.cancel_for(ball);
        self.tracker.reset();
    }

    fn resolve_contacts<B, I>(&mut self, ball: &mut B, input: &I, report: &mut TickReport)
    where
        B: Movable + ContactSource + ?Sized,
        I: InputSource + ?Sized,
    {
        let contacts: Vec<ContactEvent> = ball
            .contacts()
            .iter()
            .take(MAX_CONTACTS_REPORTED)
            .copied()
            .collect();

        for (index, contact) in contacts.iter().enumerate() {
            let ball_id = ball.id();

            if let Some(paddle) = self.paddles.iter().find(|p| p.id == contact.other) {
                log::trace!(
                    "[Ball {ball_id}] Contact {index} with paddle {}: velocity {}, normal {}, local {}, collider local {}, relative velocity {}",
                    paddle.id,
                    ball.velocity(),
                    contact.normal,
                    contact.local_position,
                    contact.collider_local_position,
                    contact.relative_velocity
                );
                let held = input.is_held(paddle.action);
                let plan = self.resolver.resolve(paddle, held, ball);
                let paddle_id = paddle.id;

                if let Some(velocity) = plan.clamp_velocity {
                    report.events.push(GameEvent::VelocityClamped {
                        ball: ball_id,
                        velocity,
                    });
                }
                report.events.push(GameEvent::PaddleHit {
                    ball: ball_id,
                    paddle: paddle_id,
                    impulse: plan.impulse,
                });
                if self.probe_delay_ticks > 0 {
                    self.probes
                        .schedule(ball_id, paddle_id, self.tick, self.probe_delay_ticks);
                }
            } else if let Some(bumper) = self.bumpers.iter().find(|b| b.id == contact.other) {
                let impulse = bumper.impulse_for(ball.position());
                ball.apply_impulse(impulse);
                log::debug!("[Bumper {}] hit ball {ball_id}, impulse {impulse}", bumper.id);
                report.events.push(GameEvent::BumperHit {
                    ball: ball_id,
                    bumper: bumper.id,
                    impulse,
                });
            } else {
                log::trace!("[Ball {ball_id}] Contact with {} (no response)", contact.other);
            }
        }
    }
}
