//! Post-impact probes
//!
//! A short while after a flipper hit, the table takes one read-only look at the
//! ball and logs where it went. Probes run on the same tick loop as everything
//! else, only ever see the ball through a shared reference, and are skipped if
//! the ball they were scheduled for is gone.

use glam::Vec2;

use super::body::{BodyId, Movable};

/// What a probe saw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeReading {
    pub ball: BodyId,
    pub paddle: BodyId,
    pub tick: u64,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Copy)]
struct PendingProbe {
    ball: BodyId,
    paddle: BodyId,
    due_tick: u64,
}

/// Probes waiting for their tick
#[derive(Debug, Clone, Default)]
pub struct ProbeSchedule {
    pending: Vec<PendingProbe>,
}

impl ProbeSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, ball: BodyId, paddle: BodyId, now: u64, delay_ticks: u32) {
        self.pending.push(PendingProbe {
            ball,
            paddle,
            due_tick: now + u64::from(delay_ticks),
        });
    }

    /// Drop every probe aimed at `ball`
    pub fn cancel_for(&mut self, ball: BodyId) {
        self.pending.retain(|p| p.ball != ball);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Run every probe due at or before `now` against the current ball
    pub fn run_due<B: Movable + ?Sized>(&mut self, now: u64, ball: Option<&B>) -> Vec<ProbeReading> {
        let mut readings = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_tick > now {
                i += 1;
                continue;
            }
            let probe = self.pending.swap_remove(i);
            match ball {
                Some(ball) if ball.id() == probe.ball => {
                    let reading = ProbeReading {
                        ball: probe.ball,
                        paddle: probe.paddle,
                        tick: now,
                        position: ball.position(),
                        velocity: ball.velocity(),
                    };
                    log::debug!(
                        "[Paddle {}] Post-collision - Ball {} Position: {}, Velocity: {}",
                        probe.paddle,
                        probe.ball,
                        reading.position,
                        reading.velocity
                    );
                    readings.push(reading);
                }
                _ => log::trace!("[Paddle {}] Probe skipped, ball {} is gone", probe.paddle, probe.ball),
            }
        }
        readings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::SimBall;

    #[test]
    fn test_probe_waits_for_due_tick() {
        let mut probes = ProbeSchedule::new();
        let ball = SimBall::new(BodyId(1), Vec2::new(3.0, 4.0));
        probes.schedule(BodyId(1), BodyId(9), 10, 2);

        assert!(probes.run_due(11, Some(&ball)).is_empty());
        let readings = probes.run_due(12, Some(&ball));
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].position, Vec2::new(3.0, 4.0));
        assert!(probes.is_empty());
    }

    #[test]
    fn test_probe_skipped_for_replaced_ball() {
        let mut probes = ProbeSchedule::new();
        let replacement = SimBall::new(BodyId(2), Vec2::ZERO);
        probes.schedule(BodyId(1), BodyId(9), 0, 1);

        assert!(probes.run_due(5, Some(&replacement)).is_empty());
        assert!(probes.is_empty());
    }

    #[test]
    fn test_probe_skipped_without_ball() {
        let mut probes = ProbeSchedule::new();
        probes.schedule(BodyId(1), BodyId(9), 0, 1);
        assert!(probes.run_due::<SimBall>(1, None).is_empty());
        assert!(probes.is_empty());
    }

    #[test]
    fn test_cancel_for_ball() {
        let mut probes = ProbeSchedule::new();
        probes.schedule(BodyId(1), BodyId(9), 0, 1);
        probes.schedule(BodyId(2), BodyId(9), 0, 1);
        probes.cancel_for(BodyId(1));
        assert_eq!(probes.len(), 1);
    }
}
