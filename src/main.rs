//! Pinball Sim entry point
//!
//! Runs a headless session: a minimal engine stand-in (gravity, walls, overlap
//! contacts) drives the table, an autopilot works the flippers, and the session
//! plays respawn orchestrator whenever the ball drains.
//!
//! Usage: `pinball-sim [config.json] [ticks]`

use std::collections::HashSet;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use pinball_sim::consts::*;
use pinball_sim::sim::{BodyId, Bumper, ContactEvent, GameEvent, Movable, SimBall, Table};
use pinball_sim::{ConfigError, InputFrame, TableConfig};

const BALL_RADIUS: f32 = 10.0;
const BUMPER_RADIUS: f32 = 25.0;
const PADDLE_THICKNESS: f32 = 8.0;
const GRAVITY: Vec2 = Vec2::new(0.0, 980.0);
const TABLE_WIDTH: f32 = 480.0;
const SPAWN_POINT: Vec2 = Vec2::new(240.0, 640.0);
const LAUNCH_DELAY_TICKS: u64 = 30;
const DEFAULT_TICKS: u64 = 120 * 60;

/// Counters printed at the end of the session
#[derive(Debug, Default)]
struct SessionStats {
    launches: u32,
    bumper_hits: u32,
    paddle_hits: u32,
    clamps: u32,
    spikes: u32,
    balls_out: u32,
    probes: u32,
    top_speed: f32,
}

struct Session {
    config: TableConfig,
    table: Table,
    ball: Option<SimBall>,
    next_ball_id: u32,
    spawned_at: u64,
    last_input: InputFrame,
    /// Colliders the ball overlapped last tick (contacts fire on entry)
    touching: HashSet<BodyId>,
    rng: Pcg32,
    stats: SessionStats,
}

impl Session {
    fn new(config: TableConfig, seed: u64) -> Result<Self, ConfigError> {
        let table = Table::new(&config)?;
        let mut session = Self {
            config,
            table,
            ball: None,
            next_ball_id: 1000,
            spawned_at: 0,
            last_input: InputFrame::default(),
            touching: HashSet::new(),
            rng: Pcg32::seed_from_u64(seed),
            stats: SessionStats::default(),
        };
        session.spawn_ball();
        Ok(session)
    }

    /// Replace any live ball with a fresh one at the spawn point
    fn spawn_ball(&mut self) {
        if let Some(old) = self.ball.take() {
            log::info!("Removing old ball {}", old.id());
        }
        let id = BodyId(self.next_ball_id);
        self.next_ball_id += 1;
        let jitter = Vec2::new(self.rng.random_range(-20.0..20.0), 0.0);
        self.ball = Some(SimBall::new(id, SPAWN_POINT + jitter));
        self.touching.clear();
        self.spawned_at = self.table.tick();
        log::info!("New ball {id} spawned");
    }

    /// Overlap test standing in for the engine's contact discovery
    fn detect_contacts(&mut self) {
        let Some(ball) = self.ball.as_mut() else {
            return;
        };
        let mut now_touching = HashSet::new();

        for bumper in self.table.bumpers() {
            let offset = ball.pos - bumper.position;
            if offset.length() < BALL_RADIUS + BUMPER_RADIUS {
                now_touching.insert(bumper.id);
                if !self.touching.contains(&bumper.id) {
                    let normal = pinball_sim::direction_or(offset, pinball_sim::FALLBACK_DIRECTION);
                    let relative_velocity = -ball.vel;
                    // Engine bounce first, the table adds its kick on top
                    ball.vel = Bumper::MATERIAL.reflect(ball.vel, normal);
                    ball.push_contact(ContactEvent {
                        normal,
                        relative_velocity,
                        ..ContactEvent::touching(bumper.id)
                    });
                }
            }
        }

        for paddle in self.table.paddles() {
            let tip = paddle.position + paddle.direction() * self.config.paddle_half_length;
            let closest = closest_on_segment(ball.pos, paddle.position, tip);
            let offset = ball.pos - closest;
            if offset.length() < BALL_RADIUS + PADDLE_THICKNESS / 2.0 {
                now_touching.insert(paddle.id);
                if !self.touching.contains(&paddle.id) {
                    ball.push_contact(ContactEvent {
                        normal: pinball_sim::direction_or(offset, pinball_sim::FALLBACK_DIRECTION),
                        collider_local_position: closest - paddle.position,
                        relative_velocity: -ball.vel,
                        ..ContactEvent::touching(paddle.id)
                    });
                }
            }
        }

        self.touching = now_touching;
    }

    /// Autopilot: launch after a short wait, flip when the ball is over a flipper
    fn input(&mut self) -> InputFrame {
        let tick = self.table.tick();
        let launch_level = tick >= self.spawned_at + LAUNCH_DELAY_TICKS
            && self.ball.as_ref().is_some_and(|b| b.sleeping);

        let (left, right) = match self.ball.as_ref() {
            Some(ball) if ball.pos.y > 560.0 && ball.vel.y > 0.0 => {
                (ball.pos.x < TABLE_WIDTH / 2.0, ball.pos.x >= TABLE_WIDTH / 2.0)
            }
            _ => (false, false),
        };

        let frame = self.last_input.next(left, right, launch_level);
        self.last_input = frame.clone();
        frame
    }

    fn tick(&mut self) {
        self.detect_contacts();
        let input = self.input();
        let report = self.table.step(self.ball.as_mut(), &input);
        self.stats.probes += report.probes.len() as u32;

        let mut respawn = false;
        for event in self.table.events().drain() {
            match event {
                GameEvent::Launched { .. } => self.stats.launches += 1,
                GameEvent::BumperHit { .. } => self.stats.bumper_hits += 1,
                GameEvent::PaddleHit { .. } => self.stats.paddle_hits += 1,
                GameEvent::VelocityClamped { .. } => self.stats.clamps += 1,
                GameEvent::VelocitySpike { .. } => self.stats.spikes += 1,
                GameEvent::BallOut { ball, .. } => {
                    log::info!("Ball {ball} out, respawning");
                    self.stats.balls_out += 1;
                    respawn = true;
                }
            }
        }

        if respawn {
            self.spawn_ball();
        } else if let Some(ball) = self.ball.as_mut() {
            ball.integrate(GRAVITY, SIM_DT);
            keep_inside_walls(ball);
            self.stats.top_speed = self.stats.top_speed.max(ball.vel.length());
        }
    }
}

fn closest_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-6 {
        return a;
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Side and top walls; the bottom is the drain
fn keep_inside_walls(ball: &mut SimBall) {
    if ball.pos.x < BALL_RADIUS {
        ball.pos.x = BALL_RADIUS;
        ball.vel.x = ball.vel.x.abs();
    } else if ball.pos.x > TABLE_WIDTH - BALL_RADIUS {
        ball.pos.x = TABLE_WIDTH - BALL_RADIUS;
        ball.vel.x = -ball.vel.x.abs();
    }
    if ball.pos.y < BALL_RADIUS {
        ball.pos.y = BALL_RADIUS;
        ball.vel.y = ball.vel.y.abs();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pinball Sim (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match TableConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(2);
            }
        },
        None => TableConfig::default(),
    };
    let ticks = args
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TICKS);

    let mut session = match Session::new(config, 0x5EED) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    for _ in 0..ticks {
        session.tick();
    }

    let s = &session.stats;
    println!("Ran {ticks} ticks");
    println!(
        "  launches {}, bumper hits {}, paddle hits {}, balls out {}",
        s.launches, s.bumper_hits, s.paddle_hits, s.balls_out
    );
    println!(
        "  velocity clamps {}, spikes {}, probes {}, top speed {:.1} (cap {})",
        s.clamps, s.spikes, s.probes, s.top_speed, session.config.max_ball_speed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless session is native only
}
