//! End-to-end table session: launch, flipper hit, drain, respawn

use glam::Vec2;

use pinball_sim::consts::*;
use pinball_sim::sim::{BodyId, ContactEvent, GameEvent, Movable, PaddleSide, SimBall, Table};
use pinball_sim::{BumperConfig, InputFrame, PaddleConfig, TableConfig};

fn config() -> TableConfig {
    TableConfig {
        paddles: vec![
            PaddleConfig {
                id: 1,
                side: PaddleSide::Left,
                action: "paddle_left".into(),
                position: Vec2::new(140.0, 700.0),
                rest_angle: 0.5,
            },
            PaddleConfig {
                id: 2,
                side: PaddleSide::Right,
                action: "paddle_right".into(),
                position: Vec2::new(340.0, 700.0),
                rest_angle: std::f32::consts::PI - 0.5,
            },
        ],
        bumpers: vec![BumperConfig {
            id: 10,
            position: Vec2::new(240.0, 200.0),
            force: None,
        }],
        ..Default::default()
    }
}

#[test]
fn test_launch_from_rest() {
    let mut table = Table::new(&config()).unwrap();
    let mut ball = SimBall::new(BodyId(100), Vec2::new(240.0, 640.0));

    let input = InputFrame::from_levels(false, true, false, false);
    let report = table.step(Some(&mut ball), &input);

    assert!(!ball.is_sleeping());
    assert_eq!(ball.velocity(), LAUNCH_IMPULSE);
    assert!(matches!(report.events[0], GameEvent::Launched { .. }));

    // Holding the button does not launch again
    let held = InputFrame::from_levels(true, true, false, false);
    let report = table.step(Some(&mut ball), &held);
    assert!(report.events.is_empty());
    assert_eq!(ball.velocity(), LAUNCH_IMPULSE);
}

#[test]
fn test_ball_out_once_then_respawn() {
    let mut table = Table::new(&config()).unwrap();
    let mut ball = SimBall::new(BodyId(100), Vec2::new(240.0, 780.0));
    ball.sleeping = false;
    ball.vel = Vec2::new(0.0, 600.0);

    let mut outs = 0;
    for _ in 0..60 {
        table.step(Some(&mut ball), &InputFrame::default());
        ball.integrate(Vec2::ZERO, SIM_DT);
        outs += table.events().drain().filter(GameEvent::is_ball_out).count();
    }
    assert_eq!(outs, 1);
    assert!(table.is_retired(BodyId(100)));

    // Orchestrator drops the old ball; the table steps with no ball for a tick
    drop(ball);
    let report = table.step::<SimBall, _>(None, &InputFrame::default());
    assert!(report.events.is_empty());

    let mut fresh = SimBall::new(BodyId(101), Vec2::new(240.0, 640.0));
    let input = InputFrame::from_levels(false, true, false, false);
    let report = table.step(Some(&mut fresh), &input);
    assert!(matches!(
        report.events[0],
        GameEvent::Launched {
            ball: BodyId(101),
            ..
        }
    ));
}

#[test]
fn test_flipper_swing_sends_ball_up() {
    let mut table = Table::new(&config()).unwrap();
    let mut ball = SimBall::new(BodyId(100), Vec2::ZERO);
    ball.sleeping = false;

    let left = InputFrame {
        paddle_left: true,
        ..Default::default()
    };
    // Swing for two ticks so the flipper has angular velocity
    table.step::<SimBall, _>(None, &left);
    table.step::<SimBall, _>(None, &left);

    let paddle = table.paddle(BodyId(1)).unwrap().clone();
    assert!(paddle.angular_velocity() < 0.0);
    ball.pos = paddle.position + paddle.direction() * 50.0 + Vec2::new(0.0, -10.0);
    ball.vel = Vec2::new(0.0, 200.0);
    ball.push_contact(ContactEvent::touching(paddle.id));

    let report = table.step(Some(&mut ball), &left);

    assert!(report
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::PaddleHit { .. })));
    assert!(ball.vel.y < 0.0, "ball should head up the table: {}", ball.vel);
    assert!(ball.vel.length() <= MAX_BALL_SPEED + 1e-2);
}

#[test]
fn test_multiple_contacts_apply_in_order() {
    let mut table = Table::new(&config()).unwrap();
    let mut ball = SimBall::new(BodyId(100), Vec2::new(240.0, 170.0));
    ball.sleeping = false;
    for _ in 0..6 {
        ball.push_contact(ContactEvent::touching(BodyId(10)));
    }

    let report = table.step(Some(&mut ball), &InputFrame::default());

    let hits = report
        .events
        .iter()
        .filter(|e| matches!(e, GameEvent::BumperHit { .. }))
        .count();
    assert_eq!(hits, MAX_CONTACTS_REPORTED);
    assert!((ball.vel.y + BUMPER_FORCE * MAX_CONTACTS_REPORTED as f32).abs() < 1e-2);
}

#[test]
fn test_unknown_action_in_json_is_rejected() {
    let json = r#"{
        "paddles": [
            { "id": 1, "side": "left", "action": "paddle_up", "position": [100.0, 700.0] }
        ]
    }"#;
    let err = TableConfig::from_json(json).unwrap_err();
    assert!(err.to_string().contains("paddle_up"));
}
