//! Collision resolver
//!
//! ## Robot–robot
//! Contact when centre distance ≤ sum of radii. The impulse magnitude is
//! `overlap * m1 * m2 / (m1 + m2)` along the contact axis, applied to each robot
//! divided by its own mass in opposite directions. It scales with overlap, not
//! with closing speed, and has no restitution or tangential term.
//!
//! ## Robot–ball
//! Contact when centre distance ≤ (robot size + ball radius) × tolerance and the
//! ball is below the robot's collision height:
//! - ball freshly kicked by another robot: redirected along the contact axis,
//!   trapped (low fraction) when the robot faces it, bounced otherwise
//! - anything else: pushed out by half the overlap, velocity untouched
//!
//! Detection always reads state captured before anything is changed. Robot
//! impulses and ball push-outs are summed; a kicked ball touching several robots
//! is redirected by the closest one (lowest id on a tie). Neither pass depends
//! on roster order.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::ball::Ball;
use super::geometry::{bearing, direction, distance, normalize_angle, Vec2};
use super::kinematics::Body;
use super::robot::{Robot, RobotId};
use crate::config::CollisionConfig;

#[derive(Debug, Clone, Copy)]
struct DiscSnapshot {
    position: Vec2,
    radius: f32,
    mass: f32,
}

impl DiscSnapshot {
    fn of(robot: &Robot) -> Self {
        Self { position: robot.position, radius: robot.size(), mass: robot.mass() }
    }
}

/// Impulse on the second disc (the first receives its negation), or `None` when
/// the discs do not touch or their centres coincide.
pub fn robot_robot_impulse(
    pos_a: Vec2,
    radius_a: f32,
    mass_a: f32,
    pos_b: Vec2,
    radius_b: f32,
    mass_b: f32,
) -> Option<Vec2> {
    let separation = distance(pos_a, pos_b);
    if separation == 0.0 || separation > radius_a + radius_b {
        return None;
    }

    let contact_angle = bearing(pos_a, pos_b);
    let overlap = radius_a + radius_b - separation;
    let magnitude = overlap * mass_a * mass_b / (mass_a + mass_b);
    Some(direction(contact_angle) * magnitude)
}

/// Resolve every touching robot pair once. Returns the number of contacts.
pub fn resolve_robot_collisions(robots: &mut [Robot]) -> usize {
    let snapshot: Vec<DiscSnapshot> = robots.iter().map(DiscSnapshot::of).collect();
    let mut impulses = vec![Vec2::zeros(); robots.len()];
    let mut contacts = 0;

    for i in 0..snapshot.len() {
        for j in (i + 1)..snapshot.len() {
            let (a, b) = (snapshot[i], snapshot[j]);
            if let Some(impulse) =
                robot_robot_impulse(a.position, a.radius, a.mass, b.position, b.radius, b.mass)
            {
                impulses[i] -= impulse;
                impulses[j] += impulse;
                contacts += 1;
                trace!(a = robots[i].id, b = robots[j].id, "robot contact");
            }
        }
    }

    for (robot, impulse) in robots.iter_mut().zip(impulses) {
        if impulse != Vec2::zeros() {
            robot.apply_impulse(impulse);
        }
    }
    contacts
}

/// Outcome of a robot touching the ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BallContact {
    /// Kicked ball slowed down by a robot facing it
    Trapped { by: RobotId },
    /// Kicked ball glanced off a robot
    Deflected { by: RobotId },
    /// Ball moved out of the robot's body
    PushedOut { by: RobotId },
}

/// What one robot does to the ball, computed without touching it.
#[derive(Debug, Clone, Copy)]
enum ContactResponse {
    Push { offset: Vec2 },
    Redirect { velocity: Vec2, separation: f32 },
}

fn ball_contact_response(
    robot: &Robot,
    ball: &Ball,
    cfg: &CollisionConfig,
) -> Option<(BallContact, ContactResponse)> {
    let separation = distance(robot.position, ball.position);
    let reach = (robot.size() + ball.radius()) * cfg.contact_tolerance;
    if separation == 0.0 || separation > reach || ball.z >= robot.height() {
        return None;
    }

    let contact_angle = bearing(robot.position, ball.position);
    let kicked_by_other = ball.kicked && ball.kicked_by != Some(robot.id);

    if kicked_by_other {
        let facing = normalize_angle(robot.angle - contact_angle).abs() < cfg.trap_angle;
        let fraction = if facing { cfg.trap_fraction } else { cfg.bounce_fraction };
        let velocity = direction(contact_angle) * (ball.velocity.norm() * fraction);
        let contact = if facing {
            BallContact::Trapped { by: robot.id }
        } else {
            BallContact::Deflected { by: robot.id }
        };
        Some((contact, ContactResponse::Redirect { velocity, separation }))
    } else {
        let overlap = (robot.size() + ball.radius() - separation).max(0.0);
        let offset = direction(contact_angle) * (0.5 * overlap);
        Some((BallContact::PushedOut { by: robot.id }, ContactResponse::Push { offset }))
    }
}

/// Apply one robot's contact response to the ball.
pub fn resolve_ball_contact(robot: &Robot, ball: &mut Ball, cfg: &CollisionConfig) -> Option<BallContact> {
    let (contact, response) = ball_contact_response(robot, ball, cfg)?;
    match response {
        ContactResponse::Push { offset } => ball.position += offset,
        ContactResponse::Redirect { velocity, .. } => {
            ball.velocity = velocity;
            debug!(robot = robot.id, ?contact, speed = velocity.norm(), "kicked ball hit robot");
        }
    }
    Some(contact)
}

/// Resolve every robot's contact with the ball against one snapshot of it.
///
/// Push-outs are summed. When several robots redirect a kicked ball the closest
/// one wins, ties going to the lowest id. Contacts come back sorted by robot id.
pub fn resolve_ball_contacts(robots: &[Robot], ball: &mut Ball, cfg: &CollisionConfig) -> Vec<BallContact> {
    let snapshot = ball.clone();
    let mut responses: Vec<(RobotId, BallContact, ContactResponse)> = robots
        .iter()
        .filter_map(|robot| {
            ball_contact_response(robot, &snapshot, cfg).map(|(contact, response)| (robot.id, contact, response))
        })
        .collect();
    responses.sort_by_key(|(id, _, _)| *id);

    let mut push = Vec2::zeros();
    let mut redirect: Option<(RobotId, BallContact, Vec2, f32)> = None;
    for &(id, contact, response) in &responses {
        match response {
            ContactResponse::Push { offset } => push += offset,
            ContactResponse::Redirect { velocity, separation } => {
                // Sorted by id, so a strict comparison keeps the lowest id on ties
                if redirect.map_or(true, |(_, _, _, best)| separation < best) {
                    redirect = Some((id, contact, velocity, separation));
                }
            }
        }
    }

    ball.position += push;
    if let Some((id, contact, velocity, _)) = redirect {
        ball.velocity = velocity;
        debug!(robot = id, ?contact, speed = velocity.norm(), "kicked ball hit robot");
    }

    responses.into_iter().map(|(_, contact, _)| contact).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BallParams, RobotParams};
    use crate::engine::robot::Team;

    fn robot(id: RobotId, x: f32, y: f32, angle: f32) -> Robot {
        Robot::new(id, Team::Yellow, Vec2::new(x, y), angle, RobotParams::default())
    }

    fn ball(x: f32, y: f32) -> Ball {
        Ball::new(Vec2::new(x, y), BallParams::default())
    }

    #[test]
    fn test_equal_mass_overlap_gives_equal_and_opposite_dv() {
        let depth = 40.0;
        let mut robots = vec![robot(0, 1000.0, 1000.0, 0.0), robot(1, 1000.0 + 360.0 - depth, 1000.0, 0.0)];
        let contacts = resolve_robot_collisions(&mut robots);
        assert_eq!(contacts, 1);

        let dv_a = robots[0].velocity;
        let dv_b = robots[1].velocity;
        // impulse = d * m*m/(2m) = d*m/2, divided by m => d/2
        assert!((dv_a.x + depth / 2.0).abs() < 1e-3, "dv_a={dv_a:?}");
        assert!((dv_b.x - depth / 2.0).abs() < 1e-3, "dv_b={dv_b:?}");
        assert!(dv_a.y.abs() < 1e-5 && dv_b.y.abs() < 1e-5);
        assert!((dv_a + dv_b).norm() < 1e-4);
    }

    #[test]
    fn test_heavier_robot_moves_less() {
        let mut light = robot(0, 0.0, 0.0, 0.0);
        let mut heavy = robot(1, 300.0, 0.0, 0.0);
        heavy.params.mass = 20.0;
        light.params.mass = 5.0;
        let mut robots = vec![light, heavy];
        resolve_robot_collisions(&mut robots);
        assert!(robots[0].velocity.x.abs() > robots[1].velocity.x.abs());
    }

    #[test]
    fn test_separated_and_coincident_robots_unaffected() {
        let mut robots = vec![robot(0, 0.0, 0.0, 0.0), robot(1, 1000.0, 0.0, 0.0)];
        assert_eq!(resolve_robot_collisions(&mut robots), 0);
        assert_eq!(robots[0].velocity, Vec2::zeros());

        assert!(robot_robot_impulse(Vec2::zeros(), 180.0, 5.0, Vec2::zeros(), 180.0, 5.0).is_none());
    }

    #[test]
    fn test_collision_independent_of_roster_order() {
        let a = robot(0, 0.0, 0.0, 0.0);
        let b = robot(1, 300.0, 50.0, 0.0);
        let c = robot(2, 150.0, 250.0, 0.0);

        let mut forward = vec![a.clone(), b.clone(), c.clone()];
        let mut reversed = vec![c, b, a];
        resolve_robot_collisions(&mut forward);
        resolve_robot_collisions(&mut reversed);

        for robot in &forward {
            let twin = reversed.iter().find(|r| r.id == robot.id).unwrap();
            assert!((robot.velocity - twin.velocity).norm() < 1e-3);
        }
    }

    #[test]
    fn test_resting_ball_pushed_out() {
        let r = robot(0, 1000.0, 1000.0, 0.0);
        let mut b = ball(1000.0 + 180.0, 1000.0);
        let contact = resolve_ball_contact(&r, &mut b, &CollisionConfig::default());
        assert_eq!(contact, Some(BallContact::PushedOut { by: 0 }));
        // overlap = 21.5, half of it
        assert!((b.position.x - (1180.0 + 10.75)).abs() < 1e-3);
        assert_eq!(b.velocity, Vec2::zeros());
    }

    #[test]
    fn test_within_tolerance_but_not_overlapping_does_not_pull() {
        let r = robot(0, 1000.0, 1000.0, 0.0);
        let mut b = ball(1000.0 + 210.0, 1000.0);
        let contact = resolve_ball_contact(&r, &mut b, &CollisionConfig::default());
        assert!(matches!(contact, Some(BallContact::PushedOut { .. })));
        assert_eq!(b.position.x, 1210.0);
    }

    #[test]
    fn test_kicked_ball_bounces_off_side_of_robot() {
        let r = robot(0, 1000.0, 1000.0, std::f32::consts::FRAC_PI_2);
        let mut b = ball(1200.0, 1000.0);
        b.kick(std::f32::consts::PI, 1000.0, 7, Vec2::zeros());
        let contact = resolve_ball_contact(&r, &mut b, &CollisionConfig::default());
        assert_eq!(contact, Some(BallContact::Deflected { by: 0 }));
        assert!((b.velocity.x - 900.0).abs() < 1e-2);
        assert!(b.velocity.y.abs() < 1e-2);
    }

    #[test]
    fn test_kicked_ball_trapped_by_facing_robot() {
        let r = robot(0, 1000.0, 1000.0, 0.0);
        let mut b = ball(1200.0, 1000.0);
        b.kick(std::f32::consts::PI, 1000.0, 7, Vec2::zeros());
        let contact = resolve_ball_contact(&r, &mut b, &CollisionConfig::default());
        assert_eq!(contact, Some(BallContact::Trapped { by: 0 }));
        assert!((b.velocity.norm() - 500.0).abs() < 1e-2);
    }

    #[test]
    fn test_own_kick_is_not_deflected() {
        let r = robot(7, 1000.0, 1000.0, 0.0);
        let mut b = ball(1190.0, 1000.0);
        b.kick(0.0, 1000.0, 7, Vec2::zeros());
        let contact = resolve_ball_contact(&r, &mut b, &CollisionConfig::default());
        assert!(matches!(contact, Some(BallContact::PushedOut { by: 7 })));
        assert_eq!(b.velocity, Vec2::new(1000.0, 0.0));
    }

    #[test]
    fn test_high_ball_passes_over_robot() {
        let r = robot(0, 1000.0, 1000.0, 0.0);
        let mut b = ball(1150.0, 1000.0);
        b.z = 200.0;
        assert!(resolve_ball_contact(&r, &mut b, &CollisionConfig::default()).is_none());
        assert_eq!(b.position.x, 1150.0);
    }

    #[test]
    fn test_ball_between_two_robots_independent_of_roster_order() {
        let a = robot(0, 1000.0, 1000.0, 0.0);
        let b = robot(1, 1380.0, 1000.0, std::f32::consts::PI);
        let kicked_ball = || {
            let mut ball = ball(1185.0, 1010.0);
            ball.kick(std::f32::consts::PI, 4000.0, 9, Vec2::zeros());
            ball
        };
        let cfg = CollisionConfig::default();

        let mut forward = kicked_ball();
        let mut reversed = kicked_ball();
        let contacts_forward = resolve_ball_contacts(&[a.clone(), b.clone()], &mut forward, &cfg);
        let contacts_reversed = resolve_ball_contacts(&[b, a], &mut reversed, &cfg);

        assert_eq!(contacts_forward, contacts_reversed);
        assert_eq!(contacts_forward.len(), 2);
        assert!((forward.velocity - reversed.velocity).norm() < 1e-3);
        assert!((forward.position - reversed.position).norm() < 1e-3);
        // Robot 0 is closer and faces the ball, so it traps it
        assert!(contacts_forward.contains(&BallContact::Trapped { by: 0 }));
        assert!(forward.velocity.x > 0.0);
    }

    #[test]
    fn test_ball_squeezed_between_robots_gets_both_push_outs() {
        let robots = vec![robot(0, 1000.0, 1000.0, 0.0), robot(1, 1380.0, 1000.0, 0.0)];
        let mut b = ball(1180.0, 1000.0);
        let contacts = resolve_ball_contacts(&robots, &mut b, &CollisionConfig::default());
        assert_eq!(contacts, vec![BallContact::PushedOut { by: 0 }, BallContact::PushedOut { by: 1 }]);
        // +10.75 from robot 0, -0.75 from robot 1
        assert!((b.position.x - 1190.0).abs() < 1e-3);
    }

    #[test]
    fn test_ball_contacts_for_all_robots() {
        let robots = vec![robot(0, 1000.0, 1000.0, 0.0), robot(1, 3000.0, 1000.0, 0.0)];
        let mut b = ball(1190.0, 1000.0);
        let contacts = resolve_ball_contacts(&robots, &mut b, &CollisionConfig::default());
        assert_eq!(contacts, vec![BallContact::PushedOut { by: 0 }]);
    }
}
