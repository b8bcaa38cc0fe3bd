//! Static field geometry
//!
//! Built once from [`FieldConfig`] and never mutated. Coordinates have their
//! origin in the wall corner, x runs goal to goal and y touch line to touch line.
//!
//! ## Goal ownership
//! - Left goal (small x) is defended by `Team::Yellow`
//! - Right goal (large x) is defended by `Team::Blue`

use serde::{Deserialize, Serialize};

use super::geometry::{segment_intersection, Line, Vec2};
use super::kinematics::WallBounds;
use super::robot::Team;
use crate::config::FieldConfig;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Boundary counts as inside.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Boundary counts as outside.
    pub fn strictly_contains(&self, p: Vec2) -> bool {
        p.x > self.min.x && p.x < self.max.x && p.y > self.min.y && p.y < self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }
}

/// Goal box behind a goal line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Team defending this goal
    pub owner: Team,
    pub area: Rect,
}

impl Goal {
    pub fn width(&self) -> f32 {
        self.area.max.y - self.area.min.y
    }

    pub fn depth(&self) -> f32 {
        self.area.max.x - self.area.min.x
    }

    /// Goal line between the posts.
    pub fn mouth(&self) -> Line {
        let x = match self.owner {
            Team::Yellow => self.area.max.x,
            Team::Blue => self.area.min.x,
        };
        Line::new(Vec2::new(x, self.area.min.y), Vec2::new(x, self.area.max.y))
    }

    /// Centre of the goal mouth on the goal line.
    pub fn mouth_center(&self, field_area: &Rect) -> Vec2 {
        let x = match self.owner {
            Team::Yellow => field_area.min.x,
            Team::Blue => field_area.max.x,
        };
        Vec2::new(x, self.area.center().y)
    }
}

/// Defence area in front of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyArea {
    pub owner: Team,
    pub area: Rect,
}

impl PenaltyArea {
    pub fn contains(&self, p: Vec2) -> bool {
        self.area.contains(p)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Outer walls every body bounces off
    pub walls: WallBounds,
    /// Inside of the touch and goal lines
    pub playing_area: Rect,
    pub center: Vec2,
    pub center_circle_radius: f32,
    pub goals: [Goal; 2],
    pub penalty_areas: [PenaltyArea; 2],
}

impl Field {
    pub fn from_config(cfg: &FieldConfig) -> Self {
        let b = cfg.boundary_width;
        let walls = WallBounds::new(Vec2::zeros(), Vec2::new(cfg.wall_width(), cfg.wall_height()));
        let playing_area = Rect::new(Vec2::new(b, b), Vec2::new(b + cfg.length, b + cfg.width));
        let center = playing_area.center();

        let goal_y = (center.y - cfg.goal_width / 2.0, center.y + cfg.goal_width / 2.0);
        let penalty_y = (center.y - cfg.penalty_width / 2.0, center.y + cfg.penalty_width / 2.0);
        let left_line = playing_area.min.x;
        let right_line = playing_area.max.x;

        let goals = [
            Goal {
                owner: Team::Yellow,
                area: Rect::new(
                    Vec2::new(left_line - cfg.goal_depth, goal_y.0),
                    Vec2::new(left_line, goal_y.1),
                ),
            },
            Goal {
                owner: Team::Blue,
                area: Rect::new(
                    Vec2::new(right_line, goal_y.0),
                    Vec2::new(right_line + cfg.goal_depth, goal_y.1),
                ),
            },
        ];
        let penalty_areas = [
            PenaltyArea {
                owner: Team::Yellow,
                area: Rect::new(
                    Vec2::new(left_line, penalty_y.0),
                    Vec2::new(left_line + cfg.penalty_depth, penalty_y.1),
                ),
            },
            PenaltyArea {
                owner: Team::Blue,
                area: Rect::new(
                    Vec2::new(right_line - cfg.penalty_depth, penalty_y.0),
                    Vec2::new(right_line, penalty_y.1),
                ),
            },
        ];

        Self {
            walls,
            playing_area,
            center,
            center_circle_radius: cfg.center_circle_radius,
            goals,
            penalty_areas,
        }
    }

    pub fn halfway_x(&self) -> f32 {
        self.center.x
    }

    pub fn goal_of(&self, team: Team) -> &Goal {
        &self.goals[team.index()]
    }

    pub fn penalty_area_of(&self, team: Team) -> &PenaltyArea {
        &self.penalty_areas[team.index()]
    }

    /// Goal whose box strictly contains `point`.
    pub fn goal_containing(&self, point: Vec2) -> Option<&Goal> {
        self.goals.iter().find(|goal| goal.area.strictly_contains(point))
    }

    /// Goal whose mouth the straight path `from → to` enters between the posts,
    /// with the crossing point. A path starting inside a goal box enters nothing.
    pub fn goal_entry(&self, from: Vec2, to: Vec2) -> Option<(&Goal, Vec2)> {
        self.goals.iter().find_map(|goal| {
            if goal.area.strictly_contains(from) {
                return None;
            }
            let mouth = goal.mouth();
            let crossing = segment_intersection(from, to, mouth.start, mouth.end)?;
            let between_posts = crossing.y > goal.area.min.y && crossing.y < goal.area.max.y;
            let inward = match goal.owner {
                Team::Yellow => to.x < from.x,
                Team::Blue => to.x > from.x,
            };
            (between_posts && inward).then_some((goal, crossing))
        })
    }

    pub fn in_center_circle(&self, point: Vec2) -> bool {
        (point - self.center).norm() <= self.center_circle_radius
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::from_config(&FieldConfig::default())
    }
}
