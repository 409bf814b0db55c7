//! Plinko board
//!
//! The browser renders and simulates the board; this module owns its
//! layout and tuning. `BoardConfig::standard()` is served as JSON and the
//! client builds its scene from it, including the per-frame limits in
//! [`FrameRules`].

use serde::Serialize;

/// `[x, y, z]` in board units
pub type Vec3 = [f64; 3];

const PEG_ROWS: usize = 8;
const PEGS_PER_ROW: usize = 9;
const PEG_SPACING: f64 = 0.5;
const SCORE_ZONES: usize = 9;

/// Speed limit applied to every disc each frame
const MAX_DISC_SPEED: f64 = 5.0;

/// Discs below this height have left the board
const FALL_LIMIT_Y: f64 = -5.0;

/// Where fallen discs are parked
const PARKING_POSITION: Vec3 = [1000.0, 1000.0, 1000.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Peg {
    pub position: Vec3,
    pub radius: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Wall {
    pub position: Vec3,
    pub size: Vec3,
}

/// Horizontal scoring plane at the bottom of a column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreZone {
    pub position: Vec3,
    pub label_position: Vec3,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscSpec {
    pub radius: f64,
    pub mass: f64,
    pub linear_damping: f64,
    pub restitution: f64,
    /// Half-open `[min, max)` range for the spawn x coordinate
    pub spawn_x: [f64; 2],
    pub spawn_y: f64,
    pub spawn_z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicsSettings {
    pub gravity: Vec3,
    pub friction: f64,
    pub restitution: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollisionFilter {
    pub group: u32,
    pub mask: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollisionFilters {
    /// Pegs, walls and score zones
    pub static_bodies: CollisionFilter,
    pub discs: CollisionFilter,
}

/// Limits the client enforces on every disc each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRules {
    /// Faster discs are scaled back to this speed
    pub max_speed: f64,
    /// Discs below this height are moved to `parking_position`
    pub fall_limit_y: f64,
    pub parking_position: Vec3,
}

/// Everything the client needs to build the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardConfig {
    pub pegs: Vec<Peg>,
    pub walls: Vec<Wall>,
    pub score_zones: Vec<ScoreZone>,
    pub disc: DiscSpec,
    pub physics: PhysicsSettings,
    pub filters: CollisionFilters,
    pub rules: FrameRules,
}

impl BoardConfig {
    /// The standard 8-row board
    pub fn standard() -> Self {
        Self {
            pegs: peg_layout(),
            walls: vec![
                Wall {
                    position: [-2.25, 0.0, 0.0],
                    size: [0.1, 5.25, 0.2],
                },
                Wall {
                    position: [2.25, 0.0, 0.0],
                    size: [0.1, 5.25, 0.2],
                },
            ],
            score_zones: (0..SCORE_ZONES)
                .map(|i| {
                    let x = (i as f64 - 4.0) * PEG_SPACING;
                    ScoreZone {
                        position: [x, -2.45, 0.0],
                        label_position: [x, -2.5, 0.0],
                        points: i as u32 + 1,
                    }
                })
                .collect(),
            disc: DiscSpec {
                radius: 0.1,
                mass: 1.0,
                linear_damping: 0.5,
                restitution: 0.7,
                spawn_x: [-1.0, 1.0],
                spawn_y: 5.0,
                spawn_z: 1.0,
            },
            physics: PhysicsSettings {
                gravity: [0.0, -9.81, 0.0],
                friction: 0.1,
                restitution: 0.7,
            },
            filters: CollisionFilters {
                static_bodies: CollisionFilter { group: 1, mask: 2 },
                discs: CollisionFilter {
                    group: 2,
                    mask: 1 | 2,
                },
            },
            rules: FrameRules {
                max_speed: MAX_DISC_SPEED,
                fall_limit_y: FALL_LIMIT_Y,
                parking_position: PARKING_POSITION,
            },
        }
    }
}

/// Staggered rows: even rows hold nine pegs, odd rows eight shifted by
/// half a spacing.
fn peg_layout() -> Vec<Peg> {
    let mut pegs = Vec::new();
    for row in 0..PEG_ROWS {
        let odd = row % 2 == 1;
        let count = if odd { PEGS_PER_ROW - 1 } else { PEGS_PER_ROW };
        let offset = if odd { 0.5 } else { 0.0 };
        let y = (row as f64 - PEG_ROWS as f64 / 2.0) * PEG_SPACING;

        for col in 0..count {
            let x = (col as f64 - (PEGS_PER_ROW as f64 - 1.0) / 2.0 + offset) * PEG_SPACING;
            pegs.push(Peg {
                position: [x, y, 0.0],
                radius: 0.05,
                height: 0.5,
            });
        }
    }
    pegs
}
