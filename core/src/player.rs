//! Continuous player pose and grid-snapped movement.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::DVec2;

use crate::{Map, Point};

/// Player position in map-cell units plus a heading in radians.
///
/// Cell centres sit at `k + 0.5`. A heading of zero faces east and `π/2`
/// faces south because rows grow downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    position: DVec2,
    angle: f64,
}

impl Player {
    /// Creates a player at a continuous position.
    #[must_use]
    pub fn new(x: f64, y: f64, angle: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            angle: normalize_angle(angle),
        }
    }

    /// Creates a player centred on the provided cell.
    #[must_use]
    pub fn at_cell(cell: Point, angle: f64) -> Self {
        Self {
            position: cell_centre(cell),
            angle: normalize_angle(angle),
        }
    }

    /// Continuous position of the player.
    #[must_use]
    pub const fn position(&self) -> DVec2 {
        self.position
    }

    /// Heading in radians within `[0, 2π)`.
    #[must_use]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Unit view direction `(cos, sin)`.
    #[must_use]
    pub fn direction(&self) -> DVec2 {
        DVec2::new(self.angle.cos(), self.angle.sin())
    }

    /// Grid cell containing the player.
    #[must_use]
    pub fn cell(&self) -> Point {
        Point::new(self.position.x.floor() as i32, self.position.y.floor() as i32)
    }

    /// Re-centres the player on the provided cell, keeping the heading.
    pub fn set_cell(&mut self, cell: Point) {
        self.position = cell_centre(cell);
    }

    /// Turns a quarter revolution counter-clockwise on screen.
    pub fn rotate_left(&mut self) {
        self.angle = normalize_angle(self.angle - FRAC_PI_2);
    }

    /// Turns a quarter revolution clockwise on screen.
    pub fn rotate_right(&mut self) {
        self.angle = normalize_angle(self.angle + FRAC_PI_2);
    }

    /// Steps one cell along the heading unless a wall blocks the way.
    ///
    /// Returns `true` when the player moved.
    pub fn move_forward(&mut self, map: &Map) -> bool {
        self.step(map, 1)
    }

    /// Steps one cell against the heading unless a wall blocks the way.
    ///
    /// Returns `true` when the player moved.
    pub fn move_backward(&mut self, map: &Map) -> bool {
        self.step(map, -1)
    }

    fn step(&mut self, map: &Map, sign: i32) -> bool {
        let quarter = (self.angle / FRAC_PI_2).round() as i64;
        self.angle = normalize_angle(quarter as f64 * FRAC_PI_2);

        let (dx, dy) = match quarter.rem_euclid(4) {
            0 => (1, 0),
            1 => (0, 1),
            2 => (-1, 0),
            _ => (0, -1),
        };

        let current = self.cell();
        let target = current.offset(dx * sign, dy * sign);
        if map.cell_at(target).is_passable() {
            self.set_cell(target);
            true
        } else {
            self.set_cell(current);
            false
        }
    }
}

fn cell_centre(cell: Point) -> DVec2 {
    DVec2::new(f64::from(cell.x()) + 0.5, f64::from(cell.y()) + 0.5)
}

fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
