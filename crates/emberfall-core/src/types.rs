//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::constants::TICK_RATE;

/// 2D position in map space (pixels). x grows east, y grows south.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Per-tick displacement (pixels per tick).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Collision box size, centered on the entity's position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f64,
    pub height: f64,
}

/// Axis-aligned rectangle in map space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in milliseconds.
    pub elapsed_ms: u64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Unit vector pointing from `self` toward `other`, zero if they coincide.
    pub fn direction_to(&self, other: &Position) -> DVec2 {
        (other.as_dvec2() - self.as_dvec2()).normalize_or_zero()
    }

    /// Clamp into `[min, max]` on both axes.
    pub fn clamped(&self, min: Position, max: Position) -> Position {
        Position::new(self.x.clamp(min.x, max.x), self.y.clamp(min.y, max.y))
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_dvec2(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }

    /// Speed magnitude (pixels per tick).
    pub fn speed(&self) -> f64 {
        DVec2::new(self.x, self.y).length()
    }
}

impl Hitbox {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn square(size: f64) -> Self {
        Self::new(size, size)
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

impl Rect {
    /// Rectangle of the given hitbox centered on `center`.
    pub fn around(center: Position, hitbox: Hitbox) -> Self {
        Self {
            left: center.x - hitbox.width / 2.0,
            top: center.y - hitbox.height / 2.0,
            width: hitbox.width,
            height: hitbox.height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Strict overlap test; rectangles that only share an edge do not collide.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Grow the rectangle by `margin` on every side.
    pub fn inflated(&self, margin: f64) -> Self {
        Self {
            left: self.left - margin,
            top: self.top - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }
}

impl SimTime {
    /// Milliseconds per tick at the default tick rate.
    pub fn dt_ms(&self) -> f64 {
        1000.0 / TICK_RATE as f64
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_ms = self.tick * 1000 / TICK_RATE as u64;
    }

    /// Milliseconds elapsed since `earlier_ms`, saturating at zero.
    pub fn since(&self, earlier_ms: u64) -> u64 {
        self.elapsed_ms.saturating_sub(earlier_ms)
    }
}

/// Whether a cooldown started at `last_ms` has run out by `now_ms`.
/// An action that never happened is always ready.
pub fn cooldown_elapsed(last_ms: Option<u64>, now_ms: u64, cooldown_ms: u64) -> bool {
    match last_ms {
        None => true,
        Some(last) => now_ms.saturating_sub(last) >= cooldown_ms,
    }
}
