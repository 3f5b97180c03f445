//! Fixed-point geometry.
//!
//! Every length stored in the layout tree is a [`Micro`]: a signed 64-bit
//! count of micro-units, with [`MICROS_PER_UNIT`] micro-units per external
//! unit (points). Floating point values only appear at the boundary, through
//! [`Micro::from_external`] and [`Micro::to_external`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};
use thiserror::Error;

/// Number of micro-units in one external unit.
pub const MICROS_PER_UNIT: i64 = 100_000;

/// External values are rounded to this many steps per unit (4 decimal digits)
/// before being rescaled to micro-units.
const EXTERNAL_STEPS_PER_UNIT: f64 = 10_000.0;
const MICROS_PER_STEP: i64 = MICROS_PER_UNIT / 10_000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    #[error("Attempted to mutate a locked {0}.")]
    Locked(&'static str),
}

/// A length or coordinate in micro-units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Micro(i64);

impl Micro {
    pub const ZERO: Micro = Micro(0);
    pub const MAX: Micro = Micro(i64::MAX);
    pub const MIN: Micro = Micro(i64::MIN);

    pub const fn from_raw(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i64 {
        self.0
    }

    /// Whole external units, e.g. `Micro::from_units(72)` is one inch in points.
    pub const fn from_units(units: i64) -> Self {
        Self(units.saturating_mul(MICROS_PER_UNIT))
    }

    /// Converts an external (point) value.
    ///
    /// The value is first rounded to 4 decimal digits and only then rescaled,
    /// so that repeated round-trips through `f64` are stable. Non-finite input
    /// maps to zero, out of range input saturates.
    pub fn from_external(value: f64) -> Self {
        if !value.is_finite() {
            return Self::ZERO;
        }
        // `as` saturates for out of range floats.
        let steps = (value * EXTERNAL_STEPS_PER_UNIT).round() as i64;
        Self(steps.saturating_mul(MICROS_PER_STEP))
    }

    pub fn to_external(self) -> f64 {
        self.0 as f64 / MICROS_PER_UNIT as f64
    }

    /// Multiplies two micro-unit values, yielding a micro-unit value.
    ///
    /// When the raw product does not fit in 64 bits, the operand with the
    /// smaller magnitude is scaled down first (split into whole units and a
    /// sub-unit remainder). The sub-unit part is truncated, so the result may
    /// be off by at most one micro-unit. Results outside the `i64` range
    /// saturate.
    pub fn multiply(self, other: Micro) -> Micro {
        if let Some(product) = self.0.checked_mul(other.0) {
            return Micro(product / MICROS_PER_UNIT);
        }

        let (small, large) = if self.0.unsigned_abs() <= other.0.unsigned_abs() {
            (self.0, other.0)
        } else {
            (other.0, self.0)
        };
        let whole = i128::from(small / MICROS_PER_UNIT);
        let fraction = i128::from(small % MICROS_PER_UNIT);
        let large = i128::from(large);

        let result = whole * large + fraction * large / i128::from(MICROS_PER_UNIT);
        Micro(saturate_i128(result))
    }

    pub fn abs(self) -> Micro {
        Micro(self.0.saturating_abs())
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

fn saturate_i128(value: i128) -> i64 {
    if value > i128::from(i64::MAX) {
        i64::MAX
    } else if value < i128::from(i64::MIN) {
        i64::MIN
    } else {
        value as i64
    }
}

impl fmt::Display for Micro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}pt", self.to_external())
    }
}

impl Add for Micro {
    type Output = Micro;
    fn add(self, rhs: Micro) -> Micro {
        Micro(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Micro {
    fn add_assign(&mut self, rhs: Micro) {
        *self = *self + rhs;
    }
}

impl Sub for Micro {
    type Output = Micro;
    fn sub(self, rhs: Micro) -> Micro {
        Micro(self.0.saturating_sub(rhs.0))
    }
}

impl SubAssign for Micro {
    fn sub_assign(&mut self, rhs: Micro) {
        *self = *self - rhs;
    }
}

impl Neg for Micro {
    type Output = Micro;
    fn neg(self) -> Micro {
        Micro(self.0.saturating_neg())
    }
}

/// Scalar multiplication (e.g. a width times a span count).
impl Mul<i64> for Micro {
    type Output = Micro;
    fn mul(self, rhs: i64) -> Micro {
        Micro(self.0.saturating_mul(rhs))
    }
}

impl Div<i64> for Micro {
    type Output = Micro;
    fn div(self, rhs: i64) -> Micro {
        Micro(self.0 / rhs)
    }
}

impl Sum for Micro {
    fn sum<I: Iterator<Item = Micro>>(iter: I) -> Micro {
        iter.fold(Micro::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Micro> for Micro {
    fn sum<I: Iterator<Item = &'a Micro>>(iter: I) -> Micro {
        iter.copied().sum()
    }
}

// --- Value types ---

/// An axis-aligned rectangle in micro-units.
///
/// A locked rectangle is frozen: every mutator fails with
/// [`GeometryError::Locked`] and leaves the fields untouched. Equality only
/// compares geometry, not the lock flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bounds {
    x: Micro,
    y: Micro,
    width: Micro,
    height: Micro,
    locked: bool,
}

impl PartialEq for Bounds {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
    }
}

impl Eq for Bounds {}

impl Bounds {
    pub const EMPTY: Bounds = Bounds {
        x: Micro::ZERO,
        y: Micro::ZERO,
        width: Micro::ZERO,
        height: Micro::ZERO,
        locked: false,
    };

    pub fn new(x: Micro, y: Micro, width: Micro, height: Micro) -> Self {
        Self { x, y, width, height, locked: false }
    }

    pub fn from_external(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(
            Micro::from_external(x),
            Micro::from_external(y),
            Micro::from_external(width),
            Micro::from_external(height),
        )
    }

    pub fn x(&self) -> Micro {
        self.x
    }

    pub fn y(&self) -> Micro {
        self.y
    }

    pub fn width(&self) -> Micro {
        self.width
    }

    pub fn height(&self) -> Micro {
        self.height
    }

    pub fn right(&self) -> Micro {
        self.x + self.width
    }

    pub fn bottom(&self) -> Micro {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Dimension {
        Dimension::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= Micro::ZERO || self.height <= Micro::ZERO
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Freezes this instance in place.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Returns an equal, locked value. A locked value is returned unchanged.
    pub fn locked_copy(&self) -> Bounds {
        if self.locked {
            return *self;
        }
        Bounds { locked: true, ..*self }
    }

    /// Returns an equal, mutable value.
    pub fn unlocked_copy(&self) -> Bounds {
        Bounds { locked: false, ..*self }
    }

    fn check_mutable(&self) -> Result<(), GeometryError> {
        if self.locked {
            Err(GeometryError::Locked("Bounds"))
        } else {
            Ok(())
        }
    }

    pub fn set_x(&mut self, x: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.x = x;
        Ok(())
    }

    pub fn set_y(&mut self, y: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.y = y;
        Ok(())
    }

    pub fn set_width(&mut self, width: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.width = width;
        Ok(())
    }

    pub fn set_height(&mut self, height: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.height = height;
        Ok(())
    }

    pub fn set_rect(
        &mut self,
        x: Micro,
        y: Micro,
        width: Micro,
        height: Micro,
    ) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn translate(&mut self, dx: Micro, dy: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.x += dx;
        self.y += dy;
        Ok(())
    }

    /// The smallest rectangle covering both. The result is unlocked.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Bounds::new(x, y, right - x, bottom - y)
    }

    /// The shared area, or `None` when the rectangles do not overlap.
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return None;
        }
        Some(Bounds::new(x, y, right - x, bottom - y))
    }

    /// True when the rectangles share a non-empty area. Touching edges do not count.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    pub fn contains(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

/// A position in micro-units.
#[derive(Debug, Clone, Copy, Default)]
pub struct Point {
    x: Micro,
    y: Micro,
    locked: bool,
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Point {}

impl Point {
    pub fn new(x: Micro, y: Micro) -> Self {
        Self { x, y, locked: false }
    }

    pub fn from_external(x: f64, y: f64) -> Self {
        Self::new(Micro::from_external(x), Micro::from_external(y))
    }

    pub fn x(&self) -> Micro {
        self.x
    }

    pub fn y(&self) -> Micro {
        self.y
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn locked_copy(&self) -> Point {
        if self.locked {
            return *self;
        }
        Point { locked: true, ..*self }
    }

    pub fn unlocked_copy(&self) -> Point {
        Point { locked: false, ..*self }
    }

    fn check_mutable(&self) -> Result<(), GeometryError> {
        if self.locked {
            Err(GeometryError::Locked("Point"))
        } else {
            Ok(())
        }
    }

    pub fn set_x(&mut self, x: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.x = x;
        Ok(())
    }

    pub fn set_y(&mut self, y: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.y = y;
        Ok(())
    }

    pub fn translate(&mut self, dx: Micro, dy: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.x += dx;
        self.y += dy;
        Ok(())
    }
}

/// A width/height pair in micro-units.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dimension {
    width: Micro,
    height: Micro,
    locked: bool,
}

impl PartialEq for Dimension {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height
    }
}

impl Eq for Dimension {}

impl Dimension {
    pub fn new(width: Micro, height: Micro) -> Self {
        Self { width, height, locked: false }
    }

    pub fn zero() -> Self {
        Self::new(Micro::ZERO, Micro::ZERO)
    }

    pub fn from_external(width: f64, height: f64) -> Self {
        Self::new(Micro::from_external(width), Micro::from_external(height))
    }

    pub fn width(&self) -> Micro {
        self.width
    }

    pub fn height(&self) -> Micro {
        self.height
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn locked_copy(&self) -> Dimension {
        if self.locked {
            return *self;
        }
        Dimension { locked: true, ..*self }
    }

    pub fn unlocked_copy(&self) -> Dimension {
        Dimension { locked: false, ..*self }
    }

    fn check_mutable(&self) -> Result<(), GeometryError> {
        if self.locked {
            Err(GeometryError::Locked("Dimension"))
        } else {
            Ok(())
        }
    }

    pub fn set_width(&mut self, width: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.width = width;
        Ok(())
    }

    pub fn set_height(&mut self, height: Micro) -> Result<(), GeometryError> {
        self.check_mutable()?;
        self.height = height;
        Ok(())
    }
}
