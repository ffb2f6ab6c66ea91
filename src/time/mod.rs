//! Tagged time scalar: either a floating-point instant or an integer tick.

use std::fmt;

/// A time value tagged as either floating point or integer.
///
/// All arithmetic and ordering between two [`Time`] values requires matching
/// tags. A mismatch is a programmer error, not a recoverable failure: the
/// host application is expected to construct a cache with one time tag and
/// never pass the other tag to its operations, so a mismatch here means a
/// bug in the caller, and panicking surfaces it immediately instead of
/// letting it silently corrupt a comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Time {
    Float(f32),
    Int(u32),
}

impl Time {
    pub fn is_float(self) -> bool {
        matches!(self, Time::Float(_))
    }

    fn assert_same_tag(self, other: Time) {
        match (self, other) {
            (Time::Float(_), Time::Float(_)) | (Time::Int(_), Time::Int(_)) => {}
            _ => panic!("Time: mismatched tags ({self:?} vs {other:?})"),
        }
    }

    pub fn add(self, rhs: Time) -> Time {
        self.assert_same_tag(rhs);
        match (self, rhs) {
            (Time::Float(a), Time::Float(b)) => Time::Float(a + b),
            (Time::Int(a), Time::Int(b)) => Time::Int(a.wrapping_add(b)),
            _ => unreachable!(),
        }
    }

    pub fn sub(self, rhs: Time) -> Time {
        self.assert_same_tag(rhs);
        match (self, rhs) {
            (Time::Float(a), Time::Float(b)) => Time::Float(a - b),
            (Time::Int(a), Time::Int(b)) => Time::Int(a.wrapping_sub(b)),
            _ => unreachable!(),
        }
    }

    pub fn mul(self, rhs: Time) -> Time {
        self.assert_same_tag(rhs);
        match (self, rhs) {
            (Time::Float(a), Time::Float(b)) => Time::Float(a * b),
            (Time::Int(a), Time::Int(b)) => Time::Int(a.wrapping_mul(b)),
            _ => unreachable!(),
        }
    }

    /// Division; a zero divisor is a programmer error and panics.
    pub fn div(self, rhs: Time) -> Time {
        self.assert_same_tag(rhs);
        match (self, rhs) {
            (Time::Float(a), Time::Float(b)) => {
                assert!(b != 0.0, "Time: division by zero");
                Time::Float(a / b)
            }
            (Time::Int(a), Time::Int(b)) => {
                assert!(b != 0, "Time: division by zero");
                Time::Int(a / b)
            }
            _ => unreachable!(),
        }
    }

    /// Truncated remainder, for both tags (matches `fmod`/`%` semantics).
    pub fn rem(self, rhs: Time) -> Time {
        self.assert_same_tag(rhs);
        match (self, rhs) {
            (Time::Float(a), Time::Float(b)) => {
                assert!(b != 0.0, "Time: modulo by zero");
                Time::Float(a % b)
            }
            (Time::Int(a), Time::Int(b)) => {
                assert!(b != 0, "Time: modulo by zero");
                Time::Int(a % b)
            }
            _ => unreachable!(),
        }
    }

    pub fn lt(self, rhs: Time) -> bool {
        self.assert_same_tag(rhs);
        self.as_f64() < rhs.as_f64()
    }

    pub fn le(self, rhs: Time) -> bool {
        self.assert_same_tag(rhs);
        self.as_f64() <= rhs.as_f64()
    }

    pub fn ge(self, rhs: Time) -> bool {
        self.assert_same_tag(rhs);
        self.as_f64() >= rhs.as_f64()
    }

    pub fn gt(self, rhs: Time) -> bool {
        self.assert_same_tag(rhs);
        self.as_f64() > rhs.as_f64()
    }

    pub fn eq_time(self, rhs: Time) -> bool {
        self.assert_same_tag(rhs);
        self.as_f64() == rhs.as_f64()
    }

    /// Floor division toward negative infinity, truncated to `u32`.
    ///
    /// Used to derive a sample's root index; callers are expected to have
    /// already checked `self >= t_initial`, so the result is never negative
    /// in practice.
    pub fn floor_div_as_u32(self, rhs: Time) -> u32 {
        self.assert_same_tag(rhs);
        match (self, rhs) {
            (Time::Float(a), Time::Float(b)) => {
                assert!(b != 0.0, "Time: division by zero");
                (a / b).floor() as u32
            }
            (Time::Int(a), Time::Int(b)) => {
                assert!(b != 0, "Time: division by zero");
                a / b
            }
            _ => unreachable!(),
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            Time::Float(f) => f as u32,
            Time::Int(i) => i,
        }
    }

    pub fn as_f32(self) -> f32 {
        match self {
            Time::Float(f) => f,
            Time::Int(i) => i as f32,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Time::Float(f) => f as f64,
            Time::Int(i) => i as f64,
        }
    }

    /// Compares against a float literal without requiring a second tagged value.
    pub fn approx_eq(self, rhs: f32) -> bool {
        self.as_f32() == rhs
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Time::Float(v) => write!(f, "{v}"),
            Time::Int(v) => write!(f, "{v}"),
        }
    }
}
