use core::fmt::{Display, Formatter, Result as FmtResult};

/// A numeric literal in a series expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

/// Largest magnitude for which integral floats keep a `.0` suffix instead of switching
/// to the plain digit form.
const INTEGRAL_FLOAT_LIMIT: f64 = 1e16;

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match *self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < INTEGRAL_FLOAT_LIMIT => {
                write!(f, "{value:.1}")
            }
            Self::Float(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Number {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<f64> for Number {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}
