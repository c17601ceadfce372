use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A turn angle in degrees constrained to [0.0, 180.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct TurnAngle(f32);

impl TurnAngle {
    const MIN: f32 = 0.0;
    const MAX: f32 = 180.0;

    /// NaN maps to the lower bound
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for TurnAngle {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<TurnAngle> for f32 {
    fn from(value: TurnAngle) -> Self {
        value.0
    }
}

impl Default for TurnAngle {
    fn default() -> Self {
        Self::new(20.0)
    }
}

/// A terrain slope limit in degrees constrained to [0.0, 90.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct SlopeLimit(f32);

impl SlopeLimit {
    const MIN: f32 = 0.0;
    const MAX: f32 = 90.0;

    /// NaN maps to the lower bound
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for SlopeLimit {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<SlopeLimit> for f32 {
    fn from(value: SlopeLimit) -> Self {
        value.0
    }
}

impl Default for SlopeLimit {
    fn default() -> Self {
        Self::new(30.0)
    }
}

/// A probability constrained to [0.0, 1.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Probability(f32);

impl Probability {
    const MIN: f32 = 0.0;
    const MAX: f32 = 1.0;

    /// NaN maps to the lower bound
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self(Self::MIN);
        }
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for Probability {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Probability> for f32 {
    fn from(value: Probability) -> Self {
        value.0
    }
}

impl Default for Probability {
    fn default() -> Self {
        Self::new(0.15)
    }
}
