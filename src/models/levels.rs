use serde::{Deserialize, Serialize};

/// Whether a detected level acts as a price floor or a price ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelKind {
    Support,
    Resistance,
}

/// A detected local extremum, exposed to the presentation layer as
/// `{price, timestamp, kind}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremaLevel {
    pub price: f64,
    #[serde(rename = "timestamp")]
    pub datetime: String,
    pub kind: LevelKind,
}

impl ExtremaLevel {
    pub fn support(price: f64, datetime: impl Into<String>) -> Self {
        Self {
            price,
            datetime: datetime.into(),
            kind: LevelKind::Support,
        }
    }

    pub fn resistance(price: f64, datetime: impl Into<String>) -> Self {
        Self {
            price,
            datetime: datetime.into(),
            kind: LevelKind::Resistance,
        }
    }
}
