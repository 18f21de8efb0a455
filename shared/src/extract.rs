//! Flattening of the dated feed into `AsteroidRecord`s.
//!
//! An object that cannot be read is skipped with a warning instead of failing
//! the batch. That includes objects without any close-approach entry.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::feed::FeedResponse;
use crate::models::AsteroidRecord;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("malformed object: {0}")]
    Malformed(String),
    #[error("empty close_approach_data")]
    NoCloseApproach,
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} is not finite")]
    NonFinite { field: &'static str },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedObject {
    pub date: String,
    pub name: Option<String>,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub records: Vec<AsteroidRecord>,
    pub skipped: Vec<SkippedObject>,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn hazardous_count(&self) -> usize {
        self.records.iter().filter(|r| r.hazardous).count()
    }
}

#[derive(Debug, Deserialize)]
struct RawObject {
    name: String,
    estimated_diameter: RawEstimatedDiameter,
    is_potentially_hazardous_asteroid: bool,
    #[serde(default)]
    close_approach_data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawEstimatedDiameter {
    meters: RawDiameterRange,
}

#[derive(Debug, Deserialize)]
struct RawDiameterRange {
    estimated_diameter_min: f64,
    estimated_diameter_max: f64,
}

#[derive(Debug, Deserialize)]
struct RawCloseApproach {
    relative_velocity: RawVelocity,
    miss_distance: RawMissDistance,
}

#[derive(Debug, Deserialize)]
struct RawVelocity {
    kilometers_per_hour: Numeric,
}

#[derive(Debug, Deserialize)]
struct RawMissDistance {
    kilometers: Numeric,
}

/// Upstream sends these as strings; plain numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn parse(&self, field: &'static str) -> Result<f64, SkipReason> {
        let value = match self {
            Numeric::Number(n) => *n,
            Numeric::Text(s) => s.trim().parse::<f64>().map_err(|_| SkipReason::InvalidNumber {
                field,
                value: s.clone(),
            })?,
        };
        finite(value, field)
    }
}

fn finite(value: f64, field: &'static str) -> Result<f64, SkipReason> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SkipReason::NonFinite { field })
    }
}

fn positive(value: f64, field: &'static str) -> Result<f64, SkipReason> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SkipReason::NonPositive { field, value })
    }
}

/// Flatten every object of every date, in chronological date order.
pub fn extract_records(feed: &FeedResponse) -> Extraction {
    let mut extraction = Extraction::default();

    for (date, objects) in &feed.near_earth_objects {
        for object in objects {
            match extract_object(date, object) {
                Ok(record) => extraction.records.push(record),
                Err(reason) => {
                    let name = object.get("name").and_then(Value::as_str).map(str::to_string);
                    warn!(
                        "Skipping object {} on {}: {}",
                        name.as_deref().unwrap_or("<unnamed>"),
                        date,
                        reason
                    );
                    extraction.skipped.push(SkippedObject {
                        date: date.clone(),
                        name,
                        reason,
                    });
                }
            }
        }
    }

    debug!(
        "Extracted {} records, skipped {}",
        extraction.records.len(),
        extraction.skipped.len()
    );
    extraction
}

fn extract_object(date: &str, object: &Value) -> Result<AsteroidRecord, SkipReason> {
    let raw = RawObject::deserialize(object).map_err(|e| SkipReason::Malformed(e.to_string()))?;

    let first = raw
        .close_approach_data
        .first()
        .ok_or(SkipReason::NoCloseApproach)?;
    let approach =
        RawCloseApproach::deserialize(first).map_err(|e| SkipReason::Malformed(e.to_string()))?;

    const VELOCITY: &str = "relative_velocity.kilometers_per_hour";
    const DISTANCE: &str = "miss_distance.kilometers";
    const DIAMETER_MIN: &str = "estimated_diameter_min";
    const DIAMETER_MAX: &str = "estimated_diameter_max";

    let velocity = approach.relative_velocity.kilometers_per_hour.parse(VELOCITY)?;
    let velocity = positive(velocity, VELOCITY)?;
    let distance_km = approach.miss_distance.kilometers.parse(DISTANCE)?;
    let distance_km = positive(distance_km, DISTANCE)?;

    let meters = raw.estimated_diameter.meters;
    let diameter_min = finite(meters.estimated_diameter_min, DIAMETER_MIN)?;
    let diameter_min = positive(diameter_min, DIAMETER_MIN)?;
    let diameter_max = finite(meters.estimated_diameter_max, DIAMETER_MAX)?;
    let diameter_max = positive(diameter_max, DIAMETER_MAX)?;

    Ok(AsteroidRecord {
        name: raw.name,
        distance_km,
        diameter: (diameter_min + diameter_max) / 2.0,
        diameter_min,
        diameter_max,
        velocity,
        date: date.to_string(),
        hazardous: raw.is_potentially_hazardous_asteroid,
    })
}
