use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upstream rejects feed windows longer than this.
pub const MAX_FEED_WINDOW_DAYS: i64 = 7;

/// One near-earth object, flattened from the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidRecord {
    pub name: String,
    /// Miss distance at closest approach, km
    pub distance_km: f64,
    /// Mean of `diameter_min` and `diameter_max`, meters
    pub diameter: f64,
    pub diameter_min: f64,
    pub diameter_max: f64,
    /// Relative velocity, km/h
    pub velocity: f64,
    /// Feed date key (YYYY-MM-DD)
    pub date: String,
    pub hazardous: bool,
}

/// A point used only for drawing. Not the asteroid's real position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0, z: 0.0 };
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedAsteroid {
    pub record: AsteroidRecord,
    pub position: Position,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("no calendar date exists {days} days after {start}")]
    OutOfCalendar { start: NaiveDate, days: i64 },
}

/// Inclusive calendar window for a feed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// `start` through `start + 7 days`.
    pub fn week_from(start: NaiveDate) -> Result<Self, RangeError> {
        let end = start
            .checked_add_signed(Duration::days(MAX_FEED_WINDOW_DAYS))
            .ok_or(RangeError::OutOfCalendar {
                start,
                days: MAX_FEED_WINDOW_DAYS,
            })?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        self.span_days() + 1
    }

    /// Span between the two dates, which is what upstream limits.
    pub fn span_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}
