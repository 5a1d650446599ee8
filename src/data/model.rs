use std::collections::BTreeMap;
use std::fmt;
use std::ops::Deref;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::{Error, Result};

/// Timestamp layout used by the JPL close-approach export, e.g. `1900-Dec-27 01:30`.
pub const CAD_TIME_FORMAT: &str = "%Y-%b-%d %H:%M";
/// Date-only fallback of [`CAD_TIME_FORMAT`].
pub const CAD_DATE_FORMAT: &str = "%Y-%b-%d";
/// Output layout for approach times (no seconds).
pub const OUTPUT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A normalized input row: field name → raw string value (possibly empty).
/// Missing keys behave exactly like empty values.
pub type Record = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// Identifiers into the dataset arenas
// ---------------------------------------------------------------------------

/// Position of a NEO in the database arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NeoId(pub usize);

/// Position of a close approach in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ApproachId(pub usize);

// ---------------------------------------------------------------------------
// Field coercion helpers
// ---------------------------------------------------------------------------

/// Trimmed, non-empty value of `key`, or `None`.
fn field<'r>(record: &'r Record, key: &str) -> Option<&'r str> {
    record
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn required(record: &Record, entity: &'static str, key: &'static str) -> Result<String> {
    field(record, key)
        .map(str::to_string)
        .ok_or(Error::MissingField { entity, field: key })
}

/// Parse an optional float. `NaN` counts as unknown.
fn optional_f64(record: &Record, entity: &'static str, key: &'static str) -> Result<Option<f64>> {
    match field(record, key) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f64>()
            .map(|v| if v.is_nan() { None } else { Some(v) })
            .map_err(|e| Error::invalid_field(entity, key, raw, e)),
    }
}

/// Parse a close-approach timestamp (`YYYY-Mon-DD HH:MM`, or a bare date at midnight).
pub fn parse_cad_time(raw: &str) -> std::result::Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, CAD_TIME_FORMAT).or_else(|err| {
        NaiveDate::parse_from_str(raw, CAD_DATE_FORMAT)
            .map(|d| d.and_time(NaiveTime::MIN))
            .map_err(|_| err)
    })
}

/// Format an approach time without seconds; unknown times render empty.
pub fn format_time(time: Option<NaiveDateTime>) -> String {
    time.map(|t| t.format(OUTPUT_TIME_FORMAT).to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// NearEarthObject
// ---------------------------------------------------------------------------

/// A near-Earth object, identified by its primary designation.
#[derive(Debug, Clone, PartialEq)]
pub struct NearEarthObject {
    /// Primary designation; never empty.
    pub designation: String,
    /// IAU name, `None` when the object is unnamed.
    pub name: Option<String>,
    /// Diameter in km, `None` when unknown.
    pub diameter: Option<f64>,
    pub hazardous: bool,
    /// Filled in once by the linker, in load order.
    pub(crate) approaches: Vec<ApproachId>,
}

impl NearEarthObject {
    pub const ENTITY: &'static str = "NEO";

    pub fn new(
        designation: impl Into<String>,
        name: Option<&str>,
        diameter: Option<f64>,
        hazardous: bool,
    ) -> Self {
        Self {
            designation: designation.into(),
            name: name.map(str::to_string),
            diameter,
            hazardous,
            approaches: Vec::new(),
        }
    }

    /// Build from a normalized record with keys `designation`, `name`,
    /// `diameter`, `hazardous`. Unrecognized keys are ignored.
    pub fn from_record(record: &Record) -> Result<Self> {
        let designation = required(record, Self::ENTITY, "designation")?;
        let name = field(record, "name").map(str::to_string);
        let diameter = optional_f64(record, Self::ENTITY, "diameter")?;
        let hazardous = field(record, "hazardous") == Some("Y");

        Ok(Self {
            designation,
            name,
            diameter,
            hazardous,
            approaches: Vec::new(),
        })
    }

    /// Designation followed by the name in parentheses, when there is one.
    pub fn fullname(&self) -> String {
        match &self.name {
            Some(name) => format!("{} ({})", self.designation, name),
            None => self.designation.clone(),
        }
    }

    /// Handles of this NEO's close approaches, in load order.
    pub fn approach_ids(&self) -> &[ApproachId] {
        &self.approaches
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NEO {} ", self.fullname())?;
        match self.diameter {
            Some(d) => write!(f, "has a diameter of {d:.3} km")?,
            None => write!(f, "has an unknown diameter")?,
        }
        let verb = if self.hazardous { "is" } else { "is not" };
        write!(f, " and {verb} potentially hazardous.")
    }
}

// ---------------------------------------------------------------------------
// CloseApproach
// ---------------------------------------------------------------------------

/// One close approach of a NEO to Earth.
#[derive(Debug, Clone, PartialEq)]
pub struct CloseApproach {
    /// Designation of the approaching NEO, as loaded.
    pub designation: String,
    /// UTC time of closest approach, `None` when unknown.
    pub time: Option<NaiveDateTime>,
    /// Nominal distance in au.
    pub distance: Option<f64>,
    /// Relative velocity in km/s.
    pub velocity: Option<f64>,
    pub(crate) neo: Option<NeoId>,
}

impl CloseApproach {
    pub const ENTITY: &'static str = "close approach";

    pub fn new(
        designation: impl Into<String>,
        time: Option<NaiveDateTime>,
        distance: Option<f64>,
        velocity: Option<f64>,
    ) -> Self {
        Self {
            designation: designation.into(),
            time,
            distance,
            velocity,
            neo: None,
        }
    }

    /// Build from a normalized record with keys `designation`, `time`,
    /// `distance`, `velocity`. Unrecognized keys are ignored.
    pub fn from_record(record: &Record) -> Result<Self> {
        let designation = required(record, Self::ENTITY, "designation")?;
        let time = field(record, "time")
            .map(|raw| {
                parse_cad_time(raw).map_err(|e| Error::invalid_field(Self::ENTITY, "time", raw, e))
            })
            .transpose()?;
        let distance = optional_f64(record, Self::ENTITY, "distance")?;
        let velocity = optional_f64(record, Self::ENTITY, "velocity")?;

        Ok(Self::new(designation, time, distance, velocity))
    }

    /// The NEO this approach was linked to, `None` before linking.
    pub fn neo_id(&self) -> Option<NeoId> {
        self.neo
    }

    pub fn time_str(&self) -> String {
        format_time(self.time)
    }
}

impl fmt::Display for CloseApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe_approach(f, self, &self.designation)
    }
}

fn describe_approach(f: &mut fmt::Formatter<'_>, ca: &CloseApproach, who: &str) -> fmt::Result {
    match ca.time {
        Some(_) => write!(f, "At {}, '{who}' approaches Earth", ca.time_str())?,
        None => write!(f, "At an unknown time, '{who}' approaches Earth")?,
    }
    match ca.distance {
        Some(d) => write!(f, " at a distance of {d:.2} au")?,
        None => write!(f, " at an unknown distance")?,
    }
    match ca.velocity {
        Some(v) => write!(f, " and a velocity of {v:.2} km/s."),
        None => write!(f, " with an unknown velocity."),
    }
}

// ---------------------------------------------------------------------------
// LinkedApproach – a close approach joined with its NEO
// ---------------------------------------------------------------------------

/// Read-only view of a linked close approach together with its NEO.
#[derive(Debug, Clone, Copy)]
pub struct LinkedApproach<'a> {
    approach: &'a CloseApproach,
    neo: &'a NearEarthObject,
}

impl<'a> LinkedApproach<'a> {
    pub(crate) fn new(approach: &'a CloseApproach, neo: &'a NearEarthObject) -> Self {
        Self { approach, neo }
    }

    pub fn approach(&self) -> &'a CloseApproach {
        self.approach
    }

    pub fn neo(&self) -> &'a NearEarthObject {
        self.neo
    }

    pub fn fullname(&self) -> String {
        self.neo.fullname()
    }

    /// Flat record consumed by the CSV and JSON writers.
    pub fn serialize(&self) -> SerializedApproach {
        SerializedApproach {
            datetime_utc: self.approach.time_str(),
            distance_au: self.approach.distance,
            velocity_km_s: self.approach.velocity,
            neo: SerializedNeo {
                designation: self.neo.designation.clone(),
                name: self.neo.name.clone(),
                diameter_km: self.neo.diameter,
                potentially_hazardous: self.neo.hazardous,
            },
        }
    }
}

impl Deref for LinkedApproach<'_> {
    type Target = CloseApproach;

    fn deref(&self) -> &Self::Target {
        self.approach
    }
}

impl fmt::Display for LinkedApproach<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        describe_approach(f, self.approach, &self.fullname())
    }
}

// ---------------------------------------------------------------------------
// Serialized output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedApproach {
    pub datetime_utc: String,
    pub distance_au: Option<f64>,
    pub velocity_km_s: Option<f64>,
    pub neo: SerializedNeo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SerializedNeo {
    pub designation: String,
    pub name: Option<String>,
    pub diameter_km: Option<f64>,
    pub potentially_hazardous: bool,
}
