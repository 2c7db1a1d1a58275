//! Wire model for station records returned by the JCDecaux v3 `stations` endpoint.
//!
//! Every field is optional on the wire. Instead of reaching into nested
//! `Option`s at each call site, [`Station`] exposes one accessor per field that
//! applies the resolution policy for that field:
//!
//! | Field             | Policy                              |
//! |-------------------|-------------------------------------|
//! | `contractName`    | absent → [`UNKNOWN_CITY`]           |
//! | `bikes`           | required                            |
//! | `electricalBikes` | absent → 0                          |
//! | `mechanicalBikes` | absent → 0                          |
//! | `stands`          | required                            |
//! | `name`            | required                            |
//! | `status`          | required                            |
//! | `position`        | required (both coordinates)         |

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::FieldError;

/// City key used for stations that do not report a `contractName`.
pub const UNKNOWN_CITY: &str = "unknown";

/// Operational status of a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StationStatus {
    Open,
    Closed,
    Other(String),
}

impl From<String> for StationStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "OPEN" => StationStatus::Open,
            "CLOSED" => StationStatus::Closed,
            _ => StationStatus::Other(raw),
        }
    }
}

impl From<StationStatus> for String {
    fn from(status: StationStatus) -> Self {
        status.to_string()
    }
}

impl fmt::Display for StationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationStatus::Open => f.write_str("OPEN"),
            StationStatus::Closed => f.write_str("CLOSED"),
            StationStatus::Other(raw) => f.write_str(raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availabilities {
    pub bikes: Option<u32>,
    pub stands: Option<u32>,
    pub electrical_bikes: Option<u32>,
    pub mechanical_bikes: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stands {
    pub capacity: Option<u32>,
    pub availabilities: Option<Availabilities>,
}

/// One station snapshot as received from the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub number: Option<u32>,
    pub contract_name: Option<String>,
    pub name: Option<String>,
    pub status: Option<StationStatus>,
    pub position: Option<Position>,
    pub total_stands: Option<Stands>,
}

impl Station {
    fn availabilities(&self) -> Option<&Availabilities> {
        self.total_stands.as_ref()?.availabilities.as_ref()
    }

    /// City (contract) code, or [`UNKNOWN_CITY`] when absent.
    pub fn city(&self) -> &str {
        self.contract_name.as_deref().unwrap_or(UNKNOWN_CITY)
    }

    pub fn bikes(&self) -> Result<u32, FieldError> {
        self.availabilities()
            .and_then(|a| a.bikes)
            .ok_or(FieldError::Missing("totalStands.availabilities.bikes"))
    }

    pub fn stands(&self) -> Result<u32, FieldError> {
        self.availabilities()
            .and_then(|a| a.stands)
            .ok_or(FieldError::Missing("totalStands.availabilities.stands"))
    }

    pub fn electric_bikes(&self) -> u32 {
        self.availabilities()
            .and_then(|a| a.electrical_bikes)
            .unwrap_or(0)
    }

    pub fn mechanical_bikes(&self) -> u32 {
        self.availabilities()
            .and_then(|a| a.mechanical_bikes)
            .unwrap_or(0)
    }

    pub fn name(&self) -> Result<&str, FieldError> {
        self.name.as_deref().ok_or(FieldError::Missing("name"))
    }

    pub fn status(&self) -> Result<&StationStatus, FieldError> {
        self.status.as_ref().ok_or(FieldError::Missing("status"))
    }

    /// Returns `(latitude, longitude)`.
    pub fn coordinates(&self) -> Result<(f64, f64), FieldError> {
        let pos = self
            .position
            .as_ref()
            .ok_or(FieldError::Missing("position"))?;
        let lat = pos
            .latitude
            .ok_or(FieldError::Missing("position.latitude"))?;
        let lon = pos
            .longitude
            .ok_or(FieldError::Missing("position.longitude"))?;
        Ok((lat, lon))
    }

    /// Short label used in log fields when a record is rejected.
    pub fn label(&self) -> String {
        match (&self.name, self.number) {
            (Some(name), _) => name.clone(),
            (None, Some(number)) => format!("#{number}"),
            (None, None) => "<unnamed>".to_string(),
        }
    }
}
