//! Core types for the roster.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::geo::{Coordinate, CoordinateError};

/// Whether a salesperson can take a new lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalespersonStatus {
    #[default]
    Available,
    Busy,
}

impl fmt::Display for SalespersonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => write!(f, "available"),
            Self::Busy => write!(f, "busy"),
        }
    }
}

/// A salesperson record with their last known position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salesperson {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Territory or state the salesperson covers (e.g. "Maharashtra")
    #[serde(default)]
    pub territory: Option<String>,
    #[serde(default)]
    pub status: SalespersonStatus,
    #[serde(default)]
    pub current_latitude: Option<f64>,
    #[serde(default)]
    pub current_longitude: Option<f64>,
    #[serde(default)]
    pub last_location_update: Option<DateTime<Utc>>,
}

impl Salesperson {
    pub fn new(id: u64, full_name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            email: email.into(),
            phone: None,
            designation: None,
            photo_url: None,
            territory: None,
            status: SalespersonStatus::Available,
            current_latitude: None,
            current_longitude: None,
            last_location_update: None,
        }
    }

    /// Last reported position, if both halves are known.
    pub fn coordinate(&self) -> Option<Coordinate> {
        Coordinate::from_parts(self.current_latitude, self.current_longitude)
    }
}

/// A position report from a salesperson's device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A salesperson with their display-rounded distance to a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbySalesperson {
    pub id: u64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub photo_url: Option<String>,
    pub territory: Option<String>,
    pub status: SalespersonStatus,
    pub current_latitude: Option<f64>,
    pub current_longitude: Option<f64>,
    pub last_location_update: Option<DateTime<Utc>>,
    pub distance_km: f64,
}

impl NearbySalesperson {
    /// `distance_km` must already be rounded for display.
    pub(crate) fn from_ranked(sp: &Salesperson, distance_km: f64) -> Self {
        Self {
            id: sp.id,
            full_name: sp.full_name.clone(),
            email: sp.email.clone(),
            phone: sp.phone.clone(),
            designation: sp.designation.clone(),
            photo_url: sp.photo_url.clone(),
            territory: sp.territory.clone(),
            status: sp.status,
            current_latitude: sp.current_latitude,
            current_longitude: sp.current_longitude,
            last_location_update: sp.last_location_update,
            distance_km,
        }
    }
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("salesperson {0} not found")]
    NotFound(u64),
    #[error("salesperson id {0} already registered")]
    DuplicateId(u64),
    #[error("invalid coordinate: {0}")]
    InvalidCoordinate(#[from] CoordinateError),
    #[error("cannot read roster file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed roster file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
