//! In-memory roster of salespeople, optionally seeded from a JSON snapshot.
//!
//! The snapshot is a JSON array of [`Salesperson`] records. Insertion order
//! is kept and is the tie-break order when two salespeople are equally far.

use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

use super::types::{LocationUpdate, NearbySalesperson, RosterError, Salesperson, SalespersonStatus};
use crate::geo::Coordinate;
use crate::presentation::round_km;
use crate::ranker::{self, Candidate};

#[derive(Debug, Clone, Default)]
pub struct Roster {
    entries: Vec<Salesperson>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, rejecting repeated ids.
    pub fn from_salespeople(salespeople: Vec<Salesperson>) -> Result<Self, RosterError> {
        let mut roster = Self::new();
        for sp in salespeople {
            roster.insert(sp)?;
        }
        Ok(roster)
    }

    /// Load a roster snapshot from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, RosterError> {
        let data = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let salespeople: Vec<Salesperson> = serde_json::from_str(&data).map_err(|source| RosterError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::from_salespeople(salespeople)?;
        tracing::debug!(path = %path.display(), count = roster.len(), "roster loaded");
        Ok(roster)
    }

    pub fn insert(&mut self, salesperson: Salesperson) -> Result<(), RosterError> {
        if self.get(salesperson.id).is_some() {
            return Err(RosterError::DuplicateId(salesperson.id));
        }
        self.entries.push(salesperson);
        Ok(())
    }

    pub fn get(&self, id: u64) -> Option<&Salesperson> {
        self.entries.iter().find(|sp| sp.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Salesperson, RosterError> {
        self.entries
            .iter_mut()
            .find(|sp| sp.id == id)
            .ok_or(RosterError::NotFound(id))
    }

    /// All salespeople in insertion order.
    pub fn list(&self) -> &[Salesperson] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a new position report. Out-of-range coordinates are rejected.
    pub fn update_location(
        &mut self,
        id: u64,
        update: LocationUpdate,
        at: DateTime<Utc>,
    ) -> Result<&Salesperson, RosterError> {
        let coord = Coordinate::checked(update.latitude, update.longitude)?;
        let sp = self.get_mut(id)?;
        sp.current_latitude = Some(coord.lat);
        sp.current_longitude = Some(coord.lon);
        sp.last_location_update = Some(at);
        Ok(&*sp)
    }

    pub fn set_status(&mut self, id: u64, status: SalespersonStatus) -> Result<(), RosterError> {
        self.get_mut(id)?.status = status;
        Ok(())
    }

    /// Salespeople with a known position, closest to `target` first.
    pub fn nearby(&self, target: Coordinate) -> Vec<NearbySalesperson> {
        ranker::rank_by_distance(target, self.candidates(|_| true))
            .into_iter()
            .map(|r| NearbySalesperson::from_ranked(r.key, round_km(r.distance_km)))
            .collect()
    }

    /// The closest salesperson who can take a new lead.
    pub fn nearest_available(&self, target: Coordinate) -> Option<NearbySalesperson> {
        ranker::nearest(target, self.candidates(|sp| sp.status == SalespersonStatus::Available))
            .map(|r| NearbySalesperson::from_ranked(r.key, round_km(r.distance_km)))
    }

    fn candidates<'a, F>(&'a self, keep: F) -> impl Iterator<Item = Candidate<&'a Salesperson>> + 'a
    where
        F: Fn(&Salesperson) -> bool + 'a,
    {
        self.entries
            .iter()
            .filter(move |sp| keep(sp))
            .map(|sp| Candidate::new(sp, sp.coordinate()))
    }
}
