use crate::roster::Roster;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct AppState {
    roster: RwLock<Roster>,
}

impl AppState {
    pub fn new(roster: Roster) -> Self {
        Self { roster: RwLock::new(roster) }
    }

    // Roster writes are single assignments, so a poisoned lock still holds
    // consistent data.
    pub fn roster(&self) -> RwLockReadGuard<'_, Roster> {
        self.roster.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn roster_mut(&self) -> RwLockWriteGuard<'_, Roster> {
        self.roster.write().unwrap_or_else(PoisonError::into_inner)
    }
}
