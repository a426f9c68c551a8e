use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use thiserror::Error;
use crate::models::Profile;

/// Errors that can occur when loading profiles
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Read access to user profiles, keyed by user id
pub trait ProfileSource: Send + Sync {
    fn get_profile(&self, user_id: &str) -> Option<Profile>;
}

/// In-memory profile store
///
/// Seeded from a JSON array of profiles and updated through the API.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: Vec<Profile>) -> Self {
        let store = Self::new();
        for profile in profiles {
            store.upsert(profile);
        }
        store
    }

    /// Load profiles from a JSON file containing an array of profiles
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ProfileStoreError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let profiles: Vec<Profile> = serde_json::from_str(&raw)?;
        tracing::info!("Loaded {} profiles from {}", profiles.len(), path.as_ref().display());
        Ok(Self::from_profiles(profiles))
    }

    /// Insert or replace a profile, returning the previous version
    pub fn upsert(&self, profile: Profile) -> Option<Profile> {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        profiles.insert(profile.id.clone(), profile)
    }

    pub fn remove(&self, user_id: &str) -> Option<Profile> {
        let mut profiles = self.profiles.write().unwrap_or_else(|e| e.into_inner());
        profiles.remove(user_id)
    }

    pub fn len(&self) -> usize {
        self.profiles.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileSource for InMemoryProfileStore {
    fn get_profile(&self, user_id: &str) -> Option<Profile> {
        let profiles = self.profiles.read().unwrap_or_else(|e| e.into_inner());
        profiles.get(user_id).cloned()
    }
}
