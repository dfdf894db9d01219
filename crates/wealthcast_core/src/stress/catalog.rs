//! Catalog of historical crisis profiles.
//!
//! The built-in table ships with the crate as `data/crisis_profiles.yaml` and
//! is compiled in, so adding a crisis only touches that file. Callers can also
//! load their own table with [`CrisisCatalog::from_yaml_str`]; both paths run
//! the same validation.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::CatalogError;
use crate::model::{CrisisId, CrisisProfile};

const BUILTIN_PROFILES: &str = include_str!("../../data/crisis_profiles.yaml");

#[derive(Deserialize)]
struct CatalogFile {
    crises: Vec<CrisisProfile>,
}

/// Validated, ordered set of crisis profiles
#[derive(Debug, Clone, Default)]
pub struct CrisisCatalog {
    profiles: Vec<CrisisProfile>,
    index: FxHashMap<CrisisId, usize>,
}

impl CrisisCatalog {
    /// The catalog bundled with the crate
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_PROFILES)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_saphyr::from_str(yaml)?;
        Self::from_profiles(file.crises)
    }

    /// Build a catalog from profiles, keeping their order
    pub fn from_profiles(profiles: Vec<CrisisProfile>) -> Result<Self, CatalogError> {
        let mut index = FxHashMap::default();
        for (position, profile) in profiles.iter().enumerate() {
            validate_profile(profile)?;
            if index.insert(profile.id.clone(), position).is_some() {
                return Err(CatalogError::DuplicateId(profile.id.clone()));
            }
        }
        tracing::debug!(count = profiles.len(), "Loaded crisis catalog");
        Ok(Self { profiles, index })
    }

    #[must_use]
    pub fn get(&self, id: &CrisisId) -> Option<&CrisisProfile> {
        self.index.get(id).map(|&i| &self.profiles[i])
    }

    /// Like [`get`](Self::get), but an unknown id is an error
    pub fn require(&self, id: &CrisisId) -> Result<&CrisisProfile, CatalogError> {
        self.get(id).ok_or_else(|| CatalogError::UnknownCrisis(id.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CrisisProfile> {
        self.profiles.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &CrisisId> {
        self.profiles.iter().map(|p| &p.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a CrisisCatalog {
    type Item = &'a CrisisProfile;
    type IntoIter = std::slice::Iter<'a, CrisisProfile>;

    fn into_iter(self) -> Self::IntoIter {
        self.profiles.iter()
    }
}

pub(crate) fn validate_profile(profile: &CrisisProfile) -> Result<(), CatalogError> {
    let invalid = |reason: String| CatalogError::InvalidProfile {
        id: profile.id.clone(),
        reason,
    };

    if profile.id.0.trim().is_empty() {
        return Err(invalid("id must not be empty".into()));
    }
    let crash = profile.market_crash_percentage;
    if !crash.is_finite() || crash > 0.0 || crash <= -100.0 {
        return Err(invalid(format!(
            "market_crash_percentage {crash} must be in (-100, 0]"
        )));
    }
    if profile.recovery_time_months == 0 {
        return Err(invalid("recovery_time_months must be at least 1".into()));
    }
    if let Some((sector, value)) = profile.sector_impacts.iter().find(|(_, v)| !v.is_finite()) {
        return Err(invalid(format!("sector impact for {sector} is {value}")));
    }
    Ok(())
}
