//! Filters for the public listing feed.

use serde::{Deserialize, Serialize};

use super::model::Pet;
use super::status::PetStatus;

/// Criteria narrowing the public feed.
///
/// The feed never contains finalized listings, whatever the filter says.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetFilter {
    /// Only listings in this status.
    pub status: Option<PetStatus>,
    /// Only listings of this species (case-insensitive exact match).
    pub species: Option<String>,
    /// Case-insensitive substring over name, breed and location.
    pub search: Option<String>,
}

impl PetFilter {
    /// Build a filter, dropping blank text criteria.
    pub fn new(status: Option<PetStatus>, species: Option<String>, search: Option<String>) -> Self {
        Self {
            status,
            species: non_blank(species),
            search: non_blank(search),
        }
    }

    /// Whether no criteria are set.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.species.is_none() && self.search.is_none()
    }

    /// The search term wrapped for a SQL `ILIKE` comparison.
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_ref().map(|s| {
            let escaped = s
                .replace('\\', "\\\\")
                .replace('%', "\\%")
                .replace('_', "\\_");
            format!("%{escaped}%")
        })
    }

    /// Evaluate the filter against a listing in memory.
    pub fn matches(&self, pet: &Pet) -> bool {
        if !pet.status.is_open() {
            return false;
        }
        if let Some(status) = self.status {
            if pet.status != status {
                return false;
            }
        }
        if let Some(species) = &self.species {
            if !pet.species.eq_ignore_ascii_case(species) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = [pet.name.as_deref(), pet.breed.as_deref(), Some(pet.location.as_str())]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn pet(name: Option<&str>, species: &str, location: &str, status: PetStatus) -> Pet {
        let now = Utc::now();
        Pet {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: name.map(str::to_string),
            species: species.to_string(),
            breed: Some("Labrador".to_string()),
            color: None,
            size: None,
            location: location.to_string(),
            status,
            contact: None,
            reward: None,
            latitude: None,
            longitude: None,
            created_at: now,
            updated_at: now,
            resolved_at: None,
            final_latitude: None,
            final_longitude: None,
            found_by_user_id: None,
            found_by_external: None,
        }
    }

    #[test]
    fn test_empty_filter_excludes_only_finalized() {
        let filter = PetFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&pet(Some("Rex"), "dog", "Boa Viagem", PetStatus::Lost)));
        assert!(!filter.matches(&pet(Some("Rex"), "dog", "Boa Viagem", PetStatus::Finalized)));
    }

    #[test]
    fn test_species_and_status() {
        let filter = PetFilter::new(Some(PetStatus::Found), Some("CAT".to_string()), None);
        assert!(filter.matches(&pet(None, "cat", "Derby", PetStatus::Found)));
        assert!(!filter.matches(&pet(None, "cat", "Derby", PetStatus::Lost)));
        assert!(!filter.matches(&pet(None, "dog", "Derby", PetStatus::Found)));
    }

    #[test]
    fn test_search_covers_name_breed_location() {
        let p = pet(Some("Thor"), "dog", "Parque da Jaqueira", PetStatus::Lost);
        for term in ["thor", "labra", "JAQUEIRA"] {
            let filter = PetFilter::new(None, None, Some(term.to_string()));
            assert!(filter.matches(&p), "term {term} should match");
        }
        let miss = PetFilter::new(None, None, Some("siamese".to_string()));
        assert!(!miss.matches(&p));
    }

    #[test]
    fn test_blank_criteria_are_dropped() {
        let filter = PetFilter::new(None, Some("  ".to_string()), Some(String::new()));
        assert!(filter.is_empty());
    }

    #[test]
    fn test_search_pattern_escapes_wildcards() {
        let filter = PetFilter::new(None, None, Some("50%_off".to_string()));
        assert_eq!(filter.search_pattern().as_deref(), Some("%50\\%\\_off%"));
    }
}
