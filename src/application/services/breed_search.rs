//! Breed-list filtering for the search bar.

use crate::domain::entities::Breed;

/// Filters breeds by a free-text query.
///
/// The query is trimmed and matched case-insensitively as a substring of a
/// breed's name, origin, or temperament. A blank query keeps every breed, so
/// clearing the search bar restores the full list.
#[must_use]
pub fn filter_breeds(breeds: &[Breed], query: &str) -> Vec<Breed> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return breeds.to_vec();
    }
    breeds
        .iter()
        .filter(|breed| matches_query(breed, &needle))
        .cloned()
        .collect()
}

fn matches_query(breed: &Breed, needle: &str) -> bool {
    let haystacks = [
        Some(breed.name.as_str()),
        breed.origin.as_deref(),
        breed.temperament.as_deref(),
    ];
    haystacks
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
}
