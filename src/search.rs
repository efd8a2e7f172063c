//! Filter semantics of `GET /search` and the `/works/*` lookups
//!
//! `category` decides which side the text search applies to. The other side
//! is the set of entities connected to the matches, so every response is a
//! self-contained snapshot the graph can be built from.

use ontograph_types::{Category, Person, SearchQuery, SearchResponse, Work, WorkType};

use crate::dataset::Dataset;

/// Run a search query against the dataset. Output preserves dataset order.
pub fn filter(dataset: &Dataset, query: &SearchQuery) -> SearchResponse {
    let needle = query.search.to_lowercase();

    match query.category {
        Category::Work => {
            let works: Vec<Work> = dataset
                .works
                .iter()
                .filter(|w| query.work_type.map_or(true, |t| w.work_type() == t))
                .filter(|w| work_matches_text(w, &needle))
                .cloned()
                .collect();

            let persons = dataset
                .persons
                .iter()
                .filter(|p| query.role.map_or(true, |r| p.has_role(r)))
                .filter(|p| works.iter().any(|w| w.involves(p.id)))
                .cloned()
                .collect();

            SearchResponse::new(persons, works)
        }
        Category::Person => {
            let persons: Vec<Person> = dataset
                .persons
                .iter()
                .filter(|p| query.role.map_or(true, |r| p.has_role(r)))
                .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();

            let works = dataset
                .works
                .iter()
                .filter(|w| query.work_type.map_or(true, |t| w.work_type() == t))
                .filter(|w| persons.iter().any(|p| is_connected(p, w)))
                .cloned()
                .collect();

            SearchResponse::new(persons, works)
        }
    }
}

fn work_matches_text(work: &Work, needle: &str) -> bool {
    needle.is_empty()
        || [&work.title, &work.genre, &work.theme, &work.period]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
}

fn is_connected(person: &Person, work: &Work) -> bool {
    person.work_ids.contains(&work.id) || work.involves(person.id)
}

pub fn works_by_type(dataset: &Dataset, work_type: WorkType) -> Vec<Work> {
    dataset
        .works
        .iter()
        .filter(|w| w.work_type() == work_type)
        .cloned()
        .collect()
}

/// Case-insensitive exact genre match
pub fn works_by_genre(dataset: &Dataset, genre: &str) -> Vec<Work> {
    let genre = genre.trim();
    dataset
        .works
        .iter()
        .filter(|w| w.genre.eq_ignore_ascii_case(genre))
        .cloned()
        .collect()
}

/// Works with a creator whose name equals `creator`, ignoring case
pub fn works_by_creator(dataset: &Dataset, creator: &str) -> Vec<Work> {
    let creator = creator.trim().to_lowercase();
    let creator_ids: Vec<_> = dataset
        .persons
        .iter()
        .filter(|p| p.name.to_lowercase() == creator)
        .map(|p| p.id)
        .collect();

    dataset
        .works
        .iter()
        .filter(|w| creator_ids.iter().any(|id| w.is_created_by(*id)))
        .cloned()
        .collect()
}
