//! Entity dataset served by the search API
//!
//! Either the built-in sample or a JSON file of `{persons, works}` named by
//! `ONTOGRAPH_DATASET`.

use std::path::Path;

use ontograph_types::{
    BookDetails, Dimensions, EntityId, FilmDetails, PaintingDetails, Person, Role, Work,
    WorkDetails,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable naming a dataset JSON file
pub const DATASET_ENV: &str = "ONTOGRAPH_DATASET";

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub works: Vec<Work>,
}

impl Dataset {
    pub fn new(persons: Vec<Person>, works: Vec<Work>) -> Self {
        Self { persons, works }
    }

    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Dataset from `ONTOGRAPH_DATASET`, or the built-in sample when unset
    pub fn from_env() -> Result<Self, DatasetError> {
        match std::env::var(DATASET_ENV) {
            Ok(path) => {
                let dataset = Self::from_json_file(&path)?;
                tracing::info!(
                    "loaded dataset {}: {} persons, {} works",
                    path,
                    dataset.persons.len(),
                    dataset.works.len()
                );
                Ok(dataset)
            }
            Err(_) => {
                let dataset = Self::sample();
                tracing::info!(
                    "using built-in sample dataset: {} persons, {} works",
                    dataset.persons.len(),
                    dataset.works.len()
                );
                Ok(dataset)
            }
        }
    }

    pub fn work(&self, id: EntityId) -> Option<&Work> {
        self.works.iter().find(|w| w.id == id)
    }

    pub fn person(&self, id: EntityId) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == id)
    }

    /// Small cross-media sample: paintings, novels and their film adaptations
    pub fn sample() -> Self {
        let persons = vec![
            Person::new(1, "Vincent van Gogh")
                .with_role(Role::Painter)
                .with_years(Some(1853), Some(1890))
                .with_works([1, 7]),
            Person::new(2, "Salvador Dalí")
                .with_role(Role::Painter)
                .with_years(Some(1904), Some(1989))
                .with_works([2]),
            Person::new(3, "Francis Ford Coppola")
                .with_role(Role::Director)
                .with_years(Some(1939), None)
                .with_works([3]),
            Person::new(4, "Mario Puzo")
                .with_role(Role::Author)
                .with_years(Some(1920), Some(1999))
                .with_works([4]),
            Person::new(5, "Marlon Brando")
                .with_role(Role::Actor)
                .with_years(Some(1924), Some(2004))
                .with_works([3]),
            Person::new(6, "Al Pacino")
                .with_role(Role::Actor)
                .with_years(Some(1940), None)
                .with_works([3]),
            Person::new(7, "J. R. R. Tolkien")
                .with_role(Role::Author)
                .with_years(Some(1892), Some(1973))
                .with_works([5]),
            Person::new(8, "Peter Jackson")
                .with_role(Role::Director)
                .with_years(Some(1961), None)
                .with_works([6]),
            Person::new(9, "Ian McKellen")
                .with_role(Role::Actor)
                .with_years(Some(1939), None)
                .with_works([6]),
            Person::new(10, "Anthony Burgess")
                .with_role(Role::Author)
                .with_years(Some(1917), Some(1993))
                .with_works([8]),
            Person::new(11, "Stanley Kubrick")
                .with_role(Role::Director)
                .with_years(Some(1928), Some(1999))
                .with_works([9]),
            Person::new(12, "Malcolm McDowell")
                .with_role(Role::Actor)
                .with_years(Some(1943), None)
                .with_works([9]),
        ];

        let works = vec![
            painting(1, "The Starry Night", "Oil on canvas", (73.7, 92.1), "Museum of Modern Art, New York")
                .with_creators([1])
                .with_classification("Post-Impressionism", "Night", "1889")
                .with_related([7]),
            painting(2, "The Persistence of Memory", "Oil on canvas", (24.1, 33.0), "Museum of Modern Art, New York")
                .with_creators([2])
                .with_classification("Surrealism", "Time", "1931"),
            film(3, "The Godfather", 175, "Paramount Pictures", [5, 6])
                .with_creators([3])
                .with_classification("Crime", "Family and power", "1972")
                .with_related([4]),
            book(4, "The Godfather (novel)", "Novel", 448)
                .with_creators([4])
                .with_classification("Crime", "Family and power", "1969"),
            book(5, "The Lord of the Rings", "Novel", 1178)
                .with_creators([7])
                .with_classification("Fantasy", "Good versus evil", "1954"),
            film(6, "The Fellowship of the Ring", 178, "New Line Cinema", [9])
                .with_creators([8])
                .with_classification("Fantasy", "Good versus evil", "2001")
                .with_related([5]),
            painting(7, "Café Terrace at Night", "Oil on canvas", (80.7, 65.3), "Kröller-Müller Museum, Otterlo")
                .with_creators([1])
                .with_classification("Post-Impressionism", "Night", "1888")
                .with_related([1]),
            book(8, "A Clockwork Orange (novel)", "Novella", 192)
                .with_creators([10])
                .with_classification("Dystopian", "Free will", "1962"),
            film(9, "A Clockwork Orange", 136, "Warner Bros.", [12])
                .with_creators([11])
                .with_classification("Dystopian", "Free will", "1971")
                .with_related([8]),
        ];

        Self::new(persons, works)
    }
}

fn film(
    id: EntityId,
    title: &str,
    duration: u32,
    studio: &str,
    actors: impl IntoIterator<Item = EntityId>,
) -> Work {
    let mut work = Work::film(id, title);
    work.details = WorkDetails::Film(FilmDetails {
        duration,
        studio: studio.to_string(),
        actor_ids: actors.into_iter().collect(),
    });
    work
}

fn book(id: EntityId, title: &str, narrative_type: &str, page_count: u32) -> Work {
    let mut work = Work::book(id, title);
    work.details = WorkDetails::Book(BookDetails {
        narrative_type: narrative_type.to_string(),
        page_count,
    });
    work
}

fn painting(
    id: EntityId,
    title: &str,
    medium: &str,
    (height, width): (f32, f32),
    location: &str,
) -> Work {
    let mut work = Work::painting(id, title);
    work.details = WorkDetails::Painting(PaintingDetails {
        medium: medium.to_string(),
        dimensions: Dimensions { width, height },
        location: location.to_string(),
    });
    work
}
