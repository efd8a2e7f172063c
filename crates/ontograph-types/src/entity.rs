//! Entity model: people and polymorphic creative works.
//!
//! A [`Work`] carries the fields shared by every kind of work and a
//! [`WorkDetails`] sum type holding the kind-specific ones. Code that only
//! needs common fields never looks at the variant.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Numeric id, unique within one entity kind.
pub type EntityId = u32;

// ============================================================================
// PERSON
// ============================================================================

/// Role a person can hold across their works
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Author,
    Actor,
    Director,
    Painter,
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[Role::Author, Role::Actor, Role::Director, Role::Painter]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Author => "Author",
            Role::Actor => "Actor",
            Role::Director => "Director",
            Role::Painter => "Painter",
        }
    }

    /// Case-insensitive parse. Unknown or empty input yields `None`.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        Role::all()
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person connected to one or more works
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: EntityId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
    #[serde(default)]
    pub roles: BTreeSet<Role>,
    /// Works this person is credited on, in display order
    #[serde(default, rename = "works", alias = "workIds")]
    pub work_ids: Vec<EntityId>,
}

impl Person {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            birth_year: None,
            death_year: None,
            roles: BTreeSet::new(),
            work_ids: Vec::new(),
        }
    }

    /// Builder: add a role
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Builder: set life span
    pub fn with_years(mut self, birth: Option<i32>, death: Option<i32>) -> Self {
        self.birth_year = birth;
        self.death_year = death;
        self
    }

    /// Builder: set credited works
    pub fn with_works(mut self, work_ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.work_ids = work_ids.into_iter().collect();
        self
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

// ============================================================================
// WORK
// ============================================================================

/// Discriminant of a [`Work`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkType {
    Film,
    Book,
    Painting,
}

impl WorkType {
    pub fn all() -> &'static [WorkType] {
        &[WorkType::Film, WorkType::Book, WorkType::Painting]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkType::Film => "Film",
            WorkType::Book => "Book",
            WorkType::Painting => "Painting",
        }
    }

    /// Case-insensitive parse. Unknown or empty input yields `None`.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        WorkType::all()
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for WorkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical size of a painting
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilmDetails {
    /// Running time in minutes
    #[serde(default)]
    pub duration: u32,
    #[serde(default)]
    pub studio: String,
    #[serde(default, rename = "actors", alias = "actorIds")]
    pub actor_ids: Vec<EntityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDetails {
    #[serde(default)]
    pub narrative_type: String,
    #[serde(default)]
    pub page_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintingDetails {
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub location: String,
}

/// Kind-specific fields of a work, tagged by `type` on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkDetails {
    Film(FilmDetails),
    Book(BookDetails),
    Painting(PaintingDetails),
}

/// A creative work (film, book or painting)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Work {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub creator_ids: Vec<EntityId>,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub period: String,
    #[serde(default, rename = "relatedWorks", alias = "relatedWorkIds")]
    pub related_work_ids: Vec<EntityId>,
    #[serde(flatten)]
    pub details: WorkDetails,
}

impl Work {
    fn with_details(id: EntityId, title: impl Into<String>, details: WorkDetails) -> Self {
        Self {
            id,
            title: title.into(),
            creator_ids: Vec::new(),
            genre: String::new(),
            theme: String::new(),
            period: String::new(),
            related_work_ids: Vec::new(),
            details,
        }
    }

    pub fn film(id: EntityId, title: impl Into<String>) -> Self {
        Self::with_details(
            id,
            title,
            WorkDetails::Film(FilmDetails {
                duration: 0,
                studio: String::new(),
                actor_ids: Vec::new(),
            }),
        )
    }

    pub fn book(id: EntityId, title: impl Into<String>) -> Self {
        Self::with_details(
            id,
            title,
            WorkDetails::Book(BookDetails {
                narrative_type: String::new(),
                page_count: 0,
            }),
        )
    }

    pub fn painting(id: EntityId, title: impl Into<String>) -> Self {
        Self::with_details(
            id,
            title,
            WorkDetails::Painting(PaintingDetails {
                medium: String::new(),
                dimensions: Dimensions::default(),
                location: String::new(),
            }),
        )
    }

    /// Builder: set creators
    pub fn with_creators(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.creator_ids = ids.into_iter().collect();
        self
    }

    /// Builder: set related works
    pub fn with_related(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        self.related_work_ids = ids.into_iter().collect();
        self
    }

    /// Builder: set genre, theme and period
    pub fn with_classification(
        mut self,
        genre: impl Into<String>,
        theme: impl Into<String>,
        period: impl Into<String>,
    ) -> Self {
        self.genre = genre.into();
        self.theme = theme.into();
        self.period = period.into();
        self
    }

    /// Builder: set the cast. No-op for works that are not films.
    pub fn with_actors(mut self, ids: impl IntoIterator<Item = EntityId>) -> Self {
        if let WorkDetails::Film(film) = &mut self.details {
            film.actor_ids = ids.into_iter().collect();
        }
        self
    }

    pub fn work_type(&self) -> WorkType {
        match self.details {
            WorkDetails::Film(_) => WorkType::Film,
            WorkDetails::Book(_) => WorkType::Book,
            WorkDetails::Painting(_) => WorkType::Painting,
        }
    }

    /// Cast of a film; empty for other kinds
    pub fn actor_ids(&self) -> &[EntityId] {
        match &self.details {
            WorkDetails::Film(film) => &film.actor_ids,
            WorkDetails::Book(_) | WorkDetails::Painting(_) => &[],
        }
    }

    pub fn is_created_by(&self, person_id: EntityId) -> bool {
        self.creator_ids.contains(&person_id)
    }

    /// True when the person is a creator or (for films) in the cast
    pub fn involves(&self, person_id: EntityId) -> bool {
        self.is_created_by(person_id) || self.actor_ids().contains(&person_id)
    }
}
