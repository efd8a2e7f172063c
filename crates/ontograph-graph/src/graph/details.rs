//! Details panel projection
//!
//! Read-only view of a node's payload as labeled rows, chosen by kind.

use ontograph_types::{Person, Work, WorkDetails};

use super::types::{GraphNode, NodePayload};

#[derive(Debug, Clone, PartialEq)]
pub struct EntityDetails {
    pub title: String,
    /// "Person", "Film", "Book" or "Painting"
    pub kind: &'static str,
    pub rows: Vec<(&'static str, String)>,
}

impl EntityDetails {
    pub fn from_node(node: &GraphNode) -> Self {
        let rows = match &node.payload {
            NodePayload::Person(person) => person_rows(person),
            NodePayload::Work(work) => work_rows(work),
        };
        Self {
            title: node.label.clone(),
            kind: node.kind.as_str(),
            rows,
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }

    /// Render as a two-column grid
    pub fn ui(&self, ui: &mut egui::Ui) {
        ui.heading(self.title.as_str());
        ui.label(egui::RichText::new(self.kind).weak());
        ui.separator();
        egui::Grid::new("entity_details")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for (name, value) in &self.rows {
                    ui.strong(*name);
                    ui.label(value.as_str());
                    ui.end_row();
                }
            });
    }
}

fn or_dash(value: &str) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

fn person_rows(person: &Person) -> Vec<(&'static str, String)> {
    let roles: Vec<&str> = person.roles.iter().map(|r| r.as_str()).collect();
    let year = |y: Option<i32>| y.map_or_else(|| "-".to_string(), |y| y.to_string());
    vec![
        ("Roles", or_dash(&roles.join(", "))),
        ("Born", year(person.birth_year)),
        ("Died", year(person.death_year)),
        ("Works", person.work_ids.len().to_string()),
    ]
}

fn work_rows(work: &Work) -> Vec<(&'static str, String)> {
    let mut rows = vec![
        ("Genre", or_dash(&work.genre)),
        ("Theme", or_dash(&work.theme)),
        ("Period", or_dash(&work.period)),
    ];
    match &work.details {
        WorkDetails::Film(film) => {
            rows.push(("Duration", format!("{} min", film.duration)));
            rows.push(("Studio", or_dash(&film.studio)));
            rows.push(("Cast", film.actor_ids.len().to_string()));
        }
        WorkDetails::Book(book) => {
            rows.push(("Narrative type", or_dash(&book.narrative_type)));
            rows.push(("Pages", book.page_count.to_string()));
        }
        WorkDetails::Painting(painting) => {
            rows.push(("Medium", or_dash(&painting.medium)));
            rows.push((
                "Dimensions",
                format!(
                    "{} × {} cm",
                    painting.dimensions.width, painting.dimensions.height
                ),
            ));
            rows.push(("Location", or_dash(&painting.location)));
        }
    }
    rows
}
