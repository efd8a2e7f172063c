//! Ontograph desktop viewer
//!
//! Filter panel on top, graph in the center, details of the selected node on
//! the right. Searches run on a tokio runtime; the result is polled each frame.
//!
//! Environment:
//! - `ONTOGRAPH_API_URL` - search server (default `http://localhost:3001`)
//! - `ONTOGRAPH_SETTINGS` - optional graph settings YAML
//! - `RUST_LOG` - log filter (default `ontograph_graph=info`)

use std::sync::{Arc, Mutex};

use ontograph_graph::{global_settings, ApiClient, OntologyGraphWidget};
use ontograph_types::{Category, Role, SearchQuery, SearchResponse, WorkType};
use tracing_subscriber::EnvFilter;

type PendingSearch = Arc<Mutex<Option<Result<SearchResponse, String>>>>;

struct ViewerApp {
    api: ApiClient,
    runtime: Arc<tokio::runtime::Runtime>,
    graph: OntologyGraphWidget,

    // Filter criteria
    category: Category,
    search: String,
    work_type: Option<WorkType>,
    role: Option<Role>,

    pending: Option<PendingSearch>,
    status: String,
    error: Option<String>,
}

impl ViewerApp {
    fn new(runtime: Arc<tokio::runtime::Runtime>, ctx: &egui::Context) -> Self {
        let mut app = Self {
            api: ApiClient::from_env(),
            runtime,
            graph: OntologyGraphWidget::with_settings(global_settings()),
            category: Category::Work,
            search: String::new(),
            work_type: None,
            role: None,
            pending: None,
            status: String::new(),
            error: None,
        };
        app.start_search(ctx);
        app
    }

    fn query(&self) -> SearchQuery {
        SearchQuery {
            category: self.category,
            search: self.search.trim().to_string(),
            work_type: self.work_type,
            role: self.role,
        }
    }

    // =========================================================================
    // API CALLS
    // =========================================================================

    /// Spawn a search; a newer search supersedes any still in flight
    fn start_search(&mut self, ctx: &egui::Context) {
        let query = self.query();
        tracing::info!("searching {:?}", query);

        let api = self.api.clone();
        let ctx = ctx.clone();
        let result: PendingSearch = Arc::new(Mutex::new(None));
        let result_clone = Arc::clone(&result);

        self.runtime.spawn(async move {
            let res = api.search(&query).await.map_err(|e| e.to_string());
            if let Ok(mut slot) = result_clone.lock() {
                *slot = Some(res);
            }
            ctx.request_repaint();
        });

        self.pending = Some(result);
        self.status = "Searching…".to_string();
    }

    fn poll_search(&mut self) {
        let Some(pending) = &self.pending else {
            return;
        };
        let result = match pending.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => Some(Err("search task panicked".to_string())),
        };
        let Some(result) = result else {
            return;
        };
        self.pending = None;

        match result {
            Ok(response) => {
                self.status = format!(
                    "{} persons, {} works",
                    response.persons.len(),
                    response.works.len()
                );
                self.error = None;
                self.graph.set_data(&response);
            }
            Err(e) => {
                tracing::warn!("search failed: {}", e);
                self.status = "Search failed".to_string();
                self.error = Some(e);
            }
        }
    }

    // =========================================================================
    // PANELS
    // =========================================================================

    /// Returns true when the criteria changed or a search was requested
    fn filter_panel(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            egui::ComboBox::from_label("Category")
                .selected_text(self.category.as_str())
                .show_ui(ui, |ui| {
                    for category in [Category::Work, Category::Person] {
                        changed |= ui
                            .selectable_value(&mut self.category, category, category.as_str())
                            .changed();
                    }
                });

            let edit = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("title, genre, theme, period or name")
                    .desired_width(220.0),
            );
            if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                changed = true;
            }

            egui::ComboBox::from_label("Type")
                .selected_text(self.work_type.map_or("Any", |t| t.as_str()))
                .show_ui(ui, |ui| {
                    changed |= ui.selectable_value(&mut self.work_type, None, "Any").changed();
                    for t in WorkType::all() {
                        changed |= ui
                            .selectable_value(&mut self.work_type, Some(*t), t.as_str())
                            .changed();
                    }
                });

            egui::ComboBox::from_label("Role")
                .selected_text(self.role.map_or("Any", |r| r.as_str()))
                .show_ui(ui, |ui| {
                    changed |= ui.selectable_value(&mut self.role, None, "Any").changed();
                    for r in Role::all() {
                        changed |= ui
                            .selectable_value(&mut self.role, Some(*r), r.as_str())
                            .changed();
                    }
                });

            if ui.button("Search").clicked() {
                changed = true;
            }

            ui.separator();
            if self.pending.is_some() {
                ui.spinner();
            }
            ui.label(self.status.as_str());
            if let Some(error) = &self.error {
                ui.colored_label(ui.visuals().error_fg_color, error.as_str());
            }
        });
        changed
    }

    fn details_panel(&mut self, ui: &mut egui::Ui) {
        match self.graph.selected_details() {
            Some(details) => {
                details.ui(ui);
                ui.add_space(8.0);
                if ui.button("Clear selection").clicked() {
                    self.graph.clear_selection();
                }
            }
            None => {
                ui.label(egui::RichText::new("Click a node to see its details").weak());
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_search();

        let mut search_requested = false;
        egui::TopBottomPanel::top("filters").show(ctx, |ui| {
            search_requested = self.filter_panel(ui);
        });
        if search_requested {
            self.start_search(ctx);
        }

        egui::SidePanel::right("details")
            .default_width(280.0)
            .min_width(220.0)
            .show(ctx, |ui| self.details_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| self.graph.ui(ui));
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ontograph_graph=info")),
        )
        .with_target(false)
        .init();

    let runtime = Arc::new(
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()?,
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Ontograph")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    tracing::info!("starting Ontograph viewer");
    eframe::run_native(
        "Ontograph",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(ViewerApp::new(runtime, &cc.egui_ctx)) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {}", e))
}
