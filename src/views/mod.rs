//! Dashboard views
//!
//! Each view owns its fetches, its widget state and its error slot. The app
//! mounts one view at a time: mounting resets the view and fetches once.
//!
//! # EGUI-RULES Compliance
//! - No callbacks - `ui()` returns the selection for the app to show
//! - Trees and layouts are rebuilt in `poll()` when data lands, never in `ui()`
//! - Widget data is never mutated while a frame is being laid out

mod change_couplings;
mod commit_spread;
mod coupling_structure;
mod developer_structure;
mod hotspot_structure;
mod hotspots;
mod main_developer;
mod modules;
mod sum_of_couplings;

pub use change_couplings::ChangeCouplingsView;
pub use commit_spread::CommitSpreadView;
pub use coupling_structure::CouplingStructureView;
pub use developer_structure::DeveloperStructureView;
pub use hotspot_structure::{HotspotAnalysis, HotspotStructureView};
pub use hotspots::HotspotsView;
pub use main_developer::MainDeveloperView;
pub use modules::ModulesView;
pub use sum_of_couplings::SumOfCouplingsView;

use egui::{Color32, RichText, Ui};
use gitrends_graph::{Table, TableError, TableWidget};
use gitrends_types::EntryType;
use tracing::warn;

use crate::api::ApiClient;
use crate::config::AppConfig;

/// What a view needs from the app to fetch and render
pub struct ViewContext<'a> {
    pub api: &'a ApiClient,
    pub runtime: &'a tokio::runtime::Runtime,
    pub config: &'a AppConfig,
}

/// The file or module shown in the detail window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub entry_type: EntryType,
    pub name: String,
}

impl Selection {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            entry_type: EntryType::File,
            name: name.into(),
        }
    }

    pub fn module(name: impl Into<String>) -> Self {
        Self {
            entry_type: EntryType::Module,
            name: name.into(),
        }
    }

    pub fn of(entry_type: EntryType, name: impl Into<String>) -> Self {
        Self {
            entry_type,
            name: name.into(),
        }
    }
}

pub trait View {
    fn kind(&self) -> ViewKind;

    /// Issue the view's requests; called once per mount
    fn fetch(&mut self, cx: &ViewContext<'_>);

    /// Take arrived responses and rebuild widget data
    fn poll(&mut self, cx: &ViewContext<'_>);

    /// Drop data and outstanding requests
    fn reset(&mut self);

    fn is_loading(&self) -> bool;

    fn ui(&mut self, ui: &mut Ui, cx: &ViewContext<'_>) -> Option<Selection>;
}

// =============================================================================
// VIEW KINDS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ViewKind {
    #[default]
    HotspotStructure,
    MainDeveloperStructure,
    ChangeCouplingStructure,
    CommitSpread,
    Modules,
    MainDeveloper,
    ChangeCouplings,
    SumOfCouplings,
    Hotspots,
}

impl ViewKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ViewKind::HotspotStructure => "Hotspots structure",
            ViewKind::MainDeveloperStructure => "Main developer structure",
            ViewKind::ChangeCouplingStructure => "Change coupling structure",
            ViewKind::CommitSpread => "Commit spread",
            ViewKind::Modules => "Modules",
            ViewKind::MainDeveloper => "Main developer",
            ViewKind::ChangeCouplings => "Change couplings",
            ViewKind::SumOfCouplings => "Sum of couplings",
            ViewKind::Hotspots => "Hotspots",
        }
    }

    pub fn all() -> &'static [ViewKind] {
        &[
            ViewKind::HotspotStructure,
            ViewKind::MainDeveloperStructure,
            ViewKind::ChangeCouplingStructure,
            ViewKind::CommitSpread,
            ViewKind::Modules,
            ViewKind::MainDeveloper,
            ViewKind::ChangeCouplings,
            ViewKind::SumOfCouplings,
            ViewKind::Hotspots,
        ]
    }

    pub fn create(self) -> Box<dyn View> {
        match self {
            ViewKind::HotspotStructure => Box::new(HotspotStructureView::new()),
            ViewKind::MainDeveloperStructure => Box::new(DeveloperStructureView::new()),
            ViewKind::ChangeCouplingStructure => Box::new(CouplingStructureView::new()),
            ViewKind::CommitSpread => Box::new(CommitSpreadView::new()),
            ViewKind::Modules => Box::new(ModulesView::new()),
            ViewKind::MainDeveloper => Box::new(MainDeveloperView::new()),
            ViewKind::ChangeCouplings => Box::new(ChangeCouplingsView::new()),
            ViewKind::SumOfCouplings => Box::new(SumOfCouplingsView::new()),
            ViewKind::Hotspots => Box::new(HotspotsView::new()),
        }
    }
}

// =============================================================================
// SHARED UI PIECES
// =============================================================================

/// Heading row with a spinner while loading
pub(crate) fn header_ui(ui: &mut Ui, title: &str, loading: bool) {
    ui.horizontal(|ui| {
        ui.heading(title);
        if loading {
            ui.spinner();
        }
    });
}

pub(crate) fn error_ui(ui: &mut Ui, error: &Option<String>) {
    if let Some(err) = error {
        ui.colored_label(Color32::RED, err);
        ui.separator();
    }
}

/// File / Module switch; returns true when the selection changed
pub(crate) fn entry_type_switch(ui: &mut Ui, current: &mut EntryType) -> bool {
    let mut changed = false;
    ui.horizontal(|ui| {
        for entry_type in EntryType::all() {
            if ui
                .selectable_label(*current == *entry_type, entry_type.display_name())
                .clicked()
                && *current != *entry_type
            {
                *current = *entry_type;
                changed = true;
            }
        }
    });
    changed
}

/// Wrap a freshly built table, recording a setup error in the view's slot
pub(crate) fn table_widget<R>(
    id: &str,
    table: Result<Table<R>, TableError>,
    error: &mut Option<String>,
) -> Option<TableWidget<R>> {
    match table {
        Ok(table) => Some(TableWidget::new(id, table)),
        Err(err) => {
            warn!(%err, table = id, "table setup failed");
            *error = Some(format!("Table setup failed: {}", err));
            None
        }
    }
}

pub(crate) fn caption(ui: &mut Ui, text: &str) {
    ui.label(RichText::new(text).size(11.0).color(Color32::GRAY));
}
