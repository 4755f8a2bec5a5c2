//! gitrends dashboard application
//!
//! Layout:
//! ┌──────────────┬──────────────────────────────┐
//! │  Views (L)   │  Active view (center)        │
//! │              │                              │
//! │              │          ┌───────────────┐   │
//! │              │          │ Detail window │   │
//! │              │          └───────────────┘   │
//! └──────────────┴──────────────────────────────┘

use std::sync::Arc;

use eframe::egui;
use egui::{Color32, RichText};
use tracing::{error, info};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::detail::DetailWindow;
use crate::views::{Selection, View, ViewContext, ViewKind};

/// Main application state
pub struct GitrendsApp {
    api: Option<ApiClient>,
    config: AppConfig,

    // Active view, mounted on navigation
    view: Box<dyn View>,

    // Selection shown by the detail window
    selection: Option<Selection>,
    detail: DetailWindow,

    // Startup error (bad base URL)
    error: Option<String>,

    runtime: Arc<tokio::runtime::Runtime>,
}

impl GitrendsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, runtime: Arc<tokio::runtime::Runtime>) -> Self {
        let (api, error) = match ApiClient::new(&config.base_url) {
            Ok(api) => (Some(api), None),
            Err(err) => {
                error!(%err, "API client unavailable");
                (None, Some(err.to_string()))
            }
        };

        let mut app = Self {
            api,
            config,
            view: ViewKind::default().create(),
            selection: None,
            detail: DetailWindow::new(),
            error,
            runtime,
        };
        app.mount(ViewKind::default());
        app
    }

    /// Replace the active view and fetch its data once
    fn mount(&mut self, kind: ViewKind) {
        info!(view = kind.display_name(), "mounting view");
        self.view.reset();
        self.view = kind.create();
        self.selection = None;
        self.detail.clear();

        let Some(api) = self.api.as_ref() else {
            return;
        };
        let cx = ViewContext {
            api,
            runtime: &self.runtime,
            config: &self.config,
        };
        self.view.fetch(&cx);
    }

    fn nav_ui(&mut self, ui: &mut egui::Ui) -> Option<ViewKind> {
        let mut clicked = None;
        let current = self.view.kind();
        ui.heading("gitrends");
        ui.separator();
        for kind in ViewKind::all() {
            if ui
                .selectable_label(current == *kind, kind.display_name())
                .clicked()
                && current != *kind
            {
                clicked = Some(*kind);
            }
        }
        ui.separator();
        ui.label(RichText::new(&self.config.base_url).size(10.0).color(Color32::GRAY));
        clicked
    }
}

impl eframe::App for GitrendsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // =====================================================================
        // LEFT PANEL - View navigation
        // =====================================================================
        let mut navigate = None;
        egui::SidePanel::left("views")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                navigate = self.nav_ui(ui);
            });
        if let Some(kind) = navigate {
            self.mount(kind);
        }

        let Some(api) = self.api.as_ref() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                if let Some(ref err) = self.error {
                    ui.colored_label(Color32::RED, err);
                }
            });
            return;
        };
        let cx = ViewContext {
            api,
            runtime: &self.runtime,
            config: &self.config,
        };

        self.view.poll(&cx);
        self.detail.poll();

        // Request repaint if async operations pending
        if self.view.is_loading() || self.detail.is_loading() {
            ctx.request_repaint();
        }

        // =====================================================================
        // CENTRAL PANEL - Active view
        // =====================================================================
        let view = &mut self.view;
        let picked = egui::CentralPanel::default()
            .show(ctx, |ui| view.ui(ui, &cx))
            .inner;
        if picked.is_some() {
            self.selection = picked;
        }

        self.detail.sync(self.selection.as_ref(), &cx);
        self.detail.ui(ctx, &mut self.selection);
    }
}
