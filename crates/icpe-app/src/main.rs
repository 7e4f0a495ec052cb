//! ICPE facility map entry point

use std::path::Path;
use eframe::egui;
use anyhow::Result;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use icpe_core::Settings;
use icpe_data::{source_from_settings, DatasetSource, RecordStore};
use icpe_ui::{apply_theme, FilterPanel, PanelAction, Theme};
use icpe_views::{MapSession, MapView, RenderSummary};

/// Where the records came from, shown under the filters
struct DatasetInfo {
    source_name: String,
    record_count: usize,
    skipped_features: usize,
}

/// Main application state
struct IcpeMapApp {
    /// Records, filter inputs and the map surface
    session: MapSession<MapView>,

    /// Filter panel widgets
    panel: FilterPanel,

    /// Result of the latest render
    status: Option<RenderSummary>,

    dataset: DatasetInfo,
}

impl IcpeMapApp {
    fn new(cc: &eframe::CreationContext<'_>, mut session: MapSession<MapView>, dataset: DatasetInfo) -> Self {
        apply_theme(&cc.egui_ctx, &Theme::default());
        let status = Some(session.refresh());

        Self {
            session,
            panel: FilterPanel::new(),
            status,
            dataset,
        }
    }

    fn apply(&mut self, action: PanelAction) {
        let summary = match action {
            PanelAction::OptionSelected { key, value } => self.session.select_option(&key, &value),
            PanelAction::SearchSubmitted(text) => Some(self.session.submit_search(&text)),
            PanelAction::Reset => Some(self.session.reset()),
            PanelAction::IncreaseBudget => Some(self.session.increase_budget()),
        };
        if summary.is_some() {
            self.status = summary;
        }
    }
}

impl eframe::App for IcpeMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let actions = egui::SidePanel::left("filters")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| {
                let session = &self.session;
                let actions = self.panel.ui(
                    ui,
                    session.catalog(),
                    |key| session.selected(key).to_string(),
                    self.status.as_ref(),
                );
                ui.small(format!(
                    "{} installations chargées depuis {}",
                    self.dataset.record_count, self.dataset.source_name
                ));
                if self.dataset.skipped_features > 0 {
                    ui.small(format!("{} entrées sans position ignorées", self.dataset.skipped_features));
                }
                actions
            })
            .inner;

        for action in actions {
            self.apply(action);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if self.session.map_mut().show(ui).viewport_changed {
                    self.status = Some(self.session.viewport_changed());
                }
            });
    }
}

/// Fetch the dataset; any failure aborts startup
fn load_dataset(settings: &Settings) -> Result<(RecordStore, DatasetInfo)> {
    let runtime = tokio::runtime::Runtime::new()?;
    let source = source_from_settings(settings);

    let store = runtime
        .block_on(RecordStore::load(&source, settings.shuffle_seed))
        .map_err(|e| {
            error!("Failed to load dataset from {}: {}", source.source_name(), e);
            e
        })?;

    let info = DatasetInfo {
        source_name: source.source_name().to_string(),
        record_count: store.len(),
        skipped_features: store.skipped_features(),
    };
    Ok((store, info))
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting ICPE map");

    let settings = Settings::load_or_default(Path::new(Settings::FILE_NAME))?;
    let (store, dataset) = load_dataset(&settings)?;
    let session = MapSession::new(store, settings, MapView::default());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Carte des ICPE",
        options,
        Box::new(move |cc| {
            Box::new(IcpeMapApp::new(cc, session, dataset))
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
