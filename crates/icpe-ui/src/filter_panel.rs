//! Filter panel: one combo box per filter, search, reset and budget controls

use egui::{ComboBox, Key, RichText, ScrollArea, Ui};
use icpe_data::FilterCatalog;
use icpe_views::RenderSummary;

use crate::widget_utils::widget_id;

/// A user interaction to apply to the map session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelAction {
    OptionSelected { key: String, value: String },
    SearchSubmitted(String),
    Reset,
    IncreaseBudget,
}

/// Filter panel state kept between frames
///
/// Chosen filter values are not stored here; each frame reads them from
/// the session.
#[derive(Debug, Default)]
pub struct FilterPanel {
    search_input: String,
}

impl FilterPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the typed search text
    pub fn clear(&mut self) {
        self.search_input.clear();
    }

    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Draw the panel and collect this frame's interactions
    ///
    /// `selected` yields the session's current value for a filter key.
    pub fn ui(
        &mut self,
        ui: &mut Ui,
        catalog: &FilterCatalog,
        selected: impl Fn(&str) -> String,
        status: Option<&RenderSummary>,
    ) -> Vec<PanelAction> {
        let mut actions = Vec::new();

        ui.heading("Installations classées");
        ui.separator();

        ui.label("Recherche");
        ui.horizontal(|ui| {
            let response = ui.text_edit_singleline(&mut self.search_input);
            let entered = response.lost_focus() && ui.input(|i| i.key_pressed(Key::Enter));
            if entered || ui.button("Rechercher").clicked() {
                actions.push(PanelAction::SearchSubmitted(self.search_input.clone()));
            }
        });
        ui.separator();

        ScrollArea::vertical()
            .id_source("filter_panel_scroll")
            .max_height((ui.available_height() - 90.0).max(100.0))
            .show(ui, |ui| {
                for definition in catalog.iter() {
                    let before = selected(&definition.key);
                    let mut current = before.clone();

                    ui.label(definition.label.as_str());
                    ComboBox::from_id_source(widget_id("filter", &definition.key))
                        .selected_text(option_text(current.as_str()))
                        .width(ui.available_width())
                        .show_ui(ui, |ui| {
                            for option in &definition.options {
                                ui.selectable_value(&mut current, option.clone(), option_text(option));
                            }
                        });

                    if current != before {
                        tracing::debug!("Filter {} set to {:?}", definition.key, current);
                        actions.push(PanelAction::OptionSelected {
                            key: definition.key.clone(),
                            value: current,
                        });
                    }
                }
            });
        ui.separator();

        if ui.button("Réinitialiser").clicked() {
            self.clear();
            actions.push(PanelAction::Reset);
        }

        if let Some(summary) = status {
            ui.label(summary.status_message());
            if summary.truncated {
                ui.label(RichText::new("Zoomez sur la carte pour affiner la sélection").italics());
                if ui.button("Afficher plus d'installations").clicked() {
                    actions.push(PanelAction::IncreaseBudget);
                }
            }
        }

        actions
    }
}

/// Display text of an option; "" is the no-filter choice
fn option_text(option: &str) -> String {
    if option.is_empty() {
        "(toutes)".to_string()
    } else {
        option.to_string()
    }
}
