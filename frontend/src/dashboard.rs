//! Read-only dashboard shown once the session is established.

use egui::{CentralPanel, Context, Grid, RichText, ScrollArea, TopBottomPanel};
use hearth_types::{ConfigResponse, EntityState};

use crate::actions::AuthActions;

/// Data loaded from the server right after login.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub config: ConfigResponse,
    /// Entity states sorted by entity id
    pub states: Vec<EntityState>,
}

impl DashboardData {
    pub fn new(config: ConfigResponse, mut states: Vec<EntityState>) -> Self {
        states.sort_by(|a, b| a.entity_id.cmp(&b.entity_id));
        Self { config, states }
    }
}

/// Render the dashboard.
pub fn show(ctx: &Context, data: &DashboardData, actions: &dyn AuthActions) {
    TopBottomPanel::top("dashboard_toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading(&data.config.location_name);
            ui.label(format!("v{}", data.config.version));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Log out").clicked() {
                    actions.log_out();
                }
            });
        });
    });

    CentralPanel::default().show(ctx, |ui| {
        if data.states.is_empty() {
            ui.label("No entities reported by the server.");
            return;
        }

        ScrollArea::vertical().show(ui, |ui| {
            Grid::new("entity_states")
                .striped(true)
                .num_columns(3)
                .show(ui, |ui| {
                    ui.label(RichText::new("Entity").strong());
                    ui.label(RichText::new("Name").strong());
                    ui.label(RichText::new("State").strong());
                    ui.end_row();

                    let mut domain = None;
                    for entity in &data.states {
                        if domain != Some(entity.domain()) {
                            domain = Some(entity.domain());
                            ui.label(RichText::new(entity.domain()).italics());
                            ui.end_row();
                        }
                        ui.monospace(&entity.entity_id);
                        ui.label(entity.friendly_name());
                        ui.label(&entity.state);
                        ui.end_row();
                    }
                });
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(id: &str, state: &str) -> EntityState {
        EntityState {
            entity_id: id.to_string(),
            state: state.to_string(),
            attributes: Default::default(),
            last_changed: String::new(),
        }
    }

    #[test]
    fn test_states_sorted_by_entity_id() {
        let data = DashboardData::new(
            ConfigResponse {
                location_name: "Home".to_string(),
                version: "0.1.0".to_string(),
                components: vec![],
            },
            vec![entity("switch.porch", "off"), entity("light.kitchen", "on")],
        );

        let ids: Vec<_> = data.states.iter().map(|s| s.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["light.kitchen", "switch.porch"]);
    }

    #[test]
    fn test_render_grouped_by_domain() {
        struct NoActions;
        impl AuthActions for NoActions {
            fn validate_credential(&self, _value: String) {}
            fn log_out(&self) {}
        }

        let data = DashboardData::new(
            ConfigResponse {
                location_name: "Home".to_string(),
                version: "0.1.0".to_string(),
                components: vec![],
            },
            vec![
                entity("light.porch", "off"),
                entity("switch.fan", "on"),
                entity("light.kitchen", "on"),
            ],
        );
        let domains: Vec<_> = data.states.iter().map(|s| s.domain()).collect();
        assert_eq!(domains, vec!["light", "light", "switch"]);

        let ctx = Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| show(ctx, &data, &NoActions));
    }
}
