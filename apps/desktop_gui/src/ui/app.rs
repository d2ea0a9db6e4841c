use std::collections::HashMap;

use client_core::{DirectorySession, SessionPhase};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::error::FetchError;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::ui::cards::{grid_layout, show_user_card, PortraitState, PortraitView, GRID_GAP};

const ALL_COUNTRIES_LABEL: &str = "All Countries";

pub struct DirectoryApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    session: DirectorySession,
    query_input: String,
    portraits: HashMap<String, PortraitState>,

    status: String,
}

impl DirectoryApp {
    /// Builds the app and queues the session's single user load.
    pub fn bootstrap(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        let mut app = Self {
            cmd_tx,
            ui_rx,
            session: DirectorySession::new(),
            query_input: String::new(),
            portraits: HashMap::new(),
            status: "Starting".to_string(),
        };
        app.request_initial_load();
        app
    }

    fn request_initial_load(&mut self) {
        if !self.session.begin_load() {
            return;
        }
        if dispatch_backend_command(&self.cmd_tx, BackendCommand::LoadUsers, &mut self.status) {
            self.status = "Loading users".to_string();
        } else {
            let reason = self.status.clone();
            self.session.complete_load(Err(FetchError::Transport(reason)));
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Info(message) => {
                    self.status = message;
                }
                UiEvent::UsersLoaded(outcome) => {
                    self.status = match &outcome {
                        Ok(directory) => format!("Loaded {} users", directory.users.len()),
                        Err(err) => format!("Load failed: {err}"),
                    };
                    self.session.complete_load(outcome);
                }
                UiEvent::PortraitLoaded { url, image } => {
                    self.portraits.insert(url, PortraitState::Decoded(image));
                }
                UiEvent::PortraitFailed { url, reason } => {
                    tracing::debug!(%url, "portrait unavailable: {reason}");
                    self.portraits.insert(url, PortraitState::Failed(reason));
                }
            }
        }
    }

    fn portrait_view(&mut self, ctx: &egui::Context, url: &str) -> PortraitView<'_> {
        if url.trim().is_empty() {
            return PortraitView::Missing;
        }

        if !self.portraits.contains_key(url) {
            let queued = dispatch_backend_command(
                &self.cmd_tx,
                BackendCommand::FetchPortrait {
                    url: url.to_string(),
                },
                &mut self.status,
            );
            let state = if queued {
                PortraitState::Requested
            } else {
                PortraitState::Failed("portrait request not queued".to_string())
            };
            self.portraits.insert(url.to_string(), state);
        }

        let Some(state) = self.portraits.get_mut(url) else {
            return PortraitView::Missing;
        };
        if let PortraitState::Decoded(image) = state {
            let color_image =
                egui::ColorImage::from_rgba_unmultiplied([image.width, image.height], &image.rgba);
            let texture =
                ctx.load_texture(format!("portrait:{url}"), color_image, egui::TextureOptions::LINEAR);
            *state = PortraitState::Ready(texture);
        }

        match state {
            PortraitState::Requested => PortraitView::Pending,
            PortraitState::Ready(texture) => PortraitView::Texture(texture),
            PortraitState::Decoded(_) | PortraitState::Failed(_) => PortraitView::Missing,
        }
    }

    fn show_loading(&self, ui: &mut egui::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.add(egui::Spinner::new().size(32.0));
            ui.label("Loading users...");
        });
    }

    fn show_error(&self, ui: &mut egui::Ui) {
        let message = self
            .session
            .error()
            .unwrap_or(shared::error::FETCH_FAILED_MESSAGE);
        ui.colored_label(egui::Color32::from_rgb(200, 40, 40), message);
    }

    fn show_filters(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing = egui::vec2(16.0, 8.0);
            let field_width = ((ui.available_width() - 16.0) / 2.0).max(200.0);

            let search = egui::TextEdit::singleline(&mut self.query_input)
                .id_salt("name_search")
                .hint_text("Search by full name");
            if ui.add_sized([field_width, 34.0], search).changed() {
                self.session.set_query(self.query_input.clone());
            }

            let mut selected = self.session.filter().country.clone();
            let selected_text = if selected.is_empty() {
                ALL_COUNTRIES_LABEL.to_string()
            } else {
                selected.clone()
            };
            egui::ComboBox::from_id_salt("country_filter")
                .selected_text(selected_text)
                .width(field_width)
                .show_ui(ui, |ui| {
                    ui.selectable_value(&mut selected, String::new(), ALL_COUNTRIES_LABEL);
                    for country in self.session.countries() {
                        ui.selectable_value(&mut selected, country.clone(), country.as_str());
                    }
                });
            if selected != self.session.filter().country {
                self.session.set_country(selected);
            }
        });
    }

    fn show_grid(&mut self, ui: &mut egui::Ui) {
        let visible = self.session.visible_indices().to_vec();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if visible.is_empty() {
                    ui.weak("No users match the current filters.");
                    return;
                }

                let (columns, card_width) = grid_layout(ui.available_width());
                for row in visible.chunks(columns) {
                    ui.horizontal_top(|ui| {
                        ui.spacing_mut().item_spacing.x = GRID_GAP;
                        for index in row {
                            let user = self.session.users()[*index].clone();
                            let portrait = self.portrait_view(ui.ctx(), &user.portrait_url);
                            show_user_card(ui, &user, card_width, portrait);
                        }
                    });
                    ui.add_space(GRID_GAP);
                }
            });
    }

    fn show_directory(&mut self, ui: &mut egui::Ui) {
        ui.heading(egui::RichText::new("User Directory").size(28.0).strong());
        ui.add_space(12.0);
        self.show_filters(ui);
        ui.add_space(20.0);
        self.show_grid(ui);
    }

    fn has_pending_work(&self) -> bool {
        self.session.is_loading()
            || self
                .portraits
                .values()
                .any(|state| matches!(state, PortraitState::Requested | PortraitState::Decoded(_)))
    }
}

impl eframe::App for DirectoryApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::central_panel(&ctx.style()).inner_margin(egui::Margin::same(20)))
            .show(ctx, |ui| match self.session.phase() {
                SessionPhase::Loading => self.show_loading(ui),
                SessionPhase::Errored => self.show_error(ui),
                SessionPhase::Ready => self.show_directory(ui),
            });

        if self.has_pending_work() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(250));
        }
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
