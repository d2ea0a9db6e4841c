//! User card rendering, portrait decoding, and the responsive grid math.

use eframe::egui;
use egui::TextureHandle;
use shared::domain::UserRecord;

pub const CARD_MIN_WIDTH: f32 = 250.0;
pub const GRID_GAP: f32 = 20.0;
const CARD_PADDING: i8 = 20;
const PORTRAIT_SIZE: f32 = 100.0;
/// Decoded portraits are capped at twice the display size for HiDPI.
const PORTRAIT_DECODE_MAX: u32 = 200;

#[derive(Debug, Clone)]
pub struct PortraitImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

pub enum PortraitState {
    Requested,
    Decoded(PortraitImage),
    Ready(TextureHandle),
    Failed(String),
}

pub enum PortraitView<'a> {
    Texture(&'a TextureHandle),
    Pending,
    Missing,
}

pub fn decode_portrait(bytes: &[u8]) -> Result<PortraitImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = dynamic
        .thumbnail(PORTRAIT_DECODE_MAX, PORTRAIT_DECODE_MAX)
        .to_rgba8();
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PortraitImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}

/// Column count and card width for `available` points, filling the row the
/// way an auto-fill grid with a 250pt minimum track does.
pub fn grid_layout(available: f32) -> (usize, f32) {
    let columns = ((available + GRID_GAP) / (CARD_MIN_WIDTH + GRID_GAP))
        .floor()
        .max(1.0) as usize;
    let gaps = GRID_GAP * (columns as f32 - 1.0);
    let card_width = ((available - gaps) / columns as f32).max(CARD_MIN_WIDTH);
    (columns, card_width)
}

pub fn initials(user: &UserRecord) -> String {
    [&user.first_name, &user.last_name]
        .iter()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn show_user_card(
    ui: &mut egui::Ui,
    user: &UserRecord,
    card_width: f32,
    portrait: PortraitView<'_>,
) {
    let inner_width = card_width - 2.0 * CARD_PADDING as f32 - 2.0;
    egui::Frame::new()
        .fill(egui::Color32::WHITE)
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_gray(204)))
        .corner_radius(10.0)
        .inner_margin(egui::Margin::same(CARD_PADDING))
        .shadow(egui::Shadow {
            offset: [0, 2],
            blur: 8,
            spread: 0,
            color: egui::Color32::from_black_alpha(26),
        })
        .show(ui, |ui| {
            ui.set_width(inner_width);
            ui.vertical_centered(|ui| {
                show_portrait(ui, user, portrait);
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new(user.full_name())
                        .strong()
                        .size(18.0)
                        .color(egui::Color32::from_gray(30)),
                );
                ui.label(egui::RichText::new(&user.email).color(egui::Color32::from_gray(70)));
                ui.label(
                    egui::RichText::new(&user.country)
                        .strong()
                        .color(egui::Color32::from_gray(30)),
                );
            });
        });
}

fn show_portrait(ui: &mut egui::Ui, user: &UserRecord, portrait: PortraitView<'_>) {
    let size = egui::vec2(PORTRAIT_SIZE, PORTRAIT_SIZE);
    match portrait {
        PortraitView::Texture(texture) => {
            ui.add(
                egui::Image::new(texture)
                    .fit_to_exact_size(size)
                    .corner_radius(PORTRAIT_SIZE / 2.0),
            );
        }
        PortraitView::Pending => {
            ui.add_sized(size, egui::Spinner::new());
        }
        PortraitView::Missing => {
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            let painter = ui.painter();
            painter.circle_filled(rect.center(), PORTRAIT_SIZE / 2.0, egui::Color32::from_gray(225));
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                initials(user),
                egui::FontId::proportional(30.0),
                egui::Color32::from_gray(110),
            );
        }
    }
}
