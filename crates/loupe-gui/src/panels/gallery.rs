use loupe_core::events::ListenerKind;
use loupe_core::geometry::{GeometryBox, Size};
use loupe_core::lifecycle::ZoomEvent;

use crate::app::LoupeApp;

const MAX_THUMB_WIDTH: f32 = 440.0;
const MAX_THUMB_HEIGHT: f32 = 330.0;

/// Content region panel: renders the inline thumbnail and keeps the engine's
/// view of the region node in step with where the thumbnail actually is.
pub fn show(ctx: &egui::Context, app: &mut LoupeApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let rect = ui.available_rect_before_wrap();
        app.gallery_rect = rect;
        paint_background(ui, rect);

        let Some(texture) = app.thumb_texture.clone() else {
            show_placeholder(ui);
            app.machine.observe_region(&app.region);
            return;
        };

        let surface = app.machine.surface();

        ui.add_space(24.0);
        ui.vertical_centered(|ui| {
            ui.heading("Inline image");
            ui.add_space(8.0);

            let display = thumb_size(&texture);
            let (thumb_rect, response) = ui.allocate_exact_size(display, egui::Sense::click());

            if surface.content_visible {
                draw_thumb(ui, &texture, thumb_rect);
            } else {
                // The overlay owns the image while a session is running.
                ui.painter()
                    .rect_filled(thumb_rect, 4.0, egui::Color32::from_gray(36));
            }

            sync_region(app, &texture, thumb_rect);

            let response = response
                .on_hover_text(surface.label.as_str())
                .on_hover_cursor(egui::CursorIcon::ZoomIn);
            if response.clicked() && app.host.is_attached(ListenerKind::TargetClick) {
                app.machine.handle(ZoomEvent::TargetClicked);
            }

            if let Some(name) = app.image_path.as_ref().and_then(|p| p.file_name()) {
                ui.add_space(6.0);
                ui.small(name.to_string_lossy().to_string());
            }
        });
    });
}

/// Push the rendered thumbnail geometry into the region node, bumping its
/// revision only when something actually moved.
fn sync_region(app: &mut LoupeApp, texture: &egui::TextureHandle, rect: egui::Rect) {
    let [w, h] = texture.size();
    let natural = Size::new(w as f32, h as f32);
    let display = Size::new(rect.width(), rect.height());
    let bounds = GeometryBox::new(rect.left(), rect.top(), rect.width(), rect.height());

    let stale = app
        .region
        .get(0)
        .map(|node| node.natural != natural || node.display != display || node.bounds != bounds)
        .unwrap_or(false);
    if stale {
        app.region.update(0, |node| {
            node.natural = natural;
            node.display = display;
            node.bounds = bounds;
        });
    }
    app.machine.observe_region(&app.region);
}

fn thumb_size(texture: &egui::TextureHandle) -> egui::Vec2 {
    let [w, h] = texture.size();
    let (w, h) = (w as f32, h as f32);
    if w <= 0.0 || h <= 0.0 {
        return egui::vec2(MAX_THUMB_WIDTH, MAX_THUMB_HEIGHT);
    }
    // Fit inside the thumbnail box without upscaling small images.
    let scale = (MAX_THUMB_WIDTH / w).min(MAX_THUMB_HEIGHT / h).min(1.0);
    egui::vec2(w * scale, h * scale)
}

fn draw_thumb(ui: &egui::Ui, texture: &egui::TextureHandle, rect: egui::Rect) {
    ui.painter().image(
        texture.id(),
        rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(24));
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open an image to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}
