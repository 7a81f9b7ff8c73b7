use loupe_core::lifecycle::ZoomEvent;

use crate::app::LoupeApp;

/// Modal surface: dimmed backdrop, the animated enlarged image, and the
/// close control. Stays mounted from overlay open through the end of the
/// shrink animation so the image has somewhere to animate back to.
pub fn show(ctx: &egui::Context, app: &mut LoupeApp) {
    if !app.overlay_open {
        return;
    }

    let surface = app.machine.surface();
    let screen = ctx.screen_rect();

    egui::Area::new(egui::Id::new("zoom_overlay"))
        .order(egui::Order::Foreground)
        .fixed_pos(screen.min)
        .show(ctx, |ui| {
            // The backdrop dims only while the overlay is visible proper;
            // during the shrink phase only the image is painted.
            if surface.overlay_visible {
                ui.painter()
                    .rect_filled(screen, 0.0, egui::Color32::from_black_alpha(170));
            }

            let response = ui.allocate_rect(screen, egui::Sense::click());

            if let Some(b) = app.overlay_box() {
                let image_rect = egui::Rect::from_min_size(
                    egui::pos2(b.left, b.top),
                    egui::vec2(b.width, b.height),
                );
                if let Some(texture) = overlay_texture(app) {
                    ui.painter().image(
                        texture.id(),
                        image_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                }
            }

            // Any click on the modal surface is a close request.
            if response.clicked() {
                app.machine.handle(ZoomEvent::CloseRequested);
            }

            if surface.overlay_visible {
                let button_rect = egui::Rect::from_min_size(
                    egui::pos2(screen.right() - 150.0, screen.top() + 12.0),
                    egui::vec2(138.0, 26.0),
                );
                if ui
                    .put(button_rect, egui::Button::new(surface.label.as_str()))
                    .clicked()
                {
                    app.machine.handle(ZoomEvent::CloseRequested);
                }
            }
        });
}

/// The enlarged view prefers the decoded replacement, degrading to the
/// inline texture until (or unless) it is ready.
fn overlay_texture(app: &LoupeApp) -> Option<&egui::TextureHandle> {
    if app.machine.assets().replacement_ready() {
        if let Some(texture) = app.full_texture.as_ref() {
            return Some(texture);
        }
    }
    app.thumb_texture.as_ref()
}
