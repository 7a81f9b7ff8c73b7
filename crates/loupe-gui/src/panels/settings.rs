use std::path::Path;
use std::sync::atomic::Ordering;

use loupe_core::lifecycle::{LifecycleState, ZoomEvent};

use crate::app::LoupeApp;
use crate::settings::{DemoSettings, SettingsState};

const LEFT_PANEL_WIDTH: f32 = 280.0;
const SETTINGS_FILE: &str = "loupe-settings.toml";

pub fn show(ctx: &egui::Context, app: &mut LoupeApp) {
    egui::SidePanel::left("settings")
        .default_width(LEFT_PANEL_WIDTH)
        .resizable(true)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.set_min_width(LEFT_PANEL_WIDTH - 20.0);

                file_section(ui, app);
                ui.separator();
                zoom_section(ui, app);
                ui.separator();
                state_section(ui, app);
                ui.separator();
                persistence_section(ui, app);

                if let Some(ref status) = app.status {
                    ui.add_space(4.0);
                    ui.small(status.as_str());
                }
            });
        });
}

fn file_section(ui: &mut egui::Ui, app: &mut LoupeApp) {
    super::section_header(ui, "Image", None);
    ui.add_space(4.0);

    if ui.button("Open...").clicked() {
        let picked_tx = app.picked_tx.clone();
        let ctx = ui.ctx().clone();
        std::thread::spawn(move || {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Images", &["png", "jpg", "jpeg", "webp", "bmp", "gif", "tiff"])
                .add_filter("All files", &["*"])
                .pick_file()
            {
                let _ = picked_tx.send(path);
                ctx.request_repaint();
            }
        });
    }

    if let Some(ref path) = app.image_path {
        ui.label(
            path.file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
        );
    }
    if let Some(ref texture) = app.thumb_texture {
        let [w, h] = texture.size();
        ui.small(format!("{w}x{h}"));
    }
}

fn zoom_section(ui: &mut egui::Ui, app: &mut LoupeApp) {
    let busy = app.machine.state() != LifecycleState::Unloaded;
    super::section_header(ui, "Zoom", busy.then_some("applies after close"));
    ui.add_space(4.0);

    ui.add(egui::Slider::new(&mut app.settings.margin, 0.0..=120.0).text("Margin (px)"));
    ui.checkbox(&mut app.settings.use_replacement, "Full-resolution replacement");

    ui.add_space(4.0);
    ui.label("Expand label");
    ui.text_edit_singleline(&mut app.settings.label_zoom_in);
    ui.label("Minimize label");
    ui.text_edit_singleline(&mut app.settings.label_zoom_out);
}

fn state_section(ui: &mut egui::Ui, app: &mut LoupeApp) {
    super::section_header(ui, "State", None);
    ui.add_space(4.0);

    let surface = app.machine.surface();
    ui.small(format!("Lifecycle: {:?}", surface.state));
    ui.small(format!(
        "Replacement ready: {}",
        app.machine.assets().replacement_ready()
    ));
    if surface.refresh_serial > 0 {
        ui.small(format!("Geometry refreshes: {}", surface.refresh_serial));
    }

    // Drive the machine through the external boolean, the way a host
    // application owning the zoom state would.
    let mut zoomed = app.zoomed.load(Ordering::Relaxed);
    if ui.checkbox(&mut zoomed, "Zoom request").changed() {
        app.zoomed.store(zoomed, Ordering::Relaxed);
        app.machine.handle(ZoomEvent::SetZoomed(zoomed));
    }
}

fn persistence_section(ui: &mut egui::Ui, app: &mut LoupeApp) {
    super::section_header(ui, "Settings", None);
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        if ui.button("Save").clicked() {
            let settings = DemoSettings {
                config: app.settings.to_zoom_config(app.image_path.as_deref()),
                image_path: app.image_path.clone(),
            };
            app.status = Some(match settings.save(Path::new(SETTINGS_FILE)) {
                Ok(()) => format!("Saved {SETTINGS_FILE}"),
                Err(e) => format!("Save failed: {e:#}"),
            });
        }
        if ui.button("Load").clicked() {
            match DemoSettings::load(Path::new(SETTINGS_FILE)) {
                Ok(loaded) => {
                    app.settings = SettingsState::from_zoom_config(&loaded.config);
                    if let Some(path) = loaded.image_path {
                        app.open_image(path);
                    }
                    app.status = Some(format!("Loaded {SETTINGS_FILE}"));
                }
                Err(e) => app.status = Some(format!("Load failed: {e:#}")),
            }
        }
    });
    ui.small(SETTINGS_FILE);
}
