mod app;
mod host;
mod messages;
mod panels;
mod settings;
mod transition;
mod worker;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("Loupe"),
        ..Default::default()
    };

    eframe::run_native(
        "Loupe",
        options,
        Box::new(|cc| Ok(Box::new(app::LoupeApp::new(&cc.egui_ctx)))),
    )
}
