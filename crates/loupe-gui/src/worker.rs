use std::path::Path;
use std::sync::mpsc;

use loupe_core::assets::AssetSlot;
use tracing::debug;

use crate::messages::{WorkerCommand, WorkerResult};

/// Spawn the decode worker thread. Returns the command sender.
pub fn spawn_worker(
    result_tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) -> mpsc::Sender<WorkerCommand> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();

    std::thread::Builder::new()
        .name("loupe-decoder".into())
        .spawn(move || {
            worker_loop(cmd_rx, result_tx, ctx);
        })
        .expect("Failed to spawn decode worker thread");

    cmd_tx
}

fn send(tx: &mpsc::Sender<WorkerResult>, ctx: &egui::Context, result: WorkerResult) {
    let _ = tx.send(result);
    ctx.request_repaint();
}

fn worker_loop(
    cmd_rx: mpsc::Receiver<WorkerCommand>,
    tx: mpsc::Sender<WorkerResult>,
    ctx: egui::Context,
) {
    while let Ok(cmd) = cmd_rx.recv() {
        match cmd {
            WorkerCommand::Decode { slot, source } => {
                handle_decode(slot, &source, &tx, &ctx);
            }
        }
    }
}

fn handle_decode(
    slot: AssetSlot,
    source: &str,
    tx: &mpsc::Sender<WorkerResult>,
    ctx: &egui::Context,
) {
    debug!(?slot, source, "decoding probe");
    match image::open(Path::new(source)) {
        Ok(decoded) => {
            let rgba = decoded.to_rgba8();
            let (width, height) = rgba.dimensions();
            send(tx, ctx, WorkerResult::DecodeComplete {
                slot,
                source: source.to_string(),
                size: [width as usize, height as usize],
                pixels: rgba.into_raw(),
            });
        }
        Err(e) => {
            send(tx, ctx, WorkerResult::DecodeFailed {
                slot,
                source: source.to_string(),
                message: e.to_string(),
            });
        }
    }
}
