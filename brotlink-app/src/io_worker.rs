use std::path::{Path, PathBuf};
use std::sync::mpsc;

use tracing::{debug, error, info, warn};

use crate::frames::decode_data_uri;

/// Request sent from the presenter to the I/O worker.
pub(crate) enum IoRequest {
    /// Decode `data_uri` and write the image to `path`, creating parent dirs.
    SaveImage { path: PathBuf, data_uri: String },
}

/// Spawn a dedicated I/O worker thread so decoding and disk writes never
/// hold up the dispatch loop.
///
/// The thread runs until the request sender is dropped.
pub(crate) fn spawn_io_worker() -> std::io::Result<mpsc::Sender<IoRequest>> {
    let (req_tx, req_rx) = mpsc::channel::<IoRequest>();

    std::thread::Builder::new()
        .name("io-worker".into())
        .spawn(move || {
            debug!("IO worker thread started");
            while let Ok(request) = req_rx.recv() {
                match request {
                    IoRequest::SaveImage { path, data_uri } => save_image(&path, &data_uri),
                }
            }
            debug!("IO worker thread exiting");
        })?;

    Ok(req_tx)
}

fn save_image(path: &Path, data_uri: &str) {
    let frame = match decode_data_uri(data_uri) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("IO worker: discarding undecodable image: {e}");
            return;
        }
    };
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            error!("IO worker: failed to create {}: {e}", parent.display());
            return;
        }
    }
    match std::fs::write(path, &frame.bytes) {
        Ok(()) => info!(
            "Saved {}x{} image to {}",
            frame.width,
            frame.height,
            path.display()
        ),
        Err(e) => error!("IO worker: failed to write {}: {e}", path.display()),
    }
}
