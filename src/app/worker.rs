use std::sync::mpsc;
use std::time::Duration;

use gtk4::glib;
use image::RgbaImage;

use crate::loader::{LoadError, LoadResult};

pub(super) const DECODE_RESULT_POLL_INTERVAL: Duration = Duration::from_millis(24);
const DECODE_THREAD_NAME: &str = "redakt-decode";

/// Runs `work` on a worker thread and delivers its result to `on_result` on the main loop.
pub(super) fn spawn_image_decode<W, H>(work: W, on_result: H)
where
    W: FnOnce() -> LoadResult<RgbaImage> + Send + 'static,
    H: FnOnce(LoadResult<RgbaImage>) + 'static,
{
    let (tx, rx) = mpsc::channel::<LoadResult<RgbaImage>>();
    if let Err(err) = std::thread::Builder::new()
        .name(DECODE_THREAD_NAME.to_string())
        .spawn(move || {
            let _ = tx.send(work());
        })
    {
        tracing::warn!(%err, "failed to spawn decode worker");
    }

    let mut on_result = Some(on_result);
    glib::timeout_add_local(DECODE_RESULT_POLL_INTERVAL, move || {
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return glib::ControlFlow::Continue,
            Err(mpsc::TryRecvError::Disconnected) => {
                tracing::warn!("decode worker exited without a result");
                Err(LoadError::WorkerLost)
            }
        };
        if let Some(on_result) = on_result.take() {
            on_result(result);
        }
        glib::ControlFlow::Break
    });
}
