//! Runs a conversion in a background thread with progress/result channels.

use std::sync::Arc;
use std::sync::mpsc;

use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::core::convert::{ConvertCallbacks, ConvertOptions, Engine};

use super::PendingConversion;

/// Spawn a conversion of `text`. Returns PendingConversion with channels for progress and result.
pub fn spawn_conversion(
    rt: &Arc<Runtime>,
    engine: Arc<Engine>,
    text: String,
    options: ConvertOptions,
) -> PendingConversion {
    let (progress_tx, progress_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let cancel_token = CancellationToken::new();
    let cancel_token_clone = cancel_token.clone();
    let rt_clone = Arc::clone(rt);

    std::thread::spawn(move || {
        let on_progress = move |s: &str| {
            let _ = progress_tx.send(s.to_string());
        };
        let conversion = rt_clone.block_on(engine.convert(
            &text,
            &options,
            ConvertCallbacks {
                on_progress: Some(&on_progress),
                cancel_token: Some(&cancel_token_clone),
            },
        ));
        let _ = result_tx.send(conversion);
    });

    PendingConversion {
        progress_rx,
        result_rx,
        cancel_token,
    }
}
