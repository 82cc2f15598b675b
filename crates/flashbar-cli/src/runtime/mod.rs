//! Real-time hosting for the coordinator: tokio timers, the terminal surface
//! and the event loop that ties them together.

pub mod event_loop;
pub mod surface;
pub mod timers;

use anyhow::Context;
use std::future::Future;

/// Run `future` to completion on a single-threaded runtime.
pub fn block_on<F: Future>(future: F) -> anyhow::Result<F::Output> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;
    Ok(rt.block_on(future))
}
