//! Background worker that drains file events through the pipeline.
//!
//! Events are handled one at a time, in arrival order: each is processed to
//! completion (including its notification) before the next is received.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::info;

use crate::pipeline::processor::Pipeline;
use crate::watcher::FileEvent;

/// Spawn the drain loop. It ends when every event sender has been dropped.
pub fn spawn_pipeline(
    pipeline: Arc<Pipeline>,
    mut events: UnboundedReceiver<FileEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Pipeline worker started");
        while let Some(event) = events.recv().await {
            pipeline.handle(&event).await;
        }
        info!("Pipeline worker stopped");
    })
}
