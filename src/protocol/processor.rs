//! Post-handshake frame processing.
//!
//! Once the broker has answered CONNECTED, every further read on the
//! connection belongs to a frame processor. The handshake starts exactly one
//! processor and stores whatever handle it returns in the session.

use std::io;

use tokio::io::AsyncRead;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::codec::{Frame, FrameReader};

/// Default number of frames buffered between the reader task and the consumer
pub const DEFAULT_FRAME_BUFFER: usize = 64;

/// Factory for the background activity that keeps reading frames.
pub trait FrameProcessor<R> {
    /// Handle returned to the session owner
    type Handle;

    /// Take over the frame reader and start processing.
    fn start(self, reader: FrameReader<R>) -> Self::Handle;
}

/// Processor that forwards every received frame over a bounded channel.
///
/// Must be started from within a tokio runtime.
#[derive(Debug, Clone, Copy)]
pub struct ChannelProcessor {
    buffer: usize,
}

impl ChannelProcessor {
    /// Create with a custom channel capacity (minimum 1)
    pub fn with_buffer(buffer: usize) -> Self {
        Self {
            buffer: buffer.max(1),
        }
    }
}

impl Default for ChannelProcessor {
    fn default() -> Self {
        Self::with_buffer(DEFAULT_FRAME_BUFFER)
    }
}

impl<R> FrameProcessor<R> for ChannelProcessor
where
    R: AsyncRead + Unpin + Send + 'static,
{
    type Handle = ProcessorHandle;

    fn start(self, mut reader: FrameReader<R>) -> ProcessorHandle {
        let (frames_tx, frames_rx) = mpsc::channel(self.buffer);
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                let frame = tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = reader.read_frame() => match result {
                        Ok(frame) => frame,
                        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                            tracing::debug!("broker closed the connection");
                            break;
                        },
                        Err(e) => {
                            tracing::warn!(error = %e, "frame processor stopped on read failure");
                            break;
                        },
                    },
                };

                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    sent = frames_tx.send(frame) => {
                        if sent.is_err() {
                            break;
                        }
                    },
                }
            }
            tracing::debug!("frame processor finished");
        });

        ProcessorHandle {
            frames: frames_rx,
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Running [`ChannelProcessor`].
///
/// Dropping the handle also stops the processor.
#[derive(Debug)]
pub struct ProcessorHandle {
    frames: mpsc::Receiver<Frame>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ProcessorHandle {
    /// Receive the next frame; `None` once the processor has finished
    pub async fn recv(&mut self) -> Option<Frame> {
        self.frames.recv().await
    }

    /// Receive a frame if one is already buffered
    pub fn try_recv(&mut self) -> Option<Frame> {
        self.frames.try_recv().ok()
    }

    /// Check if the reader task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal the reader task to stop and wait for it
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::warn!(error = %e, "frame processor task failed");
        }
    }
}
