//! Background tasks and workers.
//!
//! Each submodule provides a long-running async function intended to be
//! spawned via `tokio::spawn`. All workers accept a [`CancellationToken`]
//! for graceful shutdown.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

pub mod translation;
