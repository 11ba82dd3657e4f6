//! Application-level orchestration utilities.
//!
//! This module owns the upload state machine, the session that drives it, and
//! post-request processing such as auto-save, exports, and history refresh. UI/CLI
//! layers call into this module to keep responsibilities separated.

mod controller;
mod post_process;
mod upload;

pub(crate) use controller::{run_session, UiCommand};
pub(crate) use post_process::{process_completion, ExportTargets, PostProcessOptions};
pub use upload::{UploadController, UploadState};
