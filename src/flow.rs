//! One placement run: power check, staging, copy-in.
//!
//! The stages run strictly in order and the first failure ends the run. No
//! stage is retried.

use std::fmt;
use std::io::Read;

use crate::cli::PlaceRequest;
use crate::config::ToolConfig;
use crate::error::PlaceError;
use crate::{inject, stage, vm_state};

/// Progress through a run. `Done` is the only successful terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Start,
    Parsed,
    PowerChecked,
    Staged,
    Injected,
    Done,
}

impl fmt::Display for FlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FlowState::Start => "start",
            FlowState::Parsed => "parsed",
            FlowState::PowerChecked => "power-checked",
            FlowState::Staged => "staged",
            FlowState::Injected => "injected",
            FlowState::Done => "done",
        };
        f.write_str(s)
    }
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub vm_name: String,
    pub target_file: String,
    pub target_dir: String,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Successfully copied file {} to directory {} on VM {}",
            self.target_file, self.target_dir, self.vm_name
        )
    }
}

fn enter(state: FlowState) {
    tracing::debug!(%state, "flow");
}

/// Place the request's data into the VM. The staged file is gone by the
/// time this returns, on success and on every error path.
pub fn run(
    request: &PlaceRequest,
    config: &ToolConfig,
    stdin: impl Read,
) -> Result<Report, PlaceError> {
    enter(FlowState::Start);
    enter(FlowState::Parsed);

    vm_state::ensure_shut_off(config, &request.vm_name)?;
    enter(FlowState::PowerChecked);

    let staged = stage::stage_input(request, stdin)?;
    enter(FlowState::Staged);

    inject::copy_in(config, &request.vm_name, staged.path(), &request.target_dir)?;
    enter(FlowState::Injected);

    drop(staged);
    enter(FlowState::Done);

    Ok(Report {
        vm_name: request.vm_name.clone(),
        target_file: request.target_file.clone(),
        target_dir: request.target_dir.clone(),
    })
}
