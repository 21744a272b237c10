use std::path::Path;

use crate::command::ToolCommand;
use crate::config::ToolConfig;
use crate::error::PlaceError;

/// `virt-copy-in [-c uri] -d <vm> <local file> <guest dir>`
pub fn copy_in_command(
    config: &ToolConfig,
    vm_name: &str,
    local: &Path,
    target_dir: &str,
) -> ToolCommand {
    ToolCommand::new(config.elevation(), &config.copy_in)
        .args(config.connect_args())
        .args(["-d", vm_name])
        .arg(local.display().to_string())
        .arg(target_dir)
}

/// Copy `local` into `target_dir` inside the disk image of `vm_name`.
pub fn copy_in(
    config: &ToolConfig,
    vm_name: &str,
    local: &Path,
    target_dir: &str,
) -> Result<(), PlaceError> {
    let cmd = copy_in_command(config, vm_name, local, target_dir);
    tracing::info!("Executing command: {}", cmd.render());

    let output = cmd.output().map_err(|e| PlaceError::ExternalCommand {
        command: cmd.program().to_string(),
        message: e.to_string(),
        output: String::new(),
    })?;

    if !output.success() {
        return Err(PlaceError::ExternalCommand {
            command: cmd.program().to_string(),
            message: output.status.to_string(),
            output: output.combined(),
        });
    }

    tracing::debug!(vm = %vm_name, dir = %target_dir, "copy-in finished");
    Ok(())
}
