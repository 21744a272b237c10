//! Power-state gate.
//!
//! Files may only be placed into a domain whose disk image is not in use, so
//! the target must appear in virsh's list of shut-off domains. Anything else
//! (running, paused, undefined) is refused.

use crate::command::ToolCommand;
use crate::config::ToolConfig;
use crate::error::PlaceError;

/// `virsh [-c uri] list --state-shutoff --name`
pub fn shutoff_query(config: &ToolConfig) -> ToolCommand {
    ToolCommand::new(config.elevation(), &config.virsh)
        .args(config.connect_args())
        .args(["list", "--state-shutoff", "--name"])
}

/// Domain names from `virsh list --name` output. Blank lines are dropped.
pub fn parse_shutoff_list(stdout: &str) -> Vec<&str> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .collect()
}

/// Exact match only; names are compared after trimming the listing.
pub fn contains_vm(shutoff: &[&str], vm_name: &str) -> bool {
    shutoff.iter().any(|name| *name == vm_name)
}

/// Whether `vm_name` is currently shut off. Unknown domains are reported as
/// not shut off rather than as an error.
pub fn is_shut_off(config: &ToolConfig, vm_name: &str) -> Result<bool, PlaceError> {
    let query = shutoff_query(config);
    let output = query.output().map_err(|e| PlaceError::StateQuery {
        command: query.program().to_string(),
        message: e.to_string(),
        stderr: String::new(),
    })?;

    if !output.success() {
        return Err(PlaceError::StateQuery {
            command: query.program().to_string(),
            message: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let shutoff = parse_shutoff_list(&stdout);
    tracing::debug!(count = shutoff.len(), "shut-off domains listed");
    Ok(contains_vm(&shutoff, vm_name))
}

/// Fail unless `vm_name` is shut off.
pub fn ensure_shut_off(config: &ToolConfig, vm_name: &str) -> Result<(), PlaceError> {
    if is_shut_off(config, vm_name)? {
        tracing::debug!(vm = %vm_name, "domain is shut off");
        Ok(())
    } else {
        Err(PlaceError::VmNotShutOff {
            name: vm_name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_output_lists_nothing() {
        assert!(parse_shutoff_list("").is_empty());
        assert!(parse_shutoff_list("\n\n  \n").is_empty());
    }

    #[test]
    fn names_are_trimmed() {
        let list = parse_shutoff_list("  web01 \nmyvm\n\n db \n");
        assert_eq!(list, vec!["web01", "myvm", "db"]);
        assert!(contains_vm(&list, "myvm"));
        assert!(contains_vm(&list, "db"));
    }

    #[test]
    fn membership_is_exact() {
        let list = parse_shutoff_list("myvm-2\nMyVm\n");
        assert!(!contains_vm(&list, "myvm"));
        assert!(!contains_vm(&list, "myvm-"));
    }

    #[test]
    fn query_includes_connection_uri() {
        let config = ToolConfig {
            libvirt_uri: "qemu:///system".into(),
            ..ToolConfig::default()
        };
        assert_eq!(
            shutoff_query(&config).render(),
            "virsh -c qemu:///system list --state-shutoff --name"
        );
    }

    /// Stub virsh as a script run through `sh`, so it never needs to be executable.
    fn stub_config(script: &str) -> (tempfile::TempDir, ToolConfig) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("virsh");
        std::fs::write(&path, format!("{script}\n")).unwrap();
        let config = ToolConfig {
            elevate: "sh".into(),
            virsh: path.display().to_string(),
            ..ToolConfig::default()
        };
        (dir, config)
    }

    #[test]
    fn listed_vm_is_shut_off() {
        let (_dir, config) = stub_config("printf 'other\\n myvm \\n\\n'");
        assert!(is_shut_off(&config, "myvm").unwrap());
        ensure_shut_off(&config, "myvm").unwrap();
    }

    #[test]
    fn unlisted_vm_is_refused() {
        let (_dir, config) = stub_config("echo other");
        assert!(!is_shut_off(&config, "myvm").unwrap());
        let err = ensure_shut_off(&config, "myvm").unwrap_err();
        assert!(err.to_string().contains("VM 'myvm' is not shut off"));
    }

    #[test]
    fn failing_query_surfaces_stderr() {
        let (_dir, config) = stub_config("echo 'failed to connect to the hypervisor' >&2; exit 1");
        let err = is_shut_off(&config, "myvm").unwrap_err();
        assert!(matches!(err, PlaceError::StateQuery { .. }));
        assert_eq!(err.to_string(), format!("{} command execution error: exit status: 1", config.virsh));
        assert_eq!(err.tool_output(), Some("failed to connect to the hypervisor\n"));
    }
}
