use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PlaceError {
    #[error("{message}")]
    #[diagnostic(code(virt_place::usage))]
    Usage { message: String },

    #[error("failed to load config from {path}")]
    #[diagnostic(code(virt_place::config))]
    ConfigLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config from {path}: {message}")]
    #[diagnostic(code(virt_place::config))]
    ConfigParse { path: String, message: String },

    #[error("validation error: {message}")]
    #[diagnostic(code(virt_place::config))]
    Validation { message: String },

    #[error("{command} command execution error: {message}")]
    #[diagnostic(code(virt_place::vm_state))]
    StateQuery {
        command: String,
        message: String,
        /// The tool's stderr, printed verbatim ahead of the diagnostic.
        stderr: String,
    },

    #[error(
        "VM '{name}' is not shut off. For safety, files can only be placed on VMs that are in shutoff state."
    )]
    #[diagnostic(
        code(virt_place::vm_state),
        help("shut the domain down first, e.g. with `virsh shutdown`")
    )]
    VmNotShutOff { name: String },

    #[error("{context}")]
    #[diagnostic(code(virt_place::io))]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} command execution error: {message}")]
    #[diagnostic(code(virt_place::external_command))]
    ExternalCommand {
        command: String,
        message: String,
        /// Combined stdout and stderr of the tool.
        output: String,
    },
}

impl PlaceError {
    /// Usage errors get the full help text printed alongside them.
    pub fn is_usage(&self) -> bool {
        matches!(self, PlaceError::Usage { .. })
    }

    /// Raw text captured from a failed external tool, if any.
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            PlaceError::StateQuery { stderr: text, .. }
            | PlaceError::ExternalCommand { output: text, .. } => {
                (!text.is_empty()).then_some(text.as_str())
            }
            _ => None,
        }
    }
}
