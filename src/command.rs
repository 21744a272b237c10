use std::process::{Command, ExitStatus};

/// An external tool invocation, optionally run through an elevation program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    elevate: Option<String>,
    program: String,
    args: Vec<String>,
}

/// Captured result of a finished tool.
#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Stdout followed by stderr, lossily decoded.
    pub fn combined(&self) -> String {
        let mut text = String::from_utf8_lossy(&self.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&self.stderr));
        text
    }
}

impl ToolCommand {
    pub fn new(elevate: Option<&str>, program: &str) -> Self {
        Self {
            elevate: elevate.map(str::to_string),
            program: program.to_string(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The tool being run, without the elevation prefix.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// The tool's own arguments, without the elevation prefix.
    pub fn tool_args(&self) -> &[String] {
        &self.args
    }

    /// Space-joined command line, tool name first, as shown to the user.
    pub fn render(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_command(&self) -> Command {
        match &self.elevate {
            Some(elevate) => {
                let mut cmd = Command::new(elevate);
                cmd.arg(&self.program).args(&self.args);
                cmd
            }
            None => {
                let mut cmd = Command::new(&self.program);
                cmd.args(&self.args);
                cmd
            }
        }
    }

    /// Run to completion, capturing stdout and stderr. Blocks until the tool exits.
    pub fn output(&self) -> std::io::Result<ToolOutput> {
        tracing::debug!(elevate = ?self.elevate, command = %self.render(), "running external tool");
        let output = self.to_command().output()?;
        Ok(ToolOutput {
            status: output.status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
