use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::error::PlaceError;

const EXAMPLES: &str = "\
Examples:
  # Copy from standard input
  echo \"Hello\" | virt-place -file hello.txt -dir /home/user vm-name

  # Copy from local file
  virt-place -source /path/to/local/file.txt -file file.txt -dir /home/user vm-name";

#[derive(Parser, Debug)]
#[command(
    name = "virt-place",
    version,
    about = "Place data as a file in a KVM virtual machine",
    long_about = "Place data as a file in a KVM virtual machine.\n\
                  Note: For safety, files can only be placed on VMs that are in shutoff state.",
    override_usage = "virt-place [OPTIONS] VM_NAME",
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Path to the file to be placed on the VM (required)
    #[arg(long, value_name = "PATH")]
    pub file: Option<String>,

    /// Target directory path on the VM (required)
    #[arg(long, value_name = "PATH")]
    pub dir: Option<String>,

    /// Read data from standard input (default if neither --stdin nor --source specified)
    #[arg(long)]
    pub stdin: bool,

    /// Path to local source file to read data from
    #[arg(long, value_name = "PATH")]
    pub source: Option<String>,

    /// Path to config file (defaults to ~/.config/virt-place/config.toml when present)
    #[arg(long, env = "VIRT_PLACE_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Name of the libvirt domain to place the file into
    #[arg(value_name = "VM_NAME")]
    pub vm_names: Vec<String>,
}

/// Where the staged bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

/// Validated invocation parameters, threaded through every later stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceRequest {
    pub vm_name: String,
    pub target_file: String,
    pub target_dir: String,
    pub source: InputSource,
}

impl Cli {
    /// Check required and conflicting flags, then the positional VM name.
    pub fn into_request(self) -> Result<PlaceRequest, PlaceError> {
        let target_file = self.file.unwrap_or_default();
        let target_dir = self.dir.unwrap_or_default();
        if target_file.is_empty() || target_dir.is_empty() {
            return Err(usage("-file and -dir options are required"));
        }
        if Path::new(&target_file).file_name().is_none() {
            return Err(usage(&format!("-file '{target_file}' has no file name")));
        }

        // An empty -source behaves as if it was never given
        let source = self.source.filter(|s| !s.is_empty());
        if self.stdin && source.is_some() {
            return Err(usage("-stdin and -source cannot be used together"));
        }

        let mut vm_names = self.vm_names;
        if vm_names.len() != 1 {
            return Err(usage("VM name must be specified"));
        }
        let vm_name = vm_names.remove(0);
        if vm_name.is_empty() {
            return Err(usage("VM name must not be empty"));
        }

        Ok(PlaceRequest {
            vm_name,
            target_file,
            target_dir,
            source: match source {
                Some(path) => InputSource::File(PathBuf::from(path)),
                None => InputSource::Stdin,
            },
        })
    }
}

fn usage(message: &str) -> PlaceError {
    PlaceError::Usage {
        message: message.to_string(),
    }
}

/// Turn a clap parse failure into a usage error, keeping only clap's headline.
pub fn usage_from_clap(err: &clap::Error) -> PlaceError {
    let rendered = err.to_string();
    let headline = rendered.lines().next().unwrap_or_default();
    let message = headline.strip_prefix("error: ").unwrap_or(headline);
    PlaceError::Usage {
        message: message.to_string(),
    }
}

/// Long flags that are also accepted with a single leading dash.
const SINGLE_DASH_FLAGS: &[&str] = &["file", "dir", "source", "stdin", "config", "verbose"];

/// Rewrite `-dir`, `-file=x` and friends into their `--` forms so clap
/// accepts the single-dash spelling. Everything after a bare `--` is left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut out = Vec::new();
    let mut passthrough = false;
    for (i, arg) in args.into_iter().enumerate() {
        let arg: OsString = arg.into();
        if i == 0 || passthrough {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            passthrough = true;
            out.push(arg);
            continue;
        }
        match arg.to_str().and_then(single_dash_long) {
            Some(rewritten) => out.push(rewritten.into()),
            None => out.push(arg),
        }
    }
    out
}

fn single_dash_long(arg: &str) -> Option<String> {
    let rest = arg.strip_prefix('-')?;
    if rest.starts_with('-') {
        return None;
    }
    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
    SINGLE_DASH_FLAGS.contains(&name).then(|| format!("-{arg}"))
}
