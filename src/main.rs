use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use virt_place::cli::{self, Cli};
use virt_place::config;
use virt_place::error::PlaceError;
use virt_place::flow;
use virt_place::logging;

fn main() -> miette::Result<()> {
    let cli = match Cli::try_parse_from(cli::normalize_args(std::env::args_os())) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => return Err(usage_failure(cli::usage_from_clap(&e))),
    };

    logging::init(cli.verbose);

    let config_path = cli.config.clone();
    let request = cli.into_request().map_err(usage_failure)?;
    let tools = config::load_config(config_path.as_deref())?;

    let report = flow::run(&request, &tools, std::io::stdin().lock()).map_err(tool_failure)?;
    println!("{report}");
    Ok(())
}

/// Tool output goes to stderr exactly as captured; the diagnostic that
/// follows is only a headline.
fn tool_failure(err: PlaceError) -> miette::Report {
    if let Some(text) = err.tool_output() {
        eprint!("{text}");
        if !text.ends_with('\n') {
            eprintln!();
        }
    }
    err.into()
}

/// Usage errors are reported together with the full help text.
fn usage_failure(err: PlaceError) -> miette::Report {
    eprintln!("{}", Cli::command().render_help());
    err.into()
}
