use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use favmarks::app::{run, RunOptions};

#[derive(Debug, Parser)]
#[command(
    name = "favmarks",
    version,
    about = "Favorite file groups and line bookmarks for your workspace"
)]
struct Cli {
    #[arg(long, help = "Enable verbose debug logs")]
    debug: bool,

    #[arg(long, value_name = "FILE", help = "State file to read and write")]
    state: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Workspace root (state and backup location)")]
    workspace: Option<PathBuf>,

    #[arg(short, long, help = "Answer yes to confirmation prompts")]
    yes: bool,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Command to run; starts an interactive shell when omitted"
    )]
    command: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(RunOptions {
        debug: cli.debug,
        state_path: cli.state,
        workspace: cli.workspace,
        assume_yes: cli.yes,
        command: cli.command,
    })
}
