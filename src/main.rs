use anyhow::Result;
use clap::Parser;

use citation_inequality::cli::{Cli, Commands};
use citation_inequality::commands::{
    run_authors, run_ineq, run_journals, run_lag, run_plot_lag, run_reproduce, run_timeline,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ineq(args) => {
            run_ineq(args)?;
        }
        Commands::Authors(args) => {
            run_authors(args)?;
        }
        Commands::Lag(args) => {
            run_lag(args)?;
        }
        Commands::Journals(args) => {
            run_journals(args)?;
        }
        Commands::Timeline(args) => {
            run_timeline(args)?;
        }
        Commands::PlotLag(args) => {
            run_plot_lag(args)?;
        }
        Commands::Reproduce(args) => {
            run_reproduce(args)?;
        }
    }

    Ok(())
}
