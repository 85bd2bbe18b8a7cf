mod allocate;
mod fill;
mod info;
mod slice;
pub mod utils;

use allocate::AllocateArgs;
use clap::{
    Parser,
    Subcommand,
};
use fill::FillArgs;
use info::InfoArgs;
use slice::SliceArgs;
use utils::UtilsArgs;
use wild::ArgsOs;

#[derive(Parser, Debug)]
#[command(
    author = env!("CARGO_PKG_AUTHORS"),
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None,)]
struct Cli {
    #[command(subcommand)]
    command: MainMenu,
}

#[derive(Subcommand, Debug)]
enum MainMenu {
    /// Create an empty store for a set of probes and samples.
    Allocate {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  AllocateArgs,
    },

    /// Write per-sample `probe<TAB>value` files into their columns.
    Fill {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  FillArgs,
    },

    /// Extract a samples x probes sub-matrix as TSV.
    Slice {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  SliceArgs,
    },

    /// Describe a store.
    Info {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  InfoArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Allocate { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Fill { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Slice { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Info { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
