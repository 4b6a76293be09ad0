mod check;
mod codebook;
mod generate;
pub mod utils;

use check::CheckArgs;
use clap::{
    Parser,
    Subcommand,
};
use codebook::{
    DecodeArgs,
    EncodeArgs,
};
use generate::GenerateArgs;
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
    /// Generate a constrained codeword set
    Generate {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  GenerateArgs,
    },

    /// Check a codeword file against constraints
    Check {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  CheckArgs,
    },

    /// Encode a binary file with a codeword set
    Encode {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  EncodeArgs,
    },

    /// Decode a file written by `encode`
    Decode {
        #[clap(flatten)]
        utils: UtilsArgs,
        #[clap(flatten)]
        args:  DecodeArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let args: ArgsOs = wild::args_os();
    let cli = Cli::parse_from(args);

    match cli.command {
        MainMenu::Generate { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Check { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Encode { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
        MainMenu::Decode { utils, args } => {
            utils.setup()?;
            args.run(&utils)?;
        },
    }
    Ok(())
}
