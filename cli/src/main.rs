mod commands;
mod terminal;

use commands::{CommandLine, Commands, discover, targets};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = commands.scan.to_config()?;

    match commands.command {
        Commands::Discover => {
            print::header("getting ready for discovery");
            discover::discover(&cfg).await
        }
        Commands::Targets => {
            print::header("local scan targets");
            targets::targets(&cfg)
        }
    }
}
