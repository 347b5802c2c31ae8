use crate::inspect::{run_requirements, run_search, RequirementsArgs, SearchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use program_finder::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Program Finder",
    about = "Search study programmes and extract their admission requirements",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Fetch a programme page and print its merged admission record
    Requirements(RequirementsArgs),
    /// Run a programme search with the configured credentials
    Search(SearchArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Requirements(args) => run_requirements(args).await,
        Command::Search(args) => run_search(args).await,
    }
}
