use crate::demo::{run_budget_check, run_demo, BudgetCheckArgs, DemoArgs};
use crate::server;
use car_insurance::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Car Insurance Quoting API",
    about = "Run the car-insurance budget API or exercise its validation rules from the command line",
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
    /// Budget request utilities
    Budget {
        #[command(subcommand)]
        command: BudgetCommand,
    },
    /// Run every documented validation scenario against seeded sample data
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum BudgetCommand {
    /// Validate a budget request against the seeded sample data without storing it
    Check(BudgetCheckArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Preload sample drivers, customers and cars into the store
    #[arg(long)]
    pub(crate) seed_sample_data: bool,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Budget {
            command: BudgetCommand::Check(args),
        } => run_budget_check(args),
        Command::Demo(args) => run_demo(args),
    }
}
