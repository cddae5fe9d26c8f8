use crate::demo::{run_demo, run_schedule_import, DemoArgs, ScheduleImportArgs};
use crate::server;
use campus_placement::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Campus Placement Service",
    about = "Run the campus placement and counselling service from the command line",
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
    /// Work with drive process schedules
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
    /// Walk a student through an OA, Interview, HR drive and a counselling booking
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    /// Parse a schedule CSV and show the calendar events it would produce
    Import(ScheduleImportArgs),
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
        Command::Schedule {
            command: ScheduleCommand::Import(args),
        } => run_schedule_import(args),
        Command::Demo(args) => run_demo(args),
    }
}
