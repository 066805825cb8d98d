use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use waypoint_cli::args::{parse_coordinate, AlgorithmArg, NetworkArgs};
use waypoint_cli::commands::bench::{handle_bench_command, BenchCommandArgs};
use waypoint_cli::commands::compare::{handle_compare_command, CompareCommandArgs};
use waypoint_cli::commands::route::{handle_route_command, RouteCommandArgs};
use waypoint_cli::output::OutputFormat;
use waypoint_lib::Coordinate;

#[derive(Parser, Debug)]
#[command(author, version, about = "Waypoint routing utilities")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Time queries between random grid locations.
    Bench {
        #[command(flatten)]
        network: NetworkArgs,
        /// Search strategy to time.
        #[arg(long, value_enum, default_value_t = AlgorithmArg::Dijkstra)]
        algorithm: AlgorithmArg,
        /// Number of query pairs.
        #[arg(long, default_value_t = 200)]
        pairs: usize,
        /// Vertex pair draws allowed before giving up.
        #[arg(long, default_value_t = 10_000)]
        max_attempts: usize,
        /// Time full route construction instead of weight-only queries.
        #[arg(long)]
        full_route: bool,
    },
    /// Route random queries with two strategies and report disagreements.
    Compare {
        #[command(flatten)]
        network: NetworkArgs,
        #[arg(long, value_enum, default_value_t = AlgorithmArg::AStar)]
        candidate: AlgorithmArg,
        #[arg(long, value_enum, default_value_t = AlgorithmArg::Dijkstra)]
        reference: AlgorithmArg,
        #[arg(long, default_value_t = 100)]
        pairs: usize,
        #[arg(long, default_value_t = 10_000)]
        max_attempts: usize,
        /// Largest weight difference still counted as agreement.
        #[arg(long, default_value_t = 1e-6)]
        tolerance: f64,
    },
    /// Route between two coordinates given as `latitude,longitude`.
    Route {
        #[command(flatten)]
        network: NetworkArgs,
        #[arg(long = "from", value_parser = parse_coordinate)]
        from: Coordinate,
        #[arg(long = "to", value_parser = parse_coordinate)]
        to: Coordinate,
        #[arg(long, value_enum, default_value_t = AlgorithmArg::Dijkstra)]
        algorithm: AlgorithmArg,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Bench {
            network,
            algorithm,
            pairs,
            max_attempts,
            full_route,
        } => {
            let args = BenchCommandArgs {
                algorithm: algorithm.into(),
                pairs,
                max_attempts,
                full_route,
            };
            handle_bench_command(&network, &args, cli.format)
        }
        Command::Compare {
            network,
            candidate,
            reference,
            pairs,
            max_attempts,
            tolerance,
        } => {
            let args = CompareCommandArgs {
                candidate: candidate.into(),
                reference: reference.into(),
                pairs,
                max_attempts,
                tolerance,
            };
            handle_compare_command(&network, &args, cli.format)
        }
        Command::Route {
            network,
            from,
            to,
            algorithm,
        } => {
            let args = RouteCommandArgs {
                from,
                to,
                algorithm: algorithm.into(),
            };
            handle_route_command(&network, &args, cli.format)
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
