//! Flyra CLI - Command-line interface
//!
//! This binary provides a command-line interface to the Flyra library:
//! look up the live state of a single flight, or search for flights on
//! a route.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use flyra::aggregator::FlightReport;
use flyra::provider::{AsyncReqwestClient, Fr24Provider};
use flyra::service::{FlightQueryService, ServiceConfig};

mod error;

use error::CliError;

#[derive(Parser)]
#[command(name = "flyra")]
#[command(about = "Query live flight state from the command line", long_about = None)]
#[command(version = flyra::VERSION)]
struct Args {
    /// Provider API token (falls back to FR24_API_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Cache freshness window in seconds
    #[arg(long, global = true, default_value = "10")]
    ttl_secs: u64,

    /// Provider request timeout in seconds
    #[arg(long, global = true, default_value = "10")]
    timeout_secs: u64,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Look up the current state of a single flight
    Flight {
        /// Flight number or callsign (e.g. UA837)
        number: String,
    },
    /// Search for live flights on a route
    Route {
        /// Departure airport IATA code
        #[arg(long, short)]
        departure: Option<String>,

        /// Arrival airport IATA code
        #[arg(long, short)]
        arrival: Option<String>,

        /// Maximum number of results
        #[arg(long, short)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.verbose && std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "flyra=debug");
    }
    let _guard = match flyra::logging::init_logging(
        flyra::logging::default_log_dir(),
        flyra::logging::default_log_file(),
    ) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    let mut config = ServiceConfig::new()
        .with_freshness_ttl(Duration::from_secs(args.ttl_secs))
        .with_provider_timeout(Duration::from_secs(args.timeout_secs));
    if let Some(token) = &args.token {
        config = config.with_api_token(token.clone());
    }

    let token = match config.resolve_api_token() {
        Some(token) => token,
        None => CliError::Config("no API token configured".to_string()).exit(),
    };

    let http = match AsyncReqwestClient::with_timeout(config.provider_timeout) {
        Ok(client) => client,
        Err(e) => CliError::HttpClient(e).exit(),
    };
    let mut fr24 = Fr24Provider::new(http, token);
    if let Some(base_url) = &config.base_url {
        fr24 = fr24.with_base_url(base_url.clone());
    }
    let provider = Arc::new(fr24);
    let service = FlightQueryService::new(provider, config);
    info!(version = flyra::VERSION, "flyra starting");

    let result = match &args.command {
        Command::Flight { number } => flight_command(&service, number).await,
        Command::Route {
            departure,
            arrival,
            limit,
        } => route_command(&service, departure.as_deref(), arrival.as_deref(), *limit).await,
    };

    if let Err(e) = result {
        e.exit();
    }
}

async fn flight_command(
    service: &FlightQueryService<Fr24Provider<AsyncReqwestClient>>,
    number: &str,
) -> Result<(), CliError> {
    let report = service.get_flight(number).await?;
    print_report(&report);
    Ok(())
}

async fn route_command(
    service: &FlightQueryService<Fr24Provider<AsyncReqwestClient>>,
    departure: Option<&str>,
    arrival: Option<&str>,
    limit: Option<usize>,
) -> Result<(), CliError> {
    let reports = service.search_route(departure, arrival, limit).await?;

    if reports.is_empty() {
        println!("No live flights found for this route");
        return Ok(());
    }

    println!("{} flight(s) found:", reports.len());
    println!();
    for report in &reports {
        print_report(report);
        println!();
    }
    Ok(())
}

fn print_report(report: &FlightReport) {
    let snapshot = &report.snapshot;
    let staleness = if report.freshness.is_stale() {
        " (stale)"
    } else {
        ""
    };

    let status = match &snapshot.status_label {
        Some(label) => format!("{} ({})", snapshot.status, label),
        None => snapshot.status.to_string(),
    };
    println!("Flight {}{}", snapshot.flight_number, staleness);
    println!("  Status:   {}", status);

    match (&snapshot.departure_airport, &snapshot.arrival_airport) {
        (Some(dep), Some(arr)) => println!("  Route:    {} -> {}", dep, arr),
        (Some(dep), None) => println!("  Route:    {} -> ?", dep),
        (None, Some(arr)) => println!("  Route:    ? -> {}", arr),
        (None, None) => {}
    }

    if let Some(position) = &snapshot.position {
        println!("  Position: {}", position);
    }
    if let Some(alt) = snapshot.altitude_ft {
        println!("  Altitude: {} ft", alt);
    }
    if let (Some(kts), Some(mph)) = (snapshot.ground_speed_kts, snapshot.ground_speed_mph()) {
        println!("  Speed:    {} kts ({} mph)", kts, mph);
    }
    if let Some(heading) = snapshot.heading_deg {
        println!("  Heading:  {}°", heading);
    }
    if let Some(distance) = snapshot.distance_miles {
        println!("  Distance: {} mi remaining", distance);
    }
    if let Some(eta) = snapshot.eta {
        println!("  ETA:      {}", eta.format("%Y-%m-%d %H:%M UTC"));
    }
    if let Some(delay) = snapshot.departure_delay_min {
        println!("  Departure delay: {} min", delay);
    }
    if let Some(delay) = snapshot.arrival_delay_min {
        println!("  Arrival delay:   {} min", delay);
    }
}
