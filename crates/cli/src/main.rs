use clap::{Parser, Subcommand};
use simlink_transport_at::Dialect;

mod commands;
mod config;

#[derive(Parser)]
#[command(version, about = "Exchange ISO7816 APDUs with a modem-attached SIM over AT commands")]
struct Cli {
    /// Serial device to use (falls back to SIMLINK_AT_DEVICE, then /dev/ttyUSB0)
    #[arg(short, long)]
    device: Option<String>,

    /// AT dialect the modem speaks
    #[arg(long, default_value_t = Dialect::Csim)]
    dialect: Dialect,

    /// Trace level output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available serial devices
    List,

    /// Check that the device supports the selected dialect
    Probe,

    /// Open a logical channel and exchange APDUs
    Transmit {
        /// Application to select, as a hex AID (defaults to the ISD-R)
        #[arg(long)]
        aid: Option<String>,

        /// APDUs to exchange, as hex strings
        #[arg(required = true)]
        apdus: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(config::resolve_verbose(cli.verbose));

    match &cli.command {
        Commands::List => commands::list_devices()?,
        Commands::Probe => {
            let device = config::resolve_device(cli.device.as_deref());
            commands::probe(&device, cli.dialect)?;
        }
        Commands::Transmit { aid, apdus } => {
            let device = config::resolve_device(cli.device.as_deref());
            commands::transmit(&device, cli.dialect, aid.as_deref(), apdus)?;
        }
    }

    Ok(())
}

fn setup_logging(verbose: bool) {
    // Verbose mode surfaces the raw AT protocol lines, which trace at TRACE
    let level = if verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(true)
        .init();
}
