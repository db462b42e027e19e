use clap::Parser;
use serial_listen::config::{Config, ConfigLoader};
use serial_listen::port::{self, SyncSerialPort};
use serial_listen::{logging, AppError, Console, ListenSettings, Listener, Outcome, SystemClock};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    name = "serial-listen",
    version,
    about = "Listen on a serial port for a fixed window and print every line received.",
    long_about = "Bring-up helper for microcontroller boards: opens the serial port, asks you to press \
                  RESET, and prints each line the firmware sends during the listen window. Silence \
                  usually means the firmware never initialised its serial output."
)]
struct Args {
    /// Serial device to listen on [default: /dev/ttyACM0]
    #[arg(short, long)]
    device: Option<String>,

    /// Baud rate [default: 115200]
    #[arg(short, long)]
    baud: Option<u32>,

    /// Listen window in seconds [default: 15]
    #[arg(short, long)]
    window: Option<f64>,

    /// Delay between availability checks in milliseconds [default: 100]
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Per-read timeout in milliseconds [default: 1000]
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Prefix each received line with the local time.
    #[arg(long)]
    timestamps: bool,

    /// List the serial ports the OS reports and exit.
    #[arg(long)]
    list_ports: bool,

    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter for diagnostics on stderr, e.g. "debug" [default: warn]
    #[arg(long)]
    log_level: Option<String>,

    /// Exit 1 on error and 2 when nothing was received.
    #[arg(long)]
    strict: bool,
}

impl Args {
    /// Command-line flags win over file and environment.
    fn apply(&self, config: &mut Config) {
        if let Some(ref device) = self.device {
            config.serial.device = device.clone();
        }
        if let Some(baud) = self.baud {
            config.serial.baud_rate = baud;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.serial.timeout_ms = timeout_ms;
        }
        if let Some(window) = self.window {
            config.listen.window_secs = window;
        }
        if let Some(poll) = self.poll_interval_ms {
            config.listen.poll_interval_ms = poll;
        }
        if self.timestamps {
            config.listen.timestamps = true;
        }
        if let Some(ref level) = self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn setup(args: &Args) -> Result<Config, AppError> {
    let loader = ConfigLoader::load(args.config.as_deref())?;
    let config_path = loader.config_path.clone();
    let mut config = loader.into_config();
    args.apply(&mut config);
    config.validate()?;
    logging::init(&config.logging)?;

    match config_path {
        Some(path) => debug!(path = %path.display(), "loaded configuration file"),
        None => debug!("no configuration file, using defaults"),
    }
    Ok(config)
}

/// Show `err` on the console, falling back to stderr if stdout is gone.
fn report_failure<W: Write, E: Write>(
    console: &mut Console<W>,
    err: &AppError,
    fallback: &mut E,
) {
    if let Err(write_err) = console.error(err) {
        let _ = writeln!(fallback, "Error: {err} ({write_err})");
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let stdout = io::stdout();

    let config = match setup(&args) {
        Ok(config) => config,
        Err(err) => {
            let mut console = Console::new(stdout.lock(), "", false);
            report_failure(&mut console, &err, &mut io::stderr());
            return ExitCode::from(Outcome::Failed(err).exit_code(args.strict));
        }
    };

    let mut console = Console::from_config(stdout.lock(), &config.listen);

    if args.list_ports {
        let listed = port::list_ports()
            .map_err(AppError::from)
            .and_then(|ports| console.port_list(&ports).map_err(AppError::from));
        return match listed {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                report_failure(&mut console, &err, &mut io::stderr());
                ExitCode::from(Outcome::Failed(err).exit_code(args.strict))
            }
        };
    }

    let listener = Listener::new(ListenSettings::from_config(&config), SystemClock);
    let port_config = config.serial.port_configuration();
    let device = config.serial.device.as_str();

    let outcome = listener.run(|| SyncSerialPort::open(device, &port_config), &mut console);
    ExitCode::from(outcome.exit_code(args.strict))
}
