use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nsxt_provider::config::{Config, Overrides};
use nsxt_provider::document::{read_document, render_state};
use nsxt_provider::nsxt::client::NsxClient;
use nsxt_provider::nsxt::http::format_nsx_error;
use nsxt_provider::resource::{self, Mode};
use nsxt_provider::VERSION;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Manage NSX-T objects from declarative state files
#[derive(Parser, Debug)]
#[command(name = "nsxt-provider", version = VERSION, about, long_about = None)]
struct Args {
    /// NSX manager host or URL
    #[arg(long, global = true)]
    host: Option<String>,

    /// User name for basic authentication
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Password for basic authentication (prefer NSXT_PASSWORD)
    #[arg(long, global = true)]
    password: Option<String>,

    /// Skip TLS certificate verification (`--insecure=false` forces it back on)
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    insecure: Option<bool>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List resource types
    Types,
    /// Print the schema of a resource type
    Schema { resource_type: String },
    /// Check a configuration document without contacting the manager
    Validate {
        resource_type: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Create the object described by a configuration document
    Create {
        resource_type: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Refresh a state document from the manager
    Read {
        resource_type: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Push a state document (with its revision) to the manager
    Update {
        resource_type: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Delete the object named by a state document
    Delete {
        resource_type: String,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Read an existing object by id into a new state document
    Import { resource_type: String, id: String },
    /// Store connection flags (not the password) in the config file
    Configure,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("nsxt-provider {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("nsxt-provider").join("nsxt-provider.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".nsxt-provider").join("nsxt-provider.log");
    }
    PathBuf::from("nsxt-provider.log")
}

fn overrides(args: &Args) -> Overrides {
    Overrides {
        host: args.host.clone(),
        username: args.username.clone(),
        password: args.password.clone(),
        allow_unverified_ssl: args.insecure,
        timeout_secs: args.timeout,
    }
}

fn connect(args: &Args) -> Result<NsxClient> {
    let settings = Config::load().resolve(&overrides(args))?;
    tracing::info!("Using NSX manager {}", settings.base_url);
    NsxClient::new(&settings)
}

fn print_state(d: &resource::ResourceData) -> Result<()> {
    println!("{}", render_state(&d.to_state())?);
    Ok(())
}

async fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Types => {
            for key in resource::get_all_resource_keys() {
                println!("{}", key);
            }
        }
        Command::Schema { resource_type } => {
            let definition = resource::get_resource(resource_type)
                .with_context(|| format!("Unknown resource type: {}", resource_type))?;
            println!("{}", serde_json::to_string_pretty(definition)?);
        }
        Command::Validate {
            resource_type,
            file,
        } => {
            let d = resource::load(resource_type, &read_document(file)?, Mode::Plan)?;
            println!("{}", render_state(&serde_json::Value::Object(d.values().clone()))?);
            eprintln!("Configuration for {} is valid", resource_type);
        }
        Command::Create {
            resource_type,
            file,
        } => {
            let mut d = resource::load(resource_type, &read_document(file)?, Mode::Plan)?;
            let client = connect(args)?;
            resource::create(&client, &mut d).await?;
            print_state(&d)?;
        }
        Command::Read {
            resource_type,
            file,
        } => {
            let mut d = resource::load(resource_type, &read_document(file)?, Mode::Refresh)?;
            let client = connect(args)?;
            resource::read(&client, &mut d).await?;
            print_state(&d)?;
        }
        Command::Update {
            resource_type,
            file,
        } => {
            let mut d = resource::load(resource_type, &read_document(file)?, Mode::Apply)?;
            let client = connect(args)?;
            resource::update(&client, &mut d).await?;
            print_state(&d)?;
        }
        Command::Delete {
            resource_type,
            file,
        } => {
            let mut d = resource::load(resource_type, &read_document(file)?, Mode::Refresh)?;
            let client = connect(args)?;
            resource::delete(&client, &mut d).await?;
            if d.is_absent() {
                eprintln!("{} was already deleted", resource_type);
            }
            println!("null");
        }
        Command::Import { resource_type, id } => {
            let client = connect(args)?;
            let d = resource::import(&client, resource_type, id).await?;
            print_state(&d)?;
        }
        Command::Configure => {
            if args.password.is_some() {
                eprintln!("Passwords are not stored; use NSXT_PASSWORD");
            }
            let mut config = Config::load();
            config.merge(&overrides(args))?;
            let path = config.save()?;
            tracing::info!("Saved configuration to {:?}", path);
            println!("{}", serde_json::to_string_pretty(&config)?);
            eprintln!("Configuration saved to {}", path.display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let log_guard = setup_logging(args.log_level);

    if let Err(err) = run(&args).await {
        tracing::error!("{:#}", err);
        eprintln!("Error: {:#}", err);
        let hint = format_nsx_error(&err);
        if hint != format!("{:#}", err) {
            eprintln!("{}", hint);
        }
        drop(log_guard);
        std::process::exit(1);
    }
}
