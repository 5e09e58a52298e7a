//! memview CLI
//!
//! Command-line interface for inspecting a cache server.

use clap::{Parser, Subcommand};
use memview::{ActionRequest, Admin, Config, KeyTransformConfig, ServerAddress, ServerConfig};
use serde_json::json;
use tracing_subscriber::{fmt, EnvFilter};

/// memview CLI
#[derive(Parser, Debug)]
#[command(name = "memview-cli")]
#[command(about = "Inspect and edit entries on a memcached server")]
#[command(version)]
struct Args {
    /// Server address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:11211")]
    server: String,

    /// Display name for the server
    #[arg(short, long, default_value = "")]
    alias: String,

    /// Application name used to namespace keys
    #[arg(short, long)]
    namespace: Option<String>,

    /// Also MD5 the namespaced key (requires --namespace)
    #[arg(long, requires = "namespace")]
    hash: bool,

    /// Connect, read and write timeout in milliseconds (0 = none)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show server statistics
    Stats,

    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,

        /// Expiration in seconds; non-numeric means 0
        #[arg(short, long, default_value = "0")]
        exp_time: String,
    },

    /// Delete a key
    Delete {
        /// The key to delete
        key: String,
    },

    /// Invalidate every item
    FlushAll,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,memview=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let address = match ServerAddress::parse(&args.server) {
        Ok(a) => a,
        Err(e) => fail(&e.to_string()),
    };

    let mut server = ServerConfig::new(address).with_alias(&args.alias);
    if let Some(namespace) = &args.namespace {
        server = server.with_key_transform(KeyTransformConfig::new(namespace, args.hash));
    }
    let name = server.name();

    let config = Config::builder()
        .server(server)
        .connect_timeout_ms(args.timeout_ms)
        .read_timeout_ms(args.timeout_ms)
        .write_timeout_ms(args.timeout_ms)
        .build();
    let admin = Admin::new(config);

    let request = match args.command {
        Commands::Stats => {
            match admin.stats(Some(name.as_str())) {
                Ok(summary) => succeed(json!(summary)),
                Err(e) => fail(&e.to_string()),
            }
        }
        Commands::Get { key } => ActionRequest::Get { key },
        Commands::Set {
            key,
            value,
            exp_time,
        } => ActionRequest::from_fields("set", Some(key.as_str()), Some(value.as_str()), Some(exp_time.as_str()))
            .unwrap_or_else(|e| fail(&e.to_string())),
        Commands::Delete { key } => ActionRequest::Delete { key },
        Commands::FlushAll => ActionRequest::FlushAll,
    };

    match admin.execute(&name, &request) {
        Ok(outcome) => succeed(json!(outcome)),
        Err(e) => fail(&e.to_string()),
    }
}

fn succeed(data: serde_json::Value) -> ! {
    println!("{}", json!({ "status": "success", "data": data }));
    std::process::exit(0);
}

fn fail(msg: &str) -> ! {
    println!("{}", json!({ "status": "failure", "msg": msg }));
    std::process::exit(1);
}
