use clap::{Parser, Subcommand};

use waypoint_core::config::Config;
use waypoint_core::types::ToolCallRequest;
use waypoint_session::bootstrap_session;

#[derive(Parser)]
#[command(
    name = "waypoint",
    about = "Diagnostics for the Waypoint voice-agent tool surface",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tools a session would advertise
    Tools,

    /// Dispatch a single tool call and print the result
    Call {
        /// Tool name
        name: String,

        /// Arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Config::config_path);
    let config = Config::load(&config_path)?;

    match cli.command {
        Commands::Tools => {
            let setup = bootstrap_session(&config)?;
            for decl in &setup.declarations {
                let handled = if setup.registry.has_handler(&decl.name) {
                    ""
                } else {
                    "  (external handler)"
                };
                println!("{}{handled}", decl.name);
                println!("    {}", decl.description);
                if let Some(schema) = &decl.parameters {
                    for (field, spec) in &schema.properties {
                        let req = if schema.is_required(field) {
                            "required"
                        } else {
                            "optional"
                        };
                        println!("    - {field} ({req}, {:?})", spec.param_type);
                    }
                }
            }
        }
        Commands::Call { name, args } => {
            let arguments: serde_json::Value = serde_json::from_str(&args)
                .map_err(|e| anyhow::anyhow!("--args is not valid JSON: {e}"))?;

            let setup = bootstrap_session(&config)?;
            let request = ToolCallRequest::new(&name, arguments);
            tracing::info!(tool = %name, call_id = %request.call_id, "Dispatching");

            let result = setup.registry.dispatch_and_wait(request).await;
            println!("{}", serde_json::to_string_pretty(&result)?);

            if result.is_error() {
                std::process::exit(1);
            }
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
