use std::{net::SocketAddr, path::Path, sync::Arc};

use clap::Parser;
use color_eyre::{Result, eyre::Context};
use switchyard::{
    Arg, Engine, HandlerOutcome, Request, Response, RouteConfig, RouteTable,
    config::{EngineConfigValidator, load_config, models::EngineConfig},
    core::layers,
    ports::handler::HandlerError,
    tracing_setup,
};

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(short, long, default_value = "switchyard.toml")]
    config: String,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        #[clap(short, long, default_value = "switchyard.toml")]
        config: String,
    },
    /// Initialize a new configuration file
    Init {
        /// Output path for the new config file
        #[clap(short, long, default_value = "switchyard.toml")]
        config: String,
    },
    /// Start the demo server (default)
    Serve {
        /// Configuration file to use
        #[clap(short, long, default_value = "switchyard.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    let (command, config_path) = match args.command {
        Some(Commands::Validate { config }) => ("validate", config),
        Some(Commands::Init { config }) => ("init", config),
        Some(Commands::Serve { config }) => ("serve", config),
        None => ("serve", args.config),
    };

    match command {
        "validate" => validate_config_command(&config_path),
        "init" => init_config_command(&config_path),
        "serve" => serve_command(&config_path).await,
        _ => unreachable!(),
    }
}

async fn serve_command(config_path: &str) -> Result<()> {
    let config = if Path::new(config_path).exists() {
        load_config(config_path)
            .with_context(|| format!("Failed to load config from {config_path}"))?
    } else {
        EngineConfig::default()
    };
    EngineConfigValidator::validate(&config)?;

    tracing_setup::init_tracing_with_config(&config.logging.level, config.logging.json)
        .context("Failed to initialize tracing")?;

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address {}", config.listen_addr))?;

    let mut engine = Engine::from_config(&config);
    register_demo_routes(engine.table_mut())?;

    // Last pushed runs first: timing wraps CORS wraps the dispatch.
    engine.chain_mut().push(layers::allow_cross_origin);
    engine.chain_mut().push(layers::request_timing);

    tracing::info!(routes = engine.table().len(), "engine ready");
    switchyard::adapters::serve(Arc::new(engine), addr).await
}

fn register_demo_routes(table: &mut RouteTable) -> Result<()> {
    table.get("/", hello, RouteConfig::new())?;
    table.get("/hello/@name", greet, RouteConfig::new())?;
    table.get("/user/@id:[0-9]+", user_profile, RouteConfig::new())?;
    table.get("/feed", feed, RouteConfig::new())?;

    let mut files_config = RouteConfig::new();
    files_config.insert("pass_route".to_string(), serde_json::json!(true));
    table.get("/files/*", file_listing, files_config)?;

    Ok(())
}

fn hello(_request: &Request, _args: &[Arg]) -> Result<HandlerOutcome, HandlerError> {
    Ok(HandlerOutcome::output("Hello from switchyard!"))
}

fn greet(_request: &Request, args: &[Arg]) -> Result<HandlerOutcome, HandlerError> {
    let name = args.first().and_then(Arg::as_str).unwrap_or("world");
    Ok(HandlerOutcome::output(format!("Hello {name}!")))
}

fn user_profile(_request: &Request, args: &[Arg]) -> Result<HandlerOutcome, HandlerError> {
    let id = args.first().and_then(Arg::as_str).unwrap_or_default();
    let response = Response::json(&serde_json::json!({ "id": id, "name": "demo user" }), 200)?;
    Ok(response.into())
}

fn feed(request: &Request, _args: &[Arg]) -> Result<HandlerOutcome, HandlerError> {
    let callback = request
        .query_param("jsonp")
        .unwrap_or_else(|| "callback".to_string());
    let response = Response::jsonp(&serde_json::json!(["one", "two"]), &callback, 200)?;
    Ok(response.into())
}

fn file_listing(_request: &Request, args: &[Arg]) -> Result<HandlerOutcome, HandlerError> {
    let splat = args
        .iter()
        .rev()
        .find_map(Arg::as_route)
        .map(|matched| matched.splat().to_string())
        .unwrap_or_default();
    Ok(HandlerOutcome::output(format!("requested path: {splat}")))
}

fn validate_config_command(config_path: &str) -> Result<()> {
    println!("🔍 Validating configuration file: {config_path}");

    if !Path::new(config_path).exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' not found");
        std::process::exit(1);
    }

    let config = match load_config(config_path) {
        Ok(config) => {
            println!("✅ Configuration parsing: OK");
            config
        }
        Err(e) => {
            eprintln!("❌ Configuration parsing failed:");
            eprintln!("   {e}");
            std::process::exit(1);
        }
    };

    match EngineConfigValidator::validate(&config) {
        Ok(()) => {
            println!("✅ Configuration validation: OK");
            println!();
            println!("📋 Configuration Summary:");
            println!("   • Listen Address: {}", config.listen_addr);
            println!("   • Case-Sensitive Matching: {}", config.case_sensitive);
            println!(
                "   • Base URL: {}",
                config.base_url.as_deref().unwrap_or("(none)")
            );
            println!("   • Log Level: {}", config.logging.level);
            println!();
            println!("🎉 Configuration is valid and ready to use!");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn init_config_command(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);
    if path.exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' already exists");
        std::process::exit(1);
    }

    let default_config = r#"# Switchyard configuration

# The address the demo server binds to
listen_addr = "127.0.0.1:8080"

# Compare route patterns against paths case-sensitively
case_sensitive = false

# Prepended to relative redirect targets
# base_url = "/app"

[logging]
# Env-filter directive, e.g. "info" or "switchyard=debug"
level = "info"
# Emit JSON lines instead of the console format
json = false
"#;

    std::fs::write(path, default_config)
        .with_context(|| format!("Failed to write {config_path}"))?;

    println!("✅ Created configuration file: {config_path}");
    println!("   Edit it to suit your deployment, then run `switchyard serve`.");
    Ok(())
}
