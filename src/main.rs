//! route-engine command line.
//!
//! ```text
//! route-engine --config routes.toml list
//! route-engine --config routes.toml match GET /posts/15.json
//! route-engine --config routes.toml path post id=15
//! route-engine --config routes.toml export routes.cache.json
//! route-engine --config routes.toml watch
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::json;

use route_engine::config::loader::load_config;
use route_engine::config::watcher::ConfigWatcher;
use route_engine::lifecycle::{boot, draw_fresh, signals, SharedRoutes};
use route_engine::observability::{logging, metrics};
use route_engine::route_set::{AliasRegistry, Endpoint};
use route_engine::routing::Params;

#[derive(Parser)]
#[command(name = "route-engine")]
#[command(about = "Compile, inspect and match Rails-style routes", long_about = None)]
struct Cli {
    /// Route file (TOML).
    #[arg(short, long, default_value = "routes.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every route in matching order
    List,
    /// Recognize a request path
    Match { verb: String, path: String },
    /// Generate the path of an aliased route
    Path {
        alias: String,
        /// Parameters as key=value
        params: Vec<String>,
    },
    /// Draw the routes and write a snapshot
    Export { out: PathBuf },
    /// Keep the routes loaded, reloading when the file changes
    Watch,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        path = %cli.config.display(),
        routes = config.routes.len(),
        "Route file loaded"
    );

    match cli.command {
        Commands::List => {
            let routes = boot(&config, AliasRegistry::new())?;
            for route in &routes {
                let built = route.build()?;
                let target = match built.endpoint() {
                    Some(token) => token.to_string(),
                    None => format!("{:?}", route.to()),
                };
                println!(
                    "{:<16} {:<40} {:<16} {}",
                    built.verbs().join(","),
                    built.path(),
                    built.alias().unwrap_or(""),
                    target
                );
            }
        }
        Commands::Match { verb, path } => {
            let routes = boot(&config, AliasRegistry::new())?;
            match routes.recognize(&path, &verb)? {
                Some(found) => {
                    let endpoint = match found.endpoint() {
                        Endpoint::Action {
                            controller,
                            action,
                            namespaces,
                        } => json!({
                            "controller": controller,
                            "action": action,
                            "namespaces": namespaces,
                        }),
                        Endpoint::Handler(name) => json!({ "handler": name }),
                    };
                    let output = json!({
                        "route": found.route.path(),
                        "endpoint": endpoint,
                        "params": found.params,
                    });
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                None => {
                    eprintln!("No route matches {} {}", verb.to_uppercase(), path);
                    std::process::exit(1);
                }
            }
        }
        Commands::Path { alias, params } => {
            let routes = boot(&config, AliasRegistry::new())?;
            let params = parse_params(&params)?;
            println!("{}", routes.path_for(&alias, &params)?);
        }
        Commands::Export { out } => {
            let routes = draw_fresh(&config, AliasRegistry::new())?;
            routes.export()?.save_to_file(&out)?;
            println!("Wrote {} routes to {}", routes.len(), out.display());
        }
        Commands::Watch => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let shared = Arc::new(SharedRoutes::new(boot(&config, AliasRegistry::new())?));
            let (watcher, updates) = ConfigWatcher::new(&cli.config);
            let watcher = watcher.with_current(config.clone());
            let _watcher = watcher.run()?;
            let reloader = tokio::spawn(shared.clone().run(updates));

            signals::shutdown_signal().await;
            reloader.abort();
            tracing::info!(routes = shared.load().len(), "Stopped watching");
        }
    }

    Ok(())
}

fn parse_params(pairs: &[String]) -> Result<Params, String> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .ok_or_else(|| format!("expected key=value, got '{}'", pair))
        })
        .collect()
}
