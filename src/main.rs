mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use mediamorph::{config, server};
use mediamorph_db::{pool::init_pool, store::SessionStore};

async fn serve(
    config_path: Option<&std::path::Path>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    tracing::info!("Starting mediamorph server");

    let transcoder = mediamorph_av::check_tool(&config.conversion.transcoder);
    if !transcoder.available {
        tracing::warn!(
            tool = %config.conversion.transcoder,
            "external transcoder not found; audio/video conversions will fail"
        );
    }

    tracing::info!("Initializing database at {}", config.storage.db_path);
    let pool = init_pool(&config.storage.db_path)?;
    let store = SessionStore::new(pool, config.sessions.timeout_secs);

    let ctx = server::AppContext::new(config, store);
    server::start_server(ctx).await
}

fn check_tools(config: &config::Config) {
    let info = mediamorph_av::check_tool(&config.conversion.transcoder);
    if info.available {
        println!(
            "{}: available ({})",
            info.name,
            info.version.as_deref().unwrap_or("unknown version")
        );
        if let Some(path) = info.path {
            println!("  path: {}", path.display());
        }
    } else {
        println!("{}: NOT FOUND", info.name);
        std::process::exit(1);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG if set, otherwise use defaults based on the verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediamorph=trace,mediamorph_db=debug,mediamorph_av=debug,tower_http=debug".to_string()
        } else {
            "mediamorph=debug,mediamorph_db=info,mediamorph_av=info,tower_http=info".to_string()
        }
    });
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Commands::Serve { host, port } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(serve(cli.config.as_deref(), host, port))
        }
        Commands::CheckTools => {
            let config = config::load_config_or_default(cli.config.as_deref())?;
            check_tools(&config);
            Ok(())
        }
        Commands::Validate { config } => {
            let path = config.or(cli.config);
            config::load_config_or_default(path.as_deref())?;
            println!("Configuration OK");
            Ok(())
        }
    }
}
