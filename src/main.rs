//! Command-line interface for xsd-docs

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use tracing::info;
#[cfg(feature = "cli")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "cli")]
use xsd_docs::config::{Cli, Commands, ExtractArgs, ServeArgs};
#[cfg(feature = "cli")]
use xsd_docs::extractor::extract_with_limits;
#[cfg(feature = "cli")]
use xsd_docs::loaders::Loader;
#[cfg(feature = "cli")]
use xsd_docs::locations::Location;
#[cfg(feature = "cli")]
use xsd_docs::server::{create_router, AppState};

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so `extract` output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("xsd_docs=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Serve(args) => cmd_serve(args).await,
        Commands::Extract(args) => cmd_extract(args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
async fn cmd_serve(args: ServeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let loader = Loader::new(&args.fetch.fetch_config())?;
    let app = create_router(AppState::new(loader));

    let addr = args.listen_addr();
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "cli")]
async fn cmd_extract(args: ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    let loader = Loader::new(&args.fetch.fetch_config())?;
    let location: Location = args.source.parse()?;

    let xml = loader.load(&location).await?;
    let result = extract_with_limits(&xml, loader.limits())?;

    let json_str = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };

    if let Some(output_path) = args.output {
        tokio::fs::write(output_path, &json_str).await?;
    } else {
        println!("{}", json_str);
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
