use clap::{Parser, Subcommand};
use mode_normalize::TargetFormat;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use imgconv::api;
use imgconv::models::{AppConfig, FormatInfo, ImageInfo};
use imgconv::server;
use imgconv::services::{download_name, ConversionService};

#[derive(Parser)]
#[command(name = "imgconv")]
#[command(about = "Convert images between PNG and JPEG")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Convert an image file
    Convert {
        /// Input PNG or JPEG file
        input: PathBuf,

        /// Target format: JPG, JPEG or PNG (case-insensitive)
        #[arg(short, long)]
        to: String,

        /// Output file path (default: <stem>_converted.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show format, pixel mode and dimensions of an image file
    Inspect {
        /// Input PNG or JPEG file
        input: PathBuf,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "imgconv API",
        description = "PNG/JPEG image conversion with transparency flattening",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(api::handle_convert, api::handle_inspect, api::handle_formats),
    components(schemas(ImageInfo, FormatInfo)),
    tags((name = "Conversion", description = "Image conversion and inspection"))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert { input, to, output }) => {
            run_convert_command(&input, &to, output.as_deref())
        }
        Some(Commands::Inspect { input, json }) => run_inspect_command(&input, json),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

fn init_cli_logging() {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgconv=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Convert a file on disk (no server needed)
fn run_convert_command(input: &Path, to: &str, output: Option<&Path>) -> anyhow::Result<()> {
    init_cli_logging();

    let target: TargetFormat = to.parse()?;
    let config = AppConfig::from_env();
    let service = ConversionService::from_config(&config);

    let converted = service.convert_file(input, target)?;
    let image = converted.image().clone();

    let dest = match output {
        Some(path) => path.to_path_buf(),
        None => {
            let name = download_name(input.file_name().and_then(|n| n.to_str()), target);
            input.with_file_name(name)
        }
    };
    let dest = converted.persist(&dest)?;

    if image.passthrough {
        println!(
            "Copied {} unchanged ({} is already {})",
            dest.display(),
            input.display(),
            target.name()
        );
    } else {
        println!(
            "Converted {} -> {} ({} {}x{}, {} bytes)",
            input.display(),
            dest.display(),
            image.mode,
            image.width,
            image.height,
            image.bytes.len()
        );
    }

    Ok(())
}

/// Print a header summary of an image file
fn run_inspect_command(input: &Path, json: bool) -> anyhow::Result<()> {
    init_cli_logging();

    let bytes = std::fs::read(input)?;
    let info = ConversionService::default().inspect(&bytes)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("File:         {}", input.display());
        println!("Format:       {}", info.format);
        println!("Mode:         {}", info.mode);
        println!("Size:         {}x{}", info.width, info.height);
        println!("Transparency: {}", if info.has_transparency { "yes" } else { "no" });
        println!("File size:    {:.1} KB", info.size_bytes as f64 / 1024.0);
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();

    println!("imgconv v{VERSION}");
    println!("PNG/JPEG image converter\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    println!("\nConfiguration: {config_source}");

    println!("\nTarget Formats:");
    for token in TargetFormat::TOKENS {
        if let Ok(format) = token.parse::<TargetFormat>() {
            println!("  {token:<5} -> .{} ({})", format.extension(), format.mime_type());
        }
    }

    println!("\nCommands:");
    println!("  imgconv serve     Start the HTTP server");
    println!("  imgconv convert   Convert an image file");
    println!("  imgconv inspect   Show image format and mode");
    println!("\nRun 'imgconv --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "imgconv=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr.clone();
    tracing::info!(
        max_upload_bytes = config.max_upload_bytes,
        optimize_png = config.optimize_png,
        "Configuration loaded"
    );

    let state = server::create_app_state(config)?;

    let app = server::build_router(state)
        // OpenAPI documentation (production only)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "imgconv server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
