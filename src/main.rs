use std::fs::File;
use std::sync::Arc;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use tessera::api::HttpBackend;
use tessera::core::config;
use tessera::core::controller::ChatController;
use tessera::locale::{self, Lang};
use tessera::view;

#[derive(Parser)]
#[command(name = "tessera", about = "Conductor console chat assistant")]
struct Args {
    /// Conductor user id owning the session
    #[arg(short, long)]
    user: String,
    /// Route number sent as conversation context
    #[arg(short, long)]
    route: Option<String>,
    /// Backend base URL override
    #[arg(long)]
    base_url: Option<String>,
    /// UI language
    #[arg(short, long, value_enum)]
    lang: Option<Lang>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to tessera.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("tessera.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Falling back to default config: {e}");
        config::TesseraConfig::default()
    });
    let resolved = config::resolve(
        &file_config,
        args.base_url.as_deref(),
        args.lang,
        args.route.as_deref(),
    );

    log::info!(
        "Tessera starting up: user={}, backend={}",
        args.user,
        resolved.base_url
    );

    let strings = locale::strings(resolved.language);
    let backend = Arc::new(HttpBackend::new(resolved.base_url.clone()));
    let controller = ChatController::new(backend, strings);

    view::run(controller, args.user, resolved.route_number, strings).await
}
