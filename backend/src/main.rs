//! DropSend server - receive files from the drag and drop widget
//!
//! ```bash
//! dropsend                                # listen on :8080, save to .
//! dropsend --listen :9000 --path ./inbox  # custom address and directory
//! dropsend --no-progress                  # one line per finished file
//! ```
//!
//! Every flag can also be set through a `DROPSEND_*` environment variable
//! or a `.env` file.

use clap::Parser;
use dropsend::config::{ServerConfig, DEFAULT_LISTEN, DEFAULT_MAX_UPLOAD_MB, DEFAULT_STATIC_DIR};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dropsend")]
#[command(about = "Receive drag and drop uploads and save them to disk", long_about = None)]
struct Cli {
    /// The address to run the web service on
    #[arg(short, long, env = "DROPSEND_LISTEN", default_value = DEFAULT_LISTEN)]
    listen: String,

    /// The directory files are saved to. The file name is provided by the client
    #[arg(short, long, env = "DROPSEND_PATH", default_value = ".")]
    path: PathBuf,

    /// Directory with the compiled widget
    #[arg(long, env = "DROPSEND_STATIC_DIR", default_value = DEFAULT_STATIC_DIR)]
    static_dir: PathBuf,

    /// Disable per-step progress lines
    #[arg(long, env = "DROPSEND_NO_PROGRESS")]
    no_progress: bool,

    /// Largest accepted request body, in megabytes
    #[arg(long, env = "DROPSEND_MAX_UPLOAD_MB", default_value_t = DEFAULT_MAX_UPLOAD_MB)]
    max_upload_mb: u64,
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::new(
        &cli.listen,
        cli.path,
        cli.static_dir,
        !cli.no_progress,
        cli.max_upload_mb,
    )?;
    dropsend::server::start_server(config).await
}
