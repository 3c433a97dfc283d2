use anyhow::Result;
use clap::Parser;

use qrlink::cli::{Cli, Commands};
use qrlink::config::{get_config, init_config};
use qrlink::runtime::modes;
use qrlink::system::init_logging;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_config(cli.config.as_deref());
    let config = get_config();

    match cli.command {
        None | Some(Commands::Serve) => {
            // guard 需存活到进程结束，保证日志落盘
            let _guard = init_logging(&config.logging)?;
            modes::run_server(&config).await
        }
        Some(cmd) => {
            if let Err(e) = modes::run_cli(cmd, &config).await {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
