use clap::Parser;
use dotenv::dotenv;
use log::error;
use sms_relay::cli::Args;
use sms_relay::config::Config;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenv().ok();
    let args = Args::parse();
    sms_relay::logging::init(&args.log_level, &args.log_file);

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            error!("Error loading config: {}", e);
            return Err(e.into());
        }
    };

    sms_relay::run(config).await
}
