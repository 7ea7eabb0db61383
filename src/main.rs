use std::env;
use std::process;
use std::sync::Arc;

use crema::{config::Config, server::run_server, CardLoader, CardSource};

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let loader = CardLoader::new(&config)?;
    match env::args().nth(1).as_deref() {
        None => {
            let card = loader.load_card().await?;
            println!("{}", serde_json::to_string_pretty(&card)?);
            Ok(())
        }
        Some("serve") => run_server(Arc::new(loader), config.port).await,
        Some(other) => anyhow::bail!("Unknown command {:?}, try `serve`", other),
    }
}

#[tokio::main]
async fn main() {
    better_panic::install();
    env_logger::init();

    if let Err(err) = run().await {
        eprintln!("{:?}", err);
        process::exit(1);
    }
}
