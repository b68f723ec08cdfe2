#[tokio::main]
async fn main() -> vassist::error::Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("vassist=info,reqwest=warn"),
    )
    .init();
    log::info!("Starting virtual assistant server");

    match vassist::run().await {
        Ok(()) => {
            log::info!("Server shut down successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Server encountered an error: {}", e);
            Err(e)
        }
    }
}
