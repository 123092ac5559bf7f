use std::sync::Arc;

use advert_service::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_tracing(&config);

    let pool = create_pool(&config.database).await.map_err(|e| {
        tracing::error!("Startup aborted: {}", e);
        e
    })?;

    let bucket = Arc::new(TokenBucket::from_config(&config.rate_limit)?);
    let state = AppState::new(config.clone(), Arc::new(PgCatalog::new(pool)));

    Server::new(config).serve(router(state, bucket)).await
}
