use folio_config::Config;
use tracing::info;

use crate::{
    email,
    environment::{ConfigProvider, Provider},
};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    let email = email::connect(&config.email).await?;

    let provider = Provider::new(ConfigProvider::new(&config), email)?;
    let server = provider.rest_server();
    info!(
        "Starting http server on {}:{}",
        config.http.host, config.http.port
    );
    server.serve().await
}
