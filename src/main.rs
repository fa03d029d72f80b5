use std::fs;
use std::path::Path;
use std::sync::Arc;
use tavern::api;
use tavern::logger::*;
use tavern::server::*;
use tavern::settings::*;
use tokio::signal;
use warp::Filter;

fn check_tls_file(label: &str, path: &str) -> anyhow::Result<()> {
    if !fs::metadata(Path::new(path))?.is_file() {
        return Err(anyhow::anyhow!("TLS {label} is not a regular file: {path}"));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    logger.reload_from_config(&LogConfig {
        filter: project_settings.log.filter.clone(),
    })?;

    let address: std::net::SocketAddr = project_settings.http.address.parse()?;
    check_tls_file("cert", &project_settings.http.cert_path)?;
    check_tls_file("key", &project_settings.http.key_path)?;

    let server = Arc::new(Server::try_new(&project_settings).await?);

    let api_v1 = warp::path("api")
        .and(warp::path("v1"))
        .and(api::v1::routes(server.clone()))
        .recover(api::v1::recover_error);

    info!(%address, "listening");
    warp::serve(api_v1)
        .tls()
        .cert_path(&project_settings.http.cert_path)
        .key_path(&project_settings.http.key_path)
        .bind_with_graceful_shutdown(address, async {
            signal::ctrl_c().await.expect("Could not register SIGINT");
        })
        .1
        .await;

    server.shutdown().await;

    Ok(())
}
