//! SSR host binary. Built with `--features ssr`; the browser bundle comes
//! from the library's `hydrate` entry point.

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() {
    use todo_client::host;

    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let config = match host::config::HostConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid host configuration");
            std::process::exit(2);
        }
    };
    let app = match host::app(&config) {
        Ok(app) => app,
        Err(e) => {
            tracing::error!(error = %e, "failed to assemble router");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, port = config.port, "failed to bind");
            std::process::exit(1);
        }
    };
    tracing::info!(port = config.port, upstream = %config.api_upstream, "todo-client listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server failed");
    }
}

#[cfg(not(feature = "ssr"))]
fn main() {}
