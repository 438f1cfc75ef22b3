use std::net::SocketAddr;
use vnpay_gateway::{config::GatewayConfig, router};

/// Standalone payment gateway adapter.
///
/// Exposes `/sign`, `/return`, `/ipn` and `/health`.
///
/// # Configuration
/// Environment variables:
/// - `VNPAY_TMN_CODE`: merchant code (required)
/// - `VNPAY_HASH_SECRET`: shared secret key (required)
/// - `VNPAY_URL`: gateway payment URL (default: sandbox)
/// - `VNPAY_RETURN_URL`: default return URL
/// - `VNPAY_FALLBACK_IP`: IPv4 sent for IPv6 or missing clients (default: 127.0.0.1)
/// - `VNPAY_EXPIRE_MINUTES`: adds `vnp_ExpireDate` when set (at most 7 days)
/// - `PORT`: HTTP listen port (default: 8080)
/// - `RUST_LOG`: logging verbosity (default: "vnpay_gateway=debug,tower_http=debug")
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vnpay_gateway=debug,tower_http=debug".into())
        )
        .init();

    tracing::info!("Starting payment gateway adapter");

    let expire_after = match std::env::var("VNPAY_EXPIRE_MINUTES") {
        Ok(minutes) => {
            let window = minutes
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(GatewayConfig::expire_window_from_minutes)
                .ok_or_else(|| format!("VNPAY_EXPIRE_MINUTES is not a usable number of minutes: {}", minutes))?;
            Some(window)
        }
        Err(_) => None,
    };

    let defaults = GatewayConfig::default();
    let cfg = GatewayConfig {
        merchant_code: std::env::var("VNPAY_TMN_CODE").unwrap_or_default(),
        secret_key: std::env::var("VNPAY_HASH_SECRET").unwrap_or_default(),
        gateway_url: std::env::var("VNPAY_URL").unwrap_or(defaults.gateway_url.clone()),
        return_url: std::env::var("VNPAY_RETURN_URL").unwrap_or_default(),
        fallback_ip: std::env::var("VNPAY_FALLBACK_IP").unwrap_or(defaults.fallback_ip.clone()),
        expire_after,
        ..defaults
    };
    tracing::debug!(config = ?cfg, "Loaded configuration");

    let app = router(cfg)?;

    let port = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse::<u16>()
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Server listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
