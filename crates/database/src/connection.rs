use crate::error::DbError;
use configuration::ServerConfig;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Connection;
use std::time::Duration;

/// Builds connect options from the admin settings.
///
/// Credentials go through the options builder rather than a DSN string, so special
/// characters in the admin password need no escaping.
pub fn connect_options(config: &ServerConfig) -> Result<MySqlConnectOptions, DbError> {
    if config.username.trim().is_empty() || config.hostname.trim().is_empty() {
        return Err(DbError::ConnectionConfig(
            "config missing required fields (username/hostname/port)".to_string(),
        ));
    }
    if config.port == 0 {
        return Err(DbError::ConnectionConfig("port must not be 0".to_string()));
    }

    Ok(MySqlConnectOptions::new()
        .host(&config.hostname)
        .port(config.port)
        .username(&config.username)
        .password(&config.password)
        .charset("utf8mb4"))
}

/// Opens the single connection used for a whole invocation and pings it.
///
/// Provisioning is strictly sequential, so the pool never holds more than one
/// connection. Both the connect and the ping are bounded by `timeout`.
pub async fn connect(config: &ServerConfig, timeout: Duration) -> Result<MySqlPool, DbError> {
    let options = connect_options(config)?;

    let pool = MySqlPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(timeout)
        .connect_lazy_with(options);

    let ping = async {
        let mut conn = pool.acquire().await.map_err(DbError::Connection)?;
        conn.ping().await.map_err(DbError::Connection)
    };
    let outcome = match tokio::time::timeout(timeout, ping).await {
        Ok(result) => result,
        Err(_) => Err(DbError::ConnectTimeout(timeout)),
    };
    if let Err(e) = outcome {
        pool.close().await;
        return Err(e);
    }

    tracing::info!(host = %config.hostname, port = config.port, "connected to server");
    Ok(pool)
}
