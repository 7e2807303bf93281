//! Store client - read-only Redis access to the fleet snapshot key.

use async_trait::async_trait;
use fleet_common::FleetError;
use redis::AsyncCommands;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Read side of the external key-value store.
///
/// `None` means the key is not set, which is distinct from an empty
/// snapshot. The loop tests against an injected in-memory implementation.
#[async_trait]
pub trait SnapshotStore: Send {
    async fn fetch_blob(&mut self) -> Result<Option<String>, FleetError>;
}

/// Redis-backed store client. The connection is opened once at startup
/// and reused for the process lifetime; there is no reconnect logic.
pub struct RedisStore {
    conn: redis::aio::MultiplexedConnection,
    key: String,
}

impl RedisStore {
    /// Connect and ping, failing fast if the store is unreachable.
    pub async fn connect(url: &str, key: &str) -> Result<Self, FleetError> {
        let client = redis::Client::open(url)
            .map_err(|e| FleetError::Connection(format!("invalid store URL {}: {}", url, e)))?;

        let connect = client.get_multiplexed_async_connection();
        let mut conn = match tokio::time::timeout(CONNECT_TIMEOUT, connect).await {
            Ok(Ok(conn)) => conn,
            Ok(Err(e)) => {
                return Err(FleetError::Connection(format!(
                    "store unreachable at {}: {}",
                    url, e
                )))
            }
            Err(_) => {
                return Err(FleetError::Connection(format!(
                    "timed out connecting to {}",
                    url
                )))
            }
        };

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| FleetError::Connection(format!("store ping failed: {}", e)))?;
        debug!(%pong, url, "store connection established");

        Ok(Self {
            conn,
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl SnapshotStore for RedisStore {
    async fn fetch_blob(&mut self) -> Result<Option<String>, FleetError> {
        self.conn
            .get(&self.key)
            .await
            .map_err(|e| FleetError::Connection(format!("store read failed: {}", e)))
    }
}
