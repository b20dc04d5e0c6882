//! Redis-backed store.

use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::traits::CacheStore;

const SCAN_BATCH: usize = 500;

/// Redis connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis host
    pub host: String,
    /// Redis port
    pub port: u16,
    /// Database number
    pub database: u8,
    /// Password (optional)
    pub password: Option<String>,
    /// Connect over TLS (`rediss://`)
    pub tls: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6380,
            database: 0,
            password: None,
            tls: false,
        }
    }
}

impl RedisConfig {
    /// Builds the connection URL.
    pub fn build_url(&self) -> String {
        let scheme = if self.tls { "rediss" } else { "redis" };
        match &self.password {
            Some(password) => format!(
                "{}://:{}@{}:{}/{}",
                scheme,
                urlencoding::encode(password),
                self.host,
                self.port,
                self.database
            ),
            None => format!("{}://{}:{}/{}", scheme, self.host, self.port, self.database),
        }
    }
}

/// Store backed by a shared Redis server.
///
/// Key enumeration walks `SCAN MATCH` so the server is never blocked, bulk delete uses a single `DEL`, and
/// `clear` issues `FLUSHDB` on the configured database.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    config: RedisConfig,
}

impl RedisStore {
    /// Connects to Redis.
    pub async fn connect(config: RedisConfig) -> Result<Self, StoreError> {
        info!(
            host = %config.host,
            port = config.port,
            db = config.database,
            tls = config.tls,
            "Connecting to Redis cache store"
        );

        let client = Client::open(config.build_url())
            .map_err(|e| StoreError::unavailable_with_cause("redis", "invalid Redis URL", e))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreError::unavailable_with_cause("redis", "connection failed", e))?;

        Ok(Self { connection, config })
    }

    /// Returns the connection settings.
    pub fn config(&self) -> &RedisConfig {
        &self.config
    }
}

fn scan_command(cursor: u64, pattern: &str) -> redis::Cmd {
    let mut cmd = redis::cmd("SCAN");
    cmd.arg(cursor)
        .arg("MATCH")
        .arg(pattern)
        .arg("COUNT")
        .arg(SCAN_BATCH);
    cmd
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        // SETEX no acepta 0 segundos
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds).await?;
        Ok(())
    }

    async fn keys(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let mut conn = self.connection.clone();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) =
                scan_command(cursor, pattern).query_async(&mut conn).await?;
            keys.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        // SCAN puede devolver la misma key mas de una vez
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<u64, StoreError> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.connection.clone();
        let deleted: u64 = conn.del(keys.to_vec()).await?;

        debug!(requested = keys.len(), deleted = deleted, "Redis keys deleted");
        Ok(deleted)
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        redis::cmd("FLUSHDB").query_async::<()>(&mut conn).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "redis"
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        let response: String = redis::cmd("PING").query_async(&mut conn).await?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(StoreError::unavailable(
                "redis",
                format!("unexpected PING response: {}", response),
            ))
        }
    }
}
