//! Cache metrics recording.

use metrics::{counter, gauge, histogram};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_counter!("hrcache_hits_total", "Total number of cache hits");
    metrics::describe_counter!("hrcache_misses_total", "Total number of cache misses");
    metrics::describe_counter!(
        "hrcache_invalidated_keys_total",
        "Total number of keys removed by pattern invalidation"
    );
    metrics::describe_counter!(
        "hrcache_store_errors_total",
        "Store failures absorbed by the cache layer"
    );
    metrics::describe_gauge!("hrcache_active", "1 when the cache layer is active");
    metrics::describe_histogram!(
        "hrcache_operation_seconds",
        "Time spent on cache store operations"
    );
}

/// Recorder de metricas de cache.
/// Usa atomic counters internos para maximo rendimiento.
#[derive(Debug, Clone)]
pub struct CacheMetrics {
    hits: Arc<AtomicU64>,
    misses: Arc<AtomicU64>,
    store_errors: Arc<AtomicU64>,
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self {
            hits: Arc::new(AtomicU64::new(0)),
            misses: Arc::new(AtomicU64::new(0)),
            store_errors: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Registra un cache hit
    pub fn record_hit(&self, model: &str) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        counter!("hrcache_hits_total", "model" => model.to_string()).increment(1);
    }

    /// Registra un cache miss
    pub fn record_miss(&self, model: &str) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        counter!("hrcache_misses_total", "model" => model.to_string()).increment(1);
    }

    /// Registra las keys borradas por una invalidacion
    pub fn record_invalidation(&self, model: &str, count: u64) {
        counter!("hrcache_invalidated_keys_total", "model" => model.to_string()).increment(count);
    }

    /// Registra un error del store que fue absorbido (fail open)
    pub fn record_store_error(&self, operation: &str) {
        self.store_errors.fetch_add(1, Ordering::Relaxed);
        counter!(
            "hrcache_store_errors_total",
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    /// Publica el flag global de cache
    pub fn set_active(&self, active: bool) {
        gauge!("hrcache_active").set(if active { 1.0 } else { 0.0 });
    }

    /// Registra la duracion de una operacion
    pub fn record_operation_duration(&self, operation: &str, duration: Duration) {
        histogram!(
            "hrcache_operation_seconds",
            "operation" => operation.to_string()
        )
        .record(duration.as_secs_f64());
    }

    /// Calcula hit rate (para logging/debugging)
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(Ordering::Relaxed) as f64;
        let misses = self.misses.load(Ordering::Relaxed) as f64;
        let total = hits + misses;
        if total == 0.0 { 0.0 } else { hits / total }
    }

    /// Retorna el numero de hits
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Retorna el numero de misses
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Retorna el numero de errores de store absorbidos
    pub fn store_errors(&self) -> u64 {
        self.store_errors.load(Ordering::Relaxed)
    }
}

impl Default for CacheMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_metrics_hit_rate() {
        let metrics = CacheMetrics::new();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_hit("USER");
        metrics.record_hit("USER");
        metrics.record_hit("EMPLOYEE");
        metrics.record_miss("USER");

        let rate = metrics.hit_rate();
        assert!((rate - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_hit_miss_counters() {
        let metrics = CacheMetrics::new();

        assert_eq!(metrics.hits(), 0);
        assert_eq!(metrics.misses(), 0);

        metrics.record_hit("USER");
        metrics.record_hit("USER");
        metrics.record_miss("USER");

        assert_eq!(metrics.hits(), 2);
        assert_eq!(metrics.misses(), 1);
    }

    #[test]
    fn test_clones_share_counters() {
        let metrics = CacheMetrics::new();
        let clone = metrics.clone();

        clone.record_store_error("get");
        clone.record_store_error("set");

        assert_eq!(metrics.store_errors(), 2);
    }
}
