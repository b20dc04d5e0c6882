//! Middleware stack para el servidor HTTP.
//!
//! - `RequestIdLayer`: genera/propaga X-Request-Id
//! - `LoggingLayer`: logging estructurado de requests
//!
//! `RequestIdLayer` debe ir por fuera de `LoggingLayer`.

mod logging;
mod request_id;

pub use logging::{LoggingLayer, LoggingMiddleware};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdLayer, RequestIdMiddleware};
