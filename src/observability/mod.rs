//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! dispatcher / rewriter / upstream
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → host log capture (stderr)
//!     → Prometheus scrape (local host only)
//! ```

pub mod logging;
pub mod metrics;
