//! Pure threat-detection functions.
//!
//! Stateless and CPU-bound; the analytics aggregator calls these per
//! record, and nothing here touches storage.

mod detector;

pub use detector::{detect_bot_traffic, detect_geo_anomaly, detect_timing_attack, BotDetection};
