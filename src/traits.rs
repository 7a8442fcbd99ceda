//! Shared trait abstractions
//!
//! The layer trait every map layer implements and the retry policy the feed
//! loader consults between attempts.

use crate::{
    core::geo::LatLngBounds,
    layers::base::LayerType,
    Result,
};
use std::time::Duration;

/// Trait for layer-like objects
pub trait LayerOperations: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name, as shown in the layer control
    fn name(&self) -> &str;

    /// Get layer type
    fn layer_type(&self) -> LayerType;

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Get layer opacity (0.0 to 1.0)
    fn opacity(&self) -> f32;

    /// Set layer opacity
    fn set_opacity(&mut self, opacity: f32);

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    /// Set layer z-index
    fn set_z_index(&mut self, z_index: i32);

    /// Get layer bounds if applicable
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Layer options in the shape the mapping library expects
    fn options(&self) -> serde_json::Value;

    /// Set layer options
    fn set_options(&mut self, options: serde_json::Value) -> Result<()>;
}

/// Bounded retry with optional exponential backoff
pub trait RetryPolicy {
    /// Retries allowed after the first attempt
    fn max_retries(&self) -> u32;

    /// Delay before the first retry
    fn base_delay(&self) -> Duration;

    /// Whether the delay doubles on each retry
    fn exponential_backoff(&self) -> bool;

    /// Delay to wait before retry number `retry` (1-based)
    fn delay_for_retry(&self, retry: u32) -> Duration {
        backoff_delay(retry, self.base_delay(), self.exponential_backoff())
    }

    /// Whether attempt number `attempt` (1-based) may be followed by another
    fn should_retry(&self, attempt: u32) -> bool {
        attempt <= self.max_retries()
    }
}

/// Standard backoff computation
pub fn backoff_delay(retry: u32, base: Duration, exponential_backoff: bool) -> Duration {
    if !exponential_backoff || retry <= 1 {
        return base;
    }
    // 2^31 * base already overflows any sane delay
    let multiplier = 2_u32.saturating_pow(retry.saturating_sub(1).min(31));
    base.saturating_mul(multiplier)
}
