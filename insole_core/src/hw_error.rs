//! Maps `Box<dyn Error>` from trait boundaries to typed `InsoleError`.
//!
//! The traits in `insole_traits` use `Box<dyn Error + Send + Sync>`; this
//! module converts those to our typed error enum, with an optional
//! feature-gated path for `insole_hardware::HwError` downcasting.

use crate::error::InsoleError;

/// Map a trait-boundary error to a typed `InsoleError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to string-based heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> InsoleError {
    #[cfg(feature = "hardware-errors")]
    {
        use insole_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::Resolution(_) => InsoleError::Config(hw.to_string()),
                HwError::Io(io) => InsoleError::Io(io.to_string()),
                other => InsoleError::HardwareFault(other.to_string()),
            };
        }
    }

    if let Some(io) = e.downcast_ref::<std::io::Error>() {
        return InsoleError::Io(io.to_string());
    }
    InsoleError::Hardware(e.to_string())
}

/// Convenience for `Box<dyn Error + Send + Sync>` values.
pub fn map_hw_error_dyn(e: &(dyn std::error::Error + Send + Sync + 'static)) -> InsoleError {
    map_hw_error(e)
}
