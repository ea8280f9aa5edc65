//! Human-readable error descriptions and structured JSON error formatting.

use insole_core::error::{BuildError, InsoleError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingAdc => {
                "What happened: No converter was provided to the sampler.\nLikely causes: The ADC failed to initialize or was not wired into the builder.\nHow to fix: Ensure the converter is created successfully and passed via with_adc(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range filter, acquisition or channel values.\nHow to fix: Edit the config file, then rerun."
            ),
        };
    }

    if let Some(ie) = err.downcast_ref::<InsoleError>() {
        return match ie {
            InsoleError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: A key is missing, misspelled or out of range in the TOML.\nHow to fix: Edit the config file, then rerun. `insole self-check` validates without sampling."
            ),
            InsoleError::Hardware(msg) => format!(
                "What happened: The converter could not be opened ({msg}).\nLikely causes: SPI disabled, wrong chip select, or insufficient permissions.\nHow to fix: Enable SPI, check wiring to CE0, and make sure the user can access /dev/spidev0.0."
            ),
            InsoleError::HardwareFault(msg) => format!(
                "What happened: A sensor read failed ({msg}).\nLikely causes: Loose FSR lead, missing divider resistor, or a channel mapped to the wrong input.\nHow to fix: Check the [[channels]] pins and the sensor wiring, then rerun self-check."
            ),
            InsoleError::Io(msg) => format!(
                "What happened: Writing the data stream failed ({msg}).\nLikely causes: Serial port closed, receiver disconnected, or stdout piped into a process that exited.\nHow to fix: Reconnect the receiver and check [output] port and baud."
            ),
        };
    }

    // String-based heuristics for errors coming from the config or CSV loaders
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("curve csv must have headers") {
        return "Invalid headers in curve CSV. Expected 'upper_raw,slope,pivot,offset_n'.".to_string();
    }

    if lower.contains("curve") && (lower.contains("segment") || lower.contains("csv row")) {
        return format!(
            "What happened: The calibration curve is invalid ({msg}).\nLikely causes: Segment upper bounds out of order or non-numeric cells.\nHow to fix: List segments in increasing upper_raw order with finite numbers."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Build";
    }
    match err.downcast_ref::<InsoleError>() {
        Some(InsoleError::Config(_)) => "Config",
        Some(InsoleError::Hardware(_)) => "Hardware",
        Some(InsoleError::HardwareFault(_)) => "HardwareFault",
        Some(InsoleError::Io(_)) => "Io",
        None => "Error",
    }
}

/// Hardware problems exit with 3 and stream failures with 4; everything else is 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<InsoleError>() {
        Some(InsoleError::Hardware(_) | InsoleError::HardwareFault(_)) => 3,
        Some(InsoleError::Io(_)) => 4,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    json!({
        "reason": reason_name(err),
        "message": humanize(err),
        "exit_code": exit_code_for_error(err),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_errors_pick_their_exit_code() {
        let hw = eyre::Report::new(InsoleError::HardwareFault("adc read failed on pin 36".into()));
        assert_eq!(exit_code_for_error(&hw), 3);
        let io = eyre::Report::new(InsoleError::Io("broken pipe".into()))
            .wrap_err("emit line");
        assert_eq!(exit_code_for_error(&io), 4);
        assert_eq!(exit_code_for_error(&eyre::eyre!("plain")), 1);
    }

    #[test]
    fn json_carries_reason() {
        let err = eyre::Report::new(BuildError::MissingAdc);
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).unwrap();
        assert_eq!(v["reason"], "Build");
        assert!(v["message"].as_str().unwrap().contains("No converter"));
    }

    #[test]
    fn csv_header_hint() {
        let err = eyre::eyre!("curve CSV must have headers 'upper_raw,slope,pivot,offset_n', got: a,b");
        assert!(humanize(&err).starts_with("Invalid headers in curve CSV"));
    }
}
