//! GPIO pin configurator data
//!
//! Bookkeeping only: the dashboard records which device is wired to which
//! header pin. Nothing here touches hardware.

use crate::error::{AdminError, Result};
use crate::history::MessageStore;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Settings-table key holding the saved layout
pub const LAYOUT_KEY: &str = "gpio.pins";

/// Electrical role of a header pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinKind {
    Power,
    Ground,
    Gpio,
    Special,
}

/// One position on the 40-pin header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeaderPin {
    pub number: u8,
    pub label: &'static str,
    pub kind: PinKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<&'static str>,
}

const fn pin(number: u8, label: &'static str, kind: PinKind) -> HeaderPin {
    HeaderPin {
        number,
        label,
        kind,
        function: None,
    }
}

const fn named(number: u8, label: &'static str, function: &'static str) -> HeaderPin {
    HeaderPin {
        number,
        label,
        kind: PinKind::Gpio,
        function: Some(function),
    }
}

use PinKind::{Ground, Gpio, Power, Special};

static HEADER: [HeaderPin; 40] = [
    pin(1, "3.3V", Power),
    pin(2, "5V", Power),
    named(3, "GPIO 2 (SDA)", "I2C SDA"),
    pin(4, "5V", Power),
    named(5, "GPIO 3 (SCL)", "I2C SCL"),
    pin(6, "Ground", Ground),
    pin(7, "GPIO 4", Gpio),
    pin(8, "GPIO 14", Gpio),
    pin(9, "Ground", Ground),
    pin(10, "GPIO 15", Gpio),
    pin(11, "GPIO 17", Gpio),
    pin(12, "GPIO 18", Gpio),
    pin(13, "GPIO 27", Gpio),
    pin(14, "Ground", Ground),
    pin(15, "GPIO 22", Gpio),
    pin(16, "GPIO 23", Gpio),
    pin(17, "3.3V", Power),
    pin(18, "GPIO 24", Gpio),
    pin(19, "GPIO 10", Gpio),
    pin(20, "Ground", Ground),
    pin(21, "GPIO 9", Gpio),
    pin(22, "GPIO 25", Gpio),
    pin(23, "GPIO 11", Gpio),
    pin(24, "GPIO 8", Gpio),
    pin(25, "Ground", Ground),
    pin(26, "GPIO 7", Gpio),
    pin(27, "ID_SD", Special),
    pin(28, "ID_SC", Special),
    pin(29, "GPIO 5", Gpio),
    pin(30, "Ground", Ground),
    pin(31, "GPIO 6", Gpio),
    pin(32, "GPIO 12", Gpio),
    pin(33, "GPIO 13", Gpio),
    pin(34, "Ground", Ground),
    pin(35, "GPIO 19", Gpio),
    pin(36, "GPIO 16", Gpio),
    pin(37, "GPIO 26", Gpio),
    pin(38, "GPIO 20", Gpio),
    pin(39, "Ground", Ground),
    pin(40, "GPIO 21", Gpio),
];

/// The full header, ordered by physical pin number
pub fn header() -> &'static [HeaderPin] {
    &HEADER
}

/// Look up a physical pin
pub fn header_pin(number: u8) -> Option<&'static HeaderPin> {
    HEADER.get(usize::from(number).checked_sub(1)?)
}

/// Intended use of a pin, as shown in the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PinMode {
    Out,
    In,
    Pwm,
    I2c,
    Spi,
}

/// A device assignment on one pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinConfiguration {
    /// Physical header position, 1..=40
    pub pin: u8,
    pub mode: PinMode,
    /// Free-text device description
    pub label: String,
}

/// Check a layout before it is saved
///
/// Pins must exist, carry a signal (not power or ground), and appear once.
pub fn validate_layout(layout: &[PinConfiguration]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in layout {
        let header = header_pin(entry.pin).ok_or_else(|| {
            AdminError::InvalidRequest(format!("Pin {} is outside 1-40", entry.pin))
        })?;
        if matches!(header.kind, PinKind::Power | PinKind::Ground) {
            return Err(AdminError::InvalidRequest(format!(
                "Pin {} is {} and cannot be assigned",
                entry.pin, header.label
            ))
            .into());
        }
        if !seen.insert(entry.pin) {
            return Err(
                AdminError::InvalidRequest(format!("Pin {} is assigned twice", entry.pin)).into(),
            );
        }
    }
    Ok(())
}

/// Saved layout, empty when nothing was saved yet
pub fn load_layout(store: &MessageStore) -> Result<Vec<PinConfiguration>> {
    match store.get_setting(LAYOUT_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Validate and persist a layout, replacing the previous one
pub fn save_layout(store: &MessageStore, layout: &[PinConfiguration]) -> Result<()> {
    validate_layout(layout)?;
    store.set_setting(LAYOUT_KEY, &serde_json::to_string(layout)?)?;
    tracing::info!(pins = layout.len(), "gpio layout saved");
    Ok(())
}
