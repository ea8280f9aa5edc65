//! Sensor layout of the insole.

/// Number of force-sensitive resistors on the insole.
pub const CHANNELS: usize = insole_config::CHANNELS;

/// Raw-count calibration bounds: at or below `raw_min` reads as no load,
/// at or above `raw_max` reads as the curve's saturation force.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelBounds {
    pub raw_min: i32,
    pub raw_max: i32,
}

impl Default for ChannelBounds {
    fn default() -> Self {
        Self {
            raw_min: 0,
            raw_max: 3259,
        }
    }
}

/// One FSR. `position_cm` is informational; no computation reads it.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub index: usize,
    pub pin: u8,
    pub position_cm: (f32, f32),
    pub bounds: ChannelBounds,
    pub label: String,
}

const STOCK: [(u8, (f32, f32), &str); CHANNELS] = [
    (36, (3.7, 2.7), "lateral forefoot"),
    (39, (7.0, 2.4), "medial forefoot"),
    (34, (7.0, 6.2), "medial forefoot"),
    (35, (16.5, 4.6), "midfoot"),
    (32, (22.0, 2.8), "lateral heel"),
    (33, (22.0, 6.4), "medial heel"),
];

/// The stock insole wiring, ordered S1..S6.
pub fn stock_layout() -> [Channel; CHANNELS] {
    std::array::from_fn(|i| {
        let (pin, position_cm, label) = STOCK[i];
        Channel {
            index: i,
            pin,
            position_cm,
            bounds: ChannelBounds::default(),
            label: label.to_string(),
        }
    })
}
