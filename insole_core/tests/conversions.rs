use std::time::Duration;

use insole_config::{AttenuationCfg, CurveSegment, load_toml};
use insole_core::calibration::STOCK_SEGMENTS;
use insole_core::conversions::{attenuation_from_config, channels_from_config, curve_from_config};
use insole_core::{AcquisitionCfg, AdcSetup, ChannelBounds, KalmanCfg, LoopCfg};
use insole_traits::Attenuation;
use rstest::rstest;

const CUSTOM: &str = r#"
[adc]
attenuation = "db6"

[acquisition]
samples = 4
settle_us = 250

[filter]
process_noise = 2.0
measurement_noise = 10.0
initial_covariance = 50.0

[output]
cycle_delay_ms = 20

[[channels]]
pin = 0
x_cm = 1.0
y_cm = 1.0
raw_max = 3000
[[channels]]
pin = 1
label = "toe"
[[channels]]
pin = 2
[[channels]]
pin = 3
[[channels]]
pin = 4
raw_min = 100
[[channels]]
pin = 5

[curve]
cap_n = 500.0
segments = [[3000.0, 0.1, 0.0, 0.0]]
"#;

#[test]
fn empty_config_maps_to_stock_pipeline() {
    let cfg = load_toml("").unwrap();
    assert_eq!(AdcSetup::from(&cfg.adc), AdcSetup::default());
    assert_eq!(AcquisitionCfg::from(&cfg.acquisition), AcquisitionCfg::default());
    assert_eq!(KalmanCfg::from(&cfg.filter), KalmanCfg::default());
    assert_eq!(LoopCfg::from(&cfg.output), LoopCfg::default());

    let channels = channels_from_config(&cfg.channels).unwrap();
    assert_eq!(channels, insole_core::channel::stock_layout());

    let curve = curve_from_config(&cfg.curve, None);
    assert_eq!(curve.segments(), &STOCK_SEGMENTS);
    assert_eq!(curve.cap_n(), 745.56);
}

#[test]
fn custom_sections_map_field_by_field() {
    let cfg = load_toml(CUSTOM).unwrap();
    cfg.validate().unwrap();

    assert_eq!(
        AdcSetup::from(&cfg.adc),
        AdcSetup {
            resolution_bits: 12,
            attenuation: Attenuation::Db6
        }
    );
    assert_eq!(
        AcquisitionCfg::from(&cfg.acquisition),
        AcquisitionCfg {
            samples: 4,
            settle: Duration::from_micros(250)
        }
    );
    let k = KalmanCfg::from(&cfg.filter);
    assert_eq!((k.process_noise, k.measurement_noise, k.initial_covariance), (2.0, 10.0, 50.0));
    assert_eq!(LoopCfg::from(&cfg.output).cycle_delay, Duration::from_millis(20));

    let channels = channels_from_config(&cfg.channels).unwrap();
    assert_eq!(channels[0].position_cm, (1.0, 1.0));
    assert_eq!(channels[0].bounds, ChannelBounds { raw_min: 0, raw_max: 3000 });
    assert_eq!(channels[1].label, "toe");
    // unlabeled channels keep the stock names
    assert_eq!(channels[2].label, "medial forefoot");
    assert_eq!(channels[4].bounds.raw_min, 100);
    assert_eq!(channels[5].bounds.raw_max, 3259);
}

#[test]
fn csv_table_takes_precedence_over_config_segments() {
    let cfg = load_toml(CUSTOM).unwrap();
    let b = ChannelBounds::default();

    let from_cfg = curve_from_config(&cfg.curve, None);
    assert_eq!(from_cfg.force(1000, b), 100.0);
    assert_eq!(from_cfg.cap_n(), 500.0);

    let table = [CurveSegment {
        upper_raw: 3259.0,
        slope: 0.2,
        pivot: 0.0,
        offset_n: 0.0,
    }];
    let from_csv = curve_from_config(&cfg.curve, Some(&table));
    assert_eq!(from_csv.force(1000, b), 200.0);
    assert_eq!(from_csv.force(3259, b), 500.0);
}

#[test]
fn wrong_channel_count_is_a_config_error() {
    let cfg = load_toml("[[channels]]\npin = 1\n[[channels]]\npin = 2\n").unwrap();
    let err = channels_from_config(&cfg.channels).unwrap_err();
    assert!(format!("{err}").contains("expected 6 channels, got 2"));
}

#[rstest]
#[case("db0", AttenuationCfg::Db0, Attenuation::Db0)]
#[case("db2_5", AttenuationCfg::Db2_5, Attenuation::Db2_5)]
#[case("db6", AttenuationCfg::Db6, Attenuation::Db6)]
#[case("db11", AttenuationCfg::Db11, Attenuation::Db11)]
fn every_attenuation_maps(
    #[case] name: &str,
    #[case] cfg_value: AttenuationCfg,
    #[case] expected: Attenuation,
) {
    assert_eq!(attenuation_from_config(cfg_value), expected);

    let cfg = load_toml(&format!("[adc]\nattenuation = \"{name}\"\n")).unwrap();
    assert_eq!(cfg.adc.attenuation, cfg_value);
    assert_eq!(AdcSetup::from(&cfg.adc).attenuation, expected);
}
