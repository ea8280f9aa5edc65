use insole_hardware::{SimMode, SimulatedAdc};
use insole_traits::{AnalogInput, Attenuation};
use rstest::rstest;

#[rstest]
#[case(36)]
#[case(39)]
#[case(34)]
#[case(35)]
#[case(32)]
#[case(33)]
fn gait_stays_inside_loaded_band(#[case] pin: u8) {
    let mut adc = SimulatedAdc::with_mode(SimMode::Gait { period_reads: 120 });
    adc.configure(12, Attenuation::Db11).unwrap();
    for _ in 0..500 {
        let raw = adc.read(pin).unwrap();
        assert!((2900..=3250).contains(&raw), "raw {raw} out of band");
    }
}

#[test]
fn gait_pins_are_out_of_phase() {
    let mut a = SimulatedAdc::with_mode(SimMode::Gait { period_reads: 120 });
    let mut b = a.clone();
    let first: Vec<u16> = (0..10).map(|_| a.read(36).unwrap()).collect();
    let second: Vec<u16> = (0..10).map(|_| b.read(33).unwrap()).collect();
    assert_ne!(first, second);
}

#[test]
fn configure_rejects_oversized_resolution() {
    let mut adc = SimulatedAdc::new();
    let err = adc.configure(24, Attenuation::Db11).unwrap_err();
    assert!(err.to_string().contains("24 bits"));
    // previous resolution still in force
    assert_eq!(adc.max_raw(), 4095);
}
