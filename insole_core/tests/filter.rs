use insole_core::filter::{FilterState, steady_state_covariance, steady_state_gain};
use insole_core::KalmanCfg;
use proptest::prelude::*;
use rstest::rstest;

#[rstest]
#[case(0.0)]
#[case(12.5)]
#[case(196.2)]
#[case(745.56)]
fn converges_monotonically_to_constant(#[case] m: f32) {
    let cfg = KalmanCfg::default();
    let mut st = FilterState::new(&cfg);
    let mut prev = st.estimate;
    for _ in 0..400 {
        let e = st.update(m, &cfg);
        assert!(e >= prev, "estimate went backwards: {prev} -> {e}");
        assert!(e <= m + 1e-3, "overshoot: {e} > {m}");
        prev = e;
    }
    assert!((prev - m).abs() <= m.abs() * 1e-5 + 1e-5, "did not converge: {prev} vs {m}");
}

#[test]
fn covariance_reaches_fixed_point() {
    let cfg = KalmanCfg::default();
    let mut st = FilterState::new(&cfg);
    let mut prev_cov = st.error_covariance;
    for _ in 0..200 {
        st.update(42.0, &cfg);
        // decreasing from the initial 100 toward the fixed point
        assert!(st.error_covariance <= prev_cov + 1e-5);
        prev_cov = st.error_covariance;
    }
    let p = st.error_covariance;
    let predicted = p + cfg.process_noise;
    let gain = predicted / (predicted + cfg.measurement_noise);
    assert!(((1.0 - gain) * predicted - p).abs() < 1e-4);
    assert!((p - steady_state_covariance(&cfg)).abs() < 1e-3);
    assert!((gain - steady_state_gain(&cfg)).abs() < 1e-4);
}

#[test]
fn covariance_is_independent_of_measurements() {
    let cfg = KalmanCfg::default();
    let mut a = FilterState::new(&cfg);
    let mut b = FilterState::new(&cfg);
    for i in 0..50 {
        a.update(i as f32, &cfg);
        b.update(700.0 - i as f32, &cfg);
        assert_eq!(a.error_covariance.to_bits(), b.error_covariance.to_bits());
    }
}

#[test]
fn channels_do_not_share_state() {
    let cfg = KalmanCfg::default();
    let mut states = [FilterState::new(&cfg); 6];
    states[2].update(300.0, &cfg);
    assert_eq!(states[0], FilterState::new(&cfg));
    assert!(states[2].estimate > 0.0);
}

proptest! {
    #[test]
    fn deterministic_bit_for_bit(ms in proptest::collection::vec(0.0f32..=745.56, 1..200)) {
        let cfg = KalmanCfg::default();
        let mut a = FilterState::new(&cfg);
        let mut b = FilterState::new(&cfg);
        for &m in &ms {
            let ea = a.update(m, &cfg);
            let eb = b.update(m, &cfg);
            prop_assert_eq!(ea.to_bits(), eb.to_bits());
        }
        prop_assert_eq!(a.error_covariance.to_bits(), b.error_covariance.to_bits());
    }

    #[test]
    fn estimate_stays_within_measurement_hull(ms in proptest::collection::vec(0.0f32..=745.56, 1..200)) {
        let cfg = KalmanCfg::default();
        let mut st = FilterState::new(&cfg);
        for &m in &ms {
            let e = st.update(m, &cfg);
            prop_assert!((-1e-3..=745.56 + 1e-3).contains(&e));
        }
    }
}
