//! Fire weather, humidity and SPEI building blocks against published values
//!
//! References:
//! - Van Wagner & Pickett (1985) worked example, first day of the test
//!   series: T = 17 °C, RH = 42 %, wind 25 km/h, no rain, April, starting
//!   from FFMC 85, DMC 6, DC 15
//! - Murray (1967) saturation vapour pressure curves
//! - Standard normal quantiles from Abramowitz & Stegun tables

use approx::assert_relative_eq;
use ecoclimate_core::physics::{
    calculate_day, calculate_spei, humidity_validation, spei_validation, DayWeather,
    FireWeatherState,
};

#[ctor::ctor]
fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn reference_day() -> DayWeather {
    DayWeather {
        temperature: 17.0,
        relative_humidity: 42.0,
        wind_speed: 25.0,
        precipitation: 0.0,
        month: 3,
    }
}

fn standard_start() -> FireWeatherState {
    FireWeatherState::new(85.0, 6.0, 15.0)
}

#[test]
fn test_reference_day_moisture_codes() {
    let day = calculate_day(&standard_start(), &reference_day()).unwrap();

    assert_relative_eq!(day.ffmc, 87.7, epsilon = 0.1);
    assert_relative_eq!(day.dmc, 8.5, epsilon = 0.1);
    assert_relative_eq!(day.dc, 19.0, epsilon = 0.1);
    assert_relative_eq!(day.isi, 10.9, epsilon = 0.3);
    assert_relative_eq!(day.bui, 8.5, epsilon = 0.1);
    assert_relative_eq!(day.fwi, 10.1, epsilon = 0.3);
    assert_relative_eq!(day.dsr, 0.0272 * day.fwi.powf(1.77), epsilon = 1e-12);
}

#[test]
fn test_dry_run_keeps_drying() {
    let mut state = standard_start();
    let mut previous = None;
    for _ in 0..20 {
        let today = calculate_day(&state, &reference_day()).unwrap();
        if let Some(prev) = previous {
            let prev: ecoclimate_core::physics::DailyFireWeather = prev;
            assert!(today.dmc > prev.dmc);
            assert!(today.dc > prev.dc);
            assert!(today.ffmc >= prev.ffmc);
            assert!(today.bui >= prev.bui);
        }
        state.advance(&today);
        previous = Some(today);
    }
    assert!(state.ffmc <= 100.0);
}

#[test]
fn test_rain_lowers_all_codes() {
    let mut state = standard_start();
    for _ in 0..10 {
        let today = calculate_day(&state, &reference_day()).unwrap();
        state.advance(&today);
    }

    let wet = DayWeather {
        precipitation: 25.0,
        relative_humidity: 90.0,
        wind_speed: 5.0,
        ..reference_day()
    };
    let after_rain = calculate_day(&state, &wet).unwrap();
    assert!(after_rain.ffmc < state.ffmc);
    assert!(after_rain.dmc < state.dmc);
    assert!(after_rain.dc < state.dc);
}

#[test]
fn test_higher_seeds_give_higher_codes() {
    let low = calculate_day(&FireWeatherState::new(70.0, 6.0, 15.0), &reference_day()).unwrap();
    let high = calculate_day(&FireWeatherState::new(92.0, 6.0, 15.0), &reference_day()).unwrap();
    assert!(high.ffmc > low.ffmc);
    assert!(high.isi > low.isi);

    let shallow = calculate_day(&FireWeatherState::new(85.0, 6.0, 15.0), &reference_day()).unwrap();
    let deep = calculate_day(&FireWeatherState::new(85.0, 6.0, 300.0), &reference_day()).unwrap();
    assert!(deep.dc > shallow.dc);
    assert!(deep.bui > shallow.bui);
}

#[test]
fn test_cold_day_stops_duff_drying() {
    let cold = DayWeather {
        temperature: -5.0,
        ..reference_day()
    };
    let day = calculate_day(&standard_start(), &cold).unwrap();
    assert_eq!(day.dmc, 6.0);
    // April DC adjustment still applies below -2.8 °C
    assert_relative_eq!(day.dc, 15.0 + 0.5 * 0.9, epsilon = 1e-12);
}

#[test]
fn test_murray_saturation_vapor_pressure() {
    use humidity_validation::saturation_vapor_pressure_murray;

    assert_relative_eq!(saturation_vapor_pressure_murray(0.0), 0.61078, epsilon = 1e-12);
    assert_relative_eq!(saturation_vapor_pressure_murray(20.0), 2.338, epsilon = 0.005);
    assert_relative_eq!(saturation_vapor_pressure_murray(-10.0), 0.2595, epsilon = 0.001);
    assert!(saturation_vapor_pressure_murray(30.0) > saturation_vapor_pressure_murray(29.0));
}

#[test]
fn test_dew_point_relative_humidity() {
    use humidity_validation::relative_humidity_from_dew_point;

    assert_relative_eq!(relative_humidity_from_dew_point(15.0, 15.0), 100.0, epsilon = 1e-9);
    assert_relative_eq!(relative_humidity_from_dew_point(10.0, 20.0), 52.5, epsilon = 0.1);
    // Supersaturated inputs are capped
    assert_eq!(relative_humidity_from_dew_point(22.0, 20.0), 100.0);
}

#[test]
fn test_specific_humidity_dew_point_is_saturation() {
    use humidity_validation::{dew_point_from_specific, relative_humidity_from_specific};

    for &q in &[0.002, 0.006, 0.012] {
        let dew_point = dew_point_from_specific(q, 101.325);
        let rh = relative_humidity_from_specific(q, dew_point, 101.325);
        assert_relative_eq!(rh, 100.0, epsilon = 1e-6);
    }
    let rh = relative_humidity_from_specific(0.006, 25.0, 101.325);
    assert!(rh > 25.0 && rh < 35.0, "rh {}", rh);
}

#[test]
fn test_normal_quantile_symmetry() {
    use spei_validation::normal_quantile;

    for &p in &[0.001, 0.02, 0.1, 0.3, 0.45] {
        assert_relative_eq!(normal_quantile(p), -normal_quantile(1.0 - p), epsilon = 1e-9);
    }
    assert_relative_eq!(normal_quantile(0.95), 1.6448536269514722, epsilon = 1e-9);
}

#[test]
fn test_erfc_and_gamma_ln() {
    use spei_validation::{erfc, gamma_ln};

    assert_relative_eq!(erfc(0.5), 0.4795001221869535, epsilon = 1e-10);
    assert_relative_eq!(erfc(-0.5), 2.0 - 0.4795001221869535, epsilon = 1e-10);
    assert_relative_eq!(gamma_ln(0.5), std::f64::consts::PI.sqrt().ln(), epsilon = 1e-12);
    assert_relative_eq!(gamma_ln(11.0), 3_628_800f64.ln(), epsilon = 1e-10);
}

#[test]
fn test_probability_weighted_moments_of_uniform_sample() {
    let sample: Vec<f64> = (1..=9).map(f64::from).collect();
    let beta = spei_validation::probability_weighted_moments(&sample);
    assert_relative_eq!(beta[0], 5.0, epsilon = 1e-12);
    assert!(beta[0] > beta[1] && beta[1] > beta[2]);
}

#[test]
fn test_spei_of_identical_years_is_zero() {
    let precip = vec![[40.0, 35.0, 50.0, 60.0, 55.0, 30.0, 20.0, 25.0, 45.0, 70.0, 65.0, 50.0]; 12];
    let pet = vec![[2.0, 3.0, 5.0, 8.0, 11.0, 13.0, 14.0, 12.0, 9.0, 6.0, 3.0, 2.0]; 12];

    let spei = calculate_spei(&precip, &pet, 3).unwrap();
    assert_eq!(spei.len(), 12);
    for year in &spei {
        for value in year {
            assert!(value.is_finite());
            assert_eq!(*value, 0.0);
        }
    }
}

#[test]
fn test_supersaturated_humidity_matches_saturation() {
    let humid = |rh: f64| DayWeather {
        temperature: 20.0,
        relative_humidity: rh,
        wind_speed: 10.0,
        precipitation: 0.0,
        month: 6,
    };
    let saturated = calculate_day(&standard_start(), &humid(100.0)).unwrap();
    let over = calculate_day(&standard_start(), &humid(100.5)).unwrap();

    assert!(saturated.ffmc.is_finite() && saturated.fwi.is_finite());
    assert_eq!(over, saturated);
}

#[test]
fn test_calm_day_is_finite() {
    let calm = DayWeather {
        wind_speed: 0.0,
        ..reference_day()
    };
    let day = calculate_day(&standard_start(), &calm).unwrap();
    let windy = calculate_day(&standard_start(), &reference_day()).unwrap();
    assert!(day.isi.is_finite() && day.fwi.is_finite());
    assert!(day.isi < windy.isi);
}

#[test]
fn test_rain_thresholds_switch_duff_and_drought_branches() {
    let with_rain = |precipitation: f64| {
        calculate_day(
            &standard_start(),
            &DayWeather {
                precipitation,
                ..reference_day()
            },
        )
        .unwrap()
    };
    let dry = with_rain(0.0);

    // 1.5 mm is still a dry day for DMC
    let at_dmc_threshold = with_rain(1.5);
    assert_eq!(at_dmc_threshold.dmc, dry.dmc);
    assert!(with_rain(1.51).dmc < dry.dmc);

    // 2.8 mm is still a dry day for DC; DMC has already switched
    let at_dc_threshold = with_rain(2.8);
    assert_eq!(at_dc_threshold.dc, dry.dc);
    assert!(at_dc_threshold.dmc < dry.dmc);
    assert!(with_rain(2.81).dc < dry.dc);
}
