//! Unit tests for fleet-core primitives.

#[cfg(test)]
mod ids {
    use std::collections::HashMap;

    use crate::{NodeId, RouteId, TruckId};

    #[test]
    fn display_is_raw_string() {
        assert_eq!(TruckId::from("T1").to_string(), "T1");
        assert_eq!(NodeId::new("FUEL_A").as_str(), "FUEL_A");
    }

    #[test]
    fn compare_with_str() {
        assert_eq!(RouteId::from("R_SW_HWY"), "R_SW_HWY");
    }

    #[test]
    fn lookup_by_str_via_borrow() {
        let mut map = HashMap::new();
        map.insert(NodeId::from("J_NORTH"), 3);
        assert_eq!(map.get("J_NORTH"), Some(&3));
    }
}

#[cfg(test)]
mod geo {
    use crate::{COORD_EPSILON, Coordinate, CoreError};

    #[test]
    fn same_point_within_epsilon() {
        let a = Coordinate::new(18.5204, 73.8567);
        let b = Coordinate::new(18.5204 + COORD_EPSILON / 2.0, 73.8567);
        assert!(a.same_point(b));
        let c = Coordinate::new(18.5204 + COORD_EPSILON * 3.0, 73.8567);
        assert!(!a.same_point(c));
    }

    #[test]
    fn planar_distance_pythagorean() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(3.0, 4.0);
        assert!((a.planar_distance(b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn lerp_halfway() {
        let a = Coordinate::new(10.0, 20.0);
        let b = Coordinate::new(12.0, 24.0);
        let m = a.lerp(b, 0.5);
        assert!(m.approx_eq(Coordinate::new(11.0, 22.0), 1e-12));
    }

    #[test]
    fn rounded_key_five_decimals() {
        let a = Coordinate::new(18.520_401, 73.856_704);
        let b = Coordinate::new(18.520_404, 73.856_696);
        assert_eq!(a.rounded_key(), b.rounded_key());
        assert_eq!(a.rounded_key(), (1_852_040, 7_385_670));
    }

    #[test]
    fn validity() {
        assert!(Coordinate::new(18.5, 73.8).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
        assert_eq!(
            Coordinate::new(18.5, 190.0).validated(),
            Err(CoreError::InvalidCoordinate { lat: 18.5, lng: 190.0 })
        );
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn tick_display() {
        assert_eq!(Tick(15).to_string(), "T15");
        assert_eq!(Tick::ZERO, Tick::default());
    }

    #[test]
    fn clock_time_of_day() {
        let mut clock = SimClock::new(8 * 3_600, 60);
        assert_eq!(clock.time_of_day(), "08:00");
        for _ in 0..75 {
            clock.advance();
        }
        assert_eq!(clock.time_of_day(), "09:15");
        assert_eq!(clock.minutes_per_tick(), 1);
    }

    #[test]
    fn default_config() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.tick_duration_secs, 60);
        assert_eq!(cfg.tick_interval_ms, 2_000);
        assert_eq!(cfg.end_tick(), None);
        let bounded = SimConfig { total_ticks: 30, ..SimConfig::default() };
        assert_eq!(bounded.end_tick(), Some(Tick(30)));
    }
}

#[cfg(test)]
mod clock {
    use std::time::Duration;

    use crate::{Clock, ManualClock};

    #[test]
    fn manual_sleep_advances() {
        let clock = ManualClock::new();
        assert_eq!(clock.now(), Duration::ZERO);
        clock.sleep(Duration::from_millis(2_500));
        clock.advance(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_millis(3_500));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            assert_eq!(r1.gen_bool(0.5), r2.gen_bool(0.5));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn choose_empty_is_none() {
        let mut rng = SimRng::new(7);
        let empty: [u8; 0] = [];
        assert!(rng.choose(&empty).is_none());
        assert_eq!(rng.choose(&[9]), Some(&9));
    }
}
