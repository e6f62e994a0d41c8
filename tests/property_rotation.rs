use chrono::{NaiveDate, TimeZone, Timelike, Utc};
use proptest::prelude::*;

use wordhue_backend::aggregate::average_rgb;
use wordhue_backend::config::{RotationConfig, VoteScopeMode};
use wordhue_backend::rotation::{word_index, Period};
use wordhue_backend::store::operations::votes::Rgb;

fn rotation(hour: u32) -> RotationConfig {
    RotationConfig {
        reset_hour_utc: hour,
        start_date: NaiveDate::from_ymd_opt(2025, 7, 30).unwrap(),
        vote_scope: VoteScopeMode::PerWord,
    }
}

// 2000-01-01 .. 2100-01-01
const MIN_TS: i64 = 946_684_800;
const MAX_TS: i64 = 4_102_444_800;

proptest! {
    #[test]
    fn index_is_always_in_range(days in any::<i64>(), n in 1u64..10_000) {
        let index = word_index(days, n).unwrap();
        prop_assert!(index < n);
    }

    #[test]
    fn single_word_catalog_always_selects_it(days in any::<i64>()) {
        prop_assert_eq!(word_index(days, 1).unwrap(), 0);
    }

    #[test]
    fn consecutive_periods_advance_index_by_one(days in -100_000i64..100_000, n in 1u64..500) {
        let a = word_index(days, n).unwrap();
        let b = word_index(days + 1, n).unwrap();
        prop_assert_eq!(b, (a + 1) % n);
    }

    #[test]
    fn boundary_is_on_reset_hour_and_contains_now(ts in MIN_TS..MAX_TS, hour in 0u32..24) {
        let cfg = rotation(hour);
        let now = Utc.timestamp_opt(ts, 0).unwrap();
        let period = Period::containing(now, &cfg).unwrap();

        prop_assert!(period.contains(now));
        prop_assert_eq!(period.boundary.hour(), hour);
        prop_assert_eq!(period.boundary.minute(), 0);
        prop_assert_eq!(period.boundary.second(), 0);
        prop_assert_eq!((period.next_boundary - period.boundary).num_seconds(), 86_400);
        prop_assert_eq!(Period::from_days_elapsed(period.days_elapsed, &cfg).unwrap(), period);
    }

    #[test]
    fn periods_are_monotonic(a in MIN_TS..MAX_TS, b in MIN_TS..MAX_TS, hour in 0u32..24) {
        let cfg = rotation(hour);
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let p1 = Period::containing(Utc.timestamp_opt(early, 0).unwrap(), &cfg).unwrap();
        let p2 = Period::containing(Utc.timestamp_opt(late, 0).unwrap(), &cfg).unwrap();
        prop_assert!(p1.days_elapsed <= p2.days_elapsed);
        prop_assert!(p1.date <= p2.date);
    }

    #[test]
    fn average_stays_within_channel_bounds(colors in prop::collection::vec(any::<(u8, u8, u8)>(), 1..64)) {
        let rgbs: Vec<Rgb> = colors.iter().map(|&(r, g, b)| Rgb::new(r, g, b)).collect();
        let avg = average_rgb(&rgbs).unwrap();

        let min_r = rgbs.iter().map(|c| c.r).min().unwrap();
        let max_r = rgbs.iter().map(|c| c.r).max().unwrap();
        prop_assert!(min_r <= avg.r && avg.r <= max_r);

        let min_b = rgbs.iter().map(|c| c.b).min().unwrap();
        let max_b = rgbs.iter().map(|c| c.b).max().unwrap();
        prop_assert!(min_b <= avg.b && avg.b <= max_b);
    }

    #[test]
    fn average_of_identical_colors_is_that_color(r: u8, g: u8, b: u8, n in 1usize..32) {
        let rgbs = vec![Rgb::new(r, g, b); n];
        prop_assert_eq!(average_rgb(&rgbs), Some(Rgb::new(r, g, b)));
    }
}
