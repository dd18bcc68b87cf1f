//! Integration tests for the dasha timeline engine.
//!
//! These exercise the public API end to end: timeline construction,
//! subdivision invariants across all six levels, active-path queries and
//! sandhi detection.

use chrono::{DateTime, FixedOffset, TimeDelta, TimeZone, Utc};
use rust_decimal::Decimal;

use dhruv_dasha::dasha::{
    DashaLevel, PeriodNode, SECONDS_PER_DAY, SECONDS_PER_YEAR, WeightEntry, WeightTable,
    active_path, compute_timeline, compute_timeline_from_anchor, period_from_start, subdivide,
    upcoming_transitions, window_seconds,
};
use dhruv_dasha::{ALL_NAKSHATRAS_27, DashaConfig, DashaError, Graha, NAKSHATRA_SPAN_27};

fn birth() -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339("1978-02-21T04:45:00+05:30").unwrap()
}

/// Walk one branch down to the dehadasha, checking every partition.
fn check_branch(parent: &PeriodNode, table: &WeightTable, pick: usize) {
    let children = subdivide(parent, table).unwrap();
    if parent.level == DashaLevel::Dehadasha {
        assert!(children.is_empty());
        return;
    }
    assert_eq!(children.len(), 9);
    assert_eq!(children[0].graha, parent.graha);
    assert_eq!(children[0].start, parent.start);
    assert_eq!(children[8].end, parent.end);
    assert_eq!(
        children.iter().map(|c| c.duration_secs).sum::<i64>(),
        parent.duration_secs
    );
    for w in children.windows(2) {
        assert_eq!(w[0].end, w[1].start);
    }
    check_branch(&children[pick % 9], table, pick + 4);
}

/// Scenario A: f = 0.5 on a Ketu nakshatra leaves 3.5 years, then Shukra 20 years.
#[test]
fn half_elapsed_ketu_balance() {
    let labels = [
        Graha::Ketu,
        Graha::Shukra,
        Graha::Surya,
        Graha::Chandra,
        Graha::Mangal,
        Graha::Rahu,
        Graha::Guru,
        Graha::Shani,
        Graha::Buddh,
    ];
    let years = [7, 20, 6, 10, 7, 18, 16, 19, 17];
    let table = WeightTable::new(
        labels
            .iter()
            .zip(years)
            .map(|(&graha, y)| WeightEntry {
                graha,
                years: Decimal::from(y),
            })
            .collect(),
        Decimal::from(120),
    )
    .unwrap();
    let cfg = DashaConfig {
        weights: table,
        ..DashaConfig::default()
    };
    let tl = compute_timeline_from_anchor(birth(), 0.5, Graha::Ketu, &cfg).unwrap();

    assert_eq!(tl.periods[0].graha, Graha::Ketu);
    assert_eq!(tl.periods[0].duration_years, Decimal::new(35, 1));
    assert_eq!(tl.periods[0].duration_secs, 110_451_600);
    assert_eq!(tl.periods[1].graha, Graha::Shukra);
    assert_eq!(tl.periods[1].duration_years, Decimal::from(20));
    assert_eq!(tl.periods[1].duration_secs, 20 * SECONDS_PER_YEAR);
    assert_eq!(tl.periods[1].start, tl.periods[0].end);
}

/// Scenario B: a 120-year Ketu period splits into the Vimshottari weights.
#[test]
fn full_cycle_parent_children() {
    let table = WeightTable::vimshottari();
    let start = Utc.with_ymd_and_hms(1900, 1, 1, 0, 0, 0).unwrap();
    let parent = period_from_start(
        Graha::Ketu,
        DashaLevel::Mahadasha,
        1,
        start,
        120 * SECONDS_PER_YEAR,
    )
    .unwrap();
    let children = subdivide(&parent, &table).unwrap();
    let expected = [7i64, 20, 6, 10, 7, 18, 16, 19, 17];
    for (c, y) in children.iter().zip(expected) {
        assert!((c.duration_secs - y * SECONDS_PER_YEAR).abs() <= SECONDS_PER_DAY);
    }
    assert_eq!(children[8].end, parent.end);
}

/// Scenario C: one-year lookahead, sorted strictly ascending, clamped spans.
#[test]
fn upcoming_transitions_over_a_year() {
    let cfg = DashaConfig::default();
    let tl = compute_timeline(birth(), 301.7, &cfg).unwrap();
    for offset_days in [0i64, 1_000, 7_777, 20_000] {
        let from = tl.start().unwrap() + TimeDelta::days(offset_days);
        let windows = upcoming_transitions(&tl, from, 365, &cfg).unwrap();
        for pair in windows.windows(2) {
            assert!(pair[0].transition < pair[1].transition);
        }
        for w in &windows {
            assert!(w.transition >= from);
            assert!(w.transition <= from + TimeDelta::days(365));
            assert!(w.level <= DashaLevel::Antardasha);
            assert_eq!((w.window_end - w.window_start).num_seconds(), w.window_secs);
            assert!(w.window_secs >= 3_600 && w.window_secs <= 30 * SECONDS_PER_DAY);
        }
    }
}

#[test]
fn window_span_matches_ending_period() {
    let cfg = DashaConfig::default();
    let tl = compute_timeline(birth(), 12.0, &cfg).unwrap();
    let from = tl.start().unwrap();
    let windows = upcoming_transitions(&tl, from, 3_650, &cfg).unwrap();
    assert!(windows.iter().any(|w| w.level == DashaLevel::Antardasha));
    let table = &cfg.weights;
    for w in windows.iter().filter(|w| w.level == DashaLevel::Antardasha) {
        let ending = active_path(&tl, w.transition, 2, table).unwrap();
        let period = ending.at_level(DashaLevel::Antardasha).unwrap();
        assert_eq!(period.end, w.transition);
        assert_eq!(
            w.window_secs,
            window_seconds(DashaLevel::Antardasha, period.duration_secs, &cfg.sandhi).unwrap()
        );
    }
}

#[test]
fn partitions_hold_on_every_level() {
    let cfg = DashaConfig::default();
    let table = &cfg.weights;
    for lon in [0.0, 13.0, 77.7, 180.0, 299.99, 359.9] {
        let tl = compute_timeline(birth(), lon, &cfg).unwrap();
        for (i, top) in tl.periods.iter().enumerate() {
            if top.duration_secs >= 9 {
                check_branch(top, table, i);
            }
        }
    }
}

#[test]
fn balance_bounds_follow_anchor_fraction() {
    let cfg = DashaConfig::default();
    for (i, f) in [0.0, 0.1, 0.25, 0.333, 0.5, 0.9, 0.999].into_iter().enumerate() {
        let graha = dhruv_dasha::ALL_GRAHAS[i];
        let tl = compute_timeline_from_anchor(birth(), f, graha, &cfg).unwrap();
        let weight = cfg.weights.weight(graha).unwrap();
        let years = weight.to_string().parse::<f64>().unwrap();
        let expected = (1.0 - f) * years * SECONDS_PER_YEAR as f64;
        assert!(
            (tl.periods[0].duration_secs as f64 - expected).abs() <= 1.0,
            "f={f}: got {} expected {expected}",
            tl.periods[0].duration_secs
        );
    }
}

#[test]
fn longitude_selects_lord_and_balance() {
    let cfg = DashaConfig::default();
    // Start of Rohini: Chandra, full 10 years.
    let tl = compute_timeline(birth(), 40.0, &cfg).unwrap();
    assert_eq!(tl.periods[0].graha, Graha::Chandra);
    assert_eq!(tl.periods[0].duration_secs, 10 * SECONDS_PER_YEAR);
    assert_eq!(tl.periods[1].graha, Graha::Mangal);

    // Three quarters through Revati: Buddh with a quarter of 17 years.
    let tl = compute_timeline(birth(), 26.75 * NAKSHATRA_SPAN_27, &cfg).unwrap();
    assert_eq!(tl.periods[0].graha, Graha::Buddh);
    let expected = 17 * SECONDS_PER_YEAR / 4;
    assert!((tl.periods[0].duration_secs - expected).abs() <= 1);
}

#[test]
fn nakshatra_boundaries_start_a_full_period() {
    let cfg = DashaConfig::default();
    for k in 0..27 {
        let lon = k as f64 * 40.0 / 3.0;
        let tl = compute_timeline(birth(), lon, &cfg).unwrap();
        let first = tl.periods[0];
        assert_eq!(first.graha, ALL_NAKSHATRAS_27[k].lord(), "lon {lon}");
        let full = cfg.weights.weight(first.graha).unwrap();
        let full_secs = full.to_string().parse::<i64>().unwrap() * SECONDS_PER_YEAR;
        assert!(
            (first.duration_secs - full_secs).abs() <= 1,
            "lon {lon}: got {}s, expected {full_secs}s",
            first.duration_secs
        );
    }
}

#[test]
fn end_instants_resolve_to_their_period() {
    let cfg = DashaConfig::default();
    let table = &cfg.weights;
    let tl = compute_timeline(birth(), 222.2, &cfg).unwrap();
    let q = tl.start().unwrap() + TimeDelta::days(9_000);
    let path = active_path(&tl, q, 6, table).unwrap();
    assert_eq!(path.periods.len(), 6);
    for node in &path.periods {
        let at_end = active_path(&tl, node.end, 6, table).unwrap();
        let found = at_end.at_level(node.level).unwrap();
        assert_eq!(found.graha, node.graha);
        assert_eq!(found.start, node.start);
    }
}

#[test]
fn timeline_start_resolves_first_children() {
    let cfg = DashaConfig::default();
    let table = &cfg.weights;
    let tl = compute_timeline(birth(), 140.0, &cfg).unwrap();
    let path = active_path(&tl, tl.start().unwrap(), 6, table).unwrap();
    assert_eq!(path.periods.len(), 6);
    // Every first child starts with its parent's graha.
    assert!(path.periods.iter().all(|p| p.graha == tl.periods[0].graha));
    assert!(path.periods.iter().all(|p| p.start == tl.periods[0].start));
}

#[test]
fn shared_boundary_resolves_to_earlier_sibling() {
    let cfg = DashaConfig::default();
    let table = &cfg.weights;
    let tl = compute_timeline(birth(), 140.0, &cfg).unwrap();
    let second = tl.periods[1];
    let path = active_path(&tl, second.start, 1, table).unwrap();
    assert_eq!(path.periods[0], tl.periods[0]);
    let path = active_path(&tl, second.start + TimeDelta::seconds(1), 1, table).unwrap();
    assert_eq!(path.periods[0], second);
}

#[test]
fn computations_are_deterministic() {
    let cfg = DashaConfig::default();
    let a = compute_timeline(birth(), 88.8, &cfg).unwrap();
    let b = compute_timeline(birth(), 88.8, &cfg).unwrap();
    assert_eq!(a, b);
    let q = a.start().unwrap() + TimeDelta::days(5_432);
    assert_eq!(
        active_path(&a, q, 6, &cfg.weights).unwrap(),
        active_path(&b, q, 6, &cfg.weights).unwrap()
    );
}

#[test]
fn concurrent_queries_agree() {
    let cfg = DashaConfig::default();
    let tl = compute_timeline(birth(), 250.0, &cfg).unwrap();
    let q = tl.start().unwrap() + TimeDelta::days(15_000);
    let expected = active_path(&tl, q, 6, &cfg.weights).unwrap();
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| active_path(&tl, q, 6, &cfg.weights).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}

#[test]
fn tiny_balance_stops_path_early() {
    let cfg = DashaConfig::default();
    let tl = compute_timeline_from_anchor(birth(), 1.0, Graha::Shani, &cfg).unwrap();
    assert_eq!(tl.periods[0].duration_secs, 1);
    let path = active_path(&tl, tl.start().unwrap(), 6, &cfg.weights).unwrap();
    assert_eq!(path.periods.len(), 1);
    assert_eq!(tl.periods[1].graha, Graha::Buddh);
}

#[test]
fn invalid_inputs_are_reported() {
    let cfg = DashaConfig::default();
    assert!(matches!(
        compute_timeline(birth(), f64::NAN, &cfg),
        Err(DashaError::InvalidInput(_))
    ));
    assert!(matches!(
        compute_timeline_from_anchor(birth(), f64::INFINITY, Graha::Ketu, &cfg),
        Err(DashaError::InvalidInput(_))
    ));
}

#[test]
fn serializes_to_json() {
    let cfg = DashaConfig::default();
    let tl = compute_timeline(birth(), 10.0, &cfg).unwrap();
    let json = serde_json::to_value(&tl.periods[0]).unwrap();
    assert_eq!(json["graha"], "ketu");
    assert_eq!(json["level"], "Mahadasha");
    assert!(json["start"].as_str().unwrap().starts_with("1978-02-20T23:15:00"));
}
