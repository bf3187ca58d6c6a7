//! Frequency Map Tests
//!
//! Channel <-> frequency conversion and grid validation per region.
//! Run with: cargo test --test frequency_tests

use si4703_radio::types::{Band, ChannelSpacing, DeEmphasis};
use si4703_radio::{FrequencyMap, Region, RegionalConfig};

fn map(region: Region) -> FrequencyMap {
    FrequencyMap::new(region.config())
}

// ============================================================================
// Band Plan Tests
// ============================================================================

#[test]
fn min_frequency_per_band() {
    assert_eq!(map(Region::Us).min_frequency(), 87.5);
    assert_eq!(map(Region::Europe).min_frequency(), 87.5);
    assert_eq!(map(Region::Japan).min_frequency(), 76.0);
}

#[test]
fn channel_spacing_per_setting() {
    let spacing = |s| {
        FrequencyMap::new(RegionalConfig::new(Band::UsEurope, s, DeEmphasis::Us75))
            .channel_spacing()
    };
    assert_eq!(spacing(ChannelSpacing::Khz200), 0.2);
    assert_eq!(spacing(ChannelSpacing::Khz100), 0.1);
    assert_eq!(spacing(ChannelSpacing::Khz50), 0.05);
}

#[test]
fn region_plans() {
    assert_eq!(Region::Us.config().spacing, ChannelSpacing::Khz200);
    assert_eq!(Region::Europe.config().spacing, ChannelSpacing::Khz100);
    assert_eq!(Region::Europe.config().de_emphasis, DeEmphasis::Eu50);
    assert_eq!(Region::Japan.config().band, Band::JapanWide);
}

// ============================================================================
// Conversion Tests
// ============================================================================

#[test]
fn us_101_1_is_channel_68() {
    let us = map(Region::Us);
    assert_eq!(us.frequency_to_channel(101.1), 68);
    assert_eq!(us.checked_channel(101.1), Some(68));
}

#[test]
fn channel_zero_is_band_minimum() {
    assert_eq!(map(Region::Us).channel_to_frequency(0), 87.5);
    assert_eq!(map(Region::Japan).channel_to_frequency(0), 76.0);
}

#[test]
fn channel_to_frequency_formula() {
    let eu = map(Region::Europe);
    // 87.5 + 124 * 0.1
    assert!((eu.channel_to_frequency(124) - 99.9).abs() < 1e-4);
}

#[test]
fn grid_round_trip_all_regions() {
    let plans = [
        Region::Us.config(),
        Region::Europe.config(),
        Region::Japan.config(),
        RegionalConfig::new(Band::UsEurope, ChannelSpacing::Khz50, DeEmphasis::Us75),
        RegionalConfig::new(Band::Japan, ChannelSpacing::Khz50, DeEmphasis::Us75),
    ];
    for plan in plans {
        let map = FrequencyMap::new(plan);
        let mut channel = 0u16;
        loop {
            let f = map.channel_to_frequency(channel);
            if f > map.max_frequency() + 1e-3 {
                break;
            }
            let back = map.channel_to_frequency(map.frequency_to_channel(f));
            assert!(
                (back - f).abs() < 0.02,
                "{plan:?}: channel {channel} -> {f} -> {back}"
            );
            assert!(map.is_on_grid(f), "{plan:?}: {f} should be on grid");
            channel += 1;
        }
    }
}

#[test]
fn decimal_grid_points_map_exactly() {
    let us = map(Region::Us);
    for (f, ch) in [(87.5, 0), (88.1, 3), (98.7, 56), (107.9, 102)] {
        assert_eq!(us.frequency_to_channel(f), ch, "{f} MHz");
    }
    let eu = map(Region::Europe);
    for (f, ch) in [(87.6, 1), (99.9, 124), (104.3, 168), (108.0, 205)] {
        assert_eq!(eu.frequency_to_channel(f), ch, "{f} MHz");
    }
}

// ============================================================================
// Grid Validation Tests
// ============================================================================

#[test]
fn off_grid_rejected_us() {
    let us = map(Region::Us);
    assert!(!us.is_on_grid(101.05));
    assert!(!us.is_on_grid(101.2));
    assert!(us.checked_channel(101.05).is_none());
}

#[test]
fn off_grid_rejected_europe() {
    let eu = map(Region::Europe);
    assert!(eu.is_on_grid(101.2));
    assert!(!eu.is_on_grid(101.25));
}

#[test]
fn out_of_band_rejected() {
    let us = map(Region::Us);
    assert!(us.checked_channel(87.3).is_none());
    assert!(us.checked_channel(108.1).is_none());
    assert!(us.checked_channel(-1.0).is_none());

    let jp = FrequencyMap::new(RegionalConfig::new(
        Band::Japan,
        ChannelSpacing::Khz100,
        DeEmphasis::Us75,
    ));
    assert_eq!(jp.checked_channel(90.0), Some(140));
    assert!(jp.checked_channel(90.1).is_none());
}

#[test]
fn band_edges_accepted() {
    assert_eq!(map(Region::Us).checked_channel(87.5), Some(0));
    assert_eq!(map(Region::Europe).checked_channel(108.0), Some(205));
    assert_eq!(map(Region::Japan).checked_channel(76.0), Some(0));
}
