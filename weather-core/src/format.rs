//! Pure presentation helpers: compass labels, local clock times, unit labels.

use chrono::NaiveTime;

use crate::UnitSystem;

const ICON_URL_TEMPLATE_PREFIX: &str = "https://openweathermap.org/img/wn/";
const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl CompassPoint {
    const SECTORS: [CompassPoint; 8] = [
        CompassPoint::N,
        CompassPoint::NE,
        CompassPoint::E,
        CompassPoint::SE,
        CompassPoint::S,
        CompassPoint::SW,
        CompassPoint::W,
        CompassPoint::NW,
    ];

    /// Eight 45° sectors, north centered on 0°. `None` outside `[0, 360)`.
    pub fn from_bearing(deg: f64) -> Option<Self> {
        if !(0.0..360.0).contains(&deg) {
            return None;
        }
        let sector = ((deg + 22.5) / 45.0).floor() as usize % Self::SECTORS.len();
        Some(Self::SECTORS[sector])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }
}

/// Compass label for a wind bearing, or an empty string when the bearing is out of range.
pub fn wind_direction_label(bearing_deg: f64) -> &'static str {
    CompassPoint::from_bearing(bearing_deg).map_or("", |p| p.as_str())
}

/// Wall-clock time at `timezone_offset_seconds` from UTC, as `H:MM AM/PM`. The date is dropped.
pub fn local_time_12h(epoch_seconds: i64, timezone_offset_seconds: i32) -> String {
    let shifted = epoch_seconds.saturating_add(i64::from(timezone_offset_seconds));
    let seconds_of_day = shifted.rem_euclid(SECONDS_PER_DAY) as u32;

    NaiveTime::from_num_seconds_from_midnight_opt(seconds_of_day, 0)
        .unwrap_or_default()
        .format("%-I:%M %p")
        .to_string()
}

/// Image URL for a primary-provider icon code. Always well formed, whether or not the icon exists.
pub fn icon_url(icon_code: &str) -> String {
    format!("{ICON_URL_TEMPLATE_PREFIX}{icon_code}.png")
}

pub fn temperature_label(units: UnitSystem) -> &'static str {
    match units {
        UnitSystem::Metric => "°C",
        UnitSystem::Imperial => "°F",
    }
}

pub fn speed_label(units: UnitSystem) -> &'static str {
    match units {
        UnitSystem::Metric => "m/s",
        UnitSystem::Imperial => "mph",
    }
}

/// UV index as shown to the user. Reports keep the raw value.
pub fn rounded_uv(uv_index: f64) -> i64 {
    uv_index.round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_direction_sectors() {
        let cases = [
            (0.0, "N"),
            (22.4, "N"),
            (22.5, "NE"),
            (67.5, "E"),
            (90.0, "E"),
            (135.0, "SE"),
            (180.0, "S"),
            (225.0, "SW"),
            (270.0, "W"),
            (315.0, "NW"),
            (337.4, "NW"),
            (337.5, "N"),
            (359.9, "N"),
        ];

        for (deg, expected) in cases {
            assert_eq!(wind_direction_label(deg), expected, "bearing {deg}");
        }
    }

    #[test]
    fn wind_direction_out_of_range_is_empty() {
        assert_eq!(wind_direction_label(-0.1), "");
        assert_eq!(wind_direction_label(360.0), "");
        assert_eq!(wind_direction_label(f64::NAN), "");
        assert_eq!(CompassPoint::from_bearing(400.0), None);
    }

    #[test]
    fn local_time_midnight_and_noon() {
        assert_eq!(local_time_12h(0, 0), "12:00 AM");
        assert_eq!(local_time_12h(43_200, 0), "12:00 PM");
    }

    #[test]
    fn local_time_negative_offset_rolls_back_a_day() {
        assert_eq!(local_time_12h(3_600, -7_200), "11:00 PM");
    }

    #[test]
    fn local_time_pads_minutes_only() {
        // 2023-11-14T22:13:20Z shifted by -8h is 14:13:20 local.
        assert_eq!(local_time_12h(1_700_000_000, -28_800), "2:13 PM");
        assert_eq!(local_time_12h(9 * 3_600 + 5 * 60, 0), "9:05 AM");
    }

    #[test]
    fn icon_and_unit_labels() {
        assert_eq!(icon_url("04d"), "https://openweathermap.org/img/wn/04d.png");
        assert_eq!(temperature_label(UnitSystem::Imperial), "°F");
        assert_eq!(speed_label(UnitSystem::Metric), "m/s");
    }

    #[test]
    fn uv_rounds_half_away_from_zero() {
        assert_eq!(rounded_uv(2.5), 3);
        assert_eq!(rounded_uv(2.49), 2);
        assert_eq!(rounded_uv(0.0), 0);
    }
}
