//! 地理围栏计算
//!
//! 距离采用 haversine 公式（地球半径 6 371 000 m）。
//! 区域的允许时段为 `[start, end)`，`start > end` 时跨越午夜；`allowed_days` 为空表示每天。

use chrono::{Datelike, Timelike};

use crate::models::geolocation::{AlertType, SafeZone};
use crate::models::timetable::parse_hhmm;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;
pub const MIN_RADIUS_M: f64 = 10.0;
pub const MAX_RADIUS_M: f64 = 50_000.0;

pub fn haversine_m(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lng2 - lng1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), &'static str> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err("Latitude must be between -90 and 90");
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

pub fn validate_radius(radius_m: f64) -> Result<(), &'static str> {
    if !radius_m.is_finite() || !(MIN_RADIUS_M..=MAX_RADIUS_M).contains(&radius_m) {
        return Err("Radius must be between 10 and 50000 meters");
    }
    Ok(())
}

/// 时段两端要么都给出要么都省略
pub fn validate_schedule(
    start: Option<&str>,
    end: Option<&str>,
    days: &[u32],
) -> Result<(), &'static str> {
    match (start, end) {
        (None, None) => {}
        (Some(s), Some(e)) => {
            let (s, e) = (
                parse_hhmm(s).ok_or("allowed_time_start must be HH:MM")?,
                parse_hhmm(e).ok_or("allowed_time_end must be HH:MM")?,
            );
            if s == e {
                return Err("allowed_time_start and allowed_time_end must differ");
            }
        }
        _ => return Err("allowed_time_start and allowed_time_end must be set together"),
    }
    if days.iter().any(|d| !(1..=7).contains(d)) {
        return Err("allowed_days must be between 1 (Monday) and 7 (Sunday)");
    }
    Ok(())
}

/// 返回 (是否在区域内, 到圆心距离)
pub fn evaluate(zone: &SafeZone, latitude: f64, longitude: f64) -> (bool, f64) {
    let distance = haversine_m(zone.latitude, zone.longitude, latitude, longitude);
    (distance <= zone.radius_m, distance)
}

/// 给定时刻是否处于区域的允许时段
pub fn is_allowed_at<T: Datelike + Timelike>(zone: &SafeZone, at: &T) -> bool {
    let weekday = at.weekday().number_from_monday();
    if !zone.allowed_days.is_empty() && !zone.allowed_days.contains(&weekday) {
        return false;
    }

    let window = zone
        .allowed_time_start
        .as_deref()
        .and_then(parse_hhmm)
        .zip(zone.allowed_time_end.as_deref().and_then(parse_hhmm));
    let Some((start, end)) = window else {
        return true;
    };

    let minute = at.hour() * 60 + at.minute();
    if start < end {
        (start..end).contains(&minute)
    } else {
        minute >= start || minute < end
    }
}

/// 与上次持久状态比较，仅在进出变化时产生告警；无历史状态时不视为变化
pub fn transition_alert(zone: &SafeZone, previous: Option<bool>, inside: bool) -> Option<AlertType> {
    match (previous, inside) {
        (Some(false), true) if zone.notify_on_entry => Some(AlertType::Entry),
        (Some(true), false) if zone.notify_on_exit => Some(AlertType::Exit),
        _ => None,
    }
}

/// 在区域内且不在允许时段时，每次停留只告警一次；离开或回到允许时段后复位。
/// 返回 (是否告警, 新的已告警标记)
pub fn schedule_check(inside: bool, allowed_now: bool, already_alerted: bool) -> (bool, bool) {
    if inside && !allowed_now {
        (!already_alerted, true)
    } else {
        (false, false)
    }
}

/// 低电量每次跌破阈值只告警一次，电量回升后复位；返回 (是否告警, 新的已告警标记)
pub fn low_battery_check(level: Option<i32>, threshold: i32, already_alerted: bool) -> (bool, bool) {
    match level {
        Some(level) if level < threshold => (!already_alerted, true),
        Some(_) => (false, false),
        None => (false, already_alerted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::geolocation::ZoneType;
    use chrono::{NaiveDate, NaiveDateTime};

    fn zone(radius_m: f64) -> SafeZone {
        SafeZone {
            id: 1,
            created_by: 1,
            device_id: Some(1),
            school_id: None,
            name: "Lycée".to_string(),
            zone_type: ZoneType::School,
            latitude: 3.8480,
            longitude: 11.5021,
            radius_m,
            notify_on_entry: true,
            notify_on_exit: true,
            allowed_time_start: None,
            allowed_time_end: None,
            allowed_days: vec![],
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_haversine_known_distance() {
        // Yaoundé → Douala 约 194 km
        let d = haversine_m(3.8480, 11.5021, 4.0511, 9.7679);
        assert!((d - 193_000.0).abs() < 5_000.0, "distance was {d}");
        assert!(haversine_m(3.848, 11.502, 3.848, 11.502) < 1e-6);
    }

    #[test]
    fn test_coordinate_bounds() {
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-90.5, 0.0).is_err());
        assert!(validate_coordinates(0.0, 180.1).is_err());
        assert!(validate_radius(10.0).is_ok());
        assert!(validate_radius(50_000.0).is_ok());
        assert!(validate_radius(9.9).is_err());
        assert!(validate_radius(50_001.0).is_err());
    }

    #[test]
    fn test_inside_and_outside() {
        let z = zone(200.0);
        let (inside, _) = evaluate(&z, 3.8485, 11.5021);
        assert!(inside);
        let (inside, distance) = evaluate(&z, 3.8600, 11.5021);
        assert!(!inside);
        assert!(distance > 1_000.0);
    }

    #[test]
    fn test_transitions_only_on_change() {
        let z = zone(200.0);
        assert_eq!(transition_alert(&z, Some(false), true), Some(AlertType::Entry));
        assert_eq!(transition_alert(&z, Some(true), false), Some(AlertType::Exit));
        assert_eq!(transition_alert(&z, Some(true), true), None);
        assert_eq!(transition_alert(&z, None, true), None);

        let quiet = SafeZone {
            notify_on_exit: false,
            ..zone(200.0)
        };
        assert_eq!(transition_alert(&quiet, Some(true), false), None);
    }

    #[test]
    fn test_allowed_window_and_days() {
        let mut z = zone(200.0);
        z.allowed_time_start = Some("07:00".to_string());
        z.allowed_time_end = Some("17:30".to_string());
        z.allowed_days = vec![1, 2, 3, 4, 5];

        // 2025-03-03 是周一
        assert!(is_allowed_at(&z, &at(2025, 3, 3, 8, 0)));
        assert!(!is_allowed_at(&z, &at(2025, 3, 3, 17, 30)));
        assert!(!is_allowed_at(&z, &at(2025, 3, 8, 8, 0)));

        z.allowed_time_start = Some("22:00".to_string());
        z.allowed_time_end = Some("06:00".to_string());
        z.allowed_days = vec![];
        assert!(is_allowed_at(&z, &at(2025, 3, 8, 23, 15)));
        assert!(is_allowed_at(&z, &at(2025, 3, 8, 5, 59)));
        assert!(!is_allowed_at(&z, &at(2025, 3, 8, 12, 0)));
    }

    #[test]
    fn test_overstay_alerts_once_per_stay() {
        let mut z = zone(200.0);
        z.allowed_time_start = Some("07:00".to_string());
        z.allowed_time_end = Some("17:30".to_string());

        // 07:30 进入，19:00 仍在校内，20:00 依旧在校内
        let mut alerted = false;
        let mut raised = Vec::new();
        for hour in [7, 19, 20] {
            let allowed = is_allowed_at(&z, &at(2025, 3, 3, hour, 30));
            let (raise, next) = schedule_check(true, allowed, alerted);
            raised.push(raise);
            alerted = next;
        }
        assert_eq!(raised, vec![false, true, false]);

        // 离开后再次越界停留重新告警
        assert_eq!(schedule_check(false, false, alerted), (false, false));
        assert_eq!(schedule_check(true, false, false), (true, true));
        assert_eq!(schedule_check(true, true, true), (false, false));
    }

    #[test]
    fn test_low_battery_alerts_once_per_drop() {
        assert_eq!(low_battery_check(Some(15), 20, false), (true, true));
        assert_eq!(low_battery_check(Some(10), 20, true), (false, true));
        assert_eq!(low_battery_check(Some(80), 20, true), (false, false));
        assert_eq!(low_battery_check(None, 20, true), (false, true));
    }

    #[test]
    fn test_schedule_validation() {
        assert!(validate_schedule(Some("07:00"), Some("17:00"), &[1, 5]).is_ok());
        assert!(validate_schedule(Some("07:00"), None, &[]).is_err());
        assert!(validate_schedule(None, None, &[0]).is_err());
        assert!(validate_schedule(Some("25:00"), Some("17:00"), &[]).is_err());
    }
}
