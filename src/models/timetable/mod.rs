use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课表时段
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableSlot {
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    /// 1 = 周一 … 7 = 周日
    pub day_of_week: i32,
    /// HH:MM
    pub start_time: String,
    pub end_time: String,
    pub classroom: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct CreateTimetableSlotRequest {
    pub class_id: i64,
    pub subject_id: i64,
    pub teacher_id: i64,
    pub day_of_week: i32,
    pub start_time: String,
    pub end_time: String,
    pub classroom: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/timetable.ts")]
pub struct TimetableQuery {
    pub class_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub day_of_week: Option<i32>,
}

/// 解析 HH:MM 为当天分钟数
pub fn parse_hhmm(value: &str) -> Option<u32> {
    let (h, m) = value.split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// 统一成补零的 HH:MM，存库后按字符串排序即按时间排序；无法解析时原样返回
pub fn canonical_hhmm(value: &str) -> String {
    parse_hhmm(value.trim()).map_or_else(|| value.to_string(), format_hhmm)
}

/// 半开区间 [start, end) 是否相交
pub fn ranges_overlap(a: (u32, u32), b: (u32, u32)) -> bool {
    a.0 < b.1 && b.0 < a.1
}

impl CreateTimetableSlotRequest {
    /// 校验并返回 (start, end) 分钟数
    pub fn validate(&self) -> Result<(u32, u32), &'static str> {
        if !(1..=7).contains(&self.day_of_week) {
            return Err("day_of_week must be between 1 and 7");
        }
        let start = parse_hhmm(&self.start_time).ok_or("start_time must be HH:MM")?;
        let end = parse_hhmm(&self.end_time).ok_or("end_time must be HH:MM")?;
        if end <= start {
            return Err("end_time must be after start_time");
        }
        Ok((start, end))
    }
}

impl TimetableSlot {
    pub fn minutes(&self) -> Option<(u32, u32)> {
        Some((parse_hhmm(&self.start_time)?, parse_hhmm(&self.end_time)?))
    }

    /// 同一教师同一天时间相交，用于跨校检查
    pub fn overlaps_teacher(&self, req: &CreateTimetableSlotRequest, range: (u32, u32)) -> bool {
        self.is_active
            && self.teacher_id == req.teacher_id
            && self.day_of_week == req.day_of_week
            && self.minutes().is_some_and(|own| ranges_overlap(own, range))
    }

    /// 与待创建时段是否冲突：同一天且时间相交，并共用班级、教师或教室
    pub fn conflicts_with(&self, req: &CreateTimetableSlotRequest, range: (u32, u32)) -> bool {
        if !self.is_active || self.day_of_week != req.day_of_week {
            return false;
        }
        let Some(own) = self.minutes() else {
            return false;
        };
        if !ranges_overlap(own, range) {
            return false;
        }

        let same_room = match (&self.classroom, &req.classroom) {
            (Some(a), Some(b)) => a.trim().eq_ignore_ascii_case(b.trim()),
            _ => false,
        };
        self.class_id == req.class_id || self.teacher_id == req.teacher_id || same_room
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(class_id: i64, teacher_id: i64, start: &str, end: &str) -> CreateTimetableSlotRequest {
        CreateTimetableSlotRequest {
            class_id,
            subject_id: 1,
            teacher_id,
            day_of_week: 1,
            start_time: start.to_string(),
            end_time: end.to_string(),
            classroom: Some("B12".to_string()),
        }
    }

    fn slot(class_id: i64, teacher_id: i64, start: &str, end: &str) -> TimetableSlot {
        TimetableSlot {
            id: 1,
            school_id: 1,
            class_id,
            subject_id: 1,
            teacher_id,
            day_of_week: 1,
            start_time: start.to_string(),
            end_time: end.to_string(),
            classroom: None,
            is_active: true,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("07:30"), Some(450));
        assert_eq!(parse_hhmm("7:05"), Some(425));
        assert_eq!(parse_hhmm("23:59"), Some(1439));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("12:60"), None);
        assert_eq!(parse_hhmm("1230"), None);
        assert_eq!(parse_hhmm("12:5"), None);
    }

    #[test]
    fn test_canonical_form_is_zero_padded() {
        assert_eq!(canonical_hhmm("7:05"), "07:05");
        assert_eq!(canonical_hhmm(" 13:00 "), "13:00");
        assert_eq!(canonical_hhmm("noon"), "noon");
        assert_eq!(format_hhmm(0), "00:00");
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        assert!(request(1, 1, "10:00", "09:00").validate().is_err());
        assert!(request(1, 1, "10:00", "10:00").validate().is_err());
        assert_eq!(request(1, 1, "08:00", "09:30").validate(), Ok((480, 570)));
    }

    #[test]
    fn test_adjacent_slots_do_not_conflict() {
        let existing = slot(1, 1, "08:00", "09:00");
        let req = request(1, 2, "09:00", "10:00");
        let range = req.validate().unwrap();
        assert!(!existing.conflicts_with(&req, range));
    }

    #[test]
    fn test_same_teacher_overlap_conflicts() {
        let existing = slot(5, 9, "08:00", "10:00");
        let req = request(6, 9, "09:00", "11:00");
        let range = req.validate().unwrap();
        assert!(existing.conflicts_with(&req, range));
    }

    #[test]
    fn test_same_classroom_overlap_conflicts() {
        let mut existing = slot(5, 8, "08:00", "10:00");
        existing.classroom = Some("b12 ".to_string());
        let req = request(6, 9, "09:00", "11:00");
        let range = req.validate().unwrap();
        assert!(existing.conflicts_with(&req, range));
    }

    #[test]
    fn test_unrelated_overlap_is_allowed() {
        let existing = slot(5, 8, "08:00", "10:00");
        let req = request(6, 9, "09:00", "11:00");
        let range = req.validate().unwrap();
        assert!(!existing.conflicts_with(&req, range));
    }

    #[test]
    fn test_teacher_overlap_ignores_room_and_class() {
        let mut elsewhere = slot(40, 9, "08:00", "10:00");
        elsewhere.classroom = Some("B12".to_string());
        let range = request(6, 9, "09:30", "10:30").validate().unwrap();
        assert!(elsewhere.overlaps_teacher(&request(6, 9, "09:30", "10:30"), range));

        let other_teacher = request(6, 7, "09:30", "10:30");
        assert!(!elsewhere.overlaps_teacher(&other_teacher, range));
        let later = request(6, 9, "10:00", "11:00");
        assert!(!elsewhere.overlaps_teacher(&later, later.validate().unwrap()));
    }
}
