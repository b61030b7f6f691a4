use crate::core::qr::decode_employee_qr;
use crate::db::employees;
use crate::db::log::ttlog_quiet;
use crate::db::meetings as queries;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::meeting::{ManualAttendee, Meeting, MeetingAttendance, MeetingStatus};
use chrono::{NaiveDate, NaiveTime};
use rand::RngCore;
use regex::Regex;

/// Fields of a new meeting.
#[derive(Debug, Clone)]
pub struct NewMeeting {
    pub title: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub venue: String,
    pub organizer: Option<String>,
    pub description: Option<String>,
}

/// 12 lowercase hex characters.
pub fn generate_token() -> String {
    let mut bytes = [0u8; 6];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

pub fn meeting_qr_url(base_url: &str, token: &str) -> String {
    format!("{}/meeting-attend?token={}", base_url.trim_end_matches('/'), token)
}

/// Accept either the bare token or the attendance URL printed on the QR.
pub fn extract_token(payload: &str) -> AppResult<String> {
    let raw = payload.trim();
    let re = Regex::new(r"(?:^|[?&]token=)([0-9a-f]{12})(?:$|[&#])").map_err(|e| AppError::Other(e.to_string()))?;
    re.captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| AppError::InvalidQr(format!("no meeting token in '{}'", raw)))
}

pub struct MeetingLogic;

impl MeetingLogic {
    pub fn create(pool: &mut DbPool, m: NewMeeting) -> AppResult<Meeting> {
        if m.title.trim().is_empty() {
            return Err(AppError::Validation("meeting title is required".into()));
        }
        if m.end_time <= m.start_time {
            return Err(AppError::Validation("end time must be after start time".into()));
        }

        let mut token = generate_token();
        while queries::token_exists(&pool.conn, &token)? {
            token = generate_token();
        }

        let meeting = Meeting {
            id: 0,
            title: m.title.trim().to_string(),
            date: m.date,
            start_time: m.start_time,
            end_time: m.end_time,
            venue: m.venue,
            organizer: m.organizer,
            description: m.description,
            status: MeetingStatus::Scheduled,
            qr_token: token,
            created_at: String::new(),
        };

        let id = queries::insert_meeting(&pool.conn, &meeting)?;
        ttlog_quiet(&pool.conn, "add", &format!("meeting #{}", id), &meeting.title);
        queries::get_meeting(&pool.conn, id)
    }

    pub fn set_status(pool: &mut DbPool, id: i64, status: MeetingStatus) -> AppResult<()> {
        queries::update_status(&pool.conn, id, status)?;
        ttlog_quiet(&pool.conn, "edit", &format!("meeting #{}", id), &format!("Status: {}", status));
        Ok(())
    }

    pub fn list(pool: &DbPool, from: Option<NaiveDate>) -> AppResult<Vec<Meeting>> {
        queries::list_meetings(&pool.conn, from)
    }

    pub fn show(pool: &DbPool, id: i64) -> AppResult<(Meeting, Vec<MeetingAttendance>)> {
        Ok((queries::get_meeting(&pool.conn, id)?, queries::list_attendance(&pool.conn, id)?))
    }

    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<()> {
        queries::delete_meeting(&pool.conn, id)?;
        ttlog_quiet(&pool.conn, "del", &format!("meeting #{}", id), "Meeting deleted");
        Ok(())
    }

    fn open_meeting(meeting: &Meeting) -> AppResult<()> {
        if !meeting.status.accepts_attendance() {
            return Err(AppError::Validation(format!(
                "meeting #{} is {}",
                meeting.id, meeting.status
            )));
        }
        Ok(())
    }

    /// Attendance from the meeting QR token plus the employee's card.
    pub fn attend_scan(pool: &mut DbPool, token_payload: &str, employee_payload: &str) -> AppResult<i64> {
        let token = extract_token(token_payload)?;
        let meeting = queries::find_by_token(&pool.conn, &token)?
            .ok_or_else(|| AppError::NotFound(format!("Meeting with token {}", token)))?;
        Self::open_meeting(&meeting)?;

        let nik = decode_employee_qr(employee_payload)?;
        let emp = employees::get_employee(&pool.conn, &nik)?;

        if queries::has_attended(&pool.conn, meeting.id, &nik)? {
            return Err(AppError::Duplicate(format!(
                "{} already attended meeting #{}",
                emp.name, meeting.id
            )));
        }

        let id = queries::insert_scan(&pool.conn, meeting.id, &nik)?;
        ttlog_quiet(&pool.conn, "meeting_attend", &format!("meeting #{}", meeting.id), &nik);
        Ok(id)
    }

    pub fn attend_manual(pool: &mut DbPool, meeting_id: i64, attendee: &ManualAttendee) -> AppResult<i64> {
        let meeting = queries::get_meeting(&pool.conn, meeting_id)?;
        Self::open_meeting(&meeting)?;

        if attendee.name.trim().is_empty() {
            return Err(AppError::Validation("attendee name is required".into()));
        }

        let id = queries::insert_manual(&pool.conn, meeting_id, attendee)?;
        ttlog_quiet(
            &pool.conn,
            "meeting_attend",
            &format!("meeting #{}", meeting_id),
            &format!("manual: {}", attendee.name),
        );
        Ok(id)
    }

    pub fn attendance(pool: &DbPool, meeting_id: i64) -> AppResult<Vec<MeetingAttendance>> {
        queries::get_meeting(&pool.conn, meeting_id)?;
        queries::list_attendance(&pool.conn, meeting_id)
    }

    pub fn delete_attendance(pool: &mut DbPool, attendance_id: i64) -> AppResult<()> {
        queries::delete_attendance(&pool.conn, attendance_id)?;
        ttlog_quiet(&pool.conn, "del", &format!("meeting attendance #{}", attendance_id), "Attendance removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::initialize::test_pool;
    use crate::models::employee::Employee;

    fn new_meeting() -> NewMeeting {
        NewMeeting {
            title: "Safety Talk".into(),
            date: NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            venue: "Ruang P2H".into(),
            organizer: None,
            description: None,
        }
    }

    fn seed(pool: &DbPool, nik: &str) {
        let e = Employee {
            nik: nik.into(),
            name: "Rudi".into(),
            position: "Mekanik".into(),
            department: "Plant".into(),
            company: "GECL".into(),
            phone: None,
            shift: None,
            sim_expiry: None,
            simper_bib_expiry: None,
            simper_tia_expiry: None,
            active: true,
            created_at: String::new(),
        };
        employees::insert_employee(&pool.conn, &e).unwrap();
    }

    #[test]
    fn token_shape() {
        let t = generate_token();
        assert_eq!(t.len(), 12);
        assert!(t.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(extract_token(&meeting_qr_url("https://h.id", &t)).unwrap(), t);
        assert_eq!(extract_token(&t).unwrap(), t);
        assert!(extract_token("xyz").is_err());
    }

    #[test]
    fn create_validates_times() {
        let mut pool = test_pool();
        let mut m = new_meeting();
        m.end_time = m.start_time;
        assert!(MeetingLogic::create(&mut pool, m).is_err());
        let created = MeetingLogic::create(&mut pool, new_meeting()).unwrap();
        assert_eq!(created.status, MeetingStatus::Scheduled);
    }

    #[test]
    fn scan_once_and_manual_entries() {
        let mut pool = test_pool();
        seed(&pool, "C-7");
        let m = MeetingLogic::create(&mut pool, new_meeting()).unwrap();

        MeetingLogic::attend_scan(&mut pool, &m.qr_token, "C-7").unwrap();
        let err = MeetingLogic::attend_scan(&mut pool, &m.qr_token, r#"{"id":"C-7"}"#).unwrap_err();
        assert!(matches!(err, AppError::Duplicate(_)));

        let guest = ManualAttendee {
            name: "Tamu Vendor".into(),
            position: Some("Teknisi".into()),
            department: None,
        };
        MeetingLogic::attend_manual(&mut pool, m.id, &guest).unwrap();

        let list = MeetingLogic::attendance(&pool, m.id).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Rudi");
        assert_eq!(list[0].department.as_deref(), Some("Plant"));
        assert_eq!(list[1].kind, "manual");

        MeetingLogic::set_status(&mut pool, m.id, MeetingStatus::Completed).unwrap();
        assert!(matches!(
            MeetingLogic::attend_manual(&mut pool, m.id, &guest),
            Err(AppError::Validation(_))
        ));

        MeetingLogic::delete(&mut pool, m.id).unwrap();
        assert!(MeetingLogic::show(&pool, m.id).is_err());
    }
}
