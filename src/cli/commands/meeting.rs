use crate::cli::parser::{Commands, MeetingCmd};
use crate::config::Config;
use crate::core::meeting::{MeetingLogic, NewMeeting, meeting_qr_url};
use crate::db::initialize::open_db;
use crate::errors::AppResult;
use crate::models::meeting::{ManualAttendee, Meeting, MeetingAttendance};
use crate::ui::messages::{header, info, success, warning};
use crate::utils::date::{format_date_id, require_date};
use crate::utils::formatting::truncate;
use crate::utils::table::Table;
use crate::utils::time::{format_hhmm, require_time};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Meeting { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;

    match action {
        MeetingCmd::Create {
            title,
            date,
            start,
            end,
            venue,
            organizer,
            description,
        } => {
            let m = MeetingLogic::create(
                &mut pool,
                NewMeeting {
                    title: title.clone(),
                    date: require_date(date)?,
                    start_time: require_time(start)?,
                    end_time: require_time(end)?,
                    venue: venue.clone(),
                    organizer: organizer.clone(),
                    description: description.clone(),
                },
            )?;
            success(format!("Meeting #{} \"{}\" created.", m.id, m.title));
            println!("QR : {}", meeting_qr_url(&cfg.qr_base_url, &m.qr_token));
        }
        MeetingCmd::Status { id, status } => {
            MeetingLogic::set_status(&mut pool, *id, *status)?;
            success(format!("Meeting #{id} is now {status}."));
        }
        MeetingCmd::List { from } => {
            let from = match from {
                Some(d) => Some(require_date(d)?),
                None => None,
            };
            let rows = MeetingLogic::list(&pool, from)?;
            if rows.is_empty() {
                warning("No meetings found.");
                return Ok(());
            }

            let mut table = Table::new(
                &["ID", "Tanggal", "Jam", "Judul", "Tempat", "Status"],
                cfg.separator(),
            );
            for m in &rows {
                table.add_row(vec![
                    m.id.to_string(),
                    m.date.to_string(),
                    format!("{}-{}", format_hhmm(m.start_time), format_hhmm(m.end_time)),
                    truncate(&m.title, 32),
                    truncate(&m.venue, 20),
                    m.status.to_string(),
                ]);
            }
            print!("{}", table.render());
        }
        MeetingCmd::Show { id } => {
            let (m, attendance) = MeetingLogic::show(&pool, *id)?;
            print_meeting(&m, cfg);
            print_attendance(&attendance, cfg.separator());
        }
        MeetingCmd::Attend { token, employee } => {
            let id = MeetingLogic::attend_scan(&mut pool, token, employee)?;
            success(format!("Attendance #{id} recorded."));
        }
        MeetingCmd::AttendManual {
            id,
            name,
            position,
            department,
        } => {
            let attendee = ManualAttendee {
                name: name.clone(),
                position: position.clone(),
                department: department.clone(),
            };
            let att_id = MeetingLogic::attend_manual(&mut pool, *id, &attendee)?;
            success(format!("{name} added to meeting #{id} (attendance #{att_id})."));
        }
        MeetingCmd::Attendance { id } => {
            let rows = MeetingLogic::attendance(&pool, *id)?;
            print_attendance(&rows, cfg.separator());
        }
        MeetingCmd::DelAttendance { attendance_id } => {
            MeetingLogic::delete_attendance(&mut pool, *attendance_id)?;
            success(format!("Attendance #{attendance_id} removed."));
        }
        MeetingCmd::Del { id } => {
            MeetingLogic::delete(&mut pool, *id)?;
            success(format!("Meeting #{id} deleted."));
        }
    }

    Ok(())
}

fn print_meeting(m: &Meeting, cfg: &Config) {
    header(format!("Meeting #{}: {}", m.id, m.title));
    println!("Tanggal   : {}", format_date_id(m.date));
    println!("Jam       : {} - {}", format_hhmm(m.start_time), format_hhmm(m.end_time));
    println!("Tempat    : {}", m.venue);
    println!("Penyelenggara: {}", m.organizer.as_deref().unwrap_or("-"));
    if let Some(d) = &m.description {
        println!("Keterangan: {d}");
    }
    println!("Status    : {}", m.status);
    println!("QR        : {}\n", meeting_qr_url(&cfg.qr_base_url, &m.qr_token));
}

fn print_attendance(rows: &[MeetingAttendance], sep: char) {
    if rows.is_empty() {
        info("No attendance yet.");
        return;
    }

    let mut table = Table::new(
        &["ID", "NIK", "Nama", "Jabatan", "Departemen", "Cara", "Waktu"],
        sep,
    );
    for a in rows {
        table.add_row(vec![
            a.id.to_string(),
            a.nik.clone().unwrap_or_else(|| "-".into()),
            truncate(&a.name, 28),
            a.position.clone().unwrap_or_default(),
            a.department.clone().unwrap_or_default(),
            a.kind.clone(),
            a.scanned_at.clone(),
        ]);
    }
    print!("{}", table.render());
    info(format!("{} attendee(s).", rows.len()));
}
