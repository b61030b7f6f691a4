use crate::export::{ExportFormat, ExportTarget};
use crate::models::meeting::MeetingStatus;
use crate::models::sidak_kind::SidakKind;
use crate::models::statistics::StatSeries;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface definition for rHSE
#[derive(Parser)]
#[command(
    name = "rhse",
    version = env!("CARGO_PKG_VERSION"),
    about = "HSE management CLI: employees, QR attendance, SIDAK inspections, meetings, statistics and reports on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

fn parse_kind(s: &str) -> Result<SidakKind, String> {
    SidakKind::parse(s).ok_or_else(|| {
        let all: Vec<&str> = SidakKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("unknown inspection kind '{s}' (expected one of: {})", all.join(", "))
    })
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Editor to use with --edit")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Zip the database together with documents, photos and drafts
        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Employee master data and licences
    Employee {
        #[command(subcommand)]
        action: EmployeeCmd,
    },

    /// QR / manual attendance
    Attendance {
        #[command(subcommand)]
        action: AttendanceCmd,
    },

    /// SIDAK inspection wizard
    Sidak {
        #[command(subcommand)]
        action: SidakCmd,
    },

    /// Saved wizard drafts
    Draft {
        #[command(subcommand)]
        action: DraftCmd,
    },

    /// Safety meetings and their attendance
    Meeting {
        #[command(subcommand)]
        action: MeetingCmd,
    },

    /// HSE document library (PDF)
    Document {
        #[command(subcommand)]
        action: DocumentCmd,
    },

    /// News board
    News {
        #[command(subcommand)]
        action: NewsCmd,
    },

    /// WhatsApp broadcast and reminders
    Blast {
        #[command(subcommand)]
        action: BlastCmd,
    },

    /// TIFR / fatigue / CIFR statistics
    Stats {
        #[command(subcommand)]
        action: StatsCmd,
    },

    /// Today's overview
    Dashboard {
        #[arg(long, help = "Reference date (YYYY-MM-DD), default today")]
        date: Option<String>,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Export data to CSV, JSON, XLSX or PDF
    Export {
        #[arg(long = "what", value_enum, default_value = "attendance")]
        what: ExportTarget,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE", help = "Absolute output path")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter by year/month/day or a custom range (YYYY-MM-DD:YYYY-MM-DD)"
        )]
        range: Option<String>,

        #[arg(long, value_parser = parse_kind, help = "Only this SIDAK kind")]
        kind: Option<SidakKind>,

        #[arg(long, value_name = "ID", help = "Meeting id (meeting-attendance)")]
        meeting: Option<i64>,

        #[arg(long, short = 'f')]
        force: bool,
    },
}

/// Employee fields shared by `add` and `edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct EmployeeFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub position: Option<String>,
    #[arg(long)]
    pub department: Option<String>,
    #[arg(long)]
    pub company: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long, help = "Scheduled shift: 1, 2, \"Shift 1\" or \"Shift 2\"")]
    pub shift: Option<String>,
    #[arg(long = "sim", value_name = "DATE", help = "SIM expiry (YYYY-MM-DD)")]
    pub sim_expiry: Option<String>,
    #[arg(long = "simper-bib", value_name = "DATE", help = "SIMPER BIB expiry")]
    pub simper_bib_expiry: Option<String>,
    #[arg(long = "simper-tia", value_name = "DATE", help = "SIMPER TIA expiry")]
    pub simper_tia_expiry: Option<String>,
}

#[derive(Subcommand)]
pub enum EmployeeCmd {
    /// Register a new employee
    Add {
        nik: String,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// Update only the given fields
    Edit {
        nik: String,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    Show {
        nik: String,
    },
    List {
        #[arg(long)]
        department: Option<String>,
        #[arg(long, help = "Match name or NIK")]
        search: Option<String>,
        #[arg(long, help = "Include inactive employees")]
        all: bool,
    },
    Activate {
        nik: String,
    },
    Deactivate {
        nik: String,
    },
    Del {
        nik: String,
    },
    /// Import or update employees from a CSV file with a header row
    Import {
        file: PathBuf,
    },
    /// Print the QR payloads of an employee card
    Qr {
        nik: String,
    },
    /// Licences expiring within N days (expired ones included)
    Expiry {
        #[arg(long, default_value_t = 60)]
        within: i64,
    },
}

/// Fit-to-work questions asked at check-in.
#[derive(Args, Debug, Clone, Default)]
pub struct FitnessArgs {
    #[arg(long = "sleep", value_name = "HOURS")]
    pub sleep_hours: Option<f64>,
    #[arg(long = "fit", conflicts_with = "unfit")]
    pub fit: bool,
    #[arg(long = "unfit")]
    pub unfit: bool,
}

#[derive(Subcommand)]
pub enum AttendanceCmd {
    /// Record attendance from a scanned QR payload
    Scan {
        payload: String,
        #[arg(long, help = "YYYY-MM-DD, default today (WITA)")]
        date: Option<String>,
        #[arg(long, help = "HH:MM, default now (WITA)")]
        time: Option<String>,
        #[command(flatten)]
        fitness: FitnessArgs,
    },
    /// Record attendance by NIK
    Manual {
        nik: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[command(flatten)]
        fitness: FitnessArgs,
    },
    List {
        #[arg(long, conflicts_with = "range")]
        date: Option<String>,
        #[arg(long)]
        range: Option<String>,
    },
    /// Per-shift counts for one day
    Summary {
        #[arg(long)]
        date: Option<String>,
    },
    Del {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum SidakCmd {
    /// List inspection kinds and their checklist fields
    Kinds {
        #[arg(value_parser = parse_kind)]
        kind: Option<SidakKind>,
    },
    /// Step 1: create a session header
    Start {
        #[arg(value_parser = parse_kind)]
        kind: SidakKind,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long, help = "Default: derived from the time")]
        shift: Option<String>,
        #[arg(long)]
        location: String,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long = "sub-location")]
        sub_location: Option<String>,
        #[arg(long = "speed-limit", value_name = "KPH")]
        speed_limit: Option<f64>,
        #[arg(long)]
        workshop: Option<String>,
        #[arg(long)]
        pic: Option<String>,
        #[arg(long = "end-time")]
        end_time: Option<String>,
        #[arg(long = "by")]
        created_by: Option<String>,
        #[arg(long = "discard-draft", help = "Drop an unfinished draft of this kind without asking")]
        discard_draft: bool,
    },
    /// Step 2: add an inspected person or unit
    Record {
        session: i64,
        #[arg(long, help = "Name (workshop: equipment description)")]
        name: String,
        #[arg(long)]
        nik: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        remarks: Option<String>,
        #[arg(
            long = "field",
            short = 'F',
            value_name = "KEY=VALUE",
            help = "Checklist value, repeatable (see `sidak kinds <kind>`)"
        )]
        fields: Vec<String>,
        #[arg(long, conflicts_with = "fields", help = "Checklist as a JSON object")]
        json: Option<String>,
    },
    /// Step 3: add an observer sign-off
    Observer {
        session: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        nik: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long, help = "PNG signature as data URL or bare base64")]
        signature: Option<String>,
        #[arg(long = "signature-file", conflicts_with = "signature")]
        signature_file: Option<PathBuf>,
    },
    /// Close the session
    Finish {
        session: i64,
    },
    /// Attach activity photos (jpg/png)
    Photos {
        session: i64,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    List {
        #[arg(long, value_parser = parse_kind)]
        kind: Option<SidakKind>,
        #[arg(long, help = "Default: current month")]
        range: Option<String>,
    },
    Show {
        session: i64,
    },
    /// PDF report of one session
    Report {
        session: i64,
        #[arg(long, value_name = "FILE")]
        file: String,
        #[arg(long, short = 'f')]
        force: bool,
    },
    Del {
        session: i64,
    },
}

#[derive(Subcommand)]
pub enum DraftCmd {
    /// Drafts waiting to be resumed
    List,
    /// Show a saved draft
    Show {
        #[arg(value_parser = parse_kind)]
        kind: SidakKind,
    },
    /// Discard a saved draft
    Clear {
        #[arg(value_parser = parse_kind)]
        kind: SidakKind,
    },
}

#[derive(Subcommand)]
pub enum MeetingCmd {
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        date: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        venue: String,
        #[arg(long)]
        organizer: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Status {
        id: i64,
        #[arg(value_enum)]
        status: MeetingStatus,
    },
    List {
        #[arg(long, help = "Only meetings on or after this date")]
        from: Option<String>,
    },
    Show {
        id: i64,
    },
    /// Attendance from the meeting QR and the employee card QR
    Attend {
        #[arg(long, help = "Meeting QR payload or token")]
        token: String,
        #[arg(long, help = "Employee card QR payload or NIK")]
        employee: String,
    },
    /// Attendance of a guest without an employee card
    AttendManual {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        department: Option<String>,
    },
    Attendance {
        id: i64,
    },
    DelAttendance {
        attendance_id: i64,
    },
    Del {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum DocumentCmd {
    /// Upload one or more PDF files
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, help = "Title (single file only; default: file name)")]
        title: Option<String>,
        #[arg(long, default_value = "umum")]
        category: String,
        #[arg(long = "by")]
        uploaded_by: Option<String>,
    },
    List {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, help = "Include inactive documents")]
        all: bool,
    },
    Activate {
        id: i64,
    },
    Deactivate {
        id: i64,
    },
    Del {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum NewsCmd {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value = "info")]
        category: String,
        #[arg(long)]
        author: Option<String>,
    },
    List {
        #[arg(long, help = "Include inactive news")]
        all: bool,
    },
    Toggle {
        id: i64,
    },
    Del {
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum BlastCmd {
    /// Free-form message; {nama}, {nik} and {departemen} are filled per person
    Send {
        #[arg(long)]
        message: String,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        search: Option<String>,
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Remind employees whose SIMPER/SIM expires soon
    SimperReminders {
        #[arg(long, default_value_t = 30)]
        within: i64,
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Message the configured admin number
    Admin {
        #[arg(long)]
        message: String,
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Tell the admin about a licence renewal step of one employee
    Progress {
        nik: String,
        #[arg(long, default_value = "SIMPER")]
        doc: String,
        #[arg(long)]
        status: String,
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Tell an employee that a document is ready for pickup
    Pickup {
        nik: String,
        #[arg(long, default_value = "SIMPER")]
        doc: String,
        #[arg(long = "dry-run")]
        dry_run: bool,
    },
    /// Delivery log
    Log {
        #[arg(long)]
        batch: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: i64,
    },
}

#[derive(Subcommand)]
pub enum StatsCmd {
    /// Monthly table with TIFR, fatigue rate and CIFR
    Show {
        year: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Set one monthly value
    Set {
        year: i32,
        #[arg(value_enum)]
        series: StatSeries,
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        value: f64,
    },
    /// Set calculation parameters
    Params {
        year: i32,
        #[arg(long = "leap-year")]
        leap_year: Option<bool>,
        #[arg(long = "hours-per-day")]
        hours_per_day: Option<f64>,
        #[arg(long = "factor-mh")]
        factor_mh: Option<f64>,
        #[arg(long = "tr-value")]
        tr_value: Option<f64>,
        #[arg(long = "ytd-tifr")]
        ytd_tifr: Option<bool>,
        #[arg(long = "ytd-fatigue")]
        ytd_fatigue: Option<bool>,
        #[arg(long = "ytd-cifr")]
        ytd_cifr: Option<bool>,
    },
}
