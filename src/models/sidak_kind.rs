use serde::{Deserialize, Serialize};
use std::fmt;

/// Every SIDAK inspection form handled by the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidakKind {
    Apd,
    Antrian,
    Jarak,
    Kecepatan,
    Rambu,
    Seatbelt,
    Fatigue,
    Workshop,
    Loto,
    Digital,
}

impl SidakKind {
    pub const ALL: [SidakKind; 10] = [
        SidakKind::Apd,
        SidakKind::Antrian,
        SidakKind::Jarak,
        SidakKind::Kecepatan,
        SidakKind::Rambu,
        SidakKind::Seatbelt,
        SidakKind::Fatigue,
        SidakKind::Workshop,
        SidakKind::Loto,
        SidakKind::Digital,
    ];

    /// Key used in the database and for draft files.
    pub fn as_str(&self) -> &'static str {
        match self {
            SidakKind::Apd => "apd",
            SidakKind::Antrian => "antrian",
            SidakKind::Jarak => "jarak",
            SidakKind::Kecepatan => "kecepatan",
            SidakKind::Rambu => "rambu",
            SidakKind::Seatbelt => "seatbelt",
            SidakKind::Fatigue => "fatigue",
            SidakKind::Workshop => "workshop",
            SidakKind::Loto => "loto",
            SidakKind::Digital => "digital",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    pub fn title(&self) -> &'static str {
        match self {
            SidakKind::Apd => "SIDAK Alat Pelindung Diri (APD)",
            SidakKind::Antrian => "SIDAK Antrian Unit",
            SidakKind::Jarak => "SIDAK Jarak Aman Unit",
            SidakKind::Kecepatan => "SIDAK Kecepatan Unit",
            SidakKind::Rambu => "SIDAK Kepatuhan Rambu",
            SidakKind::Seatbelt => "SIDAK Pemakaian Seatbelt",
            SidakKind::Fatigue => "SIDAK Fatigue Karyawan",
            SidakKind::Workshop => "SIDAK Peralatan Workshop",
            SidakKind::Loto => "SIDAK Lock Out Tag Out (LOTO)",
            SidakKind::Digital => "SIDAK Pengawas Digital",
        }
    }

    pub fn max_records(&self) -> usize {
        match self {
            SidakKind::Apd
            | SidakKind::Antrian
            | SidakKind::Rambu
            | SidakKind::Seatbelt => 10,
            SidakKind::Jarak => 15,
            SidakKind::Kecepatan
            | SidakKind::Fatigue
            | SidakKind::Workshop
            | SidakKind::Loto
            | SidakKind::Digital => 20,
        }
    }

    /// Upper bound on observers; `None` means unbounded.
    pub fn max_observers(&self) -> Option<usize> {
        match self {
            SidakKind::Workshop => Some(2),
            _ => None,
        }
    }

    /// Workshop records describe equipment, not people.
    pub fn records_are_equipment(&self) -> bool {
        matches!(self, SidakKind::Workshop)
    }
}

impl fmt::Display for SidakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_every_kind() {
        for k in SidakKind::ALL {
            assert_eq!(SidakKind::parse(k.as_str()), Some(k));
        }
        assert_eq!(SidakKind::parse(" APD "), Some(SidakKind::Apd));
        assert_eq!(SidakKind::parse("pencahayaan"), None);
    }

    #[test]
    fn limits_follow_form_rules() {
        assert_eq!(SidakKind::Apd.max_records(), 10);
        assert_eq!(SidakKind::Jarak.max_records(), 15);
        assert_eq!(SidakKind::Fatigue.max_records(), 20);
        assert_eq!(SidakKind::Workshop.max_observers(), Some(2));
        assert_eq!(SidakKind::Rambu.max_observers(), None);
    }
}
