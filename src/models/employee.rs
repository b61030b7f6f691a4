use crate::models::expiry::{ExpiryLevel, ExpiryStatus, expiry_status, worst_level};
use crate::models::shift::Shift;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Licence kinds tracked per employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LicenseKind {
    #[serde(rename = "SIMPOL")]
    Sim,
    #[serde(rename = "SIMPER BIB")]
    SimperBib,
    #[serde(rename = "SIMPER TIA")]
    SimperTia,
}

impl LicenseKind {
    pub fn label(&self) -> &'static str {
        match self {
            LicenseKind::Sim => "SIMPOL",
            LicenseKind::SimperBib => "SIMPER BIB",
            LicenseKind::SimperTia => "SIMPER TIA",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Employee {
    pub nik: String,
    pub name: String,
    pub position: String,
    pub department: String,
    pub company: String,
    pub phone: Option<String>,
    pub shift: Option<Shift>,
    pub sim_expiry: Option<NaiveDate>,
    pub simper_bib_expiry: Option<NaiveDate>,
    pub simper_tia_expiry: Option<NaiveDate>,
    pub active: bool,
    pub created_at: String,
}

impl Employee {
    pub fn licenses(&self) -> [(LicenseKind, Option<NaiveDate>); 3] {
        [
            (LicenseKind::Sim, self.sim_expiry),
            (LicenseKind::SimperBib, self.simper_bib_expiry),
            (LicenseKind::SimperTia, self.simper_tia_expiry),
        ]
    }

    pub fn license_statuses(&self, today: NaiveDate) -> Vec<(LicenseKind, ExpiryStatus)> {
        self.licenses()
            .into_iter()
            .map(|(k, d)| (k, expiry_status(d, today)))
            .collect()
    }

    pub fn worst_license_level(&self, today: NaiveDate) -> ExpiryLevel {
        worst_level(self.license_statuses(today).into_iter().map(|(_, s)| s.level))
    }
}

/// Fields accepted when creating or updating an employee.
/// `None` on update means "leave unchanged".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EmployeeInput {
    pub nik: String,
    pub name: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub shift: Option<String>,
    pub sim_expiry: Option<String>,
    pub simper_bib_expiry: Option<String>,
    pub simper_tia_expiry: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_license_wins() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let e = Employee {
            nik: "C-025660".into(),
            name: "Budi".into(),
            position: "Driver".into(),
            department: "Hauling".into(),
            company: "GECL".into(),
            phone: None,
            shift: None,
            sim_expiry: NaiveDate::from_ymd_opt(2027, 1, 1),
            simper_bib_expiry: NaiveDate::from_ymd_opt(2026, 1, 15),
            simper_tia_expiry: None,
            active: true,
            created_at: String::new(),
        };
        assert_eq!(e.worst_license_level(today), ExpiryLevel::Kritis);
    }
}
