//! Per-kind checklist payloads of SIDAK records.
//!
//! The payload is stored as kind-tagged JSON in `sidak_records.checklist`.
//! `FieldDef` tables drive `key=value` input from the CLI and the column
//! layout of exports; `findings` lists every non-compliant item.

use crate::errors::{AppError, AppResult};
use crate::models::sidak_kind::SidakKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Minimum gap between hauling units considered safe, in metres.
pub const MIN_SAFE_DISTANCE_M: f64 = 50.0;

/// Fewer hours of sleep than this is reported as a fatigue finding.
pub const MIN_SLEEP_HOURS: f64 = 6.0;

pub const MPH_TO_KPH: f64 = 1.60934;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Bool,
    Text,
    Number,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    pub ty: FieldType,
    /// Optional fields become `null` when not given.
    pub optional: bool,
    /// Used when the caller does not set the field.
    pub default: Option<&'static str>,
}

const fn check(name: &'static str, label: &'static str) -> FieldDef {
    FieldDef {
        name,
        label,
        ty: FieldType::Bool,
        optional: false,
        default: Some("true"),
    }
}

const fn answer(name: &'static str, label: &'static str) -> FieldDef {
    FieldDef {
        name,
        label,
        ty: FieldType::Bool,
        optional: false,
        default: None,
    }
}

const fn text(name: &'static str, label: &'static str) -> FieldDef {
    FieldDef {
        name,
        label,
        ty: FieldType::Text,
        optional: false,
        default: None,
    }
}

const fn opt_text(name: &'static str, label: &'static str) -> FieldDef {
    FieldDef {
        name,
        label,
        ty: FieldType::Text,
        optional: true,
        default: None,
    }
}

const fn number(name: &'static str, label: &'static str) -> FieldDef {
    FieldDef {
        name,
        label,
        ty: FieldType::Number,
        optional: false,
        default: None,
    }
}

const fn opt_number(name: &'static str, label: &'static str) -> FieldDef {
    FieldDef {
        name,
        label,
        ty: FieldType::Number,
        optional: true,
        default: None,
    }
}

const APD_FIELDS: &[FieldDef] = &[
    opt_text("position", "Jabatan"),
    opt_text("work_area", "Area Kerja"),
    check("helmet", "Helm"),
    check("vest", "Rompi"),
    check("boots", "Sepatu"),
    check("glasses", "Kacamata"),
    check("gloves", "Sarung Tangan"),
    check("mask", "Masker"),
    check("earplug", "Earplug"),
];

const ANTRIAN_FIELDS: &[FieldDef] = &[
    text("unit_number", "No. Lambung"),
    check("handbrake_on", "Handbrake Aktif"),
    check("safe_distance", "Jarak Unit Aman"),
];

const JARAK_FIELDS: &[FieldDef] = &[
    text("vehicle_number", "No. Kendaraan"),
    text("unit_type", "Tipe Unit"),
    opt_text("loaded_location", "Lokasi Muatan"),
    opt_text("empty_location", "Lokasi Kosongan"),
    opt_text("front_unit_number", "Unit Depan"),
    number("distance_m", "Jarak (m)"),
];

const KECEPATAN_FIELDS: &[FieldDef] = &[
    text("vehicle_number", "No. Kendaraan"),
    text("unit_type", "Tipe Unit"),
    check("loaded", "Muatan"),
    opt_number("speed_mph", "MPH"),
    opt_number("speed_kph", "KPH"),
];

const RAMBU_FIELDS: &[FieldDef] = &[
    text("vehicle_number", "No. Kendaraan"),
    check("stop", "Stop"),
    check("give_way", "Give Way"),
    check("max_speed", "Kecepatan Max"),
    check("no_entry", "Dilarang Masuk"),
    check("no_parking", "Dilarang Parkir"),
    check("helmet_required", "Wajib Helm"),
    check("no_u_turn", "Dilarang Putar Balik"),
];

const SEATBELT_FIELDS: &[FieldDef] = &[
    text("unit_number", "No. Lambung"),
    check("driver_condition", "Kondisi Driver"),
    check("passenger_condition", "Kondisi Penumpang"),
    check("driver_usage", "Pemakaian Driver"),
    check("passenger_usage", "Pemakaian Penumpang"),
];

const FATIGUE_FIELDS: &[FieldDef] = &[
    opt_text("position", "Jabatan"),
    opt_text("unit_number", "No. Lambung"),
    number("sleep_hours", "Jam Tidur"),
    answer("medication", "Konsumsi Obat"),
    answer("personal_problem", "Masalah Pribadi"),
    answer("response_check", "Respon"),
    answer("concentration_check", "Konsentrasi"),
    answer("health_check", "Kesehatan"),
    answer("ready_to_work", "Siap Bekerja"),
    answer("fit_to_work", "Fit Bekerja"),
    answer("rest_and_monitor", "Istirahat & Monitor"),
    answer("rest_over_one_hour", "Istirahat > 1 Jam"),
    answer("not_allowed_to_work", "Tidak Boleh Bekerja"),
];

const WORKSHOP_FIELDS: &[FieldDef] = &[
    text("category", "Kategori"),
    text("item_number", "No. Item"),
    opt_text("register_number", "No. Register"),
    text("conformity", "Kesesuaian"),
    opt_text("follow_up", "Tindak Lanjut"),
    opt_text("due_date", "Due Date"),
];

const LOTO_FIELDS: &[FieldDef] = &[
    check("lock_tag_installed", "Gembok & Tag Terpasang"),
    check("danger_tag_proper", "Danger Tag Sesuai"),
    check("lock_proper", "Gembok Sesuai"),
    check("every_isolation_point", "Setiap Titik Isolasi"),
    check("multi_lock_correct", "Multi Lock Benar"),
];

const DIGITAL_FIELDS: &[FieldDef] = &[
    check("supervisor_in_front", "Pengawas di Depan"),
    check("supervisor_not_using_sap", "Tidak Pakai SAP"),
    check("not_directing_sap_1", "Tidak Arahkan SAP 1"),
    check("not_directing_sap_2", "Tidak Arahkan SAP 2"),
    check("not_directing_ppe", "Tidak Arahkan PPE"),
    check("not_using_ppe_remote", "Tidak Pakai PPE Remote"),
    check("able_to_identify", "Mampu Identifikasi"),
];

pub fn field_defs(kind: SidakKind) -> &'static [FieldDef] {
    match kind {
        SidakKind::Apd => APD_FIELDS,
        SidakKind::Antrian => ANTRIAN_FIELDS,
        SidakKind::Jarak => JARAK_FIELDS,
        SidakKind::Kecepatan => KECEPATAN_FIELDS,
        SidakKind::Rambu => RAMBU_FIELDS,
        SidakKind::Seatbelt => SEATBELT_FIELDS,
        SidakKind::Fatigue => FATIGUE_FIELDS,
        SidakKind::Workshop => WORKSHOP_FIELDS,
        SidakKind::Loto => LOTO_FIELDS,
        SidakKind::Digital => DIGITAL_FIELDS,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApdCheck {
    pub position: Option<String>,
    pub work_area: Option<String>,
    pub helmet: bool,
    pub vest: bool,
    pub boots: bool,
    pub glasses: bool,
    pub gloves: bool,
    pub mask: bool,
    pub earplug: bool,
}

impl ApdCheck {
    pub fn complete(&self) -> bool {
        self.helmet
            && self.vest
            && self.boots
            && self.glasses
            && self.gloves
            && self.mask
            && self.earplug
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntrianCheck {
    pub unit_number: String,
    pub handbrake_on: bool,
    pub safe_distance: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JarakCheck {
    pub vehicle_number: String,
    pub unit_type: String,
    pub loaded_location: Option<String>,
    pub empty_location: Option<String>,
    pub front_unit_number: Option<String>,
    pub distance_m: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KecepatanCheck {
    pub vehicle_number: String,
    pub unit_type: String,
    /// true = loaded, false = empty
    pub loaded: bool,
    pub speed_mph: Option<f64>,
    pub speed_kph: Option<f64>,
}

impl KecepatanCheck {
    /// KPH as measured, or converted from MPH when only that was read.
    pub fn effective_kph(&self) -> Option<f64> {
        self.speed_kph
            .or_else(|| self.speed_mph.map(|m| (m * MPH_TO_KPH).round()))
    }

    pub fn is_overspeed(&self, limit_kph: f64) -> bool {
        self.effective_kph().is_some_and(|k| k > limit_kph)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RambuCheck {
    pub vehicle_number: String,
    pub stop: bool,
    pub give_way: bool,
    pub max_speed: bool,
    pub no_entry: bool,
    pub no_parking: bool,
    pub helmet_required: bool,
    pub no_u_turn: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatbeltCheck {
    pub unit_number: String,
    pub driver_condition: bool,
    pub passenger_condition: bool,
    pub driver_usage: bool,
    pub passenger_usage: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueCheck {
    pub position: Option<String>,
    pub unit_number: Option<String>,
    pub sleep_hours: f64,
    pub medication: bool,
    pub personal_problem: bool,
    pub response_check: bool,
    pub concentration_check: bool,
    pub health_check: bool,
    pub ready_to_work: bool,
    pub fit_to_work: bool,
    pub rest_and_monitor: bool,
    pub rest_over_one_hour: bool,
    pub not_allowed_to_work: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkshopCheck {
    pub category: String,
    pub item_number: String,
    pub register_number: Option<String>,
    /// "S" (sesuai) or "TS" (tidak sesuai)
    pub conformity: String,
    pub follow_up: Option<String>,
    pub due_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotoCheck {
    pub lock_tag_installed: bool,
    pub danger_tag_proper: bool,
    pub lock_proper: bool,
    pub every_isolation_point: bool,
    pub multi_lock_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalCheck {
    pub supervisor_in_front: bool,
    pub supervisor_not_using_sap: bool,
    pub not_directing_sap_1: bool,
    pub not_directing_sap_2: bool,
    pub not_directing_ppe: bool,
    pub not_using_ppe_remote: bool,
    pub able_to_identify: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Checklist {
    Apd(ApdCheck),
    Antrian(AntrianCheck),
    Jarak(JarakCheck),
    Kecepatan(KecepatanCheck),
    Rambu(RambuCheck),
    Seatbelt(SeatbeltCheck),
    Fatigue(FatigueCheck),
    Workshop(WorkshopCheck),
    Loto(LotoCheck),
    Digital(DigitalCheck),
}

/// Session values a checklist needs to judge compliance.
#[derive(Debug, Clone, Copy, Default)]
pub struct JudgeContext {
    pub speed_limit_kph: Option<f64>,
}

impl Checklist {
    pub fn kind(&self) -> SidakKind {
        match self {
            Checklist::Apd(_) => SidakKind::Apd,
            Checklist::Antrian(_) => SidakKind::Antrian,
            Checklist::Jarak(_) => SidakKind::Jarak,
            Checklist::Kecepatan(_) => SidakKind::Kecepatan,
            Checklist::Rambu(_) => SidakKind::Rambu,
            Checklist::Seatbelt(_) => SidakKind::Seatbelt,
            Checklist::Fatigue(_) => SidakKind::Fatigue,
            Checklist::Workshop(_) => SidakKind::Workshop,
            Checklist::Loto(_) => SidakKind::Loto,
            Checklist::Digital(_) => SidakKind::Digital,
        }
    }

    /// Build from `key=value` pairs using the kind's field table.
    pub fn from_pairs(kind: SidakKind, pairs: &[(String, String)]) -> AppResult<Self> {
        let defs = field_defs(kind);

        for (k, _) in pairs {
            if !defs.iter().any(|d| d.name == k) {
                return Err(AppError::Validation(format!(
                    "unknown field '{k}' for {kind}; expected one of: {}",
                    defs.iter().map(|d| d.name).collect::<Vec<_>>().join(", ")
                )));
            }
        }

        let mut map = Map::new();
        let mut missing = Vec::new();

        for def in defs {
            let given = pairs.iter().rev().find(|(k, _)| k == def.name).map(|(_, v)| v.as_str());
            match given.or(def.default) {
                Some(raw) => {
                    map.insert(def.name.to_string(), coerce(def, raw)?);
                }
                None if def.optional => {
                    map.insert(def.name.to_string(), Value::Null);
                }
                None => missing.push(def.name),
            }
        }

        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "missing field(s) for {kind}: {}",
                missing.join(", ")
            )));
        }

        Self::from_object(kind, map)
    }

    /// Build from a JSON object (the `--json` CLI form, or a restored draft).
    pub fn from_json(kind: SidakKind, raw: &str) -> AppResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        match value {
            Value::Object(map) => Self::from_object(kind, map),
            _ => Err(AppError::Validation("checklist data must be a JSON object".into())),
        }
    }

    fn from_object(kind: SidakKind, mut map: Map<String, Value>) -> AppResult<Self> {
        map.insert("kind".to_string(), Value::String(kind.as_str().to_string()));
        let checklist: Checklist = serde_json::from_value(Value::Object(map))
            .map_err(|e| AppError::Validation(format!("invalid {kind} checklist: {e}")))?;
        checklist.validate()?;
        Ok(checklist)
    }

    fn validate(&self) -> AppResult<()> {
        match self {
            Checklist::Workshop(w) => {
                if w.conformity != "S" && w.conformity != "TS" {
                    return Err(AppError::Validation(format!(
                        "conformity must be 'S' or 'TS', got '{}'",
                        w.conformity
                    )));
                }
                if let Some(d) = &w.due_date
                    && crate::utils::date::parse_date(d).is_none()
                {
                    return Err(AppError::InvalidDate(d.clone()));
                }
            }
            Checklist::Jarak(j) if j.distance_m < 0.0 => {
                return Err(AppError::Validation("distance_m cannot be negative".into()));
            }
            Checklist::Kecepatan(k) if k.effective_kph().is_none() => {
                return Err(AppError::Validation(
                    "either speed_kph or speed_mph is required".into(),
                ));
            }
            Checklist::Fatigue(f) if !(0.0..=24.0).contains(&f.sleep_hours) => {
                return Err(AppError::Validation("sleep_hours must be within 0..24".into()));
            }
            _ => {}
        }
        Ok(())
    }

    /// Labels of every non-compliant item.
    pub fn findings(&self, ctx: JudgeContext) -> Vec<String> {
        let mut out = Vec::new();
        let mut flag = |ok: bool, label: &str| {
            if !ok {
                out.push(label.to_string());
            }
        };

        match self {
            Checklist::Apd(a) => {
                flag(a.helmet, "Helm");
                flag(a.vest, "Rompi");
                flag(a.boots, "Sepatu");
                flag(a.glasses, "Kacamata");
                flag(a.gloves, "Sarung Tangan");
                flag(a.mask, "Masker");
                flag(a.earplug, "Earplug");
            }
            Checklist::Antrian(a) => {
                flag(a.handbrake_on, "Handbrake tidak aktif");
                flag(a.safe_distance, "Jarak unit tidak aman");
            }
            Checklist::Jarak(j) => {
                flag(
                    j.distance_m >= MIN_SAFE_DISTANCE_M,
                    &format!("Jarak {} m < {} m", j.distance_m, MIN_SAFE_DISTANCE_M),
                );
            }
            Checklist::Kecepatan(k) => {
                if let Some(limit) = ctx.speed_limit_kph
                    && k.is_overspeed(limit)
                {
                    flag(
                        false,
                        &format!(
                            "Overspeed {} km/h > {} km/h",
                            k.effective_kph().unwrap_or_default(),
                            limit
                        ),
                    );
                }
            }
            Checklist::Rambu(r) => {
                flag(r.stop, "Rambu Stop");
                flag(r.give_way, "Rambu Give Way");
                flag(r.max_speed, "Rambu Kecepatan Max");
                flag(r.no_entry, "Rambu Dilarang Masuk");
                flag(r.no_parking, "Rambu Dilarang Parkir");
                flag(r.helmet_required, "Rambu Wajib Helm");
                flag(r.no_u_turn, "Rambu Dilarang Putar Balik");
            }
            Checklist::Seatbelt(s) => {
                flag(s.driver_condition, "Kondisi seatbelt driver");
                flag(s.passenger_condition, "Kondisi seatbelt penumpang");
                flag(s.driver_usage, "Driver tidak memakai seatbelt");
                flag(s.passenger_usage, "Penumpang tidak memakai seatbelt");
            }
            Checklist::Fatigue(f) => {
                flag(
                    f.sleep_hours >= MIN_SLEEP_HOURS,
                    &format!("Jam tidur {} < {}", f.sleep_hours, MIN_SLEEP_HOURS),
                );
                flag(!f.medication, "Konsumsi obat");
                flag(!f.personal_problem, "Masalah pribadi");
                flag(f.response_check, "Respon");
                flag(f.concentration_check, "Konsentrasi");
                flag(f.health_check, "Kesehatan");
                flag(f.fit_to_work, "Tidak fit untuk bekerja");
                flag(!f.not_allowed_to_work, "Tidak boleh bekerja");
            }
            Checklist::Workshop(w) => {
                flag(w.conformity == "S", "Tidak sesuai");
            }
            Checklist::Loto(l) => {
                flag(l.lock_tag_installed, "Gembok & tag");
                flag(l.danger_tag_proper, "Danger tag");
                flag(l.lock_proper, "Gembok");
                flag(l.every_isolation_point, "Titik isolasi");
                flag(l.multi_lock_correct, "Multi lock");
            }
            Checklist::Digital(d) => {
                flag(d.supervisor_in_front, "Pengawas tidak di depan");
                flag(d.supervisor_not_using_sap, "Pengawas menggunakan SAP");
                flag(d.not_directing_sap_1, "Mengarahkan SAP (1)");
                flag(d.not_directing_sap_2, "Mengarahkan SAP (2)");
                flag(d.not_directing_ppe, "Mengarahkan PPE");
                flag(d.not_using_ppe_remote, "Menggunakan PPE remote");
                flag(d.able_to_identify, "Tidak mampu identifikasi");
            }
        }

        out
    }

    pub fn is_compliant(&self, ctx: JudgeContext) -> bool {
        self.findings(ctx).is_empty()
    }

    /// Field values in `field_defs` order, formatted for tables.
    pub fn cells(&self) -> Vec<String> {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        field_defs(self.kind())
            .iter()
            .map(|def| match value.get(def.name) {
                Some(Value::Bool(b)) => if *b { "✓" } else { "✗" }.to_string(),
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) => s.clone(),
                _ => "-".to_string(),
            })
            .collect()
    }
}

fn coerce(def: &FieldDef, raw: &str) -> AppResult<Value> {
    let raw = raw.trim();
    match def.ty {
        FieldType::Text => {
            if raw.is_empty() && !def.optional {
                Err(AppError::Validation(format!("'{}' cannot be empty", def.name)))
            } else if raw.is_empty() {
                Ok(Value::Null)
            } else {
                Ok(Value::String(raw.to_string()))
            }
        }
        FieldType::Bool => parse_bool(raw).map(Value::Bool).ok_or_else(|| {
            AppError::Validation(format!("'{}' expects yes/no, got '{raw}'", def.name))
        }),
        FieldType::Number => {
            let n: f64 = raw.replace(',', ".").parse().map_err(|_| {
                AppError::Validation(format!("'{}' expects a number, got '{raw}'", def.name))
            })?;
            serde_json::Number::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| AppError::Validation(format!("'{}' is not finite", def.name)))
        }
    }
}

/// Accepts the answers used on the paper forms as well as the usual ones.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "y" | "yes" | "true" | "ya" | "ok" | "s" => Some(true),
        "0" | "n" | "no" | "false" | "tidak" | "t" | "ts" => Some(false),
        _ => None,
    }
}

/// Split `key=value` CLI arguments.
pub fn parse_pairs(raw: &[String]) -> AppResult<Vec<(String, String)>> {
    raw.iter()
        .map(|s| {
            s.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| AppError::Validation(format!("expected key=value, got '{s}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn apd_defaults_to_complete() {
        let c = Checklist::from_pairs(SidakKind::Apd, &[]).unwrap();
        assert!(c.is_compliant(JudgeContext::default()));
        match c {
            Checklist::Apd(a) => assert!(a.complete()),
            _ => panic!("wrong kind"),
        }
    }

    #[test]
    fn apd_missing_items_are_findings() {
        let c = Checklist::from_pairs(
            SidakKind::Apd,
            &pairs(&[("helmet", "no"), ("earplug", "tidak"), ("work_area", "Pit 3")]),
        )
        .unwrap();
        assert_eq!(c.findings(JudgeContext::default()), vec!["Helm", "Earplug"]);
    }

    #[test]
    fn unknown_and_missing_fields_are_rejected() {
        let err = Checklist::from_pairs(SidakKind::Apd, &pairs(&[("hat", "yes")])).unwrap_err();
        assert!(err.to_string().contains("unknown field 'hat'"));

        let err = Checklist::from_pairs(SidakKind::Antrian, &[]).unwrap_err();
        assert!(err.to_string().contains("unit_number"));
    }

    #[test]
    fn fatigue_answers_are_mandatory() {
        let err = Checklist::from_pairs(SidakKind::Fatigue, &pairs(&[("sleep_hours", "7")]))
            .unwrap_err();
        assert!(err.to_string().contains("medication"));
    }

    #[test]
    fn fatigue_short_sleep_is_flagged() {
        let c = Checklist::from_pairs(
            SidakKind::Fatigue,
            &pairs(&[
                ("sleep_hours", "4,5"),
                ("medication", "no"),
                ("personal_problem", "no"),
                ("response_check", "yes"),
                ("concentration_check", "yes"),
                ("health_check", "yes"),
                ("ready_to_work", "yes"),
                ("fit_to_work", "yes"),
                ("rest_and_monitor", "no"),
                ("rest_over_one_hour", "no"),
                ("not_allowed_to_work", "no"),
            ]),
        )
        .unwrap();
        let f = c.findings(JudgeContext::default());
        assert_eq!(f.len(), 1);
        assert!(f[0].starts_with("Jam tidur 4.5"));
    }

    #[test]
    fn kecepatan_converts_mph_and_checks_limit() {
        let c = Checklist::from_pairs(
            SidakKind::Kecepatan,
            &pairs(&[("vehicle_number", "HD-785"), ("unit_type", "HD"), ("speed_mph", "30")]),
        )
        .unwrap();
        let ctx = JudgeContext {
            speed_limit_kph: Some(40.0),
        };
        assert_eq!(c.findings(ctx), vec!["Overspeed 48 km/h > 40 km/h"]);

        let slow = Checklist::from_pairs(
            SidakKind::Kecepatan,
            &pairs(&[("vehicle_number", "LV-01"), ("unit_type", "LV"), ("speed_kph", "40")]),
        )
        .unwrap();
        assert!(slow.is_compliant(ctx));
    }

    #[test]
    fn workshop_conformity_must_be_s_or_ts() {
        let base = [("category", "APAR"), ("item_number", "1.1")];
        let mut bad = pairs(&base);
        bad.push(("conformity".into(), "OK".into()));
        assert!(Checklist::from_pairs(SidakKind::Workshop, &bad).is_err());

        let mut ts = pairs(&base);
        ts.push(("conformity".into(), "TS".into()));
        let c = Checklist::from_pairs(SidakKind::Workshop, &ts).unwrap();
        assert_eq!(c.findings(JudgeContext::default()), vec!["Tidak sesuai"]);
    }

    #[test]
    fn json_input_is_tagged_with_session_kind() {
        let c = Checklist::from_json(
            SidakKind::Seatbelt,
            r#"{"unit_number":"DT-12","driver_condition":true,"passenger_condition":true,"driver_usage":false,"passenger_usage":true}"#,
        )
        .unwrap();
        assert_eq!(c.kind(), SidakKind::Seatbelt);
        assert_eq!(c.cells(), vec!["DT-12", "✓", "✓", "✗", "✓"]);
    }

    #[test]
    fn every_kind_has_buildable_table() {
        for kind in SidakKind::ALL {
            let mut given = Vec::new();
            for def in field_defs(kind) {
                if def.default.is_some() || def.optional {
                    continue;
                }
                let v = match (kind, def.ty) {
                    (SidakKind::Workshop, _) if def.name == "conformity" => "S",
                    (_, FieldType::Bool) => "no",
                    (_, FieldType::Number) => "6",
                    (_, FieldType::Text) => "X",
                };
                given.push((def.name.to_string(), v.to_string()));
            }
            if kind == SidakKind::Kecepatan {
                given.push(("speed_kph".to_string(), "30".to_string()));
            }
            let c = Checklist::from_pairs(kind, &given).unwrap();
            assert_eq!(c.kind(), kind);
            assert_eq!(c.cells().len(), field_defs(kind).len());
        }
    }

    #[test]
    fn bool_answers() {
        assert_eq!(parse_bool("Ya"), Some(true));
        assert_eq!(parse_bool("TS"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
