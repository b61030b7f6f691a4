//! Employee QR payloads.
//!
//! Cards carry either a driver-view URL (`…/driver-view?nik=X`) or a small
//! JSON token (`{"id":"X","type":"employee"}`). A bare NIK is accepted too.

use crate::errors::{AppError, AppResult};
use regex::Regex;
use serde_json::{Value, json};

pub fn employee_qr_url(base_url: &str, nik: &str) -> String {
    format!("{}/driver-view?nik={}", base_url.trim_end_matches('/'), nik)
}

pub fn employee_qr_json(nik: &str) -> String {
    json!({ "id": nik, "type": "employee" }).to_string()
}

/// Extract the NIK from a scanned payload.
pub fn decode_employee_qr(payload: &str) -> AppResult<String> {
    let raw = payload.trim();
    if raw.is_empty() {
        return Err(AppError::InvalidQr("empty payload".into()));
    }

    if raw.starts_with('{') {
        let v: Value = serde_json::from_str(raw)
            .map_err(|e| AppError::InvalidQr(format!("malformed JSON: {e}")))?;
        let id = v.get("id").or_else(|| v.get("nik"));
        return match id {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(AppError::InvalidQr("JSON token has no id".into())),
        };
    }

    if raw.contains("://") || raw.contains('?') {
        let re = Regex::new(r"[?&]nik=([^&#\s]+)").map_err(|e| AppError::Other(e.to_string()))?;
        return re
            .captures(raw)
            .and_then(|c| c.get(1))
            .map(|m| percent_decode(m.as_str()))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::InvalidQr(format!("no nik parameter in '{}'", raw)));
    }

    let re = Regex::new(r"^[A-Za-z0-9._\-]+$").map_err(|e| AppError::Other(e.to_string()))?;
    if re.is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(AppError::InvalidQr(format!("unrecognised payload '{}'", raw)))
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                    .ok()
                    .and_then(|hex| u8::from_str_radix(hex, 16).ok());
                match decoded {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_driver_view_url() {
        let nik = decode_employee_qr("https://hse.gecl.local/driver-view?nik=C-025660").unwrap();
        assert_eq!(nik, "C-025660");

        let nik = decode_employee_qr("https://x.id/driver-view?lang=id&nik=12%2F34").unwrap();
        assert_eq!(nik, "12/34");
    }

    #[test]
    fn decodes_json_token() {
        assert_eq!(decode_employee_qr(r#"{"id":"C-1","type":"employee"}"#).unwrap(), "C-1");
        assert_eq!(decode_employee_qr(r#"{"id":4411}"#).unwrap(), "4411");
        assert!(decode_employee_qr(r#"{"type":"employee"}"#).is_err());
    }

    #[test]
    fn accepts_bare_nik_and_rejects_garbage() {
        assert_eq!(decode_employee_qr("  C-025660 ").unwrap(), "C-025660");
        assert!(decode_employee_qr("").is_err());
        assert!(decode_employee_qr("hello world").is_err());
        assert!(decode_employee_qr("https://x.id/driver-view?id=1").is_err());
    }

    #[test]
    fn encoded_payloads_round_trip_through_scanner() {
        let url = employee_qr_url("https://hse.gecl.local/", "C-9");
        assert_eq!(url, "https://hse.gecl.local/driver-view?nik=C-9");
        assert_eq!(decode_employee_qr(&url).unwrap(), "C-9");
        assert_eq!(decode_employee_qr(&employee_qr_json("C-9")).unwrap(), "C-9");
    }
}
