//! Utilitaires calendaires : années bissextiles, format `DD/MM/YYYY`,
//! projection d'anniversaires et fenêtre d'analyse.

use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate};

/// Origine des numéros de série tableur (jour 0 = 30/12/1899).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Formate une date en `DD/MM/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parse `DD/MM/YYYY` (jour et mois sur un ou deux chiffres).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let parts: Vec<&str> = raw.split('/').collect();
    let [day, month, year] = parts.as_slice() else {
        bail!("expected DD/MM/YYYY, got {raw:?}");
    };
    let day: u32 = day.trim().parse().with_context(|| format!("invalid day in {raw:?}"))?;
    let month: u32 = month
        .trim()
        .parse()
        .with_context(|| format!("invalid month in {raw:?}"))?;
    let year: i32 = year
        .trim()
        .parse()
        .with_context(|| format!("invalid year in {raw:?}"))?;
    NaiveDate::from_ymd_opt(year, month, day).with_context(|| format!("no such date: {raw}"))
}

/// Parse une date de référence : `DD/MM/YYYY` ou numéro de série tableur.
pub fn parse_reference_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if raw.contains('/') {
        return parse_date(raw);
    }
    let serial: i64 = raw
        .parse()
        .with_context(|| format!("not a date nor a serial day number: {raw:?}"))?;
    let (y, m, d) = SERIAL_EPOCH;
    let epoch = NaiveDate::from_ymd_opt(y, m, d).context("invalid serial epoch")?;
    epoch
        .checked_add_signed(Duration::days(serial))
        .with_context(|| format!("serial day out of range: {serial}"))
}

/// Projette le jour/mois de `reference` sur `year` (29/02 → 28/02 hors bissextile).
pub fn project_anniversary(reference: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, reference.month(), reference.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, reference.month(), 28))
}

/// Nombre de jours entiers de `from` à `to` (négatif si `to` précède `from`).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Fenêtre d'analyse : du 1er du mois de départ au 31 décembre inclus.
pub fn analysis_window(year: i32, start_month: u32) -> Result<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, start_month, 1)
        .with_context(|| format!("invalid analysis start {start_month}/{year}"))?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)
        .with_context(|| format!("invalid analysis year {year}"))?;
    Ok((start, end))
}

/// Sérialisation serde d'une `NaiveDate` au format `DD/MM/YYYY`.
pub mod ddmmyyyy {
    use chrono::NaiveDate;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_date(&raw).map_err(D::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{Serialize, Serializer};

        pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
            (*date).map(super::super::format_date).serialize(s)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(2025));
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2026), 365);
    }

    #[test]
    fn parse_and_format() {
        assert_eq!(parse_date("3/07/2024").unwrap(), ymd(2024, 7, 3));
        assert_eq!(format_date(ymd(2024, 7, 3)), "03/07/2024");
        assert!(parse_date("31/02/2024").is_err());
        assert!(parse_date("2024-07-03").is_err());
    }

    #[test]
    fn serial_reference_dates() {
        assert_eq!(parse_reference_date("45658").unwrap(), ymd(2025, 1, 1));
        assert_eq!(parse_reference_date("25/01/2021").unwrap(), ymd(2021, 1, 25));
        assert!(parse_reference_date("n/a").is_err());
    }

    #[test]
    fn anniversary_projection() {
        assert_eq!(project_anniversary(ymd(2019, 5, 21), 2026), Some(ymd(2026, 5, 21)));
        assert_eq!(project_anniversary(ymd(2024, 2, 29), 2025), Some(ymd(2025, 2, 28)));
    }

    #[test]
    fn window_covers_rest_of_year() {
        let (start, end) = analysis_window(2026, 3).unwrap();
        assert_eq!(start, ymd(2026, 3, 1));
        assert_eq!(days_between(start, end) + 1, 306);
        assert!(analysis_window(2026, 13).is_err());
    }
}
