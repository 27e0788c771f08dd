//! Study-level reshaping of exported records

use super::Records;
use crate::config::StudyConfig;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Average Gregorian month length in days
const DAYS_PER_MONTH: f64 = 30.436875;

/// Ages above this many months are reported as `AGE_CAP_VALUE`
const AGE_CAP_MONTHS: i64 = 1080;
const AGE_CAP_VALUE: i64 = 1200;

/// Normalize exported records for a study
///
/// Renames the subject and interview date columns, splits
/// `<subject>_<flag>` identifiers, drops withdrawn (flagged) subjects unless
/// asked to keep them, and derives `study` and `interview_age`.
pub fn shape_records(
    records: Records,
    study: &str,
    config: &StudyConfig,
    keep_withdrawn: bool,
) -> Records {
    records
        .into_iter()
        .filter_map(|mut row| {
            rename(&mut row, &config.subject_field, "subjectid");
            rename(&mut row, &config.interview_date_field, "interview_date");

            let subjectid = row.get("subjectid").map(|s| s.trim().to_string())?;
            if subjectid.is_empty() {
                return None;
            }

            let (subject, flagged) = match subjectid.split_once('_') {
                Some((subject, flag)) => (subject.trim().to_string(), flag.trim().to_string()),
                None => (subjectid.clone(), String::new()),
            };
            if !flagged.is_empty() && !keep_withdrawn {
                return None;
            }

            let age = interview_age(
                row.get("interview_date").map(String::as_str),
                row.get(&config.dob_field).map(String::as_str),
            );

            row.insert("subject".to_string(), subject);
            row.insert("flagged".to_string(), flagged);
            row.insert("study".to_string(), study.to_string());
            row.insert(
                "interview_age".to_string(),
                age.map(|a| a.to_string()).unwrap_or_default(),
            );

            if let Some(gender) = row.get_mut("gender") {
                match gender.as_str() {
                    "1" => *gender = "M".to_string(),
                    "2" => *gender = "F".to_string(),
                    _ => {}
                }
            }

            Some(row)
        })
        .collect()
}

fn rename(row: &mut BTreeMap<String, String>, from: &str, to: &str) {
    if from == to {
        return;
    }
    if let Some(value) = row.remove(from) {
        row.insert(to.to_string(), value);
    }
}

/// Whole months between birth and interview, capped for the very old
pub fn interview_age(interview: Option<&str>, dob: Option<&str>) -> Option<i64> {
    let interview = parse_date(interview?)?;
    let dob = parse_date(dob?)?;

    let days = (interview - dob).num_days() as f64;
    let months = (days / DAYS_PER_MONTH).floor() as i64;

    Some(if months > AGE_CAP_MONTHS {
        AGE_CAP_VALUE
    } else {
        months
    })
}

/// Parse `YYYY-MM-DD`, ignoring any time component
fn parse_date(value: &str) -> Option<NaiveDate> {
    let date = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
