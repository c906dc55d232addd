//! Turns a free-text submission into employee records.
//!
//! A submission is accepted or rejected as a whole: every line is checked
//! and converted before anything is returned, so a caller never sees a
//! partial result.

use crate::error::ReportError;

use super::record::EmployeeRecord;
use super::validator;

/// Parse every line of `text` into records.
///
/// Records come back in first-seen order. When a name appears more than
/// once the later line's figures replace the earlier ones. A blank
/// submission yields no records.
pub fn parse_submission(text: &str) -> Result<Vec<EmployeeRecord>, ReportError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut records: Vec<EmployeeRecord> = Vec::new();
    for line in text.split('\n') {
        let record = parse_line(line)?;
        match records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
    }

    Ok(records)
}

/// Parse a single line. The line must pass the grammar check first.
pub fn parse_line(line: &str) -> Result<EmployeeRecord, ReportError> {
    if !validator::is_valid(line) {
        return Err(ReportError::Format);
    }

    let (name, stats) = line.split_once('-').ok_or(ReportError::Format)?;

    let numbers = stats
        .trim()
        .split('/')
        .map(|field| field.parse::<u32>().map_err(|_| ReportError::Format))
        .collect::<Result<Vec<_>, _>>()?;

    let [pays, calls, plan_percent] = numbers[..] else {
        return Err(ReportError::Format);
    };

    Ok(EmployeeRecord::new(name.trim(), pays, calls, plan_percent))
}
