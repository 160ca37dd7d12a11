use super::tables::INPUT_YEARS;
use super::types::{NormalizedInputs, RawInputs};

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn calendar_year(value: Option<f64>) -> Option<i32> {
    let year = finite(value)?.trunc();
    let first = f64::from(*INPUT_YEARS.start());
    let last = f64::from(*INPUT_YEARS.end());
    (first..=last).contains(&year).then_some(year as i32)
}

// Years outside INPUT_YEARS fail like missing ones; a missing or non-finite
// balance counts as zero.
pub fn normalize(raw: &RawInputs, current_year: i32) -> Option<NormalizedInputs> {
    if !INPUT_YEARS.contains(&current_year) {
        return None;
    }

    let age = finite(raw.age)?;
    let gender = raw.gender?;
    let gross_monthly_salary = finite(raw.gross_monthly_salary)?;
    let work_start_year = calendar_year(raw.work_start_year)?;
    let planned_retirement_year = calendar_year(raw.planned_retirement_year)?;

    if gross_monthly_salary <= 0.0 {
        return None;
    }

    let birth_year = f64::from(current_year) - age;
    let retirement_age = f64::from(planned_retirement_year) - birth_year;
    if !retirement_age.is_finite() || retirement_age <= 0.0 {
        return None;
    }

    let zus_account_balance = finite(raw.zus_account_balance).unwrap_or(0.0).max(0.0);

    Some(NormalizedInputs {
        age,
        gender,
        gross_monthly_salary,
        work_start_year,
        planned_retirement_year,
        zus_account_balance,
        retirement_age,
    })
}
