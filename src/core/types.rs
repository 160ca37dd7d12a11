use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[serde(alias = "m", alias = "MALE", alias = "Male")]
    Male,
    #[serde(alias = "f", alias = "FEMALE", alias = "Female")]
    Female,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawInputs {
    pub age: Option<f64>,
    pub gender: Option<Gender>,
    pub gross_monthly_salary: Option<f64>,
    pub work_start_year: Option<f64>,
    pub planned_retirement_year: Option<f64>,
    pub zus_account_balance: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedInputs {
    pub age: f64,
    pub gender: Gender,
    pub gross_monthly_salary: f64,
    pub work_start_year: i32,
    pub planned_retirement_year: i32,
    pub zus_account_balance: f64,
    pub retirement_age: f64,
}

impl NormalizedInputs {
    pub fn deferred_by(&self, years: u32) -> Self {
        let years_i32 = i32::try_from(years).unwrap_or(i32::MAX);
        Self {
            planned_retirement_year: self.planned_retirement_year.saturating_add(years_i32),
            retirement_age: self.retirement_age + f64::from(years),
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOptions {
    pub include_sick_leave: bool,
    pub inflation_rate: f64,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            include_sick_leave: false,
            inflation_rate: 0.025,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionProjection {
    pub contributions_sum: f64,
    pub monthly_salary_in_final_year: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RetirementProjection {
    pub retirement_age: f64,
    pub contributions_sum: f64,
    pub capital: f64,
    pub capital_with_sick_leave: f64,
    pub sick_leave_penalty: f64,
    pub life_expectancy_years: f64,
    pub monthly_pension: f64,
    pub monthly_pension_with_sick_leave: f64,
    pub selected_monthly_pension: f64,
    pub real_monthly_pension: f64,
    pub years_until_retirement: u32,
    pub monthly_salary_in_final_year: f64,
    pub replacement_rate: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSet {
    pub pessimistic: f64,
    pub realistic: f64,
    pub optimistic: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjectionRow {
    pub year: i32,
    pub age: f64,
    pub monthly_salary: f64,
    pub contribution_rate: f64,
    pub annual_contribution: f64,
    pub capital: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferralOption {
    pub delay_years: u32,
    pub retirement_year: i32,
    pub retirement_age: f64,
    pub monthly_pension: f64,
    pub increase: f64,
    pub increase_percent: f64,
}
