use super::scenarios::ScenarioProfile;
use super::tables::{
    CONTRIBUTION_RATE, LIFE_EXPECTANCY_SHIFT_PER_YEAR, MIN_LIFE_EXPECTANCY_YEARS,
    PROJECTION_YEARS, SICK_LEAVE_REPLACEMENT_RATE, WAGE_GROWTH, WORKING_DAYS_PER_YEAR,
    life_expectancy_at_retirement, lookup, sick_leave_days, statutory_retirement_age,
};
use super::types::{
    ContributionProjection, DeferralOption, Gender, NormalizedInputs, ProjectionOptions,
    RetirementProjection, YearlyProjectionRow,
};

const MONTHS_PER_YEAR: f64 = 12.0;

fn wage_growth(year: i32, profile: &ScenarioProfile) -> f64 {
    lookup(&WAGE_GROWTH, year) * profile.wage_growth_multiplier
}

fn contribution_rate(year: i32, profile: &ScenarioProfile) -> f64 {
    lookup(&CONTRIBUTION_RATE, year) * profile.contribution_rate_multiplier
}

fn projection_year(year: i32) -> i32 {
    year.clamp(*PROJECTION_YEARS.start(), *PROJECTION_YEARS.end())
}

// (current year, first contribution year, retirement year), all inside
// PROJECTION_YEARS so spans stay small and subtraction cannot overflow.
fn working_span(inputs: &NormalizedInputs, current_year: i32) -> (i32, i32, i32) {
    let current = projection_year(current_year);
    let start = current.max(projection_year(inputs.work_start_year));
    (current, start, projection_year(inputs.planned_retirement_year))
}

// Returns the salary of the last visited year, or the pre-grown salary when
// no year is visited.
fn walk_working_years<F>(
    inputs: &NormalizedInputs,
    current_year: i32,
    profile: &ScenarioProfile,
    mut visit: F,
) -> f64
where
    F: FnMut(i32, f64, f64),
{
    let (current, start_year, retirement_year) = working_span(inputs, current_year);
    let mut monthly_salary = inputs.gross_monthly_salary;

    // Work starting in the future: the salary grows before contributions do.
    for year in current + 1..=start_year {
        monthly_salary *= wage_growth(year, profile);
    }

    for year in start_year..retirement_year {
        if year != start_year {
            monthly_salary *= wage_growth(year, profile);
        }
        visit(year, monthly_salary, contribution_rate(year, profile));
    }

    monthly_salary
}

pub fn project_contributions(
    inputs: &NormalizedInputs,
    current_year: i32,
) -> ContributionProjection {
    project_contributions_with(inputs, current_year, &ScenarioProfile::REALISTIC)
}

pub(crate) fn project_contributions_with(
    inputs: &NormalizedInputs,
    current_year: i32,
    profile: &ScenarioProfile,
) -> ContributionProjection {
    let mut contributions_sum = 0.0;
    let monthly_salary_in_final_year =
        walk_working_years(inputs, current_year, profile, |_, monthly_salary, rate| {
            contributions_sum += monthly_salary * MONTHS_PER_YEAR * rate;
        });

    ContributionProjection {
        contributions_sum,
        monthly_salary_in_final_year,
    }
}

pub fn project_yearly_trace(
    inputs: &NormalizedInputs,
    current_year: i32,
) -> Vec<YearlyProjectionRow> {
    let (_, start_year, retirement_year) = working_span(inputs, current_year);
    let capacity = usize::try_from(retirement_year - start_year).unwrap_or(0);
    let mut rows = Vec::with_capacity(capacity);
    let mut capital = inputs.zus_account_balance;
    let birth_year = f64::from(current_year) - inputs.age;

    walk_working_years(
        inputs,
        current_year,
        &ScenarioProfile::REALISTIC,
        |year, monthly_salary, rate| {
            let annual_contribution = monthly_salary * MONTHS_PER_YEAR * rate;
            capital += annual_contribution;
            rows.push(YearlyProjectionRow {
                year,
                age: f64::from(year) - birth_year,
                monthly_salary,
                contribution_rate: rate,
                annual_contribution,
                capital,
            });
        },
    );

    rows
}

pub fn compute_monthly_pension(capital: f64, life_expectancy_years: f64) -> f64 {
    if life_expectancy_years <= 0.0 {
        return 0.0;
    }
    capital / (life_expectancy_years * MONTHS_PER_YEAR)
}

pub fn adjusted_life_expectancy(gender: Gender, retirement_age: f64) -> f64 {
    let base = life_expectancy_at_retirement(gender);
    let statutory_age = f64::from(statutory_retirement_age(gender));
    let adjusted = base - (retirement_age - statutory_age) * LIFE_EXPECTANCY_SHIFT_PER_YEAR;
    adjusted.max(MIN_LIFE_EXPECTANCY_YEARS)
}

pub fn sick_leave_penalty(gender: Gender) -> f64 {
    let share_of_year = (sick_leave_days(gender) / WORKING_DAYS_PER_YEAR).clamp(0.0, 1.0);
    share_of_year * (1.0 - SICK_LEAVE_REPLACEMENT_RATE)
}

// Non-finite horizons and inflation at or below -100% leave the value nominal.
pub fn to_real_value(nominal_value: f64, years_until_retirement: f64, inflation_rate: f64) -> f64 {
    let base = 1.0 + inflation_rate;
    if !years_until_retirement.is_finite() || !base.is_finite() || base <= 0.0 {
        return nominal_value;
    }
    nominal_value / base.powf(years_until_retirement)
}

pub fn project_retirement(
    inputs: &NormalizedInputs,
    current_year: i32,
    options: &ProjectionOptions,
) -> RetirementProjection {
    project_retirement_with(inputs, current_year, options, &ScenarioProfile::REALISTIC)
}

pub(crate) fn project_retirement_with(
    inputs: &NormalizedInputs,
    current_year: i32,
    options: &ProjectionOptions,
    profile: &ScenarioProfile,
) -> RetirementProjection {
    let contributions = project_contributions_with(inputs, current_year, profile);
    let capital = inputs.zus_account_balance + contributions.contributions_sum;

    let penalty = sick_leave_penalty(inputs.gender);
    let capital_with_sick_leave = capital * (1.0 - penalty);

    let life_expectancy_years = (adjusted_life_expectancy(inputs.gender, inputs.retirement_age)
        * profile.life_expectancy_multiplier)
        .max(MIN_LIFE_EXPECTANCY_YEARS);

    let monthly_pension = compute_monthly_pension(capital, life_expectancy_years);
    let monthly_pension_with_sick_leave =
        compute_monthly_pension(capital_with_sick_leave, life_expectancy_years);
    let selected_monthly_pension = if options.include_sick_leave {
        monthly_pension_with_sick_leave
    } else {
        monthly_pension
    };

    let (current, _, retirement_year) = working_span(inputs, current_year);
    let years_until_retirement = u32::try_from(retirement_year - current).unwrap_or(0);
    let real_monthly_pension = to_real_value(
        selected_monthly_pension,
        f64::from(years_until_retirement),
        options.inflation_rate,
    );

    let final_salary = contributions.monthly_salary_in_final_year;
    let replacement_rate = if final_salary > 0.0 {
        selected_monthly_pension / final_salary
    } else {
        0.0
    };

    RetirementProjection {
        retirement_age: inputs.retirement_age,
        contributions_sum: contributions.contributions_sum,
        capital,
        capital_with_sick_leave,
        sick_leave_penalty: penalty,
        life_expectancy_years,
        monthly_pension,
        monthly_pension_with_sick_leave,
        selected_monthly_pension,
        real_monthly_pension,
        years_until_retirement,
        monthly_salary_in_final_year: final_salary,
        replacement_rate,
    }
}

pub fn deferral_options(
    inputs: &NormalizedInputs,
    current_year: i32,
    options: &ProjectionOptions,
    delays: &[u32],
) -> Vec<DeferralOption> {
    let baseline = project_retirement(inputs, current_year, options).selected_monthly_pension;

    delays
        .iter()
        .map(|&delay_years| {
            let deferred = inputs.deferred_by(delay_years);
            let monthly_pension =
                project_retirement(&deferred, current_year, options).selected_monthly_pension;
            let increase = monthly_pension - baseline;
            let increase_percent = if baseline > 0.0 {
                increase / baseline * 100.0
            } else {
                0.0
            };
            DeferralOption {
                delay_years,
                retirement_year: deferred.planned_retirement_year,
                retirement_age: deferred.retirement_age,
                monthly_pension,
                increase,
                increase_percent,
            }
        })
        .collect()
}
