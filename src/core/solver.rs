use serde::Serialize;

use super::engine::project_retirement;
use super::types::{NormalizedInputs, ProjectionOptions};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSolveIteration {
    pub iteration: u32,
    pub lower_bound: u32,
    pub upper_bound: u32,
    pub candidate_extra_years: u32,
    pub monthly_pension: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSolveResult {
    pub target_monthly_pension: f64,
    pub max_extra_years: u32,
    pub baseline_monthly_pension: f64,
    pub extra_years: Option<u32>,
    pub retirement_year: Option<i32>,
    pub achieved_monthly_pension: Option<f64>,
    pub iterations: Vec<TargetSolveIteration>,
    pub feasible: bool,
    pub message: String,
}

fn pension_after(
    inputs: &NormalizedInputs,
    current_year: i32,
    options: &ProjectionOptions,
    extra_years: u32,
) -> f64 {
    project_retirement(&inputs.deferred_by(extra_years), current_year, options)
        .selected_monthly_pension
}

// Bisection is valid because the pension never decreases with later retirement.
pub fn solve_years_to_target(
    inputs: &NormalizedInputs,
    current_year: i32,
    options: &ProjectionOptions,
    target: f64,
    max_extra_years: u32,
) -> TargetSolveResult {
    let baseline = pension_after(inputs, current_year, options, 0);
    let mut iterations = Vec::new();

    let finish = |extra_years: Option<u32>,
                  achieved: Option<f64>,
                  iterations: Vec<TargetSolveIteration>,
                  message: String| TargetSolveResult {
        target_monthly_pension: target,
        max_extra_years,
        baseline_monthly_pension: baseline,
        extra_years,
        retirement_year: extra_years.map(|years| inputs.deferred_by(years).planned_retirement_year),
        achieved_monthly_pension: achieved,
        feasible: extra_years.is_some(),
        iterations,
        message,
    };

    if baseline + 1e-9 >= target {
        return finish(
            Some(0),
            Some(baseline),
            iterations,
            "Planned retirement already reaches the target pension.".to_string(),
        );
    }

    let ceiling = pension_after(inputs, current_year, options, max_extra_years);
    if ceiling + 1e-9 < target {
        return finish(
            None,
            None,
            iterations,
            format!("Target pension is not reached within {max_extra_years} extra years."),
        );
    }

    // Invariant: `lo` misses the target, `hi` reaches it.
    let mut lo = 0;
    let mut hi = max_extra_years;
    let mut achieved = ceiling;
    let mut it = 0;
    while hi - lo > 1 {
        it += 1;
        let mid = lo + (hi - lo) / 2;
        let pension = pension_after(inputs, current_year, options, mid);
        iterations.push(TargetSolveIteration {
            iteration: it,
            lower_bound: lo,
            upper_bound: hi,
            candidate_extra_years: mid,
            monthly_pension: pension,
        });
        if pension + 1e-9 >= target {
            hi = mid;
            achieved = pension;
        } else {
            lo = mid;
        }
    }

    finish(
        Some(hi),
        Some(achieved),
        iterations,
        format!("Working {hi} more years reaches the target pension."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize::normalize;
    use crate::core::types::{Gender, RawInputs};

    fn sample_inputs() -> NormalizedInputs {
        let raw = RawInputs {
            age: Some(35.0),
            gender: Some(Gender::Male),
            gross_monthly_salary: Some(8_000.0),
            work_start_year: Some(2010.0),
            planned_retirement_year: Some(2055.0),
            zus_account_balance: Some(150_000.0),
        };
        normalize(&raw, 2025).expect("complete inputs")
    }

    #[test]
    fn target_below_baseline_needs_no_extra_years() {
        let inputs = sample_inputs();
        let result =
            solve_years_to_target(&inputs, 2025, &ProjectionOptions::default(), 1_000.0, 10);
        assert!(result.feasible);
        assert_eq!(result.extra_years, Some(0));
        assert_eq!(result.retirement_year, Some(2055));
        assert!(result.iterations.is_empty());
    }

    #[test]
    fn unreachable_target_is_infeasible() {
        let inputs = sample_inputs();
        let result =
            solve_years_to_target(&inputs, 2025, &ProjectionOptions::default(), 1.0e9, 10);
        assert!(!result.feasible);
        assert_eq!(result.extra_years, None);
        assert_eq!(result.achieved_monthly_pension, None);
    }

    #[test]
    fn solver_finds_the_first_sufficient_year() {
        let inputs = sample_inputs();
        let options = ProjectionOptions::default();
        let target = pension_after(&inputs, 2025, &options, 4) - 0.01;

        let result = solve_years_to_target(&inputs, 2025, &options, target, 10);
        assert!(result.feasible);
        assert_eq!(result.extra_years, Some(4));
        assert_eq!(result.retirement_year, Some(2059));
        assert!(pension_after(&inputs, 2025, &options, 3) < target);
        assert!(!result.iterations.is_empty());
        let achieved = result.achieved_monthly_pension.expect("feasible result");
        assert!(achieved >= target);
    }
}
