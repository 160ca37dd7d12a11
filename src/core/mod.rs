mod engine;
mod normalize;
mod scenarios;
mod solver;
mod tables;
mod types;

pub use engine::{
    adjusted_life_expectancy, compute_monthly_pension, deferral_options, project_contributions,
    project_retirement, project_yearly_trace, sick_leave_penalty, to_real_value,
};
pub use normalize::normalize;
pub use scenarios::{ScenarioKind, ScenarioProfile, compute_scenarios, scenario_pension};
pub use solver::{TargetSolveIteration, TargetSolveResult, solve_years_to_target};
pub use tables::{
    CONTRIBUTION_RATE, INPUT_YEARS, PROJECTION_YEARS, WAGE_GROWTH, YearTable, life_expectancy_at_retirement, lookup, lookup_f64,
    sick_leave_days, statutory_retirement_age,
};
pub use types::{
    ContributionProjection, DeferralOption, Gender, NormalizedInputs, ProjectionOptions,
    RawInputs, RetirementProjection, ScenarioSet, YearlyProjectionRow,
};
