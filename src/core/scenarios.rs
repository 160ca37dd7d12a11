use super::engine::project_retirement_with;
use super::types::{NormalizedInputs, ProjectionOptions, ScenarioSet};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScenarioKind {
    Pessimistic,
    Realistic,
    Optimistic,
}

// Each multiplier moves the pension the same way as its scenario, which
// keeps pessimistic <= realistic <= optimistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioProfile {
    pub wage_growth_multiplier: f64,
    pub contribution_rate_multiplier: f64,
    pub life_expectancy_multiplier: f64,
}

impl ScenarioProfile {
    pub const PESSIMISTIC: Self = Self {
        wage_growth_multiplier: 0.99,
        contribution_rate_multiplier: 0.95,
        life_expectancy_multiplier: 1.05,
    };

    pub const REALISTIC: Self = Self {
        wage_growth_multiplier: 1.0,
        contribution_rate_multiplier: 1.0,
        life_expectancy_multiplier: 1.0,
    };

    pub const OPTIMISTIC: Self = Self {
        wage_growth_multiplier: 1.01,
        contribution_rate_multiplier: 1.05,
        life_expectancy_multiplier: 0.95,
    };

    pub fn for_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::Pessimistic => Self::PESSIMISTIC,
            ScenarioKind::Realistic => Self::REALISTIC,
            ScenarioKind::Optimistic => Self::OPTIMISTIC,
        }
    }
}

pub fn scenario_pension(
    inputs: &NormalizedInputs,
    current_year: i32,
    options: &ProjectionOptions,
    kind: ScenarioKind,
) -> f64 {
    project_retirement_with(inputs, current_year, options, &ScenarioProfile::for_kind(kind))
        .selected_monthly_pension
}

pub fn compute_scenarios(
    inputs: Option<&NormalizedInputs>,
    current_year: i32,
    options: &ProjectionOptions,
) -> ScenarioSet {
    let Some(inputs) = inputs else {
        return ScenarioSet::default();
    };

    ScenarioSet {
        pessimistic: scenario_pension(inputs, current_year, options, ScenarioKind::Pessimistic),
        realistic: scenario_pension(inputs, current_year, options, ScenarioKind::Realistic),
        optimistic: scenario_pension(inputs, current_year, options, ScenarioKind::Optimistic),
    }
}
