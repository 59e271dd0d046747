//! Solver configuration.

use serde::Deserialize;

/// Configurable parameters used during solving.
///
/// All fields have defaults chosen to match the original reference solver this crate's
/// algorithms are modeled on, so changing the configuration is opt-in.
#[derive(Copy, Clone, Debug)]
pub struct SolverConfig {
    /// Initial size of the clause database arena, in `i32` cells. (Default: 10,000,000)
    pub initial_mem_max: usize,

    /// Growth factor applied to the arena (as used cells + requested cells) when it runs out of
    /// room. (Default: 1.5)
    pub mem_growth_factor: f64,

    /// Hard cap on the arena size, in `i32` cells. Growing past this returns
    /// [`SolverError::OutOfMemory`](crate::error::SolverError::OutOfMemory) instead of
    /// reallocating further. (Default: 1 << 32, effectively unbounded for realistic inputs)
    pub max_mem_max: usize,

    /// Initial budget for the number of learned (redundant) clauses before [`reduceDB`][1] is
    /// triggered. (Default: 20,000)
    ///
    /// [1]: crate::clause::reduce::reduce_db
    pub initial_max_lemmas: u64,

    /// Amount the lemma budget grows by each time it is exceeded while reducing the database.
    /// (Default: 300)
    pub lemma_budget_growth: u64,

    /// Minimum number of phase-satisfied literals a lemma must retain during [`reduceDB`][1] when
    /// triggered by exceeding the conflict limit. (Default: 2)
    ///
    /// [1]: crate::clause::reduce::reduce_db
    pub reduce_threshold_on_limit: usize,

    /// Minimum number of phase-satisfied literals a lemma must retain during [`reduceDB`][1] when
    /// triggered by exceeding the lemma budget. (Default: 6)
    ///
    /// [1]: crate::clause::reduce::reduce_db
    pub reduce_threshold_on_budget: usize,
}

impl Default for SolverConfig {
    fn default() -> SolverConfig {
        SolverConfig {
            initial_mem_max: 10_000_000,
            mem_growth_factor: 1.5,
            max_mem_max: 1 << 32,
            initial_max_lemmas: 20_000,
            lemma_budget_growth: 300,
            reduce_threshold_on_limit: 2,
            reduce_threshold_on_budget: 6,
        }
    }
}

impl SolverConfig {
    /// Applies every field set in `update`, leaving the rest unchanged.
    pub fn update(&mut self, update: &SolverConfigUpdate) {
        if let Some(value) = update.initial_mem_max {
            self.initial_mem_max = value;
        }
        if let Some(value) = update.mem_growth_factor {
            self.mem_growth_factor = value;
        }
        if let Some(value) = update.max_mem_max {
            self.max_mem_max = value;
        }
        if let Some(value) = update.initial_max_lemmas {
            self.initial_max_lemmas = value;
        }
        if let Some(value) = update.lemma_budget_growth {
            self.lemma_budget_growth = value;
        }
        if let Some(value) = update.reduce_threshold_on_limit {
            self.reduce_threshold_on_limit = value;
        }
        if let Some(value) = update.reduce_threshold_on_budget {
            self.reduce_threshold_on_budget = value;
        }
    }

    /// Lists every configurable option and its default value, for `--config-option help`.
    pub fn help() -> String {
        let default = SolverConfig::default();
        format!(
            "Available config options (as TOML `key = value` fragments):\n\n\
             initial-mem-max = {}\n\
             mem-growth-factor = {}\n\
             max-mem-max = {}\n\
             initial-max-lemmas = {}\n\
             lemma-budget-growth = {}\n\
             reduce-threshold-on-limit = {}\n\
             reduce-threshold-on-budget = {}\n",
            default.initial_mem_max,
            default.mem_growth_factor,
            default.max_mem_max,
            default.initial_max_lemmas,
            default.lemma_budget_growth,
            default.reduce_threshold_on_limit,
            default.reduce_threshold_on_budget,
        )
    }
}

/// A partial override of [`SolverConfig`], as parsed from a config file or `-C key=value`
/// command-line fragment.
///
/// Every field is optional so that several updates (a config file followed by command-line
/// overrides) can be merged before being applied to a [`SolverConfig`] in one pass.
#[derive(Deserialize, Default, Clone, Debug)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct SolverConfigUpdate {
    pub initial_mem_max: Option<usize>,
    pub mem_growth_factor: Option<f64>,
    pub max_mem_max: Option<usize>,
    pub initial_max_lemmas: Option<u64>,
    pub lemma_budget_growth: Option<u64>,
    pub reduce_threshold_on_limit: Option<usize>,
    pub reduce_threshold_on_budget: Option<usize>,
}

impl SolverConfigUpdate {
    pub fn new() -> SolverConfigUpdate {
        SolverConfigUpdate::default()
    }

    /// Merges `other` into `self`, with `other`'s fields taking precedence where both are set.
    pub fn merge(&mut self, other: SolverConfigUpdate) {
        macro_rules! merge_field {
            ($field:ident) => {
                if other.$field.is_some() {
                    self.$field = other.$field;
                }
            };
        }
        merge_field!(initial_mem_max);
        merge_field!(mem_growth_factor);
        merge_field!(max_mem_max);
        merge_field!(initial_max_lemmas);
        merge_field!(lemma_budget_growth);
        merge_field!(reduce_threshold_on_limit);
        merge_field!(reduce_threshold_on_budget);
    }
}
