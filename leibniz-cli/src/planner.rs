//! Sweep Planner
//!
//! Builds the execution plan by filtering the configured sweep.
//!
//! Filtering options:
//! - Regex pattern matching on the config label (`schedule/chunk/tT/nN`)
//! - A single schedule policy
//!
//! Input order is preserved; it is the order results stream out.

use leibniz_core::{ExperimentConfig, SchedulePolicy};
use regex::Regex;

/// Execution plan for a sweep
#[derive(Debug, Clone)]
pub struct SweepPlan {
    /// Ordered list of configs to run
    pub configs: Vec<ExperimentConfig>,
    /// Configs removed by the filters
    pub skipped: usize,
}

impl SweepPlan {
    /// Total number of trials the plan will execute
    pub fn total_trials(&self) -> usize {
        self.configs.iter().map(ExperimentConfig::runs).sum()
    }
}

/// Build execution plan from the configured sweep
pub fn build_plan(
    configs: impl IntoIterator<Item = ExperimentConfig>,
    filter: Option<&Regex>,
    schedule: Option<SchedulePolicy>,
) -> SweepPlan {
    let mut skipped = 0;
    let configs = configs
        .into_iter()
        .filter(|c| {
            let keep = filter.is_none_or(|re| re.is_match(&c.label()))
                && schedule.is_none_or(|p| c.schedule().policy() == p);
            if !keep {
                skipped += 1;
            }
            keep
        })
        .collect();

    SweepPlan { configs, skipped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep() -> Vec<ExperimentConfig> {
        vec![
            ExperimentConfig::new(1_000, 4, SchedulePolicy::Static, Some(16), 2).unwrap(),
            ExperimentConfig::new(1_000, 4, SchedulePolicy::Dynamic, Some(16), 2).unwrap(),
            ExperimentConfig::new(1_000, 16, SchedulePolicy::Dynamic, Some(64), 3).unwrap(),
            ExperimentConfig::new(1_000, 16, SchedulePolicy::Auto, None, 1).unwrap(),
        ]
    }

    #[test]
    fn test_no_filters_keeps_everything() {
        let plan = build_plan(sweep(), None, None);
        assert_eq!(plan.configs, sweep());
        assert_eq!(plan.skipped, 0);
        assert_eq!(plan.total_trials(), 8);
    }

    #[test]
    fn test_regex_filter_on_label() {
        let re = Regex::new("t16").unwrap();
        let plan = build_plan(sweep(), Some(&re), None);
        assert_eq!(plan.configs.len(), 2);
        assert_eq!(plan.skipped, 2);
    }

    #[test]
    fn test_schedule_filter_preserves_order() {
        let plan = build_plan(sweep(), None, Some(SchedulePolicy::Dynamic));
        let labels: Vec<_> = plan.configs.iter().map(|c| c.label()).collect();
        assert_eq!(labels, vec!["dynamic/16/t4/n1000", "dynamic/64/t16/n1000"]);
    }

    #[test]
    fn test_filters_combine() {
        let re = Regex::new("/64/").unwrap();
        let plan = build_plan(sweep(), Some(&re), Some(SchedulePolicy::Static));
        assert!(plan.configs.is_empty());
        assert_eq!(plan.skipped, 4);
    }
}
