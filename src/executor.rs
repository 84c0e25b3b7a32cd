//! Concurrent execution of the fetch tasks of one run
//!
//! Every task returns its own output value; nothing touches the snapshot
//! until all of them have finished.

use crate::catalog::{DataType, FunctionId, ItemId, RequestedItems};
use crate::collectors::{HostProbe, InventoryFields};
use crate::data::{Model, PublicIpInfo, SoftwareInfo, Weather};
use crate::error::Result;
use crate::planner::DemandPlan;
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::{debug, error};

/// One independent unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchTask {
    /// The single bulk inventory call, parsed for `items`
    Inventory {
        data_types: BTreeSet<DataType>,
        items: Vec<ItemId>,
    },
    /// Marketing name of the model, companion of a fresh hardware fetch
    ModelRegistry,
    Function(FunctionId),
}

/// What a finished task hands back to the merger
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    Inventory(InventoryFields),
    ModelName(Option<Model>),
    Software(SoftwareInfo),
    Terminal(String),
    Datetime(String),
    PublicIp(Option<PublicIpInfo>),
    Weather(Option<Weather>),
}

/// Turn a plan into tasks: at most one inventory call, at most one registry
/// lookup, one task per needed function
pub fn build_tasks(plan: &DemandPlan, requested: &RequestedItems) -> Vec<FetchTask> {
    let mut tasks = Vec::new();

    if plan.needs_bulk_fetch() {
        tasks.push(FetchTask::Inventory {
            data_types: plan.fresh_groups(),
            items: plan.bulk_items(requested),
        });
        if plan.needs_fresh(DataType::Hardware) && requested.contains(ItemId::Model) {
            tasks.push(FetchTask::ModelRegistry);
        }
    }
    tasks.extend(plan.functions_needed.iter().map(|function| FetchTask::Function(*function)));
    tasks
}

fn run_task(task: FetchTask, probe: &dyn HostProbe) -> Result<TaskOutput> {
    Ok(match task {
        FetchTask::Inventory { data_types, items } => TaskOutput::Inventory(probe.inventory(&data_types, &items)?),
        FetchTask::ModelRegistry => TaskOutput::ModelName(probe.model_name()),
        FetchTask::Function(FunctionId::Software) => TaskOutput::Software(probe.software()),
        FetchTask::Function(FunctionId::Terminal) => TaskOutput::Terminal(probe.terminal()),
        FetchTask::Function(FunctionId::Datetime) => TaskOutput::Datetime(probe.datetime()),
        FetchTask::Function(FunctionId::PublicIp) => TaskOutput::PublicIp(probe.public_ip()),
        FetchTask::Function(FunctionId::Weather) => TaskOutput::Weather(probe.weather()),
    })
}

/// Run every task to completion in parallel, then report.
///
/// A failed inventory call fails the whole batch, but only after the other
/// tasks have finished; their outputs are discarded.
pub fn execute(tasks: Vec<FetchTask>, probe: &dyn HostProbe) -> Result<Vec<TaskOutput>> {
    if tasks.is_empty() {
        debug!("nothing to fetch");
        return Ok(Vec::new());
    }

    // One pool per run, sized so every task gets a thread
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(tasks.len())
        .thread_name(|index| format!("hostfetch-fetch-{}", index))
        .build()?;
    debug!(tasks = tasks.len(), "running fetch tasks");

    let results: Vec<Result<TaskOutput>> = pool.install(|| {
        tasks
            .into_par_iter()
            .with_max_len(1)
            .map(|task| run_task(task, probe))
            .collect()
    });

    results
        .into_iter()
        .collect::<Result<Vec<_>>>()
        .inspect_err(|err| error!(error = %err, "fetch batch failed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CachedInfo;
    use crate::planner::{plan, PlanInputs};

    fn tasks_for(ids: &[&str], cached: Option<&CachedInfo>) -> Vec<FetchTask> {
        let requested = RequestedItems::parse(ids).unwrap();
        let plan = plan(
            &requested,
            PlanInputs {
                cached,
                ..PlanInputs::default()
            },
        );
        build_tasks(&plan, &requested)
    }

    #[test]
    fn one_inventory_call_for_all_fresh_groups() {
        let tasks = tasks_for(&["cpu", "battery", "user", "terminal"], None);

        assert_eq!(
            tasks,
            vec![
                FetchTask::Inventory {
                    data_types: BTreeSet::from([DataType::Software, DataType::Hardware, DataType::Power]),
                    items: vec![ItemId::Cpu, ItemId::Battery, ItemId::User],
                },
                FetchTask::Function(FunctionId::Terminal),
            ]
        );
    }

    #[test]
    fn fresh_model_adds_registry_lookup() {
        let tasks = tasks_for(&["model"], None);
        assert!(tasks.contains(&FetchTask::ModelRegistry));
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn cached_model_needs_no_task() {
        let record = CachedInfo {
            model: Some(Model::default()),
            ..CachedInfo::default()
        };
        assert!(tasks_for(&["model"], Some(&record)).is_empty());
    }

    #[test]
    fn registry_follows_hardware_group_not_model_cache() {
        // serial forces a fresh hardware fetch; the model is parsed again too
        let record = CachedInfo {
            model: Some(Model::default()),
            ..CachedInfo::default()
        };
        let tasks = tasks_for(&["model", "serial_number"], Some(&record));
        assert!(tasks.contains(&FetchTask::ModelRegistry));
    }
}
