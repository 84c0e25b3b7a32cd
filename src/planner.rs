//! Demand planning: which external calls a run needs
//!
//! Planning happens once, before any fetch starts. Items sharing a bulk group
//! collapse into one group entry; a group is fetched fresh as soon as any of
//! its requested items cannot be served from the long-lived cache.

use crate::catalog::{self, DataType, FunctionId, ItemId, RequestedItems, SourceKind};
use crate::data::CachedInfo;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Cache state the planner decides against
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanInputs<'a> {
    /// Long-lived record, `None` when missing, empty or disabled
    pub cached: Option<&'a CachedInfo>,
    /// Refetch everything regardless of cache state
    pub force_refresh: bool,
    /// The weather record exists, parses, and is within its TTL
    pub weather_cache_fresh: bool,
}

/// The minimal set of external calls for one run.
///
/// A group mapped to `false` is requested but fully satisfied by the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DemandPlan {
    pub group_fetch_needed: BTreeMap<DataType, bool>,
    pub functions_needed: BTreeSet<FunctionId>,
    /// Weather was requested and is served from its TTL cache
    pub weather_from_cache: bool,
}

impl DemandPlan {
    /// Groups that need the bulk call
    pub fn fresh_groups(&self) -> BTreeSet<DataType> {
        self.group_fetch_needed
            .iter()
            .filter(|(_, fresh)| **fresh)
            .map(|(group, _)| *group)
            .collect()
    }

    pub fn needs_fresh(&self, group: DataType) -> bool {
        self.group_fetch_needed.get(&group).copied().unwrap_or(false)
    }

    pub fn needs_bulk_fetch(&self) -> bool {
        self.group_fetch_needed.values().any(|fresh| *fresh)
    }

    /// Items the bulk call must parse: every requested item of a fresh group
    pub fn bulk_items(&self, requested: &RequestedItems) -> Vec<ItemId> {
        requested
            .iter()
            .filter(|id| {
                catalog::item(*id)
                    .group()
                    .is_some_and(|group| self.needs_fresh(group))
            })
            .collect()
    }
}

/// Compute the demand plan for `requested` under the given cache state
pub fn plan(requested: &RequestedItems, inputs: PlanInputs<'_>) -> DemandPlan {
    let mut plan = DemandPlan::default();

    for id in requested.iter() {
        match catalog::item(id).source {
            SourceKind::Bulk { group, cacheable } => {
                let cached = inputs.cached.is_some_and(|record| record.has(id));
                let need_fresh = inputs.force_refresh || !cacheable || !cached;
                *plan.group_fetch_needed.entry(group).or_insert(false) |= need_fresh;
            }
            SourceKind::Function(FunctionId::Weather)
                if inputs.weather_cache_fresh && !inputs.force_refresh =>
            {
                plan.weather_from_cache = true;
            }
            SourceKind::Function(function) => {
                plan.functions_needed.insert(function);
            }
        }
    }

    debug!(
        groups = ?plan.group_fetch_needed,
        functions = ?plan.functions_needed,
        weather_from_cache = plan.weather_from_cache,
        "demand plan"
    );
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Cpu, Memory};

    fn requested(ids: &[&str]) -> RequestedItems {
        RequestedItems::parse(ids).unwrap()
    }

    fn cpu_only_record() -> CachedInfo {
        CachedInfo {
            cpu: Some(Cpu {
                model: "Apple M2".into(),
                cores: 8,
                performance_cores: 4,
                efficiency_cores: 4,
            }),
            ..CachedInfo::default()
        }
    }

    #[test]
    fn no_cache_fetches_every_requested_group() {
        let plan = plan(&requested(&["cpu", "battery"]), PlanInputs::default());

        assert_eq!(
            plan.fresh_groups(),
            BTreeSet::from([DataType::Hardware, DataType::Power])
        );
        assert!(plan.functions_needed.is_empty());
    }

    #[test]
    fn cached_items_need_no_bulk_fetch() {
        let record = cpu_only_record();
        let plan = plan(
            &requested(&["cpu"]),
            PlanInputs {
                cached: Some(&record),
                ..PlanInputs::default()
            },
        );

        assert_eq!(plan.group_fetch_needed.get(&DataType::Hardware), Some(&false));
        assert!(!plan.needs_bulk_fetch());
        assert!(plan.bulk_items(&requested(&["cpu"])).is_empty());
    }

    #[test]
    fn cacheable_item_missing_from_record_forces_its_group() {
        let record = cpu_only_record();
        let plan = plan(
            &requested(&["cpu", "serial_number"]),
            PlanInputs {
                cached: Some(&record),
                ..PlanInputs::default()
            },
        );

        assert!(plan.needs_fresh(DataType::Hardware));
    }

    #[test]
    fn fresh_group_parses_all_its_requested_items() {
        let record = CachedInfo {
            gpu_cores: Some(10),
            ..CachedInfo::default()
        };
        let items = requested(&["gpu", "display", "cpu"]);
        let plan = plan(
            &items,
            PlanInputs {
                cached: Some(&record),
                ..PlanInputs::default()
            },
        );

        // display is never cacheable, so the whole displays group is refetched
        assert!(plan.needs_fresh(DataType::Displays));
        assert_eq!(
            plan.bulk_items(&items),
            vec![ItemId::Gpu, ItemId::Display, ItemId::Cpu]
        );
    }

    #[test]
    fn force_refresh_fetches_every_requested_group() {
        let record = CachedInfo {
            memory: Some(Memory {
                amount: 16,
                unit: "GB".into(),
                mem_type: "LPDDR5".into(),
            }),
            ..cpu_only_record()
        };
        let plan = plan(
            &requested(&["cpu", "memory", "user"]),
            PlanInputs {
                cached: Some(&record),
                force_refresh: true,
                weather_cache_fresh: false,
            },
        );

        assert_eq!(
            plan.fresh_groups(),
            BTreeSet::from([DataType::Hardware, DataType::Memory, DataType::Software])
        );
    }

    #[test]
    fn groups_without_requested_items_never_appear() {
        for item in catalog::all() {
            let items = RequestedItems::from(vec![item.id]);
            let plan = plan(&items, PlanInputs::default());
            let expected: Vec<DataType> = item.group().into_iter().collect();
            let planned: Vec<DataType> = plan.group_fetch_needed.keys().copied().collect();
            assert_eq!(planned, expected, "item {}", item.id);
        }
    }

    #[test]
    fn functions_are_scheduled_once() {
        let plan = plan(
            &requested(&["software", "terminal", "public_ip", "datetime"]),
            PlanInputs::default(),
        );

        assert!(plan.group_fetch_needed.is_empty());
        assert_eq!(
            plan.functions_needed,
            BTreeSet::from([
                FunctionId::Software,
                FunctionId::Terminal,
                FunctionId::PublicIp,
                FunctionId::Datetime,
            ])
        );
    }

    #[test]
    fn fresh_weather_cache_skips_the_weather_call() {
        let items = requested(&["weather"]);

        let cached = plan(
            &items,
            PlanInputs {
                weather_cache_fresh: true,
                ..PlanInputs::default()
            },
        );
        assert!(cached.weather_from_cache);
        assert!(cached.functions_needed.is_empty());

        let stale = plan(&items, PlanInputs::default());
        assert!(!stale.weather_from_cache);
        assert!(stale.functions_needed.contains(&FunctionId::Weather));

        let forced = plan(
            &items,
            PlanInputs {
                weather_cache_fresh: true,
                force_refresh: true,
                ..PlanInputs::default()
            },
        );
        assert!(!forced.weather_from_cache);
        assert!(forced.functions_needed.contains(&FunctionId::Weather));
    }
}
