//! Folding cached records and task outputs into one snapshot

use crate::collectors::InventoryFields;
use crate::data::{CachedInfo, HostInfo, Model, Weather};
use crate::executor::TaskOutput;

/// Build the run's snapshot.
///
/// Cached values come first; fresh task outputs override them.
pub fn merge(cached: Option<CachedInfo>, cached_weather: Option<Weather>, outputs: Vec<TaskOutput>) -> HostInfo {
    let mut info = HostInfo::from_cache(cached.unwrap_or_default());
    info.weather = cached_weather;

    let mut model_number = None;
    let mut model_name = None;
    let mut registry_ran = false;
    for output in outputs {
        match output {
            TaskOutput::Inventory(fields) => {
                model_number = fields.model_number.clone();
                apply_inventory(&mut info, fields);
            }
            TaskOutput::ModelName(model) => {
                registry_ran = true;
                model_name = model;
            }
            TaskOutput::Software(software) => info.software = Some(software),
            TaskOutput::Terminal(terminal) => info.terminal = Some(terminal),
            TaskOutput::Datetime(datetime) => info.datetime = Some(datetime),
            TaskOutput::PublicIp(public_ip) => info.public_ip = public_ip,
            TaskOutput::Weather(weather) => info.weather = weather,
        }
    }

    if model_number.is_some() || registry_ran {
        let previous = info.cached.model.take();
        let number = model_number
            .or_else(|| previous.as_ref().map(|model| model.number.clone()))
            .unwrap_or_default();
        let names = model_name.or(previous).unwrap_or_else(unresolved_model);
        info.cached.model = Some(Model { number, ..names });
    }
    info
}

/// Stand-in shown when the registry lookup failed and nothing was cached
fn unresolved_model() -> Model {
    Model {
        name: "Unknown".to_string(),
        ..Model::default()
    }
}

/// Whether the registry task ran and came back empty
pub fn model_unresolved(outputs: &[TaskOutput]) -> bool {
    outputs.iter().any(|output| matches!(output, TaskOutput::ModelName(None)))
}

fn apply_inventory(info: &mut HostInfo, fields: InventoryFields) {
    fn set<T>(slot: &mut Option<T>, value: Option<T>) {
        if value.is_some() {
            *slot = value;
        }
    }

    set(&mut info.cached.cpu, fields.cpu);
    set(&mut info.cached.gpu_cores, fields.gpu_cores);
    set(&mut info.cached.memory, fields.memory);
    set(&mut info.cached.serial_number, fields.serial_number);
    set(&mut info.user, fields.user);
    set(&mut info.hostname, fields.hostname);
    set(&mut info.os, fields.os);
    set(&mut info.system_integrity, fields.system_integrity);
    set(&mut info.uptime, fields.uptime);
    set(&mut info.disk, fields.disk);
    set(&mut info.battery, fields.battery);
    set(&mut info.displays, fields.displays);
}
