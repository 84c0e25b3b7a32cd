//! One run: read caches, plan, execute, merge, and later persist

use crate::cache::{self, WEATHER_TTL};
use crate::catalog::{FunctionId, ItemId, RequestedItems};
use crate::collectors::HostProbe;
use crate::config::Config;
use crate::data::{CachedInfo, HostInfo, Weather};
use crate::error::{HostfetchError, Result};
use crate::executor;
use crate::merge::{merge, model_unresolved};
use crate::planner::{self, PlanInputs};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Everything a run needs to know, built once at startup
#[derive(Debug, Clone)]
pub struct FetchContext {
    pub items: RequestedItems,
    pub use_cache: bool,
    pub force_refresh: bool,
    pub cache_file: PathBuf,
    pub weather_cache_file: PathBuf,
}

impl FetchContext {
    pub fn from_config(config: &Config, force_refresh: bool) -> Result<Self> {
        if force_refresh && !config.cache {
            return Err(HostfetchError::Config(
                "--cache=false and --refresh=true are mutually exclusive".to_string(),
            ));
        }
        Ok(Self {
            items: config.items.clone(),
            use_cache: config.cache,
            force_refresh,
            cache_file: config.cache_file.clone(),
            weather_cache_file: config.weather_cache_file.clone(),
        })
    }
}

/// A completed snapshot plus the cache writes it calls for
#[derive(Debug)]
pub struct Collected {
    pub info: HostInfo,
    static_write: Option<(PathBuf, CachedInfo)>,
    weather_write: Option<(PathBuf, Weather)>,
}

impl Collected {
    pub fn will_write_static(&self) -> bool {
        self.static_write.is_some()
    }

    pub fn will_write_weather(&self) -> bool {
        self.weather_write.is_some()
    }

    /// Write pending cache records; called after output is rendered
    pub fn persist(&self) -> Result<()> {
        if let Some((path, record)) = &self.static_write {
            cache::write_cache(path, record).map_err(|source| HostfetchError::CacheWrite {
                path: path.clone(),
                source,
            })?;
        }
        if let Some((path, weather)) = &self.weather_write {
            cache::write_cache(path, weather).map_err(|source| HostfetchError::CacheWrite {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

fn read_static_cache(ctx: &FetchContext) -> Result<Option<CachedInfo>> {
    if !ctx.use_cache {
        return Ok(None);
    }
    match cache::read_cache::<CachedInfo>(&ctx.cache_file) {
        Ok(record) => Ok(Some(record)),
        Err(err) if err.is_missing() => {
            debug!(path = %ctx.cache_file.display(), reason = %err, "no usable cache, repopulating");
            Ok(None)
        }
        // About to be overwritten anyway
        Err(err) if ctx.force_refresh => {
            warn!(path = %ctx.cache_file.display(), error = %err, "ignoring unreadable cache");
            Ok(None)
        }
        Err(source) => Err(HostfetchError::CacheRead {
            path: ctx.cache_file.clone(),
            source,
        }),
    }
}

fn read_weather_cache(ctx: &FetchContext) -> Option<Weather> {
    if !ctx.use_cache || ctx.force_refresh || !ctx.items.contains(ItemId::Weather) {
        return None;
    }
    if cache::is_stale(&ctx.weather_cache_file, WEATHER_TTL) {
        debug!("weather cache is stale");
        return None;
    }
    cache::read_cache::<Weather>(&ctx.weather_cache_file)
        .map_err(|err| debug!(error = %err, "weather cache unusable"))
        .ok()
}

/// Fetch everything the requested items need.
///
/// Nothing is written here; see [`Collected::persist`].
pub fn collect(ctx: &FetchContext, probe: &dyn HostProbe) -> Result<Collected> {
    let cached = read_static_cache(ctx)?;
    let cached_weather = read_weather_cache(ctx);

    let plan = planner::plan(
        &ctx.items,
        PlanInputs {
            cached: cached.as_ref(),
            force_refresh: ctx.force_refresh,
            weather_cache_fresh: cached_weather.is_some(),
        },
    );
    let tasks = executor::build_tasks(&plan, &ctx.items);
    let outputs = executor::execute(tasks, probe)?;

    let weather_fetched = plan.functions_needed.contains(&FunctionId::Weather);
    let keep_model = !model_unresolved(&outputs) || cached.as_ref().is_some_and(|record| record.model.is_some());
    let info = merge(cached.clone(), cached_weather, outputs);

    let mut collected = Collected {
        info,
        static_write: None,
        weather_write: None,
    };
    if ctx.use_cache {
        let mut record = collected.info.cacheable_subset();
        // Retried next run: only obtained values are cached
        if !keep_model {
            debug!("model name unresolved, leaving it out of the cache");
            record.model = None;
        }
        if !record.is_empty() && (ctx.force_refresh || cached.as_ref() != Some(&record)) {
            collected.static_write = Some((ctx.cache_file.clone(), record));
        }
        // A failed fetch is never cached
        if let Some(weather) = collected.info.weather.as_ref().filter(|_| weather_fetched) {
            collected.weather_write = Some((ctx.weather_cache_file.clone(), weather.clone()));
        }
    }
    debug!(
        static_write = collected.will_write_static(),
        weather_write = collected.will_write_weather(),
        "run collected"
    );
    Ok(collected)
}
