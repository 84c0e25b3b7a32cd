//! Static catalog of every item hostfetch can fetch and display
//!
//! Each item maps to exactly one data source: either a group of the bulk
//! hardware inventory (several items share one external call) or an
//! independent function.

use crate::error::{HostfetchError, Result};
use std::fmt;
use std::str::FromStr;

/// Identifier of a selectable item.
///
/// Declaration order is the default display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemId {
    User,
    Hostname,
    Os,
    SystemIntegrity,
    SerialNumber,
    Model,
    Cpu,
    Gpu,
    Memory,
    Disk,
    Battery,
    Display,
    Terminal,
    Software,
    PublicIp,
    Uptime,
    Datetime,
    Weather,
}

impl ItemId {
    pub const ALL: [ItemId; 18] = [
        ItemId::User,
        ItemId::Hostname,
        ItemId::Os,
        ItemId::SystemIntegrity,
        ItemId::SerialNumber,
        ItemId::Model,
        ItemId::Cpu,
        ItemId::Gpu,
        ItemId::Memory,
        ItemId::Disk,
        ItemId::Battery,
        ItemId::Display,
        ItemId::Terminal,
        ItemId::Software,
        ItemId::PublicIp,
        ItemId::Uptime,
        ItemId::Datetime,
        ItemId::Weather,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ItemId::User => "user",
            ItemId::Hostname => "hostname",
            ItemId::Os => "os",
            ItemId::SystemIntegrity => "system_integrity",
            ItemId::SerialNumber => "serial_number",
            ItemId::Model => "model",
            ItemId::Cpu => "cpu",
            ItemId::Gpu => "gpu",
            ItemId::Memory => "memory",
            ItemId::Disk => "disk",
            ItemId::Battery => "battery",
            ItemId::Display => "display",
            ItemId::Terminal => "terminal",
            ItemId::Software => "software",
            ItemId::PublicIp => "public_ip",
            ItemId::Uptime => "uptime",
            ItemId::Datetime => "datetime",
            ItemId::Weather => "weather",
        }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemId {
    type Err = HostfetchError;

    fn from_str(s: &str) -> Result<Self> {
        lookup(s).map(|item| item.id)
    }
}

/// Section of the hardware inventory, passed to the inventory tool as a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Software,
    Hardware,
    Memory,
    Displays,
    Power,
    Storage,
}

impl DataType {
    pub fn tag(self) -> &'static str {
        match self {
            DataType::Software => "SPSoftwareDataType",
            DataType::Hardware => "SPHardwareDataType",
            DataType::Memory => "SPMemoryDataType",
            DataType::Displays => "SPDisplaysDataType",
            DataType::Power => "SPPowerDataType",
            DataType::Storage => "SPStorageDataType",
        }
    }
}

/// Independent fetch function, one task each, never grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FunctionId {
    Datetime,
    Terminal,
    Software,
    PublicIp,
    Weather,
}

/// Where an item's data comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Shared bulk call; `cacheable` items may be persisted indefinitely
    Bulk { group: DataType, cacheable: bool },
    Function(FunctionId),
}

/// An item of the catalog
#[derive(Debug)]
pub struct Item {
    pub id: ItemId,
    pub title: &'static str,
    /// Nerd Font glyph shown before the title
    pub nerd: &'static str,
    pub source: SourceKind,
}

impl Item {
    pub fn is_cacheable(&self) -> bool {
        matches!(self.source, SourceKind::Bulk { cacheable: true, .. })
    }

    pub fn group(&self) -> Option<DataType> {
        match self.source {
            SourceKind::Bulk { group, .. } => Some(group),
            SourceKind::Function(_) => None,
        }
    }
}

const fn bulk(group: DataType, cacheable: bool) -> SourceKind {
    SourceKind::Bulk { group, cacheable }
}

// Indexed by `ItemId as usize`
static ITEMS: [Item; 18] = [
    Item { id: ItemId::User, title: "User", nerd: "\u{f007}", source: bulk(DataType::Software, false) },
    Item { id: ItemId::Hostname, title: "Hostname", nerd: "\u{f108}", source: bulk(DataType::Software, false) },
    Item { id: ItemId::Os, title: "OS", nerd: "\u{f179}", source: bulk(DataType::Software, false) },
    Item { id: ItemId::SystemIntegrity, title: "macOS SIP", nerd: "\u{f132}", source: bulk(DataType::Software, false) },
    Item { id: ItemId::SerialNumber, title: "Serial", nerd: "\u{f084}", source: bulk(DataType::Hardware, true) },
    Item { id: ItemId::Model, title: "Model", nerd: "\u{f109}", source: bulk(DataType::Hardware, true) },
    Item { id: ItemId::Cpu, title: "CPU", nerd: "\u{f4bc}", source: bulk(DataType::Hardware, true) },
    Item { id: ItemId::Gpu, title: "GPU", nerd: "\u{f0379}", source: bulk(DataType::Displays, true) },
    Item { id: ItemId::Memory, title: "Memory", nerd: "\u{f035b}", source: bulk(DataType::Memory, true) },
    Item { id: ItemId::Disk, title: "Disk", nerd: "\u{f02ca}", source: bulk(DataType::Storage, false) },
    Item { id: ItemId::Battery, title: "Battery", nerd: "\u{f0084}", source: bulk(DataType::Power, false) },
    Item { id: ItemId::Display, title: "Display", nerd: "\u{f0379}", source: bulk(DataType::Displays, false) },
    Item { id: ItemId::Terminal, title: "Terminal", nerd: "\u{f120}", source: SourceKind::Function(FunctionId::Terminal) },
    Item { id: ItemId::Software, title: "Software", nerd: "\u{f187}", source: SourceKind::Function(FunctionId::Software) },
    Item { id: ItemId::PublicIp, title: "Public IP", nerd: "\u{f1982}", source: SourceKind::Function(FunctionId::PublicIp) },
    Item { id: ItemId::Uptime, title: "Uptime", nerd: "\u{f017}", source: bulk(DataType::Software, false) },
    Item { id: ItemId::Datetime, title: "Date/Time", nerd: "\u{f073}", source: SourceKind::Function(FunctionId::Datetime) },
    Item { id: ItemId::Weather, title: "Weather", nerd: "\u{f0599}", source: SourceKind::Function(FunctionId::Weather) },
];

/// Look up an item by its string id
pub fn lookup(id: &str) -> Result<&'static Item> {
    ITEMS
        .iter()
        .find(|item| item.id.as_str() == id)
        .ok_or_else(|| HostfetchError::UnknownItem(id.to_string()))
}

/// The catalog entry for a known id
pub fn item(id: ItemId) -> &'static Item {
    &ITEMS[id as usize]
}

/// Every catalog entry, in default display order
pub fn all() -> &'static [Item] {
    &ITEMS
}

/// All item ids, alphabetically (for `--items`)
pub fn sorted_ids() -> Vec<&'static str> {
    let mut ids: Vec<&'static str> = ItemId::ALL.iter().map(|id| id.as_str()).collect();
    ids.sort_unstable();
    ids
}

/// Ordered, de-duplicated, validated list of requested items.
///
/// Order only matters for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedItems(Vec<ItemId>);

impl RequestedItems {
    /// Validate ids against the catalog, dropping duplicates (first wins).
    /// An empty list selects the default items.
    pub fn parse<S: AsRef<str>>(ids: &[S]) -> Result<Self> {
        if ids.is_empty() {
            return Ok(Self::default_items());
        }
        let mut items = Vec::with_capacity(ids.len());
        for id in ids {
            let item = lookup(id.as_ref())?;
            if !items.contains(&item.id) {
                items.push(item.id);
            }
        }
        Ok(Self(items))
    }

    /// Everything except weather, which needs network and a location
    pub fn default_items() -> Self {
        Self(
            ItemId::ALL
                .iter()
                .copied()
                .filter(|id| *id != ItemId::Weather)
                .collect(),
        )
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.0.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.0.iter().copied()
    }

    /// Requested items whose data comes from `group`
    pub fn in_group(&self, group: DataType) -> impl Iterator<Item = ItemId> + '_ {
        self.iter().filter(move |id| item(*id).group() == Some(group))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ItemId>> for RequestedItems {
    fn from(mut ids: Vec<ItemId>) -> Self {
        let mut seen = Vec::with_capacity(ids.len());
        ids.retain(|id| {
            if seen.contains(id) {
                false
            } else {
                seen.push(*id);
                true
            }
        });
        Self(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_discriminant() {
        for (index, id) in ItemId::ALL.iter().enumerate() {
            assert_eq!(ITEMS[index].id, *id);
            assert_eq!(item(*id).id, *id);
        }
    }

    #[test]
    fn ids_are_unique() {
        let mut ids = sorted_ids();
        let before = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), before);
    }

    #[test]
    fn lookup_unknown_item_fails() {
        let err = lookup("gpu_temperature").unwrap_err();
        assert!(matches!(err, HostfetchError::UnknownItem(ref id) if id == "gpu_temperature"));
    }

    #[test]
    fn parse_dedupes_and_keeps_order() {
        let requested = RequestedItems::parse(&["cpu", "battery", "cpu", "user"]).unwrap();
        let ids: Vec<ItemId> = requested.iter().collect();
        assert_eq!(ids, vec![ItemId::Cpu, ItemId::Battery, ItemId::User]);
    }

    #[test]
    fn parse_rejects_unknown_ids() {
        assert!(RequestedItems::parse(&["cpu", "nope"]).is_err());
    }

    #[test]
    fn empty_list_means_defaults() {
        let empty: [&str; 0] = [];
        let requested = RequestedItems::parse(&empty).unwrap();
        assert_eq!(requested, RequestedItems::default_items());
        assert!(!requested.contains(ItemId::Weather));
        assert_eq!(requested.len(), ItemId::ALL.len() - 1);
    }

    #[test]
    fn cacheable_items_are_the_stable_hardware_facts() {
        let cacheable: Vec<ItemId> = all()
            .iter()
            .filter(|item| item.is_cacheable())
            .map(|item| item.id)
            .collect();
        assert_eq!(
            cacheable,
            vec![ItemId::SerialNumber, ItemId::Model, ItemId::Cpu, ItemId::Gpu, ItemId::Memory]
        );
    }

    #[test]
    fn in_group_filters_by_data_type() {
        let requested = RequestedItems::parse(&["gpu", "cpu", "display", "model"]).unwrap();
        let displays: Vec<ItemId> = requested.in_group(DataType::Displays).collect();
        assert_eq!(displays, vec![ItemId::Gpu, ItemId::Display]);
    }
}
