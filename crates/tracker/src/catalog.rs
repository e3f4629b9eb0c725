use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use portal_logger_core::{BlockPos, DimensionId, UnknownDimension};
use thiserror::Error;

/// Identifier of a single portal block: dimension plus block position.
///
/// Rendered as `Overworld:100,64,200`. This string form is what linked-portal
/// sets store and what the journal deduplicates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortalId {
    /// Dimension the portal block lives in.
    pub dimension: DimensionId,
    /// Block position of the portal block.
    pub pos: BlockPos,
}

impl PortalId {
    /// Create an identifier.
    pub const fn new(dimension: DimensionId, pos: BlockPos) -> Self {
        Self { dimension, pos }
    }
}

impl fmt::Display for PortalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{},{},{}",
            self.dimension, self.pos.x, self.pos.y, self.pos.z
        )
    }
}

/// Errors emitted while parsing a [`PortalId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalIdParseError {
    /// No `:` separating dimension and coordinates.
    #[error("portal id {0:?} is missing the dimension separator")]
    MissingSeparator(String),
    /// Dimension name not recognised.
    #[error(transparent)]
    Dimension(#[from] UnknownDimension),
    /// Coordinates are not exactly three integers.
    #[error("portal id {0:?} has malformed coordinates")]
    Coordinates(String),
}

impl FromStr for PortalId {
    type Err = PortalIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (dimension, coords) = s
            .split_once(':')
            .ok_or_else(|| PortalIdParseError::MissingSeparator(s.to_string()))?;
        let dimension = DimensionId::parse_display_name(dimension)?;

        let mut parts = coords.split(',').map(|part| part.trim().parse::<i32>());
        let (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(PortalIdParseError::Coordinates(s.to_string()));
        };

        Ok(Self::new(dimension, BlockPos::new(x, y, z)))
    }
}

/// Usage statistics for one portal block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalRecord {
    /// Where the portal is.
    pub id: PortalId,
    /// Epoch milliseconds when the record was created.
    pub first_seen_ms: i64,
    /// Epoch milliseconds of the most recent entry.
    pub last_used_ms: i64,
    /// Number of times the player walked into this portal.
    pub use_count: u32,
    /// Portals reached after travelling through this one (and vice versa).
    pub linked: BTreeSet<PortalId>,
}

impl PortalRecord {
    /// Fresh record that has been seen but never entered.
    pub fn new(id: PortalId, now_ms: i64) -> Self {
        Self {
            id,
            first_seen_ms: now_ms,
            last_used_ms: now_ms,
            use_count: 0,
            linked: BTreeSet::new(),
        }
    }

    /// Count an entry into the portal.
    pub fn record_use(&mut self, now_ms: i64) {
        self.use_count = self.use_count.saturating_add(1);
        self.last_used_ms = now_ms;
    }

    /// Whether the player has never walked into this portal.
    pub fn is_unused(&self) -> bool {
        self.use_count == 0
    }
}

/// Every known portal, grouped by dimension then position.
///
/// BTreeMaps keep iteration (and therefore the saved file) in a stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortalCatalog {
    dimensions: BTreeMap<DimensionId, BTreeMap<BlockPos, PortalRecord>>,
}

impl PortalCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the record for `id`, creating an unused one stamped `now_ms` if absent.
    pub fn get_or_create(&mut self, id: PortalId, now_ms: i64) -> &mut PortalRecord {
        self.dimensions
            .entry(id.dimension)
            .or_default()
            .entry(id.pos)
            .or_insert_with(|| PortalRecord::new(id, now_ms))
    }

    /// Look up a record.
    pub fn get(&self, id: &PortalId) -> Option<&PortalRecord> {
        self.dimensions.get(&id.dimension)?.get(&id.pos)
    }

    /// Insert a record, replacing any existing record with the same id.
    pub fn insert(&mut self, record: PortalRecord) {
        self.dimensions
            .entry(record.id.dimension)
            .or_default()
            .insert(record.id.pos, record);
    }

    /// Link two portals symmetrically, creating either endpoint if missing.
    pub fn link(&mut self, a: PortalId, b: PortalId, now_ms: i64) {
        self.get_or_create(a, now_ms).linked.insert(b);
        self.get_or_create(b, now_ms).linked.insert(a);
    }

    /// Records in one dimension, ordered by position.
    pub fn in_dimension(&self, dimension: DimensionId) -> impl Iterator<Item = &PortalRecord> {
        self.dimensions
            .get(&dimension)
            .into_iter()
            .flat_map(|portals| portals.values())
    }

    /// All records, ordered by dimension then position.
    pub fn iter(&self) -> impl Iterator<Item = &PortalRecord> {
        self.dimensions.values().flat_map(|portals| portals.values())
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.dimensions.values().map(BTreeMap::len).sum()
    }

    /// Returns true when no portals are known.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every record.
    pub fn clear(&mut self) {
        self.dimensions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overworld(x: i32, y: i32, z: i32) -> PortalId {
        PortalId::new(DimensionId::Overworld, BlockPos::new(x, y, z))
    }

    #[test]
    fn portal_id_display_and_parse_agree() {
        let id = PortalId::new(DimensionId::Nether, BlockPos::new(12, 64, -25));
        assert_eq!(id.to_string(), "Nether:12,64,-25");
        assert_eq!("Nether:12,64,-25".parse::<PortalId>(), Ok(id));
    }

    #[test]
    fn portal_id_rejects_malformed_input() {
        assert!(matches!(
            "Nether 1,2,3".parse::<PortalId>(),
            Err(PortalIdParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "Aether:1,2,3".parse::<PortalId>(),
            Err(PortalIdParseError::Dimension(_))
        ));
        assert!(matches!(
            "End:1,2".parse::<PortalId>(),
            Err(PortalIdParseError::Coordinates(_))
        ));
        assert!(matches!(
            "End:1,2,3,4".parse::<PortalId>(),
            Err(PortalIdParseError::Coordinates(_))
        ));
    }

    #[test]
    fn get_or_create_never_duplicates() {
        let mut catalog = PortalCatalog::new();
        catalog.get_or_create(overworld(100, 64, 200), 10).record_use(10);
        catalog.get_or_create(overworld(100, 64, 200), 20).record_use(20);

        assert_eq!(catalog.len(), 1);
        let record = catalog.get(&overworld(100, 64, 200)).expect("record exists");
        assert_eq!(record.use_count, 2);
        assert_eq!(record.first_seen_ms, 10);
        assert_eq!(record.last_used_ms, 20);
    }

    #[test]
    fn new_records_start_unused() {
        let mut catalog = PortalCatalog::new();
        let record = catalog.get_or_create(overworld(0, 0, 0), 5);
        assert!(record.is_unused());
        assert_eq!(record.last_used_ms, record.first_seen_ms);
    }

    #[test]
    fn link_is_symmetric_and_creates_endpoints() {
        let mut catalog = PortalCatalog::new();
        let origin = overworld(100, 64, 200);
        let dest = PortalId::new(DimensionId::Nether, BlockPos::new(12, 64, 25));
        catalog.get_or_create(origin, 1).record_use(1);

        catalog.link(origin, dest, 2);

        assert!(catalog.get(&origin).unwrap().linked.contains(&dest));
        let dest_record = catalog.get(&dest).expect("destination created");
        assert!(dest_record.linked.contains(&origin));
        assert!(dest_record.is_unused());
    }

    #[test]
    fn in_dimension_filters_and_orders() {
        let mut catalog = PortalCatalog::new();
        catalog.get_or_create(overworld(5, 0, 0), 0);
        catalog.get_or_create(overworld(1, 0, 0), 0);
        catalog.get_or_create(PortalId::new(DimensionId::End, BlockPos::new(0, 0, 0)), 0);

        let xs: Vec<i32> = catalog
            .in_dimension(DimensionId::Overworld)
            .map(|r| r.id.pos.x)
            .collect();
        assert_eq!(xs, vec![1, 5]);
        assert_eq!(catalog.in_dimension(DimensionId::Nether).count(), 0);
        assert_eq!(catalog.len(), 3);

        catalog.clear();
        assert!(catalog.is_empty());
    }
}
