//! Structured report stream.
//!
//! Every resolution produces an ordered, append-only list of
//! [`ReportEntry`] records: a message id plus ordered parameters. The stream
//! is the canonical observable output of the engine. Text rendering and
//! localization belong to the host; the engine only guarantees that the same
//! inputs and dice give the same entries, byte-for-byte once serialized.
//!
//! # Example
//!
//! ```
//! use gunline_core::entity::EntityId;
//! use gunline_core::report::{MessageId, Report, ReportEntry};
//!
//! let mut report = Report::new();
//! report.push(
//!     ReportEntry::new(MessageId::HeatGenerated)
//!         .subject(EntityId::new(1))
//!         .param(3u32),
//! );
//!
//! assert!(report.contains(MessageId::HeatGenerated));
//! assert_eq!(MessageId::HeatGenerated.code(), 1103);
//! assert_eq!(MessageId::HeatGenerated.name(), "heat_generated");
//! ```

use std::fmt;

use gunline_board::{Direction, HexCoord};
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Location};

/// Stable message identifiers.
///
/// Numeric codes and snake_case names never change once published; hosts
/// key their message templates on them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
#[allow(missing_docs)]
pub enum MessageId {
    // Declaration and preconditions
    AttackDeclared = 1000,
    AttackerMissing = 1001,
    AttackerInoperable = 1002,
    TargetMissing = 1003,
    TargetDestroyed = 1004,
    MountMissing = 1005,
    MountDestroyed = 1006,
    MountJammed = 1007,
    AttackImpossible = 1008,
    IllegalAmmo = 1009,
    OutOfAmmo = 1010,
    ModeNotAllowed = 1011,
    StateRejected = 1012,
    TargetRequired = 1013,

    // Firing
    AmmoConsumed = 1100,
    AmmoReloaded = 1101,
    BurstTruncated = 1102,
    HeatGenerated = 1103,
    FeedCheck = 1104,
    FeedFault = 1105,
    WeaponJammed = 1106,
    WeaponExploded = 1107,
    StreakNoLock = 1108,

    // Hits
    AttackMissed = 1200,
    AttackHit = 1201,
    GlancingBlow = 1202,
    DirectBlow = 1203,
    ClusterRoll = 1204,
    AllShotsHit = 1205,
    LumpHit = 1206,
    HitsScored = 1207,

    // Damage
    DamageToLocation = 1300,
    ArmorAbsorbed = 1301,
    StructureDamaged = 1302,
    DamageTransferred = 1303,
    LocationDestroyed = 1304,
    UnitDestroyed = 1305,
    TroopersLost = 1306,
    LegRetargeted = 1307,
    CapitalConversion = 1308,
    BayAttackValue = 1309,

    // Criticals
    CriticalCheck = 1400,
    NoCritical = 1401,
    CriticalHit = 1402,
    ThroughArmorCritical = 1403,
    LocationBlownOff = 1404,
    AmmoExplosion = 1405,
    EngineHit = 1406,
    GyroHit = 1407,
    CrewKilled = 1408,
    NoCriticalSlots = 1409,

    // Secondary effects
    IgnitionRoll = 1500,
    TerrainIgnited = 1501,
    IgnitionFailed = 1502,
    VacuumNoFire = 1503,
    TargetSetAlight = 1504,
    InfernoHeat = 1505,
    EmpRoll = 1506,
    EmpNoEffect = 1507,
    EmpInterference = 1508,
    EmpShutdown = 1509,
    EmpStunned = 1510,
    ShutdownCollapse = 1511,

    // Special cases
    ArtilleryImpact = 1600,
    ArtilleryScatter = 1601,
    ArtilleryOffBoard = 1602,
    AreaDamage = 1603,
    TargetDesignated = 1604,
    NarcAttached = 1605,
    GrappleAttached = 1606,
    GrappleReleased = 1607,
    NotGrappled = 1608,
    AlreadyGrappled = 1609,
    SwarmAttached = 1610,
    SwarmDetachRoll = 1611,
    SwarmDetached = 1612,
    SwarmHolds = 1613,
    NotSwarming = 1614,
    FireExtinguished = 1615,
    OccupantExtinguished = 1616,
    CoolantApplied = 1617,
    SmokeDelivered = 1618,
    OccupantScreened = 1619,
    NoFireToExtinguish = 1620,
    AlreadySwarming = 1621,
}

impl MessageId {
    /// Stable numeric code.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Stable snake_case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.name())
    }
}

/// One ordered parameter of a report entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ReportParam {
    /// A unit.
    Entity(EntityId),
    /// A number: roll, damage, count.
    Int(i64),
    /// Free text: weapon names, slot labels.
    Text(String),
    /// A board hex.
    Hex(HexCoord),
    /// A unit location.
    Location(Location),
    /// A scatter direction.
    Direction(Direction),
}

impl From<EntityId> for ReportParam {
    fn from(id: EntityId) -> Self {
        ReportParam::Entity(id)
    }
}

impl From<u32> for ReportParam {
    fn from(n: u32) -> Self {
        ReportParam::Int(i64::from(n))
    }
}

impl From<i32> for ReportParam {
    fn from(n: i32) -> Self {
        ReportParam::Int(i64::from(n))
    }
}

impl From<u8> for ReportParam {
    fn from(n: u8) -> Self {
        ReportParam::Int(i64::from(n))
    }
}

impl From<&str> for ReportParam {
    fn from(s: &str) -> Self {
        ReportParam::Text(s.to_owned())
    }
}

impl From<String> for ReportParam {
    fn from(s: String) -> Self {
        ReportParam::Text(s)
    }
}

impl From<HexCoord> for ReportParam {
    fn from(hex: HexCoord) -> Self {
        ReportParam::Hex(hex)
    }
}

impl From<Location> for ReportParam {
    fn from(loc: Location) -> Self {
        ReportParam::Location(loc)
    }
}

impl From<Direction> for ReportParam {
    fn from(dir: Direction) -> Self {
        ReportParam::Direction(dir)
    }
}

impl fmt::Display for ReportParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportParam::Entity(id) => write!(f, "#{id}"),
            ReportParam::Int(n) => write!(f, "{n}"),
            ReportParam::Text(s) => f.write_str(s),
            ReportParam::Hex(h) => write!(f, "{h}"),
            ReportParam::Location(l) => write!(f, "{l}"),
            ReportParam::Direction(d) => write!(f, "{d:?}"),
        }
    }
}

/// One structured report record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportEntry {
    /// What happened.
    pub message: MessageId,
    /// Unit the entry is about, if any.
    pub subject: Option<EntityId>,
    /// Ordered parameters for the message template.
    pub params: Vec<ReportParam>,
    /// Nesting depth for display.
    pub indent: u8,
}

impl ReportEntry {
    /// An entry with no subject or parameters.
    #[must_use]
    pub fn new(message: MessageId) -> Self {
        Self {
            message,
            subject: None,
            params: Vec::new(),
            indent: 0,
        }
    }

    /// Sets the subject.
    #[must_use]
    pub fn subject(mut self, id: EntityId) -> Self {
        self.subject = Some(id);
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, p: impl Into<ReportParam>) -> Self {
        self.params.push(p.into());
        self
    }

    /// Sets the indent level.
    #[must_use]
    pub fn indent(mut self, level: u8) -> Self {
        self.indent = level;
        self
    }

    /// Integer parameter at `index`, if it is one.
    #[must_use]
    pub fn int(&self, index: usize) -> Option<i64> {
        match self.params.get(index) {
            Some(ReportParam::Int(n)) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for _ in 0..self.indent {
            f.write_str("  ")?;
        }
        write!(f, "[{}]", self.message)?;
        if let Some(id) = self.subject {
            write!(f, " #{id}")?;
        }
        for p in &self.params {
            write!(f, " {p}")?;
        }
        Ok(())
    }
}

/// Append-only list of report entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report {
    entries: Vec<ReportEntry>,
}

impl Report {
    /// An empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: ReportEntry) {
        self.entries.push(entry);
    }

    /// Appends several entries in order.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = ReportEntry>) {
        self.entries.extend(entries);
    }

    /// All entries in order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Consumes the report.
    #[must_use]
    pub fn into_entries(self) -> Vec<ReportEntry> {
        self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the report is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries.
    pub fn iter(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter()
    }

    /// Whether any entry carries `message`.
    #[must_use]
    pub fn contains(&self, message: MessageId) -> bool {
        self.entries.iter().any(|e| e.message == message)
    }

    /// How many entries carry `message`.
    #[must_use]
    pub fn count(&self, message: MessageId) -> usize {
        self.entries.iter().filter(|e| e.message == message).count()
    }

    /// First entry carrying `message`.
    #[must_use]
    pub fn find(&self, message: MessageId) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.message == message)
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        Ok(())
    }
}
