/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Date key format used for snapshot files and pointers
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

/// Timestamp format used when persisting creation timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Snapshot file name prefix, one file per date key
pub const SNAPSHOT_FILE_PREFIX: &str = "portfolio_";

/// Snapshot file extension
pub const SNAPSHOT_FILE_EXT: &str = "json";

/// Pointer file resolving to the most recent date key
pub const LATEST_POINTER_FILE: &str = "latest.json";

/// Default source priority, most trusted first.
/// MyProfit carries the most complete data, B3 is the exchange of record,
/// XP is brokerage data, Kinvo is an aggregator platform.
pub const DEFAULT_SOURCE_PRIORITY: [&str; 4] = ["MyProfit", "B3", "XP", "Kinvo"];

/// Default significant-change threshold for version comparison (fraction)
pub const DEFAULT_SIGNIFICANT_CHANGE_THRESHOLD: &str = "0.10";
