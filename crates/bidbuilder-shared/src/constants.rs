/// Application name
pub const APP_NAME: &str = "BidBuilder";

/// Status every new proposal starts in
pub const DEFAULT_PROPOSAL_STATUS: &str = "Draft";

/// Status after which chat messages are hidden from the owner
pub const APPROVED_STATUS: &str = "Approved";

/// Default bearer token lifetime in minutes
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// Default HTTP API port
pub const DEFAULT_HTTP_PORT: u16 = 8000;

/// Default text splitter bounds, in characters
pub const DEFAULT_CHUNK_SIZE: usize = 1500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 150;

/// Number of months covered by the monthly analytics series
pub const DEFAULT_ANALYTICS_WINDOW_MONTHS: u32 = 6;

/// Upper bound on the monthly analytics window (100 years)
pub const MAX_ANALYTICS_WINDOW_MONTHS: u32 = 1200;

/// Analytics keys
pub const ANALYTICS_BY_STATUS: &str = "proposalsByStatus";
pub const ANALYTICS_BY_PRIORITY: &str = "proposalsByPriority";
pub const ANALYTICS_MONTHLY: &str = "monthlyProposals";
pub const ANALYTICS_TEAM: &str = "teamPerformance";
pub const ANALYTICS_RECENT_ACTIVITY: &str = "recentActivity";

/// Every key served by the analytics endpoint, in display order.
pub const ANALYTICS_KEYS: [&str; 5] = [
    ANALYTICS_BY_STATUS,
    ANALYTICS_BY_PRIORITY,
    ANALYTICS_MONTHLY,
    ANALYTICS_TEAM,
    ANALYTICS_RECENT_ACTIVITY,
];

/// Keys that are seeded empty and never recomputed.
pub const ANALYTICS_PLACEHOLDER_KEYS: [&str; 2] =
    [ANALYTICS_BY_PRIORITY, ANALYTICS_RECENT_ACTIVITY];
