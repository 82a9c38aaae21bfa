/// Seconds in one day (24 * 60 * 60)
pub const SECS_PER_DAY: i64 = 86400;

/// How long a cached recommendation page stays valid.
pub const CACHE_TTL_SECS: i64 = 7 * SECS_PER_DAY;

/// Categories that must always exist in the type registry. The
/// comparison view groups into exactly this set, in this order.
pub const DEFAULT_ACTIVITY_TYPES: &[&str] = &[
    "Movie",
    "TV Series",
    "Book",
    "Game",
    "Course",
    "City",
];

/// Page size used by the list view when the caller does not pick one.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 20;

/// Highest selectable rating; 0 means unrated.
pub const MAX_RATING: i32 = 10;

/// Maximum activity name length
pub const MAX_NAME_LEN: usize = 200;

/// Maximum type registry name length
pub const MAX_TYPE_NAME_LEN: usize = 100;

/// Maximum plan title length
pub const MAX_TITLE_LEN: usize = 200;
