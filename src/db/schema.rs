pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS activities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    type TEXT NOT NULL,
    name TEXT NOT NULL,
    date TEXT NOT NULL,
    comment TEXT,
    rating INTEGER NOT NULL DEFAULT 0,
    end_date TEXT
);

CREATE TABLE IF NOT EXISTS activity_types (
    name TEXT PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS plans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    description TEXT,
    scope TEXT NOT NULL,
    year INTEGER NOT NULL,
    month INTEGER,
    status TEXT NOT NULL DEFAULT 'planned',
    progress INTEGER NOT NULL DEFAULT 0,
    priority TEXT NOT NULL DEFAULT 'medium',
    created_at INTEGER NOT NULL,
    folder_id INTEGER
);

CREATE TABLE IF NOT EXISTS folders (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS recommendation_cache (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category TEXT NOT NULL,
    period TEXT NOT NULL,
    genre TEXT NOT NULL DEFAULT 'all',
    is_turkish INTEGER NOT NULL DEFAULT 0,
    external_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    rating REAL,
    image_url TEXT,
    release_date TEXT,
    content_type TEXT,
    page INTEGER NOT NULL DEFAULT 1,
    fetched_at INTEGER NOT NULL,
    UNIQUE(category, period, genre, is_turkish, external_id)
);

CREATE TABLE IF NOT EXISTS settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_activities_date ON activities(date);
CREATE INDEX IF NOT EXISTS idx_activities_type ON activities(type);
CREATE INDEX IF NOT EXISTS idx_plans_period ON plans(year, month);
CREATE INDEX IF NOT EXISTS idx_recommendation_cache_key
    ON recommendation_cache(category, period, genre, is_turkish, page);
"#;
