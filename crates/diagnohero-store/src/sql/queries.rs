//! SQL queries for different databases.
//!
//! PostgreSQL uses `$n` placeholders; MySQL and SQLite share the `?` form.
//! Numeric columns are `BIGINT` everywhere so rows decode as `i64` through
//! the `Any` driver.

/// Schema statements (PostgreSQL).
pub const SCHEMA_PG: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS dh_users (
    user_id VARCHAR(255) PRIMARY KEY,
    hearts BIGINT NOT NULL,
    last_refill_at BIGINT NOT NULL,
    premium BOOLEAN NOT NULL DEFAULT FALSE,
    created_at BIGINT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS dh_quiz_answers (
    id BIGSERIAL PRIMARY KEY,
    user_id VARCHAR(255) NOT NULL,
    lection_id VARCHAR(255) NOT NULL,
    correct BOOLEAN NOT NULL,
    created_at BIGINT NOT NULL
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_dh_quiz_answers_user ON dh_quiz_answers (user_id, created_at)",
    r#"
CREATE TABLE IF NOT EXISTS dh_lection_progress (
    user_id VARCHAR(255) NOT NULL,
    lection_id VARCHAR(255) NOT NULL,
    progress BIGINT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    last_interaction BIGINT NOT NULL,
    PRIMARY KEY (user_id, lection_id)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS dh_study_sessions (
    id BIGSERIAL PRIMARY KEY,
    user_id VARCHAR(255) NOT NULL,
    title VARCHAR(255) NOT NULL,
    description TEXT,
    scheduled_at BIGINT NOT NULL,
    duration VARCHAR(255),
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_dh_study_sessions_user ON dh_study_sessions (user_id, scheduled_at)",
];

/// Schema statements (MySQL/MariaDB).
pub const SCHEMA_MYSQL: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS dh_users (
    user_id VARCHAR(255) PRIMARY KEY,
    hearts BIGINT NOT NULL,
    last_refill_at BIGINT NOT NULL,
    premium BOOLEAN NOT NULL DEFAULT FALSE,
    created_at BIGINT NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS dh_quiz_answers (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    user_id VARCHAR(255) NOT NULL,
    lection_id VARCHAR(255) NOT NULL,
    correct BOOLEAN NOT NULL,
    created_at BIGINT NOT NULL,
    INDEX idx_dh_quiz_answers_user (user_id, created_at)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS dh_lection_progress (
    user_id VARCHAR(255) NOT NULL,
    lection_id VARCHAR(255) NOT NULL,
    progress BIGINT NOT NULL,
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    last_interaction BIGINT NOT NULL,
    PRIMARY KEY (user_id, lection_id)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS dh_study_sessions (
    id BIGINT AUTO_INCREMENT PRIMARY KEY,
    user_id VARCHAR(255) NOT NULL,
    title VARCHAR(255) NOT NULL,
    description TEXT,
    scheduled_at BIGINT NOT NULL,
    duration VARCHAR(255),
    completed BOOLEAN NOT NULL DEFAULT FALSE,
    created_at BIGINT NOT NULL,
    updated_at BIGINT NOT NULL,
    INDEX idx_dh_study_sessions_user (user_id, scheduled_at)
)
"#,
];

/// Schema statements (SQLite).
pub const SCHEMA_SQLITE: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS dh_users (
    user_id TEXT PRIMARY KEY,
    hearts INTEGER NOT NULL,
    last_refill_at INTEGER NOT NULL,
    premium INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS dh_quiz_answers (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    lection_id TEXT NOT NULL,
    correct INTEGER NOT NULL,
    created_at INTEGER NOT NULL
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_dh_quiz_answers_user ON dh_quiz_answers (user_id, created_at)",
    r#"
CREATE TABLE IF NOT EXISTS dh_lection_progress (
    user_id TEXT NOT NULL,
    lection_id TEXT NOT NULL,
    progress INTEGER NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    last_interaction INTEGER NOT NULL,
    PRIMARY KEY (user_id, lection_id)
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS dh_study_sessions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT,
    scheduled_at INTEGER NOT NULL,
    duration TEXT,
    completed INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
)
"#,
    "CREATE INDEX IF NOT EXISTS idx_dh_study_sessions_user ON dh_study_sessions (user_id, scheduled_at)",
];

// Users

pub const FIND_USER_PG: &str = r#"
SELECT user_id, hearts, last_refill_at, premium, created_at
FROM dh_users
WHERE user_id = $1
"#;

pub const FIND_USER_MYSQL: &str = r#"
SELECT user_id, hearts, last_refill_at, premium, created_at
FROM dh_users
WHERE user_id = ?
"#;

pub const INSERT_USER_PG: &str = r#"
INSERT INTO dh_users (user_id, hearts, last_refill_at, premium, created_at)
VALUES ($1, $2, $3, $4, $5)
"#;

pub const INSERT_USER_MYSQL: &str = r#"
INSERT INTO dh_users (user_id, hearts, last_refill_at, premium, created_at)
VALUES (?, ?, ?, ?, ?)
"#;

/// Conditional heart update; applied only if the row still holds the
/// values that were read.
pub const CAS_HEARTS_PG: &str = r#"
UPDATE dh_users
SET hearts = $1, last_refill_at = $2
WHERE user_id = $3 AND hearts = $4 AND last_refill_at = $5
"#;

pub const CAS_HEARTS_MYSQL: &str = r#"
UPDATE dh_users
SET hearts = ?, last_refill_at = ?
WHERE user_id = ? AND hearts = ? AND last_refill_at = ?
"#;

pub const SET_PREMIUM_PG: &str = "UPDATE dh_users SET premium = $1 WHERE user_id = $2";

pub const SET_PREMIUM_MYSQL: &str = "UPDATE dh_users SET premium = ? WHERE user_id = ?";

pub const LIST_USERS: &str = r#"
SELECT user_id, hearts, last_refill_at, premium, created_at
FROM dh_users
ORDER BY user_id
"#;

// Quiz answers

pub const INSERT_ANSWER_PG: &str = r#"
INSERT INTO dh_quiz_answers (user_id, lection_id, correct, created_at)
VALUES ($1, $2, $3, $4)
"#;

pub const INSERT_ANSWER_MYSQL: &str = r#"
INSERT INTO dh_quiz_answers (user_id, lection_id, correct, created_at)
VALUES (?, ?, ?, ?)
"#;

pub const ANSWER_COUNTS_PG: &str = r#"
SELECT COUNT(*) AS total, COUNT(CASE WHEN correct THEN 1 END) AS correct
FROM dh_quiz_answers
WHERE user_id = $1 AND created_at >= $2
"#;

pub const ANSWER_COUNTS_MYSQL: &str = r#"
SELECT COUNT(*) AS total, COUNT(CASE WHEN correct THEN 1 END) AS correct
FROM dh_quiz_answers
WHERE user_id = ? AND created_at >= ?
"#;

// Lection progress

pub const UPSERT_PROGRESS_PG: &str = r#"
INSERT INTO dh_lection_progress (user_id, lection_id, progress, completed, last_interaction)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (user_id, lection_id) DO UPDATE
SET progress = excluded.progress,
    completed = excluded.completed,
    last_interaction = excluded.last_interaction
"#;

pub const UPSERT_PROGRESS_SQLITE: &str = r#"
INSERT INTO dh_lection_progress (user_id, lection_id, progress, completed, last_interaction)
VALUES (?, ?, ?, ?, ?)
ON CONFLICT (user_id, lection_id) DO UPDATE
SET progress = excluded.progress,
    completed = excluded.completed,
    last_interaction = excluded.last_interaction
"#;

pub const UPSERT_PROGRESS_MYSQL: &str = r#"
INSERT INTO dh_lection_progress (user_id, lection_id, progress, completed, last_interaction)
VALUES (?, ?, ?, ?, ?)
ON DUPLICATE KEY UPDATE
    progress = VALUES(progress),
    completed = VALUES(completed),
    last_interaction = VALUES(last_interaction)
"#;

pub const FIND_PROGRESS_PG: &str = r#"
SELECT user_id, lection_id, progress, completed, last_interaction
FROM dh_lection_progress
WHERE user_id = $1 AND lection_id = $2
"#;

pub const FIND_PROGRESS_MYSQL: &str = r#"
SELECT user_id, lection_id, progress, completed, last_interaction
FROM dh_lection_progress
WHERE user_id = ? AND lection_id = ?
"#;

pub const COMPLETED_LECTIONS_PG: &str = r#"
SELECT COUNT(*) AS total
FROM dh_lection_progress
WHERE user_id = $1 AND completed = $2
"#;

pub const COMPLETED_LECTIONS_MYSQL: &str = r#"
SELECT COUNT(*) AS total
FROM dh_lection_progress
WHERE user_id = ? AND completed = ?
"#;

// Study sessions

pub const LIST_SESSIONS_PG: &str = r#"
SELECT id, user_id, title, description, scheduled_at, duration, completed, created_at, updated_at
FROM dh_study_sessions
WHERE user_id = $1
ORDER BY scheduled_at DESC, id DESC
"#;

pub const LIST_SESSIONS_MYSQL: &str = r#"
SELECT id, user_id, title, description, scheduled_at, duration, completed, created_at, updated_at
FROM dh_study_sessions
WHERE user_id = ?
ORDER BY scheduled_at DESC, id DESC
"#;

/// PostgreSQL and SQLite both return the generated id.
pub const INSERT_SESSION_PG: &str = r#"
INSERT INTO dh_study_sessions (user_id, title, description, scheduled_at, duration, completed, created_at, updated_at)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
RETURNING id
"#;

pub const INSERT_SESSION_SQLITE: &str = r#"
INSERT INTO dh_study_sessions (user_id, title, description, scheduled_at, duration, completed, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
RETURNING id
"#;

/// MySQL has no `RETURNING`; the id comes from the query result.
pub const INSERT_SESSION_MYSQL: &str = r#"
INSERT INTO dh_study_sessions (user_id, title, description, scheduled_at, duration, completed, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

pub const DELETE_SESSION_PG: &str = "DELETE FROM dh_study_sessions WHERE id = $1 AND user_id = $2";

pub const DELETE_SESSION_MYSQL: &str = "DELETE FROM dh_study_sessions WHERE id = ? AND user_id = ?";

pub const COMPLETE_SESSION_PG: &str = r#"
UPDATE dh_study_sessions
SET completed = $1, updated_at = $2
WHERE id = $3 AND user_id = $4
"#;

pub const COMPLETE_SESSION_MYSQL: &str = r#"
UPDATE dh_study_sessions
SET completed = ?, updated_at = ?
WHERE id = ? AND user_id = ?
"#;

pub const SESSION_EXISTS_PG: &str =
    "SELECT id FROM dh_study_sessions WHERE id = $1 AND user_id = $2";

pub const SESSION_EXISTS_MYSQL: &str =
    "SELECT id FROM dh_study_sessions WHERE id = ? AND user_id = ?";
