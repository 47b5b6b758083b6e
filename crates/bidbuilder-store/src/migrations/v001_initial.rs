//! v001 -- Initial schema creation.
//!
//! Creates the identity tables (`roles`, `users`), the proposal tables
//! (`proposals`, `proposal_sections`, `comments`) and `templates`.

use rusqlite::Connection;

/// SQL executed when upgrading from version 0 to version 1.
const UP_SQL: &str = r#"
-- ----------------------------------------------------------------
-- Roles
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS roles (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE                 -- admin / manager / user
);

-- ----------------------------------------------------------------
-- Users
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS users (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    username        TEXT NOT NULL UNIQUE,
    email           TEXT NOT NULL UNIQUE,
    hashed_password TEXT NOT NULL,            -- argon2 PHC string
    is_active       INTEGER NOT NULL DEFAULT 1,
    role_id         INTEGER NOT NULL,
    created_at      TEXT NOT NULL,            -- RFC-3339

    FOREIGN KEY (role_id) REFERENCES roles(id)
);

-- ----------------------------------------------------------------
-- Templates
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS templates (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,
    category        TEXT,
    description     TEXT,
    sections        TEXT NOT NULL DEFAULT '[]',   -- JSON array of titles
    estimated_value REAL,
    timeline        TEXT,
    usage_count     INTEGER NOT NULL DEFAULT 0,
    content         TEXT,
    created_at      TEXT NOT NULL
);

-- ----------------------------------------------------------------
-- Proposals
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS proposals (
    id                     INTEGER PRIMARY KEY AUTOINCREMENT,
    title                  TEXT NOT NULL,
    description            TEXT NOT NULL DEFAULT '',
    category               TEXT,
    status                 TEXT NOT NULL DEFAULT 'Draft',
    owner_id               INTEGER NOT NULL,
    assigned_by_manager_id INTEGER,
    return_to_manager_id   INTEGER,
    template_id            INTEGER,
    estimated_value        REAL,
    timeline               TEXT,
    priority               TEXT,
    requirements           TEXT,
    client_name            TEXT,
    created_at             TEXT NOT NULL,
    updated_at             TEXT NOT NULL,

    FOREIGN KEY (owner_id) REFERENCES users(id),
    FOREIGN KEY (assigned_by_manager_id) REFERENCES users(id),
    FOREIGN KEY (return_to_manager_id) REFERENCES users(id),
    FOREIGN KEY (template_id) REFERENCES templates(id) ON DELETE SET NULL
);

CREATE INDEX IF NOT EXISTS idx_proposals_owner ON proposals(owner_id);
CREATE INDEX IF NOT EXISTS idx_proposals_title ON proposals(title);

-- ----------------------------------------------------------------
-- Sections
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS proposal_sections (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    proposal_id      INTEGER NOT NULL,
    title            TEXT NOT NULL,
    content          TEXT NOT NULL DEFAULT '',
    is_sensitive     INTEGER NOT NULL DEFAULT 0,
    assigned_user_id INTEGER,

    FOREIGN KEY (proposal_id) REFERENCES proposals(id) ON DELETE CASCADE,
    FOREIGN KEY (assigned_user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_sections_proposal ON proposal_sections(proposal_id);

-- ----------------------------------------------------------------
-- Comments
-- ----------------------------------------------------------------
CREATE TABLE IF NOT EXISTS comments (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    proposal_id INTEGER NOT NULL,
    section_id  INTEGER,                      -- set for section comments
    user_id     INTEGER NOT NULL,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL,

    FOREIGN KEY (proposal_id) REFERENCES proposals(id) ON DELETE CASCADE,
    FOREIGN KEY (section_id) REFERENCES proposal_sections(id) ON DELETE CASCADE,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_comments_proposal ON comments(proposal_id, created_at);
"#;

/// Apply the initial migration.
pub fn up(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(UP_SQL)
}
