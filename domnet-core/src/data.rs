use rusqlite::{Connection, OpenFlags, Result, params, params_from_iter};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

const SAMPLE_SIZE: usize = 10;

/// Relational source of known scam duplicates (lookalike domains).
pub struct LookalikeStore {
    conn: Connection,
}

/// One scam-duplicate row: `source_domain` is the lookalike of `domain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookalikeRecord {
    pub source_domain: String,
    pub domain: String,
    pub screenshot: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LookalikeSummary {
    pub input_domains_count: usize,
    pub lookalike_records_found: usize,
    pub unique_source_domains: usize,
    pub unique_target_domains: usize,
    pub new_domains_discovered: usize,
    pub new_domains_sample: Vec<String>,
    pub source_domains_sample: Vec<String>,
    pub target_domains_sample: Vec<String>,
}

impl LookalikeStore {
    pub fn drop(path: &Path) -> std::io::Result<()> {
        fs::remove_file(path)
    }

    pub fn exists(path: &Path) -> bool {
        path.exists()
    }

    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            ",
        )?;

        let store = LookalikeStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an existing store without creating the file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let store = LookalikeStore { conn };
        store.init_schema()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let store = LookalikeStore {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS scam_duplicates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_domain TEXT NOT NULL,
                domain TEXT NOT NULL,
                screenshot TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_scam_duplicates_domain ON scam_duplicates(domain);
            ",
        )?;
        Ok(())
    }

    pub fn insert_duplicate(&self, source_domain: &str, domain: &str, screenshot: Option<&str>) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO scam_duplicates (source_domain, domain, screenshot) VALUES (?1, ?2, ?3)",
            params![source_domain, domain, screenshot],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn query_lookalikes(&self, domains: &[String]) -> Result<Vec<LookalikeRecord>> {
        let placeholders = vec!["?"; domains.len()].join(", ");
        let sql = format!(
            "SELECT source_domain, domain, screenshot FROM scam_duplicates WHERE domain IN ({}) ORDER BY id",
            placeholders
        );
        debug!("Executing lookalike query for {} domains", domains.len());

        let mut stmt = self.conn.prepare(&sql)?;
        let records = stmt
            .query_map(params_from_iter(domains.iter()), |row| {
                Ok(LookalikeRecord {
                    source_domain: row.get(0)?,
                    domain: row.get(1)?,
                    screenshot: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Scam duplicates recorded against any of `domains`. Query failures are
    /// logged and reported as no results.
    pub fn find_lookalike_domains(&self, domains: &[String]) -> Vec<LookalikeRecord> {
        if domains.is_empty() {
            warn!("No source domains provided for lookalike search");
            return Vec::new();
        }

        info!("Searching for lookalike domains for {} domains", domains.len());
        match self.query_lookalikes(domains) {
            Ok(records) => {
                info!("Found {} lookalike domain records", records.len());
                records
            }
            Err(e) => {
                error!("Failed to find lookalike domains: {}", e);
                Vec::new()
            }
        }
    }

    pub fn lookalike_summary(&self, domains: &[String]) -> LookalikeSummary {
        let records = self.find_lookalike_domains(domains);
        let new_domains = extract_new_domains(&records, domains);

        let sources: BTreeSet<String> = records.iter().map(|r| r.source_domain.to_lowercase()).collect();
        let targets: BTreeSet<String> = records.iter().map(|r| r.domain.to_lowercase()).collect();

        LookalikeSummary {
            input_domains_count: domains.len(),
            lookalike_records_found: records.len(),
            unique_source_domains: sources.len(),
            unique_target_domains: targets.len(),
            new_domains_discovered: new_domains.len(),
            new_domains_sample: new_domains.into_iter().take(SAMPLE_SIZE).collect(),
            source_domains_sample: sources.into_iter().take(SAMPLE_SIZE).collect(),
            target_domains_sample: targets.into_iter().take(SAMPLE_SIZE).collect(),
        }
    }

    pub fn get_connection(&self) -> &Connection {
        &self.conn
    }
}

/// Domains named in `records` (either column) that are not in `original`,
/// lowercased and sorted.
pub fn extract_new_domains(records: &[LookalikeRecord], original: &[String]) -> Vec<String> {
    if records.is_empty() {
        info!("No lookalike results to process");
        return Vec::new();
    }

    let known: HashSet<String> = original.iter().map(|d| d.to_lowercase()).collect();
    let new_domains: BTreeSet<String> = records
        .iter()
        .flat_map(|r| [r.domain.as_str(), r.source_domain.as_str()])
        .filter(|d| !d.is_empty())
        .map(str::to_lowercase)
        .filter(|d| !known.contains(d))
        .collect();

    info!("Found {} new domains from lookalike analysis", new_domains.len());
    new_domains.into_iter().collect()
}
