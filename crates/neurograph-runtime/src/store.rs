//! SQLite-backed graph store.
//!
//! The store owns node and synapse identity and persistence. It is a pure
//! data-access layer: every method is a single statement (or a short
//! sequence of independent statements) that commits immediately.
//!
//! Each thread opens its own `GraphStore` on the same database file.
//! Concurrency control is left to SQLite itself (WAL journal plus a busy
//! timeout); no in-process lock is shared between handles. A handle always
//! observes its own writes, but reads through one handle may see either the
//! old or the new value of a row another handle is writing.

use crate::error::Result;
use neurograph_core::error::ValidationError;
use neurograph_core::params::{HEBBIAN_INCREMENT, HEBBIAN_MAX_WEIGHT};
use neurograph_core::types::*;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Busy timeout used when none is given.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS nodes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        label TEXT NOT NULL UNIQUE,
        node_type TEXT NOT NULL DEFAULT 'concept',
        energy REAL NOT NULL DEFAULT 0.0,
        resting REAL NOT NULL DEFAULT 0.0,
        fire_count INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        last_fired TEXT
    );

    CREATE TABLE IF NOT EXISTS synapses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        src_id INTEGER NOT NULL REFERENCES nodes(id),
        dst_id INTEGER NOT NULL REFERENCES nodes(id),
        weight REAL NOT NULL DEFAULT 0.1,
        syn_type TEXT NOT NULL DEFAULT 'association',
        fire_count INTEGER NOT NULL DEFAULT 0,
        last_fired TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE (src_id, dst_id),
        CHECK (src_id != dst_id)
    );

    CREATE TABLE IF NOT EXISTS activation_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        "trigger" TEXT NOT NULL,
        nodes_fired INTEGER NOT NULL,
        peak_node TEXT,
        peak_energy REAL NOT NULL DEFAULT 0.0,
        timestamp TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS state (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX IF NOT EXISTS idx_synapses_src ON synapses(src_id, weight);
    CREATE INDEX IF NOT EXISTS idx_synapses_dst ON synapses(dst_id);
    CREATE INDEX IF NOT EXISTS idx_nodes_fire_count ON nodes(fire_count);
    CREATE INDEX IF NOT EXISTS idx_nodes_energy ON nodes(energy);
"#;

const NODE_COLUMNS: &str = "id, label, node_type, energy, resting, fire_count";
const SYNAPSE_COLUMNS: &str = "id, src_id, dst_id, weight, syn_type, fire_count, last_fired";

/// One connection to the persisted graph.
pub struct GraphStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl GraphStore {
    /// Create a private in-memory graph. Other handles cannot see it.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_with_connection(conn, None)
    }

    /// Create or open a file-backed graph with the default busy timeout.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT)
    }

    /// Create or open a file-backed graph, waiting up to `busy_timeout` on lock contention.
    pub fn open_with_timeout<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        let store = Self::init_with_connection(conn, Some(path.to_path_buf()))?;
        info!(path = %path.display(), "opened graph store");
        Ok(store)
    }

    /// Open an independent connection to the same database file.
    ///
    /// Returns `None` for in-memory stores, which cannot be shared.
    pub fn reopen(&self, busy_timeout: Duration) -> Option<Result<Self>> {
        self.path
            .as_ref()
            .map(|p| Self::open_with_timeout(p, busy_timeout))
    }

    fn init_with_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        // WAL lets the musing and foreground connections read while the other writes
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn, path })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    // ─── Nodes ───────────────────────────────────────────────

    /// Get a node by label, creating it when absent.
    ///
    /// The label is lowercased and trimmed. An existing node keeps its type.
    pub fn get_or_create_node(&self, label: &str, node_type: NodeType) -> Result<Node> {
        let label = normalize_label(label)?;
        // Single statement: concurrent creators of the same label both get the one row.
        let node = self.conn.query_row(
            &format!(
                "INSERT INTO nodes (label, node_type) VALUES (?1, ?2)
                 ON CONFLICT(label) DO UPDATE SET label = excluded.label
                 RETURNING {NODE_COLUMNS}"
            ),
            params![label, node_type.as_str()],
            row_to_node,
        )?;
        debug!(label = %node.label, id = node.id.0, "resolved node");
        Ok(node)
    }

    /// Look a node up by label. Misses (including blank labels) return `None`.
    pub fn get_node(&self, label: &str) -> Result<Option<Node>> {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return Ok(None);
        }
        let node = self
            .conn
            .query_row(
                &format!("SELECT {NODE_COLUMNS} FROM nodes WHERE label = ?1"),
                params![label],
                row_to_node,
            )
            .optional()?;
        Ok(node)
    }

    pub fn get_node_by_id(&self, id: NodeId) -> Result<Option<Node>> {
        let node = self
            .conn
            .query_row(
                &format!("SELECT {NODE_COLUMNS} FROM nodes WHERE id = ?1"),
                params![id.0],
                row_to_node,
            )
            .optional()?;
        Ok(node)
    }

    /// All nodes ordered by id.
    pub fn all_nodes(&self) -> Result<Vec<Node>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {NODE_COLUMNS} FROM nodes ORDER BY id"))?;
        let nodes = stmt
            .query_map([], row_to_node)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(nodes)
    }

    pub fn node_count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }

    /// Set a node's resting baseline, clamped to [0,1].
    pub fn set_resting(&self, id: NodeId, resting: f64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE nodes SET resting = ?1 WHERE id = ?2",
            params![clamp_unit(resting), id.0],
        )?;
        Ok(changed > 0)
    }

    // ─── Energy ──────────────────────────────────────────────

    /// Restore every node's energy to its resting baseline.
    ///
    /// Full-table update; a candidate for an incremental reset on large graphs.
    pub fn reset_energies(&self) -> Result<usize> {
        Ok(self.conn.execute("UPDATE nodes SET energy = resting", [])?)
    }

    /// Fire a node directly: set its energy and bump its fire count.
    pub fn fire_node(&self, id: NodeId, energy: f64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE nodes SET energy = ?1, fire_count = fire_count + 1,
                 last_fired = datetime('now')
             WHERE id = ?2",
            params![clamp_unit(energy), id.0],
        )?;
        Ok(changed > 0)
    }

    /// Persist a propagated energy, clamped to [0,1].
    pub fn set_energy(&self, id: NodeId, energy: f64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE nodes SET energy = ?1 WHERE id = ?2",
            params![clamp_unit(energy), id.0],
        )?;
        Ok(changed > 0)
    }

    /// Raise a node's energy to `energy` if it is currently lower.
    pub fn raise_energy(&self, id: NodeId, energy: f64) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE nodes SET energy = MAX(energy, ?1) WHERE id = ?2",
            params![clamp_unit(energy), id.0],
        )?;
        Ok(changed > 0)
    }

    /// Nodes whose energy exceeds `threshold`, strongest first, ties by id.
    pub fn nodes_above(&self, threshold: f64) -> Result<Vec<Node>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NODE_COLUMNS} FROM nodes WHERE energy > ?1 ORDER BY energy DESC, id ASC"
        ))?;
        let nodes = stmt
            .query_map(params![threshold], row_to_node)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(nodes)
    }

    // ─── Synapses ────────────────────────────────────────────

    /// Create or strengthen `src -> dst` with the default Hebbian increment.
    pub fn connect(
        &self,
        src_label: &str,
        dst_label: &str,
        weight: f64,
        syn_type: SynapseType,
    ) -> Result<Synapse> {
        self.connect_scaled(src_label, dst_label, weight, syn_type, 1.0)
    }

    /// Create or strengthen `src -> dst`, scaling the increment by `plasticity`.
    ///
    /// Absent synapses start at `weight`; present ones grow by
    /// `HEBBIAN_INCREMENT * plasticity` up to `HEBBIAN_MAX_WEIGHT`.
    pub fn connect_scaled(
        &self,
        src_label: &str,
        dst_label: &str,
        weight: f64,
        syn_type: SynapseType,
        plasticity: f64,
    ) -> Result<Synapse> {
        let src = self.get_or_create_node(src_label, NodeType::Concept)?;
        let dst = self.get_or_create_node(dst_label, NodeType::Concept)?;
        self.upsert_synapse(
            &src,
            &dst,
            weight,
            HEBBIAN_INCREMENT * plasticity,
            HEBBIAN_MAX_WEIGHT,
            syn_type,
        )
    }

    /// Insert `src -> dst` at `initial`, or add `delta` to the existing weight
    /// clamped into [0, min(cap, 1)]. One atomic statement.
    pub fn upsert_synapse(
        &self,
        src: &Node,
        dst: &Node,
        initial: f64,
        delta: f64,
        cap: f64,
        syn_type: SynapseType,
    ) -> Result<Synapse> {
        if src.id == dst.id {
            return Err(ValidationError::SelfLoop {
                label: src.label.clone(),
            }
            .into());
        }
        let synapse = self.conn.query_row(
            &format!(
                "INSERT INTO synapses (src_id, dst_id, weight, syn_type) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(src_id, dst_id) DO UPDATE SET
                     weight = MAX(0.0, MIN(?5, weight + ?6)),
                     fire_count = fire_count + 1,
                     last_fired = datetime('now')
                 RETURNING {SYNAPSE_COLUMNS}"
            ),
            params![
                src.id.0,
                dst.id.0,
                clamp_unit(initial),
                syn_type.as_str(),
                clamp_unit(cap),
                delta,
            ],
            row_to_synapse,
        )?;
        debug!(
            src = %src.label,
            dst = %dst.label,
            weight = synapse.weight,
            "wired synapse"
        );
        Ok(synapse)
    }

    /// Add `delta` to an existing synapse, clamped into [0, min(cap, 1)].
    ///
    /// Returns the new weight, or `None` when the synapse does not exist.
    pub fn increment_weight(
        &self,
        src: NodeId,
        dst: NodeId,
        delta: f64,
        cap: f64,
    ) -> Result<Option<f64>> {
        let weight = self
            .conn
            .query_row(
                "UPDATE synapses SET weight = MAX(0.0, MIN(?3, weight + ?4)),
                     fire_count = fire_count + 1, last_fired = datetime('now')
                 WHERE src_id = ?1 AND dst_id = ?2
                 RETURNING weight",
                params![src.0, dst.0, clamp_unit(cap), delta],
                |row| row.get(0),
            )
            .optional()?;
        Ok(weight)
    }

    pub fn get_synapse(&self, src: NodeId, dst: NodeId) -> Result<Option<Synapse>> {
        let synapse = self
            .conn
            .query_row(
                &format!(
                    "SELECT {SYNAPSE_COLUMNS} FROM synapses WHERE src_id = ?1 AND dst_id = ?2"
                ),
                params![src.0, dst.0],
                row_to_synapse,
            )
            .optional()?;
        Ok(synapse)
    }

    /// All synapses ordered by id.
    pub fn all_synapses(&self) -> Result<Vec<Synapse>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SYNAPSE_COLUMNS} FROM synapses ORDER BY id"))?;
        let synapses = stmt
            .query_map([], row_to_synapse)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(synapses)
    }

    pub fn synapse_count(&self) -> Result<u64> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM synapses", [], |row| row.get(0))?;
        Ok(n.max(0) as u64)
    }

    /// Outgoing synapses with weight at least `min_weight`, strongest first.
    pub fn outgoing(&self, node_id: NodeId, min_weight: f64) -> Result<Vec<Outgoing>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT s.dst_id, s.weight, n.label
             FROM synapses s
             JOIN nodes n ON n.id = s.dst_id
             WHERE s.src_id = ?1 AND s.weight >= ?2
             ORDER BY s.weight DESC, s.dst_id ASC",
        )?;
        let edges = stmt
            .query_map(params![node_id.0, min_weight], |row| {
                Ok(Outgoing {
                    dst_id: NodeId(row.get(0)?),
                    weight: row.get(1)?,
                    dst_label: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(edges)
    }

    // ─── Decay primitives ────────────────────────────────────

    /// Subtract `rate` from every synapse heavier than `floor`, never below zero.
    pub fn decay_synapses(&self, rate: f64, floor: f64) -> Result<usize> {
        Ok(self.conn.execute(
            "UPDATE synapses SET weight = MAX(0.0, weight - ?1) WHERE weight > ?2",
            params![rate.max(0.0), floor],
        )?)
    }

    /// Delete every synapse at or below `floor`.
    pub fn delete_weak_synapses(&self, floor: f64) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM synapses WHERE weight <= ?1", params![floor])?)
    }

    /// Delete never-fired nodes that no synapse touches.
    pub fn delete_orphan_nodes(&self) -> Result<usize> {
        Ok(self.conn.execute(
            "DELETE FROM nodes
             WHERE fire_count = 0
               AND id NOT IN (SELECT src_id FROM synapses UNION SELECT dst_id FROM synapses)",
            [],
        )?)
    }

    // ─── Aggregate queries ───────────────────────────────────

    pub fn average_weight(&self) -> Result<f64> {
        let avg: Option<f64> =
            self.conn
                .query_row("SELECT AVG(weight) FROM synapses", [], |row| row.get(0))?;
        Ok(avg.unwrap_or(0.0))
    }

    /// The node fired most often, ties broken by id.
    pub fn most_fired_node(&self) -> Result<Option<(String, u64)>> {
        let row = self
            .conn
            .query_row(
                "SELECT label, fire_count FROM nodes ORDER BY fire_count DESC, id ASC LIMIT 1",
                [],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .optional()?;
        Ok(row.map(|(label, count)| (label, count.max(0) as u64)))
    }

    /// Nodes with the highest total degree (in + out).
    pub fn most_connected(&self, limit: usize) -> Result<Vec<(String, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT n.label,
                 (SELECT COUNT(*) FROM synapses WHERE src_id = n.id) +
                 (SELECT COUNT(*) FROM synapses WHERE dst_id = n.id) AS degree
             FROM nodes n
             ORDER BY degree DESC, n.id ASC
             LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?.max(0) as u64))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Strongest outgoing connections of a label as (destination label, weight).
    pub fn strongest_connections(&self, label: &str, limit: usize) -> Result<Vec<(String, f64)>> {
        let Some(node) = self.get_node(label)? else {
            return Ok(Vec::new());
        };
        let mut stmt = self.conn.prepare(
            "SELECT n.label, s.weight
             FROM synapses s
             JOIN nodes n ON n.id = s.dst_id
             WHERE s.src_id = ?1
             ORDER BY s.weight DESC, s.dst_id ASC
             LIMIT ?2",
        )?;
        let rows = stmt
            .query_map(params![node.id.0, limit as i64], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Response-type nodes currently above `threshold`, strongest first.
    pub fn response_nodes(&self, threshold: f64, limit: usize) -> Result<Vec<Node>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NODE_COLUMNS} FROM nodes
             WHERE node_type = 'response' AND energy > ?1
             ORDER BY energy DESC, id ASC
             LIMIT ?2"
        ))?;
        let nodes = stmt
            .query_map(params![threshold, limit as i64], row_to_node)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(nodes)
    }

    /// The concept fired least often (then lowest energy, then oldest).
    pub fn least_fired_concept(&self) -> Result<Option<String>> {
        let label = self
            .conn
            .query_row(
                "SELECT label FROM nodes WHERE node_type = 'concept'
                 ORDER BY fire_count ASC, energy ASC, id ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(label)
    }

    /// Labels of the most-fired concepts.
    pub fn most_fired_concepts(&self, limit: usize) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT label FROM nodes WHERE node_type = 'concept'
             ORDER BY fire_count DESC, id ASC LIMIT ?1",
        )?;
        let labels = stmt
            .query_map(params![limit as i64], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(labels)
    }

    /// Counts, average weight, most-fired node and density.
    pub fn stats(&self) -> Result<GraphStats> {
        let total_nodes = self.node_count()?;
        let total_synapses = self.synapse_count()?;
        let (most_fired_node, most_fired_count) = match self.most_fired_node()? {
            Some((label, count)) => (Some(label), count),
            None => (None, 0),
        };
        Ok(GraphStats {
            total_nodes,
            total_synapses,
            avg_synapse_weight: self.average_weight()?,
            most_fired_node,
            most_fired_count,
            density: GraphStats::density(total_nodes, total_synapses),
        })
    }

    // ─── Activation log ──────────────────────────────────────

    /// Append one activation summary.
    pub fn log_activation(
        &self,
        trigger: &str,
        nodes_fired: usize,
        peak_node: Option<&str>,
        peak_energy: f64,
    ) -> Result<()> {
        self.conn.execute(
            r#"INSERT INTO activation_log ("trigger", nodes_fired, peak_node, peak_energy)
               VALUES (?1, ?2, ?3, ?4)"#,
            params![trigger, nodes_fired as i64, peak_node, peak_energy],
        )?;
        Ok(())
    }

    /// Most recent activation records, newest first.
    pub fn recent_activations(&self, limit: usize) -> Result<Vec<ActivationRecord>> {
        let mut stmt = self.conn.prepare(
            r#"SELECT "trigger", nodes_fired, peak_node, peak_energy, timestamp
               FROM activation_log ORDER BY id DESC LIMIT ?1"#,
        )?;
        let rows = stmt
            .query_map(params![limit as i64], |row| {
                Ok(ActivationRecord {
                    trigger: row.get(0)?,
                    nodes_fired: row.get::<_, i64>(1)?.max(0) as usize,
                    peak_node: row.get(2)?,
                    peak_energy: row.get(3)?,
                    timestamp: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn row_to_node(row: &Row<'_>) -> rusqlite::Result<Node> {
    let node_type: String = row.get(2)?;
    Ok(Node {
        id: NodeId(row.get(0)?),
        label: row.get(1)?,
        node_type: node_type.parse().unwrap_or_default(),
        energy: row.get(3)?,
        resting: row.get(4)?,
        fire_count: row.get::<_, i64>(5)?.max(0) as u64,
    })
}

fn row_to_synapse(row: &Row<'_>) -> rusqlite::Result<Synapse> {
    let syn_type: String = row.get(4)?;
    Ok(Synapse {
        id: SynapseId(row.get(0)?),
        src_id: NodeId(row.get(1)?),
        dst_id: NodeId(row.get(2)?),
        weight: row.get(3)?,
        syn_type: SynapseType::from_db(&syn_type),
        fire_count: row.get::<_, i64>(5)?.max(0) as u64,
        last_fired: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use neurograph_core::params::INITIAL_SYNAPSE_WEIGHT;

    fn store() -> GraphStore {
        GraphStore::open_in_memory().unwrap()
    }

    #[test]
    fn create_in_memory() {
        let store = store();
        assert_eq!(store.node_count().unwrap(), 0);
        assert_eq!(store.synapse_count().unwrap(), 0);
        assert!(store.path().is_none());
        assert!(store.reopen(DEFAULT_BUSY_TIMEOUT).is_none());
    }

    #[test]
    fn get_or_create_is_case_insensitive() {
        let store = store();
        let a = store.get_or_create_node("Dog", NodeType::Concept).unwrap();
        let b = store.get_or_create_node("  dog ", NodeType::Concept).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.label, "dog");
        assert_eq!(store.node_count().unwrap(), 1);
    }

    #[test]
    fn existing_node_keeps_its_type() {
        let store = store();
        store.get_or_create_node("hello there", NodeType::Response).unwrap();
        let again = store.get_or_create_node("hello there", NodeType::Concept).unwrap();
        assert_eq!(again.node_type, NodeType::Response);
    }

    #[test]
    fn empty_label_is_rejected() {
        let store = store();
        let err = store.get_or_create_node("   ", NodeType::Concept).unwrap_err();
        assert!(err.is_validation());
        assert!(store.get_node("").unwrap().is_none());
    }

    #[test]
    fn lookup_miss_is_not_an_error() {
        let store = store();
        assert!(store.get_node("unicorn").unwrap().is_none());
        assert!(store.strongest_connections("unicorn", 5).unwrap().is_empty());
    }

    #[test]
    fn connect_twice_adds_one_increment() {
        let store = store();
        let first = store
            .connect("a", "b", INITIAL_SYNAPSE_WEIGHT, SynapseType::Association)
            .unwrap();
        assert!((first.weight - INITIAL_SYNAPSE_WEIGHT).abs() < 1e-12);
        assert_eq!(first.fire_count, 0);

        let second = store
            .connect("a", "b", INITIAL_SYNAPSE_WEIGHT, SynapseType::Association)
            .unwrap();
        let expected = (INITIAL_SYNAPSE_WEIGHT + HEBBIAN_INCREMENT).min(HEBBIAN_MAX_WEIGHT);
        assert!((second.weight - expected).abs() < 1e-12);
        assert_eq!(second.id, first.id);
        assert_eq!(second.fire_count, 1);
        assert!(second.last_fired.is_some());
        assert_eq!(store.synapse_count().unwrap(), 1);
    }

    #[test]
    fn connect_self_loop_is_rejected() {
        let store = store();
        let err = store
            .connect("Cat", "cat ", 0.1, SynapseType::Association)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.synapse_count().unwrap(), 0);
    }

    #[test]
    fn weights_stay_capped() {
        let store = store();
        for _ in 0..50 {
            store.connect("x", "y", 0.1, SynapseType::Association).unwrap();
        }
        let x = store.get_node("x").unwrap().unwrap();
        let y = store.get_node("y").unwrap().unwrap();
        let syn = store.get_synapse(x.id, y.id).unwrap().unwrap();
        assert!((syn.weight - HEBBIAN_MAX_WEIGHT).abs() < 1e-12);

        let w = store.increment_weight(x.id, y.id, 5.0, 3.0).unwrap().unwrap();
        assert_eq!(w, 1.0);
        let w = store.increment_weight(x.id, y.id, -7.0, 1.0).unwrap().unwrap();
        assert_eq!(w, 0.0);
        assert!(store.increment_weight(y.id, x.id, 0.1, 1.0).unwrap().is_none());
    }

    #[test]
    fn outgoing_is_sorted_by_weight() {
        let store = store();
        store.connect("hub", "weak", 0.1, SynapseType::Association).unwrap();
        store.connect("hub", "strong", 0.8, SynapseType::Association).unwrap();
        store.connect("hub", "faint", 0.01, SynapseType::Association).unwrap();
        let hub = store.get_node("hub").unwrap().unwrap();

        let edges = store.outgoing(hub.id, 0.02).unwrap();
        let labels: Vec<_> = edges.iter().map(|e| e.dst_label.as_str()).collect();
        assert_eq!(labels, vec!["strong", "weak"]);

        let strongest = store.strongest_connections("HUB", 2).unwrap();
        assert_eq!(strongest[0].0, "strong");
        assert_eq!(strongest.len(), 2);
    }

    #[test]
    fn stats_report_density_and_most_fired() {
        let store = store();
        store.connect("a", "b", 0.2, SynapseType::Association).unwrap();
        store.connect("b", "a", 0.4, SynapseType::Association).unwrap();
        let b = store.get_node("b").unwrap().unwrap();
        store.fire_node(b.id, 1.0).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.total_nodes, 2);
        assert_eq!(stats.total_synapses, 2);
        assert!((stats.avg_synapse_weight - 0.3).abs() < 1e-12);
        assert_eq!(stats.most_fired_node.as_deref(), Some("b"));
        assert_eq!(stats.most_fired_count, 1);
        assert!((stats.density - 1.0).abs() < 1e-12);
    }

    #[test]
    fn energy_updates_are_clamped() {
        let store = store();
        let n = store.get_or_create_node("spark", NodeType::Concept).unwrap();
        store.set_energy(n.id, 3.5).unwrap();
        assert_eq!(store.get_node_by_id(n.id).unwrap().unwrap().energy, 1.0);
        store.set_resting(n.id, -1.0).unwrap();
        store.reset_energies().unwrap();
        assert_eq!(store.get_node("spark").unwrap().unwrap().energy, 0.0);
    }

    #[test]
    fn activation_log_is_append_only() {
        let store = store();
        store.log_activation("dog", 3, Some("dog"), 1.0).unwrap();
        store.log_activation("cat", 0, None, 0.0).unwrap();
        let log = store.recent_activations(10).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].trigger, "cat");
        assert_eq!(log[1].peak_node.as_deref(), Some("dog"));
    }

    #[test]
    fn file_store_is_shared_between_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("brain.db");
        let a = GraphStore::open(&path).unwrap();
        a.connect("sun", "light", 0.5, SynapseType::Association).unwrap();

        let b = a.reopen(DEFAULT_BUSY_TIMEOUT).unwrap().unwrap();
        assert_eq!(b.synapse_count().unwrap(), 1);
        assert_eq!(b.path(), Some(path.as_path()));
    }
}
