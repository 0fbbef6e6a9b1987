//! Loads the csv tables into a SQLite database.

use std::path::Path;

use log::info;
use osmrel::config::{NODE_FIELDS, TAG_FIELDS, WAY_FIELDS, WAY_NODE_FIELDS};
use rusqlite::{params_from_iter, Connection, Transaction};

use crate::sink::{NODES_PATH, NODE_TAGS_PATH, WAYS_PATH, WAY_NODES_PATH, WAY_TAGS_PATH};

type Error = Box<dyn std::error::Error>;

const SCHEMA: &str = "
CREATE TABLE node (
    id INTEGER PRIMARY KEY,
    lat REAL,
    lon REAL,
    user TEXT,
    uid INTEGER,
    version TEXT,
    changeset INTEGER,
    timestamp TEXT
);
CREATE TABLE node_tags (
    id INTEGER REFERENCES node (id),
    key TEXT,
    value TEXT,
    type TEXT
);
CREATE TABLE way (
    id INTEGER PRIMARY KEY,
    user TEXT,
    uid INTEGER,
    version TEXT,
    changeset INTEGER,
    timestamp TEXT
);
CREATE TABLE way_nodes (
    id INTEGER REFERENCES way (id),
    node_id INTEGER,
    position INTEGER
);
CREATE TABLE way_tags (
    id INTEGER REFERENCES way (id),
    key TEXT,
    value TEXT,
    type TEXT
);
";

/// Tables in load order: (table, csv file, columns).
const TABLES: [(&str, &str, &[&str]); 5] = [
    ("node", NODES_PATH, &NODE_FIELDS),
    ("node_tags", NODE_TAGS_PATH, &TAG_FIELDS),
    ("way", WAYS_PATH, &WAY_FIELDS),
    ("way_nodes", WAY_NODES_PATH, &WAY_NODE_FIELDS),
    ("way_tags", WAY_TAGS_PATH, &TAG_FIELDS),
];

/// Creates the schema in a new database at `db_path` and loads the five csv
/// tables from `csv_dir` into it.
///
/// Empty csv fields are stored as `NULL`. Fails if the tables already exist.
/// Returns the number of rows loaded per table.
pub fn load(csv_dir: &Path, db_path: &Path) -> Result<Vec<(&'static str, usize)>, Error> {
    let mut conn = Connection::open(db_path)?;
    conn.execute_batch(SCHEMA)?;
    info!("Created schema in: {}", db_path.display());

    let tx = conn.transaction()?;
    let mut counts = Vec::with_capacity(TABLES.len());
    for &(table, file, columns) in TABLES.iter() {
        let rows = load_table(&tx, &csv_dir.join(file), table, columns)?;
        info!("Loaded {} rows into {}", rows, table);
        counts.push((table, rows));
    }
    tx.commit()?;
    Ok(counts)
}

fn load_table(
    tx: &Transaction,
    path: &Path,
    table: &str,
    columns: &[&str],
) -> Result<usize, Error> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?;
    if headers.iter().ne(columns.iter().copied()) {
        return Err(format!("unexpected header in {}: {:?}", path.display(), headers).into());
    }

    let placeholders = vec!["?"; columns.len()].join(", ");
    let mut stmt = tx.prepare(&format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders
    ))?;

    let mut rows = 0;
    for record in reader.records() {
        let record = record?;
        let values = record.iter().map(|field| match field {
            "" => None,
            field => Some(field),
        });
        stmt.execute(params_from_iter(values))?;
        rows += 1;
    }
    Ok(rows)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_tables(dir: &Path) {
        fs::write(
            dir.join(NODES_PATH),
            "id,lat,lon,user,uid,version,changeset,timestamp\n\
             100000001,41.3851,2.1734,jdoe,12345,2,1234567,2016-03-01T12:34:56Z\n",
        )
        .unwrap();
        fs::write(
            dir.join(NODE_TAGS_PATH),
            "id,key,value,type\n100000001,postcode,,addr\n100000001,name,Bar,regular\n",
        )
        .unwrap();
        fs::write(
            dir.join(WAYS_PATH),
            "id,user,uid,version,changeset,timestamp\n",
        )
        .unwrap();
        fs::write(dir.join(WAY_NODES_PATH), "id,node_id,position\n").unwrap();
        fs::write(dir.join(WAY_TAGS_PATH), "id,key,value,type\n").unwrap();
    }

    #[test]
    fn test_load_tables() {
        let dir = tempdir().unwrap();
        write_tables(dir.path());
        let db_path = dir.path().join("osm.db");

        let counts = load(dir.path(), &db_path).unwrap();
        assert_eq!(
            counts,
            vec![
                ("node", 1),
                ("node_tags", 2),
                ("way", 0),
                ("way_nodes", 0),
                ("way_tags", 0)
            ]
        );

        let conn = Connection::open(&db_path).unwrap();
        let (id, lat): (i64, f64) = conn
            .query_row("SELECT id, lat FROM node", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(id, 100000001);
        assert!((lat - 41.3851).abs() < 1e-9);

        let postcode: Option<String> = conn
            .query_row(
                "SELECT value FROM node_tags WHERE key = 'postcode'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(postcode, None);
    }

    #[test]
    fn test_existing_schema_is_rejected() {
        let dir = tempdir().unwrap();
        write_tables(dir.path());
        let db_path = dir.path().join("osm.db");
        load(dir.path(), &db_path).unwrap();
        assert!(load(dir.path(), &db_path).is_err());
    }

    #[test]
    fn test_unexpected_header() {
        let dir = tempdir().unwrap();
        write_tables(dir.path());
        fs::write(dir.path().join(WAYS_PATH), "id,user\n").unwrap();
        let err = load(dir.path(), &dir.path().join("osm.db")).unwrap_err();
        assert!(err.to_string().contains("unexpected header"), "{}", err);
    }
}
