use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use serde_json::Value as JsonValue;

use super::error::{EngineError, Result};
use super::model::{CellValue, Dataset, PlayerRecord};
use super::schema::Schema;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a player dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row, comma separated (semicolon detected from the header)
/// * `.tsv`  – header row, tab separated
/// * `.json` – `[{ "Joueur": "...", "Ligue": "...", "Buts": 12, ... }, ...]`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let (headers, rows) = match ext.as_str() {
        "csv" => {
            let text = read_source(path)?;
            let delimiter = sniff_delimiter(&text);
            parse_delimited(&text, delimiter)?
        }
        "tsv" => parse_delimited(&read_source(path)?, b'\t')?,
        "json" => parse_json(&read_source(path)?)?,
        other => return Err(EngineError::UnsupportedFormat(other.to_string())),
    };

    let dataset = build_dataset(path, headers, rows)?;
    log::info!(
        "Loaded {} players with {} columns ({} numeric) from {}",
        dataset.len(),
        dataset.schema.columns.len(),
        dataset.schema.numeric.len(),
        path.display()
    );
    Ok(dataset)
}

static CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<Dataset>>>> = OnceLock::new();

/// Like [`load_file`], but each path is read at most once per process.
/// Failed loads are not cached, so a file dropped in later is picked up.
pub fn load_cached(path: &Path) -> Result<Arc<Dataset>> {
    let cache = CACHE.get_or_init(Default::default);

    if let Some(ds) = lock(cache).get(path) {
        log::debug!("Dataset cache hit for {}", path.display());
        return Ok(Arc::clone(ds));
    }

    let loaded = Arc::new(load_file(path)?);
    // Another caller may have raced us here; the first stored copy wins.
    let mut guard = lock(cache);
    let ds = guard.entry(path.to_path_buf()).or_insert(loaded);
    Ok(Arc::clone(ds))
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read the whole file as text.  Anything that is not UTF-8 is taken to be
/// Latin-1, which maps every byte to the code point of the same value.
fn read_source(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| EngineError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            log::warn!("{} is not valid UTF-8, reading it as Latin-1", path.display());
            Ok(e.into_bytes().iter().map(|&b| char::from(b)).collect())
        }
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

/// pandas exports from French locales often use `;`.
fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    let commas = header.matches(',').count();
    let semis = header.matches(';').count();
    if semis > commas {
        b';'
    } else {
        b','
    }
}

fn parse_delimited(text: &str, delimiter: u8) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| EngineError::Malformed {
            row: 0,
            reason: e.to_string(),
        })?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| EngineError::Malformed {
            row: row_no,
            reason: e.to_string(),
        })?;
        rows.push(record.iter().map(|c| c.to_string()).collect());
    }
    Ok((headers, rows))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON (`df.to_json(orient='records')`).  Column order is
/// the key order of the records, first seen first.
fn parse_json(text: &str) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let root: JsonValue = serde_json::from_str(text).map_err(|e| EngineError::Malformed {
        row: 0,
        reason: format!("parsing JSON: {e}"),
    })?;

    let records = root.as_array().ok_or_else(|| EngineError::Malformed {
        row: 0,
        reason: "expected top-level JSON array".into(),
    })?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| EngineError::Malformed {
            row: i,
            reason: "not a JSON object".into(),
        })?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_raw).unwrap_or_default())
                .collect()
        })
        .collect();

    Ok((headers, rows))
}

fn json_to_raw(val: &JsonValue) -> String {
    match val {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Shared: raw cells → Dataset
// ---------------------------------------------------------------------------

fn build_dataset(path: &Path, headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Dataset> {
    let parsed: Vec<Vec<CellValue>> = rows
        .iter()
        .map(|r| r.iter().map(|c| CellValue::parse(c)).collect())
        .collect();

    let schema = Schema::infer(&headers, &parsed);
    schema.validate()?;

    let records = rows
        .iter()
        .zip(&parsed)
        .enumerate()
        .map(|(row_no, (raw, cells))| {
            let mut rec = PlayerRecord::new(row_no);
            for (idx, col) in headers.iter().enumerate() {
                let Some(cell) = cells.get(idx) else {
                    continue;
                };
                if cell.is_null() {
                    continue;
                }
                if schema.is_numeric(col) {
                    if let Some(v) = cell.as_f64() {
                        rec.stats.insert(col.clone(), v);
                    }
                } else {
                    rec.text.insert(col.clone(), raw[idx].trim().to_string());
                }
            }
            rec
        })
        .collect();

    Ok(Dataset::from_records(path.to_path_buf(), schema, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{LEAGUE, MINUTES, PLAYER, POSITION};

    fn write_fixture(name: &str, contents: impl AsRef<[u8]>) -> PathBuf {
        let path = std::env::temp_dir().join(format!("footstats-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    const CSV: &str = "\
Joueur,Equipe,Ligue,Position,Minutes jouees,Buts,Passes decisives
A,PSG,Ligue 1,FW,600,10,2
B,OM,Ligue 1,MF,400,5,
C,Inter,Serie A,,900,7,7
";

    #[test]
    fn loads_csv_and_keeps_missing_cells_absent() {
        let path = write_fixture("basic.csv", CSV);
        let ds = load_file(&path).unwrap();

        assert_eq!(ds.len(), 3);
        assert_eq!(ds.schema.numeric, vec![MINUTES, "Buts", "Passes decisives"]);
        assert_eq!(ds.records[0].player(), Some("A"));
        assert_eq!(ds.records[0].stat("Buts"), Some(10.0));
        assert_eq!(ds.records[1].stat("Passes decisives"), None);
        assert_eq!(ds.records[2].position(), None);
        assert_eq!(ds.distinct(LEAGUE), vec!["Ligue 1", "Serie A"]);
        assert_eq!(ds.records[2].row, 2);
    }

    #[test]
    fn semicolon_csv_is_detected() {
        let path = write_fixture("semi.csv", &CSV.replace(',', ";"));
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[2].league(), Some("Serie A"));
    }

    #[test]
    fn latin1_csv_loads_with_accents_intact() {
        let mut bytes = b"Joueur;Equipe;Ligue;Position;Minutes jou\xe9es;Minutes jouees;Buts\n".to_vec();
        bytes.extend_from_slice(b"M\xfcller;Bayern;Bundesliga;FW;900;900;12\n");
        let path = write_fixture("latin1.csv", bytes);

        let ds = load_file(&path).unwrap();
        assert_eq!(ds.records[0].player(), Some("M\u{fc}ller"));
        assert!(ds.schema.columns.contains(&"Minutes jou\u{e9}es".to_string()));
        assert_eq!(ds.records[0].stat("Buts"), Some(12.0));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_file(Path::new("/definitely/not/here/df_Big2025.csv")).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(Path::new("players.xlsx")).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn ragged_row_is_malformed() {
        let path = write_fixture(
            "ragged.csv",
            "Joueur,Equipe,Ligue,Position,Minutes jouees\nA,PSG,Ligue 1,FW,600,99\n",
        );
        assert!(matches!(load_file(&path), Err(EngineError::Malformed { row: 0, .. })));
    }

    #[test]
    fn file_without_player_column_fails_schema_validation() {
        let path = write_fixture("noplayer.csv", "Nom,Equipe,Ligue,Position,Minutes jouees\nA,PSG,Ligue 1,FW,600\n");
        assert!(matches!(load_file(&path), Err(EngineError::Schema(_))));
    }

    #[test]
    fn loads_json_records_in_key_order() {
        let path = write_fixture(
            "records.json",
            r#"[
                {"Joueur": "A", "Equipe": "PSG", "Ligue": "Ligue 1", "Position": "FW", "Minutes jouees": 600, "Buts": 10},
                {"Joueur": "B", "Equipe": "OM", "Ligue": "Ligue 1", "Position": null, "Minutes jouees": 400, "Buts": 5.5}
            ]"#,
        );
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.schema.identity, vec![PLAYER, "Equipe", LEAGUE, POSITION]);
        assert_eq!(ds.records[1].stat("Buts"), Some(5.5));
        assert_eq!(ds.records[1].position(), None);
    }

    #[test]
    fn cached_load_reads_each_path_once() {
        let path = write_fixture("cached.csv", CSV);
        let first = load_cached(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        let second = load_cached(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let path = std::env::temp_dir().join(format!("footstats-{}-late.csv", std::process::id()));
        let _ = std::fs::remove_file(&path);
        assert!(load_cached(&path).is_err());
        std::fs::write(&path, CSV).unwrap();
        assert_eq!(load_cached(&path).unwrap().len(), 3);
    }
}
