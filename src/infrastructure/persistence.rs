use crate::domain::HistoryEntry;
use std::fs;

pub struct FileRepository;

impl FileRepository {
    pub fn save_history(history: &[HistoryEntry], filename: &str) -> Result<String, String> {
        match serde_json::to_string_pretty(history) {
            Ok(json) => {
                match fs::write(filename, &json) {
                    Ok(_) => Ok(filename.to_string()),
                    Err(e) => Err(e.to_string()),
                }
            }
            Err(e) => Err(format!("Serialization failed: {}", e)),
        }
    }

    pub fn load_history(filename: &str) -> Result<(Vec<HistoryEntry>, String), String> {
        match fs::read_to_string(filename) {
            Ok(content) => {
                match serde_json::from_str::<Vec<HistoryEntry>>(&content) {
                    Ok(history) => Ok((history, filename.to_string())),
                    Err(e) => Err(format!("Invalid file format - {}", e)),
                }
            }
            Err(e) => Err(e.to_string()),
        }
    }
}

pub struct HistoryCsvExporter;

impl HistoryCsvExporter {
    /// Writes the history as a two-column CSV (expression, result) with
    /// a header row. Entries are written oldest first so the file reads
    /// top to bottom in calculation order.
    pub fn export(history: &[HistoryEntry], filename: &str) -> Result<String, String> {
        let mut writer = csv::Writer::from_path(filename).map_err(|e| e.to_string())?;

        writer
            .write_record(["expression", "result"])
            .map_err(|e| e.to_string())?;

        for entry in history.iter().rev() {
            writer
                .write_record([entry.expression.as_str(), entry.result.as_str()])
                .map_err(|e| e.to_string())?;
        }

        writer.flush().map_err(|e| e.to_string())?;
        Ok(filename.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_history() -> Vec<HistoryEntry> {
        vec![
            HistoryEntry {
                expression: "sin(90)".to_string(),
                result: "1".to_string(),
            },
            HistoryEntry {
                expression: "2+3".to_string(),
                result: "5".to_string(),
            },
        ]
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let path = path.to_str().unwrap();

        let history = sample_history();
        let saved = FileRepository::save_history(&history, path).unwrap();
        assert_eq!(saved, path);

        let (loaded, filename) = FileRepository::load_history(path).unwrap();
        assert_eq!(filename, path);
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].expression, "sin(90)");
        assert_eq!(loaded[1].result, "5");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert!(FileRepository::load_history(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_load_invalid_format_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not valid json").unwrap();

        let error = FileRepository::load_history(path.to_str().unwrap()).unwrap_err();
        assert!(error.contains("Invalid file format"));
    }

    #[test]
    fn test_csv_export() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.csv");
        let path = path.to_str().unwrap();

        HistoryCsvExporter::export(&sample_history(), path).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "expression,result");
        // Oldest entry first.
        assert_eq!(lines[1], "2+3,5");
        assert_eq!(lines[2], "sin(90),1");
    }
}
