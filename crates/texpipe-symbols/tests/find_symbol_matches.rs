use std::fs;

use tempfile::TempDir;
use texpipe_core::{BatchCommand, ProgressContext, read_csv, run_batch};
use texpipe_store::{ArxivId, DataDir, StageName};
use texpipe_symbols::command::RESULTS_FILE;
use texpipe_symbols::{FindSymbolMatches, SymbolMatch};

const X_I: &str = "<msub><mi>x</mi><mi>i</mi></msub>";
const X_J: &str = "<msub><mi>x</mi><mi>j</mi></msub>";

fn write_symbols(data: &DataDir, id: &ArxivId, rows: &[(&str, usize, usize, &str)]) {
    let dir = data.stage_dir(StageName::DetectedEquationTokens, id);
    fs::create_dir_all(&dir).unwrap();
    let content: String = rows
        .iter()
        .map(|(tex, eq, sym, mathml)| format!("{tex},{eq},{sym},\"{mathml}\"\n"))
        .collect();
    fs::write(dir.join("symbols.csv"), content).unwrap();
}

fn read_matches(data: &DataDir, id: &ArxivId) -> Vec<SymbolMatch> {
    read_csv(&data.stage_dir(StageName::SymbolMatches, id).join(RESULTS_FILE)).unwrap()
}

#[test]
fn two_symbols_match_each_other_only() {
    let tmp = TempDir::new().unwrap();
    let data = DataDir::new(tmp.path());
    let id = ArxivId::new("1601.00978");
    write_symbols(
        &data,
        &id,
        &[
            ("main.tex", 0, 0, X_I),
            ("main.tex", 1, 0, X_J),
            ("main.tex", 2, 0, X_I),
        ],
    );

    let cmd = FindSymbolMatches::new(data.clone());
    let summary = run_batch(&cmd, &[id.clone()], &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.items, 1);
    assert_eq!(summary.results, 2);
    assert!(summary.is_success());

    let matches = read_matches(&data, &id);
    assert_eq!(
        matches,
        vec![
            SymbolMatch {
                queried_mathml: X_I.into(),
                matching_mathml: X_J.into(),
                rank: 1,
            },
            SymbolMatch {
                queried_mathml: X_J.into(),
                matching_mathml: X_I.into(),
                rank: 1,
            },
        ]
    );
    assert!(matches.iter().all(|m| m.queried_mathml != m.matching_mathml));
}

#[test]
fn paper_without_symbols_yields_no_item() {
    let tmp = TempDir::new().unwrap();
    let data = DataDir::new(tmp.path());
    let id = ArxivId::new("hep-th/9901001");

    let stale = data.stage_dir(StageName::SymbolMatches, &id);
    fs::create_dir_all(&stale).unwrap();
    fs::write(stale.join(RESULTS_FILE), "old\n").unwrap();

    let cmd = FindSymbolMatches::new(data);
    let ids = [id];
    assert_eq!(cmd.load(&ids).count(), 0);
    assert!(!stale.exists());
}

#[test]
fn rerun_does_not_duplicate_matches() {
    let tmp = TempDir::new().unwrap();
    let data = DataDir::new(tmp.path());
    let id = ArxivId::new("1601.00978");
    write_symbols(&data, &id, &[("a.tex", 0, 0, X_I), ("a.tex", 0, 1, X_J)]);

    let cmd = FindSymbolMatches::new(data.clone());
    for _ in 0..2 {
        run_batch(&cmd, &[id.clone()], &ProgressContext::hidden()).unwrap();
    }
    assert_eq!(read_matches(&data, &id).len(), 2);
}

#[test]
fn symbols_without_matches_write_nothing() {
    let tmp = TempDir::new().unwrap();
    let data = DataDir::new(tmp.path());
    let id = ArxivId::new("1601.00978");
    write_symbols(
        &data,
        &id,
        &[("main.tex", 0, 0, X_I), ("main.tex", 1, 0, "<mi>y</mi>")],
    );

    let cmd = FindSymbolMatches::new(data.clone());
    let summary = run_batch(&cmd, &[id.clone()], &ProgressContext::hidden()).unwrap();
    assert_eq!(summary.items, 1);
    assert_eq!(summary.results, 0);
    assert!(
        !data
            .stage_dir(StageName::SymbolMatches, &id)
            .join(RESULTS_FILE)
            .exists()
    );
}
