//! Directory key resolution against a real filesystem

use texpipe_store::{ArxivId, DataDir, StageName, denormalize, normalize};

#[test]
fn every_stage_accepts_old_style_ids() {
    let dir = tempfile::TempDir::new().unwrap();
    let data = DataDir::new(dir.path());
    let ids = [
        ArxivId::new("hep-th/9901001"),
        ArxivId::new("1601.00978"),
        ArxivId::new("cond-mat/0502001v3"),
    ];

    for stage in StageName::ALL {
        for id in &ids {
            std::fs::create_dir_all(data.stage_dir(stage, id)).unwrap();
        }
        let mut expected = ids.to_vec();
        expected.sort();
        assert_eq!(data.list_arxiv_ids(stage).unwrap(), expected, "{stage}");
    }
}

#[test]
fn normalized_names_hold_no_separator() {
    for id in ["hep-th/9901001", "a/b/c/d", "plain"] {
        let name = normalize(id);
        assert!(!name.contains('/'), "{name}");
        assert_eq!(denormalize(&name), id);
    }
}
