//! Directory discovery and parallel extraction

use crate::cli::parallel::{ExtractionConfig, ParallelExtractor};
use crate::error::ExtractError;
use crate::matchers::MatcherConfig;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn extractor(threads: usize) -> ParallelExtractor {
    let matchers = MatcherConfig::from_toml_str(
        r#"
[components]
tags = ["Box"]

[functions]
names = ["css"]
"#,
    )
    .unwrap()
    .compile()
    .unwrap();
    ParallelExtractor::new(ExtractionConfig { num_threads: threads }, matchers)
}

#[test]
fn test_discover_files_filters_and_sorts() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();
    fs::write(dir.path().join("b.tsx"), "").unwrap();
    fs::write(dir.path().join("a.ts"), "").unwrap();
    fs::write(dir.path().join("nested/c.jsx"), "").unwrap();
    fs::write(dir.path().join("styles.css"), "").unwrap();
    fs::write(dir.path().join("README.md"), "").unwrap();

    let files = extractor(1).discover_files(dir.path());
    let names: Vec<String> = files
        .iter()
        .map(|f| f.strip_prefix(dir.path()).unwrap().display().to_string())
        .collect();
    assert_eq!(names, vec!["a.ts", "b.tsx", "nested/c.jsx"]);
}

#[test]
fn test_extract_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("button.tsx");
    fs::write(&path, r#"export const b = <Box color="red" />;"#).unwrap();

    let extraction = extractor(1).extract_file(&path).unwrap();
    assert_eq!(extraction.path, path.display().to_string());
    assert_eq!(extraction.result.get("Box").unwrap().queries.len(), 1);
}

#[test]
fn test_extract_file_rejects_unsupported_extension() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("styles.css");
    fs::write(&path, "a { color: red; }").unwrap();

    let err = extractor(1).extract_file(&path).unwrap_err();
    assert!(matches!(err, ExtractError::UnsupportedExtension(_)));
}

#[test]
fn test_extract_directory_keeps_files_independent() {
    let dir = tempdir().unwrap();
    for i in 0..8 {
        fs::write(
            dir.path().join(format!("file{i}.tsx")),
            format!(r#"const a = <Box size={{{i}}} />; css({{ index: {i} }});"#),
        )
        .unwrap();
    }

    let extractions = extractor(4).extract_directory(dir.path()).unwrap();
    assert_eq!(extractions.len(), 8);

    for (i, extraction) in extractions.iter().enumerate() {
        assert!(extraction.path.ends_with(&format!("file{i}.tsx")));
        let box_entry = extraction.result.get("Box").unwrap();
        assert_eq!(box_entry.queries.len(), 1);
        assert_eq!(box_entry.props.get("size").len(), 1);
        assert_eq!(extraction.result.get("css").unwrap().props.get("index").len(), 1);
    }
}
