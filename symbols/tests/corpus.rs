use std::fs;

use symbols::{Corpus, IndexError, SolutionsIndex, SymbolIndex};

fn py() -> Vec<String> {
    vec!["py".to_string()]
}

#[test]
fn loads_matching_files_in_sorted_order() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("arrays/two_sum")).unwrap();
    fs::write(root.join("arrays/two_sum/solution.py"), "def two_sum(nums, target):\n    pass\n").unwrap();
    fs::write(root.join("arrays/notes.txt"), "not code").unwrap();
    fs::write(root.join("util.py"), "def helper():\n    pass\n").unwrap();
    fs::write(root.join("a.py"), "class A:\n    pass\n").unwrap();

    let corpus = Corpus::load(root, &py()).unwrap();
    let paths: Vec<&str> = corpus.files().iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["a.py", "arrays/two_sum/solution.py", "util.py"]);

    let index = SymbolIndex::build(&corpus);
    assert_eq!(index.len(), 3);
    assert_eq!(index.get("two_sum").unwrap().file, "arrays/two_sum/solution.py");

    let solutions = SolutionsIndex::build(&corpus);
    assert_eq!(solutions.len(), 1);
    assert!(
        solutions
            .get("arrays/two_sum/solution.py")
            .unwrap()
            .starts_with("def two_sum")
    );
    assert!(solutions.get("util.py").is_none());
}

#[test]
fn missing_root_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let err = Corpus::load(&dir.path().join("absent"), &py()).unwrap_err();
    assert!(matches!(err, IndexError::NotADirectory(_)));
    assert!(err.to_string().contains("not a directory"));
}

#[test]
fn non_utf8_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bad.py"), [0x66, 0x6f, 0xff, 0xfe]).unwrap();
    let err = Corpus::load(dir.path(), &py()).unwrap_err();
    assert!(matches!(err, IndexError::InvalidUtf8(ref p) if p.ends_with("bad.py")));
}

#[test]
fn solutions_serialize_as_plain_map() {
    let mut solutions = SolutionsIndex::new();
    solutions.insert("g/i/f.py", "x = 1\n");
    let json = serde_json::to_value(&solutions).unwrap();
    assert_eq!(json["g/i/f.py"], "x = 1\n");
}
