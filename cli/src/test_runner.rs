//! Runner for `.test.md` files: TOML front matter between `---` lines,
//! followed by the markdown document to render.

use std::collections::BTreeMap;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use transform::{Options, Pipeline};

use crate::config::Config;

#[derive(Debug, Deserialize)]
pub struct ExpectedWarning {
    /// Substring that must appear in the warning message.
    pub contains: String,

    /// If set, the warning's span must start on this 1-based source line.
    #[serde(default)]
    pub line: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TestConfig {
    /// Human-readable test description.
    pub description: Option<String>,

    /// Corpus directory, relative to the test file.
    pub corpus: Option<String>,

    /// Remove leading docstrings from resolved code.
    pub strip_docstrings: bool,

    /// Expected rendered document (trimmed comparison).
    pub expect_output: Option<String>,

    /// Substrings the rendered document must contain.
    pub expect_contains: Vec<String>,

    /// Expected warnings, in order. If present (even empty), the count is
    /// checked too.
    pub expect_warnings: Option<Vec<ExpectedWarning>>,
}

/// A parser or pipeline warning, reduced to what expectations look at.
struct Reported {
    message: String,
    span: Range<usize>,
}

/// Split a `.test.md` file into its config and markdown source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}');

    let after_open = content
        .strip_prefix("---")
        .ok_or("missing opening --- front matter delimiter")?;
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close = after_open
        .find("\n---")
        .ok_or("missing closing --- front matter delimiter")?;

    let toml_str = after_open[..close].trim_end_matches('\r');
    let rest = &after_open[close + 4..];
    let source = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;
    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn label(&self) -> &str {
        self.description.as_deref().unwrap_or_else(|| {
            self.path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("?")
        })
    }
}

fn run_single_test(path: &Path, config: &Config) -> TestResult {
    let (description, outcome) = match evaluate(path, config) {
        Ok((description, None)) => (description, TestOutcome::Pass),
        Ok((description, Some(reason))) => (description, TestOutcome::Fail(reason)),
        Err(reason) => (None, TestOutcome::Fail(reason)),
    };
    TestResult {
        path: path.to_path_buf(),
        description,
        outcome,
    }
}

/// Render one test document and compare it with its expectations. The
/// inner `Option` is the failure reason, if any.
fn evaluate(path: &Path, config: &Config) -> Result<(Option<String>, Option<String>), String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("cannot read file: {}", e))?;
    let (test, source) =
        parse_test_file(&content).map_err(|e| format!("front matter error: {}", e))?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let corpus = test.corpus.as_ref().map(|c| dir.join(c));
    let (symbols, solutions) = crate::load_indexes(corpus.as_deref(), &config.source_extensions)
        .map_err(|e| format!("corpus error: {}", e))?;

    let options = Options {
        project_root: dir.to_path_buf(),
        strip_docstrings: test.strip_docstrings || config.pipeline.strip_docstrings,
        ..config.pipeline.clone()
    };
    let pipeline =
        Pipeline::new(&symbols, &solutions, options).map_err(|e| format!("pipeline error: {}", e))?;

    let (document, parse_warnings) = codedoc::Parser::new(source.to_string(), 0).parse();
    let transformed = pipeline.run(document, source);
    let rendered = transformed.document.to_string();

    let warnings: Vec<Reported> = parse_warnings
        .iter()
        .map(|w| Reported {
            message: w.message.clone(),
            span: w.span.clone(),
        })
        .chain(transformed.warnings.iter().map(|w| Reported {
            message: w.message(),
            span: w.span.clone(),
        }))
        .collect();

    let failure = check_output(&rendered, &test)
        .or_else(|| {
            test.expect_warnings
                .as_ref()
                .and_then(|expected| check_warnings(source, &warnings, expected))
        });
    Ok((test.description, failure))
}

fn check_output(rendered: &str, test: &TestConfig) -> Option<String> {
    if let Some(expected) = &test.expect_output {
        let (expected, actual) = (expected.trim(), rendered.trim());
        if expected != actual {
            return Some(format!(
                "output mismatch\n  expected:\n{}\n  actual:\n{}",
                indent(expected),
                indent(actual)
            ));
        }
    }
    test.expect_contains
        .iter()
        .find(|needle| !rendered.contains(needle.as_str()))
        .map(|needle| {
            format!(
                "output does not contain \"{}\"\n  actual:\n{}",
                needle,
                indent(rendered.trim())
            )
        })
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {}", l))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Convert a byte offset in `source` to a 1-based line number.
fn byte_offset_to_line(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}

/// Returns `Some(reason)` when the warnings differ from the expectations.
fn check_warnings(source: &str, actual: &[Reported], expected: &[ExpectedWarning]) -> Option<String> {
    if actual.len() != expected.len() {
        let listed = if actual.is_empty() {
            "    (none)".to_string()
        } else {
            actual
                .iter()
                .map(|w| format!("  - {}", w.message))
                .collect::<Vec<_>>()
                .join("\n")
        };
        return Some(format!(
            "expected {} warning(s), got {}\n  actual warnings:\n{}",
            expected.len(),
            actual.len(),
            listed
        ));
    }

    for (i, (actual, expected)) in actual.iter().zip(expected).enumerate() {
        if !actual.message.contains(&expected.contains) {
            return Some(format!(
                "warning[{}]: expected message containing \"{}\", got: {}",
                i, expected.contains, actual.message
            ));
        }
        if let Some(expected_line) = expected.line {
            let actual_line = byte_offset_to_line(source, actual.span.start);
            if actual_line != expected_line {
                return Some(format!(
                    "warning[{}]: expected on line {}, but span is on line {}",
                    i, expected_line, actual_line
                ));
            }
        }
    }
    None
}

/// `.test.md` files grouped by their folder relative to `root`; files in
/// `root` itself get the empty category. Sorted by category, then path.
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
            continue;
        }
        let is_test = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(".test.md"));
        if is_test {
            let category = path
                .parent()
                .and_then(|p| p.strip_prefix(root).ok())
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_default();
            out.entry(category).or_default().push(path);
        }
    }
}

fn category_label(category: &str) -> &str {
    if category.is_empty() { "(root)" } else { category }
}

pub fn list_categories(path: &Path) {
    if path.is_file() {
        eprintln!("(single file, no categories)");
        return;
    }

    let categories = discover_categorized(path);
    if categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return;
    }

    eprintln!("available categories:");
    for (category, files) in &categories {
        eprintln!("  {} ({} tests)", category_label(category), files.len());
    }
}

fn paint(text: &str, code: &str, no_color: bool) -> String {
    if no_color {
        text.to_string()
    } else {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    }
}

/// Keep the categories named in `requested` (and their subfolders); all of
/// them when `requested` is empty.
fn select<'a>(
    all: &'a BTreeMap<String, Vec<PathBuf>>,
    requested: &[String],
) -> BTreeMap<&'a str, &'a [PathBuf]> {
    if requested.is_empty() {
        return all.iter().map(|(k, v)| (k.as_str(), v.as_slice())).collect();
    }
    let mut selected = BTreeMap::new();
    for req in requested {
        let req = req.trim_matches('/');
        let before = selected.len();
        for (category, files) in all {
            if category == req || category.starts_with(&format!("{}/", req)) {
                selected.insert(category.as_str(), files.as_slice());
            }
        }
        if selected.len() == before {
            let available: Vec<&str> = all.keys().map(|k| category_label(k)).collect();
            eprintln!(
                "warning: category '{}' not found (available: {})",
                req,
                available.join(", ")
            );
        }
    }
    selected
}

/// Run all `.test.md` files under `path` (or a single file). Returns the
/// process exit code: 0 when everything passes.
pub fn run_tests(path: &Path, no_color: bool, categories: &[String], config: &Config) -> i32 {
    let all = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        discover_categorized(path)
    };
    if all.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return 1;
    }

    let selected = if path.is_file() {
        select(&all, &[])
    } else {
        select(&all, categories)
    };
    if selected.is_empty() {
        eprintln!("no matching categories found");
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (category, files) in &selected {
        if !path.is_file() {
            eprintln!();
            eprintln!("{}", paint(category_label(category), "1", no_color));
        }
        for file in *files {
            let result = run_single_test(file, config);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", paint("PASS", "32", no_color), result.label());
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", paint("FAIL", "31", no_color), result.label());
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for failure in &failures {
            eprintln!();
            eprintln!("  --- {} ---", failure.path.display());
            if let TestOutcome::Fail(reason) = &failure.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    if failures.is_empty() {
        eprintln!(
            "test result: {}. {} passed, 0 failed",
            paint("ok", "32", no_color),
            passed
        );
        0
    } else {
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            paint("FAILED", "31", no_color),
            passed,
            failures.len(),
            passed + failures.len()
        );
        1
    }
}
