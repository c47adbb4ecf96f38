//! End-to-end tests over the checked-in markdown fixtures.
//!
//! Integration tests run with the package root as the current directory, so
//! the fixture globs below resolve the same way for `from_files` and for an
//! explicitly rooted `LocalFiles`.

use std::path::PathBuf;

use mdtokens::{
    filter::parse_filter_json, FileResult, FilterSpec, LocalFiles, MarkdownLexer, Token,
    TokenizeError, Tokenizer,
};

const SAMPLE: &str = "tests/fixtures/sample-markdown.md";
const SAMPLE_2: &str = "tests/fixtures/sample-markdown-2.md";
const WITHOUT_CODE: &str = "tests/fixtures/sample-markdown-without-codeblocks.md";

fn manifest_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn rooted() -> Tokenizer<LocalFiles, MarkdownLexer> {
    Tokenizer::new(LocalFiles::new(manifest_dir()), MarkdownLexer::default())
}

fn code(lang: &str, text: &str) -> Token {
    Token::Code {
        lang: Some(lang.to_string()),
        text: text.to_string(),
    }
}

fn sample_tokens() -> Vec<Token> {
    vec![
        Token::Heading {
            depth: 1,
            text: "This is a markdown file".to_string(),
        },
        code(
            "html",
            &[
                "<!doctype html>",
                "<html>",
                "  <head>",
                "    <title>It has an HTML code block</title>",
                "  </head>",
                "</html>",
            ]
            .join("\n"),
        ),
        code("js", "console.log( 'it also has a \"js\" codeblock' );"),
        code(
            "javascript",
            &[
                "// Not to be left out in the cold, it also has",
                "var aCodeBlock = 'of language \"javascript\"';",
            ]
            .join("\n"),
        ),
        Token::Paragraph {
            text: "As you can see by the above, Markdown is a pretty useful thing.".to_string(),
        },
    ]
}

fn only_tokens(results: Vec<FileResult>) -> Vec<Token> {
    assert_eq!(results.len(), 1);
    results.into_iter().next().map(|r| r.tokens).unwrap_or_default()
}

// ============================================================================
// from_files
// ============================================================================

#[test]
fn test_from_files_reports_file_and_tokens() {
    let results = mdtokens::from_files([SAMPLE], None).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file, SAMPLE);
    assert_eq!(results[0].tokens.len(), 5);
}

#[test]
fn test_from_files_tokenizes_sample_exactly() {
    let tokens = only_tokens(mdtokens::from_files([SAMPLE], None).unwrap());
    assert_eq!(tokens, sample_tokens());

    // Every serialized attribute of every token is accounted for.
    let attributes: usize = tokens
        .iter()
        .map(|t| match serde_json::to_value(t).unwrap() {
            serde_json::Value::Object(members) => members.len(),
            other => panic!("token serialized as {:?}", other),
        })
        .sum();
    assert_eq!(attributes, 14);
}

#[test]
fn test_from_files_accepts_single_pattern_or_list() {
    let single = mdtokens::from_files(SAMPLE, None).unwrap();
    assert_eq!(single, mdtokens::from_files([SAMPLE], None).unwrap());
    assert_eq!(
        single,
        mdtokens::from_files(vec![SAMPLE.to_string()], None).unwrap()
    );
}

#[test]
fn test_from_files_expands_recursive_glob_in_sorted_order() {
    let results = rooted()
        .tokenize_files(["tests/fixtures/**/*.md"], None)
        .unwrap();
    let files: Vec<&str> = results.iter().map(|r| r.file.as_str()).collect();
    assert_eq!(files, vec![SAMPLE_2, WITHOUT_CODE, SAMPLE]);
}

#[test]
fn test_from_files_filter_by_one_property() {
    let spec = FilterSpec::new().with("type", "code");
    let tokens = only_tokens(mdtokens::from_files([SAMPLE], Some(&spec)).unwrap());
    assert_eq!(tokens.len(), 3);
    assert!(tokens.iter().all(|t| t.kind() == "code"));
}

#[test]
fn test_from_files_filter_by_two_properties() {
    let spec = FilterSpec::new().with("type", "code").with("lang", "js");
    let tokens = only_tokens(mdtokens::from_files([SAMPLE], Some(&spec)).unwrap());
    assert_eq!(
        tokens,
        vec![code("js", "console.log( 'it also has a \"js\" codeblock' );")]
    );
}

#[test]
fn test_from_files_filter_by_pattern() {
    let spec = FilterSpec::new()
        .with("type", "code")
        .with_pattern("lang", "(js|javascript)")
        .unwrap();
    let tokens = only_tokens(mdtokens::from_files([SAMPLE], Some(&spec)).unwrap());
    let expected = sample_tokens();
    assert_eq!(tokens, vec![expected[2].clone(), expected[3].clone()]);
}

#[test]
fn test_from_files_broad_pattern_still_filters() {
    let spec = FilterSpec::new()
        .with("type", "code")
        .with_pattern("lang", "(js|javascript)")
        .unwrap();
    let tokens = only_tokens(rooted().tokenize_files([SAMPLE_2], Some(&spec)).unwrap());
    assert_eq!(
        tokens,
        vec![code("js", "var Demo = new Backbone.Model.extend({});")]
    );
}

#[test]
fn test_from_files_no_matching_tokens() {
    let spec = FilterSpec::new().with("type", "code");
    let results = mdtokens::from_files([WITHOUT_CODE], Some(&spec)).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].file, WITHOUT_CODE);
    assert!(results[0].tokens.is_empty());
}

#[test]
fn test_from_files_json_filter() {
    let spec = parse_filter_json(r#"{"type": "code", "lang": {"pattern": "^(css|bash)$"}}"#)
        .unwrap();
    let results = rooted()
        .tokenize_files(["tests/fixtures/*.md"], Some(&spec))
        .unwrap();

    let selected: Vec<(&str, Option<serde_json::Value>)> = results
        .iter()
        .flat_map(|r| r.tokens.iter().map(move |t| (r.file.as_str(), t.attr("lang"))))
        .collect();
    assert_eq!(
        selected,
        vec![
            (SAMPLE_2, Some(serde_json::json!("css"))),
            (SAMPLE_2, Some(serde_json::json!("bash"))),
        ]
    );
    assert_eq!(results.len(), 3);
}

#[test]
fn test_from_files_unmatched_glob_is_empty() {
    let results = mdtokens::from_files(["tests/fixtures/*.txt"], None).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_from_files_invalid_glob_errors() {
    let result = mdtokens::from_files(["tests/fixtures/[*.md"], None);
    assert!(matches!(result, Err(TokenizeError::Expand(_))));
}

// ============================================================================
// from_string
// ============================================================================

#[test]
fn test_from_string_matches_from_files() {
    let contents = std::fs::read_to_string(manifest_dir().join(SAMPLE)).unwrap();
    let spec = FilterSpec::new().with("type", "code");
    assert_eq!(
        mdtokens::from_string(&contents, Some(&spec)).unwrap(),
        only_tokens(mdtokens::from_files([SAMPLE], Some(&spec)).unwrap())
    );
}

#[test]
fn test_from_string_without_spec_returns_all_tokens() {
    let tokens = mdtokens::from_string("# Hi\n\ntext\n", None).unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].attr("depth"), Some(serde_json::json!(1)));
}

#[test]
fn test_from_string_filter_on_absent_attribute() {
    let spec = FilterSpec::new().with("lang", "js");
    let tokens = mdtokens::from_string("# Heading\n\nparagraph\n", Some(&spec)).unwrap();
    assert!(tokens.is_empty());
}

#[test]
fn test_file_results_serialize() {
    let spec = FilterSpec::new().with("lang", "js");
    let results = mdtokens::from_files([SAMPLE], Some(&spec)).unwrap();
    let value = serde_json::to_value(&results).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "file": SAMPLE,
            "tokens": [{
                "type": "code",
                "lang": "js",
                "text": "console.log( 'it also has a \"js\" codeblock' );"
            }]
        }])
    );
}
