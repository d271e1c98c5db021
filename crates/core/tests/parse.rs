use gistly_core::bundle::{parse_files, FileRecord};
use gistly_core::error::EmbedError;
use std::collections::HashMap;

fn file_block(name: &str, data_html: &str) -> String {
    format!(
        r#"<div class="gist-file">
  <div class="gist-data">{data}</div>
  <div class="gist-meta">
    <a href="https://gist.github.com/raw/abc123/{name}">view raw</a>
    <a href="https://gist.github.com/user/abc123#file-{name}">
      {name}
    </a>
  </div>
</div>"#,
        data = data_html,
        name = name,
    )
}

fn parse(blocks: &[String]) -> HashMap<String, FileRecord> {
    parse_files(&blocks.join("\n")).expect("fixture should parse")
}

#[test]
fn one_record_per_file_keyed_by_trimmed_name() {
    let files = parse(&[
        file_block("a.txt", "alpha"),
        file_block("b.txt", "bravo"),
        file_block("c.md", "<p>charlie</p>"),
    ]);

    assert_eq!(files.len(), 3);
    for name in ["a.txt", "b.txt", "c.md"] {
        let record = files.get(name).unwrap_or_else(|| panic!("missing {}", name));
        // Link text in the fixture is padded with whitespace; keys and names
        // must come out trimmed.
        assert_eq!(record.name, name);
    }
    assert_eq!(files["a.txt"].code.trim(), "alpha");
    assert!(!files["a.txt"].is_raw_html);
}

#[test]
fn plain_files_extract_text_not_markup() {
    let files = parse(&[file_block("main.rs", "<pre>fn main() {}</pre>")]);
    let record = &files["main.rs"];
    assert!(!record.is_raw_html);
    assert_eq!(record.code.trim(), "fn main() {}");
    assert!(!record.code.contains("<pre>"));
}

#[test]
fn entry_content_wrapper_marks_raw_html_and_keeps_markup() {
    let files = parse(&[file_block(
        "page.html",
        r#"<div class="entry-content"><h1>Hello</h1><p>world</p></div>"#,
    )]);
    let record = &files["page.html"];
    assert!(record.is_raw_html);
    assert!(record.code.contains("entry-content"));
    assert!(record.code.contains("<h1>Hello</h1>"));
}

#[test]
fn records_carry_the_three_subtrees() {
    let files = parse(&[file_block("a.txt", "alpha")]);
    let record = &files["a.txt"];
    assert!(record.file_node.has_class("gist-file"));
    assert!(record.data_node.has_class("gist-data"));
    assert!(record.meta_node.has_class("gist-meta"));
}

#[test]
fn duplicate_names_keep_the_last_occurrence() {
    let files = parse(&[file_block("dup.txt", "first"), file_block("dup.txt", "second")]);
    assert_eq!(files.len(), 1);
    assert_eq!(files["dup.txt"].code.trim(), "second");
}

#[test]
fn empty_fragment_yields_no_records() {
    let files = parse_files("<div>no gist blocks here</div>").unwrap();
    assert!(files.is_empty());
}

#[test]
fn missing_meta_region_is_a_structural_mismatch() {
    let err = parse_files(
        r#"<div class="gist-file"><div class="gist-data">alpha</div></div>"#,
    )
    .unwrap_err();
    assert_eq!(err, EmbedError::StructuralMismatch { region: "gist-meta" });
}

#[test]
fn missing_data_region_is_a_structural_mismatch() {
    let err = parse_files(
        r##"<div class="gist-file">
             <div class="gist-meta"><a href="#file-a-txt">a.txt</a></div>
           </div>"##,
    )
    .unwrap_err();
    assert_eq!(err, EmbedError::StructuralMismatch { region: "gist-data" });
}

#[test]
fn meta_without_a_file_link_is_a_structural_mismatch() {
    let err = parse_files(
        r#"<div class="gist-file">
             <div class="gist-data">alpha</div>
             <div class="gist-meta"><a href="https://example.com/raw">view raw</a></div>
           </div>"#,
    )
    .unwrap_err();
    assert_eq!(
        err,
        EmbedError::StructuralMismatch { region: "file name link" }
    );
}
