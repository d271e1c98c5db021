use gistly_core::dom::build::ElementBuilder;
use gistly_core::dom::{parse_fragment, parse_html, NodeType};
use pretty_assertions::assert_eq;

#[test]
fn fragment_parse_reroots_body_children() {
    let fragment = parse_fragment("<p>one</p><p>two</p>");
    assert_eq!(fragment.node_type, NodeType::Document);
    let paragraphs = fragment.find_all(&|n| n.tag == "p");
    assert_eq!(paragraphs.len(), 2);
}

#[test]
fn document_parse_keeps_head_and_body() {
    let doc = parse_html("<html><head><title>t</title></head><body><p>hi</p></body></html>");
    assert!(doc.find_first(&|n| n.tag == "head").is_some());
    assert!(doc.find_first(&|n| n.tag == "body").is_some());
}

#[test]
fn raw_text_preserves_code_line_structure() {
    let fragment = parse_fragment("<div><div>line one</div><div>line two</div></div>");
    let raw = fragment.children[0].raw_text();
    assert_eq!(raw.trim_end(), "line one\nline two");
}

#[test]
fn text_content_normalizes_whitespace() {
    let fragment = parse_fragment("<p>  hello\n   <em> world </em>  </p>");
    assert_eq!(fragment.children[0].text_content(), "hello world");
}

#[test]
fn script_text_is_preserved_not_dropped() {
    // Embed markers and code blocks carry their payload as text, so the
    // parser must not discard script/style content.
    let fragment = parse_fragment("<div><script>var x = 1;</script></div>");
    let script = fragment.find_first(&|n| n.tag == "script").unwrap();
    assert_eq!(script.raw_text(), "var x = 1;");
}

#[test]
fn serialization_escapes_text_and_attributes() {
    let node = ElementBuilder::new("div")
        .attr("title", r#"a "quoted" <value>"#)
        .text("1 < 2 & 3 > 2")
        .build();
    assert_eq!(
        node.to_html(),
        r#"<div title="a &quot;quoted&quot; &lt;value>">1 &lt; 2 &amp; 3 &gt; 2</div>"#
    );
}

#[test]
fn serialization_handles_void_and_raw_text_elements() {
    let link = ElementBuilder::new("link")
        .attr("rel", "stylesheet")
        .attr("href", "https://example.com/a.css")
        .build();
    assert_eq!(
        link.to_html(),
        r#"<link href="https://example.com/a.css" rel="stylesheet">"#
    );

    let style = ElementBuilder::new("style").text("a > b { color: red }").build();
    assert_eq!(style.to_html(), "<style>a > b { color: red }</style>");
}

#[test]
fn roundtrip_through_parse_and_serialize_is_stable() {
    let html = r#"<div class="gist"><em>hi</em> there</div>"#;
    let once = parse_fragment(html).to_html();
    let twice = parse_fragment(&once).to_html();
    assert_eq!(once, twice);
}

#[test]
fn builder_sets_attributes_classes_and_style_map() {
    let node = ElementBuilder::new("div")
        .class("gist")
        .attr("data-x", "1")
        .style(&[("border-bottom", "none"), ("padding", "4px")])
        .build();
    assert!(node.has_class("gist"));
    assert_eq!(node.get_attr("data-x"), Some("1"));
    assert_eq!(
        node.get_attr("style"),
        Some("border-bottom: none; padding: 4px")
    );
}

#[test]
fn builder_markup_parses_children() {
    let node = ElementBuilder::new("div").markup("<em>a</em><span>b</span>").build();
    assert_eq!(node.children.len(), 2);
    assert_eq!(node.children[0].tag, "em");
    assert_eq!(node.children[1].tag, "span");
}

#[test]
fn class_matching_is_token_based() {
    let fragment = parse_fragment(r#"<div class="gist-file special"></div>"#);
    let node = &fragment.children[0];
    assert!(node.has_class("gist-file"));
    assert!(node.has_class("special"));
    assert!(!node.has_class("gist"));
}
