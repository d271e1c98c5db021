use gistly_core::dom::build::ElementBuilder;
use gistly_core::dom::place::{place_node, Placement};
use gistly_core::dom::{parse_fragment, DomNode};
use pretty_assertions::assert_eq;

fn host() -> DomNode {
    parse_fragment(r#"<div id="host"><em id="ph">x</em><span>tail</span></div>"#)
}

fn new_node() -> DomNode {
    ElementBuilder::new("strong").text("new").build()
}

fn is_placeholder(n: &DomNode) -> bool {
    n.get_attr("id") == Some("ph")
}

#[test]
fn before_is_the_default() {
    let mut root = host();
    assert!(place_node(&mut root, &is_placeholder, new_node(), Placement::default()));
    assert_eq!(
        root.to_html(),
        r#"<div id="host"><strong>new</strong><em id="ph">x</em><span>tail</span></div>"#
    );
}

#[test]
fn after_inserts_as_next_sibling() {
    let mut root = host();
    assert!(place_node(&mut root, &is_placeholder, new_node(), Placement::After));
    assert_eq!(
        root.to_html(),
        r#"<div id="host"><em id="ph">x</em><strong>new</strong><span>tail</span></div>"#
    );
}

#[test]
fn replace_removes_the_placeholder() {
    let mut root = host();
    assert!(place_node(&mut root, &is_placeholder, new_node(), Placement::Replace));
    assert_eq!(
        root.to_html(),
        r#"<div id="host"><strong>new</strong><span>tail</span></div>"#
    );
}

#[test]
fn first_and_last_insert_inside_the_placeholder() {
    let mut root = host();
    assert!(place_node(&mut root, &is_placeholder, new_node(), Placement::First));
    assert_eq!(
        root.to_html(),
        r#"<div id="host"><em id="ph"><strong>new</strong>x</em><span>tail</span></div>"#
    );

    let mut root = host();
    assert!(place_node(&mut root, &is_placeholder, new_node(), Placement::Last));
    assert_eq!(
        root.to_html(),
        r#"<div id="host"><em id="ph">x<strong>new</strong></em><span>tail</span></div>"#
    );
}

#[test]
fn fill_replaces_the_placeholder_contents_with_exactly_the_new_node() {
    let mut root = parse_fragment(r#"<div id="ph"><em>a</em><em>b</em>text</div>"#);
    assert!(place_node(&mut root, &is_placeholder, new_node(), Placement::Fill));

    let placeholder = root
        .find_first(&is_placeholder)
        .expect("placeholder survives fill");
    assert_eq!(placeholder.children.len(), 1);
    assert_eq!(placeholder.children[0].to_html(), "<strong>new</strong>");
}

#[test]
fn no_matching_target_leaves_the_tree_unchanged() {
    let mut root = host();
    let before = root.to_html();
    assert!(!place_node(
        &mut root,
        &|n: &DomNode| n.get_attr("id") == Some("absent"),
        new_node(),
        Placement::Replace,
    ));
    assert_eq!(root.to_html(), before);
}

#[test]
fn keywords_parse_case_insensitively_and_unknowns_default_to_before() {
    assert_eq!(Placement::from_keyword("REPLACE"), Placement::Replace);
    assert_eq!(Placement::from_keyword("Fill"), Placement::Fill);
    assert_eq!(Placement::from_keyword("after"), Placement::After);
    assert_eq!(Placement::from_keyword("bogus"), Placement::Before);
    assert_eq!(Placement::from_keyword(""), Placement::Before);
}
