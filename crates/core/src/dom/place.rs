//! Node placement relative to a placeholder.

use super::DomNode;

/// Where a new node lands relative to the placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placement {
    /// Insert as the placeholder's previous sibling.
    #[default]
    Before,
    /// Insert as the placeholder's next sibling.
    After,
    /// Insert in the placeholder's position and remove the placeholder.
    Replace,
    /// Insert as the placeholder's first child.
    First,
    /// Insert as the placeholder's last child.
    Last,
    /// Clear the placeholder's children, then insert as its only child.
    Fill,
}

impl Placement {
    /// Parse a placement keyword, case-insensitively. Unknown keywords fall
    /// back to `Before`, matching the declarative surface's behavior.
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword.to_ascii_lowercase().as_str() {
            "after" => Self::After,
            "replace" => Self::Replace,
            "first" => Self::First,
            "last" => Self::Last,
            "fill" => Self::Fill,
            _ => Self::Before,
        }
    }
}

/// Insert `new_node` relative to the first node (document order) matching
/// `is_target`. Returns false when no node matches; the tree is then
/// unchanged.
pub fn place_node(
    root: &mut DomNode,
    is_target: &dyn Fn(&DomNode) -> bool,
    new_node: DomNode,
    placement: Placement,
) -> bool {
    let mut slot = Some(new_node);
    place_in_children(root, is_target, &mut slot, placement)
}

fn place_in_children(
    parent: &mut DomNode,
    is_target: &dyn Fn(&DomNode) -> bool,
    slot: &mut Option<DomNode>,
    placement: Placement,
) -> bool {
    let mut i = 0;
    while i < parent.children.len() {
        if is_target(&parent.children[i]) {
            let node = match slot.take() {
                Some(node) => node,
                None => return true,
            };
            match placement {
                Placement::Before => parent.children.insert(i, node),
                Placement::After => parent.children.insert(i + 1, node),
                Placement::Replace => parent.children[i] = node,
                Placement::First => parent.children[i].children.insert(0, node),
                Placement::Last => parent.children[i].children.push(node),
                Placement::Fill => {
                    let target = &mut parent.children[i];
                    target.children.clear();
                    target.children.push(node);
                }
            }
            return true;
        }
        if place_in_children(&mut parent.children[i], is_target, slot, placement) {
            return true;
        }
        i += 1;
    }
    false
}
