//! Document links: clickable image references.

use std::borrow::Cow;
use std::path::PathBuf;

use rowan::WalkEvent;

use super::context::ResolveCtx;
use super::image::resolve_image_ref;
use crate::base::{LineIndex, TextRange};
use crate::syntax::{SyntaxKind, SyntaxNode};

/// A document link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLink {
    pub range: TextRange,
    /// The span of the link in the source file.
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    /// The asset file the reference names.
    pub target: PathBuf,
    /// Tooltip text for the link.
    pub tooltip: Cow<'static, str>,
}

/// Get document links for a file.
///
/// Returns one link per resource chain (`R.image.logo`) whose asset exists.
pub fn document_links(cx: &ResolveCtx<'_>, root: &SyntaxNode, lines: &LineIndex) -> Vec<DocumentLink> {
    let mut links = Vec::new();
    if !cx.project.is_recognized() {
        return links;
    }

    let mut walk = root.preorder();
    while let Some(event) = walk.next() {
        let WalkEvent::Enter(node) = event else {
            continue;
        };
        if node.kind() != SyntaxKind::MEMBER_EXPR {
            continue;
        }
        let Some(target) = resolve_image_ref(cx, &node) else {
            continue;
        };

        let range = node.text_range();
        let start = lines.line_col(range.start());
        let end = lines.line_col(range.end());
        let tooltip = match target.strip_prefix(cx.project.root()) {
            Ok(relative) => Cow::Owned(format!("Open {}", relative.display())),
            Err(_) => Cow::Owned(format!("Open {}", target.display())),
        };
        links.push(DocumentLink {
            range,
            start_line: start.line,
            start_col: start.col,
            end_line: end.line,
            end_col: end.col,
            target,
            tooltip,
        });
        walk.skip_subtree();
    }

    links
}
