//! Index of top-level declarations across the files of one analysis.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::FileId;
use crate::syntax::{SyntaxKind, SyntaxNode, decl_name};

/// Top-level declarations by simple name, plus the root of every file.
///
/// Built once per [`Analysis`](crate::ide::Analysis) snapshot. Nodes stay
/// valid for as long as the snapshot lives.
#[derive(Debug, Default, Clone)]
pub struct DeclIndex {
    /// File roots, in insertion order.
    files: IndexMap<FileId, SyntaxNode>,
    /// Simple name -> declarations, in file then source order.
    by_name: FxHashMap<SmolStr, Vec<SyntaxNode>>,
    /// File -> names it contributed (for removal).
    by_file: FxHashMap<FileId, Vec<SmolStr>>,
}

impl DeclIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index the top-level declarations of `root`, replacing any previous
    /// entries of `file`.
    pub fn add_file(&mut self, file: FileId, root: SyntaxNode) {
        self.remove_file(file);

        let mut names = Vec::new();
        for decl in top_level_decls(&root) {
            let Some(name) = decl_name(&decl) else {
                continue;
            };
            self.by_name.entry(name.clone()).or_default().push(decl);
            names.push(name);
        }

        self.by_file.insert(file, names);
        self.files.insert(file, root);
    }

    pub fn remove_file(&mut self, file: FileId) {
        let Some(root) = self.files.shift_remove(&file) else {
            return;
        };
        for name in self.by_file.remove(&file).unwrap_or_default() {
            if let Some(decls) = self.by_name.get_mut(&name) {
                decls.retain(|decl| !is_in_tree(decl, &root));
                if decls.is_empty() {
                    self.by_name.remove(&name);
                }
            }
        }
    }

    /// All top-level declarations named `name`.
    pub fn lookup(&self, name: &str) -> &[SyntaxNode] {
        self.by_name.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first class declaration named `name`.
    pub fn lookup_class(&self, name: &str) -> Option<SyntaxNode> {
        self.lookup(name)
            .iter()
            .find(|decl| decl.kind() == SyntaxKind::CLASS_DECL)
            .cloned()
    }

    pub fn root(&self, file: FileId) -> Option<&SyntaxNode> {
        self.files.get(&file)
    }

    /// The file whose tree contains `node`.
    pub fn file_of(&self, node: &SyntaxNode) -> Option<FileId> {
        self.files
            .iter()
            .find(|(_, root)| is_in_tree(node, root))
            .map(|(&file, _)| file)
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &SyntaxNode)> {
        self.files.iter().map(|(&file, root)| (file, root))
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Declarations visible at the top level of a file: classes, functions,
/// getters and the declarators of top-level variables.
pub fn top_level_decls(root: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    root.children().flat_map(|item| match item.kind() {
        SyntaxKind::TOP_LEVEL_VAR => item
            .children()
            .filter(|child| child.kind() == SyntaxKind::VARIABLE)
            .collect::<Vec<_>>(),
        SyntaxKind::CLASS_DECL | SyntaxKind::FUNCTION_DECL | SyntaxKind::GETTER_DECL => {
            vec![item]
        }
        _ => Vec::new(),
    })
}

/// Members of a class declaration. Field declarations contribute one entry
/// per declarator.
pub fn class_members(class: &SyntaxNode) -> impl Iterator<Item = SyntaxNode> {
    class
        .children()
        .filter(|child| child.kind() == SyntaxKind::CLASS_BODY)
        .flat_map(|body| body.children())
        .flat_map(|member| match member.kind() {
            SyntaxKind::FIELD_DECL => member
                .children()
                .filter(|child| child.kind() == SyntaxKind::VARIABLE)
                .collect::<Vec<_>>(),
            SyntaxKind::METHOD_DECL | SyntaxKind::GETTER_DECL | SyntaxKind::CONSTRUCTOR_DECL => {
                vec![member]
            }
            _ => Vec::new(),
        })
}

/// The first member of `class` named `name`, constructors excluded.
pub fn find_member(class: &SyntaxNode, name: &str) -> Option<SyntaxNode> {
    class_members(class).find(|member| {
        member.kind() != SyntaxKind::CONSTRUCTOR_DECL && decl_name(member).as_deref() == Some(name)
    })
}

fn is_in_tree(node: &SyntaxNode, root: &SyntaxNode) -> bool {
    node.ancestors().last().as_ref() == Some(root)
}
