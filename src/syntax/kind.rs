//! Node and token categories of the syntax tree.

/// The category tag of every token and node in the tree.
///
/// Tokens come first, then nodes. The order is significant only for
/// [`SyntaxKind::is_trivia`] and the raw `u16` conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // trivia
    WHITESPACE = 0,
    COMMENT,

    // literals and names
    IDENT,
    STRING,
    INT_NUMBER,
    FLOAT_NUMBER,

    // keywords
    IMPORT_KW,
    EXPORT_KW,
    LIBRARY_KW,
    PART_KW,
    CLASS_KW,
    ABSTRACT_KW,
    EXTENDS_KW,
    WITH_KW,
    IMPLEMENTS_KW,
    STATIC_KW,
    FINAL_KW,
    CONST_KW,
    VAR_KW,
    LATE_KW,
    NEW_KW,
    RETURN_KW,
    TRUE_KW,
    FALSE_KW,
    NULL_KW,
    THIS_KW,
    SUPER_KW,
    REQUIRED_KW,
    FACTORY_KW,
    ASYNC_KW,
    AWAIT_KW,
    IF_KW,
    ELSE_KW,
    FOR_KW,
    WHILE_KW,
    SWITCH_KW,
    TRY_KW,

    // punctuation
    L_PAREN,
    R_PAREN,
    L_BRACE,
    R_BRACE,
    L_BRACK,
    R_BRACK,
    L_ANGLE,
    R_ANGLE,
    COMMA,
    SEMICOLON,
    DOT,
    DOT2,
    DOT3,
    QUESTION_DOT,
    COLON,
    QUESTION,
    EQ,
    FAT_ARROW,
    AT,
    BANG,
    /// Any other operator (`+`, `==`, `??`, `&&`, ...).
    OPERATOR,
    ERROR_TOKEN,

    // nodes
    SOURCE_FILE,
    IMPORT_DIRECTIVE,
    /// `export`, `library` and `part` directives.
    DIRECTIVE,
    ANNOTATION,
    CLASS_DECL,
    CLASS_BODY,
    FIELD_DECL,
    /// One declarator of a field, top-level or local variable declaration.
    VARIABLE,
    METHOD_DECL,
    GETTER_DECL,
    CONSTRUCTOR_DECL,
    FUNCTION_DECL,
    TOP_LEVEL_VAR,
    PARAM_LIST,
    PARAM,
    TYPE_REF,
    TYPE_ARGS,
    /// The name introduced by a declaration.
    NAME,
    /// An identifier used as a reference.
    NAME_REF,
    /// `=> expr` function body.
    EXPR_BODY,
    BLOCK,
    RETURN_STMT,
    LOCAL_VAR,
    EXPR_STMT,
    /// Control-flow statements the resolvers never look inside.
    OTHER_STMT,
    MEMBER_EXPR,
    CALL_EXPR,
    ARG_LIST,
    NAMED_ARG,
    /// `new T(...)` or `const T(...)` wrapping a call.
    NEW_EXPR,
    CLOSURE,
    PAREN_EXPR,
    INDEX_EXPR,
    PREFIX_EXPR,
    /// `x!`, `x++`, `x--`.
    POSTFIX_EXPR,
    BIN_EXPR,
    STRING_LITERAL,
    LITERAL,
    LIST_LITERAL,
    MAP_LITERAL,
    ERROR,

    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, WHITESPACE | COMMENT)
    }

    /// Expression nodes: the shapes the resolvers match against.
    pub fn is_expr(self) -> bool {
        matches!(
            self,
            NAME_REF
                | MEMBER_EXPR
                | CALL_EXPR
                | NEW_EXPR
                | CLOSURE
                | PAREN_EXPR
                | INDEX_EXPR
                | PREFIX_EXPR
                | POSTFIX_EXPR
                | BIN_EXPR
                | STRING_LITERAL
                | LITERAL
                | LIST_LITERAL
                | MAP_LITERAL
        )
    }

    /// Nodes that introduce a name through a [`NAME`] child.
    pub fn is_declaration(self) -> bool {
        matches!(
            self,
            CLASS_DECL
                | VARIABLE
                | METHOD_DECL
                | GETTER_DECL
                | CONSTRUCTOR_DECL
                | FUNCTION_DECL
                | PARAM
        )
    }

    /// Keyword for an identifier-shaped slice, if it is reserved.
    pub(crate) fn from_keyword(ident: &str) -> Option<SyntaxKind> {
        let kind = match ident {
            "import" => IMPORT_KW,
            "export" => EXPORT_KW,
            "library" => LIBRARY_KW,
            "part" => PART_KW,
            "class" => CLASS_KW,
            "abstract" => ABSTRACT_KW,
            "extends" => EXTENDS_KW,
            "with" => WITH_KW,
            "implements" => IMPLEMENTS_KW,
            "static" => STATIC_KW,
            "final" => FINAL_KW,
            "const" => CONST_KW,
            "var" => VAR_KW,
            "late" => LATE_KW,
            "new" => NEW_KW,
            "return" => RETURN_KW,
            "true" => TRUE_KW,
            "false" => FALSE_KW,
            "null" => NULL_KW,
            "this" => THIS_KW,
            "super" => SUPER_KW,
            "required" => REQUIRED_KW,
            "factory" => FACTORY_KW,
            "async" => ASYNC_KW,
            "await" => AWAIT_KW,
            "if" => IF_KW,
            "else" => ELSE_KW,
            "for" => FOR_KW,
            "while" => WHILE_KW,
            "switch" => SWITCH_KW,
            "try" => TRY_KW,
            _ => return None,
        };
        Some(kind)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// The language tag binding [`SyntaxKind`] to rowan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DartLanguage {}

impl rowan::Language for DartLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: SyntaxKind is repr(u16) and the range was checked above.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<DartLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<DartLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<DartLanguage>;

#[cfg(test)]
mod tests {
    use super::*;
    use rowan::Language;

    #[test]
    fn test_raw_kind_roundtrip() {
        for kind in [WHITESPACE, IDENT, FAT_ARROW, SOURCE_FILE, LIST_LITERAL, ERROR] {
            assert_eq!(DartLanguage::kind_from_raw(DartLanguage::kind_to_raw(kind)), kind);
        }
    }

    #[test]
    fn test_contextual_words_are_not_keywords() {
        assert_eq!(SyntaxKind::from_keyword("return"), Some(RETURN_KW));
        assert_eq!(SyntaxKind::from_keyword("get"), None);
        assert_eq!(SyntaxKind::from_keyword("as"), None);
    }
}
