//! Lossless tokenizer built on logos.

use logos::Logos;

use super::SyntaxKind;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[regex(r#"r?'([^'\\\n]|\\.)*'"#)]
    #[regex(r#"r?"([^"\\\n]|\\.)*""#)]
    #[regex(r"r?'''([^']|'[^']|''[^'])*'''")]
    #[regex(r#"r?"""([^"]|"[^"]|""[^"])*""""#)]
    String,

    #[regex(r"[0-9]+")]
    #[regex(r"0[xX][0-9a-fA-F]+")]
    Int,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("..")]
    #[token("?..")]
    Dot2,
    #[token("...")]
    #[token("...?")]
    Dot3,
    #[token("?.")]
    QuestionDot,
    #[token(":")]
    Colon,
    #[token("?")]
    Question,
    #[token("=")]
    Eq,
    #[token("=>")]
    FatArrow,
    #[token("@")]
    At,
    #[token("!")]
    Bang,

    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("&&")]
    #[token("||")]
    #[token("??")]
    #[token("??=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("++")]
    #[token("--")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("~/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("~")]
    #[token("<<")]
    #[token("#")]
    Operator,
}

/// A token with its kind and source slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
}

/// Split `text` into tokens. Concatenating every token's text yields `text`.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut lexer = RawToken::lexer(text);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        let kind = match result {
            Ok(raw) => classify(raw, slice),
            Err(()) => SyntaxKind::ERROR_TOKEN,
        };
        tokens.push(Token { kind, text: slice });
    }

    tokens
}

fn classify(raw: RawToken, slice: &str) -> SyntaxKind {
    use SyntaxKind::*;
    match raw {
        RawToken::Whitespace => WHITESPACE,
        RawToken::Comment => COMMENT,
        RawToken::Ident => SyntaxKind::from_keyword(slice).unwrap_or(IDENT),
        RawToken::String => STRING,
        RawToken::Int => INT_NUMBER,
        RawToken::Float => FLOAT_NUMBER,
        RawToken::LParen => L_PAREN,
        RawToken::RParen => R_PAREN,
        RawToken::LBrace => L_BRACE,
        RawToken::RBrace => R_BRACE,
        RawToken::LBrack => L_BRACK,
        RawToken::RBrack => R_BRACK,
        RawToken::LAngle => L_ANGLE,
        RawToken::RAngle => R_ANGLE,
        RawToken::Comma => COMMA,
        RawToken::Semicolon => SEMICOLON,
        RawToken::Dot => DOT,
        RawToken::Dot2 => DOT2,
        RawToken::Dot3 => DOT3,
        RawToken::QuestionDot => QUESTION_DOT,
        RawToken::Colon => COLON,
        RawToken::Question => QUESTION,
        RawToken::Eq => EQ,
        RawToken::FatArrow => FAT_ARROW,
        RawToken::At => AT,
        RawToken::Bang => BANG,
        RawToken::Operator => OPERATOR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SyntaxKind::*;

    fn kinds(text: &str) -> Vec<SyntaxKind> {
        tokenize(text)
            .into_iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_tokens_are_lossless() {
        let source = "class A { // c\n  String get x => 'a$b'; }";
        let joined: String = tokenize(source).iter().map(|t| t.text).collect();
        assert_eq!(joined, source);
    }

    #[test]
    fn test_keywords_and_contextual_words() {
        assert_eq!(
            kinds("static String get logo => r'x';"),
            vec![STATIC_KW, IDENT, IDENT, IDENT, FAT_ARROW, STRING, SEMICOLON]
        );
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(kinds(r#"'a' "b" '''c''' r'd'"#), vec![STRING, STRING, STRING, STRING]);
    }

    #[test]
    fn test_generic_close_is_not_shift() {
        assert_eq!(
            kinds("List<List<int>>"),
            vec![IDENT, L_ANGLE, IDENT, L_ANGLE, IDENT, R_ANGLE, R_ANGLE]
        );
    }

    #[test]
    fn test_unknown_character_becomes_error_token() {
        assert_eq!(kinds("a \u{00A7} b"), vec![IDENT, ERROR_TOKEN, IDENT]);
    }
}
