//! Error-tolerant recursive-descent parser producing a rowan green tree.
//!
//! The grammar covers the declarations and expressions cross-reference
//! resolution walks: directives, classes and their members, top-level
//! functions and variables, statements down to `return`, and the usual
//! expression forms. Everything else is wrapped in `ERROR` or `OTHER_STMT`
//! nodes so the tree always spans the whole input.

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};
use text_size::TextSize;

use super::SyntaxKind::{self, *};
use super::lexer::{Token, tokenize};
use super::{ParseError, SyntaxNode};

/// End-of-input sentinel returned by lookahead.
const EOF: SyntaxKind = SyntaxKind::__LAST;

/// The result of parsing one file.
#[derive(Debug, Clone)]
pub struct Parse {
    green: GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// A fresh red tree rooted at the `SOURCE_FILE` node.
    pub fn syntax_node(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
}

/// Parse a source file.
pub fn parse(text: &str) -> Parse {
    let mut parser = Parser::new(text);
    parser.source_file();
    let errors = parser.errors;
    Parse {
        green: parser.builder.finish(),
        errors,
    }
}

struct Parser<'t> {
    tokens: Vec<Token<'t>>,
    offsets: Vec<TextSize>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'t> Parser<'t> {
    fn new(text: &'t str) -> Self {
        let tokens = tokenize(text);
        let mut offsets = Vec::with_capacity(tokens.len() + 1);
        let mut offset = TextSize::from(0);
        for token in &tokens {
            offsets.push(offset);
            offset += TextSize::of(token.text);
        }
        offsets.push(offset);
        Self {
            tokens,
            offsets,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // token cursor
    // ------------------------------------------------------------------

    /// Raw index of the `n`-th significant token from the cursor.
    fn nth_index(&self, n: usize) -> Option<usize> {
        self.tokens[self.pos..]
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .nth(n)
            .map(|(i, _)| self.pos + i)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n).map_or(EOF, |i| self.tokens[i].kind)
    }

    fn nth_text(&self, n: usize) -> &'t str {
        self.nth_index(n).map_or("", |i| self.tokens[i].text)
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_contextual(&self, n: usize, word: &str) -> bool {
        self.nth(n) == IDENT && self.nth_text(n) == word
    }

    fn at_eof(&self) -> bool {
        self.at(EOF)
    }

    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn bump(&mut self) {
        self.eat_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) {
        if !self.eat(kind) {
            self.error(format!("expected {kind:?}"));
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        let offset = self.nth_index(0).map_or_else(
            || self.offsets[self.tokens.len()],
            |i| self.offsets[i],
        );
        self.errors.push(ParseError {
            message: message.into(),
            offset,
        });
    }

    fn start(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    fn start_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    /// Consume one token, or a whole bracketed group when at an opener.
    fn bump_balanced(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.current() {
                EOF => return,
                L_PAREN | L_BRACK | L_BRACE => depth += 1,
                R_PAREN | R_BRACK | R_BRACE => depth = depth.saturating_sub(1),
                _ => {}
            }
            self.bump();
            if depth == 0 {
                return;
            }
        }
    }

    fn error_and_bump(&mut self, message: &str) {
        self.error(message);
        self.start(ERROR);
        self.bump_balanced();
        self.finish();
    }

    /// Run `f`, consuming one token as an error when it made no progress.
    fn progressing(&mut self, message: &str, f: impl FnOnce(&mut Self)) {
        let before = self.pos;
        f(self);
        if self.pos == before && !self.at_eof() {
            self.error_and_bump(message);
        }
    }

    // ------------------------------------------------------------------
    // lookahead over types
    // ------------------------------------------------------------------

    /// Index past a bracketed group starting at lookahead `n`.
    fn skip_group_la(&self, n: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut k = n;
        loop {
            match self.nth(k) {
                EOF => return None,
                L_PAREN | L_BRACK | L_BRACE => depth += 1,
                R_PAREN | R_BRACK | R_BRACE => {
                    depth = depth.checked_sub(1)?;
                }
                _ => {}
            }
            k += 1;
            if depth == 0 {
                return Some(k);
            }
        }
    }

    /// Index past `<...>` type arguments starting at lookahead `n`.
    fn skip_type_args_la(&self, n: usize) -> Option<usize> {
        if self.nth(n) != L_ANGLE {
            return None;
        }
        let mut depth = 0usize;
        let mut k = n;
        loop {
            match self.nth(k) {
                L_ANGLE => depth += 1,
                R_ANGLE => depth = depth.checked_sub(1)?,
                IDENT | COMMA | DOT | QUESTION => {}
                _ => return None,
            }
            k += 1;
            if depth == 0 {
                return Some(k);
            }
        }
    }

    /// Index past a type starting at lookahead `n`.
    fn skip_type_la(&self, n: usize) -> Option<usize> {
        if self.nth(n) != IDENT {
            return None;
        }
        let mut k = n + 1;
        while self.nth(k) == DOT && self.nth(k + 1) == IDENT {
            k += 2;
        }
        if self.nth(k) == L_ANGLE {
            k = self.skip_type_args_la(k)?;
        }
        if self.nth(k) == IDENT && self.nth_text(k) == "Function" && self.nth(k + 1) == L_PAREN {
            k = self.skip_group_la(k + 1)?;
        } else if self.nth_text(n) == "Function" && self.nth(n + 1) == L_PAREN {
            k = self.skip_group_la(n + 1)?;
        }
        if self.nth(k) == QUESTION {
            k += 1;
        }
        Some(k)
    }

    /// When a type followed by a name starts at lookahead `n`, the index of the name.
    fn typed_name_la(&self, n: usize) -> Option<usize> {
        let k = self.skip_type_la(n)?;
        (self.nth(k) == IDENT).then_some(k)
    }

    // ------------------------------------------------------------------
    // items
    // ------------------------------------------------------------------

    fn source_file(&mut self) {
        self.builder.start_node(SOURCE_FILE.into());
        while !self.at_eof() {
            self.progressing("expected a declaration", |p| p.item());
        }
        self.eat_trivia();
        self.builder.finish_node();
    }

    fn item(&mut self) {
        match self.current() {
            IMPORT_KW => self.import_directive(),
            EXPORT_KW | LIBRARY_KW | PART_KW => self.directive(),
            AT => self.annotation(),
            ABSTRACT_KW | CLASS_KW => self.class_decl(),
            IDENT if matches!(self.nth_text(0), "enum" | "extension" | "mixin" | "typedef") => {
                self.unsupported_item()
            }
            _ => self.declaration(None),
        }
    }

    fn import_directive(&mut self) {
        self.start(IMPORT_DIRECTIVE);
        self.bump();
        if self.at(STRING) {
            self.start(STRING_LITERAL);
            self.bump();
            self.finish();
        } else {
            self.error("expected an import uri");
        }
        while !matches!(self.current(), SEMICOLON | EOF | IMPORT_KW) {
            self.bump();
        }
        self.expect(SEMICOLON);
        self.finish();
    }

    fn directive(&mut self) {
        self.start(DIRECTIVE);
        while !matches!(self.current(), SEMICOLON | EOF) {
            self.bump();
        }
        self.expect(SEMICOLON);
        self.finish();
    }

    fn annotation(&mut self) {
        self.start(ANNOTATION);
        self.bump();
        if self.at(IDENT) {
            self.bump();
        }
        while self.at(DOT) && self.nth(1) == IDENT {
            self.bump();
            self.bump();
        }
        if self.at(L_PAREN) {
            self.arg_list();
        }
        self.finish();
    }

    fn unsupported_item(&mut self) {
        self.start(ERROR);
        while !matches!(self.current(), SEMICOLON | L_BRACE | EOF) {
            self.bump_balanced();
        }
        self.bump_balanced();
        self.finish();
    }

    fn class_decl(&mut self) {
        self.start(CLASS_DECL);
        self.eat(ABSTRACT_KW);
        self.expect(CLASS_KW);
        let class_name = (self.at(IDENT)).then(|| self.nth_text(0));
        self.name();
        if self.at(L_ANGLE) {
            self.type_args();
        }
        while matches!(self.current(), EXTENDS_KW | WITH_KW | IMPLEMENTS_KW | COMMA) {
            self.bump();
            if self.at(IDENT) {
                self.type_ref();
            }
        }
        if self.at(L_BRACE) {
            self.start(CLASS_BODY);
            self.bump();
            while !matches!(self.current(), R_BRACE | EOF) {
                self.progressing("expected a class member", |p| p.member(class_name));
            }
            self.expect(R_BRACE);
            self.finish();
        } else {
            self.error("expected a class body");
        }
        self.finish();
    }

    fn member(&mut self, class_name: Option<&str>) {
        match self.current() {
            AT => self.annotation(),
            SEMICOLON => self.bump(),
            _ => self.declaration(class_name),
        }
    }

    /// A member (inside `class_name`) or a top-level declaration.
    fn declaration(&mut self, class_name: Option<&str>) {
        let checkpoint = self.checkpoint();
        while matches!(
            self.current(),
            STATIC_KW | FINAL_KW | CONST_KW | VAR_KW | LATE_KW | FACTORY_KW | ABSTRACT_KW
        ) || self.at_contextual(0, "external")
            || self.at_contextual(0, "covariant")
        {
            self.bump();
        }

        let (function, variables) = match class_name {
            Some(_) => (METHOD_DECL, FIELD_DECL),
            None => (FUNCTION_DECL, TOP_LEVEL_VAR),
        };

        if self.at(IDENT) && class_name == Some(self.nth_text(0)) && self.at_constructor_name() {
            self.start_at(checkpoint, CONSTRUCTOR_DECL);
            self.constructor_rest();
            self.finish();
            return;
        }

        if self.at_contextual(0, "get") && self.nth(1) == IDENT {
            self.start_at(checkpoint, GETTER_DECL);
            self.bump();
            self.name();
            self.function_body(false);
            self.finish();
            return;
        }

        if self.at_contextual(0, "set") && self.nth(1) == IDENT {
            self.start_at(checkpoint, function);
            self.bump();
            self.function_rest();
            self.finish();
            return;
        }

        if let Some(name_at) = self.typed_name_la(0) {
            let word = self.nth_text(name_at);
            let after = self.nth(name_at + 1);
            if (word == "get" || word == "set") && after == IDENT {
                let kind = if word == "get" { GETTER_DECL } else { function };
                self.start_at(checkpoint, kind);
                self.type_ref();
                self.bump();
                if kind == GETTER_DECL {
                    self.name();
                    self.function_body(false);
                } else {
                    self.function_rest();
                }
                self.finish();
            } else if word == "operator" {
                self.start_at(checkpoint, ERROR);
                self.error("operator declarations are not supported");
                while !matches!(self.current(), SEMICOLON | L_BRACE | FAT_ARROW | EOF) {
                    self.bump_balanced();
                }
                self.function_body(false);
                self.finish();
            } else if matches!(after, L_PAREN | L_ANGLE) {
                self.start_at(checkpoint, function);
                self.type_ref();
                self.function_rest();
                self.finish();
            } else {
                self.start_at(checkpoint, variables);
                self.type_ref();
                self.variables();
                self.expect(SEMICOLON);
                self.finish();
            }
            return;
        }

        if self.at(IDENT) && self.nth(1) == L_PAREN {
            self.start_at(checkpoint, function);
            self.function_rest();
            self.finish();
            return;
        }

        if self.at(IDENT) {
            self.start_at(checkpoint, variables);
            self.variables();
            self.expect(SEMICOLON);
            self.finish();
            return;
        }

        self.start_at(checkpoint, ERROR);
        self.error("expected a declaration");
        if !matches!(self.current(), R_BRACE | EOF) {
            self.bump_balanced();
        }
        self.finish();
    }

    fn at_constructor_name(&self) -> bool {
        self.nth(1) == L_PAREN || (self.nth(1) == DOT && self.nth(2) == IDENT && self.nth(3) == L_PAREN)
    }

    fn constructor_rest(&mut self) {
        self.start(NAME);
        self.bump();
        if self.at(DOT) {
            self.bump();
            self.bump();
        }
        self.finish();
        self.param_list();
        if self.eat(COLON) {
            while !matches!(self.current(), L_BRACE | SEMICOLON | FAT_ARROW | EOF) {
                self.bump_balanced();
            }
        }
        self.function_body(false);
    }

    /// `name <T>? (params) body`
    fn function_rest(&mut self) {
        self.name();
        if self.at(L_ANGLE) {
            self.type_args();
        }
        self.param_list();
        self.function_body(false);
    }

    fn name(&mut self) {
        if self.at(IDENT) {
            self.start(NAME);
            self.bump();
            self.finish();
        } else {
            self.error("expected a name");
        }
    }

    fn name_ref(&mut self) {
        self.start(NAME_REF);
        self.bump();
        self.finish();
    }

    fn variables(&mut self) {
        loop {
            self.start(VARIABLE);
            self.name();
            if self.eat(EQ) {
                self.expr();
            }
            self.finish();
            if !self.eat(COMMA) {
                break;
            }
        }
    }

    fn type_ref(&mut self) {
        self.start(TYPE_REF);
        let bare_function = self.at_contextual(0, "Function");
        self.bump();
        while self.at(DOT) && self.nth(1) == IDENT {
            self.bump();
            self.bump();
        }
        if self.at(L_ANGLE) {
            self.type_args();
        }
        if self.at_contextual(0, "Function") && self.nth(1) == L_PAREN {
            self.bump();
            self.bump_balanced();
        } else if bare_function && self.at(L_PAREN) {
            self.bump_balanced();
        }
        self.eat(QUESTION);
        self.finish();
    }

    fn type_args(&mut self) {
        self.start(TYPE_ARGS);
        self.bump();
        while self.at(IDENT) {
            self.type_ref();
            if !self.eat(COMMA) {
                break;
            }
        }
        self.expect(R_ANGLE);
        self.finish();
    }

    fn param_list(&mut self) {
        self.start(PARAM_LIST);
        self.expect(L_PAREN);
        loop {
            match self.current() {
                R_PAREN | EOF => break,
                L_BRACE | R_BRACE | L_BRACK | R_BRACK | COMMA | REQUIRED_KW => self.bump(),
                AT => self.annotation(),
                IDENT | THIS_KW | SUPER_KW | FINAL_KW | CONST_KW | VAR_KW => self.param(),
                _ => self.error_and_bump("expected a parameter"),
            }
        }
        self.expect(R_PAREN);
        self.finish();
    }

    fn param(&mut self) {
        self.start(PARAM);
        while matches!(self.current(), FINAL_KW | CONST_KW | VAR_KW) || self.at_contextual(0, "covariant") {
            self.bump();
        }
        if matches!(self.current(), THIS_KW | SUPER_KW) {
            self.bump();
            self.expect(DOT);
            self.name();
        } else {
            if self.typed_name_la(0).is_some() {
                self.type_ref();
            }
            self.name();
        }
        if self.at(L_PAREN) {
            self.bump_balanced();
        }
        if self.eat(EQ) || self.eat(COLON) {
            self.expr();
        }
        self.finish();
    }

    fn function_body(&mut self, in_expression: bool) {
        if self.eat(ASYNC_KW) || self.at_contextual(0, "sync") {
            if self.at_contextual(0, "sync") {
                self.bump();
            }
            if self.at(OPERATOR) && self.nth_text(0) == "*" {
                self.bump();
            }
        }
        match self.current() {
            FAT_ARROW => {
                self.start(EXPR_BODY);
                self.bump();
                self.expr();
                if !in_expression {
                    self.expect(SEMICOLON);
                }
                self.finish();
            }
            L_BRACE => self.block(),
            SEMICOLON if !in_expression => self.bump(),
            _ => self.error("expected a function body"),
        }
    }

    // ------------------------------------------------------------------
    // statements
    // ------------------------------------------------------------------

    fn block(&mut self) {
        self.start(BLOCK);
        self.expect(L_BRACE);
        while !matches!(self.current(), R_BRACE | EOF) {
            self.progressing("expected a statement", |p| p.statement());
        }
        self.expect(R_BRACE);
        self.finish();
    }

    fn statement(&mut self) {
        match self.current() {
            L_BRACE => self.block(),
            SEMICOLON => self.bump(),
            RETURN_KW => {
                self.start(RETURN_STMT);
                self.bump();
                if !self.at(SEMICOLON) {
                    self.expr();
                }
                self.expect(SEMICOLON);
                self.finish();
            }
            IF_KW | FOR_KW | WHILE_KW => {
                self.start(OTHER_STMT);
                self.bump();
                if self.at(L_PAREN) {
                    self.bump_balanced();
                }
                self.statement();
                while self.eat(ELSE_KW) {
                    self.statement();
                }
                self.finish();
            }
            TRY_KW | SWITCH_KW => {
                self.start(OTHER_STMT);
                self.bump();
                loop {
                    match self.current() {
                        L_BRACE | L_PAREN => self.bump_balanced(),
                        IDENT if matches!(self.nth_text(0), "catch" | "finally") => self.bump(),
                        IDENT if self.nth_text(0) == "on" => {
                            self.bump();
                            if self.at(IDENT) {
                                self.type_ref();
                            }
                        }
                        _ => break,
                    }
                }
                self.finish();
            }
            FINAL_KW | VAR_KW | CONST_KW | LATE_KW => self.local_var(),
            IDENT => match self.typed_name_la(0) {
                Some(name_at) if matches!(self.nth(name_at + 1), EQ | SEMICOLON | COMMA) => {
                    self.local_var()
                }
                Some(name_at) if self.nth(name_at + 1) == L_PAREN => {
                    self.start(FUNCTION_DECL);
                    self.type_ref();
                    self.function_rest();
                    self.finish();
                }
                _ => self.expr_stmt(),
            },
            _ => self.expr_stmt(),
        }
    }

    fn local_var(&mut self) {
        self.start(LOCAL_VAR);
        while matches!(self.current(), FINAL_KW | VAR_KW | CONST_KW | LATE_KW) {
            self.bump();
        }
        if self.typed_name_la(0).is_some() {
            self.type_ref();
        }
        self.variables();
        self.expect(SEMICOLON);
        self.finish();
    }

    fn expr_stmt(&mut self) {
        self.start(EXPR_STMT);
        self.expr();
        self.expect(SEMICOLON);
        self.finish();
    }

    // ------------------------------------------------------------------
    // expressions
    // ------------------------------------------------------------------

    fn at_binary_operator(&self) -> bool {
        match self.current() {
            OPERATOR => !matches!(self.nth_text(0), "++" | "--" | "~"),
            EQ | L_ANGLE | R_ANGLE | QUESTION | COLON | DOT2 => true,
            IDENT => matches!(self.nth_text(0), "as" | "is"),
            _ => false,
        }
    }

    fn expr(&mut self) {
        let checkpoint = self.checkpoint();
        self.unary();
        while self.at_binary_operator() {
            self.start_at(checkpoint, BIN_EXPR);
            let type_test = self.at(IDENT);
            self.bump();
            if type_test {
                self.eat(BANG);
                if self.at(IDENT) {
                    self.type_ref();
                }
            } else {
                self.unary();
            }
            self.finish();
        }
    }

    fn unary(&mut self) {
        let prefix = match self.current() {
            BANG | AWAIT_KW => true,
            OPERATOR => matches!(self.nth_text(0), "-" | "~" | "++" | "--"),
            _ => false,
        };
        if prefix {
            self.start(PREFIX_EXPR);
            self.bump();
            self.unary();
            self.finish();
        } else {
            self.postfix();
        }
    }

    fn postfix(&mut self) {
        let checkpoint = self.checkpoint();
        if !self.primary() {
            return;
        }
        loop {
            match self.current() {
                DOT | QUESTION_DOT if self.nth(1) == IDENT => {
                    self.start_at(checkpoint, MEMBER_EXPR);
                    self.bump();
                    self.name_ref();
                    self.finish();
                }
                L_PAREN => {
                    self.start_at(checkpoint, CALL_EXPR);
                    self.arg_list();
                    self.finish();
                }
                L_ANGLE if self.skip_type_args_la(0).is_some_and(|k| self.nth(k) == L_PAREN) => {
                    self.start_at(checkpoint, CALL_EXPR);
                    self.type_args();
                    self.arg_list();
                    self.finish();
                }
                L_BRACK => {
                    self.start_at(checkpoint, INDEX_EXPR);
                    self.bump();
                    self.expr();
                    self.expect(R_BRACK);
                    self.finish();
                }
                BANG => {
                    self.start_at(checkpoint, POSTFIX_EXPR);
                    self.bump();
                    self.finish();
                }
                OPERATOR if matches!(self.nth_text(0), "++" | "--") => {
                    self.start_at(checkpoint, POSTFIX_EXPR);
                    self.bump();
                    self.finish();
                }
                _ => break,
            }
        }
    }

    /// Parse a primary expression; `false` when nothing expression-like was found.
    fn primary(&mut self) -> bool {
        match self.current() {
            IDENT | THIS_KW | SUPER_KW => self.name_ref(),
            STRING => {
                self.start(STRING_LITERAL);
                while self.at(STRING) {
                    self.bump();
                }
                self.finish();
            }
            INT_NUMBER | FLOAT_NUMBER | TRUE_KW | FALSE_KW | NULL_KW => {
                self.start(LITERAL);
                self.bump();
                self.finish();
            }
            L_BRACK => self.collection(LIST_LITERAL),
            L_BRACE => self.collection(MAP_LITERAL),
            L_ANGLE => match self.skip_type_args_la(0).map(|k| self.nth(k)) {
                Some(L_BRACK) => self.collection(LIST_LITERAL),
                Some(L_BRACE) => self.collection(MAP_LITERAL),
                _ => {
                    self.error_and_bump("expected an expression");
                    return false;
                }
            },
            CONST_KW if matches!(self.nth(1), L_BRACK | L_ANGLE) => self.collection(LIST_LITERAL),
            CONST_KW if self.nth(1) == L_BRACE => self.collection(MAP_LITERAL),
            NEW_KW | CONST_KW => self.new_expr(),
            L_PAREN => {
                let closure = self
                    .skip_group_la(0)
                    .is_some_and(|k| matches!(self.nth(k), FAT_ARROW | L_BRACE | ASYNC_KW));
                if closure {
                    self.start(CLOSURE);
                    self.param_list();
                    self.function_body(true);
                    self.finish();
                } else {
                    self.start(PAREN_EXPR);
                    self.bump();
                    self.expr();
                    self.expect(R_PAREN);
                    self.finish();
                }
            }
            _ => {
                self.error("expected an expression");
                if !matches!(
                    self.current(),
                    R_PAREN | R_BRACK | R_BRACE | SEMICOLON | COMMA | EOF
                ) {
                    self.start(ERROR);
                    self.bump_balanced();
                    self.finish();
                }
                return false;
            }
        }
        true
    }

    fn collection(&mut self, kind: SyntaxKind) {
        let (open, close) = if kind == LIST_LITERAL {
            (L_BRACK, R_BRACK)
        } else {
            (L_BRACE, R_BRACE)
        };
        self.start(kind);
        self.eat(CONST_KW);
        if self.at(L_ANGLE) {
            self.type_args();
        }
        self.expect(open);
        while !matches!(self.current(), EOF) && !self.at(close) {
            if matches!(self.current(), IF_KW | FOR_KW) {
                self.bump();
                if self.at(L_PAREN) {
                    self.bump_balanced();
                }
            }
            self.eat(DOT3);
            self.progressing("expected an element", |p| p.expr());
            if !self.eat(COMMA) {
                break;
            }
        }
        self.expect(close);
        self.finish();
    }

    /// `new T(...)` / `const T.named(...)`: a NEW_EXPR wrapping the call.
    fn new_expr(&mut self) {
        self.start(NEW_EXPR);
        self.bump();
        if !self.at(IDENT) {
            self.error("expected a constructor name");
            self.finish();
            return;
        }
        let checkpoint = self.checkpoint();
        self.name_ref();
        while self.at(DOT) && self.nth(1) == IDENT {
            self.start_at(checkpoint, MEMBER_EXPR);
            self.bump();
            self.name_ref();
            self.finish();
        }
        if matches!(self.current(), L_PAREN | L_ANGLE) {
            self.start_at(checkpoint, CALL_EXPR);
            if self.at(L_ANGLE) {
                self.type_args();
            }
            self.arg_list();
            self.finish();
        } else {
            self.error("expected constructor arguments");
        }
        self.finish();
    }

    fn arg_list(&mut self) {
        self.start(ARG_LIST);
        self.expect(L_PAREN);
        while !matches!(self.current(), R_PAREN | EOF) {
            if self.at(IDENT) && self.nth(1) == COLON {
                self.start(NAMED_ARG);
                self.name();
                self.bump();
                self.expr();
                self.finish();
            } else {
                self.progressing("expected an argument", |p| p.expr());
            }
            if !self.eat(COMMA) {
                break;
            }
        }
        self.expect(R_PAREN);
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds_of(parse: &Parse, kind: SyntaxKind) -> Vec<String> {
        parse
            .syntax_node()
            .descendants()
            .filter(|n| n.kind() == kind)
            .map(|n| n.text().to_string())
            .collect()
    }

    #[test]
    fn test_tree_is_lossless() {
        let source = "import 'package:app/a.dart';\n\nclass A {\n  // note\n  final x = 1;\n}\n";
        let parse = parse(source);
        assert_eq!(parse.syntax_node().text().to_string(), source);
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
    }

    #[test]
    fn test_class_members() {
        let parse = parse(
            r#"
            class Images {
              const Images();
              static const logo = 'assets/logo.png';
              String get banner => "assets/banner.png";
              List<Widget> build(BuildContext context) { return [Text('a')]; }
            }
            "#,
        );
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        assert_eq!(kinds_of(&parse, CONSTRUCTOR_DECL).len(), 1);
        assert_eq!(kinds_of(&parse, FIELD_DECL), vec!["static const logo = 'assets/logo.png';"]);
        assert_eq!(kinds_of(&parse, GETTER_DECL), vec![r#"String get banner => "assets/banner.png";"#]);
        assert_eq!(kinds_of(&parse, METHOD_DECL).len(), 1);
        assert_eq!(kinds_of(&parse, TYPE_REF)[0], "String");
    }

    #[test]
    fn test_member_chain_with_call_segment() {
        let parse = parse("void f() { Text(S.of(context).greeting('Ann')); }");
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        let calls = kinds_of(&parse, CALL_EXPR);
        assert!(calls.contains(&"S.of(context).greeting('Ann')".to_string()));
        assert!(calls.contains(&"S.of(context)".to_string()));
    }

    #[test]
    fn test_closures_and_new_wrappers() {
        let parse = parse(
            "final pages = [Route('/a', () => PageA()), Route('/b', (ctx) { return new PageB(); })];",
        );
        assert!(parse.errors().is_empty(), "{:?}", parse.errors());
        assert_eq!(kinds_of(&parse, CLOSURE).len(), 2);
        assert_eq!(kinds_of(&parse, NEW_EXPR), vec!["new PageB()"]);
    }

    #[test]
    fn test_named_arguments() {
        let parse = parse("final w = Image.asset(R.image.logo, width: 10);");
        assert_eq!(kinds_of(&parse, NAMED_ARG), vec!["width: 10"]);
    }

    #[test]
    fn test_recovers_from_garbage() {
        let source = "class A { ) int x; }\nenum E { a, b }\nfinal y = ;";
        let parse = parse(source);
        assert!(!parse.errors().is_empty());
        assert_eq!(parse.syntax_node().text().to_string(), source);
        assert_eq!(kinds_of(&parse, CLASS_DECL).len(), 1);
    }
}
