//! Declaration scanner over the token stream.
//!
//! Recovers the shells the analysis walkers need: namespaces, usings, type
//! declarations with attributes and base lists, and member declarations with
//! their body token slices. Local functions are split out of their enclosing
//! unit so each executable unit carries exactly its own body.

use crate::syntax::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Record,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Method,
    Constructor,
    Property,
    Indexer,
    Field,
    LocalFunction,
    /// User-defined operator; carries the operator glyph.
    Operator(String),
    /// Implicit or explicit conversion operator.
    Conversion,
}

#[derive(Debug, Clone)]
pub struct MemberDecl {
    pub kind: MemberKind,
    pub name: String,
    /// Field/property type, method return type, conversion target type.
    pub type_name: String,
    pub attributes: Vec<String>,
    /// (type, name) per parameter.
    pub params: Vec<(String, String)>,
    pub body: Vec<Token>,
}

impl MemberDecl {
    pub fn has_attribute(&self, wanted: &str) -> bool {
        self.attributes.iter().any(|a| attr_eq(a, wanted))
    }

    /// Executable code units for complexity purposes.
    pub fn is_code_unit(&self) -> bool {
        matches!(
            self.kind,
            MemberKind::Method
                | MemberKind::Constructor
                | MemberKind::Property
                | MemberKind::LocalFunction
        )
    }
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    pub namespace: String,
    pub attributes: Vec<String>,
    pub base_types: Vec<String>,
    pub members: Vec<MemberDecl>,
}

impl TypeDecl {
    pub fn has_attribute(&self, wanted: &str) -> bool {
        self.attributes.iter().any(|a| attr_eq(a, wanted))
    }

    pub fn has_base(&self, wanted: &str) -> bool {
        self.base_types.iter().any(|b| b == wanted)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SourceModel {
    pub usings: Vec<String>,
    pub types: Vec<TypeDecl>,
}

/// Attribute names may or may not carry the conventional suffix.
fn attr_eq(declared: &str, wanted: &str) -> bool {
    declared == wanted || declared.strip_suffix("Attribute") == Some(wanted)
}

const MODIFIERS: &[&str] = &[
    "public", "private", "protected", "internal", "static", "abstract", "sealed", "virtual",
    "override", "async", "partial", "readonly", "unsafe", "extern", "new", "volatile", "const",
    "ref", "required", "file",
];

/// Words that cannot start a type reference.
const NOT_A_TYPE: &[&str] = &[
    "if", "else", "for", "foreach", "while", "do", "switch", "case", "default", "return", "new",
    "throw", "using", "lock", "fixed", "await", "yield", "break", "continue", "goto", "try",
    "catch", "finally", "var", "is", "as", "in", "out", "ref", "params", "this", "base", "typeof",
    "sizeof", "nameof", "delegate", "event", "operator", "where", "when", "get", "set", "init",
    "add", "remove", "value", "select", "from", "let", "join", "orderby", "group", "into", "on",
    "equals", "by", "ascending", "descending", "true", "false", "null", "checked", "unchecked",
    "stackalloc", "with", "not", "and", "or", "public", "private", "protected", "internal",
    "static", "abstract", "sealed", "virtual", "override", "async", "partial", "readonly",
    "unsafe", "extern", "volatile", "const", "required",
];

fn is_modifier(word: &str) -> bool {
    MODIFIERS.contains(&word)
}

pub(crate) fn not_a_type(word: &str) -> bool {
    NOT_A_TYPE.contains(&word)
}

pub fn scan(tokens: &[Token]) -> SourceModel {
    let mut model = SourceModel::default();
    let mut scanner = Scanner { toks: tokens, pos: 0 };
    scanner.scan_container(tokens.len(), "", &mut model);
    model
}

struct Scanner<'a> {
    toks: &'a [Token],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn peek(&self) -> Option<&'a Token> {
        self.toks.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.toks.get(self.pos + offset)
    }

    fn ident(&self) -> Option<&'a str> {
        self.peek().and_then(Token::ident)
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at(&self, target: &Token) -> bool {
        self.peek() == Some(target)
    }

    fn eat(&mut self, target: &Token) -> bool {
        if self.at(target) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_ident(&mut self, text: &str) -> bool {
        if self.ident() == Some(text) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Index of the brace matching the one at the cursor, or `end`.
    fn matching_brace(&self, end: usize) -> usize {
        match_balanced(self.toks, self.pos, &Token::LBrace, &Token::RBrace).unwrap_or(end)
    }

    fn skip_to_semi(&mut self, end: usize) {
        while self.pos < end {
            match self.peek() {
                Some(Token::Semi) => {
                    self.bump();
                    return;
                }
                Some(Token::LBrace) => {
                    let close = self.matching_brace(end);
                    self.pos = (close + 1).min(end);
                }
                _ => self.bump(),
            }
        }
    }

    fn scan_container(&mut self, end: usize, namespace: &str, model: &mut SourceModel) {
        let mut current_ns = namespace.to_string();
        let mut attrs: Vec<String> = Vec::new();
        while self.pos < end {
            match self.peek() {
                Some(Token::LBracket) => {
                    let group = self.parse_attribute_group(end);
                    attrs.extend(group);
                }
                Some(Token::Ident(word)) => match word.as_str() {
                    "using" => {
                        self.bump();
                        self.eat_ident("static");
                        let mut name = String::new();
                        while self.pos < end {
                            match self.peek() {
                                Some(Token::Ident(part)) => {
                                    name.push_str(part);
                                    self.bump();
                                }
                                Some(Token::Dot) => {
                                    name.push('.');
                                    self.bump();
                                }
                                Some(Token::Op(op)) if op == "=" => {
                                    // alias directive; keep only the target
                                    name.clear();
                                    self.bump();
                                }
                                _ => break,
                            }
                        }
                        self.eat(&Token::Semi);
                        if !name.is_empty() {
                            model.usings.push(name);
                        }
                        attrs.clear();
                    }
                    "namespace" => {
                        self.bump();
                        let name = self.parse_dotted_name(end);
                        let full = if current_ns.is_empty() {
                            name
                        } else {
                            format!("{current_ns}.{name}")
                        };
                        if self.at(&Token::LBrace) {
                            let close = self.matching_brace(end);
                            self.bump();
                            self.scan_container(close, &full, model);
                            self.pos = (close + 1).min(end);
                        } else if self.eat(&Token::Semi) {
                            current_ns = full;
                        }
                        attrs.clear();
                    }
                    "class" | "interface" | "struct" | "enum" | "record" => {
                        let pending = std::mem::take(&mut attrs);
                        self.parse_type_decl(end, &current_ns, pending, model);
                    }
                    "delegate" => {
                        self.skip_to_semi(end);
                        attrs.clear();
                    }
                    w if is_modifier(w) => self.bump(),
                    _ => {
                        self.bump();
                        attrs.clear();
                    }
                },
                _ => {
                    self.bump();
                    attrs.clear();
                }
            }
        }
    }

    fn parse_dotted_name(&mut self, end: usize) -> String {
        let mut name = String::new();
        while self.pos < end {
            match self.peek() {
                Some(Token::Ident(part)) => {
                    name.push_str(part);
                    self.bump();
                }
                Some(Token::Dot) => {
                    name.push('.');
                    self.bump();
                }
                _ => break,
            }
        }
        name
    }

    /// `[Attr, Other("arg")]`: returns the attribute names; targets like
    /// `[return: ...]` are skipped.
    fn parse_attribute_group(&mut self, end: usize) -> Vec<String> {
        let close = match match_balanced(self.toks, self.pos, &Token::LBracket, &Token::RBracket) {
            Some(i) if i < end => i,
            _ => {
                self.bump();
                return Vec::new();
            }
        };
        let inner = &self.toks[self.pos + 1..close];
        self.pos = close + 1;

        let mut names = Vec::new();
        for group in split_top_level(inner, &Token::Comma) {
            let mut i = 0;
            // attribute target specifier
            if group.len() >= 2
                && group[0].ident().is_some()
                && group[1] == Token::Colon
            {
                i = 2;
            }
            let mut last = None;
            while i < group.len() {
                match &group[i] {
                    Token::Ident(name) => {
                        last = Some(name.clone());
                        i += 1;
                    }
                    Token::Dot => i += 1,
                    _ => break,
                }
            }
            if let Some(name) = last {
                names.push(name);
            }
        }
        names
    }

    fn parse_type_decl(
        &mut self,
        end: usize,
        namespace: &str,
        attributes: Vec<String>,
        model: &mut SourceModel,
    ) {
        let kind = match self.ident() {
            Some("class") => TypeKind::Class,
            Some("interface") => TypeKind::Interface,
            Some("struct") => TypeKind::Struct,
            Some("enum") => TypeKind::Enum,
            Some("record") => TypeKind::Record,
            _ => {
                self.bump();
                return;
            }
        };
        self.bump();
        if kind == TypeKind::Record {
            // record class / record struct
            let _ = self.eat_ident("class") || self.eat_ident("struct");
        }
        let Some(name) = self.ident().map(str::to_string) else {
            return;
        };
        self.bump();
        if matches!(self.peek(), Some(Token::Op(op)) if op == "<") {
            if let Some(after) = skip_angles(self.toks, self.pos) {
                self.pos = after.min(end);
            }
        }
        // record primary constructor
        if self.at(&Token::LParen)
            && let Some(close) = match_balanced(self.toks, self.pos, &Token::LParen, &Token::RParen)
        {
            self.pos = (close + 1).min(end);
        }

        let mut base_types = Vec::new();
        if self.eat(&Token::Colon) {
            while self.pos < end {
                if self.at(&Token::LBrace) || self.at(&Token::Semi) || self.ident() == Some("where")
                {
                    break;
                }
                if let Some((simple, after)) = parse_type_ref(self.toks, self.pos) {
                    if !simple.is_empty() {
                        base_types.push(simple);
                    }
                    self.pos = after.min(end);
                    // base constructor arguments in record base lists
                    if self.at(&Token::LParen)
                        && let Some(close) =
                            match_balanced(self.toks, self.pos, &Token::LParen, &Token::RParen)
                    {
                        self.pos = (close + 1).min(end);
                    }
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                } else {
                    self.bump();
                }
            }
        }
        // generic constraints
        while self.ident() == Some("where") {
            while self.pos < end
                && !self.at(&Token::LBrace)
                && !self.at(&Token::Semi)
            {
                self.bump();
            }
        }

        if self.eat(&Token::Semi) {
            model.types.push(TypeDecl {
                kind,
                name,
                namespace: namespace.to_string(),
                attributes,
                base_types,
                members: Vec::new(),
            });
            return;
        }
        if !self.at(&Token::LBrace) {
            return;
        }
        let close = self.matching_brace(end);
        self.bump();
        let members = if kind == TypeKind::Enum {
            self.pos = close;
            Vec::new()
        } else {
            self.scan_members(close, &name, namespace, model)
        };
        self.pos = (close + 1).min(end);

        model.types.push(TypeDecl {
            kind,
            name,
            namespace: namespace.to_string(),
            attributes,
            base_types,
            members,
        });
    }

    fn scan_members(
        &mut self,
        end: usize,
        type_name: &str,
        namespace: &str,
        model: &mut SourceModel,
    ) -> Vec<MemberDecl> {
        let mut members: Vec<MemberDecl> = Vec::new();
        let mut attrs: Vec<String> = Vec::new();
        while self.pos < end {
            match self.peek() {
                Some(Token::LBracket) => {
                    let group = self.parse_attribute_group(end);
                    attrs.extend(group);
                }
                Some(Token::Ident(word)) => match word.as_str() {
                    "class" | "interface" | "struct" | "enum" | "record" => {
                        let pending = std::mem::take(&mut attrs);
                        self.parse_type_decl(end, namespace, pending, model);
                    }
                    "delegate" => {
                        self.skip_to_semi(end);
                        attrs.clear();
                    }
                    "event" => {
                        self.bump();
                        self.skip_to_semi_or_block(end);
                        attrs.clear();
                    }
                    "implicit" | "explicit" => {
                        self.bump();
                        if self.eat_ident("operator") {
                            let target = match parse_type_ref(self.toks, self.pos) {
                                Some((simple, after)) => {
                                    self.pos = after.min(end);
                                    simple
                                }
                                None => String::new(),
                            };
                            let params = self.parse_params(end);
                            let body = self.capture_body(end);
                            members.push(MemberDecl {
                                kind: MemberKind::Conversion,
                                name: target.clone(),
                                type_name: target,
                                attributes: std::mem::take(&mut attrs),
                                params,
                                body,
                            });
                        }
                    }
                    w if is_modifier(w) => self.bump(),
                    _ => {
                        if !self.parse_member(end, type_name, &mut attrs, &mut members) {
                            self.bump();
                            attrs.clear();
                        }
                    }
                },
                _ => {
                    self.bump();
                    attrs.clear();
                }
            }
        }

        // Split local functions out of unit bodies.
        let mut extracted: Vec<MemberDecl> = Vec::new();
        for member in &mut members {
            if member.is_code_unit() && !member.body.is_empty() {
                let (clean, locals) = extract_local_functions(&member.body);
                member.body = clean;
                extracted.extend(locals);
            }
        }
        members.extend(extracted);
        members
    }

    fn parse_member(
        &mut self,
        end: usize,
        type_name: &str,
        attrs: &mut Vec<String>,
        members: &mut Vec<MemberDecl>,
    ) -> bool {
        let start = self.pos;

        // Constructor: the bare type name followed by a parameter list.
        if self.ident() == Some(type_name) && self.peek_at(1) == Some(&Token::LParen) {
            self.bump();
            let params = self.parse_params(end);
            if self.at(&Token::Colon) {
                // : base(...) / : this(...)
                while self.pos < end && !self.at(&Token::LBrace) && !self.at(&Token::Semi) {
                    if self.at(&Token::LParen) {
                        if let Some(close) =
                            match_balanced(self.toks, self.pos, &Token::LParen, &Token::RParen)
                        {
                            self.pos = (close + 1).min(end);
                            continue;
                        }
                    }
                    self.bump();
                }
            }
            let body = self.capture_body(end);
            members.push(MemberDecl {
                kind: MemberKind::Constructor,
                name: type_name.to_string(),
                type_name: type_name.to_string(),
                attributes: std::mem::take(attrs),
                params,
                body,
            });
            return true;
        }

        // Finalizer: consume and ignore.
        if matches!(self.peek(), Some(Token::Op(op)) if op == "~")
            && self.peek_at(1).and_then(Token::ident) == Some(type_name)
        {
            self.bump();
            self.bump();
            let _ = self.parse_params(end);
            let _ = self.capture_body(end);
            attrs.clear();
            return true;
        }

        let Some((ty, after_ty)) = parse_type_ref(self.toks, self.pos) else {
            return false;
        };
        if after_ty > end {
            return false;
        }
        self.pos = after_ty;

        match self.peek() {
            Some(Token::Ident(word)) if word == "operator" => {
                self.bump();
                self.eat_ident("checked");
                let symbol = match self.peek() {
                    Some(Token::Op(op)) => Some(op.clone()),
                    Some(Token::AndAnd) => Some("&&".to_string()),
                    Some(Token::OrOr) => Some("||".to_string()),
                    Some(Token::Ident(w)) if w == "true" || w == "false" => Some(w.clone()),
                    _ => None,
                };
                let Some(symbol) = symbol else {
                    self.pos = start;
                    return false;
                };
                self.bump();
                let params = self.parse_params(end);
                let body = self.capture_body(end);
                members.push(MemberDecl {
                    kind: MemberKind::Operator(symbol.clone()),
                    name: symbol,
                    type_name: ty,
                    attributes: std::mem::take(attrs),
                    params,
                    body,
                });
                true
            }
            Some(Token::Ident(word)) if word == "this" => {
                self.bump();
                if !self.at(&Token::LBracket) {
                    self.pos = start;
                    return false;
                }
                let close =
                    match match_balanced(self.toks, self.pos, &Token::LBracket, &Token::RBracket) {
                        Some(i) if i < end => i,
                        _ => {
                            self.pos = start;
                            return false;
                        }
                    };
                let params = parse_param_slice(&self.toks[self.pos + 1..close]);
                self.pos = close + 1;
                let body = self.capture_body(end);
                members.push(MemberDecl {
                    kind: MemberKind::Indexer,
                    name: "this".to_string(),
                    type_name: ty,
                    attributes: std::mem::take(attrs),
                    params,
                    body,
                });
                true
            }
            Some(Token::Ident(first)) => {
                let mut name = first.clone();
                self.bump();
                // explicit interface implementations: keep the last segment
                while self.at(&Token::Dot) {
                    match self.peek_at(1) {
                        Some(Token::Ident(next)) => {
                            name = next.clone();
                            self.bump();
                            self.bump();
                        }
                        _ => break,
                    }
                }
                if matches!(self.peek(), Some(Token::Op(op)) if op == "<") {
                    if let Some(after) = skip_angles(self.toks, self.pos) {
                        self.pos = after.min(end);
                    }
                }
                match self.peek() {
                    Some(Token::LParen) => {
                        let params = self.parse_params(end);
                        while self.ident() == Some("where") {
                            while self.pos < end
                                && !self.at(&Token::LBrace)
                                && !self.at(&Token::Semi)
                                && !self.at(&Token::FatArrow)
                            {
                                self.bump();
                            }
                        }
                        let body = self.capture_body(end);
                        members.push(MemberDecl {
                            kind: MemberKind::Method,
                            name,
                            type_name: ty,
                            attributes: std::mem::take(attrs),
                            params,
                            body,
                        });
                        true
                    }
                    Some(Token::LBrace) => {
                        let body = self.capture_body(end);
                        // auto-property initializer
                        if matches!(self.peek(), Some(Token::Op(op)) if op == "=") {
                            self.skip_to_semi(end);
                        }
                        members.push(MemberDecl {
                            kind: MemberKind::Property,
                            name,
                            type_name: ty,
                            attributes: std::mem::take(attrs),
                            params: Vec::new(),
                            body,
                        });
                        true
                    }
                    Some(Token::FatArrow) => {
                        let body = self.capture_body(end);
                        members.push(MemberDecl {
                            kind: MemberKind::Property,
                            name,
                            type_name: ty,
                            attributes: std::mem::take(attrs),
                            params: Vec::new(),
                            body,
                        });
                        true
                    }
                    Some(Token::Op(op)) if op == "=" => {
                        self.skip_to_semi(end);
                        members.push(MemberDecl {
                            kind: MemberKind::Field,
                            name,
                            type_name: ty,
                            attributes: std::mem::take(attrs),
                            params: Vec::new(),
                            body: Vec::new(),
                        });
                        true
                    }
                    Some(Token::Semi) => {
                        self.bump();
                        members.push(MemberDecl {
                            kind: MemberKind::Field,
                            name,
                            type_name: ty,
                            attributes: std::mem::take(attrs),
                            params: Vec::new(),
                            body: Vec::new(),
                        });
                        true
                    }
                    Some(Token::Comma) => {
                        // multiple declarators share the type
                        let shared_attrs = std::mem::take(attrs);
                        members.push(MemberDecl {
                            kind: MemberKind::Field,
                            name,
                            type_name: ty.clone(),
                            attributes: shared_attrs.clone(),
                            params: Vec::new(),
                            body: Vec::new(),
                        });
                        while self.eat(&Token::Comma) {
                            if let Some(next) = self.ident().map(str::to_string) {
                                self.bump();
                                members.push(MemberDecl {
                                    kind: MemberKind::Field,
                                    name: next,
                                    type_name: ty.clone(),
                                    attributes: shared_attrs.clone(),
                                    params: Vec::new(),
                                    body: Vec::new(),
                                });
                                // skip an initializer up to the next , or ;
                                while self.pos < end
                                    && !self.at(&Token::Comma)
                                    && !self.at(&Token::Semi)
                                {
                                    self.bump();
                                }
                            } else {
                                break;
                            }
                        }
                        self.eat(&Token::Semi);
                        true
                    }
                    _ => {
                        self.pos = start;
                        false
                    }
                }
            }
            _ => {
                self.pos = start;
                false
            }
        }
    }

    fn parse_params(&mut self, end: usize) -> Vec<(String, String)> {
        if !self.at(&Token::LParen) {
            return Vec::new();
        }
        let close = match match_balanced(self.toks, self.pos, &Token::LParen, &Token::RParen) {
            Some(i) if i < end => i,
            _ => {
                self.pos = end;
                return Vec::new();
            }
        };
        let params = parse_param_slice(&self.toks[self.pos + 1..close]);
        self.pos = close + 1;
        params
    }

    fn capture_body(&mut self, end: usize) -> Vec<Token> {
        match self.peek() {
            Some(Token::LBrace) => {
                let close = self.matching_brace(end);
                let body = self.toks[(self.pos + 1).min(close)..close].to_vec();
                self.pos = (close + 1).min(end);
                body
            }
            Some(Token::FatArrow) => {
                self.bump();
                let start = self.pos;
                let stop = find_semi(self.toks, start).unwrap_or(end).min(end);
                let body = self.toks[start..stop].to_vec();
                self.pos = (stop + 1).min(end);
                body
            }
            Some(Token::Semi) => {
                self.bump();
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn skip_to_semi_or_block(&mut self, end: usize) {
        while self.pos < end {
            match self.peek() {
                Some(Token::Semi) => {
                    self.bump();
                    return;
                }
                Some(Token::LBrace) => {
                    let close = self.matching_brace(end);
                    self.pos = (close + 1).min(end);
                    return;
                }
                _ => self.bump(),
            }
        }
    }
}

/// Index of the token matching the opener at `open_idx`.
fn match_balanced(toks: &[Token], open_idx: usize, open: &Token, close: &Token) -> Option<usize> {
    if toks.get(open_idx) != Some(open) {
        return None;
    }
    let mut depth = 0usize;
    for (i, tok) in toks.iter().enumerate().skip(open_idx) {
        if tok == open {
            depth += 1;
        } else if tok == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// First `;` at zero bracket depth starting at `from`.
fn find_semi(toks: &[Token], from: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (i, tok) in toks.iter().enumerate().skip(from) {
        match tok {
            Token::LBrace | Token::LParen | Token::LBracket => depth += 1,
            Token::RBrace | Token::RParen | Token::RBracket => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            Token::Semi if depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Skip a generic argument/parameter list starting at `<`; returns the index
/// just past the matching `>`. Bails on tokens that cannot occur in a type
/// argument list, so comparison expressions are not swallowed.
fn skip_angles(toks: &[Token], open_idx: usize) -> Option<usize> {
    if !matches!(toks.get(open_idx), Some(Token::Op(op)) if op == "<") {
        return None;
    }
    let mut depth = 0i32;
    let mut i = open_idx;
    while i < toks.len() {
        match &toks[i] {
            Token::Op(op) if op == "<" => depth += 1,
            Token::Op(op) if op == "<<" => depth += 2,
            Token::Op(op) if op == ">" => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            Token::Op(op) if op == ">>" => {
                depth -= 2;
                if depth <= 0 {
                    return Some(i + 1);
                }
            }
            Token::Ident(_)
            | Token::Dot
            | Token::Comma
            | Token::Question
            | Token::LBracket
            | Token::RBracket
            | Token::LParen
            | Token::RParen => {}
            Token::Op(op) if op == "*" => {}
            _ => return None,
        }
        i += 1;
    }
    None
}

/// Parse a type reference inside a token slice: dotted name, generic
/// arguments, `?`/array/pointer suffixes. Returns the simple (last-segment)
/// name and the index just past the reference.
pub(crate) fn parse_type_ref(toks: &[Token], mut i: usize) -> Option<(String, usize)> {
    // tuple types carry no usable simple name
    if toks.get(i) == Some(&Token::LParen) {
        let close = match_balanced(toks, i, &Token::LParen, &Token::RParen)?;
        i = close + 1;
        i = parse_type_suffixes(toks, i);
        return Some((String::new(), i));
    }

    let first = toks.get(i)?.ident()?;
    if not_a_type(first) {
        return None;
    }
    let mut simple = first.to_string();
    i += 1;
    loop {
        match toks.get(i) {
            Some(Token::Dot) => match toks.get(i + 1).and_then(Token::ident) {
                Some(next) => {
                    simple = next.to_string();
                    i += 2;
                }
                None => break,
            },
            Some(Token::Op(op)) if op == "<" => match skip_angles(toks, i) {
                Some(after) => {
                    i = after;
                    break;
                }
                None => break,
            },
            _ => break,
        }
    }
    i = parse_type_suffixes(toks, i);
    Some((simple, i))
}

fn parse_type_suffixes(toks: &[Token], mut i: usize) -> usize {
    loop {
        match toks.get(i) {
            Some(Token::Question) => i += 1,
            Some(Token::Op(op)) if op == "*" => i += 1,
            Some(Token::LBracket) => {
                // array rank specifier: only commas inside
                let Some(close) = match_balanced(toks, i, &Token::LBracket, &Token::RBracket)
                else {
                    break;
                };
                if toks[i + 1..close].iter().all(|t| *t == Token::Comma) {
                    i = close + 1;
                } else {
                    break;
                }
            }
            _ => break,
        }
    }
    i
}

/// Split a slice on a separator at zero bracket depth.
fn split_top_level<'a>(toks: &'a [Token], separator: &Token) -> Vec<&'a [Token]> {
    let mut groups = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, tok) in toks.iter().enumerate() {
        match tok {
            Token::LBrace | Token::LParen | Token::LBracket => depth += 1,
            Token::RBrace | Token::RParen | Token::RBracket => depth -= 1,
            t if t == separator && depth == 0 => {
                groups.push(&toks[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < toks.len() {
        groups.push(&toks[start..]);
    }
    groups
}

const PARAM_MODIFIERS: &[&str] = &["ref", "out", "in", "params", "this", "scoped", "readonly"];

fn parse_param_slice(toks: &[Token]) -> Vec<(String, String)> {
    let mut params = Vec::new();
    for group in split_top_level(toks, &Token::Comma) {
        let mut i = 0;
        while i < group.len() {
            match &group[i] {
                Token::LBracket => {
                    match match_balanced(group, i, &Token::LBracket, &Token::RBracket) {
                        Some(close) => i = close + 1,
                        None => break,
                    }
                }
                Token::Ident(word) if PARAM_MODIFIERS.contains(&word.as_str()) => i += 1,
                _ => break,
            }
        }
        let Some((ty, after)) = parse_type_ref(group, i) else {
            continue;
        };
        if let Some(name) = group.get(after).and_then(Token::ident) {
            params.push((ty, name.to_string()));
        }
    }
    params
}

const LOCAL_FN_MODIFIERS: &[&str] = &["static", "async", "unsafe", "extern"];

/// Split local functions out of a body. The cleaned body keeps everything
/// else; extracted functions are returned with their own (recursively
/// cleaned) bodies.
fn extract_local_functions(body: &[Token]) -> (Vec<Token>, Vec<MemberDecl>) {
    let mut cleaned: Vec<Token> = Vec::new();
    let mut locals: Vec<MemberDecl> = Vec::new();
    let mut i = 0usize;
    let mut boundary = true;
    while i < body.len() {
        if boundary && let Some((member, next)) = try_local_function(body, i) {
            locals.extend(split_nested(member));
            i = next;
            boundary = true;
            continue;
        }
        let tok = body[i].clone();
        boundary = matches!(
            tok,
            Token::Semi | Token::LBrace | Token::RBrace | Token::Colon
        );
        cleaned.push(tok);
        i += 1;
    }
    (cleaned, locals)
}

fn split_nested(member: MemberDecl) -> Vec<MemberDecl> {
    let (clean, nested) = extract_local_functions(&member.body);
    let mut all = vec![MemberDecl {
        body: clean,
        ..member
    }];
    all.extend(nested);
    all
}

/// `ReturnType Name(params) {` or `=> expr;` at a statement boundary.
fn try_local_function(body: &[Token], at: usize) -> Option<(MemberDecl, usize)> {
    let mut i = at;
    while matches!(body.get(i), Some(Token::Ident(w)) if LOCAL_FN_MODIFIERS.contains(&w.as_str()))
    {
        i += 1;
    }
    let (ty, after_ty) = parse_type_ref(body, i)?;
    let name = body.get(after_ty).and_then(Token::ident)?;
    if not_a_type(name) {
        return None;
    }
    let mut k = after_ty + 1;
    if matches!(body.get(k), Some(Token::Op(op)) if op == "<") {
        k = skip_angles(body, k)?;
    }
    if body.get(k) != Some(&Token::LParen) {
        return None;
    }
    let close_paren = match_balanced(body, k, &Token::LParen, &Token::RParen)?;
    let params = parse_param_slice(&body[k + 1..close_paren]);
    let sig_end = close_paren + 1;
    match body.get(sig_end) {
        Some(Token::LBrace) => {
            let close_brace = match_balanced(body, sig_end, &Token::LBrace, &Token::RBrace)?;
            let member = MemberDecl {
                kind: MemberKind::LocalFunction,
                name: name.to_string(),
                type_name: ty,
                attributes: Vec::new(),
                params,
                body: body[sig_end + 1..close_brace].to_vec(),
            };
            Some((member, close_brace + 1))
        }
        Some(Token::FatArrow) => {
            let semi = find_semi(body, sig_end + 1)?;
            let member = MemberDecl {
                kind: MemberKind::LocalFunction,
                name: name.to_string(),
                type_name: ty,
                attributes: Vec::new(),
                params,
                body: body[sig_end + 1..semi].to_vec(),
            };
            Some((member, semi + 1))
        }
        _ => None,
    }
}
