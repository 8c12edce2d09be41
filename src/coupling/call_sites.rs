//! Cross-assembly call-site counting.
//!
//! Walks unit bodies tracking a small symbol table (fields, properties,
//! parameters, typed locals) and counts the call-site shapes that resolve to
//! a type declared by another assembly: invocations, object creations,
//! property accesses, indexer accesses, user-defined operators and
//! user-defined conversions. Counts aggregate per target assembly.

use std::collections::HashMap;

use crate::semantic::TypeIndex;
use crate::syntax::lexer::Token;
use crate::syntax::scanner::{MemberKind, SourceModel, not_a_type, parse_type_ref};

/// Counts for one compilation unit, keyed by target assembly name
/// (case-sensitive by convention).
pub fn count_call_sites(
    model: &SourceModel,
    source_assembly: &str,
    index: &TypeIndex,
) -> HashMap<String, u32> {
    let mut counts: HashMap<String, u32> = HashMap::new();
    for ty in &model.types {
        let mut type_symbols: HashMap<String, String> = HashMap::new();
        for member in &ty.members {
            if matches!(member.kind, MemberKind::Field | MemberKind::Property)
                && !member.type_name.is_empty()
            {
                type_symbols.insert(member.name.clone(), member.type_name.clone());
            }
        }
        type_symbols.insert("this".to_string(), ty.name.clone());
        if let Some(base) = ty.base_types.first() {
            type_symbols.insert("base".to_string(), base.clone());
        }

        for member in &ty.members {
            if member.body.is_empty() {
                continue;
            }
            let mut symbols = type_symbols.clone();
            for (param_ty, param_name) in &member.params {
                if !param_ty.is_empty() {
                    symbols.insert(param_name.clone(), param_ty.clone());
                }
            }
            walk_body(&member.body, &mut symbols, source_assembly, index, &mut counts);
        }
    }
    counts
}

fn record(
    counts: &mut HashMap<String, u32>,
    index: &TypeIndex,
    source_assembly: &str,
    type_name: &str,
) -> bool {
    if type_name.is_empty() {
        return false;
    }
    match index.assembly_of(type_name) {
        Some(assembly) if assembly != source_assembly => {
            *counts.entry(assembly.to_string()).or_insert(0) += 1;
            true
        }
        _ => false,
    }
}

fn walk_body(
    body: &[Token],
    symbols: &mut HashMap<String, String>,
    source_assembly: &str,
    index: &TypeIndex,
    counts: &mut HashMap<String, u32>,
) {
    let mut i = 0usize;
    while i < body.len() {
        match &body[i] {
            Token::Ident(word) if word == "var" => {
                // var name = new Type(...): the local gets the created type
                if let Some(name) = body.get(i + 1).and_then(Token::ident)
                    && matches!(body.get(i + 2), Some(Token::Op(op)) if op == "=")
                {
                    if matches!(body.get(i + 3), Some(t) if t.is_ident("new"))
                        && let Some((ty, _)) = parse_type_ref(body, i + 4)
                        && !ty.is_empty()
                    {
                        symbols.insert(name.to_string(), ty);
                    }
                    // leave the initializer in the stream so the creation
                    // itself still counts
                    i += 3;
                    continue;
                }
                i += 1;
            }
            Token::Ident(word) if word == "new" => {
                if let Some((ty, after)) = parse_type_ref(body, i + 1) {
                    if matches!(body.get(after), Some(Token::LParen) | Some(Token::LBrace)) {
                        record(counts, index, source_assembly, &ty);
                    }
                    i = after.max(i + 1);
                    continue;
                }
                i += 1;
            }
            Token::Ident(word) => {
                // typed local declaration: Type name = / ; / in
                if !not_a_type(word)
                    && let Some((ty, after)) = parse_type_ref(body, i)
                    && let Some(name) = body.get(after).and_then(Token::ident)
                    && !not_a_type(name)
                {
                    let next = body.get(after + 1);
                    let is_decl = matches!(next, Some(Token::Semi))
                        || matches!(next, Some(Token::Op(op)) if op == "=")
                        || matches!(next, Some(t) if t.is_ident("in"));
                    if is_decl {
                        // element access on arrays is not a call site, so
                        // array locals stay unresolved
                        let is_array =
                            body[i..after].iter().any(|t| *t == Token::LBracket);
                        if !ty.is_empty() && !is_array {
                            symbols.insert(name.to_string(), ty);
                        }
                        i = after;
                        continue;
                    }
                }

                // member access (instance or static) and indexer access
                let receiver_ty = symbols
                    .get(word.as_str())
                    .cloned()
                    .or_else(|| index.entry(word).map(|_| word.clone()));
                if let Some(ty) = receiver_ty {
                    match body.get(i + 1) {
                        Some(Token::Dot) if body.get(i + 2).and_then(Token::ident).is_some() => {
                            record(counts, index, source_assembly, &ty);
                            i += 3;
                            continue;
                        }
                        Some(Token::LBracket) if symbols.contains_key(word.as_str()) => {
                            record(counts, index, source_assembly, &ty);
                            i += 2;
                            continue;
                        }
                        _ => {}
                    }
                }
                i += 1;
            }
            Token::LParen => {
                // user-defined conversion: (Type) operand
                if let Some((ty, after)) = parse_type_ref(body, i + 1)
                    && matches!(body.get(after), Some(Token::RParen))
                    && matches!(
                        body.get(after + 1),
                        Some(Token::Ident(_))
                            | Some(Token::Literal)
                            | Some(Token::Str)
                            | Some(Token::LParen)
                    )
                    && !ty.is_empty()
                    && let Some(entry) = index.entry(&ty)
                    && entry.has_conversions
                    && entry.assembly != source_assembly
                {
                    *counts.entry(entry.assembly.clone()).or_insert(0) += 1;
                    i = after + 1;
                    continue;
                }
                i += 1;
            }
            Token::Op(op) => {
                if let Some(base) = base_operator(op) {
                    let operands = [
                        i.checked_sub(1).and_then(|j| body.get(j)),
                        body.get(i + 1),
                    ];
                    for operand in operands.into_iter().flatten() {
                        let Some(ty) = operand.ident().and_then(|w| symbols.get(w)) else {
                            continue;
                        };
                        if let Some(entry) = index.entry(ty)
                            && entry.assembly != source_assembly
                            && entry.operators.contains(base)
                        {
                            *counts.entry(entry.assembly.clone()).or_insert(0) += 1;
                            break;
                        }
                    }
                }
                i += 1;
            }
            _ => i += 1,
        }
    }
}

/// Overloadable operators; compound assignments resolve to their base form.
fn base_operator(op: &str) -> Option<&str> {
    match op {
        "+" | "-" | "*" | "/" | "%" | "&" | "|" | "^" | "<<" | ">>" | "==" | "!=" | "<" | ">"
        | "<=" | ">=" | "!" | "~" | "++" | "--" => Some(op),
        "+=" => Some("+"),
        "-=" => Some("-"),
        "*=" => Some("*"),
        "/=" => Some("/"),
        "%=" => Some("%"),
        "&=" => Some("&"),
        "|=" => Some("|"),
        "^=" => Some("^"),
        "<<=" => Some("<<"),
        ">>=" => Some(">>"),
        _ => None,
    }
}
