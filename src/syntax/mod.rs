// Lightweight C# syntax layer: lexer + declaration scanner.
//
// The walkers that consume this (call-site counting, cyclomatic counting,
// endpoint detection) need declaration shells and body-level token streams,
// not a full AST.

pub mod lexer;
pub mod scanner;

pub use lexer::{Token, lex};
pub use scanner::{MemberDecl, MemberKind, SourceModel, TypeDecl, TypeKind, scan};
