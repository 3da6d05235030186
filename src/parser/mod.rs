mod common;
pub mod go;
pub mod imports;
pub mod signature;
pub mod types;

use thiserror::Error;
use tree_sitter::Node;

pub use go::{GoParser, ParsedFile, SkippedDecl};
pub use imports::ImportResolver;
pub use types::TypeResolver;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse: {0}")]
    Parse(String),
    #[error("Syntax error at line {line}")]
    Syntax { line: usize },
    #[error("Missing package clause")]
    MissingPackage,
}

/// Why a single declaration could not be turned into an export.
///
/// These never abort a file: the declaration is skipped and reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclError {
    #[error("import not found for package name `{alias}`")]
    ImportNotFound { alias: String },
    #[error("unsupported type expression `{kind}`")]
    UnsupportedTypeExpr { kind: String },
    #[error("malformed `{kind}` node")]
    Malformed { kind: String },
    #[error("syntax error at line {line}")]
    Syntax { line: usize },
}

impl DeclError {
    pub(crate) fn unsupported(node: &Node) -> Self {
        DeclError::UnsupportedTypeExpr {
            kind: node.kind().to_string(),
        }
    }

    pub(crate) fn malformed(node: &Node) -> Self {
        DeclError::Malformed {
            kind: node.kind().to_string(),
        }
    }
}
