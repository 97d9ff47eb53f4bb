// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

//! Error taxonomy for distcalc, one enum per origin in the error handling
//! design: lexer, parser, worker compute, and the task graph store.

#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors raised while turning source text into tokens.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("'{0}' is not a number")]
    ItIsNotANumber(String),
}

/// Errors raised while turning tokens into an expression tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected token {0}")]
    UnexpectedToken(String),
    #[error("unexpected token kind {0}")]
    UnexpectedTokenKind(String),
    #[error("expected {0}")]
    ExpectedKind(String),
}

/// Errors a worker can hit while executing a single binary operation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ComputeError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("unknown operation")]
    UnknownOperation,
}

/// Errors raised by the task graph store.
///
/// `NodeNotFound`/`ExpressionNotFound` are expected under at-least-once
/// delivery — callers applying a duplicate result/error treat them as
/// idempotence guards, not failures (see design note on duplicate delivery).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("node not found")]
    NodeNotFound,
    #[error("expression not found")]
    ExpressionNotFound,
    #[error("invalid expression tree: {0}")]
    InvalidExpression(String),
}

/// Errors raised while validating a bearer token on the query API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid or expired token")]
    InvalidToken,
}
