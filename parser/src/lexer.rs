// Copyright (c) 2026 The Distcalc Authors
// SPDX-License-Identifier: MIT

use std::iter::Peekable;
use std::str::Chars;

use distcalc_errors::LexError;

use crate::token::Token;

/// Eats digit+ starting at the current position. Caller guarantees the
/// first character is a digit.
fn eat_digits(input: &mut Peekable<Chars>, out: &mut String) {
    while let Some(c) = input.next_if(|c| c.is_ascii_digit()) {
        out.push(c);
    }
}

/// Eats a number matching `digit+ ([.,] digit+)?`. See §4.A: exactly one
/// decimal separator, `,` accepted equivalently to `.`.
fn eat_number(input: &mut Peekable<Chars>) -> Result<Token, LexError> {
    let mut repr = String::new();
    eat_digits(input, &mut repr);

    if matches!(input.peek(), Some('.') | Some(',')) {
        let sep = input.next().unwrap();
        repr.push(sep);

        let before_fraction = repr.len();
        eat_digits(input, &mut repr);
        if repr.len() == before_fraction {
            if let Some(&c) = input.peek() {
                return Err(LexError::UnexpectedChar(c));
            }
        }

        if matches!(input.peek(), Some('.') | Some(',')) {
            return Err(LexError::ItIsNotANumber(repr));
        }
    }

    // `.`/`,` were only ever accepted as decimal separators above, so a plain
    // ASCII-digit parse with `.` normalized in is always well-formed here.
    let normalized = repr.replace(',', ".");
    normalized
        .parse::<f64>()
        .map(Token::Number)
        .map_err(|_| LexError::ItIsNotANumber(repr))
}

/// Eats a single token from the front of `input`. Whitespace is assumed to
/// already have been stripped by the caller (§4.A).
fn eat(input: &mut Peekable<Chars>) -> Result<Token, LexError> {
    let single = |input: &mut Peekable<Chars>, token| {
        input.next();
        Ok(token)
    };

    match *input.peek().expect("eat called on empty input") {
        '+' => single(input, Token::Plus),
        '-' => single(input, Token::Minus),
        '*' => single(input, Token::Star),
        '/' => single(input, Token::Slash),
        '(' => single(input, Token::LParen),
        ')' => single(input, Token::RParen),
        c if c.is_ascii_digit() => eat_number(input),
        c => Err(LexError::UnexpectedChar(c)),
    }
}

/// Turns source text into a token stream terminated by `Token::Eof`.
///
/// Whitespace is stripped before scanning begins; the lexer itself never
/// sees or emits whitespace tokens.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let stripped: String = source.chars().filter(|c| !c.is_whitespace()).collect();
    let mut input = stripped.chars().peekable();
    let mut tokens = Vec::new();

    while input.peek().is_some() {
        tokens.push(eat(&mut input)?);
    }
    tokens.push(Token::Eof);
    Ok(tokens)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lexes_operators_and_numbers() {
        let tokens = lex("12+3.5*(2-1)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Number(12.0),
                Token::Plus,
                Token::Number(3.5),
                Token::Star,
                Token::LParen,
                Token::Number(2.0),
                Token::Minus,
                Token::Number(1.0),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn comma_is_a_decimal_separator() {
        assert_eq!(lex("1,5").unwrap(), vec![Token::Number(1.5), Token::Eof]);
    }

    #[test]
    fn strips_whitespace() {
        assert_eq!(
            lex(" 1 + 2 ").unwrap(),
            vec![Token::Number(1.0), Token::Plus, Token::Number(2.0), Token::Eof]
        );
    }

    #[test]
    fn rejects_second_decimal_separator() {
        assert_eq!(lex("1.2.3"), Err(LexError::ItIsNotANumber("1.2".to_string())));
    }

    #[test]
    fn rejects_lone_separator() {
        assert_eq!(lex("."), Err(LexError::UnexpectedChar('.')));
        assert_eq!(lex(","), Err(LexError::UnexpectedChar(',')));
    }

    #[test]
    fn rejects_unknown_char() {
        assert_eq!(lex("1@2"), Err(LexError::UnexpectedChar('@')));
    }
}
