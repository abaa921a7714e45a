// ============================================================
// Layer 5 — Grammar Loader
// ============================================================
// Reads a plain-text CFG in NLTK-style notation:
//
//   # a toy grammar
//   %start S                 (optional; default is the first LHS)
//   S  -> NP VP
//   NP -> DT NN | DT JJ NN
//       | PRP                (continuation of the NP alternatives)
//   VP -> VBZ | VBZ NP
//   OPT -> 'RB' |            (empty alternative = ε)
//
// Symbol conventions:
//   'x' or "x"  → always a terminal
//   bare name   → a nonterminal if it appears on some LHS,
//                 otherwise a terminal (a POS tag)
//   ε           → explicit empty alternative
//
// Loading is two passes: first every line is tokenised into
// statements, then bare names are resolved against the set of
// defined left-hand sides.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::error::EvalError;
use crate::parsing::grammar::{Grammar, NonTerminal, Rule, Symbol, Terminal};

const EPSILON: &str = "ε";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Arrow,
    Pipe,
    Quoted(String),
    Bare(String),
}

/// One `LHS -> ...` statement, with any continuation lines merged in.
#[derive(Debug)]
struct Statement {
    line: usize,
    lhs: String,
    alternatives: Vec<Vec<Token>>,
}

/// Read and parse a grammar file.
pub fn load_grammar_file(path: impl AsRef<Path>) -> Result<Grammar, EvalError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| EvalError::GrammarNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let grammar = load_grammar(&text)?;
    info!(
        "Loaded grammar from '{}': {} rules, {} terminals, start symbol {}",
        path.display(),
        grammar.rules().len(),
        grammar.terminals().len(),
        grammar.start()
    );
    Ok(grammar)
}

/// Parse grammar text into an immutable [`Grammar`].
pub fn load_grammar(text: &str) -> Result<Grammar, EvalError> {
    let mut statements: Vec<Statement> = Vec::new();
    let mut start: Option<(usize, String)> = None;
    let mut line_count = 0;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        line_count = line_no;
        let tokens = tokenize(raw, line_no)?;

        match tokens.first() {
            None => continue,

            Some(Token::Bare(word)) if word == "%start" => {
                if start.is_some() {
                    return Err(EvalError::grammar_format(line_no, "duplicate %start directive"));
                }
                match &tokens[1..] {
                    [Token::Bare(sym)] => start = Some((line_no, sym.clone())),
                    _ => {
                        return Err(EvalError::grammar_format(
                            line_no,
                            "%start expects exactly one nonterminal name",
                        ))
                    }
                }
            }

            Some(Token::Pipe) => {
                let Some(last) = statements.last_mut() else {
                    return Err(EvalError::grammar_format(
                        line_no,
                        "continuation line '|' has no preceding production",
                    ));
                };
                last.alternatives.extend(split_alternatives(&tokens[1..], line_no)?);
            }

            Some(Token::Bare(lhs)) => {
                if lhs.starts_with('%') {
                    return Err(EvalError::grammar_format(
                        line_no,
                        format!("unknown directive '{lhs}'"),
                    ));
                }
                if tokens.get(1) != Some(&Token::Arrow) {
                    return Err(EvalError::grammar_format(
                        line_no,
                        format!("expected '->' after '{lhs}'"),
                    ));
                }
                statements.push(Statement {
                    line: line_no,
                    lhs: lhs.clone(),
                    alternatives: split_alternatives(&tokens[2..], line_no)?,
                });
            }

            Some(Token::Quoted(q)) => {
                return Err(EvalError::grammar_format(
                    line_no,
                    format!("left-hand side must be a bare nonterminal, found '{q}'"),
                ))
            }

            Some(Token::Arrow) => {
                return Err(EvalError::grammar_format(line_no, "missing left-hand side before '->'"))
            }
        }
    }

    let first = statements.first().ok_or_else(|| {
        EvalError::grammar_format(line_count.max(1), "grammar defines no productions")
    })?;
    let first_line = first.line;

    let defined: HashSet<&str> = statements.iter().map(|s| s.lhs.as_str()).collect();

    let start = match &start {
        Some((line, sym)) if !defined.contains(sym.as_str()) => {
            return Err(EvalError::grammar_format(
                *line,
                format!("start symbol '{sym}' has no productions"),
            ))
        }
        Some((_, sym)) => NonTerminal::new(sym.as_str()),
        None => NonTerminal::new(first.lhs.as_str()),
    };

    let mut rules = Vec::new();
    for stmt in &statements {
        for alt in &stmt.alternatives {
            let right = alt
                .iter()
                .map(|tok| resolve(tok, &defined))
                .collect::<Vec<_>>();
            rules.push(Rule::new(NonTerminal::new(stmt.lhs.as_str()), right));
        }
    }

    Grammar::new(start, rules).map_err(|msg| EvalError::grammar_format(first_line, msg))
}

fn resolve(tok: &Token, defined: &HashSet<&str>) -> Symbol {
    match tok {
        Token::Quoted(t) => Symbol::Term(Terminal::new(t.as_str())),
        Token::Bare(name) if defined.contains(name.as_str()) => {
            Symbol::NonTerm(NonTerminal::new(name.as_str()))
        }
        Token::Bare(name) => {
            debug!("treating undefined bare symbol '{}' as a terminal", name);
            Symbol::Term(Terminal::new(name.as_str()))
        }
        // split_alternatives never yields these
        Token::Arrow | Token::Pipe => unreachable!("structural token in alternative"),
    }
}

/// Split right-hand side tokens on `|`. Each piece is one alternative;
/// an empty piece (or a lone `ε`) is the empty production.
fn split_alternatives(tokens: &[Token], line_no: usize) -> Result<Vec<Vec<Token>>, EvalError> {
    let mut alternatives = Vec::new();
    for piece in tokens.split(|t| *t == Token::Pipe) {
        if piece.iter().any(|t| *t == Token::Arrow) {
            return Err(EvalError::grammar_format(line_no, "unexpected '->' on right-hand side"));
        }
        let is_epsilon = |t: &Token| matches!(t, Token::Bare(b) if b == EPSILON);
        match piece {
            [only] if is_epsilon(only) => alternatives.push(Vec::new()),
            _ if piece.iter().any(is_epsilon) => {
                return Err(EvalError::grammar_format(
                    line_no,
                    "'ε' must be the only symbol of its alternative",
                ))
            }
            _ => alternatives.push(piece.to_vec()),
        }
    }
    Ok(alternatives)
}

fn tokenize(line: &str, line_no: usize) -> Result<Vec<Token>, EvalError> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some(&(i, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        match c {
            '#' => break,
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '-' if line[i..].starts_with("->") => {
                chars.next();
                chars.next();
                tokens.push(Token::Arrow);
            }
            '\'' | '"' => {
                chars.next();
                let body_start = i + c.len_utf8();
                let mut body_end = None;
                for (j, d) in chars.by_ref() {
                    if d == c {
                        body_end = Some(j);
                        break;
                    }
                }
                let body_end = body_end.ok_or_else(|| {
                    EvalError::grammar_format(
                        line_no,
                        format!("unterminated quote starting at column {}", i + 1),
                    )
                })?;
                let body = &line[body_start..body_end];
                if body.is_empty() {
                    return Err(EvalError::grammar_format(line_no, "empty quoted terminal"));
                }
                tokens.push(Token::Quoted(body.to_string()));
            }
            _ => {
                let mut end = line.len();
                while let Some(&(j, d)) = chars.peek() {
                    if d.is_whitespace()
                        || matches!(d, '|' | '#' | '\'' | '"')
                        || line[j..].starts_with("->")
                    {
                        end = j;
                        break;
                    }
                    chars.next();
                }
                tokens.push(Token::Bare(line[i..end].to_string()));
            }
        }
    }

    Ok(tokens)
}
