// ============================================================
// Layer 5 — Grammar Model
// ============================================================
// Immutable context-free grammar shared by both recognizers.
//
//   NP -> 'DT' N        Rule { left: NP, right: [Term(DT), NonTerm(N)] }
//   E  -> ε             Rule { left: E,  right: [] }
//
// Grammar::new validates the rules once (start symbol defined, no
// undefined nonterminal on a right-hand side) and precomputes the
// rule index by left-hand side, the terminal set and the nullable
// nonterminals.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonTerminal(pub(crate) String);

impl NonTerminal {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for NonTerminal {
    fn from(value: &'a str) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A terminal symbol. In this crate terminals are POS tags.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Terminal(pub(crate) String);

impl Terminal {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl<'a> From<&'a str> for Terminal {
    fn from(value: &'a str) -> Self {
        Self(value.into())
    }
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.0)
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum Symbol {
    Term(Terminal),
    NonTerm(NonTerminal),
}

impl From<NonTerminal> for Symbol {
    fn from(value: NonTerminal) -> Self {
        Self::NonTerm(value)
    }
}

impl From<Terminal> for Symbol {
    fn from(value: Terminal) -> Self {
        Self::Term(value)
    }
}

/// A production `left -> right`. An empty `right` is the empty production.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Rule {
    pub left: NonTerminal,
    pub right: Vec<Symbol>,
}

impl Rule {
    pub fn new(left: impl Into<NonTerminal>, right: Vec<Symbol>) -> Self {
        Self {
            left: left.into(),
            right,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.left)?;
        if self.right.is_empty() {
            return write!(f, " ε");
        }
        for sym in &self.right {
            match sym {
                Symbol::Term(t) => write!(f, " {t}")?,
                Symbol::NonTerm(nt) => write!(f, " {nt}")?,
            }
        }
        Ok(())
    }
}

/// An immutable context-free grammar.
///
/// Invariants checked by [`Grammar::new`]: the start symbol has at least
/// one rule, and every nonterminal on a right-hand side has rules of its
/// own.
#[derive(Debug, Clone)]
pub struct Grammar {
    start: NonTerminal,
    rules: Vec<Rule>,
    // rule indices grouped by left-hand side, in definition order
    by_lhs: HashMap<NonTerminal, Vec<usize>>,
    terminals: HashSet<Terminal>,
    nullable: HashSet<NonTerminal>,
}

impl Grammar {
    pub fn new(start: NonTerminal, rules: Vec<Rule>) -> Result<Self, String> {
        let mut by_lhs: HashMap<NonTerminal, Vec<usize>> = HashMap::new();
        for (idx, rule) in rules.iter().enumerate() {
            by_lhs.entry(rule.left.clone()).or_default().push(idx);
        }

        if !by_lhs.contains_key(&start) {
            return Err(format!("start symbol '{start}' has no productions"));
        }

        let mut terminals = HashSet::new();
        for rule in &rules {
            for sym in &rule.right {
                match sym {
                    Symbol::Term(t) => {
                        terminals.insert(t.clone());
                    }
                    Symbol::NonTerm(nt) if !by_lhs.contains_key(nt) => {
                        return Err(format!(
                            "nonterminal '{nt}' is used in '{rule}' but never defined"
                        ));
                    }
                    Symbol::NonTerm(_) => {}
                }
            }
        }

        let nullable = compute_nullable(&rules);
        debug!(
            rules = rules.len(),
            nonterminals = by_lhs.len(),
            terminals = terminals.len(),
            nullable = nullable.len(),
            "grammar built"
        );

        Ok(Self {
            start,
            rules,
            by_lhs,
            terminals,
            nullable,
        })
    }

    pub fn start(&self) -> &NonTerminal {
        &self.start
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, idx: usize) -> &Rule {
        &self.rules[idx]
    }

    /// Indices of the rules whose left-hand side is `nt`.
    pub fn rules_for(&self, nt: &NonTerminal) -> &[usize] {
        self.by_lhs.get(nt).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn terminals(&self) -> &HashSet<Terminal> {
        &self.terminals
    }

    pub fn has_terminal(&self, name: &str) -> bool {
        self.terminals.contains(&Terminal::new(name))
    }

    /// True if `nt` derives the empty sequence.
    pub fn is_nullable(&self, nt: &NonTerminal) -> bool {
        self.nullable.contains(nt)
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "%start {}", self.start)?;
        for rule in &self.rules {
            writeln!(f, "{rule}")?;
        }
        Ok(())
    }
}

fn compute_nullable(rules: &[Rule]) -> HashSet<NonTerminal> {
    let mut nullable = HashSet::new();
    loop {
        let mut changed = false;
        for rule in rules {
            if nullable.contains(&rule.left) {
                continue;
            }
            let all_nullable = rule.right.iter().all(|sym| match sym {
                Symbol::NonTerm(nt) => nullable.contains(nt),
                Symbol::Term(_) => false,
            });
            if all_nullable {
                nullable.insert(rule.left.clone());
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nt(s: &str) -> Symbol {
        Symbol::NonTerm(NonTerminal::new(s))
    }

    fn t(s: &str) -> Symbol {
        Symbol::Term(Terminal::new(s))
    }

    #[test]
    fn test_grammar_indexes_rules_and_terminals() {
        let g = Grammar::new(
            "S".into(),
            vec![
                Rule::new("S", vec![nt("NP"), nt("VP")]),
                Rule::new("NP", vec![t("DT"), t("NN")]),
                Rule::new("VP", vec![t("VBZ")]),
            ],
        )
        .unwrap();

        assert_eq!(g.rules_for(&"S".into()), &[0]);
        assert!(g.has_terminal("DT"));
        assert!(!g.has_terminal("JJR"));
        assert_eq!(g.terminals().len(), 3);
        assert!(g.rules_for(&"X".into()).is_empty());
    }

    #[test]
    fn test_start_without_rules_is_rejected() {
        let err = Grammar::new("S".into(), vec![Rule::new("A", vec![t("x")])]).unwrap_err();
        assert!(err.contains("start symbol"));
    }

    #[test]
    fn test_undefined_nonterminal_is_rejected() {
        let err = Grammar::new("S".into(), vec![Rule::new("S", vec![nt("B")])]).unwrap_err();
        assert!(err.contains("'B'"));
    }

    #[test]
    fn test_nullable_is_transitive() {
        let g = Grammar::new(
            "S".into(),
            vec![
                Rule::new("S", vec![nt("A"), nt("B")]),
                Rule::new("A", vec![]),
                Rule::new("B", vec![nt("A")]),
                Rule::new("B", vec![t("b")]),
                Rule::new("C", vec![t("c"), nt("A")]),
            ],
        )
        .unwrap();

        assert!(g.is_nullable(&"A".into()));
        assert!(g.is_nullable(&"B".into()));
        assert!(g.is_nullable(&"S".into()));
        assert!(!g.is_nullable(&"C".into()));
    }

    #[test]
    fn test_rule_display() {
        let r = Rule::new("NP", vec![t("DT"), nt("N")]);
        assert_eq!(r.to_string(), "NP -> 'DT' N");
        assert_eq!(Rule::new("E", vec![]).to_string(), "E -> ε");
    }
}
