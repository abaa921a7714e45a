// ============================================================
// Layer 5 — CYK Recognizer (binary normal form)
// ============================================================
// CYK without a full Chomsky-normal-form conversion. The grammar
// is only binarised, so every right-hand side has at most two
// symbols (2NF):
//
//   A -> X1 X2 X3 X4   becomes   A  -> X1 H1
//                                H1 -> X2 H2
//                                H2 -> X3 X4
//
// Empty and unit productions stay. They are handled by the
// "unit relation" A ⇒ X, which holds when
//
//   A -> X            is a rule, or
//   A -> X Y / Y X    is a rule and Y is nullable.
//
// Each table cell holds every symbol (terminals included) that
// derives that span. After a cell is filled from binary rules it
// is closed under the inverse of ⇒*, which is precomputed per
// symbol. The empty sequence is accepted iff the start symbol is
// nullable.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tracing::debug;

use crate::domain::error::RecognitionError;
use crate::domain::traits::Recognizer;
use crate::parsing::budget::Deadline;
use crate::parsing::grammar::{Grammar, Symbol};

type SymId = usize;

/// CYK recognizer over a binarised copy of the grammar.
pub struct CykRecognizer {
    timeout: Option<Duration>,
    start: SymId,
    terminal_ids: HashMap<String, SymId>,
    // (B, C) -> every A with a rule A -> B C
    binary: HashMap<(SymId, SymId), Vec<SymId>>,
    // X -> every A with A ⇒* X, X included
    derivers: Vec<Vec<SymId>>,
    nullable: Vec<bool>,
}

impl CykRecognizer {
    pub fn new(grammar: &Grammar) -> Self {
        let mut ids = SymbolIds::default();
        let start = ids.nonterminal(grammar.start().name());

        // 2NF rules: (lhs, rhs) with rhs.len() <= 2
        let mut rules: Vec<(SymId, Vec<SymId>)> = Vec::new();
        for rule in grammar.rules() {
            let lhs = ids.nonterminal(rule.left.name());
            let rhs: Vec<SymId> = rule
                .right
                .iter()
                .map(|sym| match sym {
                    Symbol::Term(t) => ids.terminal(t.name()),
                    Symbol::NonTerm(nt) => ids.nonterminal(nt.name()),
                })
                .collect();
            binarize(lhs, &rhs, &mut ids, &mut rules);
        }

        let count = ids.count;
        let nullable = nullable_symbols(count, &rules);

        let mut binary: HashMap<(SymId, SymId), Vec<SymId>> = HashMap::new();
        // parents[x] = every A with A ⇒ x in one step
        let mut parents: Vec<Vec<SymId>> = vec![Vec::new(); count];
        for (lhs, rhs) in &rules {
            match rhs.as_slice() {
                [] => {}
                [x] => parents[*x].push(*lhs),
                [x, y] => {
                    binary.entry((*x, *y)).or_default().push(*lhs);
                    if nullable[*y] {
                        parents[*x].push(*lhs);
                    }
                    if nullable[*x] {
                        parents[*y].push(*lhs);
                    }
                }
                _ => unreachable!("binarize emits at most two symbols per rule"),
            }
        }

        let derivers = (0..count).map(|x| reachable_from(x, &parents)).collect();

        debug!(
            symbols = count,
            binary_rules = rules.len(),
            "cyk tables built"
        );

        Self {
            timeout: None,
            start,
            terminal_ids: ids.terminals,
            binary,
            derivers,
            nullable,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn close(&self, seeds: impl IntoIterator<Item = SymId>) -> HashSet<SymId> {
        let mut cell = HashSet::new();
        for x in seeds {
            cell.extend(self.derivers[x].iter().copied());
        }
        cell
    }
}

impl Recognizer for CykRecognizer {
    fn recognize(&self, tokens: &[String]) -> Result<bool, RecognitionError> {
        let mut word = Vec::with_capacity(tokens.len());
        for tok in tokens {
            match self.terminal_ids.get(tok.as_str()) {
                Some(&id) => word.push(id),
                None => {
                    debug!("rejecting sequence: '{}' is not a terminal of the grammar", tok);
                    return Ok(false);
                }
            }
        }

        let deadline = Deadline::start(self.timeout);
        deadline.check()?;

        let n = word.len();
        if n == 0 {
            return Ok(self.nullable[self.start]);
        }

        // table[len - 1][i] = symbols deriving word[i .. i + len]
        let mut table: Vec<Vec<HashSet<SymId>>> = Vec::with_capacity(n);
        table.push(word.iter().map(|&t| self.close([t])).collect());

        for len in 2..=n {
            deadline.check()?;
            let mut row = Vec::with_capacity(n - len + 1);
            for i in 0..=(n - len) {
                let mut found = Vec::new();
                for split in 1..len {
                    let left = &table[split - 1][i];
                    let right = &table[len - split - 1][i + split];
                    for &b in left {
                        for &c in right {
                            if let Some(heads) = self.binary.get(&(b, c)) {
                                found.extend_from_slice(heads);
                            }
                        }
                    }
                }
                row.push(self.close(found));
            }
            table.push(row);
        }

        let accepted = table[n - 1][0].contains(&self.start);
        debug!(tokens = n, accepted, "cyk recognition finished");
        Ok(accepted)
    }

    fn name(&self) -> &'static str {
        "cyk"
    }
}

#[derive(Default)]
struct SymbolIds {
    count: usize,
    nonterminals: HashMap<String, SymId>,
    terminals: HashMap<String, SymId>,
}

impl SymbolIds {
    fn nonterminal(&mut self, name: &str) -> SymId {
        if let Some(&id) = self.nonterminals.get(name) {
            return id;
        }
        let id = self.fresh();
        self.nonterminals.insert(name.to_string(), id);
        id
    }

    fn terminal(&mut self, name: &str) -> SymId {
        if let Some(&id) = self.terminals.get(name) {
            return id;
        }
        let id = self.fresh();
        self.terminals.insert(name.to_string(), id);
        id
    }

    fn fresh(&mut self) -> SymId {
        let id = self.count;
        self.count += 1;
        id
    }
}

fn binarize(lhs: SymId, rhs: &[SymId], ids: &mut SymbolIds, out: &mut Vec<(SymId, Vec<SymId>)>) {
    if rhs.len() <= 2 {
        out.push((lhs, rhs.to_vec()));
        return;
    }
    let mut head = lhs;
    for &sym in &rhs[..rhs.len() - 2] {
        let helper = ids.fresh();
        out.push((head, vec![sym, helper]));
        head = helper;
    }
    out.push((head, rhs[rhs.len() - 2..].to_vec()));
}

fn nullable_symbols(count: usize, rules: &[(SymId, Vec<SymId>)]) -> Vec<bool> {
    let mut nullable = vec![false; count];
    loop {
        let mut changed = false;
        for (lhs, rhs) in rules {
            if !nullable[*lhs] && rhs.iter().all(|&s| nullable[s]) {
                nullable[*lhs] = true;
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

fn reachable_from(x: SymId, parents: &[Vec<SymId>]) -> Vec<SymId> {
    let mut seen = HashSet::from([x]);
    let mut stack = vec![x];
    while let Some(s) = stack.pop() {
        for &p in &parents[s] {
            if seen.insert(p) {
                stack.push(p);
            }
        }
    }
    seen.into_iter().collect()
}
