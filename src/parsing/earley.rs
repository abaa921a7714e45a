// ============================================================
// Layer 5 — Earley Recognizer
// ============================================================
// Classic Earley chart recognition with the Aycock–Horspool
// treatment of nullable nonterminals:
//
//   chart[i] holds items (A -> α • β, origin)
//
//   predict   A -> α • B β   add every B -> • γ at i,
//                            and if B is nullable also
//                            A -> α B • β at i
//   scan      A -> α • a β   if tokens[i] == a, add
//                            A -> α a • β to chart[i+1]
//   complete  B -> γ •       advance every item in
//                            chart[origin] waiting on B
//
// The sequence is accepted when chart[n] contains a completed
// start rule with origin 0. Items are deduplicated per set, so
// every set is finite and highly ambiguous grammars still run
// in O(n³).

use std::collections::HashSet;
use std::time::Duration;

use tracing::debug;

use crate::domain::error::RecognitionError;
use crate::domain::traits::Recognizer;
use crate::parsing::budget::Deadline;
use crate::parsing::grammar::{Grammar, NonTerminal, Symbol};

// How many items to process between deadline checks
const DEADLINE_STRIDE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Item {
    rule: usize,
    dot: usize,
    origin: usize,
}

impl Item {
    fn advance(self) -> Self {
        Self {
            dot: self.dot + 1,
            ..self
        }
    }
}

#[derive(Debug, Default)]
struct ItemSet {
    items: Vec<Item>,
    seen: HashSet<Item>,
}

impl ItemSet {
    fn push(&mut self, item: Item) {
        if self.seen.insert(item) {
            self.items.push(item);
        }
    }
}

/// Earley recognizer over an owned grammar.
pub struct EarleyRecognizer {
    grammar: Grammar,
    timeout: Option<Duration>,
}

impl EarleyRecognizer {
    pub fn new(grammar: Grammar) -> Self {
        Self {
            grammar,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn waits_on(&self, item: Item, nt: &NonTerminal) -> bool {
        matches!(
            self.grammar.rule(item.rule).right.get(item.dot),
            Some(Symbol::NonTerm(next)) if next == nt
        )
    }

    fn is_accepting(&self, item: Item) -> bool {
        let rule = self.grammar.rule(item.rule);
        item.origin == 0 && item.dot == rule.right.len() && &rule.left == self.grammar.start()
    }
}

impl Recognizer for EarleyRecognizer {
    fn recognize(&self, tokens: &[String]) -> Result<bool, RecognitionError> {
        if let Some(unknown) = tokens.iter().find(|t| !self.grammar.has_terminal(t)) {
            debug!("rejecting sequence: '{}' is not a terminal of the grammar", unknown);
            return Ok(false);
        }

        let deadline = Deadline::start(self.timeout);
        let n = tokens.len();
        let mut chart: Vec<ItemSet> = (0..=n).map(|_| ItemSet::default()).collect();

        for &rule in self.grammar.rules_for(self.grammar.start()) {
            chart[0].push(Item {
                rule,
                dot: 0,
                origin: 0,
            });
        }

        let mut processed = 0usize;
        for i in 0..=n {
            let mut j = 0;
            while j < chart[i].items.len() {
                if processed % DEADLINE_STRIDE == 0 {
                    deadline.check()?;
                }
                processed += 1;

                let item = chart[i].items[j];
                j += 1;
                let rule = self.grammar.rule(item.rule);

                match rule.right.get(item.dot) {
                    None => {
                        // chart[origin] may be chart[i] itself, which grows as we go
                        let mut k = 0;
                        while k < chart[item.origin].items.len() {
                            let waiting = chart[item.origin].items[k];
                            k += 1;
                            if self.waits_on(waiting, &rule.left) {
                                chart[i].push(waiting.advance());
                            }
                        }
                    }
                    Some(Symbol::NonTerm(nt)) => {
                        for &r in self.grammar.rules_for(nt) {
                            chart[i].push(Item {
                                rule: r,
                                dot: 0,
                                origin: i,
                            });
                        }
                        if self.grammar.is_nullable(nt) {
                            chart[i].push(item.advance());
                        }
                    }
                    Some(Symbol::Term(t)) => {
                        if i < n && tokens[i] == t.name() {
                            chart[i + 1].push(item.advance());
                        }
                    }
                }
            }
        }

        let accepted = chart[n].items.iter().any(|&item| self.is_accepting(item));
        debug!(tokens = n, items = processed, accepted, "earley recognition finished");
        Ok(accepted)
    }

    fn name(&self) -> &'static str {
        "earley"
    }
}
