use super::{Clause, Formula, Literal};
use log::trace;
use std::rc::Rc;

/// Some clause was reduced to the empty clause: the formula is false under the literals asserted
/// so far.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Conflict;

impl Formula {
    /// Rewrites the formula under the assertion that `literal` is true. Clauses containing
    /// `literal` are dropped and its negation is removed from the remaining clauses.
    ///
    /// Fails as soon as a clause becomes empty. The formula is then replaced by the single empty
    /// clause and should be discarded.
    pub fn simplify(&mut self, literal: Literal) -> Result<(), Conflict> {
        let negated = literal.negated();
        let mut kept = Vec::with_capacity(self.len());

        for clause in std::mem::take(&mut self.clauses) {
            if clause.contains(&literal) {
                continue;
            }
            if !clause.contains(&negated) {
                kept.push(clause);
                continue;
            }
            let shortened = clause.without(&negated);
            if shortened.is_empty() {
                trace!("conflict: {} falsified {}", literal, clause);
                self.clauses = vec![Rc::new(shortened)];
                return Err(Conflict);
            }
            kept.push(Rc::new(shortened));
        }

        self.clauses = kept;
        Ok(())
    }

    pub(crate) fn has_empty_clause(&self) -> bool {
        self.clauses().any(Clause::is_empty)
    }
}
