use crate::formula::{Formula, Literal};

/// Picks the decision literal: the first literal of the shortest clause, preferring the earliest
/// clause among equally short ones. `None` if the formula has no clauses left.
pub(crate) fn choose_literal(formula: &Formula) -> Option<Literal> {
    formula
        .clauses()
        .min_by_key(|clause| clause.len())
        .and_then(|clause| clause.literals().next())
        .copied()
}
