use crate::formula::{Literal, Variable};

/// Truth values of the variables assigned along one search path.
#[derive(Clone, Debug)]
pub(crate) struct Assignment {
    values: Vec<Option<bool>>,
    // Assigned literals in the order they were assigned
    trail: Vec<Literal>,
}

impl Assignment {
    /// An empty assignment for variables `0..=num_variables`.
    pub(crate) fn new(num_variables: usize) -> Self {
        Self {
            values: vec![None; num_variables + 1],
            trail: vec![],
        }
    }

    pub(crate) fn value(&self, variable: Variable) -> Option<bool> {
        self.values.get(variable.0).copied().flatten()
    }

    pub(crate) fn assign(&mut self, literal: Literal) {
        debug_assert_eq!(
            self.value(*literal.variable()),
            None,
            "variable {} assigned twice",
            literal.idx()
        );
        self.values[literal.idx()] = Some(literal.is_positive());
        self.trail.push(literal);
    }

    pub(crate) fn trail(&self) -> &[Literal] {
        &self.trail
    }

    /// The assigned literals ordered by variable.
    pub(crate) fn into_model(self) -> Vec<Literal> {
        self.values
            .into_iter()
            .enumerate()
            .filter_map(|(x, value)| match value {
                Some(true) => Some(Literal::Positive(Variable(x))),
                Some(false) => Some(Literal::Negative(Variable(x))),
                None => None,
            })
            .collect()
    }
}
