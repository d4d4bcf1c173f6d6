mod assignment;
mod branch;
mod propagate;

use crate::formula::{Formula, Literal};
use crate::SatResult;
use assignment::Assignment;
use log::{debug, trace};

/// Counters describing one run of [`Solver::solve`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Statistics {
    pub decisions: usize,
    pub unit_propagations: usize,
    pub pure_literals: usize,
    pub conflicts: usize,
    pub max_depth: usize,
}

/// A DPLL solver: unit propagation and pure literal elimination to a fixed point, then a split on
/// the first literal of the shortest clause, trying the positive polarity first.
///
/// The search is deterministic. Solving the same formula twice explores the same branches and
/// returns the same model.
pub struct Solver {
    formula: Formula,
    stats: Statistics,
}

impl Solver {
    pub fn new(formula: Formula) -> Self {
        Self {
            formula,
            stats: Statistics::default(),
        }
    }

    pub fn solve(&mut self) -> SatResult {
        let mut search = Search::new(self.formula.clone());
        let result = loop {
            match search.step() {
                Step::Searching => continue,
                Step::Satisfied(assignment) => {
                    trace!("satisfied by {:?}", assignment.trail());
                    break SatResult::Satisfiable(assignment.into_model());
                }
                Step::Exhausted => break SatResult::Unsatisfiable,
            }
        };
        self.stats = search.stats;
        debug!(
            "{} after {:?}",
            if result.is_satisfiable() { "SAT" } else { "UNSAT" },
            self.stats
        );
        result
    }

    /// Counters of the most recent call to [`Solver::solve`].
    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }
}

/// Decides `formula`, returning a model when it is satisfiable.
pub fn solve(formula: Formula) -> SatResult {
    Solver::new(formula).solve()
}

/// A pending branch of the search tree. Every node owns its formula and assignment.
#[derive(Debug)]
struct Node {
    formula: Formula,
    assignment: Assignment,
    decision: Option<Literal>,
    depth: usize,
}

#[derive(Debug)]
enum Step {
    Searching,
    Satisfied(Assignment),
    Exhausted,
}

/// Depth-first traversal of the search tree with an explicit stack. The stack holds the positive
/// branch of the latest decision on top of the negative branches still to be explored.
struct Search {
    stack: Vec<Node>,
    num_variables: usize,
    stats: Statistics,
}

impl Search {
    fn new(formula: Formula) -> Self {
        let num_variables = formula.num_variables();
        let root = Node {
            assignment: Assignment::new(num_variables),
            formula,
            decision: None,
            depth: 0,
        };
        Self {
            stack: vec![root],
            num_variables,
            stats: Statistics::default(),
        }
    }

    fn step(&mut self) -> Step {
        let mut node = match self.stack.pop() {
            Some(node) => node,
            None => return Step::Exhausted,
        };

        if let Some(decision) = node.decision {
            trace!("decision {} at depth {}", decision, node.depth);
            self.stats.decisions += 1;
            node.assignment.assign(decision);
            if node.formula.simplify(decision).is_err() {
                self.stats.conflicts += 1;
                return Step::Searching;
            }
        }

        if propagate::propagate(&mut node.formula, &mut node.assignment, &mut self.stats).is_err() {
            self.stats.conflicts += 1;
            return Step::Searching;
        }

        match branch::choose_literal(&node.formula) {
            None => Step::Satisfied(node.assignment),
            Some(literal) => {
                // Every decision assigns a fresh variable
                debug_assert!(node.depth <= self.num_variables);
                let depth = node.depth + 1;
                self.stats.max_depth = self.stats.max_depth.max(depth);

                let negative = Node {
                    formula: node.formula.clone(),
                    assignment: node.assignment.clone(),
                    decision: Some(literal.negated()),
                    depth,
                };
                let positive = Node {
                    decision: Some(literal),
                    depth,
                    ..node
                };
                self.stack.push(negative);
                self.stack.push(positive);
                Step::Searching
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brute_force::solve_brute_force;
    use crate::formula::{cnf, formula_3sat_strategy, n, p, Clause, Literal, Variable};
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use test_env_log::test;

    fn check_model(f: &Formula) -> Vec<Literal> {
        let model = solve(f.clone()).model().expect("expected SAT").to_vec();
        assert!(f.is_satisfied_by(&model), "{:?} does not satisfy {}", model, f);
        model
    }

    #[test]
    fn empty_formula() {
        assert_eq!(solve(cnf(&[])).into_parts(), (true, Some(vec![])));
    }

    #[test]
    fn empty_clause() {
        assert_eq!(solve(cnf(&[&[]])).into_parts(), (false, None));

        let mut solver = Solver::new(cnf(&[&[1, 2], &[]]));
        assert_eq!(solver.solve(), SatResult::Unsatisfiable);
        assert_eq!(solver.statistics().decisions, 0);
    }

    #[test]
    fn unit_chain() {
        let f = cnf(&[&[1], &[-1, 2], &[-2, 3]]);
        assert_eq!(solve(f).into_parts(), (true, Some(vec![p(1), p(2), p(3)])));
    }

    #[test]
    fn direct_contradiction() {
        assert_eq!(solve(cnf(&[&[1], &[-1]])).into_parts(), (false, None));
    }

    #[test]
    fn pure_literal_only() {
        let f = cnf(&[&[1, 2], &[1, -2]]);
        assert_eq!(check_model(&f), vec![p(1)]);
    }

    #[test]
    fn solve_bcp_sat() {
        let f = cnf(&[&[1, 2], &[-1]]);
        assert_eq!(check_model(&f), vec![n(1), p(2)]);
    }

    #[test]
    fn solve_bcp_unsat() {
        let f = cnf(&[&[1, 2], &[-1], &[-2]]);
        assert_eq!(solve(f), SatResult::Unsatisfiable);
    }

    #[test]
    fn solve_conflict_sat() {
        let f = cnf(&[&[1, 2, 3], &[-1, -2, 3], &[-2, -3]]);
        check_model(&f);
    }

    #[test]
    fn positive_branch_first() {
        // No units and no pure literals: the search has to split on 1
        let f = cnf(&[&[1, 2], &[-1, 3], &[-2, -3], &[1, -3]]);
        let mut solver = Solver::new(f.clone());
        let model = solver.solve().model().expect("expected SAT").to_vec();
        assert!(f.is_satisfied_by(&model));
        assert_eq!(model, vec![p(1), n(2), p(3)]);
        assert_eq!(solver.statistics().decisions, 1);
        assert_eq!(solver.statistics().conflicts, 0);
    }

    #[test]
    fn negative_branch_after_conflict() {
        // Deciding 1 forces 3 and -3; deciding -1 forces 2 and 4
        let f = cnf(&[&[1, 2], &[-1, 3], &[-1, -3], &[-2, 4], &[-4, 2, 5], &[-5, 4]]);
        let mut solver = Solver::new(f.clone());
        let model = solver.solve().model().expect("expected SAT").to_vec();
        assert!(f.is_satisfied_by(&model));
        assert!(model.contains(&n(1)));
        assert_eq!(solver.statistics().conflicts, 1);
    }

    #[test]
    fn unsat_requires_both_branches() {
        let f = cnf(&[&[1, 2], &[-1, 3], &[-1, -3], &[-2, 4], &[-2, -4]]);
        let mut solver = Solver::new(f);
        assert_eq!(solver.solve(), SatResult::Unsatisfiable);
        assert_eq!(solver.statistics().decisions, 2);
        assert_eq!(solver.statistics().conflicts, 2);
    }

    #[test]
    fn negative_branch_sees_pre_decision_formula() {
        let f = cnf(&[&[1, 2], &[-1, 3], &[-1, -3], &[-2, 4], &[-2, -4]]);
        let mut search = Search::new(f.clone());

        // The root has nothing to propagate and splits on 1
        assert!(matches!(search.step(), Step::Searching));
        assert_eq!(search.stack.len(), 2);
        let before_decision = search.stack[0].formula.clone();
        assert_eq!(before_decision, f);

        // 1 leads to a conflict on 3
        assert!(matches!(search.step(), Step::Searching));
        assert_eq!(search.stats.conflicts, 1);
        assert_eq!(search.stack.len(), 1);

        let negative = &search.stack[0];
        assert_eq!(negative.decision, Some(n(1)));
        assert_eq!(negative.formula, before_decision);
        assert_eq!(negative.assignment.trail().len(), 0);

        assert!(matches!(search.step(), Step::Searching));
        assert!(matches!(search.step(), Step::Exhausted));
    }

    #[test]
    fn solve_duplicate_literals() {
        let f = Formula::new(vec![
            Clause::new(vec![n(1), n(1), n(1)]),
            Clause::new(vec![n(1), n(2), n(2)]),
            Clause::new(vec![n(2), p(3), p(4)]),
            Clause::new(vec![n(2), p(4), n(4)]),
        ]);
        check_model(&f);
    }

    #[test]
    fn solve_tautologies() {
        use Literal::*;

        let f = Formula::new(vec![
            Clause::new(vec![Negative(Variable(1)), Positive(Variable(1)), Negative(Variable(7))]),
            Clause::new(vec![Negative(Variable(10)), Negative(Variable(13)), Negative(Variable(1))]),
            Clause::new(vec![Negative(Variable(7)), Negative(Variable(7)), Negative(Variable(10))]),
            Clause::new(vec![Positive(Variable(6)), Negative(Variable(9)), Negative(Variable(15))]),
            Clause::new(vec![Negative(Variable(2)), Negative(Variable(1)), Negative(Variable(1))]),
            Clause::new(vec![Negative(Variable(6)), Negative(Variable(7)), Negative(Variable(15))]),
            Clause::new(vec![Positive(Variable(9)), Positive(Variable(10)), Positive(Variable(6))]),
            Clause::new(vec![Negative(Variable(13)), Negative(Variable(7)), Negative(Variable(9))]),
            Clause::new(vec![Positive(Variable(9)), Positive(Variable(15)), Positive(Variable(15))]),
        ]);
        println!("{}", f);

        assert!(solve_brute_force(&f));
        check_model(&f);
    }

    #[test]
    fn pigeonhole_three_into_two() {
        // x(p, h) = pigeon p sits in hole h
        let x = |pigeon: isize, hole: isize| 2 * (pigeon - 1) + hole;
        let mut clauses: Vec<Vec<isize>> = (1..=3)
            .map(|pigeon| vec![x(pigeon, 1), x(pigeon, 2)])
            .collect();
        for hole in 1..=2 {
            for a in 1..=3 {
                for b in a + 1..=3 {
                    clauses.push(vec![-x(a, hole), -x(b, hole)]);
                }
            }
        }
        let clauses: Vec<&[isize]> = clauses.iter().map(Vec::as_slice).collect();

        assert_eq!(solve(cnf(&clauses)), SatResult::Unsatisfiable);
    }

    /// Every formula built from up to `max_clauses` distinct clauses over `num_vars` variables.
    fn all_formulas(num_vars: usize, max_clauses: usize) -> Vec<Formula> {
        // Each variable is absent, positive or negative
        let clauses: Vec<Clause> = (0..3usize.pow(num_vars as u32))
            .map(|mut code| {
                let mut literals = vec![];
                for x in 1..=num_vars {
                    match code % 3 {
                        1 => literals.push(p(x)),
                        2 => literals.push(n(x)),
                        _ => {}
                    }
                    code /= 3;
                }
                Clause::new(literals)
            })
            .collect();

        let mut formulas: Vec<Vec<Clause>> = vec![vec![]];
        let mut frontier: Vec<(Vec<Clause>, usize)> = vec![(vec![], 0)];
        for _ in 0..max_clauses {
            let mut next = vec![];
            for (chosen, start) in frontier {
                for i in start..clauses.len() {
                    let mut extended = chosen.clone();
                    extended.push(clauses[i].clone());
                    formulas.push(extended.clone());
                    next.push((extended, i + 1));
                }
            }
            frontier = next;
        }
        formulas.into_iter().map(Formula::new).collect()
    }

    #[test]
    fn exhaustive_small_formulas() {
        let mut formulas = all_formulas(2, 9);
        formulas.extend(all_formulas(3, 3));
        assert_eq!(formulas.len(), 512 + 1 + 27 + 351 + 2925);

        for f in formulas {
            match solve(f.clone()) {
                SatResult::Satisfiable(model) => {
                    assert!(solve_brute_force(&f), "{} reported SAT", f);
                    assert!(f.is_satisfied_by(&model), "{:?} does not satisfy {}", model, f);
                }
                SatResult::Unsatisfiable => assert!(!solve_brute_force(&f), "{} reported UNSAT", f),
            }
        }
    }

    fn random_3sat(rng: &mut StdRng, num_vars: usize, num_clauses: usize) -> Formula {
        Formula::new((0..num_clauses).map(|_| {
            Clause::new((0..3).map(|_| {
                let var = Variable(rng.gen_range(1, num_vars + 1));
                if rng.gen() {
                    Literal::Positive(var)
                } else {
                    Literal::Negative(var)
                }
            }))
        }))
    }

    #[test]
    fn random_3sat_is_sound_and_deterministic() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let f = random_3sat(&mut rng, 30, 125);
            let first = solve(f.clone());
            if let SatResult::Satisfiable(model) = &first {
                assert!(f.is_satisfied_by(model));
            }
            assert_eq!(solve(f), first);
        }
    }

    #[test]
    fn solver_is_reusable() {
        let f = cnf(&[&[1, 2], &[-1, 3], &[-2, -3], &[1, -3]]);
        let mut solver = Solver::new(f);
        let first = solver.solve();
        let stats = *solver.statistics();
        assert_eq!(solver.solve(), first);
        assert_eq!(*solver.statistics(), stats);
    }

    proptest! {
        #[test]
        fn proptest_solve(f in formula_3sat_strategy(8, 20)) {
            let brute_force = solve_brute_force(&f);
            let result = solve(f.clone());
            log::trace!("result = {:?}", result);
            prop_assert_eq!(result.is_satisfiable(), brute_force);
            if let Some(model) = result.model() {
                prop_assert!(f.is_satisfied_by(model));
            }
        }
    }
}
