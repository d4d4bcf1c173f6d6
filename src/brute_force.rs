use crate::formula::Formula;

// Truth-table satisfiability check, the oracle for the solver's differential tests
pub(crate) fn solve_brute_force(f: &Formula) -> bool {
    let num_variables = f.num_variables();
    assert!(num_variables <= 16); // just for safety

    // Variable x takes bit x - 1 of the assignment
    fn assignment_for(assignment: u32, x: usize) -> bool {
        assignment & (1 << (x - 1)) != 0
    }

    'search: for assignment in 0..2u32.pow(num_variables as u32) {
        'clauses: for clause in f.clauses() {
            for literal in clause.literals() {
                if assignment_for(assignment, literal.idx()) == literal.is_positive() {
                    // this clause is satisfied, let's go to the next one
                    continue 'clauses;
                }
            }
            // if we got here, this clause was not satisfied, so this assignment is bogus
            continue 'search;
        }
        // if we got here, every clause was satisfied, so we're done and satisfiable
        return true;
    }
    // no assignment is valid
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::cnf;

    #[test]
    fn solve_bcp_sat() {
        assert!(solve_brute_force(&cnf(&[&[1, 2], &[-1]])));
    }

    #[test]
    fn solve_bcp_unsat() {
        assert!(!solve_brute_force(&cnf(&[&[1, 2], &[-1], &[-2]])));
    }

    #[test]
    fn solve_conflict_sat() {
        assert!(solve_brute_force(&cnf(&[&[1, 2, 3], &[-1, -2, 3], &[-2, -3]])));
    }

    #[test]
    fn trivial_formulas() {
        assert!(solve_brute_force(&cnf(&[])));
        assert!(!solve_brute_force(&cnf(&[&[]])));
    }
}
