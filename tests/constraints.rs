use std::{cell::RefCell, rc::Rc};

use num_bigint::BigInt;
use otter_pb::{
    config::Config,
    dispatch::Dispatch,
    reports::SolveState,
    solver::Solver,
    structures::{literal::Lit, origin::Origin, simple::ConstrSimple},
    types::err::{ConstraintDBError, ErrorKind},
};

fn satisfied(constraint: &ConstrSimple, solution: &[Lit]) -> bool {
    constraint.is_satisfied_by(|l| solution.contains(&l))
}

/// Σ wᵢ·xᵢ = target, as a pair of constraints.
fn subset_sum(solver: &mut Solver, weights: &[i64], target: i64) -> Vec<ConstrSimple> {
    let x = solver.new_vars(weights.len());
    let at_least = ConstrSimple::new(weights.iter().zip(&x).map(|(w, l)| (*w, *l)), target);
    let at_most = ConstrSimple::new(weights.iter().zip(&x).map(|(w, l)| (-*w, *l)), -target);
    for constraint in [&at_least, &at_most] {
        assert!(solver.add_simple(constraint, Origin::Formula).is_ok());
    }
    vec![at_least, at_most]
}

mod propagation {
    use super::*;

    #[test]
    fn cardinality() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(3);
        let card = ConstrSimple::new([(1, x[0]), (1, x[1]), (1, x[2])], 2);
        assert!(solver.add_simple(&card, Origin::Formula).is_ok());
        assert_eq!(solver.value_of(x[1]), None);

        assert!(solver.add_clause(&[-x[0]]).is_ok());
        assert_eq!(solver.level_of(x[1]), Some(0));
        assert_eq!(solver.level_of(x[2]), Some(0));
    }

    #[test]
    fn weighted() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(3);
        let pb = ConstrSimple::new([(3, x[0]), (2, x[1]), (1, x[2])], 4);
        assert!(solver.add_simple(&pb, Origin::Formula).is_ok());

        // 3 x1 + x3 >= 4
        assert!(solver.add_clause(&[-x[1]]).is_ok());
        assert_eq!(solver.value_of(x[0]), Some(true));
        assert_eq!(solver.value_of(x[2]), Some(true));
    }

    #[test]
    fn weighted_infeasible_at_root() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(3);
        let pb = ConstrSimple::new([(3, x[0]), (2, x[1]), (1, x[2])], 4);
        assert!(solver.add_simple(&pb, Origin::Formula).is_ok());
        assert!(solver.add_clause(&[-x[0]]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Unsat));
    }

    #[test]
    fn arbitrary_precision() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(3);
        let big = BigInt::from(2).pow(70);
        let pb = ConstrSimple::from_big(
            [(big.clone(), x[0]), (big.clone(), x[1]), (BigInt::from(1), x[2])],
            big + 1,
        );
        assert!(solver.add_simple(&pb, Origin::Formula).is_ok());
        assert!(solver.add_clause(&[-x[0]]).is_ok());
        assert_eq!(solver.value_of(x[1]), Some(true));
        assert_eq!(solver.value_of(x[2]), Some(true));
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
    }
}

mod search {
    use super::*;

    #[test]
    fn cardinality_clash() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(10);
        let at_least = ConstrSimple::new(x.iter().map(|l| (1, *l)), 3);
        let at_most = ConstrSimple::new(x.iter().map(|l| (1, -*l)), 8);
        assert!(solver.add_simple(&at_least, Origin::Formula).is_ok());
        assert!(solver.add_simple(&at_most, Origin::Formula).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Unsat));
    }

    #[test]
    fn subset_sums() {
        for prop_counting in [0.0, 0.6, 1.0] {
            let mut config = Config::default();
            config.prop_counting.value = prop_counting;

            let mut solver = Solver::from_config(config.clone());
            let constraints = subset_sum(&mut solver, &[3, 5, 7, 11, 13], 24);
            assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
            let solution = solver.last_solution().unwrap();
            assert!(constraints.iter().all(|c| satisfied(c, &solution)));

            let mut solver = Solver::from_config(config);
            subset_sum(&mut solver, &[4, 6, 10, 14, 22], 25);
            assert_eq!(solver.solve_full(), Ok(SolveState::Unsat));
        }
    }

    #[test]
    fn weighted_equality() {
        let mut solver = Solver::from_config(Config::default());
        let weights: Vec<i64> = (1..=12).collect();
        let constraints = subset_sum(&mut solver, &weights, 20);
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
        let solution = solver.last_solution().unwrap();
        assert!(constraints.iter().all(|c| satisfied(c, &solution)));
    }

    #[test]
    fn knapsack_with_clauses() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(6);
        let mut constraints = vec![
            ConstrSimple::new([(5, x[0]), (4, x[1]), (3, x[2]), (2, x[3]), (2, x[4]), (1, x[5])], 9),
            ConstrSimple::new([(-5, x[0]), (-4, x[1]), (-3, x[2]), (-2, x[3]), (-2, x[4]), (-1, x[5])], -10),
        ];
        constraints.push(ConstrSimple::clause(&[-x[0], -x[1]]));
        constraints.push(ConstrSimple::clause(&[-x[2], x[5]]));
        for constraint in &constraints {
            assert!(solver.add_simple(constraint, Origin::Formula).is_ok());
        }
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
        let solution = solver.last_solution().unwrap();
        assert!(constraints.iter().all(|c| satisfied(c, &solution)));
    }
}

mod database {
    use super::*;

    #[test]
    fn removal() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(2);
        let (id, _) = solver.add_clause(&[x[0], x[1]]).unwrap();
        assert!(solver.remove_constraint(id).is_ok());
        assert_eq!(
            solver.remove_constraint(id),
            Err(ErrorKind::ConstraintDB(ConstraintDBError::UnknownId))
        );

        assert!(solver.add_clause(&[-x[0]]).is_ok());
        assert!(solver.add_clause(&[-x[1]]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
    }

    #[test]
    fn dispatches() {
        let mut solver = Solver::from_config(Config::default());
        let seen = Rc::new(RefCell::new(Vec::default()));
        let sink = seen.clone();
        solver.set_dispatcher(Rc::new(move |dispatch: &Dispatch| sink.borrow_mut().push(dispatch.clone())));

        let x = solver.new_vars(2);
        solver.add_clause(&[x[0], x[1]]).unwrap();
        solver.add_clause(&[-x[0], x[1]]).unwrap();
        solver.add_clause(&[x[0], -x[1]]).unwrap();
        solver.add_clause(&[-x[0], -x[1]]).unwrap();
        assert_eq!(solver.solve_full(), Ok(SolveState::Unsat));

        let seen = seen.borrow();
        let inputs: Vec<u64> = seen
            .iter()
            .filter_map(|d| match d {
                Dispatch::Input { id, .. } => Some(*id),
                _ => None,
            })
            .collect();
        assert_eq!(inputs.len(), 4);
        assert!(inputs.windows(2).all(|w| w[0] < w[1]));
        assert!(seen.iter().any(|d| matches!(d, Dispatch::Contradiction { .. })));
    }
}
