use std::{cell::RefCell, rc::Rc};

use num_bigint::BigInt;
use otter_pb::{
    config::{Config, Reformulation},
    dispatch::Dispatch,
    generic::random::MinimalPCG32,
    optimization::Optimization,
    reports::Report,
    solver::Solver,
    structures::{literal::Lit, origin::Origin, simple::ConstrSimple},
    types::err::{ErrorKind, UsageError},
};

use rand::{Rng, SeedableRng};

const COSTS: [i64; 6] = [3, 2, 4, 1, 5, 2];

/// A small weighted set cover, with a limit on some of the sets.
fn set_cover(solver: &mut Solver) -> (Vec<ConstrSimple>, ConstrSimple) {
    let x = solver.new_vars(6);
    let constraints = vec![
        ConstrSimple::clause(&[x[0], x[1]]),
        ConstrSimple::clause(&[x[1], x[2], x[3]]),
        ConstrSimple::clause(&[x[0], x[4]]),
        ConstrSimple::clause(&[x[3], x[5]]),
        ConstrSimple::clause(&[x[2], x[5], x[4]]),
        // At most two of x1, x3, x5, x6
        ConstrSimple::new([(1, -x[0]), (1, -x[2]), (1, -x[4]), (1, -x[5])], 2),
    ];
    for constraint in &constraints {
        assert!(solver.add_simple(constraint, Origin::Formula).is_ok());
    }
    let objective = ConstrSimple::new(COSTS.iter().zip(&x).map(|(c, l)| (*c, *l)), 0);
    (constraints, objective)
}

/// The least cost of an assignment satisfying every constraint, by enumeration.
fn brute_force(constraints: &[ConstrSimple], objective: &ConstrSimple, vars: i32) -> Option<BigInt> {
    let mut best: Option<BigInt> = None;
    for mask in 0..(1_u32 << vars) {
        let value = |l: Lit| ((mask >> (l.abs() - 1)) & 1 == 1) == (l > 0);
        if constraints.iter().all(|c| c.is_satisfied_by(value)) {
            let cost = objective.lhs_value(value);
            if best.as_ref().map_or(true, |b| cost < *b) {
                best = Some(cost);
            }
        }
    }
    best
}

/// Weighted constraints over `vars` variables and an objective with some negative costs.
fn random_instance(rng: &mut MinimalPCG32, vars: i32) -> (Vec<ConstrSimple>, ConstrSimple) {
    let count = rng.gen_range(2..=6);
    let mut constraints = Vec::default();
    while constraints.len() < count {
        let mut terms: Vec<(i64, Lit)> = Vec::default();
        for v in 1..=vars {
            if rng.gen_bool(0.6) {
                let l = match rng.gen_bool(0.5) {
                    true => v,
                    false => -v,
                };
                terms.push((rng.gen_range(1..=5_i64), l));
            }
        }
        if terms.len() < 2 {
            continue;
        }
        let total: i64 = terms.iter().map(|(c, _)| c).sum();
        let degree = rng.gen_range(1..=total);
        constraints.push(ConstrSimple::new(terms, degree));
    }

    let mut costs = Vec::default();
    for v in 1..=vars {
        let cost = match rng.gen_bool(0.2) {
            true => -rng.gen_range(1..=3_i64),
            false => rng.gen_range(1..=6_i64),
        };
        costs.push((cost, v));
    }
    (constraints, ConstrSimple::new(costs, 0))
}

mod optimization {
    use super::*;

    #[test]
    fn core_guided_reformulation() {
        let mut config = Config::default();
        config.cg_hybrid.value = 1.0;
        config.cg_strat.value = 1.0;
        let mut solver = Solver::from_config(config);
        let x = solver.new_var();
        let y = solver.new_var();
        assert!(solver.add_clause(&[x, y]).is_ok());

        let objective = ConstrSimple::new([(2, x), (3, y)], 0);
        let mut optimization = Optimization::new(solver, &objective).unwrap();
        assert_eq!(optimization.lower_bound(), &BigInt::from(0));

        assert_eq!(optimization.run_once(), Ok(None));
        assert_eq!(optimization.lower_bound(), &BigInt::from(2));
        assert_eq!(optimization.lazy_vars().count(), 1);
        let reformulated = optimization.reformulated_objective();
        assert!(reformulated.iter().any(|(l, c)| *l > y && *c == BigInt::from(2)));
        assert!(reformulated.contains(&(y, BigInt::from(1))));

        assert_eq!(optimization.run_full(true), Ok(Report::Optimal));
        assert_eq!(optimization.upper_bound(), Some(&BigInt::from(2)));
        let best = optimization.best_solution().unwrap();
        assert!(best.contains(&x) && best.contains(&-y));
    }

    #[test]
    fn negative_costs() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_var();
        let y = solver.new_var();
        // At most one of x and y
        assert!(solver.add_clause(&[-x, -y]).is_ok());

        let objective = ConstrSimple::new([(-1, x), (-1, y)], 0);
        let mut optimization = Optimization::new(solver, &objective).unwrap();
        assert_eq!(optimization.lower_bound(), &BigInt::from(-2));

        assert_eq!(optimization.run_full(true), Ok(Report::Optimal));
        assert_eq!(optimization.objective_bounds(), (BigInt::from(-1), Some(BigInt::from(-1))));
        let best = optimization.best_solution().unwrap();
        assert_eq!(best.contains(&x) as u8 + best.contains(&y) as u8, 1);
    }

    #[test]
    fn infeasible() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_var();
        assert!(solver.add_clause(&[x]).is_ok());
        assert!(solver.add_clause(&[-x]).is_ok());

        let objective = ConstrSimple::new([(1, x)], 0);
        let mut optimization = Optimization::new(solver, &objective).unwrap();
        assert_eq!(optimization.run_full(true), Ok(Report::Infeasible));
        assert!(optimization.best_solution().is_none());
    }

    #[test]
    fn usage() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_var();
        let unknown = ConstrSimple::new([(1, x), (1, 9)], 0);
        assert!(matches!(
            Optimization::new(solver, &unknown),
            Err(ErrorKind::Usage(UsageError::InvalidObjective))
        ));

        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_var();
        let mut optimization = Optimization::new(solver, &ConstrSimple::new([(1, x)], 0)).unwrap();
        assert_eq!(
            optimization.bound_by_last_solution(),
            Err(ErrorKind::Usage(UsageError::NoSolution))
        );
    }

    #[test]
    fn first_solution_only() {
        let mut solver = Solver::from_config(Config::default());
        let (constraints, objective) = set_cover(&mut solver);
        let mut optimization = Optimization::new(solver, &objective).unwrap();

        let report = optimization.run_full(false).unwrap();
        assert!(matches!(report, Report::Unknown | Report::Optimal));
        let best = optimization.best_solution().unwrap().to_vec();
        assert!(constraints.iter().all(|c| c.is_satisfied_by(|l| best.contains(&l))));
    }

    #[test]
    fn every_strategy_finds_the_optimum() {
        let optimum = {
            let mut solver = Solver::from_config(Config::default());
            let (constraints, objective) = set_cover(&mut solver);
            brute_force(&constraints, &objective, 6).unwrap()
        };

        for reform in [Reformulation::Always, Reformulation::Depletion, Reformulation::Never] {
            for hybrid in [0.0, 0.5, 1.0] {
                for strat in [1.0, 2.0] {
                    let mut config = Config::default();
                    config.cg_reform.value = reform;
                    config.cg_hybrid.value = hybrid;
                    config.cg_strat.value = strat;

                    let mut solver = Solver::from_config(config);
                    let (constraints, objective) = set_cover(&mut solver);
                    let mut optimization = Optimization::new(solver, &objective).unwrap();

                    assert_eq!(optimization.run_full(true), Ok(Report::Optimal));
                    assert_eq!(optimization.upper_bound(), Some(&optimum));
                    assert_eq!(optimization.lower_bound(), &optimum);

                    let best = optimization.best_solution().unwrap().to_vec();
                    let value = |l: Lit| best.contains(&l);
                    assert!(constraints.iter().all(|c| c.is_satisfied_by(value)));
                    assert_eq!(objective.lhs_value(value), optimum);
                }
            }
        }
    }

    #[test]
    fn bounds_are_monotone() {
        let mut solver = Solver::from_config(Config::default());
        let seen = Rc::new(RefCell::new(Vec::default()));
        let sink = seen.clone();
        solver.set_dispatcher(Rc::new(move |dispatch: &Dispatch| {
            if let Dispatch::ObjectiveBound { lower, upper } = dispatch {
                sink.borrow_mut().push((lower.clone(), upper.clone()));
            }
        }));

        let (_, objective) = set_cover(&mut solver);
        let mut optimization = Optimization::new(solver, &objective).unwrap();
        assert_eq!(optimization.run_full(true), Ok(Report::Optimal));

        let seen = seen.borrow();
        assert!(!seen.is_empty());
        for pair in seen.windows(2) {
            assert!(pair[0].0 <= pair[1].0);
            if let (Some(a), Some(b)) = (&pair[0].1, &pair[1].1) {
                assert!(b <= a);
            }
        }
        let (lower, upper) = seen.last().unwrap();
        assert_eq!(Some(lower), upper.as_ref());
    }

    #[test]
    fn random_instances_agree_with_enumeration() {
        let mut rng = MinimalPCG32::seed_from_u64(5);
        for _ in 0..30 {
            let vars = rng.gen_range(4..=7);
            let (constraints, objective) = random_instance(&mut rng, vars);
            let optimum = brute_force(&constraints, &objective, vars);

            for bits in [4, 14, 30, 62, 0] {
                for hybrid in [0.0, 0.5, 1.0] {
                    let mut config = Config::default();
                    config.bits_overflow.value = bits;
                    config.cg_hybrid.value = hybrid;
                    let mut solver = Solver::from_config(config);
                    solver.new_vars(vars as usize);
                    for constraint in &constraints {
                        assert!(solver.add_simple(constraint, Origin::Formula).is_ok());
                    }
                    let mut optimization = Optimization::new(solver, &objective).unwrap();
                    let report = optimization.run_full(true);

                    match &optimum {
                        None => {
                            assert_eq!(report, Ok(Report::Infeasible), "{constraints:?} (bits {bits}, hybrid {hybrid})");
                            assert!(optimization.best_solution().is_none());
                        }
                        Some(optimum) => {
                            assert_eq!(report, Ok(Report::Optimal), "{constraints:?} (bits {bits}, hybrid {hybrid})");
                            assert_eq!(optimization.upper_bound(), Some(optimum), "{constraints:?} {objective:?}");
                            let best = optimization.best_solution().unwrap().to_vec();
                            let value = |l: Lit| best.contains(&l);
                            for constraint in &constraints {
                                assert!(constraint.is_satisfied_by(value), "{constraint:?} violated");
                            }
                            assert_eq!(&objective.lhs_value(value), optimum);
                        }
                    }
                }
            }
        }
    }
}
