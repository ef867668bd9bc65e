use otter_pb::{
    config::Config,
    generic::random::MinimalPCG32,
    reports::{Report, SolveState},
    solver::Solver,
    structures::{
        literal::{var, Lit},
        origin::Origin,
        simple::ConstrSimple,
    },
    types::err::{ErrorKind, UsageError},
};

use rand::{Rng, SeedableRng};

/// Clauses over `vars` variables, each satisfied by the planted assignment of every odd variable true.
fn planted_3sat(vars: i32, clauses: usize, seed: u64) -> Vec<Vec<Lit>> {
    let mut rng = MinimalPCG32::seed_from_u64(seed);
    let planted = |l: Lit| (var(l) % 2 == 1) == (l > 0);
    let mut formula = Vec::default();
    while formula.len() < clauses {
        let clause: Vec<Lit> = (0..3)
            .map(|_| {
                let v = rng.gen_range(1..=vars);
                match rng.gen_bool(0.5) {
                    true => v,
                    false => -v,
                }
            })
            .collect();
        if clause.iter().any(|l| planted(*l)) {
            formula.push(clause);
        }
    }
    formula
}

/// Pigeons into holes, as clauses.
fn pigeonhole(pigeons: usize, holes: usize, solver: &mut Solver) {
    let x: Vec<Vec<Lit>> = (0..pigeons).map(|_| solver.new_vars(holes)).collect();
    for p in &x {
        assert!(solver.add_clause(p).is_ok());
    }
    for h in 0..holes {
        for a in 0..pigeons {
            for b in (a + 1)..pigeons {
                assert!(solver.add_clause(&[-x[a][h], -x[b][h]]).is_ok());
            }
        }
    }
}

/// Weighted constraints over `vars` variables, with coefficients from one to five.
fn random_constraints(rng: &mut MinimalPCG32, vars: i32, count: usize) -> Vec<ConstrSimple> {
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
    constraints
}

/// Whether some assignment to `vars` variables satisfies every constraint.
fn brute_force_sat(constraints: &[ConstrSimple], vars: i32) -> bool {
    (0..(1_u32 << vars)).any(|mask| {
        let value = |l: Lit| ((mask >> (var(l) - 1)) & 1 == 1) == (l > 0);
        constraints.iter().all(|c| c.is_satisfied_by(value))
    })
}

mod basic {
    use super::*;

    #[test]
    fn one_literal() {
        let mut solver = Solver::from_config(Config::default());
        let p = solver.new_var();
        assert!(solver.add_clause(&[p]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
        assert_eq!(solver.report(), Report::Optimal);
        assert_eq!(solver.value_of(p), Some(true));
        assert_eq!(solver.value_of(-p), Some(false));
    }

    #[test]
    fn conflict() {
        let mut solver = Solver::from_config(Config::default());
        let p = solver.new_var();
        let q = solver.new_var();
        assert!(solver.add_clause(&[p, q]).is_ok());
        assert!(solver.add_clause(&[-p, -q]).is_ok());
        assert!(solver.add_clause(&[p, -q]).is_ok());
        assert!(solver.add_clause(&[-p, q]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Unsat));
        assert_eq!(solver.report(), Report::Infeasible);
        assert!(solver.unsatisfiable_constraint().is_ok());
        assert_eq!(
            solver.solve(),
            Err(ErrorKind::Usage(UsageError::SolveAfterUnsat))
        );
    }

    #[test]
    fn units_propagate_at_level_zero() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(2);
        assert!(solver.add_clause(&[x[0]]).is_ok());
        assert_eq!(solver.level_of(x[0]), Some(0));

        assert!(solver.add_clause(&[-x[0], x[1]]).is_ok());
        assert_eq!(solver.level_of(x[1]), Some(0));
    }

    #[test]
    fn tautology() {
        let mut solver = Solver::from_config(Config::default());
        let p = solver.new_var();
        assert!(solver.add_clause(&[p, -p]).is_ok());
        assert_eq!(solver.db.len(), 0);
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
    }

    #[test]
    fn usage_errors() {
        let mut solver = Solver::from_config(Config::default());
        let p = solver.new_var();
        assert_eq!(
            solver.add_clause(&[p, 5]),
            Err(ErrorKind::Usage(UsageError::UnknownVariable(5)))
        );
        assert_eq!(
            solver.add_clause(&[0]),
            Err(ErrorKind::Usage(UsageError::ZeroLiteral))
        );
        assert_eq!(
            solver.last_solution(),
            Err(ErrorKind::Usage(UsageError::NoSolution))
        );
        assert!(solver.last_core().is_err());
    }

    #[test]
    fn pigeonhole_unsat() {
        let mut solver = Solver::from_config(Config::default());
        pigeonhole(5, 4, &mut solver);
        assert_eq!(solver.solve_full(), Ok(SolveState::Unsat));
        assert!(solver.counters().conflicts > 0);
    }

    #[test]
    fn pigeonhole_sat() {
        let mut solver = Solver::from_config(Config::default());
        pigeonhole(4, 4, &mut solver);
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
    }

    #[test]
    fn planted_solutions() {
        for seed in 0..5 {
            let formula = planted_3sat(60, 240, seed);
            let mut solver = Solver::from_config(Config::default());
            solver.new_vars(60);
            for clause in &formula {
                assert!(solver.add_clause(clause).is_ok());
            }
            assert_eq!(solver.solve_full(), Ok(SolveState::Sat));

            let solution = solver.last_solution().unwrap();
            for clause in &formula {
                assert!(clause.iter().any(|l| solution.contains(l)));
            }
        }
    }

    #[test]
    fn resolve_after_new_constraints() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(3);
        assert!(solver.add_clause(&[x[0], x[1], x[2]]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));

        assert!(solver.add_clause(&[-x[0]]).is_ok());
        assert!(solver.add_clause(&[-x[1]]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
        assert_eq!(solver.value_of(x[2]), Some(true));

        assert!(solver.add_clause(&[-x[2]]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Unsat));
    }
}

mod control {
    use super::*;

    #[test]
    fn stop_request() {
        let mut solver = Solver::from_config(Config::default());
        pigeonhole(4, 3, &mut solver);
        solver.request_stop();
        assert_eq!(solver.solve(), Err(ErrorKind::Interrupted));
        assert_eq!(solver.report(), Report::Unknown);
        assert_eq!(solver.solve(), Err(ErrorKind::InvalidState));
        assert_eq!(solver.add_clause(&[1]), Err(ErrorKind::InvalidState));
    }

    #[test]
    fn terminate_callback() {
        let mut solver = Solver::from_config(Config::default());
        pigeonhole(4, 3, &mut solver);
        solver.set_callback_terminate(Box::new(|| true));
        assert_eq!(solver.solve(), Err(ErrorKind::Interrupted));
    }

    #[test]
    fn deterministic_timeout_resumes() {
        let mut config = Config::default();
        config.timeout_det.value = 1e-9;
        let mut solver = Solver::from_config(config);
        let p = solver.new_var();
        assert!(solver.add_clause(&[p]).is_ok());
        assert_eq!(solver.solve(), Ok(SolveState::Timeout));

        solver.shared.config.timeout_det.value = 0.0;
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
    }

    #[test]
    fn seeds_agree() {
        let formula = planted_3sat(40, 160, 7);
        let solve = || {
            let mut solver = Solver::from_config(Config::default());
            solver.new_vars(40);
            for clause in &formula {
                solver.add_clause(clause).unwrap();
            }
            assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
            (solver.last_solution().unwrap(), solver.counters().conflicts)
        };
        assert_eq!(solve(), solve());
    }
}

mod differential {
    use super::*;

    #[test]
    fn agrees_with_enumeration() {
        let mut rng = MinimalPCG32::seed_from_u64(11);
        for _ in 0..60 {
            let vars = rng.gen_range(4..=8);
            let count = rng.gen_range(2..=7);
            let constraints = random_constraints(&mut rng, vars, count);
            let expected = brute_force_sat(&constraints, vars);

            for bits in [4, 14, 30, 62, 0] {
                for counting in [0.0, 1.0] {
                    let mut config = Config::default();
                    config.bits_overflow.value = bits;
                    config.prop_counting.value = counting;
                    let mut solver = Solver::from_config(config);
                    solver.new_vars(vars as usize);
                    for constraint in &constraints {
                        assert!(solver.add_simple(constraint, Origin::Formula).is_ok());
                    }

                    match solver.solve_full() {
                        Ok(SolveState::Sat) => {
                            assert!(expected, "{constraints:?} has no solution (bits {bits})");
                            let solution = solver.last_solution().unwrap();
                            let value = |l: Lit| solution[(var(l) - 1) as usize] == l;
                            for constraint in &constraints {
                                assert!(constraint.is_satisfied_by(value), "{constraint:?} violated (bits {bits})");
                            }
                        }
                        Ok(SolveState::Unsat) => {
                            assert!(!expected, "{constraints:?} has a solution (bits {bits})");
                        }
                        other => panic!("{other:?} on {constraints:?} (bits {bits})"),
                    }
                }
            }
        }
    }
}
