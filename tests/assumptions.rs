use otter_pb::{
    config::Config,
    generic::random::MinimalPCG32,
    reports::{Report, SolveState},
    solver::Solver,
    structures::{literal::{var, Lit}, origin::Origin, simple::ConstrSimple},
    types::err::{ErrorKind, UsageError},
};

use rand::{Rng, SeedableRng};

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

/// Every assignment to `vars` variables which satisfies each constraint, as a bit mask.
fn models(constraints: &[ConstrSimple], vars: i32) -> Vec<u32> {
    (0..(1_u32 << vars))
        .filter(|&mask| {
            let value = |l: Lit| ((mask >> (var(l) - 1)) & 1 == 1) == (l > 0);
            constraints.iter().all(|c| c.is_satisfied_by(value))
        })
        .collect()
}

fn core_lits(solver: &Solver) -> Vec<Lit> {
    let mut lits: Vec<Lit> = solver.last_core().unwrap().terms.iter().map(|t| t.l).collect();
    lits.sort();
    lits
}

mod assumptions {
    use super::*;

    #[test]
    fn satisfiable() {
        let mut solver = Solver::from_config(Config::default());
        let p = solver.new_var();
        let q = solver.new_var();
        assert!(solver.add_clause(&[p, q]).is_ok());

        assert!(solver.set_assumptions(&[-p]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
        assert_eq!(solver.value_of(p), Some(false));
        assert_eq!(solver.value_of(q), Some(true));
        assert_eq!(solver.assumptions(), &[-p]);
    }

    #[test]
    fn invalid() {
        let mut solver = Solver::from_config(Config::default());
        solver.new_var();
        assert_eq!(
            solver.set_assumptions(&[0]),
            Err(ErrorKind::Usage(UsageError::InvalidAssumption(0)))
        );
        assert_eq!(
            solver.set_assumptions(&[-9]),
            Err(ErrorKind::Usage(UsageError::InvalidAssumption(-9)))
        );
        assert!(solver.assumptions().is_empty());
    }

    #[test]
    fn binary_core() {
        let mut solver = Solver::from_config(Config::default());
        let p = solver.new_var();
        let q = solver.new_var();
        assert!(solver.add_clause(&[-p, -q]).is_ok());

        assert!(solver.set_assumptions(&[p, q]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Inconsistent));
        assert_eq!(solver.report(), Report::Inconsistent);
        assert!(solver.has_core());
        assert_eq!(core_lits(&solver), vec![-q, -p]);

        solver.clear_assumptions();
        assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
        assert!(!solver.has_core());
    }

    #[test]
    fn unit_core() {
        let mut solver = Solver::from_config(Config::default());
        let p = solver.new_var();
        let q = solver.new_var();
        assert!(solver.add_clause(&[-p]).is_ok());

        assert!(solver.set_assumptions(&[q, p]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Inconsistent));
        assert_eq!(core_lits(&solver), vec![-p]);
    }

    #[test]
    fn core_excludes_irrelevant_assumptions() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(5);
        // x1 + x2 + x3 <= 1
        let amo = ConstrSimple::new([(1, -x[0]), (1, -x[1]), (1, -x[2])], 2);
        assert!(solver.add_simple(&amo, Origin::Formula).is_ok());
        assert!(solver.add_clause(&[x[3], x[4]]).is_ok());

        assert!(solver.set_assumptions(&[x[3], x[0], x[4], x[1]]).is_ok());
        assert_eq!(solver.solve_full(), Ok(SolveState::Inconsistent));

        let core = solver.last_core().unwrap().clone();
        assert!(core.terms.iter().all(|t| t.l == -x[0] || t.l == -x[1]));
        // Some assumption of the core is false under any solution.
        assert!(!core.is_satisfied_by(|l| l == x[0] || l == x[1]));
    }

    #[test]
    fn propagated_assumptions() {
        for resprop in [true, false] {
            let mut config = Config::default();
            config.cg_resprop.value = resprop;
            let mut solver = Solver::from_config(config);
            let x = solver.new_vars(3);
            // x1 implies x2, and x2 implies -x3
            assert!(solver.add_clause(&[-x[0], x[1]]).is_ok());
            assert!(solver.add_clause(&[-x[1], -x[2]]).is_ok());

            assert!(solver.set_assumptions(&[x[0], x[1], x[2]]).is_ok());
            assert_eq!(solver.solve_full(), Ok(SolveState::Inconsistent));
            let lits = core_lits(&solver);
            match resprop {
                true => assert_eq!(lits, vec![-x[2], -x[0]]),
                false => assert_eq!(lits, vec![-x[2], -x[1]]),
            }
        }
    }

    #[test]
    fn repeated_cores() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(4);
        let card = ConstrSimple::new(x.iter().map(|l| (1, *l)), 2);
        assert!(solver.add_simple(&card, Origin::Formula).is_ok());

        let mut assumed: Vec<Lit> = x.iter().map(|l| -l).collect();
        let mut cores = 0;
        loop {
            assert!(solver.set_assumptions(&assumed).is_ok());
            match solver.solve_full() {
                Ok(SolveState::Sat) => break,
                Ok(SolveState::Inconsistent) => {
                    cores += 1;
                    let drop: Vec<Lit> = core_lits(&solver).iter().map(|l| -l).collect();
                    assumed.retain(|a| !drop.contains(a));
                }
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(cores >= 1);
        assert_eq!(solver.counters().cores, cores);
    }

    #[test]
    fn random_cores_are_implied() {
        let mut rng = MinimalPCG32::seed_from_u64(3);
        for _ in 0..50 {
            let vars = rng.gen_range(4..=8);
            let count = rng.gen_range(1..=5);
            let constraints = random_constraints(&mut rng, vars, count);
            let models = models(&constraints, vars);

            let mut assumptions: Vec<Lit> = Vec::default();
            for v in 1..=vars {
                if rng.gen_bool(0.4) {
                    assumptions.push(match rng.gen_bool(0.5) {
                        true => v,
                        false => -v,
                    });
                }
            }

            for bits in [4, 14, 30, 62, 0] {
                let mut config = Config::default();
                config.bits_overflow.value = bits;
                let mut solver = Solver::from_config(config);
                solver.new_vars(vars as usize);
                for constraint in &constraints {
                    assert!(solver.add_simple(constraint, Origin::Formula).is_ok());
                }
                assert!(solver.set_assumptions(&assumptions).is_ok());

                match solver.solve_full() {
                    Ok(SolveState::Sat) => {
                        let solution = solver.last_solution().unwrap();
                        let value = |l: Lit| solution[(var(l) - 1) as usize] == l;
                        assert!(assumptions.iter().all(|a| value(*a)));
                        for constraint in &constraints {
                            assert!(constraint.is_satisfied_by(value), "{constraint:?} violated (bits {bits})");
                        }
                    }
                    Ok(SolveState::Inconsistent) => {
                        let core = solver.last_core().unwrap().clone();
                        for term in &core.terms {
                            assert!(assumptions.contains(&-term.l), "{core:?} is not over {assumptions:?}");
                        }
                        for &mask in &models {
                            let value = |l: Lit| ((mask >> (var(l) - 1)) & 1 == 1) == (l > 0);
                            assert!(core.is_satisfied_by(value), "{core:?} is not implied by {constraints:?}");
                        }
                    }
                    Ok(SolveState::Unsat) => {
                        assert!(models.is_empty(), "{constraints:?} has a solution (bits {bits})");
                    }
                    other => panic!("{other:?} on {constraints:?} (bits {bits})"),
                }
            }
        }
    }
}
