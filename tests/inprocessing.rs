use otter_pb::{
    config::Config,
    reports::SolveState,
    solver::Solver,
    structures::simple::ConstrSimple,
};

fn config_without(purelits: bool, probing: bool) -> Config {
    let mut config = Config::default();
    config.inp_purelits.value = purelits;
    config.inp_probing.value = probing;
    config
}

/// The pigeonhole principle, for `pigeons` in `holes`.
fn pigeonhole(solver: &mut Solver, pigeons: usize, holes: usize) {
    let x = solver.new_vars(pigeons * holes);
    let at = |p: usize, h: usize| x[p * holes + h];
    for p in 0..pigeons {
        let clause: Vec<_> = (0..holes).map(|h| at(p, h)).collect();
        assert!(solver.add_clause(&clause).is_ok());
    }
    for h in 0..holes {
        for p in 0..pigeons {
            for q in p + 1..pigeons {
                assert!(solver.add_clause(&[-at(p, h), -at(q, h)]).is_ok());
            }
        }
    }
}

mod pure_literals {
    use super::*;

    #[test]
    fn fixed() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(3);
        assert!(solver.add_clause(&[x[0], x[1]]).is_ok());
        assert!(solver.add_clause(&[x[0], -x[2]]).is_ok());

        solver.inprocess();
        assert_eq!(solver.counters().pure_literals, 3);
        assert_eq!(solver.value_of(x[0]), Some(true));
        assert_eq!(solver.value_of(x[1]), Some(true));
        assert_eq!(solver.value_of(x[2]), Some(false));
    }

    #[test]
    fn objective_preference() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(2);
        assert!(solver.add_clause(&[x[0], x[1]]).is_ok());
        // Minimizing x2 prefers -x2
        solver.set_objective(Some(ConstrSimple::new([(1, x[1])], 0)));

        solver.inprocess();
        assert_eq!(solver.value_of(x[0]), Some(true));
        assert_eq!(solver.value_of(x[1]), None);
    }

    #[test]
    fn assumptions_are_kept() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(2);
        assert!(solver.add_clause(&[x[0], x[1]]).is_ok());
        assert!(solver.set_assumptions(&[-x[1]]).is_ok());

        solver.inprocess();
        assert_eq!(solver.value_of(x[0]), Some(true));
        assert_eq!(solver.value_of(x[1]), None);
        assert_eq!(solver.solve(), Ok(SolveState::Sat));
        assert_eq!(solver.value_of(x[1]), Some(false));
    }
}

mod probing {
    use super::*;

    #[test]
    fn failed_literal() {
        let mut solver = Solver::from_config(config_without(false, true));
        let x = solver.new_vars(2);
        assert!(solver.add_clause(&[-x[0], x[1]]).is_ok());
        assert!(solver.add_clause(&[-x[0], -x[1]]).is_ok());

        solver.inprocess();
        assert!(solver.counters().probing_units >= 1);
        assert_eq!(solver.value_of(x[0]), Some(false));
        assert_eq!(solver.value_of(x[1]), None);
    }

    #[test]
    fn equalities() {
        let mut solver = Solver::from_config(Config::default());
        let x = solver.new_vars(3);
        assert!(solver.add_clause(&[-x[0], x[1]]).is_ok());
        assert!(solver.add_clause(&[x[0], -x[1]]).is_ok());
        assert!(solver.add_clause(&[x[1], x[2]]).is_ok());
        assert!(solver.add_clause(&[-x[1], -x[2]]).is_ok());

        solver.inprocess();
        assert!(solver.counters().equalities >= 1);
        assert!(solver.implications_of(x[0]).is_some_and(|i| i.contains(&x[1])));
        assert!(solver.implications_of(-x[0]).is_some_and(|i| i.contains(&-x[1])));

        assert!(solver.add_clause(&[x[0]]).is_ok());
        assert_eq!(solver.solve(), Ok(SolveState::Sat));
        assert_eq!(solver.value_of(x[1]), Some(true));
        assert_eq!(solver.value_of(x[2]), Some(false));
    }

    #[test]
    fn at_most_one() {
        let mut solver = Solver::from_config(config_without(false, true));
        let x = solver.new_vars(5);
        for i in 0..4 {
            for j in i + 1..4 {
                assert!(solver.add_clause(&[-x[i], -x[j]]).is_ok());
            }
        }
        assert!(solver.add_clause(&x).is_ok());

        solver.inprocess();
        assert!(solver.counters().amo_found >= 1);
        assert_eq!(solver.solve(), Ok(SolveState::Sat));
        let solution = solver.last_solution().unwrap();
        assert!(x[..4].iter().filter(|l| solution.contains(*l)).count() <= 1);
    }
}

mod dominance {
    use super::*;

    fn exactly_one(solver: &mut Solver) -> Vec<i32> {
        let x = solver.new_vars(2);
        assert!(solver.add_clause(&[x[0], x[1]]).is_ok());
        assert!(solver.add_clause(&[-x[0], -x[1]]).is_ok());
        x
    }

    #[test]
    fn symmetric_pair() {
        let mut config = config_without(false, false);
        config.inp_dombreaklim.value = 1000;
        let mut solver = Solver::from_config(config);
        let x = exactly_one(&mut solver);

        solver.inprocess();
        assert_eq!(solver.counters().dominance_breakers, 1);
        assert_eq!(solver.solve(), Ok(SolveState::Sat));
        let solution = solver.last_solution().unwrap();
        assert_eq!(x.iter().filter(|l| solution.contains(*l)).count(), 1);
    }

    #[test]
    fn cheaper_literal_preferred() {
        let mut config = config_without(false, false);
        config.inp_dombreaklim.value = 1000;
        let mut solver = Solver::from_config(config);
        let x = exactly_one(&mut solver);
        solver.set_objective(Some(ConstrSimple::new([(2, x[1])], 0)));

        solver.inprocess();
        assert_eq!(solver.counters().dominance_breakers, 1);
        assert_eq!(solver.solve(), Ok(SolveState::Sat));
        assert_eq!(solver.value_of(x[0]), Some(true));
        assert_eq!(solver.value_of(x[1]), Some(false));
    }

    #[test]
    fn disabled_by_default() {
        let mut solver = Solver::from_config(config_without(false, false));
        exactly_one(&mut solver);

        solver.inprocess();
        assert_eq!(solver.counters().dominance_breakers, 0);
    }
}

mod scheduling {
    use super::*;

    #[test]
    fn frequent_rounds() {
        let mut config = Config::default();
        config.inp_basetime.value = 0.0001;
        let mut solver = Solver::from_config(config);
        pigeonhole(&mut solver, 6, 5);

        let mut rounds = 0;
        let state = loop {
            match solver.solve() {
                Ok(SolveState::Inprocessed) => rounds += 1,
                state => break state,
            }
        };
        assert_eq!(state, Ok(SolveState::Unsat));
        assert_eq!(solver.counters().inprocessings, rounds);
    }

    #[test]
    fn disabled() {
        let mut config = Config::default();
        config.inp_basetime.value = 0.0;
        let mut solver = Solver::from_config(config);
        pigeonhole(&mut solver, 5, 4);

        assert_eq!(solver.solve(), Ok(SolveState::Unsat));
        assert_eq!(solver.counters().inprocessings, 0);
    }
}
