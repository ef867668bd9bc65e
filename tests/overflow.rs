use num_bigint::BigInt;
use otter_pb::{
    ce::pool::CePools,
    config::Config,
    db::trail::Trail,
    numeric::Tier,
    reports::SolveState,
    solver::Solver,
    structures::{literal::Lit, origin::Origin, simple::ConstrSimple},
};

/// The overflow budget of each tier, with zero for arbitrary precision.
const BUDGETS: [u32; 5] = [14, 30, 48, 62, 0];

fn config(bits_overflow: u32, multiply: bool) -> Config {
    let mut config = Config::default();
    config.bits_overflow.value = bits_overflow;
    config.ca_multiply.value = multiply;
    config
}

/// Σ wᵢ·xᵢ = target with large weights, returning the two constraints.
fn big_subset_sum(solver: &mut Solver, target_offset: i64, odd_target: bool) -> Vec<ConstrSimple> {
    let m = BigInt::from(2).pow(40);
    let weights: Vec<BigInt> = [(1, 2), (1, 4), (1, 6), (2, 10), (3, 14), (1, 22)]
        .iter()
        .map(|(a, b)| &m * *a + *b)
        .collect();
    let x = solver.new_vars(weights.len());
    let mut target: BigInt = &m * 3 + target_offset;
    if odd_target {
        target += 1;
    }

    let at_least = ConstrSimple::from_big(weights.iter().cloned().zip(x.iter().copied()), target.clone());
    let at_most = ConstrSimple::from_big(weights.iter().map(|w| -w).zip(x.iter().copied()), -target);
    for constraint in [&at_least, &at_most] {
        assert!(solver.add_simple(constraint, Origin::Formula).is_ok());
    }
    vec![at_least, at_most]
}

fn learned_within_budget(solver: &Solver, bits_learned: u32) -> bool {
    solver.db.live_refs().into_iter().all(|cref| {
        let stored = solver.db.get(cref);
        !stored.header.origin.is_learned()
            || stored.constr.terms().iter().all(|t| t.c.bits() < bits_learned as u64)
    })
}

mod reduction {
    use super::*;

    #[test]
    fn every_tier_keeps_falsification() {
        let cases = [
            (Tier::T32, 20, 14),
            (Tier::T64, 40, 30),
            (Tier::T96, 56, 48),
            (Tier::T128, 70, 62),
            (Tier::Arb, 100, 62),
        ];
        for (tier, scale_bits, budget) in cases {
            let pools = CePools::default();
            let mut trail = Trail::default();
            trail.grow(4);
            trail.decide(-1);
            trail.assign(-2, None);

            let scale = BigInt::from(2).pow(scale_bits);
            let simple = ConstrSimple::from_big(
                [
                    (scale.clone(), 1 as Lit),
                    (&scale - 1, 2),
                    (BigInt::from(3), 3),
                    (BigInt::from(5), 4),
                ],
                &scale + 10,
            );
            let mut ce = pools.take(tier);
            assert!(ce.extend_from_simple(&simple));
            assert_eq!(ce.tier(), tier);
            assert!(ce.has_negative_slack(&trail));

            assert!(ce.fix_overflow(&trail, budget, budget - 2, 0));
            assert!(ce.largest_coef_bits() < budget);
            assert!(ce.has_negative_slack(&trail));
        }
    }

    #[test]
    fn within_budget_is_untouched() {
        for tier in Tier::ALL {
            let pools = CePools::default();
            let trail = Trail::default();
            let mut ce = pools.take(tier);
            assert!(ce.extend_from_simple(&ConstrSimple::new([(100, 1), (3, 2)], 50)));
            let before = ce.to_simple();
            assert!(!ce.fix_overflow(&trail, 14, 12, 0));
            assert!(!ce.fix_overflow(&trail, 0, 12, 0));
            assert_eq!(ce.to_simple(), before);
        }
    }
}

mod analysis {
    use super::*;

    #[test]
    fn every_tier_with_and_without_multiplication() {
        for bits_overflow in BUDGETS {
            for multiply in [true, false] {
                let mut solver = Solver::from_config(config(bits_overflow, multiply));
                let constraints = big_subset_sum(&mut solver, 12, false);
                assert_eq!(solver.solve_full(), Ok(SolveState::Sat));
                let solution = solver.last_solution().unwrap();
                assert!(constraints
                    .iter()
                    .all(|c| c.is_satisfied_by(|l| solution.contains(&l))));
                assert!(learned_within_budget(&solver, 29));

                let mut solver = Solver::from_config(config(bits_overflow, multiply));
                big_subset_sum(&mut solver, 12, true);
                assert_eq!(solver.solve_full(), Ok(SolveState::Unsat));
                assert!(learned_within_budget(&solver, 29));
            }
        }
    }

    #[test]
    fn unbounded_learning() {
        let mut config = config(0, true);
        config.bits_learned.value = 0;
        let mut solver = Solver::from_config(config);
        big_subset_sum(&mut solver, 12, true);
        assert_eq!(solver.solve_full(), Ok(SolveState::Unsat));
    }
}
