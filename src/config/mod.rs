/*!
Configuration of a solver.

All configuration is contained in a [Config], which is owned by the [shared context](crate::context::SharedContext) of a solver and read at fixed points of a solve.
Each tunable is a [ConfigOption], with a name, a permitted range, and the latest [state](ContextState) of a solver at which the option may be revised.

Options may be set by name, using the names of the table below, with values given as strings.

```rust
# use otter_pb::config::{Config, Division};
let mut config = Config::default();
assert!(config.set("ca-division", "rto").is_ok());
assert_eq!(config.ca_division.value, Division::RoundToOne);

assert!(config.set("var-weight", "2.0").is_err());
assert!(config.set("not-an-option", "1").is_err());
```

| name | default | meaning |
|------|---------|---------|
| `seed` | 1 | seed of the source of randomness |
| `timeout` | 0 | wall-clock seconds, zero for no limit |
| `timeout-det` | 0 | deterministic time, zero for no limit |
| `var-weight` | 0.99 | decay of variable activity |
| `luby-base` | 2 | base of the luby sequence of restarts |
| `luby-mult` | 100 | conflicts per unit of the luby sequence |
| `db-decay` | 1 | decay of learned constraint activity at each reduction |
| `db-exp` | 3.5 | exponent of the growth of reduction intervals |
| `db-scale` | 1 | multiplier of reduction and inprocessing intervals |
| `db-safelbd` | 1 | learned constraints with at most this lbd are kept |
| `prop-counting` | 0.6 | fraction of watched coefficient mass beyond which counting propagation is used |
| `lp` | 0 | ratio of time spent in the linear relaxation, zero to disable |
| `ca-multiply` | true | multiply the reason by the conflicting coefficient before division |
| `ca-division` | mindiv | division method for reasons: `rto`, `slack+1`, `mindiv` |
| `ca-weaken-nonimplying` | true | weaken falsified literals not needed to assert |
| `ca-min` | true | minimise learned constraints by self-subsumption |
| `ca-cancelingunknowns` | true | weaken unassigned literals which do not cancel during resolution |
| `bits-overflow` | 62 | bit budget of conflict analysis, zero for arbitrary precision |
| `bits-reduced` | 29 | bit length after an overflow is reduced |
| `bits-learned` | 29 | bit budget of learned constraints, zero for no limit |
| `cg` | 0.5 | fraction of time spent core-guided during optimization |
| `cg-resprop` | true | resolve over propagated assumptions when extracting a core |
| `cg-strat` | 2 | stratification factor, one to disable |
| `cg-reform` | always | reformulation with lazy variables: `always`, `depletion`, `never` |
| `opt-boundupper` | true | bound the objective by each solution found |
| `inp-purelits` | true | fix pure literals |
| `inp-probing` | true | probe literals for units and equalities |
| `inp-atmostone` | 0.1 | budget factor of at-most-one detection, zero to disable |
| `inp-dombreaklim` | 0 | candidate limit of dominance breaking, zero to disable |
| `inp-basetime` | 1 | interval factor of inprocessing, zero to disable |
*/

mod config_option;
pub use config_option::{parse_switch, ConfigOption};

mod division;
pub use division::Division;

mod reformulation;
pub use reformulation::Reformulation;

use std::str::FromStr;

use crate::{context::ContextState, types::err::OptionError};

/// The primary configuration structure.
#[derive(Clone, Debug)]
pub struct Config {
    /// Seed of the source of randomness.
    pub seed: ConfigOption<u64>,

    /// Wall-clock limit of a solve in seconds, with zero for no limit.
    pub timeout: ConfigOption<f64>,

    /// Deterministic time limit of a solve, with zero for no limit.
    pub timeout_det: ConfigOption<f64>,

    /// Decay of variable activity after each conflict.
    pub var_weight: ConfigOption<f64>,

    pub luby_base: ConfigOption<f64>,

    pub luby_mult: ConfigOption<f64>,

    pub db_decay: ConfigOption<f64>,

    pub db_exp: ConfigOption<f64>,

    pub db_scale: ConfigOption<f64>,

    pub db_safelbd: ConfigOption<u32>,

    /// General constraints use counting propagation when the coefficient mass required for watches exceeds `1 - prop_counting` of the total.
    pub prop_counting: ConfigOption<f64>,

    pub lp: ConfigOption<f64>,

    pub ca_multiply: ConfigOption<bool>,

    pub ca_division: ConfigOption<Division>,

    pub ca_weaken_nonimplying: ConfigOption<bool>,

    pub ca_min: ConfigOption<bool>,

    pub ca_cancelingunknowns: ConfigOption<bool>,

    pub bits_overflow: ConfigOption<u32>,

    pub bits_reduced: ConfigOption<u32>,

    pub bits_learned: ConfigOption<u32>,

    pub cg_hybrid: ConfigOption<f64>,

    pub cg_resprop: ConfigOption<bool>,

    pub cg_strat: ConfigOption<f64>,

    pub cg_reform: ConfigOption<Reformulation>,

    pub opt_boundupper: ConfigOption<bool>,

    pub inp_purelits: ConfigOption<bool>,

    pub inp_probing: ConfigOption<bool>,

    pub inp_atmostone: ConfigOption<f64>,

    pub inp_dombreaklim: ConfigOption<u32>,

    pub inp_basetime: ConfigOption<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: ConfigOption {
                name: "seed",
                min: 0,
                max: u64::MAX,
                max_state: ContextState::Configuration,
                value: 1,
            },

            timeout: ConfigOption {
                name: "timeout",
                min: 0.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 0.0,
            },

            timeout_det: ConfigOption {
                name: "timeout-det",
                min: 0.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 0.0,
            },

            var_weight: ConfigOption {
                name: "var-weight",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Solving,
                value: 0.99,
            },

            luby_base: ConfigOption {
                name: "luby-base",
                min: 1.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 2.0,
            },

            luby_mult: ConfigOption {
                name: "luby-mult",
                min: 1.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 100.0,
            },

            db_decay: ConfigOption {
                name: "db-decay",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Solving,
                value: 1.0,
            },

            db_exp: ConfigOption {
                name: "db-exp",
                min: 0.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 3.5,
            },

            db_scale: ConfigOption {
                name: "db-scale",
                min: 0.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 1.0,
            },

            db_safelbd: ConfigOption {
                name: "db-safelbd",
                min: 0,
                max: crate::db::MAX_LBD,
                max_state: ContextState::Solving,
                value: 1,
            },

            prop_counting: ConfigOption {
                name: "prop-counting",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Solving,
                value: 0.6,
            },

            lp: ConfigOption {
                name: "lp",
                min: 0.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 0.0,
            },

            ca_multiply: ConfigOption {
                name: "ca-multiply",
                min: false,
                max: true,
                max_state: ContextState::Solving,
                value: true,
            },

            ca_division: ConfigOption {
                name: "ca-division",
                min: Division::MIN,
                max: Division::MAX,
                max_state: ContextState::Solving,
                value: Division::MinDiv,
            },

            ca_weaken_nonimplying: ConfigOption {
                name: "ca-weaken-nonimplying",
                min: false,
                max: true,
                max_state: ContextState::Solving,
                value: true,
            },

            ca_min: ConfigOption {
                name: "ca-min",
                min: false,
                max: true,
                max_state: ContextState::Solving,
                value: true,
            },

            ca_cancelingunknowns: ConfigOption {
                name: "ca-cancelingunknowns",
                min: false,
                max: true,
                max_state: ContextState::Solving,
                value: true,
            },

            bits_overflow: ConfigOption {
                name: "bits-overflow",
                min: 0,
                max: 1_000_000_000,
                max_state: ContextState::Solving,
                value: 62,
            },

            bits_reduced: ConfigOption {
                name: "bits-reduced",
                min: 1,
                max: 1_000_000_000,
                max_state: ContextState::Solving,
                value: 29,
            },

            bits_learned: ConfigOption {
                name: "bits-learned",
                min: 0,
                max: 1_000_000_000,
                max_state: ContextState::Solving,
                value: 29,
            },

            cg_hybrid: ConfigOption {
                name: "cg",
                min: 0.0,
                max: 1.0,
                max_state: ContextState::Solving,
                value: 0.5,
            },

            cg_resprop: ConfigOption {
                name: "cg-resprop",
                min: false,
                max: true,
                max_state: ContextState::Solving,
                value: true,
            },

            cg_strat: ConfigOption {
                name: "cg-strat",
                min: 1.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 2.0,
            },

            cg_reform: ConfigOption {
                name: "cg-reform",
                min: Reformulation::MIN,
                max: Reformulation::MAX,
                max_state: ContextState::Solving,
                value: Reformulation::Always,
            },

            opt_boundupper: ConfigOption {
                name: "opt-boundupper",
                min: false,
                max: true,
                max_state: ContextState::Solving,
                value: true,
            },

            inp_purelits: ConfigOption {
                name: "inp-purelits",
                min: false,
                max: true,
                max_state: ContextState::Solving,
                value: true,
            },

            inp_probing: ConfigOption {
                name: "inp-probing",
                min: false,
                max: true,
                max_state: ContextState::Solving,
                value: true,
            },

            inp_atmostone: ConfigOption {
                name: "inp-atmostone",
                min: 0.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 0.1,
            },

            inp_dombreaklim: ConfigOption {
                name: "inp-dombreaklim",
                min: 0,
                max: u32::MAX,
                max_state: ContextState::Solving,
                value: 0,
            },

            inp_basetime: ConfigOption {
                name: "inp-basetime",
                min: 0.0,
                max: f64::MAX,
                max_state: ContextState::Solving,
                value: 1.0,
            },
        }
    }
}

fn apply<T: Clone + PartialOrd + FromStr>(
    option: &mut ConfigOption<T>,
    value: &str,
    state: ContextState,
) -> Result<(), OptionError> {
    if state.is_beyond(option.max_state) {
        return Err(OptionError::Locked(option.name.to_string()));
    }
    option.set_from_str(value)
}

fn apply_switch(option: &mut ConfigOption<bool>, value: &str, state: ContextState) -> Result<(), OptionError> {
    if state.is_beyond(option.max_state) {
        return Err(OptionError::Locked(option.name.to_string()));
    }
    option.set_switch(value)
}

impl Config {
    /// Sets the option `name` to `value`, as if from a solver yet to be configured.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        self.set_in_state(name, value, ContextState::Configuration)
    }

    /// Sets the option `name` to `value`, if permitted in `state`.
    pub fn set_in_state(&mut self, name: &str, value: &str, state: ContextState) -> Result<(), OptionError> {
        match name {
            "seed" => apply(&mut self.seed, value, state),
            "timeout" => apply(&mut self.timeout, value, state),
            "timeout-det" => apply(&mut self.timeout_det, value, state),
            "var-weight" => apply(&mut self.var_weight, value, state),
            "luby-base" => apply(&mut self.luby_base, value, state),
            "luby-mult" => apply(&mut self.luby_mult, value, state),
            "db-decay" => apply(&mut self.db_decay, value, state),
            "db-exp" => apply(&mut self.db_exp, value, state),
            "db-scale" => apply(&mut self.db_scale, value, state),
            "db-safelbd" => apply(&mut self.db_safelbd, value, state),
            "prop-counting" => apply(&mut self.prop_counting, value, state),
            "lp" => apply(&mut self.lp, value, state),
            "ca-multiply" => apply_switch(&mut self.ca_multiply, value, state),
            "ca-division" => apply(&mut self.ca_division, value, state),
            "ca-weaken-nonimplying" => apply_switch(&mut self.ca_weaken_nonimplying, value, state),
            "ca-min" => apply_switch(&mut self.ca_min, value, state),
            "ca-cancelingunknowns" => apply_switch(&mut self.ca_cancelingunknowns, value, state),
            "bits-overflow" => apply(&mut self.bits_overflow, value, state),
            "bits-reduced" => apply(&mut self.bits_reduced, value, state),
            "bits-learned" => apply(&mut self.bits_learned, value, state),
            "cg" | "cg-hybrid" => apply(&mut self.cg_hybrid, value, state),
            "cg-resprop" => apply_switch(&mut self.cg_resprop, value, state),
            "cg-strat" => apply(&mut self.cg_strat, value, state),
            "cg-reform" => apply(&mut self.cg_reform, value, state),
            "opt-boundupper" => apply_switch(&mut self.opt_boundupper, value, state),
            "inp-purelits" => apply_switch(&mut self.inp_purelits, value, state),
            "inp-probing" => apply_switch(&mut self.inp_probing, value, state),
            "inp-atmostone" => apply(&mut self.inp_atmostone, value, state),
            "inp-dombreaklim" => apply(&mut self.inp_dombreaklim, value, state),
            "inp-basetime" => apply(&mut self.inp_basetime, value, state),
            _ => Err(OptionError::UnknownOption(name.to_string())),
        }
    }

    /// The bit length to which coefficients are reduced after an overflow during analysis.
    /// Always strictly below the overflow budget, when bounded.
    pub fn bits_reduced(&self) -> u32 {
        match self.bits_overflow.value {
            0 => self.bits_reduced.value,
            overflow => self.bits_reduced.value.min(overflow.saturating_sub(1)).max(1),
        }
    }
}
