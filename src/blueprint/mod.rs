//! Declarative machine topology, loadable from JSON.
//!
//! A [`Blueprint`] lists states, keyed transitions and static fallbacks by
//! name. Building it yields a [`StateMachine`] without hooks; hooks are then
//! attached by re-adding states looked up by name, or resolvers wired through
//! `state_mut`.
//!
//! # Example
//!
//! ```rust
//! use statewise::blueprint::Blueprint;
//!
//! let blueprint = Blueprint::from_json(r#"{
//!     "name": "traffic",
//!     "states": [
//!         { "name": "GREEN", "transitions": { "TICK": "YELLOW" } },
//!         { "name": "YELLOW", "transitions": { "TICK": "RED" }, "fallback": "EXIT" },
//!         { "name": "RED", "transitions": { "TICK": "GREEN" } },
//!         { "name": "EXIT" }
//!     ]
//! }"#).unwrap();
//!
//! let machine = blueprint.build::<String, ()>().unwrap();
//! let mut light = machine.instance_from_name("YELLOW").unwrap();
//! light.fire("HONK".to_string()).unwrap();
//! assert_eq!(light.current_state().name(), "EXIT");
//! ```

use crate::core::{EventKey, State};
use crate::error::{FsmError, Result};
use crate::machine::StateMachine;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;
use std::str::FromStr;

/// Topology of one state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBlueprint {
    pub name: String,
    /// Event key -> target state name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub transitions: BTreeMap<String, String>,
    /// Static state-scope fallback target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

/// Topology of a whole machine.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub name: String,
    /// States in registration order
    #[serde(default)]
    pub states: Vec<StateBlueprint>,
    /// Static machine-scope fallback target
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl Blueprint {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describe an existing machine.
    ///
    /// Hooks and dynamic fallbacks have no declarative form and are left out.
    pub fn from_machine<K: EventKey, D>(machine: &StateMachine<K, D>) -> Self {
        let target_name = |id| machine.state(id).name().to_string();
        Self {
            name: machine.name().to_string(),
            states: machine
                .states()
                .map(|(_, state)| StateBlueprint {
                    name: state.name().to_string(),
                    transitions: state
                        .transitions()
                        .map(|(key, to)| (key.to_string(), target_name(to)))
                        .collect(),
                    fallback: state.fallback().static_target().map(target_name),
                })
                .collect(),
            fallback: machine.fallback().static_target().map(target_name),
        }
    }

    /// Build a machine whose keys are parsed from the blueprint's strings.
    ///
    /// Fails with `StateNotFound` when a transition or fallback names an
    /// undeclared state, and with `InvalidBlueprint` on duplicate state names
    /// or unparsable keys.
    pub fn build<K, D>(&self) -> Result<StateMachine<K, D>>
    where
        K: EventKey + FromStr,
        K::Err: Display,
    {
        let mut machine = StateMachine::new(self.name.clone());

        let mut seen = HashSet::new();
        for state in &self.states {
            if !seen.insert(state.name.as_str()) {
                return Err(FsmError::InvalidBlueprint {
                    message: format!("state '{}' is declared more than once", state.name),
                });
            }
            machine.add_state(State::new(state.name.clone()));
        }

        for state in &self.states {
            let from = machine.state_id(&state.name)?;
            for (key, target) in &state.transitions {
                let key = key.parse::<K>().map_err(|err| FsmError::InvalidBlueprint {
                    message: format!("event key '{key}' of state '{}': {err}", state.name),
                })?;
                let to = machine.state_id(target)?;
                machine.state_mut(from).add_transition(key, to);
            }
            if let Some(target) = &state.fallback {
                let to = machine.state_id(target)?;
                machine.state_mut(from).set_fallback_transition(to);
            }
        }

        if let Some(target) = &self.fallback {
            let to = machine.state_id(target)?;
            machine.set_fallback_transition(to);
        }

        tracing::debug!(machine = %self.name, states = self.states.len(), "Built machine from blueprint");
        Ok(machine)
    }
}
