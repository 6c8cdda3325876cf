//! Live agents of an episode, each bound to one controller and one fitness
//! accumulator.
//!
//! An agent, its controller handle and its fitness travel together in a single
//! record keyed by a generational slot id, so removing a bird mid-tick can never
//! misalign the three.

use super::agent::Agent;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Stable handle for an agent within one episode.
    pub struct AgentId;
}

/// Agent state plus its bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentRecord {
    pub agent: Agent,
    /// Index of the bound controller in the episode's controller slice.
    pub controller: usize,
    pub fitness: f64,
}

/// Dense, order-preserving store of live agent records.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    slots: SlotMap<AgentId, AgentRecord>,
    /// Live ids in controller-assignment order.
    order: Vec<AgentId>,
    /// Last known fitness for every controller, live or removed.
    fitness: Vec<f64>,
}

impl Roster {
    /// One agent per controller, all starting at the same spot.
    pub fn spawn(count: usize, x: f64, y: f64) -> Self {
        let mut slots = SlotMap::with_capacity_and_key(count);
        let order = (0..count)
            .map(|controller| {
                slots.insert(AgentRecord {
                    agent: Agent::new(x, y),
                    controller,
                    fitness: 0.0,
                })
            })
            .collect();
        Self {
            slots,
            order,
            fitness: vec![0.0; count],
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Live ids in assignment order (snapshot, safe to hold across removals).
    pub fn ids(&self) -> Vec<AgentId> {
        self.order.clone()
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentRecord> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentRecord> {
        self.slots.get_mut(id)
    }

    /// First live record in assignment order.
    pub fn lead(&self) -> Option<&AgentRecord> {
        self.order.first().and_then(|id| self.slots.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentRecord> + '_ {
        self.order.iter().filter_map(|id| self.slots.get(*id))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut AgentRecord> + '_ {
        self.slots.values_mut()
    }

    /// Remove a record, charging `penalty` to its fitness first.
    ///
    /// The final fitness stays readable through [`Roster::fitness`].
    pub fn remove(&mut self, id: AgentId, penalty: f64) -> Option<AgentRecord> {
        let mut record = self.slots.remove(id)?;
        record.fitness -= penalty;
        self.order.retain(|live| *live != id);
        if let Some(slot) = self.fitness.get_mut(record.controller) {
            *slot = record.fitness;
        }
        Some(record)
    }

    /// Fitness per controller, in controller order.
    pub fn fitness(&self) -> Vec<f64> {
        let mut fitness = self.fitness.clone();
        for record in self.slots.values() {
            if let Some(slot) = fitness.get_mut(record.controller) {
                *slot = record.fitness;
            }
        }
        fitness
    }

    /// Controller handles of the survivors, in assignment order.
    pub fn survivors(&self) -> Vec<usize> {
        self.iter().map(|r| r.controller).collect()
    }
}
