use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

use super::ordered_map;

/// One of the two disjoint groups in a two-sided matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Proposer,
    Responder,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Proposer => Side::Responder,
            Side::Responder => Side::Proposer,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Proposer => f.write_str("proposer"),
            Side::Responder => f.write_str("responder"),
        }
    }
}

/// Violations of the preference profile invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("{side} names must not be empty")]
    EmptyName { side: Side },

    #[error("duplicate {side} name: {name}")]
    DuplicateName { side: Side, name: String },

    #[error("{name} appears as both a proposer and a responder")]
    NameInBothGroups { name: String },

    #[error("{side} {person} ranks {name}, who is not a {}", .side.other())]
    UnknownPreference {
        side: Side,
        person: String,
        name: String,
    },

    #[error("{side} {person} ranks {name} more than once")]
    DuplicatePreference {
        side: Side,
        person: String,
        name: String,
    },

    #[error("too many {side}s: {count} exceeds the limit of {limit}")]
    TooManyParticipants { side: Side, count: usize, limit: usize },
}

/// Names of one group with their ranked preference lists, in the order supplied
///
/// This is the raw, unvalidated form read off the wire. Repeated names are kept
/// so that [`PreferenceProfile::new`] can reject them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Roster {
    entries: Vec<(String, Vec<String>)>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<N, I, P>(&mut self, name: N, preferences: I)
    where
        N: Into<String>,
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.entries
            .push((name.into(), preferences.into_iter().map(Into::into).collect()));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, prefs)| (name.as_str(), prefs.as_slice()))
    }
}

impl<N, I, P> FromIterator<(N, I)> for Roster
where
    N: Into<String>,
    I: IntoIterator<Item = P>,
    P: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, I)>>(iter: T) -> Self {
        let mut roster = Roster::new();
        for (name, prefs) in iter {
            roster.push(name, prefs);
        }
        roster
    }
}

impl Serialize for Roster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ordered_map::serialize(&self.entries, serializer)
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ordered_map::deserialize(deserializer).map(|entries| Roster { entries })
    }
}

/// Validated, immutable snapshot of both groups and their preferences
///
/// Persons are addressed by their position in the roster they were supplied
/// in. Preference lists hold indices into the opposite roster, and rank tables
/// give O(1) "how much does X like Y" lookups; `None` marks an unacceptable
/// partner.
#[derive(Debug, Clone)]
pub struct PreferenceProfile {
    proposers: Vec<String>,
    responders: Vec<String>,
    proposer_prefs: Vec<Vec<usize>>,
    responder_prefs: Vec<Vec<usize>>,
    proposer_ranks: Vec<Vec<Option<usize>>>,
    responder_ranks: Vec<Vec<Option<usize>>>,
    proposer_index: HashMap<String, usize>,
    responder_index: HashMap<String, usize>,
}

impl PreferenceProfile {
    /// Validate both rosters and build the profile
    ///
    /// Fails on the first invariant violation found; nothing is partially
    /// accepted.
    pub fn new(proposers: &Roster, responders: &Roster) -> Result<Self, ProfileError> {
        let proposer_index = index_roster(proposers, Side::Proposer)?;
        let responder_index = index_roster(responders, Side::Responder)?;

        if let Some((name, _)) = proposers
            .iter()
            .find(|(name, _)| responder_index.contains_key(*name))
        {
            return Err(ProfileError::NameInBothGroups {
                name: name.to_string(),
            });
        }

        let proposer_prefs = resolve_lists(proposers, &responder_index, Side::Proposer)?;
        let responder_prefs = resolve_lists(responders, &proposer_index, Side::Responder)?;

        let proposer_ranks = rank_table(&proposer_prefs, responders.len());
        let responder_ranks = rank_table(&responder_prefs, proposers.len());

        Ok(Self {
            proposers: proposers.iter().map(|(name, _)| name.to_string()).collect(),
            responders: responders.iter().map(|(name, _)| name.to_string()).collect(),
            proposer_prefs,
            responder_prefs,
            proposer_ranks,
            responder_ranks,
            proposer_index,
            responder_index,
        })
    }

    pub fn proposer_count(&self) -> usize {
        self.proposers.len()
    }

    pub fn responder_count(&self) -> usize {
        self.responders.len()
    }

    pub fn proposers(&self) -> &[String] {
        &self.proposers
    }

    pub fn responders(&self) -> &[String] {
        &self.responders
    }

    pub fn proposer_name(&self, proposer: usize) -> &str {
        &self.proposers[proposer]
    }

    pub fn responder_name(&self, responder: usize) -> &str {
        &self.responders[responder]
    }

    pub fn proposer_index(&self, name: &str) -> Option<usize> {
        self.proposer_index.get(name).copied()
    }

    pub fn responder_index(&self, name: &str) -> Option<usize> {
        self.responder_index.get(name).copied()
    }

    /// Responders acceptable to `proposer`, most preferred first
    pub fn proposer_preferences(&self, proposer: usize) -> &[usize] {
        &self.proposer_prefs[proposer]
    }

    /// Proposers acceptable to `responder`, most preferred first
    pub fn responder_preferences(&self, responder: usize) -> &[usize] {
        &self.responder_prefs[responder]
    }

    /// Position of `responder` in the proposer's list (0 = favourite)
    #[inline]
    pub fn proposer_rank(&self, proposer: usize, responder: usize) -> Option<usize> {
        self.proposer_ranks[proposer][responder]
    }

    /// Position of `proposer` in the responder's list (0 = favourite)
    #[inline]
    pub fn responder_rank(&self, responder: usize, proposer: usize) -> Option<usize> {
        self.responder_ranks[responder][proposer]
    }

    /// The same preferences with the proposing and responding roles exchanged
    pub fn swapped(&self) -> Self {
        Self {
            proposers: self.responders.clone(),
            responders: self.proposers.clone(),
            proposer_prefs: self.responder_prefs.clone(),
            responder_prefs: self.proposer_prefs.clone(),
            proposer_ranks: self.responder_ranks.clone(),
            responder_ranks: self.proposer_ranks.clone(),
            proposer_index: self.responder_index.clone(),
            responder_index: self.proposer_index.clone(),
        }
    }

    /// Rebuild the wire form of the proposer roster
    pub fn proposer_roster(&self) -> Roster {
        to_roster(&self.proposers, &self.proposer_prefs, &self.responders)
    }

    /// Rebuild the wire form of the responder roster
    pub fn responder_roster(&self) -> Roster {
        to_roster(&self.responders, &self.responder_prefs, &self.proposers)
    }
}

fn index_roster(roster: &Roster, side: Side) -> Result<HashMap<String, usize>, ProfileError> {
    let mut index = HashMap::with_capacity(roster.len());
    for (position, (name, _)) in roster.iter().enumerate() {
        if name.is_empty() {
            return Err(ProfileError::EmptyName { side });
        }
        if index.insert(name.to_string(), position).is_some() {
            return Err(ProfileError::DuplicateName {
                side,
                name: name.to_string(),
            });
        }
    }
    Ok(index)
}

fn resolve_lists(
    roster: &Roster,
    opposite: &HashMap<String, usize>,
    side: Side,
) -> Result<Vec<Vec<usize>>, ProfileError> {
    roster
        .iter()
        .map(|(person, prefs)| {
            let mut seen = HashSet::with_capacity(prefs.len());
            prefs
                .iter()
                .map(|name| {
                    let index = *opposite.get(name).ok_or_else(|| ProfileError::UnknownPreference {
                        side,
                        person: person.to_string(),
                        name: name.clone(),
                    })?;
                    if !seen.insert(index) {
                        return Err(ProfileError::DuplicatePreference {
                            side,
                            person: person.to_string(),
                            name: name.clone(),
                        });
                    }
                    Ok(index)
                })
                .collect()
        })
        .collect()
}

fn rank_table(lists: &[Vec<usize>], opposite_len: usize) -> Vec<Vec<Option<usize>>> {
    lists
        .iter()
        .map(|list| {
            let mut ranks = vec![None; opposite_len];
            for (rank, &other) in list.iter().enumerate() {
                ranks[other] = Some(rank);
            }
            ranks
        })
        .collect()
}

fn to_roster(names: &[String], lists: &[Vec<usize>], opposite: &[String]) -> Roster {
    names
        .iter()
        .zip(lists)
        .map(|(name, list)| (name.as_str(), list.iter().map(|&i| opposite[i].as_str())))
        .collect()
}
