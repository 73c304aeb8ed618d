//! Participants and their per-round contributions.

use crate::core::error::DomainError;
use crate::deliberation::round::RoundNumber;
use crate::util::char_count;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identity of a deliberation participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ParticipantId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A participant in the deliberation (Entity)
///
/// `persona` is a free-text role description rendered into the
/// participant's system prompt. How personas are chosen is up to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    #[serde(default)]
    pub persona: String,
}

impl Participant {
    pub fn new(id: impl Into<ParticipantId>, persona: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            persona: persona.into(),
        }
    }
}

/// Parses `id` or `id:persona`.
impl FromStr for Participant {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, persona) = match s.split_once(':') {
            Some((id, persona)) => (id.trim(), persona.trim()),
            None => (s.trim(), ""),
        };
        if id.is_empty() {
            return Err(DomainError::InvalidParticipant(format!(
                "missing participant id in '{}'",
                s
            )));
        }
        Ok(Participant::new(id, persona))
    }
}

/// One participant's output for one round (Value Object)
///
/// Immutable once produced; owned by the [`Round`](super::round::Round)
/// that contains it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    participant_id: ParticipantId,
    text: String,
    round_number: RoundNumber,
}

impl Contribution {
    pub fn new(
        participant_id: impl Into<ParticipantId>,
        text: impl Into<String>,
        round_number: RoundNumber,
    ) -> Self {
        Self {
            participant_id: participant_id.into(),
            text: text.into(),
            round_number,
        }
    }

    pub fn participant_id(&self) -> &ParticipantId {
        &self.participant_id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn round_number(&self) -> RoundNumber {
        self.round_number
    }

    pub fn char_count(&self) -> usize {
        char_count(&self.text)
    }
}
