use serde_json::{Value, json};
use wv_api_types::{Candidate, RecordId};

use crate::ContractError;
use crate::interface::{
    ContractInterface, EncodedCall, field, positional, string_arg, uint_arg,
};

pub const NEW_CANDIDATE: &str = "NewCandidate";
pub const NEW_VOTE: &str = "NewVote";

/// The voting app: candidates are added by name and voted for by id.
pub struct VotingApp;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteAction {
    AddCandidate { name: String },
    CastVote { candidate: RecordId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteEvent {
    NewCandidate { id: RecordId, name: String },
    /// `votes` is the candidate's tally after the vote.
    NewVote {
        id: RecordId,
        name: String,
        votes: u64,
    },
}

impl ContractInterface for VotingApp {
    type Record = Candidate;
    type Action = VoteAction;
    type Event = VoteEvent;

    const NAME: &'static str = "VotingApp";
    const READ_ALL: &'static str = "getAllCandidates";
    const COUNT: Option<&'static str> = None;
    const EVENTS: &'static [&'static str] = &[NEW_CANDIDATE, NEW_VOTE];
    const DEFAULT_GAS_LIMIT: Option<u64> = None;

    fn decode_record(raw: &Value) -> Result<Candidate, ContractError> {
        let context = "candidate";
        Ok(Candidate {
            id: RecordId(uint_arg(field(raw, "id", 0, context)?)?),
            name: string_arg(field(raw, "name", 1, context)?, context)?,
            votes: uint_arg(field(raw, "votes", 2, context)?)?,
        })
    }

    fn encode_action(action: &VoteAction) -> EncodedCall {
        match action {
            VoteAction::AddCandidate { name } => EncodedCall {
                method: "addCandidate",
                args: vec![json!(name)],
            },
            VoteAction::CastVote { candidate } => EncodedCall {
                method: "vote",
                args: vec![json!(candidate.0)],
            },
        }
    }

    fn decode_event(event: &str, args: &[Value]) -> Result<VoteEvent, ContractError> {
        match event {
            NEW_CANDIDATE => Ok(VoteEvent::NewCandidate {
                name: string_arg(positional(args, 0, event)?, event)?,
                id: RecordId(uint_arg(positional(args, 1, event)?)?),
            }),
            NEW_VOTE => Ok(VoteEvent::NewVote {
                name: string_arg(positional(args, 0, event)?, event)?,
                id: RecordId(uint_arg(positional(args, 1, event)?)?),
                votes: uint_arg(positional(args, 2, event)?)?,
            }),
            other => Err(ContractError::Unsupported(format!("event {other}"))),
        }
    }

    fn success_message(action: &VoteAction) -> &'static str {
        match action {
            VoteAction::AddCandidate { .. } => "Candidate submitted",
            VoteAction::CastVote { .. } => "Vote submitted",
        }
    }

    fn failure_message(action: &VoteAction) -> &'static str {
        match action {
            VoteAction::AddCandidate { .. } => "Could not add new candidate",
            VoteAction::CastVote { .. } => "Could not cast vote",
        }
    }
}
