use thiserror::Error;
use tracing::debug;
use wv_api_types::RecordId;
use wv_contract::{VoteAction, WaveAction};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a message")]
    EmptyMessage,
    #[error("Please input the candidate name")]
    EmptyCandidateName,
    #[error("Please select a candidate")]
    NoCandidateSelected,
}

fn required(input: &str, err: ValidationError) -> Result<String, ValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        debug!("rejected form input: {}", err);
        return Err(err);
    }
    Ok(trimmed.to_owned())
}

pub fn wave_form(message: &str) -> Result<WaveAction, ValidationError> {
    let message = required(message, ValidationError::EmptyMessage)?;
    Ok(WaveAction::Wave { message })
}

pub fn add_candidate_form(name: &str) -> Result<VoteAction, ValidationError> {
    let name = required(name, ValidationError::EmptyCandidateName)?;
    Ok(VoteAction::AddCandidate { name })
}

/// `selection` is the value of the candidate picker: the candidate id as
/// decimal text, or empty for the placeholder option.
pub fn vote_form(selection: &str) -> Result<VoteAction, ValidationError> {
    let id = required(selection, ValidationError::NoCandidateSelected)?
        .parse::<u64>()
        .map_err(|_| ValidationError::NoCandidateSelected)?;
    Ok(VoteAction::CastVote {
        candidate: RecordId(id),
    })
}
