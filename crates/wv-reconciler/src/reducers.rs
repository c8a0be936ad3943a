use wv_api_types::{Candidate, Notification, WaveMessage};
use wv_contract::{VoteEvent, WaveEvent};

use crate::store::{Effect, Records, Reduce};

impl Reduce<WaveMessage> for WaveEvent {
    fn reduce(self, records: &mut Records<WaveMessage>) -> Effect {
        match self {
            WaveEvent::NewWave(wave) => {
                records.insert_if_absent(wave);
                Effect::None
            }
        }
    }

    fn notice(&self) -> Option<Notification> {
        match self {
            WaveEvent::NewWave(wave) => Some(Notification::info(format!(
                "New wave from {}",
                wave.address.short()
            ))),
        }
    }
}

impl Reduce<Candidate> for VoteEvent {
    fn reduce(self, records: &mut Records<Candidate>) -> Effect {
        match self {
            VoteEvent::NewCandidate { id, name } => {
                records.insert_if_absent(Candidate { id, name, votes: 0 });
                Effect::None
            }
            VoteEvent::NewVote { id, votes, .. } => {
                if records.update(&id, |candidate| candidate.votes = votes) {
                    Effect::None
                } else {
                    Effect::Refetch
                }
            }
        }
    }

    fn notice(&self) -> Option<Notification> {
        match self {
            VoteEvent::NewCandidate { .. } => Some(Notification::success("New candidate added")),
            VoteEvent::NewVote { .. } => Some(Notification::info("New vote")),
        }
    }
}
