//! What the page shows and how user input turns into contract writes.

pub mod controller;
pub mod form;
pub mod model;
pub mod notify;
pub mod spawn;

pub use controller::{DappController, SubmitError};
pub use form::{ValidationError, add_candidate_form, vote_form, wave_form};
pub use model::ViewState;
pub use notify::{Notifier, RecordingNotifier};
pub use spawn::{LocalTask, QueueSpawner, Spawner};
