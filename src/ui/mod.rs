// Shared view types for the sign-up board UI.
//
// `build_cards` is the pure rendering half of the view-sync controller: it
// turns a fetched catalog into the card structures the board draws, with no
// network or widget access. Rendering the same catalog twice always yields
// the same cards.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

use crate::catalog::ActivityCatalog;

pub mod board;
pub mod config;

/// Characters left untouched by JavaScript's `encodeURIComponent`, the
/// encoding the unregister correlation data uses.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Opaque correlation data carried by each participant row's removal
/// control: the activity name and email, percent-encoded so they survive
/// embedding as attribute-style strings, decoded again before the
/// unregister request is issued.
#[derive(Debug, Clone, PartialEq)]
pub struct UnregisterToken {
    activity: String,
    email: String,
}

impl UnregisterToken {
    pub fn encode(activity: &str, email: &str) -> Self {
        Self {
            activity: utf8_percent_encode(activity, COMPONENT).to_string(),
            email: utf8_percent_encode(email, COMPONENT).to_string(),
        }
    }

    pub fn decode(&self) -> (String, String) {
        (
            percent_decode_str(&self.activity)
                .decode_utf8_lossy()
                .into_owned(),
            percent_decode_str(&self.email)
                .decode_utf8_lossy()
                .into_owned(),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantRow {
    pub email: String,
    pub token: UnregisterToken,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActivityCard {
    pub name: String,
    pub description: String,
    pub schedule: String,
    /// Raw `max_participants - participants.len()`, negative when the server
    /// over-admits.
    pub spots_left: i64,
    pub participants: Vec<ParticipantRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: StatusKind::Error,
        }
    }
}

/// Build one card per catalog entry, in server order.
pub fn build_cards(catalog: &ActivityCatalog) -> Vec<ActivityCard> {
    catalog
        .iter()
        .map(|(name, activity)| ActivityCard {
            name: name.to_string(),
            description: activity.description.clone(),
            schedule: activity.schedule.clone(),
            spots_left: activity.spots_left(),
            participants: activity
                .participants
                .iter()
                .map(|email| ParticipantRow {
                    email: email.clone(),
                    token: UnregisterToken::encode(name, email),
                })
                .collect(),
        })
        .collect()
}
