use std::fmt;

use serde::{Deserialize, Serialize};

/// Speech-act tag of a message.
///
/// Closed set; the simplified request protocol replies directly without an
/// intermediate `agree`, but the tag stays part of the vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Performative {
    Request,
    Inform,
    Confirm,
    Failure,
    Cancel,
    NotUnderstood,
    Agree,
}

impl Performative {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Performative::Request => "request",
            Performative::Inform => "inform",
            Performative::Confirm => "confirm",
            Performative::Failure => "failure",
            Performative::Cancel => "cancel",
            Performative::NotUnderstood => "not-understood",
            Performative::Agree => "agree",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "request" => Some(Performative::Request),
            "inform" => Some(Performative::Inform),
            "confirm" => Some(Performative::Confirm),
            "failure" => Some(Performative::Failure),
            "cancel" => Some(Performative::Cancel),
            "not-understood" => Some(Performative::NotUnderstood),
            "agree" => Some(Performative::Agree),
            _ => None,
        }
    }
}

impl fmt::Display for Performative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}
