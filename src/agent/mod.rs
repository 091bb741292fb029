use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::acl::{ContentGraph, Envelope, Performative};

/// Addressing record for an agent: one communication endpoint and one stop
/// endpoint. Created from configuration at startup, immutable for the
/// process lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    pub name: String,
    pub uri: String,
    pub address: String,
    pub stop_address: String,
}

impl AgentRef {
    pub fn new(
        name: impl Into<String>,
        uri: impl Into<String>,
        address: impl Into<String>,
        stop_address: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            uri: uri.into(),
            address: address.into(),
            stop_address: stop_address.into(),
        }
    }
}

/// An agent's own identity: its addressing record plus the outbound message
/// counter. Ids increase by exactly one per message built by this identity;
/// they provide local uniqueness only and play no ordering or deduplication
/// role across agents.
#[derive(Debug)]
pub struct AgentIdentity {
    reference: AgentRef,
    msg_counter: AtomicU64,
}

impl AgentIdentity {
    pub fn new(reference: AgentRef) -> Self {
        Self {
            reference,
            msg_counter: AtomicU64::new(0),
        }
    }

    pub fn reference(&self) -> &AgentRef {
        &self.reference
    }

    pub fn name(&self) -> &str {
        &self.reference.name
    }

    pub fn uri(&self) -> &str {
        &self.reference.uri
    }

    pub fn next_msg_id(&self) -> u64 {
        self.msg_counter.fetch_add(1, Ordering::Relaxed)
    }

    pub fn messages_sent(&self) -> u64 {
        self.msg_counter.load(Ordering::Relaxed)
    }

    /// Builds an outbound envelope from this identity, consuming one msg id.
    pub fn message(
        &self,
        content: ContentGraph,
        performative: Performative,
        receiver: Option<&str>,
        content_subject: Option<&str>,
    ) -> Envelope {
        Envelope::build(
            content,
            performative,
            self.uri(),
            receiver,
            content_subject,
            self.next_msg_id(),
        )
    }

    pub fn not_understood(&self, receiver: Option<&str>) -> Envelope {
        self.message(ContentGraph::new(), Performative::NotUnderstood, receiver, None)
    }

    pub fn failure(&self, receiver: Option<&str>) -> Envelope {
        self.message(ContentGraph::new(), Performative::Failure, receiver, None)
    }

    pub fn cancel(&self, receiver: Option<&str>) -> Envelope {
        self.message(ContentGraph::new(), Performative::Cancel, receiver, None)
    }
}
