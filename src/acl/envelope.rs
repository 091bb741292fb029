use serde::{Deserialize, Serialize};

use crate::acl::content::{ContentGraph, vocab};
use crate::acl::performative::Performative;
use crate::error::Result;

/// Subject of the message node added by `Envelope::build`.
const MESSAGE_NODE: &str = "acl:message";

/// Typed view over the envelope fields of a parsed message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeProps {
    pub performative: Performative,
    pub sender: String,
    pub receiver: Option<String>,
    pub msg_id: Option<u64>,
    pub content: Option<String>,
}

/// A FIPA-ACL-style message: a content graph plus one message node carrying
/// the envelope statements. Built per call, serialized, never mutated after
/// send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Envelope {
    graph: ContentGraph,
}

impl Envelope {
    /// Wraps `content` in an envelope. A reply without payload (failure,
    /// cancel, not-understood) passes an empty graph and no content subject.
    pub fn build(
        content: ContentGraph,
        performative: Performative,
        sender: &str,
        receiver: Option<&str>,
        content_subject: Option<&str>,
        msg_id: u64,
    ) -> Envelope {
        let mut graph = content;
        graph.add(MESSAGE_NODE, vocab::RDF_TYPE, vocab::ACL_MESSAGE);
        graph.add(MESSAGE_NODE, vocab::PERFORMATIVE, performative.as_tag());
        graph.add(MESSAGE_NODE, vocab::SENDER, sender);
        if let Some(receiver) = receiver {
            graph.add(MESSAGE_NODE, vocab::RECEIVER, receiver);
        }
        graph.add(MESSAGE_NODE, vocab::MSG_ID, msg_id.to_string());
        if let Some(subject) = content_subject {
            graph.add(MESSAGE_NODE, vocab::CONTENT, subject);
        }
        Envelope { graph }
    }

    pub fn parse(raw: &str) -> Result<Envelope> {
        let graph: ContentGraph = serde_json::from_str(raw)?;
        Ok(Envelope { graph })
    }

    pub fn serialize(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.graph)?)
    }

    /// Envelope fields of this message, or `None` when the graph carries no
    /// message node with a recognized performative and a sender — i.e. the
    /// input is not an ACL message. Distinct from a parsed envelope whose
    /// performative is simply not the one a caller expects.
    pub fn properties(&self) -> Option<EnvelopeProps> {
        let node = self.graph.subject_with(vocab::RDF_TYPE, vocab::ACL_MESSAGE)?;
        let performative = Performative::from_tag(self.graph.value_of(node, vocab::PERFORMATIVE)?)?;
        let sender = self.graph.value_of(node, vocab::SENDER)?.to_string();
        let receiver = self.graph.value_of(node, vocab::RECEIVER).map(str::to_string);
        let msg_id = self
            .graph
            .value_of(node, vocab::MSG_ID)
            .and_then(|v| v.parse().ok());
        let content = self.graph.value_of(node, vocab::CONTENT).map(str::to_string);
        Some(EnvelopeProps {
            performative,
            sender,
            receiver,
            msg_id,
            content,
        })
    }

    pub fn graph(&self) -> &ContentGraph {
        &self.graph
    }

    /// The payload without envelope statements: every triple except those of
    /// subjects typed as message nodes. Used when re-wrapping a reply's
    /// content under a new envelope.
    pub fn content_graph(&self) -> ContentGraph {
        let nodes = self.graph.subjects_with(vocab::RDF_TYPE, vocab::ACL_MESSAGE);
        let mut payload = ContentGraph::new();
        for t in self.graph.iter() {
            if !nodes.contains(&t.subject.as_str()) {
                payload.add(t.subject.clone(), t.predicate.clone(), t.value.clone());
            }
        }
        payload
    }
}
