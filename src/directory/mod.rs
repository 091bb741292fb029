use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::acl::{ContentGraph, Envelope, EnvelopeProps, Performative, vocab};
use crate::agent::AgentIdentity;
use crate::dispatch::{Action, ActionService};
use crate::error::{Result, agent_error::AgentError};

/// Subject under which a successful search reply carries the found agent.
const RESPONSE_SUBJECT: &str = "dso:Directory-response";

/// One registered agent. `uri` is the unique key; `agent_type` is the
/// service tag lookups match against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub uri: String,
    pub name: String,
    pub address: String,
    pub agent_type: String,
}

/// Process-lifetime, insertion-ordered registry table.
///
/// Register is an idempotent upsert by uri that replaces in place, so a
/// re-registration keeps its position and lookups see the newest address.
/// Lookup by type returns the first match in insertion order when several
/// agents share a type; this is a deliberate simplification, not freshness
/// or load balancing. Entries are never deleted; the registry is cleared
/// only by a restart.
#[derive(Debug, Default)]
pub struct DirectoryRegistry {
    entries: RwLock<Vec<DirectoryEntry>>,
}

impl DirectoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, entry: DirectoryEntry) {
        let mut entries = self.entries.write().await;
        match entries.iter_mut().find(|e| e.uri == entry.uri) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    pub async fn find_by_type(&self, agent_type: &str) -> Option<DirectoryEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.agent_type == agent_type)
            .cloned()
    }

    pub async fn entries(&self) -> Vec<DirectoryEntry> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// The directory agent's service: Register and Search actions over the
/// shared registry table.
pub struct DirectoryService {
    identity: Arc<AgentIdentity>,
    registry: Arc<DirectoryRegistry>,
}

impl DirectoryService {
    pub fn new(identity: Arc<AgentIdentity>, registry: Arc<DirectoryRegistry>) -> Self {
        Self { identity, registry }
    }

    pub fn registry(&self) -> &Arc<DirectoryRegistry> {
        &self.registry
    }

    async fn process_register(&self, request: &Envelope, subject: &str) -> Result<Envelope> {
        info!(agent = self.identity.name(), "register request received");

        let graph = request.graph();
        let entry = DirectoryEntry {
            uri: required(graph, subject, vocab::AGENT_URI)?.to_string(),
            name: required(graph, subject, vocab::AGENT_NAME)?.to_string(),
            address: required(graph, subject, vocab::AGENT_ADDRESS)?.to_string(),
            agent_type: required(graph, subject, vocab::AGENT_TYPE)?.to_string(),
        };
        let registered_uri = entry.uri.clone();

        info!(uri = %entry.uri, agent_type = %entry.agent_type, "agent registered");
        self.registry.register(entry).await;

        Ok(self.identity.message(
            ContentGraph::new(),
            Performative::Confirm,
            Some(&registered_uri),
            None,
        ))
    }

    async fn process_search(
        &self,
        request: &Envelope,
        props: &EnvelopeProps,
        subject: &str,
    ) -> Result<Envelope> {
        info!(agent = self.identity.name(), "search request received");

        let agent_type = required(request.graph(), subject, vocab::AGENT_TYPE)?;

        match self.registry.find_by_type(agent_type).await {
            Some(entry) => {
                let mut graph = ContentGraph::new();
                graph.add(RESPONSE_SUBJECT, vocab::AGENT_ADDRESS, &entry.address);
                graph.add(RESPONSE_SUBJECT, vocab::AGENT_URI, &entry.uri);
                Ok(self.identity.message(
                    graph,
                    Performative::Inform,
                    Some(&props.sender),
                    Some(RESPONSE_SUBJECT),
                ))
            }
            // Nothing registered under this type. A valid empty result, not
            // an error: inform with no content.
            None => Ok(self.identity.message(
                ContentGraph::new(),
                Performative::Inform,
                Some(&props.sender),
                None,
            )),
        }
    }
}

#[async_trait]
impl ActionService for DirectoryService {
    async fn handle_action(
        &self,
        action: Action,
        request: &Envelope,
        props: &EnvelopeProps,
    ) -> Result<Option<Envelope>> {
        let subject = props
            .content
            .as_deref()
            .ok_or_else(|| AgentError::MissingField(vocab::CONTENT.to_string()))?;

        match action {
            Action::Register => self.process_register(request, subject).await.map(Some),
            Action::Search => self.process_search(request, props, subject).await.map(Some),
            _ => Ok(None),
        }
    }
}

fn required<'g>(graph: &'g ContentGraph, subject: &str, predicate: &str) -> Result<&'g str> {
    graph
        .value_of(subject, predicate)
        .ok_or_else(|| AgentError::MissingField(predicate.to_string()).into())
}
