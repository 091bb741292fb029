use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::acl::{Envelope, EnvelopeProps, Performative, vocab};
use crate::agent::AgentIdentity;
use crate::error::Result;

/// Actions recognized across the agent network, keyed by the `rdf:type` tag
/// of the request's content subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Directory: register an agent under a service type.
    Register,
    /// Directory: look up an agent by service type.
    Search,
    /// Manager entry points, one per plan domain.
    SelectLodging,
    SelectActivities,
    SelectTransport,
    /// Information-agent searches against the external providers.
    SearchHotels,
    SearchActivities,
    SearchFlights,
}

impl Action {
    pub fn tag(&self) -> &'static str {
        match self {
            Action::Register => "dso:Register",
            Action::Search => "dso:Search",
            Action::SelectLodging => "pln:SelectLodging",
            Action::SelectActivities => "pln:SelectActivities",
            Action::SelectTransport => "pln:SelectTransport",
            Action::SearchHotels => "iaa:SearchHotels",
            Action::SearchActivities => "iaa:SearchActivities",
            Action::SearchFlights => "iaa:SearchFlights",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Action> {
        match tag {
            "dso:Register" => Some(Action::Register),
            "dso:Search" => Some(Action::Search),
            "pln:SelectLodging" => Some(Action::SelectLodging),
            "pln:SelectActivities" => Some(Action::SelectActivities),
            "pln:SelectTransport" => Some(Action::SelectTransport),
            "iaa:SearchHotels" => Some(Action::SearchHotels),
            "iaa:SearchActivities" => Some(Action::SearchActivities),
            "iaa:SearchFlights" => Some(Action::SearchFlights),
            _ => None,
        }
    }
}

/// Domain logic behind one agent's communication endpoint.
#[async_trait]
pub trait ActionService: Send + Sync {
    /// Handles a recognized action. `Ok(None)` means this agent does not
    /// serve the action; the dispatcher turns that into `not-understood`.
    /// `Err` is a handler fault; the dispatcher turns it into `failure`.
    async fn handle_action(
        &self,
        action: Action,
        request: &Envelope,
        props: &EnvelopeProps,
    ) -> Result<Option<Envelope>>;
}

/// Per-agent entry point: validates the envelope shape, inspects the
/// performative and the embedded action tag, and routes to the service.
/// Always produces a reply envelope; faults never cross the agent boundary.
pub struct Dispatcher<S> {
    identity: Arc<AgentIdentity>,
    service: Arc<S>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            service: self.service.clone(),
        }
    }
}

impl<S: ActionService> Dispatcher<S> {
    pub fn new(identity: Arc<AgentIdentity>, service: Arc<S>) -> Self {
        Self { identity, service }
    }

    pub fn identity(&self) -> &Arc<AgentIdentity> {
        &self.identity
    }

    pub async fn dispatch(&self, raw: &str) -> Envelope {
        let envelope = match Envelope::parse(raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(agent = self.identity.name(), %err, "unparseable message");
                return self.identity.not_understood(None);
            }
        };

        let Some(props) = envelope.properties() else {
            warn!(agent = self.identity.name(), "message is not an ACL envelope");
            return self.identity.not_understood(None);
        };

        if props.performative != Performative::Request {
            warn!(
                agent = self.identity.name(),
                performative = %props.performative,
                "unsupported performative"
            );
            return self.identity.not_understood(Some(&props.sender));
        }

        let action = props
            .content
            .as_deref()
            .and_then(|subject| envelope.graph().value_of(subject, vocab::RDF_TYPE))
            .and_then(Action::from_tag);
        let Some(action) = action else {
            warn!(agent = self.identity.name(), "no recognized action in request");
            return self.identity.not_understood(Some(&props.sender));
        };

        debug!(agent = self.identity.name(), ?action, sender = %props.sender, "dispatching");
        match self.service.handle_action(action, &envelope, &props).await {
            Ok(Some(reply)) => reply,
            Ok(None) => self.identity.not_understood(Some(&props.sender)),
            Err(err) => {
                error!(agent = self.identity.name(), ?action, %err, "handler fault");
                self.identity.failure(Some(&props.sender))
            }
        }
    }
}
