use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::acl::{ContentGraph, Envelope, EnvelopeProps, Performative, vocab};
use crate::agent::{AgentIdentity, AgentRef};
use crate::dispatch::{Action, ActionService};
use crate::error::{Result, agent_error::AgentError};
use crate::transport::Transport;

/// The three plan domains a manager can mediate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    Lodging,
    Activities,
    Transport,
}

impl Domain {
    /// Action the coordinator addresses to this domain's manager.
    pub fn select_action(&self) -> Action {
        match self {
            Domain::Lodging => Action::SelectLodging,
            Domain::Activities => Action::SelectActivities,
            Domain::Transport => Action::SelectTransport,
        }
    }

    /// Action the manager forwards to the information agent.
    pub fn info_action(&self) -> Action {
        match self {
            Domain::Lodging => Action::SearchHotels,
            Domain::Activities => Action::SearchActivities,
            Domain::Transport => Action::SearchFlights,
        }
    }

    /// Directory service type the manager looks up.
    pub fn service_type(&self) -> &'static str {
        match self {
            Domain::Lodging => "dso:HotelsAgent",
            Domain::Activities => "dso:TravelServiceAgent",
            Domain::Transport => "dso:FlightsAgent",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Domain::Lodging => "lodging",
            Domain::Activities => "activities",
            Domain::Transport => "transport",
        }
    }
}

/// Mediates between the coordinator and a domain's information agent: looks
/// the agent up in the directory, forwards the criteria bag unmodified, and
/// maps the outcome onto the reply performative the coordinator decides on.
pub struct DomainManager {
    identity: Arc<AgentIdentity>,
    domain: Domain,
    directory: AgentRef,
    transport: Arc<dyn Transport>,
}

impl DomainManager {
    pub fn new(
        identity: Arc<AgentIdentity>,
        domain: Domain,
        directory: AgentRef,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            identity,
            domain,
            directory,
            transport,
        }
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Asks the directory for an agent of this domain's service type.
    /// `Ok(None)` is the registry's valid empty result.
    async fn directory_search(&self) -> Result<Option<(String, String)>> {
        info!(
            manager = self.identity.name(),
            service_type = self.domain.service_type(),
            "searching the directory"
        );

        let subject = format!("{}-Search", self.identity.name());
        let mut graph = ContentGraph::new();
        graph.add(&subject, vocab::RDF_TYPE, Action::Search.tag());
        graph.add(&subject, vocab::AGENT_TYPE, self.domain.service_type());

        let request = self.identity.message(
            graph,
            Performative::Request,
            Some(&self.directory.uri),
            Some(&subject),
        );
        let reply = self.transport.request(&self.directory.address, &request).await?;

        let props = reply.properties().ok_or_else(|| {
            AgentError::ParseError("directory reply is not an ACL message".to_string())
        })?;
        let Some(content) = props.content else {
            return Ok(None);
        };

        let uri = reply.graph().value_of(&content, vocab::AGENT_URI);
        let address = reply.graph().value_of(&content, vocab::AGENT_ADDRESS);
        match (uri, address) {
            (Some(uri), Some(address)) => Ok(Some((uri.to_string(), address.to_string()))),
            _ => Ok(None),
        }
    }

    /// Forwards the search criteria to the information agent under this
    /// domain's info action and returns its raw reply.
    async fn infoagent_search(
        &self,
        uri: &str,
        address: &str,
        request: &Envelope,
        props: &EnvelopeProps,
    ) -> Result<Envelope> {
        info!(manager = self.identity.name(), info_agent = uri, "querying information agent");

        let criteria_subject = props
            .content
            .as_deref()
            .ok_or_else(|| AgentError::MissingField(vocab::CONTENT.to_string()))?;

        let subject = format!("{}-InfoSearch", self.identity.name());
        let mut graph = ContentGraph::new();
        graph.add(&subject, vocab::RDF_TYPE, self.domain.info_action().tag());
        request
            .graph()
            .copy_properties(criteria_subject, &mut graph, &subject);

        let message =
            self.identity
                .message(graph, Performative::Request, Some(uri), Some(&subject));
        self.transport.request(address, &message).await
    }
}

#[async_trait]
impl ActionService for DomainManager {
    async fn handle_action(
        &self,
        action: Action,
        request: &Envelope,
        props: &EnvelopeProps,
    ) -> Result<Option<Envelope>> {
        if action != self.domain.select_action() {
            return Ok(None);
        }

        info!(
            manager = self.identity.name(),
            domain = self.domain.label(),
            "selection request received"
        );

        // No information agent locatable: cancel, so the coordinator can
        // tell this apart from a provider failure.
        let Some((uri, address)) = self.directory_search().await? else {
            info!(
                manager = self.identity.name(),
                service_type = self.domain.service_type(),
                "no information agent registered"
            );
            return Ok(Some(self.identity.cancel(Some(&props.sender))));
        };

        let reply = self.infoagent_search(&uri, &address, request, props).await?;
        let reply_props = reply.properties().ok_or_else(|| {
            AgentError::ParseError("information agent reply is not an ACL message".to_string())
        })?;

        let outcome = match reply_props.performative {
            Performative::Failure => self.identity.failure(Some(&props.sender)),
            _ => self.identity.message(
                reply.content_graph(),
                Performative::Confirm,
                Some(&props.sender),
                None,
            ),
        };

        info!(manager = self.identity.name(), domain = self.domain.label(), "selection sent");
        Ok(Some(outcome))
    }
}
