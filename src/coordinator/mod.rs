use std::sync::Arc;
use std::time::Duration;

use futures::future::join3;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::acl::{ContentGraph, Envelope, Performative, vocab};
use crate::agent::{AgentIdentity, AgentRef};
use crate::dispatch::Action;
use crate::error::Result as CrateResult;
use crate::error::agent_error::AgentError;
use crate::info::offers::{self, ActivityOffer, HotelOffer, TicketOffer};
use crate::manager::Domain;
use crate::transport::Transport;

/// One end-user travel-plan request. The values stay strings all the way
/// down: the coordinator and managers treat them as an opaque bag, and only
/// the information adapters parse them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub origin_city: String,
    pub destination_city: String,
    pub departure_date: String,
    pub comeback_date: String,
    pub flight_budget: String,
    pub hotel_budget: String,
    pub ratings: String,
    pub room_quantity: String,
    pub adults: String,
    pub radius: String,
}

/// Where the coordinator sends each sub-query.
#[derive(Debug, Clone)]
pub struct PlanRoutes {
    pub lodging: AgentRef,
    pub activities: AgentRef,
    pub transport: AgentRef,
}

impl PlanRoutes {
    fn for_domain(&self, domain: Domain) -> &AgentRef {
        match domain {
            Domain::Lodging => &self.lodging,
            Domain::Activities => &self.activities,
            Domain::Transport => &self.transport,
        }
    }
}

/// A fully assembled plan: one ticket, one hotel, the scheduled activities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelPlan {
    pub ticket: TicketOffer,
    pub hotel: HotelOffer,
    pub activities: Vec<ActivityOffer>,
}

/// Plan-level outcome when the fan-in cannot produce a plan. Human-readable
/// by construction; the coordinator never lets a raw fault escape.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("invalid input parameters")]
    InvalidInput,

    #[error("no information agent found")]
    NoInfoAgent,

    #[error("no {0} offer available")]
    NoOffer(&'static str),

    #[error("agent connection error: {0}")]
    Connection(String),
}

/// Replies from the three sub-queries, one slot per worker. No slot is read
/// before every worker has written its own.
struct PlanSlots {
    lodging: Envelope,
    activities: Envelope,
    transport: Envelope,
}

/// Fans one plan request out to the three domain managers, joins on all
/// three replies, and merges them into a plan or surfaces the first
/// failure.
pub struct Coordinator {
    identity: Arc<AgentIdentity>,
    routes: PlanRoutes,
    transport: Arc<dyn Transport>,
    worker_timeout: Duration,
    plan_permits: Semaphore,
}

impl Coordinator {
    pub const DEFAULT_WORKER_TIMEOUT: Duration = Duration::from_secs(10);
    pub const DEFAULT_MAX_CONCURRENT_PLANS: usize = 32;

    pub fn new(identity: Arc<AgentIdentity>, routes: PlanRoutes, transport: Arc<dyn Transport>) -> Self {
        Self {
            identity,
            routes,
            transport,
            worker_timeout: Self::DEFAULT_WORKER_TIMEOUT,
            plan_permits: Semaphore::new(Self::DEFAULT_MAX_CONCURRENT_PLANS),
        }
    }

    /// Bounds how long each sub-query worker may run before it degrades to a
    /// cancel-equivalent result.
    pub fn with_worker_timeout(mut self, worker_timeout: Duration) -> Self {
        self.worker_timeout = worker_timeout;
        self
    }

    pub async fn plan_trip(&self, request: &PlanRequest) -> Result<TravelPlan, PlanError> {
        // Each plan fans out three workers; the permit pool keeps a burst of
        // requests from spawning an unbounded number of them.
        let _permit = match self.plan_permits.acquire().await {
            Ok(permit) => permit,
            Err(_) => return Err(PlanError::Connection("coordinator is shutting down".to_string())),
        };

        let plan_id = Uuid::new_v4();
        info!(
            %plan_id,
            origin = %request.origin_city,
            destination = %request.destination_city,
            "plan request received"
        );

        match self.fan_out(request).await {
            Ok(slots) => {
                let outcome = self.assemble(&slots);
                match &outcome {
                    Ok(_) => info!(%plan_id, "plan assembled"),
                    Err(err) => warn!(%plan_id, %err, "plan not assembled"),
                }
                outcome
            }
            Err(err) => {
                error!(%plan_id, %err, "sub-query communication failed");
                Err(PlanError::Connection(err.to_string()))
            }
        }
    }

    /// Issues the three sub-requests concurrently and waits for all of them.
    /// A join barrier: nothing is assembled before the slowest worker has
    /// written its slot.
    async fn fan_out(&self, request: &PlanRequest) -> CrateResult<PlanSlots> {
        let lodging = self.spawn_worker(Domain::Lodging, self.lodging_request(request));
        let activities = self.spawn_worker(Domain::Activities, self.activities_request(request));
        let transport = self.spawn_worker(Domain::Transport, self.transport_request(request));

        let (lodging, activities, transport) = join3(lodging, activities, transport).await;

        Ok(PlanSlots {
            lodging: join_slot(lodging)?,
            activities: join_slot(activities)?,
            transport: join_slot(transport)?,
        })
    }

    fn spawn_worker(&self, domain: Domain, envelope: Envelope) -> JoinHandle<CrateResult<Envelope>> {
        let route = self.routes.for_domain(domain).clone();
        let transport = self.transport.clone();
        let identity = self.identity.clone();
        let deadline = self.worker_timeout;

        tokio::spawn(async move {
            info!(domain = domain.label(), manager = %route.name, "requesting selection");
            match timeout(deadline, transport.request(&route.address, &envelope)).await {
                Ok(reply) => {
                    info!(domain = domain.label(), "selection received");
                    reply
                }
                // A stalled manager must not stall the whole plan: degrade
                // this slot to the same shape as "no agent available".
                Err(_) => {
                    warn!(domain = domain.label(), "sub-query timed out");
                    Ok(identity.cancel(None))
                }
            }
        })
    }

    /// Decision rule over the three reply performatives, then typed offer
    /// extraction.
    fn assemble(&self, slots: &PlanSlots) -> Result<TravelPlan, PlanError> {
        let domains = [
            (Domain::Lodging, &slots.lodging),
            (Domain::Activities, &slots.activities),
            (Domain::Transport, &slots.transport),
        ];

        let mut performatives = Vec::with_capacity(domains.len());
        for (domain, envelope) in &domains {
            let props = envelope.properties().ok_or_else(|| {
                PlanError::Connection(format!("malformed reply from the {} manager", domain.label()))
            })?;
            performatives.push(props.performative);
        }

        if performatives.contains(&Performative::Failure) {
            return Err(PlanError::InvalidInput);
        }
        if performatives.contains(&Performative::Cancel) {
            return Err(PlanError::NoInfoAgent);
        }

        let hotel =
            offers::first_hotel(slots.lodging.graph()).ok_or(PlanError::NoOffer("lodging"))?;
        let ticket =
            offers::first_ticket(slots.transport.graph()).ok_or(PlanError::NoOffer("transport"))?;
        let activities = offers::activities(slots.activities.graph());

        Ok(TravelPlan {
            ticket,
            hotel,
            activities,
        })
    }

    fn lodging_request(&self, request: &PlanRequest) -> Envelope {
        let subject = format!("{}-SelectLodging", self.identity.name());
        let mut graph = ContentGraph::new();
        graph.add(&subject, vocab::RDF_TYPE, Action::SelectLodging.tag());
        graph.add(&subject, vocab::DESTINATION_CITY, &request.destination_city);
        graph.add(&subject, vocab::DEPARTURE_DATE, &request.departure_date);
        graph.add(&subject, vocab::COMEBACK_DATE, &request.comeback_date);
        graph.add(&subject, vocab::HOTEL_BUDGET, &request.hotel_budget);
        graph.add(&subject, vocab::RATINGS, &request.ratings);
        graph.add(&subject, vocab::ROOM_QUANTITY, &request.room_quantity);
        graph.add(&subject, vocab::ADULTS, &request.adults);
        graph.add(&subject, vocab::RADIUS, &request.radius);
        self.sub_request(Domain::Lodging, graph, &subject)
    }

    fn activities_request(&self, request: &PlanRequest) -> Envelope {
        let subject = format!("{}-SelectActivities", self.identity.name());
        let mut graph = ContentGraph::new();
        graph.add(&subject, vocab::RDF_TYPE, Action::SelectActivities.tag());
        graph.add(&subject, vocab::DESTINATION_CITY, &request.destination_city);
        graph.add(&subject, vocab::DEPARTURE_DATE, &request.departure_date);
        graph.add(&subject, vocab::COMEBACK_DATE, &request.comeback_date);
        graph.add(&subject, vocab::RADIUS, &request.radius);
        self.sub_request(Domain::Activities, graph, &subject)
    }

    fn transport_request(&self, request: &PlanRequest) -> Envelope {
        let subject = format!("{}-SelectTransport", self.identity.name());
        let mut graph = ContentGraph::new();
        graph.add(&subject, vocab::RDF_TYPE, Action::SelectTransport.tag());
        graph.add(&subject, vocab::ORIGIN_CITY, &request.origin_city);
        graph.add(&subject, vocab::DESTINATION_CITY, &request.destination_city);
        graph.add(&subject, vocab::DEPARTURE_DATE, &request.departure_date);
        graph.add(&subject, vocab::COMEBACK_DATE, &request.comeback_date);
        graph.add(&subject, vocab::BUDGET, &request.flight_budget);
        self.sub_request(Domain::Transport, graph, &subject)
    }

    fn sub_request(&self, domain: Domain, graph: ContentGraph, subject: &str) -> Envelope {
        let route = self.routes.for_domain(domain);
        self.identity
            .message(graph, Performative::Request, Some(&route.uri), Some(subject))
    }
}

fn join_slot(
    joined: std::result::Result<CrateResult<Envelope>, tokio::task::JoinError>,
) -> CrateResult<Envelope> {
    match joined {
        Ok(result) => result,
        Err(err) => Err(AgentError::InternalError(format!("worker task failed: {err}")).into()),
    }
}
