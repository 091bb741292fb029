pub mod catalog;
pub mod iata;
pub mod offers;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{info, warn};

pub use catalog::StaticCatalog;
pub use iata::convert_to_iata;
pub use offers::{ActivityOffer, DaySlot, HotelOffer, TicketOffer};

use crate::acl::{ContentGraph, Envelope, EnvelopeProps, Performative, vocab};
use crate::agent::{AgentIdentity, AgentRef};
use crate::dispatch::{Action, ActionService};
use crate::error::{Result, agent_error::AgentError};
use crate::transport::Transport;

/// Validated lodging search, derived from the criteria bag.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelQuery {
    pub city_code: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub budget: f64,
    pub ratings: u8,
    pub room_quantity: u32,
    pub adults: u32,
    pub radius: u32,
}

/// Validated activity search. `days` is the trip length the schedule triads
/// repeat over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityQuery {
    pub city_code: String,
    pub radius: u32,
    pub days: u32,
}

/// Validated flight search.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub origin_code: String,
    pub destination_code: String,
    pub departure: NaiveDate,
    pub comeback: NaiveDate,
    pub budget: f64,
}

/// An activity as the provider lists it, before the adapter assigns it a
/// day and slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityListing {
    pub id: String,
    pub name: String,
}

/// Seam to the external travel-data providers. Implementations translate
/// these queries into whatever the backing API wants; rate limits and auth
/// live behind this trait.
#[async_trait]
pub trait TravelDataProvider: Send + Sync {
    async fn search_hotels(&self, query: &HotelQuery) -> Result<Vec<HotelOffer>>;
    async fn search_activities(&self, query: &ActivityQuery) -> Result<Vec<ActivityListing>>;
    async fn search_flights(&self, query: &FlightQuery) -> Result<Vec<TicketOffer>>;
}

/// Information agent service: answers Search* actions by querying the
/// provider and mapping the result into the shared offer vocabulary.
///
/// Selection policy: the first offer the provider returns wins. No ranking,
/// no preference model; the provider's ordering decides.
pub struct InfoService {
    identity: Arc<AgentIdentity>,
    provider: Arc<dyn TravelDataProvider>,
}

impl InfoService {
    pub fn new(identity: Arc<AgentIdentity>, provider: Arc<dyn TravelDataProvider>) -> Self {
        Self { identity, provider }
    }

    async fn hotels(&self, request: &Envelope, props: &EnvelopeProps, subject: &str) -> Result<Envelope> {
        info!(agent = self.identity.name(), "hotel search request received");

        let query = parse_hotel_query(request.graph(), subject)?;
        let hotels = self.provider.search_hotels(&query).await?;

        let Some(offer) = hotels.first() else {
            return Ok(self.empty_result(props));
        };

        let mut graph = ContentGraph::new();
        let offer_subject = offers::add_hotel(&mut graph, offer);
        Ok(self.identity.message(
            graph,
            Performative::Inform,
            Some(&props.sender),
            Some(&offer_subject),
        ))
    }

    async fn activities(
        &self,
        request: &Envelope,
        props: &EnvelopeProps,
        subject: &str,
    ) -> Result<Envelope> {
        info!(agent = self.identity.name(), "activity search request received");

        let query = parse_activity_query(request.graph(), subject)?;
        let listings = self.provider.search_activities(&query).await?;

        if listings.is_empty() {
            return Ok(self.empty_result(props));
        }

        // One activity per slot per trip day, cycling through the provider's
        // list in its own order.
        let mut graph = ContentGraph::new();
        let mut first_subject = None;
        let mut index = 0;
        for day in 1..=query.days {
            for slot in DaySlot::ALL {
                let listing = &listings[index % listings.len()];
                index += 1;
                let offer = ActivityOffer {
                    id: format!("{}-d{}-{}", listing.id, day, slot.as_tag()),
                    name: listing.name.clone(),
                    slot,
                    day,
                };
                let offer_subject = offers::add_activity(&mut graph, &offer);
                first_subject.get_or_insert(offer_subject);
            }
        }

        Ok(self.identity.message(
            graph,
            Performative::Inform,
            Some(&props.sender),
            first_subject.as_deref(),
        ))
    }

    async fn flights(
        &self,
        request: &Envelope,
        props: &EnvelopeProps,
        subject: &str,
    ) -> Result<Envelope> {
        info!(agent = self.identity.name(), "flight search request received");

        let query = parse_flight_query(request.graph(), subject)?;
        let tickets = self.provider.search_flights(&query).await?;

        let Some(offer) = tickets.first() else {
            return Ok(self.empty_result(props));
        };

        let mut graph = ContentGraph::new();
        let offer_subject = offers::add_ticket(&mut graph, offer);
        Ok(self.identity.message(
            graph,
            Performative::Inform,
            Some(&props.sender),
            Some(&offer_subject),
        ))
    }

    /// Understood, searched, found nothing: inform with no content, the same
    /// shape the directory uses for an empty search.
    fn empty_result(&self, props: &EnvelopeProps) -> Envelope {
        info!(agent = self.identity.name(), "provider returned no offers");
        self.identity
            .message(ContentGraph::new(), Performative::Inform, Some(&props.sender), None)
    }
}

#[async_trait]
impl ActionService for InfoService {
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
            Action::SearchHotels => self.hotels(request, props, subject).await.map(Some),
            Action::SearchActivities => self.activities(request, props, subject).await.map(Some),
            Action::SearchFlights => self.flights(request, props, subject).await.map(Some),
            _ => Ok(None),
        }
    }
}

/// Registers an agent under `service_type` at the directory and returns the
/// directory's reply.
pub async fn register_with_directory(
    identity: &AgentIdentity,
    service_type: &str,
    directory: &AgentRef,
    transport: &dyn Transport,
) -> Result<Envelope> {
    info!(agent = identity.name(), service_type, "registering with the directory");

    let subject = format!("{}-Register", identity.name());
    let mut graph = ContentGraph::new();
    graph.add(&subject, vocab::RDF_TYPE, Action::Register.tag());
    graph.add(&subject, vocab::AGENT_URI, identity.uri());
    graph.add(&subject, vocab::AGENT_NAME, identity.name());
    graph.add(&subject, vocab::AGENT_ADDRESS, &identity.reference().address);
    graph.add(&subject, vocab::AGENT_TYPE, service_type);

    let message = identity.message(
        graph,
        Performative::Request,
        Some(&directory.uri),
        Some(&subject),
    );
    let reply = transport.request(&directory.address, &message).await?;

    if reply
        .properties()
        .is_none_or(|p| p.performative != Performative::Confirm)
    {
        warn!(agent = identity.name(), "directory did not confirm the registration");
    }
    Ok(reply)
}

fn parse_hotel_query(graph: &ContentGraph, subject: &str) -> Result<HotelQuery> {
    let city = required(graph, subject, vocab::DESTINATION_CITY)?;
    Ok(HotelQuery {
        city_code: convert_to_iata(city)?.to_string(),
        check_in: parse_date(vocab::DEPARTURE_DATE, required(graph, subject, vocab::DEPARTURE_DATE)?)?,
        check_out: parse_date(vocab::COMEBACK_DATE, required(graph, subject, vocab::COMEBACK_DATE)?)?,
        budget: parse_number(vocab::HOTEL_BUDGET, required(graph, subject, vocab::HOTEL_BUDGET)?)?,
        ratings: parse_number(vocab::RATINGS, required(graph, subject, vocab::RATINGS)?)?,
        room_quantity: parse_number(
            vocab::ROOM_QUANTITY,
            required(graph, subject, vocab::ROOM_QUANTITY)?,
        )?,
        adults: parse_number(vocab::ADULTS, required(graph, subject, vocab::ADULTS)?)?,
        radius: parse_number(vocab::RADIUS, required(graph, subject, vocab::RADIUS)?)?,
    })
}

fn parse_activity_query(graph: &ContentGraph, subject: &str) -> Result<ActivityQuery> {
    let city = required(graph, subject, vocab::DESTINATION_CITY)?;
    let departure = parse_date(
        vocab::DEPARTURE_DATE,
        required(graph, subject, vocab::DEPARTURE_DATE)?,
    )?;
    let comeback = parse_date(
        vocab::COMEBACK_DATE,
        required(graph, subject, vocab::COMEBACK_DATE)?,
    )?;
    let days = (comeback - departure).num_days().max(1) as u32;
    Ok(ActivityQuery {
        city_code: convert_to_iata(city)?.to_string(),
        radius: parse_number(vocab::RADIUS, required(graph, subject, vocab::RADIUS)?)?,
        days,
    })
}

fn parse_flight_query(graph: &ContentGraph, subject: &str) -> Result<FlightQuery> {
    let origin = required(graph, subject, vocab::ORIGIN_CITY)?;
    let destination = required(graph, subject, vocab::DESTINATION_CITY)?;
    Ok(FlightQuery {
        origin_code: convert_to_iata(origin)?.to_string(),
        destination_code: convert_to_iata(destination)?.to_string(),
        departure: parse_date(vocab::DEPARTURE_DATE, required(graph, subject, vocab::DEPARTURE_DATE)?)?,
        comeback: parse_date(vocab::COMEBACK_DATE, required(graph, subject, vocab::COMEBACK_DATE)?)?,
        budget: parse_number(vocab::BUDGET, required(graph, subject, vocab::BUDGET)?)?,
    })
}

fn required<'g>(graph: &'g ContentGraph, subject: &str, predicate: &str) -> Result<&'g str> {
    graph
        .value_of(subject, predicate)
        .ok_or_else(|| AgentError::MissingField(predicate.to_string()).into())
}

fn parse_number<T: FromStr>(field: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AgentError::ParseError(format!("{field}: {raw:?}")).into())
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AgentError::ParseError(format!("{field}: {raw:?}")).into())
}
