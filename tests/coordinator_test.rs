#[cfg(test)]
mod coordinator_tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::sleep;

    use voyagent::acl::{ContentGraph, Envelope, Performative};
    use voyagent::agent::{AgentIdentity, AgentRef};
    use voyagent::coordinator::{Coordinator, PlanError, PlanRequest, PlanRoutes};
    use voyagent::error::Result;
    use voyagent::error::agent_error::AgentError;
    use voyagent::info::offers::{self, ActivityOffer, DaySlot, HotelOffer, TicketOffer};
    use voyagent::transport::Transport;

    const LODGING_ADDR: &str = "http://lodging.test/comm";
    const ACTIVITIES_ADDR: &str = "http://activities.test/comm";
    const TRANSPORT_ADDR: &str = "http://transport.test/comm";

    fn identity(name: &str) -> Arc<AgentIdentity> {
        Arc::new(AgentIdentity::new(AgentRef::new(
            name,
            format!("agn:{name}"),
            format!("http://{name}.test/comm"),
            format!("http://{name}.test/Stop"),
        )))
    }

    fn routes() -> PlanRoutes {
        PlanRoutes {
            lodging: AgentRef::new("LodgingManager", "agn:LodgingManager", LODGING_ADDR, ""),
            activities: AgentRef::new(
                "ActivitiesManager",
                "agn:ActivitiesManager",
                ACTIVITIES_ADDR,
                "",
            ),
            transport: AgentRef::new("TransportManager", "agn:TransportManager", TRANSPORT_ADDR, ""),
        }
    }

    fn plan_request() -> PlanRequest {
        PlanRequest {
            origin_city: "Paris".to_string(),
            destination_city: "Barcelona".to_string(),
            departure_date: "2026-09-14".to_string(),
            comeback_date: "2026-09-17".to_string(),
            flight_budget: "250".to_string(),
            hotel_budget: "600".to_string(),
            ratings: "3".to_string(),
            room_quantity: "1".to_string(),
            adults: "2".to_string(),
            radius: "15".to_string(),
        }
    }

    enum Script {
        Reply(Envelope),
        Delayed(Duration, Envelope),
        Fail,
    }

    /// Plays one scripted reply per manager address and counts completed
    /// round trips.
    struct RoutedTransport {
        scripts: HashMap<&'static str, Script>,
        completed: AtomicUsize,
    }

    impl RoutedTransport {
        fn new(scripts: HashMap<&'static str, Script>) -> Arc<Self> {
            Arc::new(Self {
                scripts,
                completed: AtomicUsize::new(0),
            })
        }

        fn completed(&self) -> usize {
            self.completed.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for RoutedTransport {
        async fn request(&self, address: &str, _envelope: &Envelope) -> Result<Envelope> {
            let script = self
                .scripts
                .get(address)
                .ok_or_else(|| AgentError::DeliveryError(format!("unknown address {address}")))?;
            let outcome = match script {
                Script::Reply(envelope) => Ok(envelope.clone()),
                Script::Delayed(delay, envelope) => {
                    sleep(*delay).await;
                    Ok(envelope.clone())
                }
                Script::Fail => {
                    Err(AgentError::DeliveryError("connection refused".to_string()).into())
                }
            };
            self.completed.fetch_add(1, Ordering::SeqCst);
            outcome
        }
    }

    fn lodging_confirm() -> Envelope {
        let manager = identity("LodgingManager");
        let mut graph = ContentGraph::new();
        offers::add_hotel(
            &mut graph,
            &HotelOffer {
                id: "BCN-H1".to_string(),
                name: "Hotel Miramar".to_string(),
                address: "Passeig de Colom 22, Barcelona, 08002".to_string(),
                price: 420.0,
            },
        );
        manager.message(graph, Performative::Confirm, Some("agn:UnifierAgent"), None)
    }

    fn activities_confirm() -> Envelope {
        let manager = identity("ActivitiesManager");
        let mut graph = ContentGraph::new();
        for (i, slot) in DaySlot::ALL.into_iter().enumerate() {
            offers::add_activity(
                &mut graph,
                &ActivityOffer {
                    id: format!("ACT-BCN-{}-d1-{}", i + 1, slot.as_tag()),
                    name: format!("Activity {}", i + 1),
                    slot,
                    day: 1,
                },
            );
        }
        manager.message(graph, Performative::Confirm, Some("agn:UnifierAgent"), None)
    }

    fn transport_confirm() -> Envelope {
        let manager = identity("TransportManager");
        let mut graph = ContentGraph::new();
        offers::add_ticket(
            &mut graph,
            &TicketOffer {
                id: "VY8013".to_string(),
                departure: "2026-09-14T08:25".to_string(),
                arrival: "2026-09-14T10:05".to_string(),
                seat: "14C".to_string(),
                class: "economy".to_string(),
                price: 96.0,
            },
        );
        manager.message(graph, Performative::Confirm, Some("agn:UnifierAgent"), None)
    }

    fn empty_confirm(name: &str) -> Envelope {
        identity(name).message(ContentGraph::new(), Performative::Confirm, None, None)
    }

    fn coordinator(transport: Arc<RoutedTransport>) -> Coordinator {
        Coordinator::new(identity("UnifierAgent"), routes(), transport)
    }

    #[tokio::test]
    async fn all_confirms_assemble_a_complete_plan() {
        let transport = RoutedTransport::new(HashMap::from([
            (LODGING_ADDR, Script::Reply(lodging_confirm())),
            (ACTIVITIES_ADDR, Script::Reply(activities_confirm())),
            (TRANSPORT_ADDR, Script::Reply(transport_confirm())),
        ]));

        let plan = coordinator(transport)
            .plan_trip(&plan_request())
            .await
            .unwrap();

        assert_eq!(plan.hotel.name, "Hotel Miramar");
        assert_eq!(plan.ticket.id, "VY8013");
        assert_eq!(plan.activities.len(), 3);
    }

    #[tokio::test]
    async fn any_failure_is_an_invalid_input_error() {
        let manager = identity("TransportManager");
        let transport = RoutedTransport::new(HashMap::from([
            (LODGING_ADDR, Script::Reply(lodging_confirm())),
            (ACTIVITIES_ADDR, Script::Reply(activities_confirm())),
            (TRANSPORT_ADDR, Script::Reply(manager.failure(Some("agn:UnifierAgent")))),
        ]));

        let outcome = coordinator(transport).plan_trip(&plan_request()).await;

        // Two good replies cannot outweigh one failure.
        assert_eq!(outcome.unwrap_err(), PlanError::InvalidInput);
    }

    #[tokio::test]
    async fn failure_takes_precedence_over_cancel() {
        let lodging = identity("LodgingManager");
        let activities = identity("ActivitiesManager");
        let transport = RoutedTransport::new(HashMap::from([
            (LODGING_ADDR, Script::Reply(lodging.failure(None))),
            (ACTIVITIES_ADDR, Script::Reply(activities.cancel(None))),
            (TRANSPORT_ADDR, Script::Reply(transport_confirm())),
        ]));

        let outcome = coordinator(transport).plan_trip(&plan_request()).await;
        assert_eq!(outcome.unwrap_err(), PlanError::InvalidInput);
    }

    #[tokio::test]
    async fn any_cancel_means_no_information_agent() {
        let activities = identity("ActivitiesManager");
        let transport = RoutedTransport::new(HashMap::from([
            (LODGING_ADDR, Script::Reply(lodging_confirm())),
            (ACTIVITIES_ADDR, Script::Reply(activities.cancel(None))),
            (TRANSPORT_ADDR, Script::Reply(transport_confirm())),
        ]));

        let outcome = coordinator(transport).plan_trip(&plan_request()).await;
        assert_eq!(outcome.unwrap_err(), PlanError::NoInfoAgent);
    }

    #[tokio::test]
    async fn confirm_without_an_offer_is_an_explicit_no_offer_error() {
        let transport = RoutedTransport::new(HashMap::from([
            (LODGING_ADDR, Script::Reply(empty_confirm("LodgingManager"))),
            (ACTIVITIES_ADDR, Script::Reply(activities_confirm())),
            (TRANSPORT_ADDR, Script::Reply(transport_confirm())),
        ]));

        let outcome = coordinator(transport).plan_trip(&plan_request()).await;
        assert_eq!(outcome.unwrap_err(), PlanError::NoOffer("lodging"));
    }

    #[tokio::test]
    async fn worker_communication_fault_is_a_connection_error() {
        let transport = RoutedTransport::new(HashMap::from([
            (LODGING_ADDR, Script::Reply(lodging_confirm())),
            (ACTIVITIES_ADDR, Script::Fail),
            (TRANSPORT_ADDR, Script::Reply(transport_confirm())),
        ]));

        let outcome = coordinator(transport).plan_trip(&plan_request()).await;
        assert!(matches!(outcome.unwrap_err(), PlanError::Connection(_)));
    }

    #[tokio::test]
    async fn stalled_worker_times_out_into_a_cancel_result() {
        let transport = RoutedTransport::new(HashMap::from([
            (LODGING_ADDR, Script::Reply(lodging_confirm())),
            (
                ACTIVITIES_ADDR,
                Script::Delayed(Duration::from_millis(500), activities_confirm()),
            ),
            (TRANSPORT_ADDR, Script::Reply(transport_confirm())),
        ]));

        let outcome = coordinator(transport)
            .with_worker_timeout(Duration::from_millis(50))
            .plan_trip(&plan_request())
            .await;

        assert_eq!(outcome.unwrap_err(), PlanError::NoInfoAgent);
    }

    #[tokio::test]
    async fn join_waits_for_the_slowest_worker() {
        let transport = RoutedTransport::new(HashMap::from([
            (
                LODGING_ADDR,
                Script::Delayed(Duration::from_millis(50), lodging_confirm()),
            ),
            (
                ACTIVITIES_ADDR,
                Script::Delayed(Duration::from_millis(100), activities_confirm()),
            ),
            (
                TRANSPORT_ADDR,
                Script::Delayed(Duration::from_millis(150), transport_confirm()),
            ),
        ]));

        let plan = coordinator(transport.clone())
            .plan_trip(&plan_request())
            .await
            .unwrap();

        // All three slots were written before anything was assembled.
        assert_eq!(transport.completed(), 3);
        assert_eq!(plan.activities.len(), 3);
    }
}
