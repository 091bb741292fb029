//! Demo constellation: directory, three information agents, three domain
//! managers and the coordinator, all in one process, answering a single
//! travel-plan request against the static catalog.

use std::env;
use std::sync::Arc;

use tracing::{error, info, warn};

use voyagent::Result;
use voyagent::agent::AgentIdentity;
use voyagent::config::AgentSettings;
use voyagent::coordinator::{Coordinator, PlanRequest, PlanRoutes};
use voyagent::directory::{DirectoryRegistry, DirectoryService};
use voyagent::dispatch::Dispatcher;
use voyagent::info::{InfoService, StaticCatalog, register_with_directory};
use voyagent::manager::{Domain, DomainManager};
use voyagent::server::AgentServer;
use voyagent::transport::{HttpTransport, Transport};

const UNIFIER_PORT: u16 = 9001;
const MANAGER_PORTS: [(Domain, &str, u16); 3] = [
    (Domain::Lodging, "LodgingManager", 9002),
    (Domain::Activities, "ActivitiesManager", 9003),
    (Domain::Transport, "TransportManager", 9004),
];
const INFO_PORTS: [(Domain, &str, u16); 3] = [
    (Domain::Lodging, "InfoHotels", 9005),
    (Domain::Activities, "InfoActivities", 9006),
    (Domain::Transport, "InfoFlights", 9007),
];

#[tokio::main]
async fn main() -> Result<()> {
    let verbose = env::var("VOYAGENT_VERBOSE").is_ok();
    voyagent::config::init_tracing(verbose);

    let base = AgentSettings {
        host: env::var("VOYAGENT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
        verbose,
        ..AgentSettings::default()
    };
    let directory_ref = base.directory_ref();
    let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new());
    let mut servers = Vec::new();

    // Directory agent.
    let registry = Arc::new(DirectoryRegistry::new());
    let directory_identity = Arc::new(AgentIdentity::new(directory_ref.clone()));
    let directory_service = Arc::new(DirectoryService::new(directory_identity.clone(), registry));
    servers.push(
        AgentServer::spawn(
            Dispatcher::new(directory_identity, directory_service),
            &base.host,
            base.directory_port,
        )
        .await?,
    );

    // Information agents, one per service type, each registering itself.
    for (domain, name, port) in INFO_PORTS {
        let settings = base.clone().with_port(port);
        let identity = Arc::new(AgentIdentity::new(settings.agent_ref(name)));
        let service = Arc::new(InfoService::new(identity.clone(), Arc::new(StaticCatalog::new())));
        servers.push(AgentServer::spawn(Dispatcher::new(identity.clone(), service), &base.host, port).await?);

        if let Err(err) = register_with_directory(
            &identity,
            domain.service_type(),
            &directory_ref,
            transport.as_ref(),
        )
        .await
        {
            warn!(agent = name, %err, "directory agent not reachable");
        }
    }

    // Domain managers.
    let mut manager_refs = Vec::new();
    for (domain, name, port) in MANAGER_PORTS {
        let settings = base.clone().with_port(port);
        let agent_ref = settings.agent_ref(name);
        manager_refs.push(agent_ref.clone());
        let identity = Arc::new(AgentIdentity::new(agent_ref));
        let service = Arc::new(DomainManager::new(
            identity.clone(),
            domain,
            directory_ref.clone(),
            transport.clone(),
        ));
        servers.push(AgentServer::spawn(Dispatcher::new(identity, service), &base.host, port).await?);
    }

    // Coordinator.
    let unifier_settings = base.clone().with_port(UNIFIER_PORT);
    let unifier = Arc::new(AgentIdentity::new(unifier_settings.agent_ref("UnifierAgent")));
    let routes = PlanRoutes {
        lodging: manager_refs[0].clone(),
        activities: manager_refs[1].clone(),
        transport: manager_refs[2].clone(),
    };
    let coordinator = Coordinator::new(unifier, routes, transport);

    let request = PlanRequest {
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
    };

    match coordinator.plan_trip(&request).await {
        Ok(plan) => {
            info!(
                flight = %plan.ticket.id,
                hotel = %plan.hotel.name,
                activities = plan.activities.len(),
                "travel plan ready"
            );
            for activity in &plan.activities {
                info!(day = activity.day, slot = %activity.slot, name = %activity.name, "scheduled");
            }
        }
        Err(err) => error!(%err, "no travel plan"),
    }

    // Stop every agent through its own stop endpoint.
    for server in &servers {
        if let Err(err) = reqwest::get(server.stop_address()).await {
            warn!(%err, "stop endpoint not reachable");
        }
    }
    for server in servers {
        server.wait().await;
    }

    info!("the end");
    Ok(())
}
