use crate::api::{
    api_add_trigger, api_delete_trigger, api_import_triggers, api_list_triggers,
    api_update_trigger, ApiResponse,
};
use crate::config::EXPORT_FILENAME;
use crate::error::Result;
use crate::models::Trigger;
use crate::store::TriggerStore;
use serde::Deserialize;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use warp::http::StatusCode;
use warp::{Filter, Reply};

#[derive(Deserialize)]
struct ListQuery {
    q: Option<String>,
}

#[derive(Deserialize)]
struct DeleteQuery {
    shortcut: String,
}

fn with_store(
    store: Arc<TriggerStore>,
) -> impl Filter<Extract = (Arc<TriggerStore>,), Error = Infallible> + Clone {
    warp::any().map(move || Arc::clone(&store))
}

/// Serve the trigger management API on localhost until the process exits
pub async fn start_api_server(store: Arc<TriggerStore>, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!(%addr, "starting trigger management API");

    // Extension option pages call from their own origin
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["Content-Type"])
        .allow_methods(vec!["GET", "POST", "DELETE", "PUT"]);

    let list_triggers = warp::path!("api" / "triggers")
        .and(warp::get())
        .and(warp::query::<ListQuery>())
        .and(with_store(store.clone()))
        .map(|query: ListQuery, store: Arc<TriggerStore>| {
            warp::reply::json(&api_list_triggers(&store, query.q.as_deref()))
        });

    let add_trigger = warp::path!("api" / "triggers")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_store(store.clone()))
        .map(|body: Trigger, store: Arc<TriggerStore>| {
            warp::reply::json(&api_add_trigger(&store, body))
        });

    let update_trigger = warp::path!("api" / "triggers")
        .and(warp::put())
        .and(warp::body::json())
        .and(with_store(store.clone()))
        .map(|body: Trigger, store: Arc<TriggerStore>| {
            warp::reply::json(&api_update_trigger(&store, body))
        });

    let delete_trigger = warp::path!("api" / "triggers")
        .and(warp::delete())
        .and(warp::query::<DeleteQuery>())
        .and(with_store(store.clone()))
        .map(|query: DeleteQuery, store: Arc<TriggerStore>| {
            warp::reply::json(&api_delete_trigger(&store, &query.shortcut))
        });

    let import_triggers = warp::path!("api" / "triggers" / "import")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_store(store.clone()))
        .map(|body: serde_json::Value, store: Arc<TriggerStore>| {
            warp::reply::json(&api_import_triggers(&store, body))
        });

    let export_triggers = warp::path!("api" / "triggers" / "export")
        .and(warp::get())
        .and(with_store(store.clone()))
        .map(|store: Arc<TriggerStore>| match store.export_json() {
            Ok(body) => warp::reply::with_status(
                warp::reply::with_header(
                    warp::reply::with_header(body, "content-type", "application/json"),
                    "content-disposition",
                    format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
                ),
                StatusCode::OK,
            )
            .into_response(),
            Err(e) => warp::reply::with_status(
                warp::reply::json(&ApiResponse::<()>::error(format!(
                    "Failed to export triggers: {}",
                    e
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response(),
        });

    let health = warp::path!("health").map(|| "AutoFill API is running");

    let routes = list_triggers
        .or(add_trigger)
        .or(update_trigger)
        .or(delete_trigger)
        .or(import_triggers)
        .or(export_triggers)
        .or(health)
        .with(cors);

    warp::serve(routes).run(addr).await;

    Ok(())
}
