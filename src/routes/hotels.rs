use actix_web::{web, HttpRequest, HttpResponse};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::models::filters::{FilterState, SortOrder};
use crate::models::party::PartyConfiguration;
use crate::models::search::SearchContext;
use crate::models::selection::{CommitKind, ItineraryContext};
use crate::services::filter_service;
use crate::services::flow_registry::HotelSearchFlows;
use crate::services::occupancy_service;
use crate::services::provider_client::{HotelProviderApi, ProviderAuth, ProviderError};
use crate::services::rate_catalog::RateCatalog;
use crate::services::search_session::SessionError;
use crate::services::selection_service::{CommitError, SelectionCommitter};

pub struct AppState<P: HotelProviderApi> {
    pub flows: HotelSearchFlows<P>,
    pub provider: Arc<P>,
    pub committer: SelectionCommitter<P>,
}

impl<P: HotelProviderApi> AppState<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self {
            flows: HotelSearchFlows::new(provider.clone()),
            committer: SelectionCommitter::new(provider.clone()),
            provider,
        }
    }
}

pub fn configure<P: HotelProviderApi + 'static>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/hotels")
            .route("/search", web::post().to(search::<P>))
            .route("/search/next", web::post().to(next_page::<P>))
            .route("/search/{inquiry_token}", web::delete().to(cancel_search::<P>))
            .route("/select", web::post().to(select_hotel::<P>))
            .route("/{inquiry_token}/{hotel_id}/details", web::get().to(hotel_details::<P>)),
    );
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequestBody {
    pub context: SearchContext,
    pub party: PartyConfiguration,
    #[serde(default)]
    pub filters: FilterState,
    #[serde(default)]
    pub sort: SortOrder,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextPageBody {
    pub inquiry_token: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequestBody {
    pub inquiry_token: String,
    pub recommendation_id: String,
    #[serde(default)]
    pub kind: CommitKind,
    pub itinerary_token: String,
    pub city_name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub check_in: Option<NaiveDate>,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    #[serde(default)]
    pub old_hotel_code: Option<String>,
}

/// Pull the provider credentials off the incoming request. Their semantics
/// are the auth layer's business; this service only forwards them.
fn provider_auth(req: &HttpRequest) -> Result<ProviderAuth, HttpResponse> {
    let bearer_token = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string);
    let inquiry_token = req
        .headers()
        .get("X-Inquiry-Token")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    match (bearer_token, inquiry_token) {
        (Some(bearer_token), Some(inquiry_token)) => {
            Ok(ProviderAuth { bearer_token, inquiry_token })
        }
        _ => Err(HttpResponse::Unauthorized()
            .json(json!({ "error": "missing Authorization bearer or X-Inquiry-Token header" }))),
    }
}

/*
    POST /api/hotels/search
*/
pub async fn search<P: HotelProviderApi>(
    req: HttpRequest,
    data: web::Data<AppState<P>>,
    body: web::Json<SearchRequestBody>,
) -> HttpResponse {
    let auth = match provider_auth(&req) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let body = body.into_inner();

    let occupancies = match occupancy_service::to_occupancies(&body.party) {
        Ok(occupancies) => occupancies,
        Err(err) => return HttpResponse::BadRequest().json(json!({ "error": err.to_string() })),
    };
    let query = filter_service::build(&body.filters, body.sort, &body.context, &body.party);

    // A new search context always replaces the previous flow for this
    // inquiry, cancelling whatever was in flight.
    let flow = data.flows.replace(&body.context.inquiry_token);
    match flow.session.start(&auth, body.context, occupancies, query).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => session_error_response(err),
    }
}

/*
    POST /api/hotels/search/next
*/
pub async fn next_page<P: HotelProviderApi>(
    req: HttpRequest,
    data: web::Data<AppState<P>>,
    body: web::Json<NextPageBody>,
) -> HttpResponse {
    let auth = match provider_auth(&req) {
        Ok(auth) => auth,
        Err(response) => return response,
    };

    let flow = match data.flows.get(&body.inquiry_token) {
        Some(flow) => flow,
        None => {
            return HttpResponse::NotFound()
                .json(json!({ "error": "no active search for this inquiry" }))
        }
    };

    match flow.session.next_page(&auth).await {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => session_error_response(err),
    }
}

/*
    DELETE /api/hotels/search/{inquiry_token}
*/
pub async fn cancel_search<P: HotelProviderApi>(
    path: web::Path<String>,
    data: web::Data<AppState<P>>,
) -> HttpResponse {
    let inquiry_token = path.into_inner();
    if data.flows.retire(&inquiry_token) {
        HttpResponse::Ok().json(json!({ "cancelled": true }))
    } else {
        HttpResponse::NotFound().json(json!({ "error": "no active search for this inquiry" }))
    }
}

/*
    GET /api/hotels/{inquiry_token}/{hotel_id}/details
*/
pub async fn hotel_details<P: HotelProviderApi>(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    data: web::Data<AppState<P>>,
) -> HttpResponse {
    let auth = match provider_auth(&req) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let (inquiry_token, hotel_id) = path.into_inner();

    let flow = match data.flows.get(&inquiry_token) {
        Some(flow) => flow,
        None => {
            return HttpResponse::NotFound()
                .json(json!({ "error": "no active search for this inquiry" }))
        }
    };
    let context = match flow.session.context() {
        Some(context) => context,
        None => {
            return HttpResponse::Conflict()
                .json(json!({ "error": "search has not produced a page yet" }))
        }
    };

    let trace_id = flow.session.trace_id();
    let raw = match data
        .provider
        .fetch_hotel_details(&auth, &context, &hotel_id, trace_id.as_deref())
        .await
    {
        Ok(raw) => raw,
        Err(err) => return provider_error_response(err),
    };

    let catalog = flow.install_catalog(hotel_id.clone(), RateCatalog::normalize(raw));
    HttpResponse::Ok().json(json!({
        "hotelId": hotel_id,
        "hotelName": catalog.context.hotel_name,
        "rooms": catalog.rooms,
        "rates": catalog.rates,
        "recommendations": catalog.list_recommendations(),
    }))
}

/*
    POST /api/hotels/select
*/
pub async fn select_hotel<P: HotelProviderApi>(
    req: HttpRequest,
    data: web::Data<AppState<P>>,
    body: web::Json<SelectRequestBody>,
) -> HttpResponse {
    let auth = match provider_auth(&req) {
        Ok(auth) => auth,
        Err(response) => return response,
    };
    let body = body.into_inner();

    let flow = match data.flows.get(&body.inquiry_token) {
        Some(flow) => flow,
        None => {
            return HttpResponse::NotFound()
                .json(json!({ "error": "no active search for this inquiry" }))
        }
    };
    let (hotel_id, catalog) = match flow.active_catalog() {
        Some(active) => active,
        None => {
            return HttpResponse::Conflict()
                .json(json!({ "error": "no hotel is open for selection, fetch details first" }))
        }
    };

    let itinerary = ItineraryContext {
        itinerary_token: body.itinerary_token,
        city_name: body.city_name,
        date: body.date,
        check_in: body.check_in,
        check_out: body.check_out,
        old_hotel_code: body.old_hotel_code,
    };

    match data
        .committer
        .execute(&auth, body.kind, &body.recommendation_id, &hotel_id, &catalog, &itinerary)
        .await
    {
        Ok(result) => HttpResponse::Ok().json(result),
        Err(err) => commit_error_response(err),
    }
}

fn session_error_response(err: SessionError) -> HttpResponse {
    match err {
        SessionError::Busy | SessionError::NoContinuationToken | SessionError::Cancelled => {
            HttpResponse::Conflict().json(json!({ "error": err.to_string() }))
        }
        SessionError::Provider(err) => provider_error_response(err),
    }
}

fn provider_error_response(err: ProviderError) -> HttpResponse {
    log::error!("provider call failed: {}", err);
    HttpResponse::BadGateway().json(json!({ "error": err.to_string() }))
}

fn commit_error_response(err: CommitError) -> HttpResponse {
    match err {
        CommitError::MissingReplacementTarget | CommitError::MissingStayDate => {
            HttpResponse::BadRequest().json(json!({ "error": err.to_string() }))
        }
        CommitError::Resolve(_) | CommitError::RateUnavailable { .. } => {
            HttpResponse::Conflict().json(json!({ "error": err.to_string() }))
        }
        CommitError::Selection { .. } | CommitError::ItineraryUpdate { .. } => {
            log::error!("commit failed: {}", err);
            HttpResponse::BadGateway().json(json!({ "error": err.to_string() }))
        }
        CommitError::Provider(provider_err) => provider_error_response(provider_err),
    }
}
