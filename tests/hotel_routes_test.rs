mod common;

use std::sync::Arc;

use actix_web::{test, web, App};
use serde_json::json;

use tripdesk_hotels_api::models::selection::ItineraryUpdateResponse;
use tripdesk_hotels_api::routes::hotels::{self, AppState};

use common::{hotel, raw_details, result_set, MockProvider};

fn search_body() -> serde_json::Value {
    json!({
        "context": {
            "cityName": "Lisbon",
            "checkIn": "2024-03-01",
            "checkOut": "2024-03-04",
            "inquiryToken": "inq-1",
            "nationality": "PT"
        },
        "party": {
            "rooms": [{ "adults": [30, 32], "children": [6] }]
        },
        "filters": { "starRatings": [4, 5], "pricePoint": 2000 },
        "sort": "priceAsc"
    })
}

fn authed(request: test::TestRequest) -> test::TestRequest {
    request
        .insert_header(("Authorization", "Bearer test-token"))
        .insert_header(("X-Inquiry-Token", "inq-1"))
}

macro_rules! init_app {
    ($provider:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new($provider.clone())))
                .configure(hotels::configure::<MockProvider>),
        )
        .await
    };
}

#[actix_web::test]
async fn test_search_requires_provider_headers() {
    let provider = Arc::new(MockProvider::default());
    let app = init_app!(provider);

    let req = test::TestRequest::post()
        .uri("/api/hotels/search")
        .set_json(search_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 401);
}

#[actix_web::test]
async fn test_search_returns_first_page_and_forwards_auth() {
    let provider = Arc::new(MockProvider::default());
    provider.push_search(Ok(result_set(
        Some("T1"),
        1,
        Some(2),
        vec![hotel("h1"), hotel("h2")],
    )));
    let app = init_app!(provider);

    let req = authed(test::TestRequest::post().uri("/api/hotels/search"))
        .set_json(search_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["pageNumber"], 1);
    assert_eq!(body["hasNextPage"], true);
    assert_eq!(body["continuationToken"], "T1");
    assert_eq!(body["hotels"].as_array().unwrap().len(), 2);

    // Credentials are forwarded to the provider unchanged.
    let auths = provider.search_auths.lock().unwrap();
    assert_eq!(auths[0].bearer_token, "test-token");
    assert_eq!(auths[0].inquiry_token, "inq-1");

    // The budget ceiling went out inside sortBy: 2000 * 3 nights * 2 adults.
    let requests = provider.search_requests.lock().unwrap();
    assert_eq!(requests[0].sort_by.final_rate, Some(12_000.0));
    assert_eq!(requests[0].sort_by.value, "priceAsc");
}

#[actix_web::test]
async fn test_search_rejects_invalid_party() {
    let provider = Arc::new(MockProvider::default());
    let app = init_app!(provider);

    let mut body = search_body();
    body["party"] = json!({ "rooms": [{ "adults": [], "children": [] }] });

    let req = authed(test::TestRequest::post().uri("/api/hotels/search"))
        .set_json(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(provider.search_requests.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_next_page_without_session_is_not_found() {
    let provider = Arc::new(MockProvider::default());
    let app = init_app!(provider);

    let req = authed(test::TestRequest::post().uri("/api/hotels/search/next"))
        .set_json(json!({ "inquiryToken": "inq-unknown" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_web::test]
async fn test_exhausted_session_conflicts_on_next_page() {
    let provider = Arc::new(MockProvider::default());
    provider.push_search(Ok(result_set(Some("T1"), 1, None, vec![hotel("h1")])));
    let app = init_app!(provider);

    let req = authed(test::TestRequest::post().uri("/api/hotels/search"))
        .set_json(search_body())
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = authed(test::TestRequest::post().uri("/api/hotels/search/next"))
        .set_json(json!({ "inquiryToken": "inq-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn test_details_then_select_flow() {
    let provider = Arc::new(MockProvider::default());
    provider.push_search(Ok(result_set(Some("T1"), 1, Some(2), vec![hotel("H1")])));
    provider.set_details(raw_details());
    provider.push_select(Ok(Some(
        serde_json::from_value(json!({
            "hotelCode": "H1",
            "hotelName": "Grand Tagus",
            "itineraryCode": "IT-77",
            "items": [{ "code": "item-1" }]
        }))
        .unwrap(),
    )));
    provider.push_itinerary(ItineraryUpdateResponse {
        success: true,
        message: None,
        partial_success: false,
    });
    let app = init_app!(provider);

    let req = authed(test::TestRequest::post().uri("/api/hotels/search"))
        .set_json(search_body())
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = authed(test::TestRequest::get().uri("/api/hotels/inq-1/H1/details")).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["hotelName"], "Grand Tagus");
    let recommendations = body["recommendations"].as_array().unwrap();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0]["id"], "REC");
    assert_eq!(recommendations[0]["totalPrice"], 260.0);

    let req = authed(test::TestRequest::post().uri("/api/hotels/select"))
        .set_json(json!({
            "inquiryToken": "inq-1",
            "recommendationId": "REC",
            "kind": "add",
            "itineraryToken": "itin-9",
            "cityName": "Lisbon",
            "date": "2024-03-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["committed"], true);
    assert_eq!(body["hotelName"], "Grand Tagus");
    assert_eq!(body["finalAllocation"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_select_replace_without_old_code_is_bad_request() {
    let provider = Arc::new(MockProvider::default());
    provider.push_search(Ok(result_set(Some("T1"), 1, Some(2), vec![hotel("H1")])));
    provider.set_details(raw_details());
    let app = init_app!(provider);

    let req = authed(test::TestRequest::post().uri("/api/hotels/search"))
        .set_json(search_body())
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
    let req = authed(test::TestRequest::get().uri("/api/hotels/inq-1/H1/details")).to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = authed(test::TestRequest::post().uri("/api/hotels/select"))
        .set_json(json!({
            "inquiryToken": "inq-1",
            "recommendationId": "REC",
            "kind": "replace",
            "itineraryToken": "itin-9",
            "cityName": "Lisbon",
            "date": "2024-03-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
    assert!(provider.select_requests.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn test_select_without_open_hotel_conflicts() {
    let provider = Arc::new(MockProvider::default());
    provider.push_search(Ok(result_set(Some("T1"), 1, Some(2), vec![hotel("H1")])));
    let app = init_app!(provider);

    let req = authed(test::TestRequest::post().uri("/api/hotels/search"))
        .set_json(search_body())
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = authed(test::TestRequest::post().uri("/api/hotels/select"))
        .set_json(json!({
            "inquiryToken": "inq-1",
            "recommendationId": "REC",
            "itineraryToken": "itin-9",
            "cityName": "Lisbon",
            "date": "2024-03-01"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 409);
}

#[actix_web::test]
async fn test_cancel_retires_the_flow() {
    let provider = Arc::new(MockProvider::default());
    provider.push_search(Ok(result_set(Some("T1"), 1, Some(2), vec![hotel("h1")])));
    let app = init_app!(provider);

    let req = authed(test::TestRequest::post().uri("/api/hotels/search"))
        .set_json(search_body())
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    let req = authed(test::TestRequest::delete().uri("/api/hotels/search/inq-1")).to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    // The flow is gone; paging further is a 404.
    let req = authed(test::TestRequest::post().uri("/api/hotels/search/next"))
        .set_json(json!({ "inquiryToken": "inq-1" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}
