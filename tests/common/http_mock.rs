use std::time::Duration;

use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub fn token_body(access: &str, refresh: Option<&str>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "access_token": access,
        "scope": ["read_station"],
        "expires_in": 10800,
        "expire_in": 10800
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = serde_json::Value::String(refresh.to_string());
    }
    body
}

/// Mount a refresh-grant handler answering with `access`/`refresh`, expected `times` times.
#[allow(dead_code)]
pub async fn mount_refresh(
    server: &MockServer,
    access: &str,
    refresh: Option<&str>,
    delay: Duration,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(path("/oauth2/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body(access, refresh))
                .set_delay(delay),
        )
        .expect(times)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn stations_body() -> serde_json::Value {
    serde_json::json!({
        "body": {
            "devices": [{
                "_id": "70:ee:50:00:00:01",
                "station_name": "Home",
                "module_name": "Indoor",
                "type": "NAMain",
                "reachable": true,
                "dashboard_data": {"Temperature": 21.5, "Humidity": 45, "CO2": 612},
                "modules": [{
                    "_id": "02:00:00:00:00:01",
                    "type": "NAModule1",
                    "module_name": "Outdoor",
                    "dashboard_data": {"Temperature": 4.2}
                }]
            }]
        },
        "status": "ok",
        "time_server": 1700000000
    })
}

/// Mount the station endpoint, answering `status` with `body`.
#[allow(dead_code)]
pub async fn mount_stations(server: &MockServer, status: u16, body: ResponseBody) {
    let template = match body {
        ResponseBody::Json(json) => ResponseTemplate::new(status).set_body_json(json),
        ResponseBody::Raw(text) => ResponseTemplate::new(status).set_body_string(text),
    };
    Mock::given(method("GET"))
        .and(path("/api/getstationsdata"))
        .and(query_param("app_type", "app_station"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Raw(String),
}
