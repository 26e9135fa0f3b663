//! Route handlers: extract, delegate to [`Gateway`], serialize.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use toolgate_core::gateway::{
    AlertsResponse, AsnResponse, Base64Response, CryptoResponse, CveResponse, DnsResponse,
    EndpointsResponse, HashResponse, HealthResponse, HttpStatusResponse, PhoneResponse, PingResponse,
    ReverseGeocodeResponse, SearchResponse, SslResponse, TimeResponse, TimezonesResponse,
};
use toolgate_core::utility::SubnetInfo;
use toolgate_core::{Apod, Envelope, Gateway, GeoLocation, IpInfo, TimezoneInfo, WeatherReport, WhoisRecord};

use crate::error::ApiError;

type Shared = State<Arc<Gateway>>;
type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;
type Body<T> = Result<Json<T>, JsonRejection>;
type PathArg<T> = Result<Path<T>, PathRejection>;
type QueryArg<T> = Result<Query<T>, QueryRejection>;

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    query: Option<String>,
    num_results: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ResultCount {
    num_results: Option<String>,
}

impl ResultCount {
    /// Unparseable counts fall back to the default rather than failing.
    fn count(&self) -> Option<i64> {
        self.num_results.as_deref().and_then(|raw| raw.trim().parse().ok())
    }
}

#[derive(Debug, Deserialize)]
pub struct PhoneParams {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PortParam {
    port: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UrlParam {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HashBody {
    text: Option<String>,
    algorithm: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Base64Body {
    text: Option<String>,
    mode: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubnetBody {
    cidr: Option<String>,
}

pub async fn health(State(gateway): Shared) -> Json<Envelope<HealthResponse>> {
    Json(gateway.health())
}

pub async fn endpoints(State(gateway): Shared) -> Json<Envelope<EndpointsResponse>> {
    Json(gateway.endpoints())
}

pub async fn time(State(gateway): Shared) -> Json<Envelope<TimeResponse>> {
    Json(gateway.time())
}

pub async fn search(State(gateway): Shared, body: Body<SearchBody>) -> ApiResult<SearchResponse> {
    let Json(body) = body?;
    Ok(Json(gateway.search(body.query.as_deref(), body.num_results).await?))
}

pub async fn news(
    State(gateway): Shared,
    path: PathArg<String>,
    query: QueryArg<ResultCount>,
) -> ApiResult<SearchResponse> {
    let Path(query_text) = path?;
    let Query(params) = query?;
    Ok(Json(gateway.news(&query_text, params.count()).await?))
}

pub async fn weather(State(gateway): Shared, path: PathArg<String>) -> ApiResult<WeatherReport> {
    let Path(location) = path?;
    Ok(Json(gateway.weather(&location).await?))
}

pub async fn weather_alerts(
    State(gateway): Shared,
    path: PathArg<String>,
) -> ApiResult<AlertsResponse> {
    let Path(location) = path?;
    Ok(Json(gateway.weather_alerts(&location).await?))
}

pub async fn timezone(State(gateway): Shared, path: PathArg<String>) -> ApiResult<TimezoneInfo> {
    let Path(zone) = path?;
    Ok(Json(gateway.timezone(&zone).await?))
}

pub async fn timezones(State(gateway): Shared) -> ApiResult<TimezonesResponse> {
    Ok(Json(gateway.timezones().await?))
}

pub async fn geocode(State(gateway): Shared, path: PathArg<String>) -> ApiResult<GeoLocation> {
    let Path(location) = path?;
    Ok(Json(gateway.geocode(&location).await?))
}

pub async fn reverse_geocode(
    State(gateway): Shared,
    path: PathArg<(String, String)>,
) -> ApiResult<ReverseGeocodeResponse> {
    let Path((lat, lon)) = path?;
    Ok(Json(gateway.reverse_geocode(&lat, &lon).await?))
}

pub async fn caller_ip(
    State(gateway): Shared,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> ApiResult<IpInfo> {
    let caller = connect_info.map(|ConnectInfo(addr)| addr.ip());
    Ok(Json(gateway.ip(None, caller).await?))
}

pub async fn ip(
    State(gateway): Shared,
    path: PathArg<String>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> ApiResult<IpInfo> {
    let Path(target) = path?;
    let caller = connect_info.map(|ConnectInfo(addr)| addr.ip());
    Ok(Json(gateway.ip(Some(&target), caller).await?))
}

pub async fn phone(
    State(gateway): Shared,
    path: PathArg<String>,
    query: QueryArg<PhoneParams>,
) -> ApiResult<PhoneResponse> {
    let Path(number) = path?;
    let Query(params) = query?;
    Ok(Json(gateway.phone(&number, params.country.as_deref()).await?))
}

pub async fn dns(State(gateway): Shared, path: PathArg<String>) -> ApiResult<DnsResponse> {
    let Path(hostname) = path?;
    Ok(Json(gateway.dns(&hostname).await?))
}

pub async fn ping(State(gateway): Shared, path: PathArg<String>) -> ApiResult<PingResponse> {
    let Path(host) = path?;
    Ok(Json(gateway.ping(&host).await?))
}

pub async fn apod(State(gateway): Shared) -> ApiResult<Apod> {
    Ok(Json(gateway.apod().await?))
}

pub async fn hash(State(gateway): Shared, body: Body<HashBody>) -> ApiResult<HashResponse> {
    let Json(body) = body?;
    Ok(Json(gateway.hash(body.text.as_deref(), body.algorithm.as_deref())?))
}

pub async fn base64(State(gateway): Shared, body: Body<Base64Body>) -> ApiResult<Base64Response> {
    let Json(body) = body?;
    Ok(Json(gateway.base64(body.text.as_deref(), body.mode.as_deref())?))
}

pub async fn subnet(State(gateway): Shared, body: Body<SubnetBody>) -> ApiResult<SubnetInfo> {
    let Json(body) = body?;
    Ok(Json(gateway.subnet(body.cidr.as_deref())?))
}

pub async fn whois(State(gateway): Shared, path: PathArg<String>) -> ApiResult<WhoisRecord> {
    let Path(domain) = path?;
    Ok(Json(gateway.whois(&domain).await?))
}

pub async fn asn(State(gateway): Shared, path: PathArg<String>) -> ApiResult<AsnResponse> {
    let Path(ip) = path?;
    Ok(Json(gateway.asn(&ip).await?))
}

pub async fn crypto(State(gateway): Shared, path: PathArg<String>) -> ApiResult<CryptoResponse> {
    let Path(symbol) = path?;
    Ok(Json(gateway.crypto(&symbol).await?))
}

pub async fn cve(State(gateway): Shared, path: PathArg<String>) -> ApiResult<CveResponse> {
    let Path(id) = path?;
    Ok(Json(gateway.cve(&id).await?))
}

pub async fn ssl(
    State(gateway): Shared,
    path: PathArg<String>,
    query: QueryArg<PortParam>,
) -> ApiResult<SslResponse> {
    let Path(hostname) = path?;
    let Query(params) = query?;
    Ok(Json(gateway.ssl(&hostname, params.port.as_deref()).await?))
}

pub async fn http_status(State(gateway): Shared, query: QueryArg<UrlParam>) -> ApiResult<HttpStatusResponse> {
    let Query(params) = query?;
    Ok(Json(gateway.http_status(params.url.as_deref()).await?))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
