//! Reverse proxy to the API upstream.
//!
//! # Responsibilities
//! - Rewrite the request path to the route's target path, keeping the query
//! - Point `Host` at the upstream authority
//! - Strip hop-by-hop headers in both directions
//! - Stream request and response bodies without buffering
//! - Force `access-control-allow-origin: *` on the relayed response
//!
//! # Design Decisions
//! - One pooled HTTP/1.1 client shared by all requests
//! - No timeouts or retries: a hung upstream hangs the client request
//! - Errors surface as `ProxyError`; the caller logs and maps them to 502

use axum::{
    body::Body,
    http::{
        header,
        uri::{Authority, Scheme},
        HeaderMap, HeaderName, HeaderValue, Request, Response, Uri, Version,
    },
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use crate::config::ValidationError;
use crate::http::error::ProxyError;
use crate::http::headers::ALLOW_ANY_ORIGIN;
use crate::routing::ApiRoute;

/// Headers meaningful only for a single transport hop.
const HOP_BY_HOP: [HeaderName; 7] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    HeaderName::from_static("proxy-connection"),
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

/// Origin API requests are forwarded to.
#[derive(Debug, Clone)]
pub struct Upstream {
    scheme: Scheme,
    authority: Authority,
    host: HeaderValue,
}

impl Upstream {
    /// Parse an origin such as `http://127.0.0.1:8000`.
    pub fn parse(origin: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidUpstream(origin.to_string());

        let uri: Uri = origin.parse().map_err(|_| invalid())?;
        let scheme = uri.scheme().cloned().ok_or_else(invalid)?;
        let authority = uri.authority().cloned().ok_or_else(invalid)?;
        let host = HeaderValue::from_str(authority.as_str()).map_err(|_| invalid())?;

        Ok(Self {
            scheme,
            authority,
            host,
        })
    }

    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Absolute upstream URI for a rewritten path and query.
    pub fn uri_for(&self, path_and_query: &str) -> Result<Uri, ProxyError> {
        let uri = format!("{}://{}{}", self.scheme, self.authority, path_and_query).parse()?;
        Ok(uri)
    }
}

/// Forwards API requests to the upstream.
#[derive(Clone)]
pub struct Proxy {
    client: Client<HttpConnector, Body>,
    upstream: Upstream,
}

impl Proxy {
    pub fn new(upstream: Upstream) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client, upstream }
    }

    pub fn upstream(&self) -> &Upstream {
        &self.upstream
    }

    /// Forward `request` along `route` and relay the upstream response.
    pub async fn forward(
        &self,
        route: &ApiRoute,
        request: Request<Body>,
    ) -> Result<Response<Body>, ProxyError> {
        let (mut parts, body) = request.into_parts();

        let path_and_query = route.rewrite(&parts.uri);
        parts.uri = self.upstream.uri_for(&path_and_query)?;
        parts.version = Version::HTTP_11;
        strip_hop_by_hop(&mut parts.headers);
        parts.headers.insert(header::HOST, self.upstream.host.clone());

        tracing::debug!(
            route = route.name(),
            method = %parts.method,
            upstream = %parts.uri,
            "Forwarding request"
        );

        let response: Response<Incoming> = self
            .client
            .request(Request::from_parts(parts, body))
            .await?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        parts
            .headers
            .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ANY_ORIGIN);

        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Remove hop-by-hop headers, including any named by `Connection`.
fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
}
