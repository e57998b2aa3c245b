//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, ordered
//! mount dispatch, the fallback catch-all, and access log emission.

use crate::handler::static_files::{self, LoadedFile, Resolution};
use crate::http::{self, cache, RangeOutcome};
use crate::logger::AccessLogEntry;
use crate::server::ServerState;
use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Per-request state pulled out of the hyper request up front.
struct RequestContext<'a> {
    path: &'a str,
    is_head: bool,
    if_none_match: Option<String>,
    range: Option<String>,
}

/// Main entry point for HTTP request handling.
pub async fn handle_request(
    req: Request<Incoming>,
    peer: SocketAddr,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(ToString::to_string);
    let http_version = match req.version() {
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        _ => "1.1",
    };

    let ctx = RequestContext {
        path: &path,
        is_head: method == Method::HEAD,
        if_none_match: header(&req, "if-none-match"),
        range: header(&req, "range"),
    };

    let response = dispatch(&ctx, &method, &state).await;

    if state.logger.access_enabled() {
        let mut entry =
            AccessLogEntry::new(peer.ip().to_string(), method.to_string(), path.clone());
        entry.query = query;
        entry.http_version = http_version.to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = content_length(&response);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        state.logger.access(&entry.format(&state.log_format));
    }

    Ok(response)
}

/// Route the request across the mounts, then the fallback, then 404.
async fn dispatch(
    ctx: &RequestContext<'_>,
    method: &Method,
    state: &Arc<ServerState>,
) -> Response<Full<Bytes>> {
    if !matches!(*method, Method::GET | Method::HEAD) {
        return http::build_405_response();
    }

    // Earlier mounts win. A matching prefix that resolves no file falls
    // through to later mounts.
    for mount in &state.site.mounts {
        let Some(relative) = strip_mount(ctx.path, &mount.prefix) else {
            continue;
        };
        match static_files::resolve(&mount.source, relative) {
            Resolution::Found(file_path) => {
                if let Some(file) = static_files::load(&file_path).await {
                    return serve_file(ctx, file);
                }
                state
                    .logger
                    .error(&format!("Failed to read {}", file_path.display()));
            }
            Resolution::Missing => {}
            Resolution::Outside => {
                state.logger.error(&format!(
                    "Blocked path escaping `{}`: {}",
                    mount.prefix, ctx.path
                ));
            }
        }
    }

    // One catch-all for the whole site, consulted only after every mount
    // came up empty.
    if let Some(fallback) = &state.site.fallback {
        if let Some(file) = static_files::load(fallback).await {
            return http::build_fallback_response(
                Bytes::from(file.content),
                &file.content_type,
                ctx.is_head,
            );
        }
        state
            .logger
            .error(&format!("Fallback file unreadable: {}", fallback.display()));
    }

    http::build_404_response()
}

/// Serve a loaded file honoring conditional and range headers.
fn serve_file(ctx: &RequestContext<'_>, file: LoadedFile) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&file.content);
    if cache::etag_matches(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    let total = file.content.len();
    match http::parse_range(ctx.range.as_deref(), total) {
        RangeOutcome::Partial(range) => {
            let body = Bytes::from(file.content).slice(range.start..=range.end);
            http::build_partial_response(
                body,
                &file.content_type,
                &etag,
                range.start,
                range.end,
                total,
                ctx.is_head,
            )
        }
        RangeOutcome::Unsatisfiable => http::build_416_response(total),
        RangeOutcome::Full => http::build_file_response(
            Bytes::from(file.content),
            &file.content_type,
            &etag,
            ctx.is_head,
        ),
    }
}

/// Strip `prefix` from `path`, yielding the mount-relative remainder.
/// `None` means the prefix does not cover this path.
fn strip_mount<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix == "/" {
        return Some(path.trim_start_matches('/'));
    }

    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some("")
    } else {
        rest.strip_prefix('/')
    }
}

fn header(req: &Request<Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToString::to_string)
}

fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
