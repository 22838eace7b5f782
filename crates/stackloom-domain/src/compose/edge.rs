//! Edge tier: path-based routing from the public distribution to origins.
//!
//! One default route serves cached static content from the bucket; explicit
//! prefix routes forward to the compute origin uncached with all viewer
//! attributes. When several prefix routes could match, the longest prefix
//! wins. Origin 403/404 responses are remapped to the entry document so the
//! client application can handle its own routes.

use crate::error::ComposeError;
use crate::graph::{NodeId, ResourceGraph};
use crate::naming;
use crate::stack::StackPlan;
use serde_json::{Value as JsonValue, json};
use stackloom_types::{ResourceKind, Tier};

pub const DISTRIBUTION_ID: &str = "EdgeDistribution";
pub const API_ROUTE_PATTERN: &str = "/api/*";
pub const ENTRY_DOCUMENT: &str = "/index.html";

const STATIC_ORIGIN_ID: &str = "static-origin";
const COMPUTE_ORIGIN_ID: &str = "compute-origin";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OriginRef {
    /// The static web bucket.
    StaticBucket,
    /// The load balancer in front of the backend service.
    Compute,
}

impl OriginRef {
    fn origin_id(self) -> &'static str {
        match self {
            OriginRef::StaticBucket => STATIC_ORIGIN_ID,
            OriginRef::Compute => COMPUTE_ORIGIN_ID,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheMode {
    Optimized,
    Disabled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AllowedMethods {
    GetHead,
    All,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteRule {
    /// `None` for the catch-all default route.
    pub path_pattern: Option<String>,
    pub origin: OriginRef,
    pub cache: CacheMode,
    pub methods: AllowedMethods,
    pub is_default: bool,
}

/// The path router behind the distribution.
#[derive(Clone, Debug)]
pub struct EdgeRouter {
    rules: Vec<RouteRule>,
}

impl EdgeRouter {
    pub fn new(rules: Vec<RouteRule>) -> Result<Self, ComposeError> {
        let defaults = rules.iter().filter(|r| r.is_default).count();
        if defaults != 1 {
            return Err(ComposeError::DefaultRouteCount { found: defaults });
        }
        Ok(Self { rules })
    }

    /// The standard two-route layout: cached static default plus an uncached
    /// API prefix to the compute origin.
    pub fn standard() -> Self {
        Self {
            rules: vec![
                RouteRule {
                    path_pattern: None,
                    origin: OriginRef::StaticBucket,
                    cache: CacheMode::Optimized,
                    methods: AllowedMethods::GetHead,
                    is_default: true,
                },
                RouteRule {
                    path_pattern: Some(API_ROUTE_PATTERN.to_string()),
                    origin: OriginRef::Compute,
                    cache: CacheMode::Disabled,
                    methods: AllowedMethods::All,
                    is_default: false,
                },
            ],
        }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Match a request path: the longest matching non-default prefix wins,
    /// otherwise the default route.
    pub fn match_route(&self, path: &str) -> &RouteRule {
        self.rules
            .iter()
            .filter(|r| !r.is_default)
            .filter(|r| {
                r.path_pattern
                    .as_deref()
                    .is_some_and(|p| path.starts_with(prefix_of(p)))
            })
            .max_by_key(|r| r.path_pattern.as_deref().map_or(0, |p| prefix_of(p).len()))
            .unwrap_or_else(|| self.default_route())
    }

    fn default_route(&self) -> &RouteRule {
        // Constructors guarantee exactly one default rule exists.
        self.rules
            .iter()
            .find(|r| r.is_default)
            .unwrap_or_else(|| &self.rules[0])
    }

    /// (origin status, response path, response status) remaps applied to all
    /// origins.
    pub fn error_remaps() -> [(u16, &'static str, u16); 2] {
        [(403, ENTRY_DOCUMENT, 200), (404, ENTRY_DOCUMENT, 200)]
    }
}

/// The literal prefix of a route pattern (`/api/*` matches paths starting
/// with `/api/`).
fn prefix_of(pattern: &str) -> &str {
    pattern.strip_suffix('*').unwrap_or(pattern)
}

#[derive(Clone, Copy, Debug)]
pub struct EdgeParts {
    pub distribution: NodeId,
}

pub fn build(graph: &mut ResourceGraph, plan: &StackPlan) -> Result<EdgeParts, ComposeError> {
    let router = EdgeRouter::standard();

    let behaviors: Vec<JsonValue> = router
        .rules()
        .iter()
        .filter(|r| !r.is_default)
        .map(behavior_entry)
        .collect();
    let default_rule = router
        .rules()
        .iter()
        .find(|r| r.is_default)
        .ok_or(ComposeError::DefaultRouteCount { found: 0 })?;

    let error_responses: Vec<JsonValue> = EdgeRouter::error_remaps()
        .iter()
        .map(|(origin_status, page, response_status)| {
            json!({
                "ErrorCode": origin_status,
                "ResponsePagePath": page,
                "ResponseCode": response_status,
            })
        })
        .collect();

    let distribution = graph.add(
        DISTRIBUTION_ID,
        ResourceKind::Distribution,
        Some(Tier::Edge),
        json!({
            "DistributionConfig": {
                "Enabled": true,
                "HttpVersion": "http2",
                "IPV6Enabled": false,
                "PriceClass": "PriceClass_100",
                "DefaultRootObject": "index.html",
                "Aliases": [ naming::edge_domain(plan) ],
                "Origins": [
                    {
                        "Id": STATIC_ORIGIN_ID,
                        "DomainName": {
                            "Fn::GetAtt": [super::storage::BUCKET_ID, "RegionalDomainName"]
                        },
                        "OriginAccessControl": true,
                    },
                    {
                        "Id": COMPUTE_ORIGIN_ID,
                        "DomainName": naming::load_balancer_dns(plan),
                        "CustomOriginConfig": { "OriginProtocolPolicy": "http-only" },
                    },
                ],
                "DefaultCacheBehavior": default_behavior_entry(default_rule),
                "CacheBehaviors": behaviors,
                "CustomErrorResponses": error_responses,
            },
        }),
    )?;

    Ok(EdgeParts { distribution })
}

fn default_behavior_entry(rule: &RouteRule) -> JsonValue {
    json!({
        "TargetOriginId": rule.origin.origin_id(),
        "ViewerProtocolPolicy": "redirect-to-https",
        "AllowedMethods": methods_entry(rule.methods),
        "CachePolicy": cache_entry(rule.cache),
    })
}

fn behavior_entry(rule: &RouteRule) -> JsonValue {
    let mut entry = serde_json::Map::new();
    if let Some(pattern) = &rule.path_pattern {
        entry.insert("PathPattern".to_string(), json!(pattern));
    }
    entry.insert("TargetOriginId".to_string(), json!(rule.origin.origin_id()));
    entry.insert(
        "ViewerProtocolPolicy".to_string(),
        json!("redirect-to-https"),
    );
    entry.insert("AllowedMethods".to_string(), methods_entry(rule.methods));
    entry.insert("CachePolicy".to_string(), cache_entry(rule.cache));
    if rule.cache == CacheMode::Disabled {
        // Uncached origins see the request exactly as the viewer sent it.
        entry.insert("OriginRequestPolicy".to_string(), json!("all-viewer"));
    }
    JsonValue::Object(entry)
}

fn methods_entry(methods: AllowedMethods) -> JsonValue {
    match methods {
        AllowedMethods::GetHead => json!(["GET", "HEAD"]),
        AllowedMethods::All => json!([
            "GET", "HEAD", "OPTIONS", "PUT", "POST", "PATCH", "DELETE"
        ]),
    }
}

fn cache_entry(cache: CacheMode) -> JsonValue {
    match cache {
        CacheMode::Optimized => json!("caching-optimized"),
        CacheMode::Disabled => json!("caching-disabled"),
    }
}
