//! Explain registry for lint rules.
//!
//! Maps the rule IDs the suppression visitor attaches to human-readable
//! explanations: what the rule flags and when suppressing it is acceptable.

use crate::ids;

/// Explanation entry for a lint rule.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the rule.
    pub title: &'static str,
    /// What the rule flags and why it exists.
    pub description: &'static str,
    /// When a suppression is an acceptable trade-off.
    pub guidance: &'static str,
}

/// Look up an explanation by rule ID.
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    let entry = match identifier {
        ids::RULE_BUCKET_ACCESS_LOGS => Explanation {
            title: "Bucket Server Access Logs",
            description: "The storage bucket does not have server access logging enabled, so \
object-level requests leave no audit trail.",
            guidance: "Acceptable for development buckets that hold only public static assets; \
production buckets holding anything sensitive should log to a dedicated audit bucket.",
        },
        ids::RULE_BUCKET_ORIGIN_ACCESS => Explanation {
            title: "Bucket Origin Access Identity",
            description: "The static bucket is served through the edge distribution without a \
dedicated origin access identity.",
            guidance: "Acceptable when the bucket blocks all public access and origin access \
control is configured at the distribution instead.",
        },
        ids::RULE_BUCKET_SSL_ONLY => Explanation {
            title: "Bucket SSL-Only Policy",
            description: "The bucket policy does not deny plaintext (non-TLS) requests.",
            guidance: "Acceptable in development; production buckets should carry an explicit \
aws:SecureTransport deny statement.",
        },
        ids::RULE_LB_ACCESS_LOGS => Explanation {
            title: "Load Balancer Access Logs",
            description: "The load balancer does not write access logs.",
            guidance: "Acceptable for internal development load balancers; enable logging before \
serving production traffic.",
        },
        ids::RULE_OPEN_INGRESS => Explanation {
            title: "Unrestricted Ingress",
            description: "A security group permits inbound traffic from a large source range on \
an unencrypted port.",
            guidance: "Acceptable when the source is the edge provider's managed prefix list and \
the listener only speaks plain HTTP inside the private network.",
        },
        ids::RULE_DB_IAM_AUTH => Explanation {
            title: "Database IAM Authentication",
            description: "The database cluster relies on password credentials instead of \
IAM-based authentication.",
            guidance: "Acceptable when credentials are generated into and resolved from the \
secret store, never checked into configuration.",
        },
        ids::RULE_DB_MULTI_AZ => Explanation {
            title: "Database Multi-AZ",
            description: "The database cluster runs a single writer without a standby replica.",
            guidance: "Acceptable for development workloads that tolerate recovery from \
snapshots; production clusters should run a reader in a second zone.",
        },
        ids::RULE_DB_DEFAULT_PORT => Explanation {
            title: "Database Default Port",
            description: "The database listens on the engine's well-known default port.",
            guidance: "Port obscurity adds little once network access is restricted to the \
compute security group; acceptable whenever the permit chain is in place.",
        },
        ids::RULE_DB_BACKTRACK => Explanation {
            title: "Database Backtrack",
            description: "Point-in-time rewind is not enabled for the cluster.",
            guidance: "Acceptable when automated snapshots cover the recovery objective.",
        },
        ids::RULE_DB_LOG_EXPORTS => Explanation {
            title: "Database Log Exports",
            description: "Engine logs (audit, error, general, slow query) are not exported to \
the logging service.",
            guidance: "Acceptable in development; production clusters should export at least \
audit and error logs.",
        },
        ids::RULE_EDGE_GEO_RESTRICTION => Explanation {
            title: "Edge Geo Restriction",
            description: "The distribution serves all geographies.",
            guidance: "Acceptable unless a compliance boundary requires limiting the audience.",
        },
        ids::RULE_EDGE_WAF => Explanation {
            title: "Edge Web ACL",
            description: "No web application firewall is attached to the distribution.",
            guidance: "Acceptable for development stacks; attach a managed rule set before \
exposing production traffic.",
        },
        ids::RULE_EDGE_ACCESS_LOGS => Explanation {
            title: "Edge Access Logs",
            description: "The distribution does not write access logs.",
            guidance: "Acceptable for development; production distributions should log to a \
dedicated bucket.",
        },
        ids::RULE_EDGE_TLS_MINIMUM => Explanation {
            title: "Edge Minimum TLS Version",
            description: "The distribution does not pin a minimum viewer TLS version.",
            guidance: "Acceptable when the default certificate is in use; set TLS 1.2 or later \
once a custom domain certificate is attached.",
        },
        ids::RULE_EDGE_ORIGIN_TLS => Explanation {
            title: "Edge Origin TLS",
            description: "Traffic from the distribution to an origin is not forced onto TLS.",
            guidance: "Acceptable when the origin sits inside the private network and the hop \
never crosses the public internet.",
        },
        ids::RULE_NETWORK_FLOW_LOGS => Explanation {
            title: "Network Flow Logs",
            description: "The network does not record flow logs.",
            guidance: "Acceptable in development; enable flow logs for production forensics.",
        },
        ids::RULE_TASK_PLAIN_ENV => Explanation {
            title: "Plain Environment Variables",
            description: "The task definition passes configuration through plain environment \
variables.",
            guidance: "Acceptable for non-secret configuration; anything sensitive must move to \
the secret-reference channel.",
        },
        ids::RULE_CLUSTER_INSIGHTS => Explanation {
            title: "Cluster Container Insights",
            description: "Container-level metrics collection is not enabled on the compute \
cluster.",
            guidance: "Acceptable when the task ships its own telemetry agent, as this topology \
does.",
        },
        ids::RULE_SECRET_ROTATION => Explanation {
            title: "Secret Automatic Rotation",
            description: "The database credentials secret has no rotation schedule.",
            guidance: "Acceptable in development; production credentials should rotate on a \
schedule the database engine supports.",
        },
        _ => return None,
    };
    Some(entry)
}

/// List all rule IDs known to the registry.
pub fn all_rule_ids() -> &'static [&'static str] {
    &[
        ids::RULE_BUCKET_ACCESS_LOGS,
        ids::RULE_BUCKET_ORIGIN_ACCESS,
        ids::RULE_BUCKET_SSL_ONLY,
        ids::RULE_LB_ACCESS_LOGS,
        ids::RULE_OPEN_INGRESS,
        ids::RULE_DB_IAM_AUTH,
        ids::RULE_DB_MULTI_AZ,
        ids::RULE_DB_DEFAULT_PORT,
        ids::RULE_DB_BACKTRACK,
        ids::RULE_DB_LOG_EXPORTS,
        ids::RULE_EDGE_GEO_RESTRICTION,
        ids::RULE_EDGE_WAF,
        ids::RULE_EDGE_ACCESS_LOGS,
        ids::RULE_EDGE_TLS_MINIMUM,
        ids::RULE_EDGE_ORIGIN_TLS,
        ids::RULE_NETWORK_FLOW_LOGS,
        ids::RULE_TASK_PLAIN_ENV,
        ids::RULE_CLUSTER_INSIGHTS,
        ids::RULE_SECRET_ROTATION,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_known_rule() {
        let entry = lookup_explanation(ids::RULE_DB_MULTI_AZ).expect("registry entry");
        assert_eq!(entry.title, "Database Multi-AZ");
    }

    #[test]
    fn lookup_unknown_returns_none() {
        assert!(lookup_explanation("AwsSolutions-XYZ1").is_none());
        assert!(lookup_explanation("").is_none());
    }

    #[test]
    fn all_rule_ids_are_in_registry() {
        for id in all_rule_ids() {
            assert!(
                lookup_explanation(id).is_some(),
                "rule {} should be in registry",
                id
            );
        }
    }
}
