//! Stable identifiers for lint rules and output names.
//!
//! Rule IDs keep the upstream security linter's public naming so existing
//! suppression lists keep matching. Output names are the keys of the
//! synthesized output set.

// Storage rules
pub const RULE_BUCKET_ACCESS_LOGS: &str = "AwsSolutions-S1";
pub const RULE_BUCKET_ORIGIN_ACCESS: &str = "AwsSolutions-S5";
pub const RULE_BUCKET_SSL_ONLY: &str = "AwsSolutions-S10";

// Load balancer rules
pub const RULE_LB_ACCESS_LOGS: &str = "AwsSolutions-ELB2";
pub const RULE_OPEN_INGRESS: &str = "AwsSolutions-EC23";

// Database rules
pub const RULE_DB_IAM_AUTH: &str = "AwsSolutions-RDS6";
pub const RULE_DB_MULTI_AZ: &str = "AwsSolutions-RDS10";
pub const RULE_DB_DEFAULT_PORT: &str = "AwsSolutions-RDS11";
pub const RULE_DB_BACKTRACK: &str = "AwsSolutions-RDS14";
pub const RULE_DB_LOG_EXPORTS: &str = "AwsSolutions-RDS16";

// Edge distribution rules
pub const RULE_EDGE_GEO_RESTRICTION: &str = "AwsSolutions-CFR1";
pub const RULE_EDGE_WAF: &str = "AwsSolutions-CFR2";
pub const RULE_EDGE_ACCESS_LOGS: &str = "AwsSolutions-CFR3";
pub const RULE_EDGE_TLS_MINIMUM: &str = "AwsSolutions-CFR4";
pub const RULE_EDGE_ORIGIN_TLS: &str = "AwsSolutions-CFR5";

// Network rules
pub const RULE_NETWORK_FLOW_LOGS: &str = "AwsSolutions-VPC7";

// Compute rules
pub const RULE_TASK_PLAIN_ENV: &str = "AwsSolutions-ECS2";
pub const RULE_CLUSTER_INSIGHTS: &str = "AwsSolutions-ECS4";

// Credentials rules
pub const RULE_SECRET_ROTATION: &str = "AwsSolutions-SMG4";

// Output names
pub const OUTPUT_DATABASE_ENDPOINT: &str = "DatabaseEndpoint";
pub const OUTPUT_LOAD_BALANCER_DNS: &str = "LoadBalancerDNS";
pub const OUTPUT_EDGE_DOMAIN: &str = "EdgeDomainName";
pub const OUTPUT_WEB_BUCKET: &str = "WebBucketName";
