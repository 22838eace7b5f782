//! Static storage: the web bucket and its access policy.

use crate::error::ComposeError;
use crate::graph::{NodeId, ResourceGraph};
use crate::naming;
use crate::stack::StackPlan;
use serde_json::json;
use stackloom_types::ResourceKind;

pub const BUCKET_ID: &str = "WebBucket";

#[derive(Clone, Copy, Debug)]
pub struct StorageParts {
    pub bucket: NodeId,
    pub policy: NodeId,
}

pub fn build(graph: &mut ResourceGraph, plan: &StackPlan) -> Result<StorageParts, ComposeError> {
    let bucket = graph.add(
        BUCKET_ID,
        ResourceKind::Bucket,
        None,
        json!({
            "BucketName": naming::web_bucket_name(plan),
            "PublicAccessBlockConfiguration": {
                "BlockPublicAcls": true,
                "BlockPublicPolicy": true,
                "IgnorePublicAcls": true,
                "RestrictPublicBuckets": true,
            },
            "WebsiteConfiguration": {
                "IndexDocument": "index.html",
                "ErrorDocument": "index.html",
            },
        }),
    )?;

    // Read access is granted to the edge service only; public access stays
    // blocked at the bucket.
    let policy = graph.add_child(
        bucket,
        "Policy",
        ResourceKind::BucketPolicy,
        None,
        json!({
            "Bucket": { "Ref": BUCKET_ID },
            "PolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": "cloudfront.amazonaws.com" },
                    "Action": "s3:GetObject",
                    "Resource": {
                        "Fn::Sub": format!("${{{BUCKET_ID}.Arn}}/*")
                    },
                }],
            },
        }),
    )?;

    Ok(StorageParts { bucket, policy })
}
