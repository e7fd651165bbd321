//! Bundled us-east-1 rate tables for every shipped cost model.
//!
//! Used by `seed --sample`, by `PRICING_STORE=sample` and by tests.

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::models::{DEFAULT_REGION, PricingDocument};

/// 2026-01-01T00:00:00Z
const SAMPLE_EFFECTIVE_TIMESTAMP: i64 = 1_767_225_600;

fn effective_date() -> DateTime<Utc> {
    DateTime::from_timestamp(SAMPLE_EFFECTIVE_TIMESTAMP, 0).unwrap_or_default()
}

fn document(service_code: &str, category: &str, rates: Value) -> PricingDocument {
    PricingDocument::new(
        service_code,
        DEFAULT_REGION,
        Some(category),
        effective_date(),
        rates,
    )
}

fn egress_rates() -> Value {
    json!({
        "freeGb": 100,
        "tiers": [
            {"upTo": 10240, "pricePerGb": 0.09},
            {"upTo": 51200, "pricePerGb": 0.085},
            {"upTo": 153600, "pricePerGb": 0.07},
            {"upTo": null, "pricePerGb": 0.05}
        ]
    })
}

fn block_volume_rates() -> Value {
    json!({
        "volumeTypes": {
            "gp3": {
                "storage": 0.08,
                "includedIops": 3000,
                "pricePerIops": 0.005,
                "includedThroughputMbps": 125,
                "pricePerMbps": 0.04
            },
            "gp2": {"storage": 0.10},
            "io1": {"storage": 0.125, "pricePerIops": 0.065},
            "io2": {"storage": 0.125, "pricePerIops": 0.065},
            "st1": {"storage": 0.045},
            "sc1": {"storage": 0.015}
        },
        "snapshotPerGbMonth": 0.05
    })
}

/// One document per (service, category) for [`DEFAULT_REGION`]
pub fn sample_pricing_documents() -> Vec<PricingDocument> {
    vec![
        document(
            "AmazonEC2",
            "compute",
            json!({
                "instanceTypes": {
                    "t3.micro": 0.0104,
                    "t3.small": 0.0208,
                    "t3.medium": 0.0416,
                    "m5.large": 0.10,
                    "m5.xlarge": 0.192,
                    "c5.large": 0.085,
                    "r5.large": 0.126
                },
                "operatingSystems": {"linux": 1.0, "windows": 1.8, "rhel": 1.3},
                "tenancy": {"shared": 1.0, "dedicated": 1.1, "host": 1.2},
                "purchaseOptions": {
                    "reserved-1yr": 0.4,
                    "reserved-3yr": 0.6,
                    "savings-plan-1yr": 0.35,
                    "savings-plan-3yr": 0.55,
                    "spot": 0.7
                }
            }),
        ),
        document("AmazonEC2", "storage", block_volume_rates()),
        document("AmazonEC2", "data-transfer", egress_rates()),
        document(
            "AmazonS3",
            "storage",
            json!({
                "storageClasses": {
                    "STANDARD": {
                        "storage": [
                            {"upTo": 51200, "pricePerGb": 0.023},
                            {"upTo": 512000, "pricePerGb": 0.022},
                            {"upTo": null, "pricePerGb": 0.021}
                        ],
                        "putPer1000": 0.005,
                        "getPer1000": 0.0004
                    },
                    "INTELLIGENT_TIERING": {
                        "storage": [
                            {"upTo": 51200, "pricePerGb": 0.023},
                            {"upTo": 512000, "pricePerGb": 0.022},
                            {"upTo": null, "pricePerGb": 0.021}
                        ],
                        "putPer1000": 0.005,
                        "getPer1000": 0.0004
                    },
                    "STANDARD_IA": {
                        "storage": 0.0125,
                        "putPer1000": 0.01,
                        "getPer1000": 0.001,
                        "retrievalPerGb": 0.01
                    },
                    "ONEZONE_IA": {
                        "storage": 0.01,
                        "putPer1000": 0.01,
                        "getPer1000": 0.001,
                        "retrievalPerGb": 0.01
                    },
                    "GLACIER_IR": {
                        "storage": 0.004,
                        "putPer1000": 0.02,
                        "getPer1000": 0.01,
                        "retrievalPerGb": 0.03
                    }
                }
            }),
        ),
        document("AmazonS3", "data-transfer", egress_rates()),
        document(
            "AWSLambda",
            "compute",
            json!({
                "architectures": {
                    "x86_64": [
                        {"upTo": 6000000000u64, "pricePerUnit": 0.0000166667},
                        {"upTo": 15000000000u64, "pricePerUnit": 0.000015},
                        {"upTo": null, "pricePerUnit": 0.0000133334}
                    ],
                    "arm64": [
                        {"upTo": 7500000000u64, "pricePerUnit": 0.0000133334},
                        {"upTo": 18750000000u64, "pricePerUnit": 0.0000120001},
                        {"upTo": null, "pricePerUnit": 0.0000106667}
                    ]
                },
                "pricePerMillionRequests": 0.20,
                "ephemeralStoragePerGbSecond": 0.0000000309,
                "freeGbSeconds": 400000,
                "freeRequests": 1000000
            }),
        ),
        document(
            "AmazonRDS",
            "compute",
            json!({
                "instanceClasses": {
                    "db.t3.micro": 0.017,
                    "db.t3.medium": 0.068,
                    "db.m5.large": 0.171,
                    "db.r5.large": 0.25
                },
                "engines": {
                    "mysql": 1.0,
                    "mariadb": 1.0,
                    "postgres": 1.06,
                    "oracle-se2": 1.9,
                    "sqlserver-se": 2.9
                },
                "deployments": {"single-az": 1.0, "multi-az": 2.0, "multi-az-cluster": 3.0}
            }),
        ),
        document(
            "AmazonRDS",
            "storage",
            json!({
                "storageTypes": {
                    "gp2": {"pricePerGbMonth": 0.115},
                    "gp3": {"pricePerGbMonth": 0.115, "includedIops": 3000, "pricePerIops": 0.02},
                    "io1": {"pricePerGbMonth": 0.125, "pricePerIops": 0.10},
                    "magnetic": {"pricePerGbMonth": 0.10}
                },
                "backupPerGbMonth": 0.095
            }),
        ),
        document(
            "AmazonCloudFront",
            "data-transfer",
            json!({
                "transferTiers": [
                    {"upTo": 10240, "pricePerGb": 0.085},
                    {"upTo": 51200, "pricePerGb": 0.080},
                    {"upTo": 153600, "pricePerGb": 0.060},
                    {"upTo": null, "pricePerGb": 0.040}
                ],
                "freeTransferGb": 1024,
                "httpPer10k": 0.0075,
                "httpsPer10k": 0.01,
                "freeRequests": 10000000,
                "freeInvalidationPaths": 1000,
                "invalidationPerPath": 0.005
            }),
        ),
        document(
            "AmazonRoute53",
            "dns",
            json!({
                "hostedZoneTiers": [
                    {"upTo": 25, "pricePerUnit": 0.50},
                    {"upTo": null, "pricePerUnit": 0.10}
                ],
                "queryTiers": {
                    "standard": [
                        {"upTo": 1000, "pricePerUnit": 0.40},
                        {"upTo": null, "pricePerUnit": 0.20}
                    ],
                    "latency": [
                        {"upTo": 1000, "pricePerUnit": 0.60},
                        {"upTo": null, "pricePerUnit": 0.30}
                    ],
                    "geo": [
                        {"upTo": 1000, "pricePerUnit": 0.70},
                        {"upTo": null, "pricePerUnit": 0.35}
                    ]
                },
                "healthCheckPerMonth": 0.50
            }),
        ),
        document(
            "AmazonDynamoDB",
            "database",
            json!({
                "tableClasses": {
                    "standard": {
                        "readPerMillion": 0.125,
                        "writePerMillion": 0.625,
                        "rcuHour": 0.00013,
                        "wcuHour": 0.00065,
                        "storagePerGbMonth": 0.25
                    },
                    "standard-ia": {
                        "readPerMillion": 0.15625,
                        "writePerMillion": 0.78125,
                        "rcuHour": 0.00016,
                        "wcuHour": 0.00081,
                        "storagePerGbMonth": 0.10
                    }
                },
                "freeRcu": 25,
                "freeWcu": 25,
                "freeStorageGb": 25,
                "backupPerGbMonth": 0.10
            }),
        ),
        document(
            "AmazonEKS",
            "cluster",
            json!({
                "controlPlane": {"standard": 0.10, "extended": 0.60},
                "instanceTypes": {
                    "t3.medium": 0.0416,
                    "m5.large": 0.096,
                    "m5.xlarge": 0.192,
                    "c5.xlarge": 0.17
                }
            }),
        ),
        document(
            "AmazonECS",
            "fargate",
            json!({
                "architectures": {
                    "x86_64": {"vcpuHour": 0.04048, "gbHour": 0.004445},
                    "arm64": {"vcpuHour": 0.03238, "gbHour": 0.00356}
                },
                "windowsLicensePerVcpuHour": 0.046,
                "spotDiscount": 0.7,
                "ephemeralStoragePerGbHour": 0.000111,
                "includedEphemeralGb": 20
            }),
        ),
        document(
            "AmazonElastiCache",
            "cache",
            json!({
                "nodeTypes": {
                    "cache.t3.micro": 0.017,
                    "cache.t3.medium": 0.068,
                    "cache.m6g.large": 0.149,
                    "cache.r6g.large": 0.206
                },
                "engineDiscounts": {"redis": 0.0, "valkey": 0.2, "memcached": 0.0},
                "backupPerGbMonth": 0.085
            }),
        ),
        document("AmazonEBS", "storage", block_volume_rates()),
        document(
            "AmazonEFS",
            "storage",
            json!({
                "storage": {
                    "regional": {"standard": 0.30, "infrequent-access": 0.016, "archive": 0.008},
                    "one-zone": {"standard": 0.16, "infrequent-access": 0.0133}
                },
                "iaAccessPerGb": 0.01,
                "provisionedThroughputPerMbpsMonth": 6.0,
                "baselineMbpsPerTb": 50
            }),
        ),
        document(
            "AWSQueueService",
            "requests",
            json!({
                "queueTypes": {
                    "standard": [
                        {"upTo": 100000, "pricePerUnit": 0.40},
                        {"upTo": 200000, "pricePerUnit": 0.30},
                        {"upTo": null, "pricePerUnit": 0.24}
                    ],
                    "fifo": [
                        {"upTo": 100000, "pricePerUnit": 0.50},
                        {"upTo": 200000, "pricePerUnit": 0.40},
                        {"upTo": null, "pricePerUnit": 0.35}
                    ]
                },
                "freeRequests": 1000000,
                "dataTransfer": egress_rates()
            }),
        ),
        document(
            "AmazonSNS",
            "requests",
            json!({
                "publishPerMillion": 0.50,
                "freePublishes": 1000000,
                "protocols": {
                    "http": {"pricePerMillion": 0.60, "freeDeliveries": 100000},
                    "email": {"pricePerMillion": 20.0, "freeDeliveries": 1000},
                    "sqs": {"pricePerMillion": 0.0},
                    "lambda": {"pricePerMillion": 0.0},
                    "mobile-push": {"pricePerMillion": 0.50, "freeDeliveries": 1000000}
                },
                "smsPerMessage": 0.00645
            }),
        ),
        document(
            "AmazonApiGateway",
            "requests",
            json!({
                "requestTiers": {
                    "rest": [
                        {"upTo": 333, "pricePerUnit": 3.50},
                        {"upTo": 1000, "pricePerUnit": 2.80},
                        {"upTo": 20000, "pricePerUnit": 2.38},
                        {"upTo": null, "pricePerUnit": 1.51}
                    ],
                    "http": [
                        {"upTo": 300, "pricePerUnit": 1.00},
                        {"upTo": null, "pricePerUnit": 0.90}
                    ]
                },
                "websocketMessageTiers": [
                    {"upTo": 1000, "pricePerUnit": 1.00},
                    {"upTo": null, "pricePerUnit": 0.80}
                ],
                "connectionMinutesPerMillion": 0.25,
                "cacheHourly": {
                    "0.5": 0.02,
                    "1.6": 0.038,
                    "6.1": 0.20,
                    "13.5": 0.25,
                    "28.4": 0.50,
                    "58.2": 1.00,
                    "118": 1.90,
                    "237": 3.80
                }
            }),
        ),
        document(
            "AmazonVPC",
            "networking",
            json!({
                "natGatewayHourly": 0.045,
                "natPerGb": 0.045,
                "vpnConnectionHourly": 0.05,
                "publicIpv4Hourly": 0.005
            }),
        ),
        document(
            "AWSELB",
            "load-balancer",
            json!({
                "types": {
                    "application": {"hourly": 0.0225, "capacityUnitHour": 0.008},
                    "network": {"hourly": 0.0225, "capacityUnitHour": 0.006},
                    "gateway": {"hourly": 0.0125, "capacityUnitHour": 0.004},
                    "classic": {"hourly": 0.025, "perGb": 0.008}
                }
            }),
        ),
        document(
            "AmazonCloudWatch",
            "monitoring",
            json!({
                "metricTiers": [
                    {"upTo": 10000, "pricePerUnit": 0.30},
                    {"upTo": 250000, "pricePerUnit": 0.10},
                    {"upTo": 1000000, "pricePerUnit": 0.05},
                    {"upTo": null, "pricePerUnit": 0.02}
                ],
                "freeMetrics": 10,
                "dashboardPerMonth": 3.0,
                "freeDashboards": 3,
                "standardAlarmPerMonth": 0.10,
                "highResolutionAlarmPerMonth": 0.30,
                "freeAlarms": 10,
                "logsIngestionPerGb": 0.50,
                "logsStoragePerGbMonth": 0.03,
                "freeLogsGb": 5,
                "apiPer1000": 0.01,
                "freeApiRequests": 1000000
            }),
        ),
        document(
            "AmazonKinesis",
            "streams",
            json!({
                "provisioned": {
                    "shardHour": 0.015,
                    "putPayloadUnitsPerMillion": 0.014,
                    "extendedRetentionShardHour": 0.02
                },
                "onDemand": {
                    "streamHour": 0.04,
                    "ingestPerGb": 0.08,
                    "retrievalPerGb": 0.04
                }
            }),
        ),
        document(
            "AWSStepFunctions",
            "workflows",
            json!({
                "standardPer1000Transitions": 0.025,
                "freeTransitions": 4000,
                "expressPerMillionRequests": 1.0,
                "expressPerGbSecond": 0.00001667
            }),
        ),
    ]
}
