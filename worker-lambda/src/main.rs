// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use chrono::Utc;
use lambda_runtime::{handler_fn, Context, Error};
use log::{info, LevelFilter};
use serde::{Deserialize, Serialize};
use simple_logger::SimpleLogger;

/// Whatever the load generator or the full-stack API sends. Only the
/// item list matters; unknown fields are ignored.
#[derive(Deserialize, Debug, Default)]
struct WorkerEvent {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

#[derive(Serialize, Debug)]
struct WorkerOutput {
    #[serde(rename = "statusCode")]
    status_code: u16,
    body: String,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    SimpleLogger::new().with_level(LevelFilter::Info).init().unwrap();
    let func = handler_fn(process);
    lambda_runtime::run(func).await?;
    Ok(())
}

/// Simulates a short unit of background work so the worker's duration
/// and invocation metrics have realistic shape.
async fn process(event: WorkerEvent, _ctx: Context) -> Result<WorkerOutput, Error> {
    info!("Processing {} item(s)", event.items.len());
    tokio::time::sleep(Duration::from_millis(100)).await;

    let body = serde_json::json!({
        "message": "Worker task completed",
        "timestamp": Utc::now().to_rfc3339(),
        "processed_items": event.items.len(),
    })
    .to_string();

    Ok(WorkerOutput {
        status_code: 200,
        body,
    })
}
