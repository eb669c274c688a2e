// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

pub mod cloud;
pub mod config;
pub mod deploy;
pub mod entrypoint;
pub mod errors;
pub mod grafana;
pub mod inventory;
pub mod load;
pub mod menu;
pub mod runner;
pub mod scenario;
pub mod smoke;
pub mod state;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;

pub const APP_NAME: &str = "monitoring-harness";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const SUCCESS_CODE: i32 = 0;
pub const FAILURE_CODE: i32 = 1;
