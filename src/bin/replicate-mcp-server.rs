// ABOUTME: Server binary: CLI parsing, startup checks, and transport lifecycle
// ABOUTME: Exits 0 on clean shutdown or --list; fails fast on a missing credential
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Replicate MCP Server Binary
//!
//! Starts the stdio MCP transport over the Replicate API with the exposure
//! mode, wait policy, and tool filters selected on the command line.

use anyhow::Result;
use clap::Parser;
use replicate_mcp_server::{
    config::environment::{ServerConfig, ENV_API_TOKEN},
    logging,
    mcp::{ServerResources, StdioTransport},
    tools::{ClientProfile, ExposureMode, RegistryOptions, ToolFilter, ToolRegistry, WaitPolicy},
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "replicate-mcp-server")]
#[command(about = "MCP server exposing the Replicate prediction API as tools")]
#[command(version)]
struct Args {
    /// Tool exposure mode
    #[arg(long, value_enum, default_value_t = ExposureMode::Static)]
    tools: ExposureMode,

    /// Poll job-creating calls to completion before returning (default)
    #[arg(long, conflicts_with = "no_wait")]
    wait: bool,

    /// Return created jobs immediately; the caller polls via the get tools
    #[arg(long)]
    no_wait: bool,

    /// Client profile, selecting a cosmetic tool-name length cap
    #[arg(long, value_enum, default_value_t = ClientProfile::Generic)]
    client: ClientProfile,

    /// Register only static tools for these resources (repeatable)
    #[arg(long)]
    resource: Vec<String>,

    /// Register only static tools for these operations (repeatable)
    #[arg(long)]
    operation: Vec<String>,

    /// Register only these static tool names (repeatable)
    #[arg(long)]
    tool: Vec<String>,

    /// Print the registered tools and exit
    #[arg(long)]
    list: bool,
}

impl Args {
    fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            mode: self.tools,
            wait_policy: match (self.wait, self.no_wait) {
                (_, true) => WaitPolicy::NoWait,
                _ => WaitPolicy::Wait,
            },
            profile: self.client,
            filter: ToolFilter {
                resources: self.resource.clone(),
                operations: self.operation.clone(),
                names: self.tool.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let config = ServerConfig::from_env()?;
    let options = args.registry_options();

    if args.list {
        let registry = ToolRegistry::new(&config, options)?;
        for descriptor in registry.descriptors() {
            println!("{}  {}", descriptor.name, descriptor.description);
        }
        return Ok(());
    }

    // Static tools all call the API, so a missing credential is fatal up
    // front. Dynamic-only servers start without one and report it inline.
    if matches!(args.tools, ExposureMode::Static | ExposureMode::Both)
        && config.api.token.is_none()
    {
        anyhow::bail!("{ENV_API_TOKEN} must be set");
    }

    info!("Starting Replicate MCP server");
    info!("{}", config.summary());

    let registry = ToolRegistry::new(&config, options)?;
    let resources = Arc::new(ServerResources::new(config, registry));

    StdioTransport::new(resources).run().await?;

    info!("shutdown complete");
    Ok(())
}
