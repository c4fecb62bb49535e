//! Runtime configuration of the `engagement-gateway` binary.
//!
//! Every option can be given as a flag or through the environment.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use clap::Parser;

use crate::{
    client::{Client, DEFAULT_COMMENTS_URL, DEFAULT_REACTIONS_URL},
    error::ClientBuilderError,
};

/// Gateway that merges the comment count and reaction summary of a post.
#[derive(Debug, Clone, Parser)]
#[command(name = "engagement-gateway", version, about)]
pub struct Config {
    /// Address to listen on.
    #[arg(long, env = "LISTEN_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 3001)]
    pub port: u16,

    /// Base URL of the Comments service.
    #[arg(long, env = "COMMENTS_URL", default_value = DEFAULT_COMMENTS_URL)]
    pub comments_url: String,

    /// Base URL of the Reactions service.
    #[arg(long, env = "REACTIONS_URL", default_value = DEFAULT_REACTIONS_URL)]
    pub reactions_url: String,

    /// Timeout for each upstream call, in milliseconds. No timeout when unset.
    #[arg(long, env = "UPSTREAM_TIMEOUT_MS")]
    pub upstream_timeout_ms: Option<u64>,

    /// Extra attempts for an upstream call after a transport error or a `429`.
    #[arg(long, env = "UPSTREAM_RETRIES", default_value_t = 0)]
    pub upstream_retries: u8,
}

impl Config {
    /// Socket address the gateway binds to.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Builds the upstream [`Client`] described by this configuration.
    pub fn client(&self) -> Result<Client, ClientBuilderError> {
        let mut builder = Client::builder()
            .comments_url(&self.comments_url)
            .reactions_url(&self.reactions_url)
            .retries(self.upstream_retries);

        if let Some(timeout) = self.upstream_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout));
        }

        builder.build()
    }
}
