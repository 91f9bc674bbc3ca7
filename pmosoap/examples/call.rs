//! Calls one operation of a SOAP service and prints the raw response body.
//!
//! ```text
//! cargo run -p pmosoap --example call -- <wsdl-url> <method> [name=value ...]
//! ```

use std::env;

use anyhow::{Context, Result, bail};
use pmosoap::{Client, Params, SoapConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pmosoap=debug")),
        )
        .init();

    let mut args = env::args().skip(1);
    let (Some(wsdl), Some(method)) = (args.next(), args.next()) else {
        bail!("usage: call <wsdl-url> <method> [name=value ...]");
    };

    let params: Params = args
        .map(|arg| {
            arg.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("expected name=value, got {arg}"))
        })
        .collect::<Result<Vec<_>>>()?
        .into_iter()
        .collect();

    let config = SoapConfig::load(None)?;
    let mut client = Client::builder(&wsdl)
        .config(config)
        .build()
        .context("Failed to create SOAP client")?;

    let response = client
        .call(&method, params)
        .with_context(|| format!("SOAP call {method} failed"))?;

    if let Some(fault) = response.fault() {
        println!("Fault [{}]: {}", fault.code, fault.description);
    } else {
        println!("{}", String::from_utf8_lossy(response.body()));
    }
    Ok(())
}
