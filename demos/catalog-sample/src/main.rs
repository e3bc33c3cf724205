//! Sample application listing the callable methods of `UserOps`.

mod user_ops;

use std::any::Any;

use anyhow::{Context, Result};
use callable_catalog::{CallTarget, Descriptor, scan};
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::user_ops::UserOps;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(about = "Lists the callable methods discovered on the sample operations")]
struct Args {
    /// Output format for the catalog.
    #[arg(long, value_enum, default_value = "text")]
    format: Format,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Call each discovered method once with a sample user id.
    #[arg(long)]
    invoke: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&args.log_level))
        .context("invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let methods = scan::<UserOps>().context("scanning UserOps")?;

    match args.format {
        Format::Text => {
            println!("Found {} callable methods:", methods.len());
            for method in &methods {
                println!(
                    "- {}({}) [ReadOnly={}]: {}",
                    method.method_name(),
                    format_parameters(method),
                    method.read_only(),
                    method.description()
                );
            }
        }
        Format::Json => {
            println!("{}", serde_json::to_string_pretty(&methods)?);
        }
    }

    if args.invoke {
        invoke_all(&methods)?;
    }

    Ok(())
}

fn format_parameters(method: &Descriptor) -> String {
    method
        .parameters()
        .iter()
        .map(|parameter| format!("{} {}", parameter.ty().short_name(), parameter.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn invoke_all(methods: &[Descriptor]) -> Result<()> {
    let mut ops = UserOps::default();

    for method in methods {
        let user_id: Box<dyn Any> = Box::new(42_i32);
        let output = method
            .handle()
            .invoke(CallTarget::Exclusive(&mut ops), vec![user_id])
            .with_context(|| format!("invoking {}", method.method_name()))?;

        match output.downcast::<String>() {
            Ok(text) => info!(method = method.method_name(), %text, "invoked"),
            Err(_) => info!(method = method.method_name(), "invoked"),
        }
    }

    ops.non_callable_method();
    Ok(())
}
