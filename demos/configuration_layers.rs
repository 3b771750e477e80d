//! Example demonstrating layered configuration.
//!
//! Configuration is merged with clear precedence:
//! defaults → environment (+ its JSON chain) → command line (+ its JSON chain).
//!
//! Run with:
//! OC_SERVICE_NAME=env-service cargo run --example configuration_layers -- \
//!     --oc-trace-exporter zipkin://localhost --oc-stats-exporter prometheus://:8888

use occonfig::clap::Command;
use occonfig::sources::flags::register_flags;
use occonfig::{
    BoxError, Config, ConfigError, Exporter, ExporterSink, Finalizer, Mode, OcConfigBuilder,
};

/// Prints what a real sink would install.
struct PrintSink;

impl ExporterSink for PrintSink {
    fn install(
        &mut self,
        mode: Mode,
        exporter: &Exporter,
        config: &Config,
    ) -> Result<Option<Finalizer>, BoxError> {
        println!(
            "Installing {mode} exporter {} at {} for {}",
            exporter.kind,
            exporter.host,
            config.service_name.as_deref().unwrap_or("<unnamed>")
        );
        let kind = exporter.kind;
        let finalizer: Finalizer = Box::new(move || {
            println!("Flushing {kind} exporter");
            Ok(())
        });
        Ok(Some(finalizer))
    }
}

fn main() -> Result<(), ConfigError> {
    let matches = register_flags(
        Command::new("configuration_layers").about("Layered instrumentation configuration"),
        Mode::Trace | Mode::Stats,
    )
    .get_matches();

    let builder = OcConfigBuilder::new().with_command_line(&matches);

    // Inspect the effective configuration before installing anything.
    let config = builder.resolve()?;
    println!("Service name: {:?}", config.service_name);
    println!("Trace exporter: {:?}", config.trace_exporter);
    println!("Trace sampler: {:?}", config.trace_sampler);
    println!("Stats exporter: {:?}", config.stats_exporter);

    let guard = builder.init(Mode::Trace | Mode::Stats, &mut PrintSink)?;
    println!("Sampler: {:?}", guard.sampler());

    guard.close()
}
