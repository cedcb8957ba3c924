// Basic connection example
//
// Opens a serial port, checks that a LeCroy scope answers and prints its identity.

use clap::Parser;
use lecroy_rs::LecroyConnector;

#[derive(Parser)]
struct Args {
    /// Serial port the scope is attached to
    #[arg(default_value = "/dev/ttyUSB0")]
    port: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (optional)
    env_logger::init();
    let args = Args::parse();

    println!("LeCroy Connection Example");
    println!("=========================\n");

    println!("1. Connecting to {}...", args.port);
    let mut scope = LecroyConnector::connect(&args.port)?;
    println!("Successfully connected!");

    println!("\n2. Device information:");
    println!("{}", scope.identify()?);

    println!("\n3. Current analog setup:");
    for (index, channel) in scope.get_analog_channel_setup()? {
        println!(
            "  C{}: {:<12} {} V/div, offset {} V, {} {}",
            index,
            channel.label,
            channel.ver_scale,
            channel.ver_offset,
            channel.bandwidth,
            channel.coupling
        );
    }

    Ok(())
}
