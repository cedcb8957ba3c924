// A complete bench session
//
// Resets the scope, sets up eight analog and four digital channels, a timebase, a set of
// measurements and a trigger, centers one signal, saves a screenshot and reads back
// overshoot figures.

use clap::Parser;
use lecroy_rs::{
    AnalogChannel, BackColor, ChannelMap, DigitalChannel, GridMode, Lecroy, LecroyConnector,
    MeasurementSlot, SerialTransport, Statistic, TriggerMode, TriggerSetup,
};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
struct Args {
    /// Serial port the scope is attached to
    #[arg(default_value = "/dev/ttyUSB0")]
    port: String,

    /// Screenshot file name (".png" is appended when missing)
    #[arg(long, default_value = "super_awesome_waveform_12")]
    screenshot: PathBuf,
}

fn value(scope: &mut Lecroy<SerialTransport>, slot: u8) -> Result<f64, Box<dyn std::error::Error>> {
    scope
        .get_value(slot, Statistic::Value)?
        .as_f64()
        .ok_or_else(|| format!("P{slot} has no data").into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    // label, ver_scale, ver_offset, bandwidth, coupling
    let analog = ChannelMap::from([
        (1, AnalogChannel::new("COOL_V1", 0.2, -10.0, "20MHz", "DC1M")),
        (2, AnalogChannel::new("NASTY_V2", 0.5, -4.9, "20MHz", "DC1M")),
        (3, AnalogChannel::new("FAVORITE_V3", 2.0, -10.0, "20MHz", "DC1M")),
        (4, AnalogChannel::new("OLD_V4", 2.0, -8.0, "20MHz", "DC1M")),
        (5, AnalogChannel::new("LITTLE_I1", 2.0, 3.0, "20MHz", "DC")),
        (6, AnalogChannel::new("BIGGER_I2", 2.0, 1.0, "20MHz", "DC")),
        (7, AnalogChannel::new("IMPORTANT_I3", 2.0, -0.5, "20MHz", "DC")),
        (8, AnalogChannel::new("ARB_I4", 0.5, -1.5, "20MHz", "DC")),
    ]);

    let digital = ChannelMap::from([
        (0, DigitalChannel::new("cool_name_1")),
        (1, DigitalChannel::new("even_better_name_2")),
        (2, DigitalChannel::new("the_best_name_3")),
        (3, DigitalChannel::new("worst_name_4")),
    ]);

    let measurements = ChannelMap::from([
        (1, MeasurementSlot::new("C1", "max")),
        (2, MeasurementSlot::new("C1", "level@x")),
        (3, MeasurementSlot::new("C2", "max")),
        (4, MeasurementSlot::new("C2", "level@x")),
        (5, MeasurementSlot::new("C3", "max")),
        (6, MeasurementSlot::new("C3", "level@x")),
        (7, MeasurementSlot::new("C5", "max")),
        (8, MeasurementSlot::new("C6", "max")),
        (9, MeasurementSlot::new("C7", "max")),
        (10, MeasurementSlot::new("C8", "max")),
        (11, MeasurementSlot::new("C8", "level@x")),
        (12, MeasurementSlot::new("C8", "level@x")),
    ]);

    let mut scope = LecroyConnector::connect(&args.port)?;

    scope.reset()?;
    thread::sleep(Duration::from_secs(2));
    scope.set_date_and_time(None, None, None, None, None, None)?;
    scope.set_grid(GridMode::Single)?;
    scope.channel_setup(&analog, &digital, &ChannelMap::new())?;
    println!("analog: {:#?}", scope.get_analog_channel_setup()?);
    println!("digital: {:#?}", scope.get_digital_channel_setup()?);

    let hor_scale = 0.2 * Lecroy::<SerialTransport>::UNIT_MS;
    scope.horizontal_scale(hor_scale)?;

    scope.measurement_setup(&measurements)?;
    scope.measurement_level_at_x(11, -1.0e-6)?; // before trigger
    scope.measurement_level_at_x(12, 1.599_992e-3)?; // last captured value
    println!("measurements: {:#?}", scope.get_measurement_setup()?);

    let trigger = TriggerSetup::edge("C4", 0.25).at(hor_scale * -3.0);
    scope.trigger_setup(&trigger)?;
    thread::sleep(Duration::from_secs(2));

    // put LITTLE_I1 on the center division; borrows P12, which is restored afterwards
    let offset = scope.update_signal_offset(
        &analog,
        "LITTLE_I1",
        0.0,
        Lecroy::<SerialTransport>::DEFAULT_OFFSET_MEASUREMENT,
    )?;
    println!("LITTLE_I1 offset: {offset:.3} V");

    scope.trigger_setup(&trigger.mode(TriggerMode::Single))?;
    let bytes = scope.get_screen_image(Some(&args.screenshot), BackColor::White)?;
    println!("screenshot: {bytes} bytes");

    let overshoot_c1 = value(&mut scope, 1)? - value(&mut scope, 2)?;
    let before_trigger_c8 = value(&mut scope, 11)?;
    let delta_c8 = value(&mut scope, 12)? - before_trigger_c8;
    let overshoot_c8 = value(&mut scope, 10)? - before_trigger_c8;

    println!("C1 overshoot: {overshoot_c1:.3}");
    println!("C8 delta:     {delta_c8:.2}");
    println!("C8 overshoot: {overshoot_c8:.2}");

    Ok(())
}
