//! IPAC Ultimate-IO LED control CLI.

use std::process;

use clap::{
    crate_description, crate_name, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ipacio::{DeviceConfig, DeviceSession, Error, MatchPolicy, Port, Rgb};

/// Colors used to identify the available LED groups.
const TESTCOLORS: [Rgb; 6] = [
    Rgb { r: 0xff, g: 0x00, b: 0x00 },
    Rgb { r: 0x00, g: 0xff, b: 0x00 },
    Rgb { r: 0x00, g: 0x00, b: 0xff },
    Rgb { r: 0xff, g: 0x00, b: 0xff },
    Rgb { r: 0xff, g: 0xff, b: 0x00 },
    Rgb { r: 0xff, g: 0xff, b: 0xff },
];

fn main() {
    let matches = cli();

    init_logging(matches.get_flag("verbose"));

    match run(&matches) {
        Ok(()) => println!("\x1b[32mSuccessfully applied changes.\x1b[0m"),
        Err(err) => {
            eprintln!("\x1b[31mError:\x1b[0m {err}");
            process::exit(1);
        },
    }
}

/// Install the log subscriber, `RUST_LOG` takes precedence over the verbosity flag.
fn init_logging(verbose: bool) {
    let directive = if verbose { "ipacio=debug" } else { "ipacio=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

/// Apply the requested LED change.
fn run(matches: &ArgMatches) -> Result<(), Error> {
    let config = device_config(matches);

    let mut session = DeviceSession::with_hidapi(config)?;
    session.init()?;

    match matches.subcommand() {
        Some(("color", args)) => {
            let group = required::<u8>(args, "group");
            let color = required::<Rgb>(args, "color");
            session.set_led_color(group, color)?;
        },
        Some(("intensity", args)) => {
            let port = required::<Port>(args, "port");
            let intensity = required::<u8>(args, "intensity");
            session.set_led_intensity(port, intensity)?;
        },
        Some(("fade", args)) => {
            let fade_time = required::<i32>(args, "time");
            session.set_led_fade_time(fade_time)?;
        },
        Some(("grouptest", args)) => grouptest(&mut session, required::<u8>(args, "groups"))?,
        _ => unreachable!("subcommand is required"),
    }

    session.close()
}

/// Mark every LED group in a unique color.
fn grouptest(session: &mut DeviceSession, groups: u8) -> Result<(), Error> {
    println!("Testing {} RGB groups...\n", groups);

    for group in 0..groups {
        let color = TESTCOLORS[group as usize % TESTCOLORS.len()];

        println!("Color for group {}: {}", group, color);

        session.set_led_color(group, color)?;
    }

    Ok(())
}

/// Device discovery parameters from the CLI.
fn device_config(matches: &ArgMatches) -> DeviceConfig {
    let mut config = DeviceConfig::default();

    replace_from_arg(&mut config.vendor_id, matches, "vendor-id");
    replace_from_arg(&mut config.product_id, matches, "product-id");
    replace_from_arg(&mut config.interface, matches, "interface");

    if matches.get_flag("strict") {
        config.policy = MatchPolicy::ExactlyOne;
    }

    info!(
        vendor_id = %format!("{:04x}", config.vendor_id),
        product_id = %format!("{:04x}", config.product_id),
        interface = config.interface,
        "Using device"
    );

    config
}

/// Get clap CLI parameters.
fn cli() -> ArgMatches {
    Command::new(crate_name!())
        .version(crate_version!())
        .about(crate_description!())
        .subcommand_required(true)
        .arg(
            Arg::new("vendor-id")
                .help("USB vendor ID [default: 0xd209]")
                .long("vendor-id")
                .global(true)
                .value_parser(parse_usb_id),
        )
        .arg(
            Arg::new("product-id")
                .help("USB product ID [default: 0x0412]")
                .long("product-id")
                .global(true)
                .value_parser(parse_usb_id),
        )
        .arg(
            Arg::new("interface")
                .help("HID interface receiving LED reports [default: 2]")
                .long("interface")
                .global(true)
                .value_parser(value_parser!(i32)),
        )
        .arg(
            Arg::new("strict")
                .help("Fail unless exactly one device exposes the LED interface")
                .long("strict")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .help("Log every HID report")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("color")
                .about("Set the color of an RGB LED group")
                .arg(
                    Arg::new("group")
                        .help("LED group, covering ports 3 * group to 3 * group + 2")
                        .required(true)
                        .value_parser(value_parser!(u8)),
                )
                .arg(
                    Arg::new("color")
                        .help("LED color in RGB [0xRRGGBB]")
                        .required(true)
                        .value_parser(parse_color),
                ),
        )
        .subcommand(
            Command::new("intensity")
                .about("Set the brightness of a single LED port")
                .arg(
                    Arg::new("port")
                        .help("LED port [possible values: 0..=127, all]")
                        .required(true)
                        .value_parser(parse_port),
                )
                .arg(
                    Arg::new("intensity")
                        .help("LED brightness [possible values: 0..=255]")
                        .required(true)
                        .value_parser(value_parser!(u8)),
                ),
        )
        .subcommand(
            Command::new("fade").about("Set the global LED fade time").arg(
                Arg::new("time")
                    .help("Fade time, only the lowest byte is used")
                    .required(true)
                    .value_parser(value_parser!(i32)),
            ),
        )
        .subcommand(
            Command::new("grouptest").about("Test available RGB groups").arg(
                Arg::new("groups")
                    .help("Number of groups to light up")
                    .long("groups")
                    .default_value("32")
                    .value_parser(value_parser!(u8)),
            ),
        )
        .get_matches()
}

/// Read an argument which is required or has a default value.
#[inline]
fn required<T>(matches: &ArgMatches, name: &str) -> T
where
    T: Clone + Send + Sync + 'static,
{
    matches.get_one::<T>(name).cloned().expect("argument has a default or is required")
}

/// Replace config value with the CLI parameter if it is present.
#[inline]
fn replace_from_arg<T>(option: &mut T, matches: &ArgMatches, name: &str)
where
    T: Clone + Send + Sync + 'static,
{
    if let Some(value) = matches.get_one::<T>(name) {
        *option = value.clone();
    }
}

/// Parse a hexadecimal USB ID, the `0x` prefix is optional.
fn parse_usb_id(s: &str) -> Result<u16, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|err| format!("invalid USB ID '{}': {}", s, err))
}

fn parse_color(s: &str) -> Result<Rgb, String> {
    s.parse().map_err(|_| format!("color '{}' does not match format 0xRRGGBB", s))
}

fn parse_port(s: &str) -> Result<Port, String> {
    s.parse().map_err(|err| format!("invalid port '{}': {}", s, err))
}
