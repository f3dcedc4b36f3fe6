mod config;

use crate::config::Config;
use devkit_gpio::buttons::{ButtonHandler, ButtonRecord, Buttons, GpioPinReader};
use devkit_gpio::clock::MonotonicClock;
use devkit_gpio::gpiod::GpiodDriver;
use devkit_gpio::rotenc::{IncrementDirection, RotEnc};
use devkit_gpio::{GpioActiveLevel, GpioBias, GpioDriver, GpioResult};
use dotenv::dotenv;
use log::{debug, info, warn};
use std::thread::sleep;
use std::time::Duration;
use sysinfo::System;

const MAX_BUTTONS: usize = 8;

/// Logs button events, naming buttons by their GPIO line.
struct LogHandler {
    lines: Vec<usize>,
}

impl LogHandler {
    fn line<P>(&self, button: &ButtonRecord<P>) -> usize {
        self.lines[button.handle().index()]
    }
}

impl<P> ButtonHandler<P> for LogHandler {
    fn on_press(&mut self, button: &ButtonRecord<P>) {
        info!("Button on line {} pressed", self.line(button));
    }

    fn on_longpress(&mut self, button: &ButtonRecord<P>) {
        info!("Button on line {} long-pressed", self.line(button));
    }

    fn on_release(&mut self, button: &ButtonRecord<P>) {
        info!("Button on line {} released", self.line(button));
    }
}

fn bias_for(active_low: bool) -> (GpioActiveLevel, GpioBias) {
    if active_low {
        (GpioActiveLevel::Low, GpioBias::PullUp)
    } else {
        (GpioActiveLevel::High, GpioBias::PullDown)
    }
}

fn main() -> eyre::Result<()> {
    dotenv().ok();
    pretty_env_logger::init();

    const UNKNOWN_STR: &str = "???";

    info!(
        "Hello, {}!",
        System::host_name().as_deref().unwrap_or(UNKNOWN_STR)
    );
    info!(
        "Kernel ver {}, architecture {}",
        System::kernel_version().as_deref().unwrap_or(UNKNOWN_STR),
        System::cpu_arch(),
    );

    let config = if let Some(config) = Config::try_load() {
        info!("Config loaded.");
        config
    } else {
        info!("Config not found. Using default");
        let config = Config::default();
        config.save()?;
        info!("Default config saved.");
        config
    };
    debug!("{:?}", config);

    let gpio = GpiodDriver::open(&config.chip)?;
    debug!("{:?} initialized.", gpio);

    let inputs = config
        .buttons
        .iter()
        .map(|entry| {
            let (level, bias) = bias_for(entry.active_low);
            gpio.get_input(entry.line, level, bias)
        })
        .collect::<GpioResult<Vec<_>>>()?;

    let mut buttons = Buttons::<_, MAX_BUTTONS>::new(GpioPinReader::new())
        .with_timing(config.timing.into());
    let mut handler = LogHandler { lines: Vec::new() };

    for (input, entry) in inputs.iter().zip(&config.buttons) {
        match buttons.register(&**input, entry.mode.into()) {
            Ok(handle) => {
                info!("Button #{} on line {} ({:?})", handle.index(), entry.line, entry.mode);
                handler.lines.push(entry.line);
            }
            Err(e) => warn!("Skipping button on line {}: {}", entry.line, e),
        }
    }
    debug!("{:?} initialized.", buttons);

    let encoder_inputs = config
        .encoder
        .map(|entry| -> GpioResult<_> {
            let a = gpio.get_input(entry.line_a, GpioActiveLevel::High, GpioBias::PullUp)?;
            let b = gpio.get_input(entry.line_b, GpioActiveLevel::High, GpioBias::PullUp)?;
            Ok((a, b, entry.counter_clockwise))
        })
        .transpose()?;
    let mut encoder = encoder_inputs.as_ref().map(|(a, b, counter_clockwise)| {
        let direction = if *counter_clockwise {
            IncrementDirection::CounterClockwise
        } else {
            IncrementDirection::Clockwise
        };
        RotEnc::new(&**a, &**b).with_direction(direction)
    });
    if let Some(encoder) = &encoder {
        debug!("{:?} initialized.", encoder);
    }

    let clock = MonotonicClock::new();
    let interval = Duration::from_millis(config.poll_interval_ms);
    let reset_button = buttons.buttons().next().map(|button| button.handle());

    info!("Starting main loop...");

    loop {
        buttons.poll(&clock, &mut handler);

        if let Some(encoder) = encoder.as_mut() {
            if encoder.update()?.is_some() {
                // Turning while holding the first button zeroes the counter.
                if reset_button.is_some_and(|handle| buttons.is_still_pressed(handle)) {
                    encoder.reset_count();
                }
                let diff = encoder.count();
                info!("Encoder {:+} (total {})", diff, encoder.abs_count());
            }
        }

        sleep(interval);
    }
}
