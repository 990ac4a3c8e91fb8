#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;
use rp_pico::hal::timer::ScheduleAlarmError;
use rtic::app;

use tickertape::{InterruptTicker, Max7219Matrix, PeriodicTimer, TickOutcome, TickerConfig};

/// Devices in the MAX7219 chain
const NUM_SEGMENTS: usize = 4;
/// Framebuffer cells: the visible chain plus the scroll-in margin
const FRAME_CELLS: usize = NUM_SEGMENTS + 2;

/// Messages cycled through by the button
const MESSAGES: [&str; 3] = ["Hello World!", "Ticker tape on RP2040", "Press to pause"];

/// Button contact bounce window
const DEBOUNCE_US: u32 = 50_000;

/// ALARM0 as the ticker's periodic timer
///
/// The alarm is one-shot, so each `rearm` schedules the following firing;
/// nothing fires between a callback starting and its `rearm`.
pub struct AlarmTimer<A> {
    alarm: A,
    period_us: u32,
}

impl<A: rp_pico::hal::timer::Alarm> AlarmTimer<A> {
    pub fn new(alarm: A) -> Self {
        Self { alarm, period_us: 0 }
    }

    fn schedule(&mut self) -> Result<(), ScheduleAlarmError> {
        use rp_pico::hal::fugit::ExtU32;

        self.alarm.schedule(self.period_us.micros()).map_err(|err| {
            defmt::warn!("alarm: period {}us cannot be scheduled", self.period_us);
            err
        })
    }
}

/// A refused schedule is handed to the ticker, which goes idle; the next
/// button press starts it again.
impl<A: rp_pico::hal::timer::Alarm> PeriodicTimer for AlarmTimer<A> {
    type Error = ScheduleAlarmError;

    fn arm(&mut self, period_ms: u32) -> Result<(), Self::Error> {
        self.period_us = period_ms.saturating_mul(1_000);
        self.alarm.clear_interrupt();
        self.alarm.enable_interrupt();
        self.schedule()
    }

    fn rearm(&mut self) -> Result<(), Self::Error> {
        self.alarm.clear_interrupt();
        self.schedule()
    }

    fn disarm(&mut self) {
        self.alarm.disable_interrupt();
        self.alarm.clear_interrupt();
    }
}

#[app(device = rp_pico::hal::pac, peripherals = true, dispatchers = [I2C0_IRQ])]
mod app {
    use super::*;
    use embedded_hal::digital::v2::ToggleableOutputPin;
    use rp_pico::hal::{
        clocks::{init_clocks_and_plls, Clock},
        fugit::{ExtU32, RateExtU32},
        gpio::{bank0::Gpio15, FunctionSio, Interrupt, Pin, PullUp, SioInput},
        sio::Sio,
        spi::Spi,
        timer::{Alarm, Alarm0, Alarm1, Timer},
        watchdog::Watchdog,
    };

    type Spi0 = Spi<rp_pico::hal::spi::Enabled, rp_pico::hal::pac::SPI0, (
        Pin<rp_pico::hal::gpio::bank0::Gpio19, rp_pico::hal::gpio::FunctionSpi, rp_pico::hal::gpio::PullDown>,
        Pin<rp_pico::hal::gpio::bank0::Gpio16, rp_pico::hal::gpio::FunctionSpi, rp_pico::hal::gpio::PullDown>,
        Pin<rp_pico::hal::gpio::bank0::Gpio18, rp_pico::hal::gpio::FunctionSpi, rp_pico::hal::gpio::PullDown>
    )>;
    type CsPin = Pin<rp_pico::hal::gpio::bank0::Gpio17, rp_pico::hal::gpio::FunctionSio<rp_pico::hal::gpio::SioOutput>, rp_pico::hal::gpio::PullDown>;
    type Connector = max7219::connectors::SpiConnectorSW<Spi0, CsPin>;
    type LedPin = Pin<rp_pico::hal::gpio::bank0::Gpio25, rp_pico::hal::gpio::FunctionSio<rp_pico::hal::gpio::SioOutput>, rp_pico::hal::gpio::PullDown>;

    #[shared]
    struct Shared {
        ticker: InterruptTicker<AlarmTimer<Alarm0>>,
        button: Pin<Gpio15, FunctionSio<SioInput>, PullUp>,
        debounce: Alarm1,
    }

    #[local]
    struct Local {
        display: Max7219Matrix<Connector, FRAME_CELLS>,
        led: LedPin,
        message: usize,
        presses: u32,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        let mut pac = ctx.device;
        let mut watchdog = Watchdog::new(pac.WATCHDOG);
        let sio = Sio::new(pac.SIO);

        let external_xtal_freq_hz = 12_000_000u32;
        let clocks = init_clocks_and_plls(
            external_xtal_freq_hz,
            pac.XOSC,
            pac.CLOCKS,
            pac.PLL_SYS,
            pac.PLL_USB,
            &mut pac.RESETS,
            &mut watchdog,
        )
        .ok()
        .unwrap();

        let mut timer = Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
        let alarm = timer.alarm_0().unwrap();
        let mut debounce = timer.alarm_1().unwrap();
        debounce.enable_interrupt();

        let pins = rp_pico::Pins::new(
            pac.IO_BANK0,
            pac.PADS_BANK0,
            sio.gpio_bank0,
            &mut pac.RESETS,
        );

        let led = pins.led.into_push_pull_output();
        let button = pins.gpio15.into_pull_up_input();
        button.set_interrupt_enabled(Interrupt::EdgeLow, true);

        let mosi = pins.gpio19.into_function::<rp_pico::hal::gpio::FunctionSpi>();
        let sck = pins.gpio18.into_function::<rp_pico::hal::gpio::FunctionSpi>();
        let miso = pins.gpio16.into_function::<rp_pico::hal::gpio::FunctionSpi>();
        let cs = pins.gpio17.into_push_pull_output();

        let spi = Spi::<_, _, _, 8>::new(pac.SPI0, (mosi, miso, sck));
        let spi = spi.init(
            &mut pac.RESETS,
            clocks.peripheral_clock.freq(),
            2_000_000u32.Hz(),
            &embedded_hal::spi::MODE_0,
        );

        let mut driver = max7219::MAX7219::from_spi_cs(NUM_SEGMENTS, spi, cs).unwrap();
        driver.power_on().unwrap();
        for device in 0..NUM_SEGMENTS {
            driver.set_intensity(device, 0x0).unwrap();
            driver.clear_display(device).unwrap();
        }
        let display = Max7219Matrix::new(driver, NUM_SEGMENTS).unwrap();

        let config = TickerConfig::new(NUM_SEGMENTS).unwrap();
        defmt::info!("init: {}", config);
        let mut ticker = InterruptTicker::new(config, AlarmTimer::new(alarm));
        ticker.set_text(MESSAGES[0]).unwrap();
        ticker.start().unwrap();

        (
            Shared {
                ticker,
                button,
                debounce,
            },
            Local {
                display,
                led,
                message: 0,
                presses: 0,
            },
            init::Monotonics(),
        )
    }

    // Hardware Task: ticker alarm. Re-armed by the ticker after each render.
    #[task(binds = TIMER_IRQ_0, priority = 1, shared = [ticker], local = [display])]
    fn ticker_tick(mut ctx: ticker_tick::Context) {
        let display = ctx.local.display;
        let outcome = ctx.shared.ticker.lock(|ticker| ticker.on_timer(display));
        if outcome == TickOutcome::TimerFault {
            defmt::error!("ticker: alarm lost, press the button to restart");
        }
    }

    // Hardware Task: GPIO Interrupt (Button Press)
    #[task(binds = IO_IRQ_BANK0, priority = 2, shared = [button, debounce])]
    fn button_press(mut ctx: button_press::Context) {
        // Mask the edge until the contacts settle.
        ctx.shared.button.lock(|b| {
            b.set_interrupt_enabled(Interrupt::EdgeLow, false);
            b.clear_interrupt(Interrupt::EdgeLow);
        });

        ctx.shared.debounce.lock(|a| {
            a.clear_interrupt();
            a.schedule(DEBOUNCE_US.micros()).ok();
        });

        toggle_ticker::spawn().ok();
    }

    // Hardware Task: debounce window over (Timer 1)
    #[task(binds = TIMER_IRQ_1, priority = 2, shared = [button, debounce])]
    fn button_settled(mut ctx: button_settled::Context) {
        ctx.shared.debounce.lock(|a| a.clear_interrupt());

        // Drop edges latched while bouncing, then listen again.
        ctx.shared.button.lock(|b| {
            b.clear_interrupt(Interrupt::EdgeLow);
            b.set_interrupt_enabled(Interrupt::EdgeLow, true);
        });
    }

    // Software Task: pause the ticker, or resume it with the next message
    #[task(shared = [ticker], local = [led, message, presses])]
    fn toggle_ticker(mut ctx: toggle_ticker::Context) {
        *ctx.local.presses = ctx.local.presses.wrapping_add(1);
        ctx.local.led.toggle().ok();

        let presses = *ctx.local.presses;
        let message = ctx.local.message;
        ctx.shared.ticker.lock(|ticker| {
            if ticker.is_running() {
                ticker.stop();
                return;
            }

            *message = (*message + 1) % MESSAGES.len();
            let mut buf = [0u8; tickertape::MAX_TEXT_LEN];
            let text = format_no_std::show(
                &mut buf,
                format_args!("{} #{}", MESSAGES[*message], presses),
            )
            .unwrap_or(MESSAGES[*message]);

            if let Err(err) = ticker.set_text(text) {
                defmt::warn!("toggle: {}", err);
            }
            if let Err(err) = ticker.start() {
                defmt::warn!("toggle: {}", err);
            }
        });
    }
}
