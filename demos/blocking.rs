//! Blocking ticker: the main loop owns the core and sleeps between ticks.
//!
//! Same wiring as the RTIC firmware. The text switches to an uptime message
//! after every completed pass, showing that replacements wait for a pass
//! boundary.

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

use rp_pico::entry;
use rp_pico::hal::{
    clocks::{init_clocks_and_plls, Clock},
    fugit::RateExtU32,
    pac,
    sio::Sio,
    spi::Spi,
    watchdog::Watchdog,
};

use tickertape::{BlockingTicker, Max7219Matrix, TickerConfig};

const NUM_SEGMENTS: usize = 4;
const FRAME_CELLS: usize = NUM_SEGMENTS + 2;

#[entry]
fn main() -> ! {
    let mut pac = pac::Peripherals::take().unwrap();
    let core = pac::CorePeripherals::take().unwrap();
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

    let mut delay = cortex_m::delay::Delay::new(core.SYST, clocks.system_clock.freq().to_Hz());

    let pins = rp_pico::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

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
    let mut display: Max7219Matrix<_, FRAME_CELLS> =
        Max7219Matrix::new(driver, NUM_SEGMENTS).unwrap();

    let config = TickerConfig::new(NUM_SEGMENTS).unwrap();
    defmt::info!("blocking: {}", config);
    let mut ticker = BlockingTicker::new(config);

    let mut passes = 0;
    loop {
        // A bus error here is unrecoverable; panic-probe reports it.
        ticker.step(&mut display, &mut delay).unwrap();

        if ticker.state().passes() != passes {
            passes = ticker.state().passes();
            let mut buf = [0u8; tickertape::MAX_TEXT_LEN];
            if let Ok(text) = format_no_std::show(&mut buf, format_args!("Pass {} done", passes)) {
                ticker.set_text(text).unwrap();
            }
        }
    }
}
