//! Hack Simulator - CLI Entry Point
//!
//! Commands:
//! - `hack-sim count` - Run the program counter in increment mode
//! - `hack-sim poke <level>` - Write one RAM word, tick, and read it back
//! - `hack-sim snapshot` - Print program counter state as JSON
//! - `hack-sim test` - Built-in self-test

use clap::{Parser, Subcommand, ValueEnum};
use hack::seq::{MemoryBlock, Way};
use hack::{Clock, PcSignals, ProgramCounter, Ram, Word16};

#[derive(Parser)]
#[command(name = "hack-sim")]
#[command(version = "0.1.0")]
#[command(about = "A clocked model of a 16-bit computer: registers, RAM and program counter")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Count upwards from a starting value
    Count {
        /// Value loaded before counting
        #[arg(short, long, default_value = "0")]
        from: u16,
        /// Number of clock ticks to run
        #[arg(short, long, default_value = "8")]
        ticks: u64,
        /// Print the counter after every tick
        #[arg(long)]
        trace: bool,
    },
    /// Write a word into one RAM level and read it back
    Poke {
        /// Memory level
        #[arg(value_enum)]
        level: RamLevel,
        /// Word address
        #[arg(short, long)]
        address: usize,
        /// Value to store (two's complement)
        #[arg(short = 'w', long, allow_negative_numbers = true)]
        value: i16,
    },
    /// Load a value into the program counter and dump its state
    Snapshot {
        #[arg(short, long, default_value = "0")]
        value: u16,
    },
    /// Run the built-in self-test
    Test,
}

#[derive(Clone, Copy, ValueEnum)]
enum RamLevel {
    #[value(name = "8")]
    Ram8,
    #[value(name = "64")]
    Ram64,
    #[value(name = "512")]
    Ram512,
    #[value(name = "4k")]
    Ram4K,
    #[value(name = "16k")]
    Ram16K,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match cli.command {
        Some(Commands::Count { from, ticks, trace }) => {
            count(from, ticks, trace);
        }
        Some(Commands::Poke { level, address, value }) => {
            let value = Word16::from_i16(value);
            match level {
                RamLevel::Ram8 => poke(hack::Ram8::new(), address, value),
                RamLevel::Ram64 => poke(hack::Ram64::new(), address, value),
                RamLevel::Ram512 => poke(hack::Ram512::new(), address, value),
                RamLevel::Ram4K => poke(hack::Ram4K::new(), address, value),
                RamLevel::Ram16K => poke(hack::Ram16K::new(), address, value),
            }
        }
        Some(Commands::Snapshot { value }) => {
            snapshot(value);
        }
        Some(Commands::Test) => {
            run_self_test();
        }
        None => {
            println!("Hack Simulator v0.1.0");
            println!("Flip-flops, registers, RAM-8 to RAM-16K and a program counter");
            println!();
            println!("Use --help for available commands");
        }
    }
}

fn count(from: u16, ticks: u64, trace: bool) {
    let mut clock = Clock::new();
    let pc = clock.subscribe(ProgramCounter::new());

    let Some(counter) = clock.get_mut(pc) else {
        eprintln!("❌ Program counter not registered");
        std::process::exit(1);
    };
    counter.set_word(Word16::from_u16(from), PcSignals::LOAD);
    clock.tick();

    if let Some(counter) = clock.get_mut(pc) {
        counter.set_word(Word16::zero(), PcSignals::INCREMENT);
    }

    println!("━━━ Counting from {} ━━━", from);
    for _ in 0..ticks {
        clock.tick();
        if trace {
            if let Some(counter) = clock.get(pc) {
                let value = counter.output();
                println!("tick {:>4}: {} ({})", clock.elapsed_ticks(), value, value.to_u16());
            }
        }
    }

    if let Some(counter) = clock.get(pc) {
        println!();
        println!("Ticks: {}", clock.elapsed_ticks());
        println!("PC:    {}", counter.output().to_u16());
    }
}

fn poke<C, W>(ram: Ram<C, W>, address: usize, value: Word16)
where
    C: MemoryBlock + 'static,
    W: Way + 'static,
{
    let size = ram.size();
    let mut clock = Clock::new();
    let handle = clock.subscribe(ram);

    println!("🔧 RAM{}: writing {} to address {}", size, value.to_i16(), address);

    let result = clock
        .get_mut(handle)
        .ok_or(hack::ChipError::UnknownComponent)
        .and_then(|mem| mem.write_word(address, value));
    if let Err(e) = result {
        eprintln!("❌ Write failed: {}", e);
        std::process::exit(1);
    }

    let Some(mem) = clock.get(handle) else {
        std::process::exit(1);
    };
    let before = mem.read_word(address).map(|w| w.to_i16()).unwrap_or_default();
    clock.tick();

    let Some(mem) = clock.get(handle) else {
        std::process::exit(1);
    };
    let neighbour = (address + 1) % size;
    let after = mem.read_word(address).map(|w| w.to_i16()).unwrap_or_default();
    let other = mem.read_word(neighbour).map(|w| w.to_i16()).unwrap_or_default();

    println!("before tick: [{}] = {}", address, before);
    println!("after tick:  [{}] = {}", address, after);
    println!("neighbour:   [{}] = {}", neighbour, other);
}

fn snapshot(value: u16) {
    let mut pc = ProgramCounter::new();
    pc.set_word(Word16::from_u16(value), PcSignals::LOAD);

    let mut clock = Clock::new();
    let handle = clock.subscribe(pc);
    clock.tick();

    let Some(pc) = clock.get(handle) else {
        std::process::exit(1);
    };
    match serde_json::to_string_pretty(pc) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("❌ Failed to serialize: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_self_test() {
    use hack::seq::Sequential;
    use hack::{Dff, Ram16K, Ram8, Register16};

    println!("━━━ Hack Simulator Self-Test ━━━");
    println!();

    let mut passed = 0;
    let mut failed = 0;

    let mut report = |name: &str, ok: bool| {
        print!("{}... ", name);
        if ok { println!("✓"); passed += 1; }
        else { println!("✗"); failed += 1; }
    };

    // Test 1: Edge-only commit
    let mut dff = Dff::new();
    dff.set_input(true);
    let staged = dff.q();
    dff.on_clock(true);
    report("Flip-flop latches on rising edge only", !staged && dff.q());

    // Test 2: No double latch
    dff.set_input(false);
    dff.on_clock(true);
    report("Repeated high level does not latch", dff.q());

    // Test 3: Register atomicity
    let mut clock = Clock::new();
    let reg = clock.subscribe(Register16::new());
    if let Some(r) = clock.get_mut(reg) {
        r.set_word(Word16::from_u16(0xCAFE), true);
    }
    clock.tick();
    report(
        "Register commits the whole word",
        clock.get(reg).map(|r| r.word().to_u16()) == Some(0xCAFE),
    );

    // Test 4: RAM8 mutual exclusion
    let mut ram = Ram8::new();
    let ok = ram.write_word(6, Word16::from_u16(66)).is_ok();
    ram.on_clock(true);
    ram.on_clock(false);
    let others_clear = (0..8).filter(|&i| i != 6).all(|i| ram.read_word(i).map(|w| w.is_zero()).unwrap_or(false));
    report("RAM8 writes only the addressed word", ok && others_clear);

    // Test 5: RAM16K boundary round-trip
    let mut clock = Clock::new();
    let big = clock.subscribe(Ram16K::new());
    let mut ok = true;
    for (addr, value) in [(0usize, 1i16), (16383, -1)] {
        ok &= clock.get_mut(big).map(|m| m.write_word(addr, Word16::from_i16(value)).is_ok()).unwrap_or(false);
        clock.tick();
    }
    let first = clock.get(big).and_then(|m| m.read_word(0).ok()).map(|w| w.to_i16());
    let last = clock.get(big).and_then(|m| m.read_word(16383).ok()).map(|w| w.to_i16());
    report("RAM16K boundary addresses", ok && first == Some(1) && last == Some(-1));

    // Test 6: PC priority
    let mut pc = ProgramCounter::new();
    pc.set_word(Word16::from_u16(9), PcSignals { load: true, increment: true, reset: true });
    pc.on_clock(true);
    let reset_wins = pc.output().is_zero();
    pc.set_word(Word16::from_u16(9), PcSignals { load: true, increment: true, reset: false });
    pc.on_clock(false);
    pc.on_clock(true);
    report("PC priority: reset > load > increment", reset_wins && pc.output().to_u16() == 9);

    // Test 7: PC wraparound
    pc.set_word(Word16::from_u16(u16::MAX), PcSignals::LOAD);
    pc.on_clock(false);
    pc.on_clock(true);
    pc.set_word(Word16::zero(), PcSignals::INCREMENT);
    pc.on_clock(false);
    pc.on_clock(true);
    report("PC wraps from 65535 to 0", pc.output().is_zero());

    println!();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed == 0 {
        println!("✓ All tests passed!");
    } else {
        std::process::exit(1);
    }
}
