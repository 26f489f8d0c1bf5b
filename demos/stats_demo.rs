use clap::Parser;
use clap::ValueEnum;
use long_map::Config;
use long_map::LongMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KeyPattern {
    /// 0, 1, 2, ...
    Sequential,
    /// Uniformly random i64 keys
    Random,
    /// Multiples of the initial capacity, all landing in bucket 0 at first
    Strided,
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 10_000)]
    entries: usize,

    #[arg(short = 'c', long = "initial_capacity", default_value_t = 16)]
    initial_capacity: i64,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.75)]
    load_factor: f32,

    #[arg(short = 'p', long = "pattern", value_enum, default_value_t = KeyPattern::Sequential)]
    pattern: KeyPattern,
}

fn main() {
    let args = Args::parse();

    let config = Config::default()
        .with_initial_capacity(args.initial_capacity)
        .with_load_factor(args.load_factor);
    let mut map: LongMap<u64> = match LongMap::with_config(config) {
        Ok(map) => map,
        Err(err) => {
            eprintln!("invalid configuration: {err}");
            std::process::exit(2);
        }
    };

    println!(
        "Created LongMap with {} buckets, threshold {}",
        map.capacity(),
        map.threshold()
    );
    println!("Filling map with {} {:?} keys...", args.entries, args.pattern);

    let stride = map.capacity() as i64;
    let mut rng = SmallRng::from_os_rng();
    let mut growths = 0;
    for i in 0..args.entries {
        let key = match args.pattern {
            KeyPattern::Sequential => i as i64,
            KeyPattern::Random => rng.random(),
            KeyPattern::Strided => i as i64 * stride,
        };

        let capacity = map.capacity();
        map.insert(key, i as u64);
        if map.capacity() != capacity {
            growths += 1;
        }
    }

    let missing = map.keys().filter(|&key| map.get(key).is_none()).count();

    println!("Inserted {} entries ({} growths)", map.len(), growths);
    println!("Unreachable entries: {missing}");

    map.print_chain_histogram();
    map.debug_stats().print();
}
