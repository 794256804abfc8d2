use clap::Parser;
use clap::ValueEnum;
use perm_set::Error;
use perm_set::IntSet;
use perm_set::registry;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Width {
    #[value(name = "32")]
    Int,
    #[value(name = "64")]
    Long,
}

impl Width {
    fn bits(self) -> u32 {
        match self {
            Width::Int => 32,
            Width::Long => 64,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    /// Probing policy: lp, lcfs, rh or blp
    #[arg(short = 'v', long = "variant", default_value = "lp")]
    variant: String,

    /// Hasher name, see `registry::INT_HASHERS` / `registry::LONG_HASHERS`
    #[arg(short = 'H', long = "hasher", default_value = "murmur3")]
    hasher: String,

    #[arg(short = 'w', long = "width", value_enum, default_value_t = Width::Long)]
    width: Width,

    #[arg(short = 'n', long = "max_entries", default_value_t = 100_000)]
    max_entries: usize,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.9)]
    load_factor: f64,

    /// Insert sequential keys instead of random ones
    #[arg(long = "sequential")]
    sequential: bool,

    #[arg(long = "seed", default_value_t = 0x5eed)]
    seed: u64,
}

fn fill<W: perm_set::Word>(set: &mut dyn IntSet<W>, keys: impl Iterator<Item = W>) -> (usize, usize) {
    let mut duplicates = 0;
    let mut refused = 0;
    for key in keys {
        match set.add(key) {
            Ok(true) => {}
            Ok(false) => duplicates += 1,
            Err(Error::TableFull { .. }) => refused += 1,
            Err(Error::InvalidKey) => {}
        }
    }
    (duplicates, refused)
}

fn report<W: perm_set::Word>(set: &dyn IntSet<W>, duplicates: usize, refused: usize) {
    println!("Inserted {} keys", set.len());
    println!(
        "Final load factor: {:.2}%",
        (set.len() as f64 / set.capacity() as f64) * 100.0
    );
    set.print_probe_histogram();
    set.debug_stats().print();
    println!("Duplicate keys skipped: {duplicates}");
    println!("Inserts refused as full: {refused}");
}

fn main() {
    let args = Args::parse();
    let mut rng = SmallRng::seed_from_u64(args.seed);

    println!(
        "Creating {}-bit '{}' set with hasher '{}', max_entries {}, load factor {}",
        args.width.bits(),
        args.variant, args.hasher, args.max_entries, args.load_factor
    );

    match args.width {
        Width::Int => {
            let Some(mut set) =
                registry::int_set(&args.variant, &args.hasher, args.max_entries, args.load_factor)
            else {
                eprintln!(
                    "unknown variant or hasher; variants {:?}, hashers {:?}",
                    registry::SET_VARIANTS,
                    registry::INT_HASHERS
                );
                std::process::exit(2);
            };
            println!("Actual capacity: {}", set.capacity());

            let count = args.max_entries.min(u32::MAX as usize);
            let (duplicates, refused) = if args.sequential {
                fill(set.as_mut(), 1..=count as u32)
            } else {
                fill(set.as_mut(), (0..count).map(|_| rng.random_range(1..=u32::MAX)))
            };
            report(set.as_ref(), duplicates, refused);
        }
        Width::Long => {
            let Some(mut set) =
                registry::long_set(&args.variant, &args.hasher, args.max_entries, args.load_factor)
            else {
                eprintln!(
                    "unknown variant or hasher; variants {:?}, hashers {:?}",
                    registry::SET_VARIANTS,
                    registry::LONG_HASHERS
                );
                std::process::exit(2);
            };
            println!("Actual capacity: {}", set.capacity());

            let (duplicates, refused) = if args.sequential {
                fill(set.as_mut(), 1..=args.max_entries as u64)
            } else {
                fill(
                    set.as_mut(),
                    (0..args.max_entries).map(|_| rng.random_range(1..=u64::MAX)),
                )
            };
            report(set.as_ref(), duplicates, refused);
        }
    }
}
