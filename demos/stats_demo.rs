use clap::Parser;
use double_hash::DEFAULT_SEED;
use double_hash::HashTable;
use double_hash::ProbeHasher;
use double_hash::TableConfig;
use double_hash::Xxh64State;
use double_hash::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Percentage of entries removed after filling, to show tombstones.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 10)]
    remove_percent: usize,

    #[arg(short = 's', long = "seed", default_value_t = DEFAULT_SEED)]
    seed: u64,

    #[arg(long = "max_load_factor", default_value_t = 0.7)]
    max_load_factor: f64,
}

fn main() {
    let args = Args::parse();

    let config = TableConfig::new()
        .with_seed(args.seed)
        .with_max_load_factor(args.max_load_factor);
    let hash = |value: &u64| Xxh64State.hash_pair(value, args.seed);

    println!(
        "Creating HashTable with target capacity: {}",
        args.target_capacity
    );

    let mut table: HashTable<u64, u64> = match HashTable::try_with_config(config) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    table.reserve(args.target_capacity, hash);

    println!(
        "Capacity: {} entries in {} slots",
        table.capacity(),
        table.slot_count()
    );
    println!("Filling table with u64 keys...");

    let num_values = table.capacity() as u64;
    for value in 0..num_values {
        match table.entry(hash(&value), |&v| v == value, hash) {
            Entry::Vacant(entry) => {
                entry.insert(value, value * value);
            }
            Entry::Occupied(_) => {
                panic!("Key already exists in table: {}", value);
            }
        }
    }

    println!("Inserted {} keys into table", table.len());
    println!("Final load factor: {:.2}%", table.load_factor() * 100.0);
    table.print_probe_histogram();
    table.debug_stats().print();

    let to_remove = num_values * args.remove_percent as u64 / 100;
    for value in 0..to_remove {
        table.remove(hash(&value), |&v| v == value, hash);
    }

    println!();
    println!(
        "Removed {} keys: {} live, {} tombstones, {} slots",
        to_remove,
        table.len(),
        table.tombstones(),
        table.slot_count()
    );
    table.debug_stats().print();
}
