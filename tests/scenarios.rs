use std::cell::Cell;
use std::rc::Rc;

use double_hash::HashMap;
use double_hash::HashSet;
use double_hash::HashTable;
use double_hash::KeyFns;
use double_hash::ProbeHasher;
use double_hash::SlotStatus;
use double_hash::TableConfig;
use double_hash::TableError;
use double_hash::Xxh64State;
use double_hash::hash::Xxh64;
use double_hash::hash::h64;

#[test]
fn squares_insert_lookup_remove() {
    let mut map = HashMap::new();
    for k in 0..1000u64 {
        map.insert(k, k * k);
    }
    assert_eq!(map.len(), 1000);
    assert_eq!(map.get(&500), Some(&250_000));

    assert_eq!(map.remove(&500), Some(250_000));
    assert_eq!(map.get(&500), None);
    assert_eq!(map.len(), 999);
}

#[test]
fn set_intersection_and_difference() {
    let a: HashSet<i32> = [1, 2, 3].into_iter().collect();
    let b: HashSet<i32> = [2, 3, 4].into_iter().collect();

    let both: HashSet<i32> = [2, 3].into_iter().collect();
    let only_a: HashSet<i32> = [1].into_iter().collect();
    assert_eq!(a.intersection(&b), both);
    assert_eq!(a.difference(&b), only_a);
    assert!(!a.is_disjoint(&b));
}

#[derive(Debug, Clone, Copy)]
struct Node {
    x: i32,
    y: i32,
}

#[test]
fn custom_contract_compares_on_one_field() {
    let mut set = HashSet::with_hasher(KeyFns::new(
        |node: &Node, inner: &dyn Fn(&[u8]) -> u64| inner(&node.x.to_le_bytes()),
        |a: &Node, b: &Node| a.x == b.x,
    ));

    set.insert(Node { x: 3, y: 34 });
    set.insert(Node { x: 3, y: 35 });
    assert_eq!(set.len(), 1);
    assert_eq!(set.get(&Node { x: 3, y: 0 }).map(|n| n.y), Some(34));

    set.insert(Node { x: 4, y: 35 });
    set.insert(Node { x: 5, y: 35 });
    assert_eq!(set.len(), 3);
}

#[test]
fn nested_maps_keep_inner_contents() {
    let mut outer: HashMap<u32, HashMap<String, u32>> = HashMap::new();
    for group in 0..20 {
        let inner = outer.entry(group).or_default();
        for i in 0..30 {
            inner.insert(format!("item-{i}"), group * 100 + i);
        }
    }

    // Growth of the outer map moves inner maps without touching them.
    assert_eq!(outer.len(), 20);
    for group in 0..20 {
        let inner = &outer[&group];
        assert_eq!(inner.len(), 30);
        for i in 0..30 {
            assert_eq!(
                inner.get(format!("item-{i}").as_str()),
                Some(&(group * 100 + i))
            );
        }
    }
}

#[test]
fn tombstone_reuse_never_duplicates() {
    let mut map = HashMap::with_config(TableConfig::new().with_min_load_factor(0.0));
    for round in 0..50u32 {
        for k in 0..10u32 {
            map.insert(k, round);
        }
        for k in (0..10u32).step_by(2) {
            assert_eq!(map.remove(&k), Some(round));
        }
        for k in 0..10u32 {
            map.insert(k, round);
        }
        assert_eq!(map.len(), 10);
        assert_eq!(map.iter().count(), 10);
    }
    assert_eq!(map.slot_count(), 16);
}

#[test]
fn resize_is_transparent() {
    let mut map = HashMap::new();
    let mut slot_counts = Vec::new();
    for k in 0..5000u32 {
        map.insert(k, k.to_string());
        slot_counts.push(map.slot_count());
    }
    slot_counts.dedup();
    assert!(slot_counts.len() > 5);
    assert!(slot_counts.windows(2).all(|w| w[1] == w[0] * 2));

    for k in (0..5000u32).rev() {
        assert_eq!(
            map.get(&k).map(String::as_str),
            Some(k.to_string().as_str())
        );
        if k % 3 != 0 {
            map.remove(&k);
        }
    }
    for k in 0..5000u32 {
        assert_eq!(map.contains_key(&k), k % 3 == 0);
    }
}

#[test]
fn streaming_hash_matches_one_shot() {
    let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    for split in [0, 1, 7, 31, 32, 33, 500, 999, 1000] {
        let mut hasher = Xxh64::new(17);
        hasher.update(&data[..split]);
        hasher.update(&data[split..]);
        assert_eq!(hasher.digest(), h64(&data, 17), "split at {split}");
    }
}

#[test]
fn probe_sequences_are_reproducible_per_seed() {
    let a = Xxh64State.hash_pair("key", 1);
    let b = Xxh64State.hash_pair("key", 1);
    assert_eq!(a, b);
    assert_eq!(a.step % 2, 1);
    assert_ne!(a, Xxh64State.hash_pair("key", 2));
}

#[test]
fn raw_table_exposes_slot_statuses() {
    let hash = |k: &u32| Xxh64State.hash_pair(k, 0);
    let mut table: HashTable<u32, ()> = HashTable::new();
    for k in 0..8u32 {
        table.entry(hash(&k), |v| *v == k, hash).or_insert(k, ());
    }
    table.remove(hash(&3), |v| *v == 3, hash);

    let statuses: Vec<SlotStatus> = table.slot_statuses().collect();
    assert_eq!(statuses.len(), table.slot_count());
    let live = statuses
        .iter()
        .filter(|s| matches!(s, SlotStatus::Occupied(_)))
        .count();
    let tombstones = statuses
        .iter()
        .filter(|s| matches!(s, SlotStatus::Tombstone))
        .count();
    assert_eq!(live, 7);
    assert_eq!(tombstones, 1);
    assert_eq!(table.tombstones(), 1);
}

#[test]
fn fallible_paths_report_errors() {
    let err = HashMap::<u8, u8>::try_with_config(TableConfig::new().with_max_load_factor(1.0))
        .unwrap_err();
    assert!(matches!(err, TableError::InvalidLoadFactor { name: "max", .. }));

    let mut map: HashMap<u8, u8> = HashMap::new();
    assert_eq!(
        map.try_reserve(usize::MAX),
        Err(TableError::CapacityOverflow)
    );
    assert_eq!(map.try_insert(1, 1), Ok(None));
    assert_eq!(map.try_insert(1, 2), Ok(Some(1)));
}

#[cfg(feature = "std")]
#[test]
fn random_seeds_do_not_change_behaviour() {
    let mut a = HashMap::with_config(TableConfig::new().with_random_seed());
    let mut b = HashMap::with_config(TableConfig::new().with_random_seed());
    for k in 0..300 {
        a.insert(k, k);
        b.insert(k, k);
    }
    assert_eq!(a, b);
}

struct DropCounter {
    drops: Rc<Cell<usize>>,
}

impl DropCounter {
    fn new(drops: &Rc<Cell<usize>>) -> Self {
        Self {
            drops: drops.clone(),
        }
    }
}

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn counted_map(drops: &Rc<Cell<usize>>, n: u32) -> HashMap<u32, DropCounter> {
    (0..n).map(|k| (k, DropCounter::new(drops))).collect()
}

#[test]
fn values_drop_once_on_remove_and_resize() {
    let drops = Rc::new(Cell::new(0));
    let mut map = counted_map(&drops, 500);
    // Growth moves values without dropping them.
    assert_eq!(drops.get(), 0);

    for k in 0..480 {
        let value = map.remove(&k);
        assert!(value.is_some());
        assert_eq!(drops.get(), k as usize);
    }
    assert_eq!(drops.get(), 480);
    assert_eq!(map.slot_count(), 64);

    // Replacing a value drops the old one.
    map.insert(490, DropCounter::new(&drops));
    assert_eq!(drops.get(), 481);

    drop(map);
    assert_eq!(drops.get(), 501);
}

#[test]
fn values_drop_once_on_clear() {
    let drops = Rc::new(Cell::new(0));
    let mut map = counted_map(&drops, 100);
    map.clear();
    assert_eq!(drops.get(), 100);
    drop(map);
    assert_eq!(drops.get(), 100);
}

#[test]
fn partial_drain_drops_the_rest() {
    let drops = Rc::new(Cell::new(0));
    let mut map = counted_map(&drops, 100);

    let taken: Vec<(u32, DropCounter)> = map.drain().take(30).collect();
    assert_eq!(drops.get(), 70);
    assert!(map.is_empty());

    drop(taken);
    assert_eq!(drops.get(), 100);
    drop(map);
    assert_eq!(drops.get(), 100);
}

#[test]
fn partial_into_iter_drops_the_rest() {
    let drops = Rc::new(Cell::new(0));
    let map = counted_map(&drops, 100);

    let mut iter = map.into_iter();
    let first: Vec<(u32, DropCounter)> = iter.by_ref().take(10).collect();
    assert_eq!(drops.get(), 0);
    drop(iter);
    assert_eq!(drops.get(), 90);
    drop(first);
    assert_eq!(drops.get(), 100);
}

#[test]
fn nested_maps_drop_inner_values_once() {
    let drops = Rc::new(Cell::new(0));
    let mut outer: HashMap<u32, HashMap<u32, DropCounter>> = HashMap::new();
    for group in 0..40 {
        outer.insert(group, counted_map(&drops, 10));
    }
    assert_eq!(drops.get(), 0);

    let inner = outer.remove(&7).map(|inner| inner.len());
    assert_eq!(inner, Some(10));
    assert_eq!(drops.get(), 10);

    outer.retain(|group, _| group % 2 == 0);
    assert_eq!(drops.get(), 10 + 19 * 10);

    drop(outer);
    assert_eq!(drops.get(), 400);
}
