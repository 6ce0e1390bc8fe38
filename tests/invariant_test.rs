use std::collections::{HashMap, HashSet};
use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bufmgr::{BufferPoolError, BufferPoolManager, PageId};

mod common;
use common::{create_test_buffer_pool, ALL_STRATEGIES};

const POOL_SIZE: usize = 4;
const PAGE_RANGE: PageId = 10;
const STEPS: usize = 2000;

// Frame table must agree with the pins the test believes it holds
fn check_invariants(pool: &BufferPoolManager, pins: &HashMap<PageId, u32>) {
    let contents = pool.frame_contents();
    let fix_counts = pool.fix_counts();
    let dirty = pool.dirty_flags();
    assert_eq!(contents.len(), POOL_SIZE);

    let mut seen = HashSet::new();
    for (slot, page) in contents.iter().enumerate() {
        match page {
            Some(page_id) => {
                assert!(seen.insert(*page_id), "page {} resident twice", page_id);
                let expected = pins.get(page_id).copied().unwrap_or(0);
                assert_eq!(fix_counts[slot], expected, "pin count of page {}", page_id);
            }
            None => {
                assert_eq!(fix_counts[slot], 0);
                assert!(!dirty[slot]);
            }
        }
    }
    for (page_id, &count) in pins {
        if count > 0 {
            assert!(seen.contains(page_id), "pinned page {} not resident", page_id);
        }
    }
}

#[test]
fn test_random_pin_unpin_sequences() -> Result<()> {
    for strategy in ALL_STRATEGIES {
        let (buffer_pool, _temp_file) = create_test_buffer_pool(POOL_SIZE, strategy)?;
        let mut rng = StdRng::seed_from_u64(0xB0FF);
        let mut pins: HashMap<PageId, u32> = HashMap::new();
        let mut misses = 0u64;

        for _ in 0..STEPS {
            match rng.gen_range(0..10) {
                0..=4 => {
                    let page_id = rng.gen_range(0..PAGE_RANGE);
                    let resident = buffer_pool.contains(page_id);
                    match buffer_pool.pin_page(page_id) {
                        Ok(_) => {
                            *pins.entry(page_id).or_insert(0) += 1;
                            if !resident {
                                misses += 1;
                            }
                        }
                        Err(BufferPoolError::PoolExhausted) => {
                            assert!(!resident);
                            assert!(buffer_pool.fix_counts().iter().all(|&c| c > 0));
                        }
                        Err(e) => return Err(e.into()),
                    }
                }
                5..=8 => {
                    let held: Vec<PageId> = pins
                        .iter()
                        .filter(|&(_, &count)| count > 0)
                        .map(|(&page_id, _)| page_id)
                        .collect();
                    if held.is_empty() {
                        continue;
                    }
                    let page_id = held[rng.gen_range(0..held.len())];
                    buffer_pool.unpin_page(page_id)?;
                    *pins.get_mut(&page_id).unwrap() -= 1;
                }
                _ => {
                    let page_id = rng.gen_range(0..PAGE_RANGE);
                    match buffer_pool.mark_dirty(page_id) {
                        Ok(()) | Err(BufferPoolError::PageNotFound(_)) => {}
                        Err(e) => return Err(e.into()),
                    }
                }
            }

            check_invariants(&buffer_pool, &pins);
            assert_eq!(buffer_pool.read_count(), misses, "{} read count", strategy);
        }

        // Unpinning below zero is refused
        for (page_id, count) in pins.iter_mut() {
            while *count > 0 {
                buffer_pool.unpin_page(*page_id)?;
                *count -= 1;
            }
            if buffer_pool.contains(*page_id) {
                assert!(matches!(
                    buffer_pool.unpin_page(*page_id),
                    Err(BufferPoolError::NotPinned(_))
                ));
            }
        }
        check_invariants(&buffer_pool, &pins);
    }
    Ok(())
}
