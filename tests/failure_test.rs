use anyhow::Result;

use bufmgr::{BufferPoolError, ReplacementStrategy};

mod common;
use common::{create_faulty_buffer_pool, read_prefix, touch, write_page};

#[test]
fn test_failed_write_back_keeps_victim() -> Result<()> {
    let (buffer_pool, faults, _temp_file) = create_faulty_buffer_pool(1, ReplacementStrategy::Lru)?;

    write_page(&buffer_pool, 0, b"precious")?;
    faults.set_fail_writes(true);

    assert!(matches!(buffer_pool.pin_page(1), Err(BufferPoolError::Io(_))));
    assert_eq!(buffer_pool.frame_contents(), vec![Some(0)]);
    assert_eq!(buffer_pool.dirty_flags(), vec![true]);
    assert_eq!(buffer_pool.write_count(), 0);
    assert_eq!(buffer_pool.read_count(), 1);

    faults.set_fail_writes(false);
    touch(&buffer_pool, 1)?;
    assert_eq!(buffer_pool.write_count(), 1);
    assert_eq!(read_prefix(&buffer_pool, 0, 8)?, b"precious");

    Ok(())
}

#[test]
fn test_failed_read_frees_frame() -> Result<()> {
    let (buffer_pool, faults, _temp_file) = create_faulty_buffer_pool(1, ReplacementStrategy::Fifo)?;

    touch(&buffer_pool, 0)?;
    faults.set_fail_reads(true);

    // Page 0 is evicted before the read of page 1 fails
    assert!(matches!(buffer_pool.pin_page(1), Err(BufferPoolError::Io(_))));
    assert_eq!(buffer_pool.frame_contents(), vec![None]);
    assert_eq!(buffer_pool.fix_counts(), vec![0]);
    assert!(!buffer_pool.contains(0));
    assert_eq!(buffer_pool.read_count(), 1);

    faults.set_fail_reads(false);
    touch(&buffer_pool, 1)?;
    assert_eq!(buffer_pool.frame_contents(), vec![Some(1)]);
    assert_eq!(buffer_pool.read_count(), 2);

    Ok(())
}

#[test]
fn test_failed_flush_keeps_dirty_flag() -> Result<()> {
    let (buffer_pool, faults, _temp_file) = create_faulty_buffer_pool(2, ReplacementStrategy::Lru)?;

    write_page(&buffer_pool, 0, b"a")?;
    write_page(&buffer_pool, 1, b"b")?;
    faults.set_fail_writes(true);

    assert!(matches!(buffer_pool.flush_pool(), Err(BufferPoolError::Io(_))));
    assert!(matches!(buffer_pool.force_page(1), Err(BufferPoolError::Io(_))));
    assert_eq!(buffer_pool.dirty_flags(), vec![true, true]);
    assert_eq!(buffer_pool.write_count(), 0);

    faults.set_fail_writes(false);
    assert_eq!(buffer_pool.flush_pool()?, 2);
    assert_eq!(buffer_pool.dirty_flags(), vec![false, false]);

    Ok(())
}

#[test]
fn test_failed_shutdown_leaves_pool_open() -> Result<()> {
    let (mut buffer_pool, faults, _temp_file) = create_faulty_buffer_pool(2, ReplacementStrategy::Clock)?;

    write_page(&buffer_pool, 0, b"a")?;
    faults.set_fail_writes(true);
    assert!(matches!(buffer_pool.shutdown(), Err(BufferPoolError::Io(_))));
    assert_eq!(buffer_pool.frame_contents(), vec![Some(0), None]);

    faults.set_fail_writes(false);
    buffer_pool.shutdown()?;
    assert_eq!(buffer_pool.write_count(), 1);

    Ok(())
}
