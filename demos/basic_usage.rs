// demos/basic_usage.rs
//! Basic usage example of indirect buffers

use indirectbuf::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Inline Buffer ===\n");

    let mut buf = InlineBuffer::from_text("Hello, World!")?;
    println!("Size: {}", buf.size());

    buf.move_range(0, 7, 5);
    println!("After move_range: {:?}", buf.to_string_lossy());

    let copy = buf.try_clone()?;
    buf.resize(5)?;
    println!(
        "Shrunk: {:?}, clone untouched: {:?}",
        buf.to_string_lossy(),
        copy.to_string_lossy()
    );

    println!("\n=== Host Store ===\n");

    // A store with a hard cap, as a memory-constrained host would impose.
    let store = HostStore::new(StoreConfig::limited(4 * 1024 * 1024));
    let mut big = HostBuffer::with_storage(HostStorage::allocate_in(&store, 512 * 1024)?);
    big.set_range(0, b"header");

    if let Some(handle) = big.handle() {
        println!("Region handle for the host: {}", handle.get());
    }

    match big.resize(8 * 1024 * 1024) {
        Ok(()) => println!("Grew to {} bytes", big.size()),
        Err(err) => println!("Resize refused ({}), size still {}", err, big.size()),
    }

    let tail = HostBuffer::with_storage(HostStorage::allocate_in(&store, 16)?);
    let joined = HostBuffer::concat(&[&big, &tail])?;
    println!("Concatenated size: {}", joined.size());

    let stats = store.stats();
    println!(
        "Store stats: live={}, bytes={}, minted={}, recycled={}",
        stats.live_handles, stats.bytes_in_use, stats.minted, stats.recycled
    );

    Ok(())
}
